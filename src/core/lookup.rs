//! Log page call-sign lookups.

use tracing::debug;

use crate::{
    core::{
        effect::{Effect, InputEvent, Reply, ReplyBody, Request, failed_event},
        generations::Generations,
    },
    runtime::events::UiEvent,
    types::{FieldId, RequestKind},
};

/// Issues `/callsearch` on search and `/getconn` when the call-sign input loses focus.
#[derive(Debug, Clone, Default)]
pub struct LogLookup {
    generations: Generations,
}

impl LogLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_input(&mut self, input: InputEvent) -> Vec<Effect> {
        match input {
            InputEvent::Search { call } => self.lookup(RequestKind::CallSearch, call),
            InputEvent::Blur {
                field: FieldId::CallSign,
                text,
            } => self.lookup(RequestKind::Connection, text),
            _ => Vec::new(),
        }
    }

    fn lookup(&mut self, kind: RequestKind, call: String) -> Vec<Effect> {
        let call = call.trim().to_string();
        if call.is_empty() {
            self.generations.invalidate(kind);
            return Vec::new();
        }
        let generation = self.generations.issue(kind);
        let req = match kind {
            RequestKind::CallSearch => Request::CallSearch { generation, call },
            _ => Request::Connection { generation, call },
        };
        vec![Effect::Dispatch(req)]
    }

    pub fn apply_reply(&mut self, reply: Reply) -> Vec<Effect> {
        if !self.generations.is_current(reply.kind, reply.generation) {
            debug!(kind = ?reply.kind, generation = reply.generation, "dropping superseded lookup");
            return Vec::new();
        }
        match reply.outcome {
            Ok(ReplyBody::CallSearch(found)) => {
                vec![Effect::Ui(UiEvent::CallSearch { reply: found })]
            }
            Ok(ReplyBody::Connection(conn)) => vec![Effect::Ui(UiEvent::Connection {
                name: conn.name,
                country: conn.country,
            })],
            Ok(_) => Vec::new(),
            Err(err) => {
                tracing::warn!(kind = ?reply.kind, %err, "lookup failed");
                vec![failed_event(reply.kind, &err)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{CallSearchReply, ConnReply};

    #[test]
    fn blank_search_issues_nothing() {
        let mut l = LogLookup::new();
        assert!(l.handle_input(InputEvent::Search { call: "  ".into() }).is_empty());
    }

    #[test]
    fn only_latest_search_is_rendered() {
        let mut l = LogLookup::new();
        let first = l.handle_input(InputEvent::Search { call: "W1AW".into() });
        let second = l.handle_input(InputEvent::Search { call: "K1ABC".into() });
        let (Effect::Dispatch(r1), Effect::Dispatch(r2)) = (&first[0], &second[0]) else {
            panic!("expected dispatches");
        };

        let stale = l.apply_reply(Reply::ok(r1, ReplyBody::CallSearch(CallSearchReply::default())));
        assert!(stale.is_empty());

        let reply = CallSearchReply {
            call: "K1ABC".into(),
            ..CallSearchReply::default()
        };
        let out = l.apply_reply(Reply::ok(r2, ReplyBody::CallSearch(reply.clone())));
        assert_eq!(out, vec![Effect::Ui(UiEvent::CallSearch { reply })]);
    }

    #[test]
    fn call_sign_blur_prefills_name_and_country() {
        let mut l = LogLookup::new();
        let out = l.handle_input(InputEvent::Blur {
            field: FieldId::CallSign,
            text: "DL1ABC".into(),
        });
        let Effect::Dispatch(req) = &out[0] else {
            panic!("expected dispatch");
        };
        assert_eq!(req.kind(), RequestKind::Connection);

        let out = l.apply_reply(Reply::ok(
            req,
            ReplyBody::Connection(ConnReply {
                name: "Hans".into(),
                country: "Germany".into(),
            }),
        ));
        assert_eq!(
            out,
            vec![Effect::Ui(UiEvent::Connection {
                name: "Hans".into(),
                country: "Germany".into()
            })]
        );
    }
}
