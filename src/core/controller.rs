//! Contest entry state machine: dupe lookups, submission and keyer macros.

use tracing::debug;

use crate::{
    config::labels::FieldLabelEditor,
    core::{
        effect::{Effect, InputEvent, Reply, ReplyBody, Request, failed_event},
        fields::{EntryLayout, LayoutError},
        generations::Generations,
        lookup::LogLookup,
        session::EntrySession,
        validator,
    },
    record::{FixedRecord, FreeFieldRecord, KeyerEvent, LogRecord},
    runtime::events::UiEvent,
    types::{DupeStatus, FieldId, FunctionKey, KeyCode, RequestKind},
};

/// Owns the [`EntrySession`] of the contest page.
///
/// Every step is synchronous: input goes in, display updates and requests
/// to issue come out. Replies are fed back through [`Self::apply_reply`].
#[derive(Debug, Clone)]
pub struct EntryController {
    layout: EntryLayout,
    session: EntrySession,
    generations: Generations,
}

impl EntryController {
    pub fn new(layout: EntryLayout, sequence_label: &str) -> Result<Self, LayoutError> {
        layout.validate()?;
        let session = EntrySession::from_label(layout.field_count(), sequence_label);
        Ok(Self {
            layout,
            session,
            generations: Generations::new(),
        })
    }

    pub fn session(&self) -> &EntrySession {
        &self.session
    }

    pub fn layout(&self) -> &EntryLayout {
        &self.layout
    }

    pub fn handle_input(&mut self, input: InputEvent) -> Vec<Effect> {
        let mut out = Vec::new();
        match input {
            InputEvent::KeyUp { field, key, text } => self.on_key_up(field, key, text, &mut out),
            InputEvent::FocusIn { field } => self.on_focus_in(field, &mut out),
            InputEvent::Blur { .. } | InputEvent::Select { .. } | InputEvent::Search { .. } => {}
        }
        out
    }

    pub fn apply_reply(&mut self, reply: Reply) -> Vec<Effect> {
        let mut out = Vec::new();
        let current = self.generations.is_current(reply.kind, reply.generation);
        match (reply.kind, reply.outcome) {
            (RequestKind::DupeCheck, _) if !current => {
                debug!(generation = reply.generation, "dropping superseded dupe reply");
            }
            (RequestKind::DupeCheck, Ok(ReplyBody::Dupe { call, reply: answer })) => {
                if call != self.session.call_sign {
                    debug!(%call, "dupe reply no longer matches call sign");
                } else {
                    self.set_dupe_status(answer.status(), &mut out);
                }
            }
            (RequestKind::Submission, Ok(ReplyBody::Logged(msg))) => {
                if current {
                    self.show_message(msg.message, &mut out);
                } else {
                    debug!(generation = reply.generation, "dropping superseded log message");
                }
            }
            (RequestKind::Keyer, Ok(ReplyBody::Keyed(msg))) => {
                self.show_message(msg.message, &mut out);
            }
            (kind, Err(err)) => {
                tracing::warn!(?kind, %err, "request failed");
                out.push(failed_event(kind, &err));
            }
            (kind, Ok(_)) => {
                debug!(?kind, "ignoring reply not handled on the contest page");
            }
        }
        out
    }

    fn on_key_up(
        &mut self,
        field: Option<FieldId>,
        key: KeyCode,
        text: String,
        out: &mut Vec<Effect>,
    ) {
        if let Some(field) = field {
            self.session.focus = Some(field);
            if field == FieldId::CallSign {
                // A macro key over an unchanged call keeps the current indicator.
                let unchanged = text == self.session.call_sign;
                if !(unchanged && key.function_key().is_some()) {
                    self.session.call_sign = text;
                    self.check_call_sign(out);
                }
            } else if let Some(idx) = self.layout.index_of(field) {
                self.session.set_field(idx, text);
            }

            if self.layout.is_submit_key(field, key) {
                self.submit(out);
            }
        }

        if let Some(fkey) = key.function_key() {
            self.dispatch_keyer(fkey, out);
        }
    }

    fn on_focus_in(&mut self, field: FieldId, out: &mut Vec<Effect>) {
        self.session.focus = Some(field);
        if let Some(idx) = self.layout.autofill_on_focus(&mut self.session, field) {
            let value = self.session.field(idx).unwrap_or_default().to_string();
            out.push(Effect::Ui(UiEvent::FieldValue { field, value }));
        }
    }

    fn check_call_sign(&mut self, out: &mut Vec<Effect>) {
        let verdict = validator::classify(&self.session.call_sign);
        self.set_dupe_status(verdict.status(), out);

        if verdict.lookup {
            let generation = self.generations.issue(RequestKind::DupeCheck);
            out.push(Effect::Dispatch(Request::CheckDupe {
                generation,
                call: self.session.call_sign.clone(),
            }));
        } else {
            self.generations.invalidate(RequestKind::DupeCheck);
        }
    }

    fn submit(&mut self, out: &mut Vec<Effect>) {
        let record = self.snapshot_record();
        let generation = self.generations.issue(RequestKind::Submission);
        debug!(
            generation,
            call = record.call(),
            seq = self.session.sequence,
            "submitting contact"
        );
        out.push(Effect::Dispatch(Request::SubmitLog { generation, record }));

        self.session.reset_after_submit();
        self.generations.invalidate(RequestKind::DupeCheck);
        out.push(Effect::Ui(UiEvent::EntryCleared));
        out.push(Effect::Ui(UiEvent::DupeIndicator {
            status: self.session.dupe_status,
        }));
        out.push(Effect::Ui(UiEvent::SequenceLabel {
            label: self.session.sequence_label(),
        }));
        out.push(Effect::Ui(UiEvent::Focus {
            field: FieldId::CallSign,
        }));
    }

    fn snapshot_record(&self) -> LogRecord {
        let s = &self.session;
        match self.layout {
            EntryLayout::FreeField { .. } => LogRecord::FreeField(FreeFieldRecord::new(
                s.call_sign.as_str(),
                s.sequence,
                &s.exchange_fields,
            )),
            EntryLayout::Fixed => LogRecord::Fixed(FixedRecord {
                call: s.call_sign.clone(),
                rst: s.field(0).unwrap_or_default().to_string(),
                exchange: s.field(1).unwrap_or_default().to_string(),
            }),
        }
    }

    fn dispatch_keyer(&self, key: FunctionKey, out: &mut Vec<Effect>) {
        let event = KeyerEvent::new(
            self.session.call_sign.as_str(),
            &self.session.exchange_fields,
            self.session.sequence,
            key,
        );
        debug!(slot = key.slot(), "keyer macro");
        out.push(Effect::Dispatch(Request::Keyer { event }));
    }

    fn set_dupe_status(&mut self, status: DupeStatus, out: &mut Vec<Effect>) {
        if self.session.dupe_status != status {
            self.session.dupe_status = status;
            out.push(Effect::Ui(UiEvent::DupeIndicator { status }));
        }
    }

    fn show_message(&mut self, text: String, out: &mut Vec<Effect>) {
        self.session.message.clone_from(&text);
        out.push(Effect::Ui(UiEvent::Message { text }));
    }
}

/// Controller for whichever page is active.
#[derive(Debug, Clone)]
pub enum PageController {
    Contest(EntryController),
    Defaults(FieldLabelEditor),
    Log(LogLookup),
}

impl PageController {
    pub fn handle_input(&mut self, input: InputEvent) -> Vec<Effect> {
        match self {
            PageController::Contest(c) => c.handle_input(input),
            PageController::Defaults(c) => c.handle_input(input),
            PageController::Log(c) => c.handle_input(input),
        }
    }

    pub fn apply_reply(&mut self, reply: Reply) -> Vec<Effect> {
        match self {
            PageController::Contest(c) => c.apply_reply(reply),
            PageController::Defaults(_) => {
                debug!(kind = ?reply.kind, "defaults page issues no requests");
                Vec::new()
            }
            PageController::Log(c) => c.apply_reply(reply),
        }
    }

    /// Entry session, when the contest page is active.
    pub fn session(&self) -> Option<&EntrySession> {
        match self {
            PageController::Contest(c) => Some(c.session()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::DupeReply;

    fn free() -> EntryController {
        EntryController::new(
            EntryLayout::free_field(["RST", "NR"]).expect("layout"),
            "Sequence: 7",
        )
        .expect("controller")
    }

    fn type_call(c: &mut EntryController, text: &str) -> Vec<Effect> {
        c.handle_input(InputEvent::KeyUp {
            field: Some(FieldId::CallSign),
            key: KeyCode(u16::from(text.bytes().last().unwrap_or(b'A'))),
            text: text.to_string(),
        })
    }

    fn dupe_request(effects: &[Effect]) -> Option<&Request> {
        effects.iter().find_map(|e| match e {
            Effect::Dispatch(r @ Request::CheckDupe { .. }) => Some(r),
            _ => None,
        })
    }

    #[test]
    fn superseded_dupe_reply_is_dropped() {
        let mut c = free();
        let first = type_call(&mut c, "W1A");
        let first = dupe_request(&first).expect("lookup").clone();
        let _ = type_call(&mut c, "W1AW");

        let out = c.apply_reply(Reply::ok(
            &first,
            ReplyBody::Dupe {
                call: "W1A".to_string(),
                reply: DupeReply::yes(),
            },
        ));
        assert!(out.is_empty());
        assert_eq!(c.session().dupe_status, DupeStatus::Unknown);
    }

    #[test]
    fn dupe_reply_after_reset_is_dropped() {
        let mut c = free();
        let out = type_call(&mut c, "W1AW");
        let req = dupe_request(&out).expect("lookup").clone();
        c.handle_input(InputEvent::KeyUp {
            field: Some(FieldId::Field(2)),
            key: KeyCode::ENTER,
            text: "5".to_string(),
        });

        let out = c.apply_reply(Reply::ok(
            &req,
            ReplyBody::Dupe {
                call: "W1AW".to_string(),
                reply: DupeReply::yes(),
            },
        ));
        assert!(out.is_empty());
        assert_eq!(c.session().dupe_status, DupeStatus::Unknown);
    }

    #[test]
    fn macro_key_in_call_sign_keeps_dupe_indicator() {
        let mut c = free();
        let out = type_call(&mut c, "W1AW");
        let req = dupe_request(&out).expect("lookup").clone();
        c.apply_reply(Reply::ok(
            &req,
            ReplyBody::Dupe {
                call: "W1AW".to_string(),
                reply: DupeReply::yes(),
            },
        ));

        let out = c.handle_input(InputEvent::KeyUp {
            field: Some(FieldId::CallSign),
            key: KeyCode(112),
            text: "W1AW".to_string(),
        });
        assert!(dupe_request(&out).is_none());
        assert!(matches!(
            out.as_slice(),
            [Effect::Dispatch(Request::Keyer { .. })]
        ));
        assert_eq!(c.session().dupe_status, DupeStatus::Dupe);
    }

    #[test]
    fn unrecognized_dupe_answer_shows_clean() {
        let mut c = free();
        let out = type_call(&mut c, "W1AW");
        let req = dupe_request(&out).expect("lookup").clone();
        let out = c.apply_reply(Reply::ok(
            &req,
            ReplyBody::Dupe {
                call: "W1AW".to_string(),
                reply: DupeReply {
                    is_dupe: "maybe".to_string(),
                },
            },
        ));
        assert_eq!(
            out,
            vec![Effect::Ui(UiEvent::DupeIndicator {
                status: DupeStatus::Clean
            })]
        );
    }

    #[test]
    fn stale_submission_failure_is_still_surfaced() {
        let mut c = free();
        let enter = |c: &mut EntryController| {
            c.handle_input(InputEvent::KeyUp {
                field: Some(FieldId::Field(2)),
                key: KeyCode::ENTER,
                text: "1".to_string(),
            })
        };
        let first = enter(&mut c);
        let _ = enter(&mut c);
        let Some(Effect::Dispatch(req)) = first.first() else {
            panic!("expected submission dispatch first");
        };

        let out = c.apply_reply(Reply::failed(req, crate::server::ServerError::Timeout));
        assert!(matches!(
            out.as_slice(),
            [Effect::Ui(UiEvent::RequestFailed {
                kind: RequestKind::Submission,
                ..
            })]
        ));
        assert_eq!(c.session().sequence, 9);
    }
}
