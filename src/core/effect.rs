use crate::{
    record::{KeyerEvent, LogRecord},
    runtime::events::UiEvent,
    server::{CallSearchReply, ConnReply, DupeReply, MessageReply, ServerError},
    types::{FieldId, Generation, KeyCode, RequestKind},
};

/// Operator input delivered to a page controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was released; `text` is the value of `field` afterwards.
    ///
    /// `field` is `None` when no input has focus.
    KeyUp {
        field: Option<FieldId>,
        key: KeyCode,
        text: String,
    },
    FocusIn {
        field: FieldId,
    },
    Blur {
        field: FieldId,
        text: String,
    },
    /// A selector changed.
    Select {
        field: FieldId,
        value: String,
    },
    /// Log page search button.
    Search {
        call: String,
    },
}

/// Network request a controller wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CheckDupe {
        generation: Generation,
        call: String,
    },
    SubmitLog {
        generation: Generation,
        record: LogRecord,
    },
    Keyer {
        event: KeyerEvent,
    },
    CallSearch {
        generation: Generation,
        call: String,
    },
    Connection {
        generation: Generation,
        call: String,
    },
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::CheckDupe { .. } => RequestKind::DupeCheck,
            Request::SubmitLog { .. } => RequestKind::Submission,
            Request::Keyer { .. } => RequestKind::Keyer,
            Request::CallSearch { .. } => RequestKind::CallSearch,
            Request::Connection { .. } => RequestKind::Connection,
        }
    }

    /// Generation of the request; keyer requests are untracked and report 0.
    pub fn generation(&self) -> Generation {
        match self {
            Request::CheckDupe { generation, .. }
            | Request::SubmitLog { generation, .. }
            | Request::CallSearch { generation, .. }
            | Request::Connection { generation, .. } => *generation,
            Request::Keyer { .. } => 0,
        }
    }
}

/// Successful reply payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBody {
    Dupe { call: String, reply: DupeReply },
    Logged(MessageReply),
    Keyed(MessageReply),
    CallSearch(CallSearchReply),
    Connection(ConnReply),
}

/// Completion of a dispatched [`Request`].
#[derive(Debug)]
pub struct Reply {
    pub kind: RequestKind,
    pub generation: Generation,
    pub outcome: Result<ReplyBody, ServerError>,
}

impl Reply {
    pub fn ok(request: &Request, body: ReplyBody) -> Self {
        Self {
            kind: request.kind(),
            generation: request.generation(),
            outcome: Ok(body),
        }
    }

    pub fn failed(request: &Request, err: ServerError) -> Self {
        Self {
            kind: request.kind(),
            generation: request.generation(),
            outcome: Err(err),
        }
    }
}

/// Output of a controller step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Ui(UiEvent),
    Dispatch(Request),
}

pub(crate) fn failed_event(kind: RequestKind, err: &ServerError) -> Effect {
    Effect::Ui(UiEvent::RequestFailed {
        kind,
        detail: err.to_string(),
    })
}
