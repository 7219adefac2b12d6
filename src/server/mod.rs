pub mod http;

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
    record::{KeyerEvent, LogRecord},
    types::DupeStatus,
};

#[derive(Debug)]
pub enum ServerError {
    Http(reqwest::Error),
    Status(u16),
    Decode(serde_json::Error),
    Timeout,
    Message(String),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerError::Http(e) => write!(f, "request failed: {e}"),
            ServerError::Status(code) => write!(f, "server answered {code}"),
            ServerError::Decode(e) => write!(f, "bad reply: {e}"),
            ServerError::Timeout => f.write_str("request timed out"),
            ServerError::Message(m) => f.write_str(m),
        }
    }
}

impl From<reqwest::Error> for ServerError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            return Self::Timeout;
        }
        match value.status() {
            Some(status) => Self::Status(status.as_u16()),
            None if value.is_decode() => Self::Message(format!("bad reply: {value}")),
            None => Self::Http(value),
        }
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value)
    }
}

impl From<tokio::time::error::Elapsed> for ServerError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::Timeout
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

/// `/check-dupe` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DupeReply {
    /// `"Yes"` or `"No"`.
    #[serde(rename = "Isdupe")]
    pub is_dupe: String,
}

impl DupeReply {
    pub fn yes() -> Self {
        Self {
            is_dupe: "Yes".to_string(),
        }
    }

    pub fn no() -> Self {
        Self {
            is_dupe: "No".to_string(),
        }
    }

    /// Status to display; anything but `"Yes"` counts as clean.
    pub fn status(&self) -> DupeStatus {
        if self.is_dupe == "Yes" {
            DupeStatus::Dupe
        } else {
            DupeStatus::Clean
        }
    }
}

/// `/update-log` and `/update-key` reply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageReply {
    #[serde(rename = "Message", default)]
    pub message: String,
}

/// `/update-band` reply.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BandReply {
    #[serde(rename = "Band")]
    pub band: String,
    #[serde(rename = "Mode", default)]
    pub mode: String,
}

/// `/callsearch` reply, display-only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CallSearchReply {
    #[serde(rename = "QRZMsg")]
    pub qrz_msg: String,
    #[serde(rename = "Call")]
    pub call: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Born")]
    pub born: String,
    #[serde(rename = "Addr1")]
    pub addr1: String,
    #[serde(rename = "GeoLoc")]
    pub geo_loc: String,
    #[serde(rename = "Class")]
    pub class: String,
    #[serde(rename = "TimeZone")]
    pub time_zone: String,
    #[serde(rename = "QSOCount")]
    pub qso_count: String,
}

/// `/getconn` reply used to pre-fill the log form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnReply {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Country")]
    pub country: String,
}

/// Endpoints of the station logging server consumed by the entry page.
///
/// Implementations must be cheap to share; the runtime calls them from
/// spawned tasks and never waits on them from the entry loop.
pub trait LogServer: Send + Sync + 'static {
    fn band(&self) -> impl Future<Output = ServerResult<BandReply>> + Send;
    fn check_dupe(&self, call: &str) -> impl Future<Output = ServerResult<DupeReply>> + Send;
    fn submit_log(&self, record: &LogRecord)
    -> impl Future<Output = ServerResult<MessageReply>> + Send;
    fn send_key(&self, event: &KeyerEvent)
    -> impl Future<Output = ServerResult<MessageReply>> + Send;
    fn call_search(&self, call: &str) -> impl Future<Output = ServerResult<CallSearchReply>> + Send;
    fn connection(&self, call: &str) -> impl Future<Output = ServerResult<ConnReply>> + Send;
}
