//! `reqwest` client for the station logging server.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::record::{KeyerEvent, LogRecord};

use super::{
    BandReply, CallSearchReply, ConnReply, DupeReply, LogServer, MessageReply, ServerError,
    ServerResult,
};

/// HTTP implementation of [`LogServer`].
#[derive(Debug, Clone)]
pub struct HttpLogServer {
    client: Client,
    base: Url,
}

impl HttpLogServer {
    /// Builds a client rooted at `base_url` with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> ServerResult<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ServerError::Message(format!("bad base url {base_url:?}: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> ServerResult<Url> {
        self.base
            .join(path)
            .map_err(|e| ServerError::Message(format!("bad endpoint {path:?}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ServerResult<T> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        decode(resp).await
    }

    async fn post_json<B: serde::Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ServerResult<T> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "POST");
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> ServerResult<T> {
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

impl LogServer for HttpLogServer {
    async fn band(&self) -> ServerResult<BandReply> {
        self.get_json("update-band", &[]).await
    }

    async fn check_dupe(&self, call: &str) -> ServerResult<DupeReply> {
        self.get_json("check-dupe", &[("call", call)]).await
    }

    async fn submit_log(&self, record: &LogRecord) -> ServerResult<MessageReply> {
        self.post_json("update-log", record).await
    }

    async fn send_key(&self, event: &KeyerEvent) -> ServerResult<MessageReply> {
        self.post_json("update-key", event).await
    }

    async fn call_search(&self, call: &str) -> ServerResult<CallSearchReply> {
        self.get_json("callsearch", &[("call", call)]).await
    }

    async fn connection(&self, call: &str) -> ServerResult<ConnReply> {
        self.get_json("getconn", &[("call", call)]).await
    }
}
