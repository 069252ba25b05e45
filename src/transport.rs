//! HTTP transport for the trustless endpoints.
//!
//! Every operation is a single JSON POST against the configured origin.
//! Failures map onto the crate taxonomy unmodified: network problems are
//! transport errors, non-2xx responses are API errors carrying status and
//! raw body. No retries.

use reqwest::{Client as ReqwestClient, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Result;
use crate::error::Error;

#[derive(Clone, Debug)]
pub(crate) struct Transport {
    host: Url,
    client: ReqwestClient,
}

impl Transport {
    pub(crate) fn new(host: Url, client: ReqwestClient) -> Self {
        Self { host, client }
    }

    /// POSTs `body` to `path` under the configured origin and decodes the
    /// JSON response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let url = self.host.join(path)?;
        debug!(%url, "posting trustless request");

        let response = self
            .client
            .request(Method::POST, url)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            debug!(%status, "trustless request rejected");
            return Err(Error::api(status, text));
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::api(status, format!("undecodable response body ({e}): {text}")))
    }
}
