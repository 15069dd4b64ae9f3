use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, warn};
use url::Url;

use crate::request::SpotifyWebRequest;

/// Opaque failure reported by a [`Transport`].
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Performs the HTTP call a [`SpotifyWebRequest`] describes.
///
/// Implementations must resolve exactly once per call, with either the
/// decoded JSON payload or an error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: Method,
        request: &SpotifyWebRequest,
    ) -> Result<serde_json::Value, TransportError>;
}

#[derive(thiserror::Error, Debug)]
#[error("Spotify responded with status {status}: {body}")]
pub struct ResponseError {
    pub status: u16,
    pub body: String,
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> ReqwestTransport {
        ReqwestTransport::default()
    }

    pub fn with_client(client: reqwest::Client) -> ReqwestTransport {
        ReqwestTransport { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        method: Method,
        request: &SpotifyWebRequest,
    ) -> Result<serde_json::Value, TransportError> {
        let url = Url::parse(&request.render_url()?)?;

        let mut builder = self.client.request(method, url.clone());
        if let Some(headers) = request.headers() {
            builder = builder.headers(headers.clone());
        }
        if let Some(body) = request.body_parameters() {
            builder = builder.form(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!(url = %url.path(), status = %status, "response received");

        let text = response.text().await?;
        if !status.is_success() {
            warn!(status = %status, "Spotify returned an error response");
            return Err(Box::new(ResponseError {
                status: status.as_u16(),
                body: text,
            }));
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
