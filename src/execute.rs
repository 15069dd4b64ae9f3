use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, SpotifyError};
use crate::request::SpotifyWebRequest;
use crate::transport::Transport;

/// Hands `request` to `transport` once and decodes the payload into `R`.
///
/// The URL is rendered up front so a malformed request never reaches the
/// transport.
pub async fn execute<T, R>(request: &SpotifyWebRequest, method: Method, transport: &T) -> Result<R>
where
    T: Transport + ?Sized,
    R: DeserializeOwned,
{
    let url = request.render_uri()?;
    debug!(method = %method, url = %url, "sending request");

    let payload = transport
        .send(method, request)
        .await
        .map_err(SpotifyError::Transport)?;

    Ok(serde_json::from_value(payload)?)
}

/// Callback flavoured [`execute`]: the outcome is delivered to `callback`
/// exactly once instead of being returned.
pub async fn execute_with_callback<T, R, F>(
    request: &SpotifyWebRequest,
    method: Method,
    transport: &T,
    callback: F,
) where
    T: Transport + ?Sized,
    R: DeserializeOwned,
    F: FnOnce(Result<R>),
{
    callback(execute(request, method, transport).await)
}
