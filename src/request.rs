use reqwest::header::HeaderMap;

use crate::error::{Result, SpotifyError};

pub const DEFAULT_HOST: &str = "accounts.spotify.com";
pub const DEFAULT_PORT: u16 = 443;
pub const DEFAULT_SCHEME: &str = "https";

/// Ordered query parameters. A `None` value is dropped when rendering.
pub type QueryParameters = Vec<(String, Option<String>)>;
/// Ordered form body parameters.
pub type BodyParameters = Vec<(String, String)>;

/// Everything needed to issue one call against a Spotify endpoint.
///
/// Built fresh for each operation through [`SpotifyWebRequest::create`] and
/// handed to a [`Transport`](crate::transport::Transport) as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotifyWebRequest {
    host: String,
    port: u16,
    scheme: String,
    path: String,
    headers: Option<HeaderMap>,
    query_parameters: Option<QueryParameters>,
    body_parameters: Option<BodyParameters>,
}

impl SpotifyWebRequest {
    /// Builds a request, falling back to `https://accounts.spotify.com:443`
    /// for whichever of host, port and scheme is absent.
    pub fn create(
        host: Option<&str>,
        port: Option<u16>,
        scheme: Option<&str>,
        path: &str,
        headers: Option<HeaderMap>,
        query_parameters: Option<QueryParameters>,
        body_parameters: Option<BodyParameters>,
    ) -> SpotifyWebRequest {
        SpotifyWebRequest {
            host: host.unwrap_or(DEFAULT_HOST).to_string(),
            port: port.unwrap_or(DEFAULT_PORT),
            scheme: scheme.unwrap_or(DEFAULT_SCHEME).to_string(),
            path: path.to_string(),
            headers,
            query_parameters,
            body_parameters,
        }
    }

    /// `scheme://host[:port]path`, eliding the port when it is the scheme's
    /// well-known one. Schemes other than http and https always carry the
    /// port.
    pub fn render_uri(&self) -> Result<String> {
        if self.scheme.is_empty() || self.host.is_empty() || self.port == 0 {
            return Err(SpotifyError::MissingComponents);
        }

        let mut uri = format!("{}://{}", self.scheme, self.host);
        let default_port = match self.scheme.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        };
        if default_port != Some(self.port) {
            uri.push_str(&format!(":{}", self.port));
        }
        uri.push_str(&self.path);

        Ok(uri)
    }

    pub fn render_url(&self) -> Result<String> {
        let uri = self.render_uri()?;
        Ok(format!("{}{}", uri, self.render_query_string()))
    }

    /// Values are written verbatim, so anything needing percent-encoding must
    /// already be encoded by the caller.
    pub fn render_query_string(&self) -> String {
        match &self.query_parameters {
            Some(params) => {
                let pairs = params
                    .iter()
                    .filter_map(|(key, value)| value.as_ref().map(|v| format!("{key}={v}")))
                    .collect::<Vec<_>>()
                    .join("&");
                format!("?{pairs}")
            }
            None => String::new(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> Option<&HeaderMap> {
        self.headers.as_ref()
    }

    pub fn query_parameters(&self) -> Option<&QueryParameters> {
        self.query_parameters.as_ref()
    }

    pub fn body_parameters(&self) -> Option<&BodyParameters> {
        self.body_parameters.as_ref()
    }
}
