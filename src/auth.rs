use std::env;
use std::fmt;

use rand::{distr::Alphanumeric, Rng};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SpotifyError};
use crate::request::{BodyParameters, QueryParameters, SpotifyWebRequest};

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";

const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
const REDIRECT_URI_VAR: &str = "SPOTIFY_REDIRECT_URI";

/// Application credentials plus whatever tokens have been obtained so far.
///
/// Token expiry is not tracked here.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    pub fn new(client_id: &str, client_secret: &str) -> Credentials {
        Credentials {
            client_id: String::from(client_id),
            client_secret: String::from(client_secret),
            redirect_uri: String::from(DEFAULT_REDIRECT_URI),
            access_token: None,
            refresh_token: None,
        }
    }

    /// Reads `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET` and the optional
    /// `SPOTIFY_REDIRECT_URI`, after loading a `.env` file when one exists.
    pub fn from_env() -> Result<Credentials> {
        dotenvy::dotenv().ok();
        Credentials::from_vars(CLIENT_ID_VAR, CLIENT_SECRET_VAR, REDIRECT_URI_VAR)
    }

    fn from_vars(
        client_id_var: &'static str,
        client_secret_var: &'static str,
        redirect_uri_var: &'static str,
    ) -> Result<Credentials> {
        let client_id = required_var(client_id_var)?;
        let client_secret = required_var(client_secret_var)?;

        let creds = Credentials::new(&client_id, &client_secret);
        Ok(match optional_var(redirect_uri_var)? {
            Some(redirect_uri) => creds.with_redirect_uri(&redirect_uri),
            None => creds,
        })
    }

    pub fn with_redirect_uri(mut self, redirect_uri: &str) -> Credentials {
        self.redirect_uri = String::from(redirect_uri);
        self
    }

    pub fn with_access_token(mut self, access_token: &str) -> Credentials {
        self.access_token = Some(String::from(access_token));
        self
    }

    pub fn with_refresh_token(mut self, refresh_token: &str) -> Credentials {
        self.refresh_token = Some(String::from(refresh_token));
        self
    }
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn required_var(name: &'static str) -> Result<String> {
    env::var(name).map_err(|source| SpotifyError::MissingEnv { name, source })
}

/// Unset is `None`; a value that is not valid unicode is still an error.
fn optional_var(name: &'static str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(source) => Err(SpotifyError::MissingEnv { name, source }),
    }
}

/// Token endpoint payload for both grant types.
///
/// Refresh responses usually leave out `refresh_token`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
    pub expires_in: u64,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseType {
    #[default]
    Code,
    Token,
}

impl ResponseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Code => "code",
            ResponseType::Token => "token",
        }
    }
}

/// Request against the accounts service. Host, port and scheme are left
/// unset so [`SpotifyWebRequest::create`] fills in the accounts defaults.
#[derive(Debug, Default)]
pub struct AuthorizationRequest {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub scheme: Option<String>,
    pub path: String,
    pub headers: Option<HeaderMap>,
    pub query_parameters: Option<QueryParameters>,
    pub body_parameters: Option<BodyParameters>,
}

impl AuthorizationRequest {
    pub fn new(path: &str) -> AuthorizationRequest {
        AuthorizationRequest {
            path: String::from(path),
            ..Default::default()
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> AuthorizationRequest {
        self.headers = Some(headers);
        self
    }

    pub fn with_query_parameters(mut self, params: QueryParameters) -> AuthorizationRequest {
        self.query_parameters = Some(params);
        self
    }

    pub fn with_body_parameters(mut self, params: BodyParameters) -> AuthorizationRequest {
        self.body_parameters = Some(params);
        self
    }

    pub fn build(self) -> SpotifyWebRequest {
        SpotifyWebRequest::create(
            self.host.as_deref(),
            self.port,
            self.scheme.as_deref(),
            &self.path,
            self.headers,
            self.query_parameters,
            self.body_parameters,
        )
    }
}

/// Random 64 character value for the `state` parameter of the authorize URL.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}

/// Query parameters Spotify appends to the redirect URI.
#[derive(Deserialize, Debug, PartialEq)]
pub struct AuthorizationCallback {
    pub code: Option<String>,
    pub error: Option<String>,
    pub state: Option<String>,
}

impl AuthorizationCallback {
    /// Accepts the bare query, `?query`, or the request target `/callback?query`.
    pub fn from_query(query: &str) -> Result<AuthorizationCallback> {
        let query = match query.split_once('?') {
            Some((_, rest)) => rest,
            None => query,
        };
        Ok(serde_urlencoded::from_str(query)?)
    }

    pub fn into_code(self, expected_state: Option<&str>) -> Result<String> {
        if let Some(error) = self.error {
            return Err(SpotifyError::Authorization(error));
        }
        if let Some(expected) = expected_state {
            if self.state.as_deref() != Some(expected) {
                return Err(SpotifyError::StateMismatch);
            }
        }
        self.code.ok_or(SpotifyError::MissingAuthorizationCode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_credentials_use_default_redirect() {
        let creds = Credentials::new("id", "secret");
        assert_eq!(creds.redirect_uri, DEFAULT_REDIRECT_URI);
        assert!(creds.access_token.is_none());
        assert!(creds.refresh_token.is_none());
    }

    #[test]
    fn builder_methods_set_fields() {
        let creds = Credentials::new("id", "secret")
            .with_redirect_uri("https://example.com/cb")
            .with_access_token("at")
            .with_refresh_token("rt");

        assert_eq!(creds.redirect_uri, "https://example.com/cb");
        assert_eq!(creds.access_token.as_deref(), Some("at"));
        assert_eq!(creds.refresh_token.as_deref(), Some("rt"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials::new("id", "very-secret").with_access_token("token-value");
        let rendered = format!("{:?}", creds);

        assert!(rendered.contains("id"));
        assert!(!rendered.contains("very-secret"));
        assert!(!rendered.contains("token-value"));
    }

    #[test]
    fn missing_env_is_reported() {
        match required_var("SPOTIFY_WEB_API_TEST_UNSET_VAR") {
            Err(SpotifyError::MissingEnv { name, source }) => {
                assert_eq!(name, "SPOTIFY_WEB_API_TEST_UNSET_VAR");
                assert_eq!(source, env::VarError::NotPresent);
            }
            other => panic!("Expected MissingEnv, got: {:?}", other),
        }
    }

    #[test]
    fn env_credentials_with_and_without_redirect() {
        env::set_var("SPOTIFY_WEB_API_TEST_ID", "env-id");
        env::set_var("SPOTIFY_WEB_API_TEST_SECRET", "env-secret");
        env::set_var("SPOTIFY_WEB_API_TEST_REDIRECT", "https://example.com/cb");

        let creds = Credentials::from_vars(
            "SPOTIFY_WEB_API_TEST_ID",
            "SPOTIFY_WEB_API_TEST_SECRET",
            "SPOTIFY_WEB_API_TEST_REDIRECT",
        )
        .unwrap();
        assert_eq!(creds.client_id, "env-id");
        assert_eq!(creds.client_secret, "env-secret");
        assert_eq!(creds.redirect_uri, "https://example.com/cb");

        let defaulted = Credentials::from_vars(
            "SPOTIFY_WEB_API_TEST_ID",
            "SPOTIFY_WEB_API_TEST_SECRET",
            "SPOTIFY_WEB_API_TEST_REDIRECT_UNSET",
        )
        .unwrap();
        assert_eq!(defaulted.redirect_uri, DEFAULT_REDIRECT_URI);

        let missing_secret = Credentials::from_vars(
            "SPOTIFY_WEB_API_TEST_ID",
            "SPOTIFY_WEB_API_TEST_SECRET_UNSET",
            "SPOTIFY_WEB_API_TEST_REDIRECT",
        );
        assert!(matches!(
            missing_secret,
            Err(SpotifyError::MissingEnv {
                name: "SPOTIFY_WEB_API_TEST_SECRET_UNSET",
                ..
            })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_redirect_is_an_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        env::set_var(
            "SPOTIFY_WEB_API_TEST_BAD_REDIRECT",
            OsStr::from_bytes(b"http://localhost/\xff"),
        );

        match optional_var("SPOTIFY_WEB_API_TEST_BAD_REDIRECT") {
            Err(SpotifyError::MissingEnv { name, source }) => {
                assert_eq!(name, "SPOTIFY_WEB_API_TEST_BAD_REDIRECT");
                assert!(matches!(source, env::VarError::NotUnicode(_)));
            }
            other => panic!("Expected MissingEnv, got: {:?}", other),
        }
        assert_eq!(
            optional_var("SPOTIFY_WEB_API_TEST_UNSET_REDIRECT").unwrap(),
            None
        );
    }

    #[test]
    fn access_token_without_refresh_token() {
        let token: AccessToken = serde_json::from_str(
            r#"{"access_token":"abc","token_type":"Bearer","expires_in":3600}"#,
        )
        .unwrap();

        assert_eq!(token.access_token, "abc");
        assert_eq!(token.expires_in, 3600);
        assert!(token.scope.is_none());
        assert!(token.refresh_token.is_none());
    }

    #[test]
    fn response_type_defaults_to_code() {
        assert_eq!(ResponseType::default().as_str(), "code");
        assert_eq!(ResponseType::Token.as_str(), "token");
    }

    #[test]
    fn authorization_request_uses_accounts_defaults() {
        let request = AuthorizationRequest::new("/api/token").build();
        assert_eq!(
            request.render_uri().unwrap(),
            "https://accounts.spotify.com/api/token"
        );
    }

    #[test]
    fn state_is_random_alphanumeric() {
        let a = generate_state();
        let b = generate_state();

        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn callback_yields_code() {
        let callback = AuthorizationCallback::from_query("/callback?code=AQB&state=xyz").unwrap();
        assert_eq!(callback.into_code(Some("xyz")).unwrap(), "AQB");

        let bare = AuthorizationCallback::from_query("code=AQB").unwrap();
        assert_eq!(bare.into_code(None).unwrap(), "AQB");
    }

    #[test]
    fn callback_error_is_reported() {
        let callback =
            AuthorizationCallback::from_query("?error=access_denied&state=xyz").unwrap();
        match callback.into_code(Some("xyz")) {
            Err(SpotifyError::Authorization(e)) => assert_eq!(e, "access_denied"),
            other => panic!("Expected authorization error, got: {:?}", other),
        }
    }

    #[test]
    fn callback_state_must_match() {
        let callback = AuthorizationCallback::from_query("code=AQB&state=other").unwrap();
        assert!(matches!(
            callback.into_code(Some("xyz")),
            Err(SpotifyError::StateMismatch)
        ));
    }

    #[test]
    fn callback_without_code() {
        let callback = AuthorizationCallback::from_query("state=xyz").unwrap();
        assert!(matches!(
            callback.into_code(Some("xyz")),
            Err(SpotifyError::MissingAuthorizationCode)
        ));
    }
}
