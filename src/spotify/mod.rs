use base64::{engine::general_purpose::STANDARD as b64, Engine};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use tracing::debug;

use crate::auth::{AccessToken, AuthorizationRequest, Credentials, ResponseType};
use crate::error::{Result, SpotifyError};
use crate::execute::{execute, execute_with_callback};
use crate::request::SpotifyWebRequest;
use crate::transport::{ReqwestTransport, Transport};

pub mod user;

pub use user::CurrentUser;

const API_HOST: &str = "api.spotify.com";
const API_PORT: u16 = 443;
const API_SCHEME: &str = "https";

const AUTHORIZE_PATH: &str = "/authorize";
const TOKEN_PATH: &str = "/api/token";
const ME_PATH: &str = "/v1/me";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Entry point for the authorization flow and the `/v1/me` lookup.
#[derive(Debug)]
pub struct SpotifyWebApi<T = ReqwestTransport> {
    credentials: Credentials,
    transport: T,
}

impl SpotifyWebApi<ReqwestTransport> {
    pub fn new(credentials: Credentials) -> SpotifyWebApi<ReqwestTransport> {
        SpotifyWebApi::with_transport(credentials, ReqwestTransport::new())
    }

    pub fn from_env() -> Result<SpotifyWebApi<ReqwestTransport>> {
        Ok(SpotifyWebApi::new(Credentials::from_env()?))
    }
}

impl<T: Transport> SpotifyWebApi<T> {
    pub fn with_transport(credentials: Credentials, transport: T) -> SpotifyWebApi<T> {
        SpotifyWebApi {
            credentials,
            transport,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn set_access_token(&mut self, access_token: &str) {
        self.credentials.access_token = Some(String::from(access_token));
    }

    pub fn access_token(&self) -> Option<&str> {
        self.credentials.access_token.as_deref()
    }

    pub fn set_refresh_token(&mut self, refresh_token: &str) {
        self.credentials.refresh_token = Some(String::from(refresh_token));
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.credentials.refresh_token.as_deref()
    }

    /// URL the user should be sent to in order to grant `scopes`.
    ///
    /// Scopes are joined with a literal `%20`; `state` is written verbatim, so
    /// it must already be URL-safe. `state` and `show_dialog` are left out of
    /// the query when `None`.
    pub fn create_authorize_url(
        &self,
        scopes: &[&str],
        state: Option<&str>,
        show_dialog: Option<bool>,
        response_type: ResponseType,
    ) -> Result<String> {
        let request = AuthorizationRequest::new(AUTHORIZE_PATH)
            .with_query_parameters(vec![
                ("client_id".into(), Some(self.credentials.client_id.clone())),
                ("response_type".into(), Some(response_type.as_str().into())),
                ("redirect_uri".into(), Some(self.credentials.redirect_uri.clone())),
                ("scope".into(), Some(scopes.join("%20"))),
                ("state".into(), state.map(String::from)),
                ("show_dialog".into(), show_dialog.map(|s| s.to_string())),
            ])
            .build();

        request.render_url()
    }

    /// Exchanges the code from the authorization callback for tokens.
    pub async fn authorization_code_grant(&self, code: &str) -> Result<AccessToken> {
        let request = self.authorization_code_request(code);
        execute(&request, Method::POST, &self.transport).await
    }

    pub async fn authorization_code_grant_with_callback<F>(&self, code: &str, callback: F)
    where
        F: FnOnce(Result<AccessToken>),
    {
        let request = self.authorization_code_request(code);
        execute_with_callback(&request, Method::POST, &self.transport, callback).await
    }

    /// Trades the stored refresh token for a new access token.
    pub async fn refresh_access_token(&self) -> Result<AccessToken> {
        let request = self.refresh_request()?;
        execute(&request, Method::POST, &self.transport).await
    }

    pub async fn refresh_access_token_with_callback<F>(&self, callback: F)
    where
        F: FnOnce(Result<AccessToken>),
    {
        match self.refresh_request() {
            Ok(request) => {
                execute_with_callback(&request, Method::POST, &self.transport, callback).await
            }
            Err(e) => callback(Err(e)),
        }
    }

    /// Profile of the user `access_token` was issued to.
    pub async fn get_me(&self, access_token: &str) -> Result<CurrentUser> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {access_token}"))?,
        );

        let request = SpotifyWebRequest::create(
            Some(API_HOST),
            Some(API_PORT),
            Some(API_SCHEME),
            ME_PATH,
            Some(headers),
            None,
            None,
        );

        execute(&request, Method::GET, &self.transport).await
    }

    fn authorization_code_request(&self, code: &str) -> SpotifyWebRequest {
        debug!(client_id = %self.credentials.client_id, "requesting authorization code grant");

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

        AuthorizationRequest::new(TOKEN_PATH)
            .with_headers(headers)
            .with_body_parameters(vec![
                ("grant_type".into(), "authorization_code".into()),
                ("redirect_uri".into(), self.credentials.redirect_uri.clone()),
                ("code".into(), code.into()),
                ("client_id".into(), self.credentials.client_id.clone()),
                ("client_secret".into(), self.credentials.client_secret.clone()),
            ])
            .build()
    }

    fn refresh_request(&self) -> Result<SpotifyWebRequest> {
        let refresh_token = self
            .credentials
            .refresh_token
            .clone()
            .ok_or(SpotifyError::MissingRefreshToken)?;
        debug!(client_id = %self.credentials.client_id, "refreshing access token");

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!(
                "Basic {}",
                b64.encode(format!(
                    "{}:{}",
                    self.credentials.client_id, self.credentials.client_secret
                ))
            ))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));

        Ok(AuthorizationRequest::new(TOKEN_PATH)
            .with_headers(headers)
            .with_body_parameters(vec![
                ("grant_type".into(), "refresh_token".into()),
                ("refresh_token".into(), refresh_token),
            ])
            .build())
    }
}
