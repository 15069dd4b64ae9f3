use reqwest::header::InvalidHeaderValue;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, SpotifyError>;

#[derive(thiserror::Error, Debug)]
pub enum SpotifyError {
    #[error("Missing components necessary to construct URI")]
    MissingComponents,

    /// Failure reported by the transport, passed through untouched.
    #[error("Transport error: {0}")]
    Transport(TransportError),

    #[error("Unable to parse response payload: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("No refresh token has been set")]
    MissingRefreshToken,

    #[error("Error while attempting to get {name} from environment variables")]
    MissingEnv {
        name: &'static str,
        #[source]
        source: std::env::VarError,
    },

    #[error("Authorization callback returned an error: {0}")]
    Authorization(String),

    #[error("State sent to Spotify does not match the one returned")]
    StateMismatch,

    #[error("Auth code not present in callback")]
    MissingAuthorizationCode,

    #[error("Error while parsing auth code callback: {0}")]
    CallbackQuery(#[from] serde_urlencoded::de::Error),
}
