//! Client for the Spotify Web API authorization flow.
//!
//! ```no_run
//! # async fn run() -> spotify_web_api::Result<()> {
//! use spotify_web_api::{generate_state, Credentials, ResponseType, SpotifyWebApi};
//!
//! let api = SpotifyWebApi::new(Credentials::new("client-id", "client-secret"));
//! let state = generate_state();
//! let url = api.create_authorize_url(&["user-read-email"], Some(state.as_str()), None, ResponseType::Code)?;
//! println!("{url}");
//!
//! let token = api.authorization_code_grant("code-from-callback").await?;
//! let me = api.get_me(&token.access_token).await?;
//! println!("{}", me.id);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod error;
pub mod execute;
pub mod request;
pub mod spotify;
pub mod transport;

pub use auth::{
    generate_state, AccessToken, AuthorizationCallback, AuthorizationRequest, Credentials,
    ResponseType,
};
pub use error::{Result, SpotifyError};
pub use request::SpotifyWebRequest;
pub use spotify::{CurrentUser, SpotifyWebApi};
pub use transport::{ReqwestTransport, ResponseError, Transport, TransportError};
