use serde::{Deserialize, Serialize};

/// Profile of the user an access token belongs to, as returned by `/v1/me`.
///
/// `email`, `country` and `product` are only present when the token carries
/// the matching `user-read-*` scopes.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub uri: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
}
