use crate::core::types::{
    AccessToken, ClientId, ClientSecret, GrantType, RefreshToken, TokenType,
};

/// Form body for the `refresh_token` grant.
#[derive(Debug, serde::Serialize)]
pub struct RefreshTokenRequest<'a> {
    pub client_id: &'a ClientId,
    pub client_secret: &'a ClientSecret,
    pub grant_type: GrantType,
    pub refresh_token: &'a RefreshToken,
}

impl<'a> RefreshTokenRequest<'a> {
    pub fn new(
        client_id: &'a ClientId,
        client_secret: &'a ClientSecret,
        refresh_token: &'a RefreshToken,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            grant_type: GrantType::RefreshToken,
            refresh_token,
        }
    }
}

/// Token endpoint reply. Every field is optional on the wire; the caller
/// decides what a missing `access_token` means.
#[derive(Debug, serde::Deserialize)]
pub struct AccessTokenResponse {
    #[serde(default)]
    pub access_token: Option<AccessToken>,
    #[serde(default)]
    pub refresh_token: Option<RefreshToken>,
    #[serde(default)]
    pub token_type: Option<TokenType>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub expires_in: Option<u32>,
}
