use crate::auth::{AccessTokenResponse, ErrorResponse, RefreshTokenRequest, TokenStore};
use crate::client::Error;
use crate::core::models::{Credential, TokenPair};
use crate::core::types::RefreshToken;

use tracing::{event, Level};
use url::Url;

/// Talks to the token endpoint and keeps the token store in step with it.
#[derive(Debug, Clone)]
pub struct TokenService {
    http: reqwest::Client,
    token_url: Url,
}

impl TokenService {
    pub fn new(http: reqwest::Client, token_url: Url) -> Self {
        Self { http, token_url }
    }

    /// Trade `refresh_token` for a fresh access token.
    ///
    /// When the server rotates the refresh token the new value is written to
    /// `store` before this returns. A reply without `access_token` is
    /// `AuthorizationFailed` and leaves the store alone.
    #[tracing::instrument(skip_all, fields(client_id = %credential.client_id.0))]
    pub async fn exchange<S>(
        &self,
        store: &S,
        refresh_token: &RefreshToken,
        credential: &Credential,
    ) -> Result<TokenPair, Error>
    where
        S: TokenStore + ?Sized,
    {
        if refresh_token.0.is_empty() {
            return Err(Error::InvalidInput("refresh token is empty"));
        }
        if !credential.is_complete() {
            return Err(Error::InvalidInput("client id and secret must be set"));
        }

        let pair = self.request(refresh_token, credential).await?;

        if &pair.refresh_token != refresh_token {
            store.save(&pair.refresh_token).await?;
            event!(Level::INFO, "Refresh token rotated");
        }

        Ok(pair)
    }

    async fn request(
        &self,
        refresh_token: &RefreshToken,
        credential: &Credential,
    ) -> Result<TokenPair, Error> {
        let form = RefreshTokenRequest::new(
            &credential.client_id,
            &credential.client_secret,
            refresh_token,
        );

        event!(Level::DEBUG, url = %self.token_url, "Requesting access_token");
        let response = self
            .http
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        let parsed = serde_json::from_slice::<AccessTokenResponse>(&body).ok();
        let access_token = parsed
            .as_ref()
            .and_then(|r| r.access_token.clone())
            .filter(|t| !t.0.is_empty());

        match (access_token, parsed) {
            (Some(access_token), Some(parsed)) => Ok(TokenPair {
                access_token,
                refresh_token: parsed
                    .refresh_token
                    .filter(|t| !t.0.is_empty())
                    .unwrap_or_else(|| refresh_token.clone()),
            }),
            _ => {
                let reason = ErrorResponse::from_body(&body)
                    .and_then(|e| e.describe())
                    .unwrap_or_else(|| format!("no access_token in response (HTTP {})", status.as_u16()));
                event!(Level::WARN, status = status.as_u16(), %reason, "Token exchange rejected");
                Err(Error::AuthorizationFailed(reason))
            }
        }
    }
}
