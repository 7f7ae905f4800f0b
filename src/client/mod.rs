pub mod activity;
pub mod error;
pub mod token;

pub use error::Error;
pub use token::TokenService;

use crate::auth::TokenStore;
use crate::core::models::{Credential, TokenPair};
use crate::core::types::{AccessToken, ActivityId, RefreshToken};

use tracing::{event, Level};
use url::Url;

pub const STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";
pub const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub api_base: Url,
    pub token_url: Url,
}

impl Endpoints {
    pub fn parse(api_base: &str, token_url: &str) -> Result<Self, url::ParseError> {
        let api_base = Url::parse(api_base)?;
        if api_base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        let token_url = Url::parse(token_url)?;
        Ok(Self { api_base, token_url })
    }

    pub fn strava() -> Self {
        Self::parse(STRAVA_API_BASE, STRAVA_TOKEN_URL).expect("Static endpoints are valid")
    }

    pub fn activity_url(&self, id: ActivityId) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("activities")
                .push(&id.to_string());
        }
        url.query_pairs_mut()
            .append_pair("include_all_efforts", "false");
        url
    }
}

/// Token state for one user of the remote API.
///
/// Holds the in-memory access token, the current refresh token and the
/// store the refresh token is persisted to. Calls that may refresh take
/// `&mut self`.
pub struct Session<S> {
    http: reqwest::Client,
    endpoints: Endpoints,
    tokens: TokenService,
    credential: Option<Credential>,
    access_token: AccessToken,
    refresh_token: Option<RefreshToken>,
    store: S,
}

impl<S> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("endpoints", &self.endpoints)
            .field("can_refresh", &self.can_refresh())
            .finish()
    }
}

impl<S: TokenStore> Session<S> {
    /// Read the stored refresh token and trade it for a first access token.
    pub async fn connect(
        http: reqwest::Client,
        endpoints: Endpoints,
        credential: Credential,
        store: S,
    ) -> Result<Self, Error> {
        let refresh_token = store.load().await?.ok_or(Error::MissingRefreshToken)?;
        let tokens = TokenService::new(http.clone(), endpoints.token_url.clone());
        let pair = tokens.exchange(&store, &refresh_token, &credential).await?;

        event!(Level::DEBUG, "Session established");
        Ok(Self {
            http,
            endpoints,
            tokens,
            credential: Some(credential),
            access_token: pair.access_token,
            refresh_token: Some(pair.refresh_token),
            store,
        })
    }

    /// Build a session from tokens already in hand. Without both a refresh
    /// token and a credential an expired access token cannot be renewed.
    pub fn from_tokens(
        http: reqwest::Client,
        endpoints: Endpoints,
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
        credential: Option<Credential>,
        store: S,
    ) -> Self {
        let tokens = TokenService::new(http.clone(), endpoints.token_url.clone());
        Self {
            http,
            endpoints,
            tokens,
            credential,
            access_token,
            refresh_token,
            store,
        }
    }

    /// Run a token exchange now, regardless of the access token's state.
    /// Returns whether the refresh token was rotated.
    pub async fn refresh(&mut self) -> Result<bool, Error> {
        let (refresh_token, credential) = match (&self.refresh_token, &self.credential) {
            (Some(r), Some(c)) => (r.clone(), c.clone()),
            (None, _) => return Err(Error::MissingRefreshToken),
            (_, None) => return Err(Error::InvalidInput("no client credential")),
        };
        let pair = self
            .tokens
            .exchange(&self.store, &refresh_token, &credential)
            .await?;
        let rotated = pair.refresh_token != refresh_token;
        self.install(pair);
        Ok(rotated)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> Session<S> {
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Refresh material for a 401 recovery, if the session has all of it.
    fn refresh_material(&self) -> Option<(RefreshToken, Credential)> {
        match (&self.refresh_token, &self.credential) {
            (Some(r), Some(c)) if !r.0.is_empty() && c.is_complete() => {
                Some((r.clone(), c.clone()))
            }
            _ => None,
        }
    }

    fn can_refresh(&self) -> bool {
        self.refresh_material().is_some()
    }

    fn install(&mut self, pair: TokenPair) {
        self.access_token = pair.access_token;
        self.refresh_token = Some(pair.refresh_token);
    }
}
