use crate::auth::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("no refresh token stored; authorize the application first")]
    MissingRefreshToken,
    #[error("authorization failed: {0}")]
    AuthorizationFailed(String),
    #[error("request failed (HTTP {status})")]
    RequestFailed { status: u16 },
    #[error("request failed after token refresh (HTTP {status})")]
    RequestFailedAfterRefresh { status: u16 },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// The stored authorization cannot be used any more; a human has to
    /// authorize the application again.
    pub fn needs_reauthorization(&self) -> bool {
        matches!(self, Self::AuthorizationFailed(_) | Self::MissingRefreshToken)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status } | Self::RequestFailedAfterRefresh { status } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
