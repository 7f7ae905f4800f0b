use crate::core::types::RefreshToken;

pub mod access_token;
pub mod error;

pub use access_token::*;
pub use error::ErrorResponse;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("refresh token store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("refresh token store is poisoned")]
    Poisoned,
    #[error("refresh token store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Single-value home of the current refresh token.
///
/// A successful `save` replaces the previous value as a whole; readers never
/// observe a partially written token.
#[async_trait::async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<RefreshToken>, StoreError>;
    async fn save(&self, token: &RefreshToken) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S: TokenStore + ?Sized> TokenStore for std::sync::Arc<S> {
    async fn load(&self) -> Result<Option<RefreshToken>, StoreError> {
        (**self).load().await
    }

    async fn save(&self, token: &RefreshToken) -> Result<(), StoreError> {
        (**self).save(token).await
    }
}
