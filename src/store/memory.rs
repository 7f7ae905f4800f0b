use std::sync::Mutex;

use crate::auth::{StoreError, TokenStore};
use crate::core::types::RefreshToken;

/// Refresh token held in process memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: Mutex<Option<RefreshToken>>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new(token: Option<RefreshToken>) -> Self {
        Self {
            token: Mutex::new(token),
            writes: Mutex::new(0),
        }
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(Some(RefreshToken::new(token)))
    }

    /// Number of successful `save` calls.
    pub fn writes(&self) -> usize {
        self.writes.lock().map(|w| *w).unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl TokenStore for MemoryStore {
    async fn load(&self) -> Result<Option<RefreshToken>, StoreError> {
        let token = self.token.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(token.clone())
    }

    async fn save(&self, token: &RefreshToken) -> Result<(), StoreError> {
        let mut current = self.token.lock().map_err(|_| StoreError::Poisoned)?;
        *current = Some(token.clone());
        let mut writes = self.writes.lock().map_err(|_| StoreError::Poisoned)?;
        *writes += 1;
        Ok(())
    }
}
