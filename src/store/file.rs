use std::io::Write;
use std::path::{Path, PathBuf};

use crate::auth::{StoreError, TokenStore};
use crate::core::types::RefreshToken;

use tracing::{event, Level};

/// Keeps the refresh token as the sole content of a text file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<RefreshToken>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let token = contents.trim();
        if token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(RefreshToken::new(token)))
        }
    }

    fn write(&self, token: &RefreshToken) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        // Write beside the target, then rename over it.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(token.as_ref().as_bytes())?;
        tmp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TokenStore for FileStore {
    async fn load(&self) -> Result<Option<RefreshToken>, StoreError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.read()).await?
    }

    async fn save(&self, token: &RefreshToken) -> Result<(), StoreError> {
        let (store, token) = (self.clone(), token.clone());
        tokio::task::spawn_blocking(move || store.write(&token)).await??;
        event!(Level::DEBUG, path = %self.path.display(), "Persisted refresh token");
        Ok(())
    }
}
