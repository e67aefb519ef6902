use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

/// Token file name in the config directory
const TOKEN_FILE: &str = "token";

/// Durable storage for the bearer token issued at login.
///
/// One opaque string in a fixed file, surviving restarts until explicitly
/// removed. A missing, unreadable, or empty file reads back as "no token".
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Read the stored token, if any
    pub fn load(&self) -> Option<String> {
        let path = self.token_path();
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) => {
                debug!(error = %e, "Failed to read token file");
                None
            }
        }
    }

    /// Persist the token to disk
    pub fn save(&self, token: &str) -> Result<()> {
        let path = self.token_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, token).context("Failed to write token file")?;
        Ok(())
    }

    /// Remove the stored token. Safe to call when nothing is stored.
    pub fn clear(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove token file")?;
        }
        Ok(())
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, TokenStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load(), None);

        store.save("abc123").unwrap();
        assert_eq!(store.load(), Some("abc123".to_string()));
    }

    #[test]
    fn test_whitespace_and_empty_read_as_absent() {
        let (_dir, store) = temp_store();
        store.save("").unwrap();
        assert_eq!(store.load(), None);

        store.save("  \n").unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (_dir, store) = temp_store();
        store.save("abc123").unwrap();

        store.clear().unwrap();
        assert_eq!(store.load(), None);

        // Clearing again must not fail
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TokenStore::new(dir.path().join("nested"));
        store.save("tok").unwrap();
        assert_eq!(store.load(), Some("tok".to_string()));
    }
}
