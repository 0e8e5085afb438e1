// src/session.rs
use crate::domain::errors::{SessionError, SessionResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Durable slot for the session token. Written on login success, cleared on
/// logout; a route guard reads it at startup to decide whether the stored
/// session is still usable.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted token, if any. A missing file is not an error.
    pub fn load(&self) -> SessionResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim().to_string();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::Read(e.to_string())),
        }
    }

    pub fn save(&self, token: &str) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionError::Write(e.to_string()))?;
        }
        fs::write(&self.path, token).map_err(|e| SessionError::Write(e.to_string()))
    }

    /// Remove the persisted token. Clearing an empty slot is fine.
    pub fn clear(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Clear(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> TokenStore {
        let mut path = std::env::temp_dir();
        path.push(format!("zap_admin_test_{}_{}", std::process::id(), name));
        TokenStore::new(path)
    }

    #[test]
    fn round_trip() {
        let store = temp_store("round_trip");
        store.save("jwt-token").unwrap();
        assert_eq!(store.load().unwrap(), Some("jwt-token".to_string()));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn missing_file_is_none() {
        let store = temp_store("missing");
        let _ = store.clear();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let store = temp_store("clear_twice");
        store.save("t").unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
    }
}
