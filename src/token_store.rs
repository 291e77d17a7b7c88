use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use crate::error::AppResult;

/// Persisted credential state shared by the auth gateway and every
/// authenticated API call.
///
/// The token is the sole credential artifact: absence means the client is
/// unauthenticated. Only the auth gateway writes; all other components
/// treat the stored value as read-only.
pub trait TokenStore: Send + Sync {
    /// Load the persisted bearer token, if any
    fn load_token(&self) -> Option<String>;

    /// Persist a bearer token, replacing any previous one
    fn save_token(&self, token: &str) -> AppResult<()>;

    /// Remove the persisted token. Best-effort: a failure to delete is
    /// logged, and `load_token` afterwards still returns `None` where the
    /// implementation can guarantee it.
    fn clear_token(&self);

    /// Whether the last login demanded a password change
    fn password_change_required(&self) -> bool;

    /// Persist or clear the password-change requirement
    fn set_password_change_required(&self, required: bool) -> AppResult<()>;
}

/// File-backed token store.
///
/// The token lives in a small file; the password-change requirement is a
/// sibling marker file, present iff the requirement is active.
pub struct FileTokenStore {
    token_path: PathBuf,
}

impl FileTokenStore {
    /// Create a store rooted at the given token path
    pub fn new(token_path: impl Into<PathBuf>) -> Self {
        Self {
            token_path: token_path.into(),
        }
    }

    fn flag_path(&self) -> PathBuf {
        let mut name = self
            .token_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "token".into());
        name.push(".pwchange");
        self.token_path.with_file_name(name)
    }

    fn ensure_parent(&self) -> std::io::Result<()> {
        if let Some(parent) = self.token_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load_token(&self) -> Option<String> {
        match fs::read_to_string(&self.token_path) {
            Ok(token) => {
                let token = token.trim().to_string();
                if token.is_empty() {
                    None
                } else {
                    Some(token)
                }
            }
            Err(_) => None,
        }
    }

    fn save_token(&self, token: &str) -> AppResult<()> {
        self.ensure_parent()?;
        fs::write(&self.token_path, token)?;
        Ok(())
    }

    fn clear_token(&self) {
        if let Err(e) = fs::remove_file(&self.token_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove session token file: {}", e);
            }
        }
    }

    fn password_change_required(&self) -> bool {
        self.flag_path().exists()
    }

    fn set_password_change_required(&self, required: bool) -> AppResult<()> {
        let flag = self.flag_path();
        if required {
            self.ensure_parent()?;
            fs::write(&flag, "1")?;
        } else if let Err(e) = fs::remove_file(&flag) {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e.into());
            }
        }
        Ok(())
    }
}

/// In-memory token store for tests and embedded use
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
    password_change: Mutex<bool>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with a token
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
            password_change: Mutex::new(false),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn save_token(&self, token: &str) -> AppResult<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) {
        *self.token.lock().unwrap() = None;
    }

    fn password_change_required(&self) -> bool {
        *self.password_change.lock().unwrap()
    }

    fn set_password_change_required(&self, required: bool) -> AppResult<()> {
        *self.password_change.lock().unwrap() = required;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_token_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "hostel-console-test-{}-{}/token",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_token_path("round-trip");
        let store = FileTokenStore::new(&path);

        assert_eq!(store.load_token(), None);
        store.save_token("abc123").unwrap();
        assert_eq!(store.load_token().as_deref(), Some("abc123"));

        store.clear_token();
        assert_eq!(store.load_token(), None);
        // Clearing twice is harmless
        store.clear_token();
    }

    #[test]
    fn test_file_store_password_change_flag() {
        let path = temp_token_path("pwchange");
        let store = FileTokenStore::new(&path);

        assert!(!store.password_change_required());
        store.set_password_change_required(true).unwrap();
        assert!(store.password_change_required());
        store.set_password_change_required(false).unwrap();
        assert!(!store.password_change_required());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load_token(), None);

        store.save_token("tok").unwrap();
        assert_eq!(store.load_token().as_deref(), Some("tok"));

        store.clear_token();
        assert_eq!(store.load_token(), None);
    }
}
