//! Register identity: generation and durable persistence.
//!
//! Each device carries one opaque identity string, generated on first run and
//! reused for the lifetime of the installation so the backend can correlate
//! reconnects. The provider is injected rather than global so tests can supply
//! deterministic identities.

use crate::error::{Result, TillsyncError};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the identity file under the platform data directory.
const IDENTITY_FILE: &str = "register-id";

/// Opaque, non-empty identity string, stable for the installation lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterIdentity(String);

impl RegisterIdentity {
    /// Wrap an existing identity string. Fails on empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TillsyncError::InvalidIdentity {
                message: "identity must be non-empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Generate a fresh identity from the current wall clock.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        Self(format!("register_{millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short suffix for display headers ("Register #1700000000000").
    pub fn display_suffix(&self) -> &str {
        self.0.split_once('_').map_or(self.0.as_str(), |(_, s)| s)
    }
}

impl std::fmt::Display for RegisterIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the device identity.
pub trait IdentityProvider {
    /// Return the stored identity, creating and persisting one if absent.
    fn load_or_create(&self) -> Result<RegisterIdentity>;
}

/// File-backed identity store: one line in a file under the data directory.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    path: PathBuf,
}

impl FileIdentityStore {
    /// Store backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory (`<data_dir>/tillsync/register-id`).
    pub fn default_location() -> Result<Self> {
        let base = dirs::data_dir().ok_or_else(|| TillsyncError::NoDataDirectory {
            path: PathBuf::from("<data_dir>"),
        })?;
        Ok(Self::new(base.join("tillsync").join(IDENTITY_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IdentityProvider for FileIdentityStore {
    fn load_or_create(&self) -> Result<RegisterIdentity> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let identity = RegisterIdentity::new(contents)?;
                log::debug!("loaded identity {} from {}", identity, self.path.display());
                Ok(identity)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let identity = RegisterIdentity::generate();
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent).map_err(|e| {
                        TillsyncError::identity(
                            format!("creating {}", parent.display()),
                            e,
                        )
                    })?;
                }
                fs::write(&self.path, identity.as_str()).map_err(|e| {
                    TillsyncError::identity(format!("writing {}", self.path.display()), e)
                })?;
                log::info!("generated identity {} at {}", identity, self.path.display());
                Ok(identity)
            }
            Err(err) => Err(TillsyncError::identity(
                format!("reading {}", self.path.display()),
                err,
            )),
        }
    }
}

/// Deterministic provider for tests.
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub RegisterIdentity);

impl IdentityProvider for FixedIdentity {
    fn load_or_create(&self) -> Result<RegisterIdentity> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_identity() {
        assert!(RegisterIdentity::new("").is_err());
        assert!(RegisterIdentity::new("   ").is_err());
    }

    #[test]
    fn trims_persisted_whitespace() {
        let identity = RegisterIdentity::new("register_123\n").unwrap();
        assert_eq!(identity.as_str(), "register_123");
    }

    #[test]
    fn generated_identity_has_prefix() {
        let identity = RegisterIdentity::generate();
        assert!(identity.as_str().starts_with("register_"));
        assert!(identity.as_str().len() > "register_".len());
    }

    #[test]
    fn display_suffix_strips_prefix() {
        let identity = RegisterIdentity::new("register_42").unwrap();
        assert_eq!(identity.display_suffix(), "42");

        // No underscore: fall back to the whole string
        let odd = RegisterIdentity::new("till9").unwrap();
        assert_eq!(odd.display_suffix(), "till9");
    }

    #[test]
    fn store_creates_then_reuses_identity() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileIdentityStore::new(dir.path().join("nested").join("register-id"));

        let first = store.load_or_create().unwrap();
        let second = store.load_or_create().unwrap();
        assert_eq!(first, second);

        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(on_disk, first.as_str());
    }

    #[test]
    fn store_rejects_corrupt_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("register-id");
        std::fs::write(&path, "   \n").unwrap();

        let store = FileIdentityStore::new(&path);
        assert!(store.load_or_create().is_err());
    }

    #[test]
    fn fixed_identity_is_deterministic() {
        let fixed = FixedIdentity(RegisterIdentity::new("register_7").unwrap());
        assert_eq!(fixed.load_or_create().unwrap().as_str(), "register_7");
    }
}
