//! Session credentials and their on-disk storage.
//!
//! The dashboard signs in through the REST API; the resulting session is
//! stored in `~/.storefront/credentials.json` and read back whenever the
//! realtime client needs a token.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The credentials directory name.
const CREDENTIALS_DIR: &str = ".storefront";

/// The credentials file name.
const CREDENTIALS_FILE: &str = "credentials.json";

/// Dashboard role of the signed-in account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardRole {
    Admin,
    BranchManager,
    Seller,
    Delivery,
    Customer,
}

/// Stored session for the storefront API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    /// Bearer token, also passed to the realtime socket as `?token=`.
    pub access_token: Option<String>,
    /// Token used to obtain a fresh access token.
    pub refresh_token: Option<String>,
    /// Expiry as Unix timestamp (seconds). `None` means the server did not say.
    pub expires_at: Option<i64>,
    pub user_id: Option<String>,
    #[serde(default)]
    pub role: Option<DashboardRole>,
}

impl Credentials {
    /// Create new empty credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credentials holding just an access token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn has_token(&self) -> bool {
        self.access_token
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    }

    /// Whether the token is past its expiry.
    ///
    /// A session without an expiry is treated as live; the server rejects
    /// it at handshake time if it is not.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => chrono::Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }

    /// Has a token and it has not expired.
    pub fn is_valid(&self) -> bool {
        self.has_token() && !self.is_expired()
    }

    /// The access token, if it is usable right now.
    pub fn usable_token(&self) -> Option<&str> {
        if self.is_valid() {
            self.access_token.as_deref()
        } else {
            None
        }
    }
}

/// Manages credential storage and retrieval.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    /// Path to the credentials file.
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Manager for `~/.storefront/credentials.json`.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::with_path(
            home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE),
        ))
    }

    /// Manager for an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: path.into(),
        }
    }

    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Load credentials from disk.
    ///
    /// A missing or unreadable file yields empty credentials, i.e. signed out.
    pub fn load(&self) -> Credentials {
        let file = match File::open(&self.credentials_path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Credentials::default(),
            Err(e) => {
                warn!(
                    "Cannot open {}: {}",
                    self.credentials_path.display(),
                    e
                );
                return Credentials::default();
            }
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(creds) => creds,
            Err(e) => {
                warn!(
                    "Ignoring malformed credentials file {}: {}",
                    self.credentials_path.display(),
                    e
                );
                Credentials::default()
            }
        }
    }

    /// Save credentials, creating the parent directory if needed.
    pub fn save(&self, credentials: &Credentials) -> io::Result<()> {
        if let Some(parent) = self.credentials_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = BufWriter::new(File::create(&self.credentials_path)?);
        serde_json::to_writer_pretty(&mut writer, credentials)?;
        writer.flush()?;
        debug!("Saved credentials to {}", self.credentials_path.display());
        Ok(())
    }

    /// Remove the credentials file. Succeeds if it was already gone.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.credentials_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> CredentialsManager {
        CredentialsManager::with_path(temp_dir.path().join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
    }

    #[test]
    fn test_credentials_default_is_signed_out() {
        let creds = Credentials::default();
        assert!(!creds.has_token());
        assert!(!creds.is_valid());
        assert_eq!(creds.usable_token(), None);
    }

    #[test]
    fn test_empty_token_is_not_a_token() {
        let creds = Credentials::with_token("");
        assert!(!creds.has_token());
    }

    #[test]
    fn test_no_expiry_is_live() {
        let creds = Credentials::with_token("tok");
        assert!(!creds.is_expired());
        assert_eq!(creds.usable_token(), Some("tok"));
    }

    #[test]
    fn test_expired_token_not_usable() {
        let creds = Credentials {
            expires_at: Some(0),
            ..Credentials::with_token("tok")
        };
        assert!(creds.is_expired());
        assert_eq!(creds.usable_token(), None);
    }

    #[test]
    fn test_future_expiry_is_valid() {
        let creds = Credentials {
            expires_at: Some(chrono::Utc::now().timestamp() + 3600),
            ..Credentials::with_token("tok")
        };
        assert!(creds.is_valid());
    }

    #[test]
    fn test_load_nonexistent_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        assert_eq!(manager.load(), Credentials::default());
    }

    #[test]
    fn test_save_load_clear() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let creds = Credentials {
            access_token: Some("access".to_string()),
            refresh_token: Some("refresh".to_string()),
            expires_at: Some(1234567890),
            user_id: Some("seller-42".to_string()),
            role: Some(DashboardRole::BranchManager),
        };

        manager.save(&creds).unwrap();
        assert!(manager.credentials_path().exists());
        assert_eq!(manager.load(), creds);

        manager.clear().unwrap();
        assert!(!manager.credentials_path().exists());
        manager.clear().unwrap();
    }

    #[test]
    fn test_load_invalid_json_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::create_dir_all(manager.credentials_path().parent().unwrap()).unwrap();
        fs::write(manager.credentials_path(), "not valid json").unwrap();

        assert_eq!(manager.load(), Credentials::default());
    }

    #[test]
    fn test_role_serialization() {
        let json = r#"{"access_token":"t","role":"branch_manager"}"#;
        let creds: Credentials = serde_json::from_str(json).unwrap();
        assert_eq!(creds.role, Some(DashboardRole::BranchManager));
        assert_eq!(creds.expires_at, None);
    }
}
