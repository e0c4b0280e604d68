//! Vault - Encrypted secrets storage
//!
//! The CLI only talks to a vault through the [`Vault`] trait. [`FileVault`]
//! is the on-disk implementation: each secret is a separate age-encrypted
//! file inside the store directory, sealed with the caller's encryption key
//! as an age passphrase. Secret names are arbitrary strings; the file name is
//! the base64url encoding of the name, so no name can escape the store.

use age::secrecy::Secret;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use std::fs::{self, File, Permissions};
use std::io::{Read, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Vault-specific errors
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Secret not found: {0}")]
    NotFound(String),

    #[error("Wrong encryption key for secret: {0}")]
    WrongKey(String),

    #[error("Vault store does not exist: {}", .0.display())]
    StoreMissing(PathBuf),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(String),

    #[error("Invalid secret name: {0}")]
    InvalidName(String),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}

/// Longest file name most filesystems accept
const MAX_FILE_NAME: usize = 255;

/// Options for opening a vault store
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenOptions {
    /// Initialize an empty store when none exists yet
    pub create_if_missing: bool,
}

/// The contract every secret store satisfies
pub trait Vault {
    /// Store `value` under `name`, encrypted with `encryption_key`.
    /// Any existing entry for `name` is overwritten.
    fn set(&mut self, name: &str, value: &str, encryption_key: &str) -> Result<(), VaultError>;

    /// Retrieve the plaintext stored under `name`.
    ///
    /// Fails when `name` is absent or `encryption_key` is not the key it was
    /// stored with.
    fn get(&self, name: &str, encryption_key: &str) -> Result<String, VaultError>;
}

/// A vault store backed by a directory of age files
#[derive(Debug)]
pub struct FileVault {
    /// Directory for this store's encrypted secrets
    store_dir: PathBuf,
}

impl FileVault {
    /// Open the store `store_name` under `root`.
    ///
    /// Opening is idempotent: an existing store is reused as-is.
    pub fn open(root: &Path, store_name: &str, options: OpenOptions) -> Result<Self, VaultError> {
        validate_store_name(store_name)?;
        let store_dir = root.join(store_name);

        if !store_dir.is_dir() {
            if !options.create_if_missing {
                return Err(VaultError::StoreMissing(store_dir));
            }

            fs::create_dir_all(&store_dir)?;
            fs::set_permissions(&store_dir, Permissions::from_mode(0o700))?;
            debug!(store = %store_dir.display(), "created vault store");
        }

        Ok(Self { store_dir })
    }

    /// Directory holding this store's secrets
    pub fn path(&self) -> &Path {
        &self.store_dir
    }

    /// Get the path for a secret file
    fn secret_path(&self, name: &str) -> Result<PathBuf, VaultError> {
        if name.is_empty() {
            return Err(VaultError::InvalidName("Name cannot be empty".to_string()));
        }

        let file_name = format!("{}.age", URL_SAFE_NO_PAD.encode(name));
        if file_name.len() > MAX_FILE_NAME {
            return Err(VaultError::InvalidName(format!(
                "Name is too long ({} bytes)",
                name.len()
            )));
        }

        Ok(self.store_dir.join(file_name))
    }
}

impl Vault for FileVault {
    fn set(&mut self, name: &str, value: &str, encryption_key: &str) -> Result<(), VaultError> {
        let secret_path = self.secret_path(name)?;

        let encryptor =
            age::Encryptor::with_user_passphrase(Secret::new(encryption_key.to_owned()));

        let mut encrypted = vec![];
        let mut writer = encryptor
            .wrap_output(&mut encrypted)
            .map_err(|e| VaultError::Encryption(e.to_string()))?;

        writer
            .write_all(value.as_bytes())
            .map_err(|e| VaultError::Encryption(e.to_string()))?;

        writer
            .finish()
            .map_err(|e| VaultError::Encryption(e.to_string()))?;

        // Write encrypted data with secure permissions
        let mut file = File::create(&secret_path)?;
        file.write_all(&encrypted)?;
        fs::set_permissions(&secret_path, Permissions::from_mode(0o600))?;

        debug!(name, "stored secret");
        Ok(())
    }

    fn get(&self, name: &str, encryption_key: &str) -> Result<String, VaultError> {
        let secret_path = self.secret_path(name)?;
        if !secret_path.exists() {
            return Err(VaultError::NotFound(name.to_string()));
        }

        let encrypted = fs::read(&secret_path)?;

        let decryptor = match age::Decryptor::new(&encrypted[..])
            .map_err(|e| VaultError::Decryption(e.to_string()))?
        {
            age::Decryptor::Passphrase(d) => d,
            _ => {
                return Err(VaultError::Decryption(
                    "Secret was not sealed with an encryption key".to_string(),
                ))
            }
        };

        let mut reader = decryptor
            .decrypt(&Secret::new(encryption_key.to_owned()), None)
            .map_err(|e| match e {
                age::DecryptError::DecryptionFailed | age::DecryptError::NoMatchingKeys => {
                    VaultError::WrongKey(name.to_string())
                }
                other => VaultError::Decryption(other.to_string()),
            })?;

        let mut decrypted = vec![];
        reader
            .read_to_end(&mut decrypted)
            .map_err(|e| VaultError::Decryption(e.to_string()))?;

        debug!(name, "retrieved secret");
        String::from_utf8(decrypted)
            .map_err(|_| VaultError::Decryption("Secret is not valid UTF-8".to_string()))
    }
}

/// Validate a store name, which is used as a directory name
fn validate_store_name(name: &str) -> Result<(), VaultError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(VaultError::InvalidName(format!("Invalid store name: {:?}", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_vault() -> (FileVault, TempDir) {
        let tmp = TempDir::new().unwrap();
        let vault = FileVault::open(
            tmp.path(),
            "test-store",
            OpenOptions {
                create_if_missing: true,
            },
        )
        .unwrap();
        (vault, tmp)
    }

    #[test]
    fn test_open_creates_store() {
        let (vault, tmp) = temp_vault();
        assert!(vault.path().is_dir());
        assert_eq!(vault.path(), tmp.path().join("test-store"));

        let mode = fs::metadata(vault.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn test_open_missing_store_without_create() {
        let tmp = TempDir::new().unwrap();
        let result = FileVault::open(tmp.path(), "absent", OpenOptions::default());
        assert!(matches!(result, Err(VaultError::StoreMissing(_))));
    }

    #[test]
    fn test_reopen_keeps_secrets() {
        let (mut vault, tmp) = temp_vault();
        vault.set("db", "s3cr3t", "masterkey").unwrap();

        let reopened = FileVault::open(
            tmp.path(),
            "test-store",
            OpenOptions {
                create_if_missing: true,
            },
        )
        .unwrap();
        assert!(reopened.secret_path("db").unwrap().exists());
        assert_eq!(reopened.get("db", "masterkey").unwrap(), "s3cr3t");
    }

    #[test]
    fn test_set_get_and_wrong_key() {
        let (mut vault, _tmp) = temp_vault();

        vault.set("api/openai", "sk-test123", "masterkey").unwrap();
        assert_eq!(vault.get("api/openai", "masterkey").unwrap(), "sk-test123");

        let secret_path = vault.secret_path("api/openai").unwrap();
        let mode = fs::metadata(&secret_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // The plaintext never lands on disk
        let raw = fs::read(&secret_path).unwrap();
        assert!(!raw.windows(10).any(|w| w == b"sk-test123"));

        assert!(vault.get("api/openai", "wrongkey").is_err());
    }

    #[test]
    fn test_overwrite() {
        let (mut vault, _tmp) = temp_vault();

        vault.set("token", "first", "k1").unwrap();
        vault.set("token", "second", "k2").unwrap();

        assert_eq!(vault.get("token", "k2").unwrap(), "second");
    }

    #[test]
    fn test_not_found() {
        let (vault, _tmp) = temp_vault();
        let result = vault.get("nonexistent", "masterkey");
        assert!(matches!(result, Err(VaultError::NotFound(name)) if name == "nonexistent"));
    }

    #[test]
    fn test_arbitrary_names_round_trip() {
        let (mut vault, _tmp) = temp_vault();

        let names = [
            "my db",
            "DB_PASSWORD!",
            "v1..2",
            "user@host",
            "a:b",
            "../escape",
            "/absolute",
            "ключ",
        ];
        for (i, name) in names.iter().enumerate() {
            let value = format!("value-{}", i);
            vault.set(name, &value, "masterkey").unwrap();
            assert_eq!(vault.get(name, "masterkey").unwrap(), value, "{:?}", name);
        }

        // Every secret is a flat file inside the store
        let entries: Vec<_> = fs::read_dir(vault.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), names.len());
        assert!(entries.iter().all(|p| p.is_file() && p.parent() == Some(vault.path())));
    }

    #[test]
    fn test_similar_names_do_not_collide() {
        let (mut vault, _tmp) = temp_vault();

        vault.set("a/b", "slash", "k").unwrap();
        vault.set("a_b", "underscore", "k").unwrap();

        assert_eq!(vault.get("a/b", "k").unwrap(), "slash");
        assert_eq!(vault.get("a_b", "k").unwrap(), "underscore");
    }

    #[test]
    fn test_invalid_names() {
        let (mut vault, _tmp) = temp_vault();

        assert!(matches!(vault.set("", "value", "key"), Err(VaultError::InvalidName(_))));
        let long = "x".repeat(300);
        assert!(matches!(vault.set(&long, "value", "key"), Err(VaultError::InvalidName(_))));
    }

    #[test]
    fn test_invalid_store_names() {
        let tmp = TempDir::new().unwrap();
        let create = OpenOptions {
            create_if_missing: true,
        };

        for store in ["", ".", "..", "a/b"] {
            assert!(FileVault::open(tmp.path(), store, create).is_err(), "{:?}", store);
        }
    }
}
