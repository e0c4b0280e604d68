//! In-memory vault used to exercise commands without touching disk

use std::cell::Cell;
use std::collections::HashMap;

use crate::vault::{OpenOptions, Vault, VaultError};

/// A vault that keeps secrets in a map alongside the key they were set with
#[derive(Debug, Default)]
pub struct MemoryVault {
    secrets: HashMap<String, (String, String)>,
    writes: usize,
    reads: Cell<usize>,
}

impl MemoryVault {
    /// Open an empty in-memory store.
    ///
    /// There is never a pre-existing store, so this only succeeds when
    /// `create_if_missing` is set.
    pub fn open(store_name: &str, options: OpenOptions) -> Result<Self, VaultError> {
        if !options.create_if_missing {
            return Err(VaultError::StoreMissing(store_name.into()));
        }
        Ok(Self::default())
    }

    /// Number of `set` calls that reached the vault
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// Number of `get` calls that reached the vault
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Total vault operations performed
    pub fn operations(&self) -> usize {
        self.writes() + self.reads()
    }
}

impl Vault for MemoryVault {
    fn set(&mut self, name: &str, value: &str, encryption_key: &str) -> Result<(), VaultError> {
        self.writes += 1;
        self.secrets.insert(
            name.to_string(),
            (encryption_key.to_string(), value.to_string()),
        );
        Ok(())
    }

    fn get(&self, name: &str, encryption_key: &str) -> Result<String, VaultError> {
        self.reads.set(self.reads.get() + 1);
        match self.secrets.get(name) {
            None => Err(VaultError::NotFound(name.to_string())),
            Some((key, _)) if key != encryption_key => Err(VaultError::WrongKey(name.to_string())),
            Some((_, value)) => Ok(value.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_requires_create() {
        assert!(MemoryVault::open("mem", OpenOptions::default()).is_err());
        assert!(MemoryVault::open(
            "mem",
            OpenOptions {
                create_if_missing: true
            }
        )
        .is_ok());
    }

    #[test]
    fn test_set_get_counts() {
        let mut vault = MemoryVault::default();
        vault.set("db", "s3cr3t", "masterkey").unwrap();

        assert_eq!(vault.get("db", "masterkey").unwrap(), "s3cr3t");
        assert!(matches!(vault.get("db", "wrongkey"), Err(VaultError::WrongKey(_))));
        assert!(matches!(vault.get("other", "masterkey"), Err(VaultError::NotFound(_))));

        assert_eq!(vault.writes(), 1);
        assert_eq!(vault.reads(), 3);
    }
}
