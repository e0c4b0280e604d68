//! Standard paths used by secretly

use std::path::PathBuf;

/// Standard secretly paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// Data directory (~/.local/share/secretly)
    pub data: PathBuf,
    /// Config directory (~/.config/secretly)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("secretly");

        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("secretly");

        Self { data, config }
    }

    /// Path of the optional JSON config file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Directory holding vault stores
    pub fn vault_dir(&self) -> PathBuf {
        self.data.join("vaults")
    }
}
