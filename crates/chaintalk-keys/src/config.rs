//! Keystore configuration.
//!
//! The keystore does not decide where it lives. The configuration
//! directory is supplied by the caller; the deployed default is
//! `/etc/chaintalk`.

use std::path::{Path, PathBuf};

/// Directory used when nothing else is configured.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/chaintalk";

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "CHAINTALK_CONFIG_DIR";

/// File name of the peer identity inside the configuration directory.
pub const PEER_ID_FILENAME: &str = ".peerId";

/// File name of the swarm key inside the configuration directory.
pub const SWARM_KEY_FILENAME: &str = ".swarmKey";

/// Read-only configuration shared by the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystoreConfig {
    pub config_dir: PathBuf,
}

impl KeystoreConfig {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Read `CHAINTALK_CONFIG_DIR`, falling back to the default directory.
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::default(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn peer_id_path(&self) -> PathBuf {
        self.config_dir.join(PEER_ID_FILENAME)
    }

    pub fn swarm_key_path(&self) -> PathBuf {
        self.config_dir.join(SWARM_KEY_FILENAME)
    }
}

impl Default for KeystoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_DIR)
    }
}
