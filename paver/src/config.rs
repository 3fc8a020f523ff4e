//! Miner configuration file loading and password shape checks.
//!
//! The config file is JSON; paver only reads the sections it needs
//! (`app.pub_password`, `miner.miner_dir`). Unknown fields are
//! preserved-by-ignoring so the same file can carry the full miner
//! configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{PaverError, PaverResult};

/// Password length bounds (bytes).
const PASSWORD_MIN_LEN: usize = 6;
const PASSWORD_MAX_LEN: usize = 40;

/// Symbols allowed in passwords besides ASCII alphanumerics.
const PASSWORD_SYMBOLS: &[u8] = b"@#$%^&";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MinerConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub miner: MinerSection,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppSection {
    /// Public password protecting the wallet database.
    #[serde(default)]
    pub pub_password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MinerSection {
    /// Directory holding the wallet keystore.
    #[serde(default = "default_miner_dir")]
    pub miner_dir: PathBuf,
}

impl Default for MinerSection {
    fn default() -> Self {
        Self {
            miner_dir: default_miner_dir(),
        }
    }
}

fn default_miner_dir() -> PathBuf {
    PathBuf::from("miner")
}

/// Load and parse the miner config file.
pub fn load_config(path: &Path) -> PaverResult<MinerConfig> {
    let raw = fs::read_to_string(path).map_err(|e| {
        PaverError::storage(format!("cannot read miner config {}", path.display()), e)
    })?;
    let cfg: MinerConfig = serde_json::from_str(&raw).map_err(|e| {
        PaverError::Config(format!(
            "cannot parse miner config {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(cfg)
}

/// Validate the shape of a password: 6-40 bytes, only numbers, letters
/// and the symbols `@#$%^&`.
pub fn check_password(password: &str) -> PaverResult<()> {
    let bytes = password.as_bytes();
    if bytes.len() < PASSWORD_MIN_LEN || bytes.len() > PASSWORD_MAX_LEN {
        return Err(PaverError::Config(format!(
            "password length must be between {} and {}",
            PASSWORD_MIN_LEN, PASSWORD_MAX_LEN
        )));
    }
    if !bytes
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(b))
    {
        return Err(PaverError::Config(
            "password may only contain numbers, letters and the symbols @#$%^&".into(),
        ));
    }
    Ok(())
}
