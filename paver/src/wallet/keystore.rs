//! On-disk keystore file format.
//!
//! A single JSON document holding the sealed master seed and the plot
//! key ordinal cursor. The seed is sealed with ChaCha20-Poly1305 under
//! an HKDF-SHA256 key derived from the private password; the public
//! password is bound via a check digest so a wrong one is rejected
//! before any key material is touched.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PaverError, PaverResult};

pub const KEYSTORE_FILE: &str = "keystore.json";

pub const KEYSTORE_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeystoreFile {
    pub version: u32,
    /// HKDF salt, hex.
    pub salt: String,
    /// AEAD nonce, hex.
    pub nonce: String,
    /// Sealed 32-byte master seed, hex.
    pub sealed_seed: String,
    /// sha256(salt || pub_password), hex.
    pub pub_check: String,
    /// Ordinal the next generated key will receive. Monotonic across
    /// the lifetime of the keystore, never reset per directory.
    pub next_ordinal: u64,
}

impl KeystoreFile {
    pub fn load(path: &Path) -> PaverResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            PaverError::storage(format!("cannot read keystore {}", path.display()), e)
        })?;
        let file: KeystoreFile = serde_json::from_str(&raw).map_err(|e| {
            PaverError::Config(format!("cannot parse keystore {}: {}", path.display(), e))
        })?;
        if file.version != KEYSTORE_VERSION {
            return Err(PaverError::Config(format!(
                "unsupported keystore version {} in {}",
                file.version,
                path.display()
            )));
        }
        Ok(file)
    }

    pub fn save(&self, path: &Path) -> PaverResult<()> {
        let raw = serde_json::to_string_pretty(self)
            .map_err(|e| PaverError::Config(format!("cannot encode keystore: {}", e)))?;
        fs::write(path, raw).map_err(|e| {
            PaverError::storage(format!("cannot write keystore {}", path.display()), e)
        })
    }
}
