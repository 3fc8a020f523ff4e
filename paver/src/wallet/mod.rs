//! Plot key wallet.
//!
//! The provisioning core treats key material as opaque: it asks a
//! [`KeySource`] for sequentially-ordinaled compressed public keys and
//! never chooses or resets ordinals itself. `Wallet` is the concrete
//! supplier: a password-sealed keystore holding a master seed from
//! which the per-ordinal keys are derived deterministically.

mod keystore;

use std::path::{Path, PathBuf};

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use hkdf::Hkdf;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::errors::{PaverError, PaverResult};

pub use keystore::KEYSTORE_FILE;
use keystore::{KeystoreFile, KEYSTORE_VERSION};

/// Compressed public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 33;

const SEED_LEN: usize = 32;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;

/// HKDF info strings. Changing either breaks every existing keystore.
const SEAL_INFO: &[u8] = b"paver keystore seal v1";
const KEY_INFO: &[u8] = b"paver plot key v1";

/// One generated key record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlotKey {
    /// Supplier-assigned ordinal, monotonically increasing across the
    /// supplier's lifetime.
    pub ordinal: u64,
    pub public_key: [u8; PUBLIC_KEY_LEN],
}

/// Produces sequentially-ordinaled key records on demand.
///
/// A supplier error is non-retryable: it typically indicates an
/// exhausted keyspace or a corrupted store, and aborts the whole
/// provisioning run.
pub trait KeySource {
    fn next_key(&mut self) -> PaverResult<PlotKey>;
}

/// Keystore-backed key supplier.
#[derive(Debug)]
pub struct Wallet {
    seed: [u8; SEED_LEN],
    next_ordinal: u64,
    file: KeystoreFile,
    path: PathBuf,
}

impl Wallet {
    /// Initialise a fresh keystore under `miner_dir`.
    ///
    /// Refuses to touch an existing keystore: the operator must back
    /// it up and remove it first. Overwriting would orphan every plot
    /// file already derived from the old seed.
    pub fn create(miner_dir: &Path, pub_pass: &str, priv_pass: &str) -> PaverResult<Self> {
        std::fs::create_dir_all(miner_dir).map_err(|e| {
            PaverError::storage(
                format!("cannot create miner directory {}", miner_dir.display()),
                e,
            )
        })?;

        let path = miner_dir.join(KEYSTORE_FILE);
        if path.exists() {
            return Err(PaverError::Config(format!(
                "cannot initialize existing wallet keystore {}: back up and remove it first",
                path.display()
            )));
        }

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        let mut seed = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut salt);
        OsRng.fill_bytes(&mut nonce);
        OsRng.fill_bytes(&mut seed);

        let kek = derive_seal_key(priv_pass, &salt);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&kek));
        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), seed.as_ref())
            .map_err(|_| PaverError::KeySource("cannot seal keystore seed".into()))?;

        let file = KeystoreFile {
            version: KEYSTORE_VERSION,
            salt: hex::encode(salt),
            nonce: hex::encode(nonce),
            sealed_seed: hex::encode(sealed),
            pub_check: hex::encode(pub_check(&salt, pub_pass)),
            next_ordinal: 0,
        };
        file.save(&path)?;
        tracing::info!(path = %path.display(), "initialized wallet keystore");

        Ok(Self {
            seed,
            next_ordinal: 0,
            file,
            path,
        })
    }

    /// Open an existing keystore, resuming its ordinal cursor.
    pub fn open(miner_dir: &Path, pub_pass: &str, priv_pass: &str) -> PaverResult<Self> {
        let path = miner_dir.join(KEYSTORE_FILE);
        let file = KeystoreFile::load(&path)?;

        let salt = decode_field(&file.salt, "salt", &path)?;
        let expected = decode_field(&file.pub_check, "pub_check", &path)?;
        if pub_check(&salt, pub_pass).ct_eq(&expected).unwrap_u8() == 0 {
            return Err(PaverError::Config("wrong public password".into()));
        }

        let nonce = decode_field(&file.nonce, "nonce", &path)?;
        let sealed = decode_field(&file.sealed_seed, "sealed_seed", &path)?;
        let kek = derive_seal_key(priv_pass, &salt);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&kek));
        let plain = cipher
            .decrypt(Nonce::from_slice(&nonce), sealed.as_slice())
            .map_err(|_| PaverError::Config("wrong private password".into()))?;
        let seed: [u8; SEED_LEN] = plain
            .try_into()
            .map_err(|_| PaverError::Config(format!("corrupt keystore {}", path.display())))?;

        Ok(Self {
            seed,
            next_ordinal: file.next_ordinal,
            file,
            path,
        })
    }

    /// Write the advanced ordinal cursor back to disk.
    ///
    /// Called once after a generation run fully succeeds; a failed run
    /// burns no ordinals.
    pub fn persist(&mut self) -> PaverResult<()> {
        self.file.next_ordinal = self.next_ordinal;
        self.file.save(&self.path)
    }
}

impl KeySource for Wallet {
    fn next_key(&mut self) -> PaverResult<PlotKey> {
        let ordinal = self.next_ordinal;

        let hk = Hkdf::<Sha256>::new(None, &self.seed);
        let mut info = Vec::with_capacity(KEY_INFO.len() + 8);
        info.extend_from_slice(KEY_INFO);
        info.extend_from_slice(&ordinal.to_be_bytes());

        let mut public_key = [0u8; PUBLIC_KEY_LEN];
        hk.expand(&info, &mut public_key)
            .map_err(|e| PaverError::KeySource(format!("key derivation failed: {}", e)))?;
        // Compressed-point convention for the leading byte.
        public_key[0] = 0x02 | (public_key[PUBLIC_KEY_LEN - 1] & 1);

        self.next_ordinal += 1;
        Ok(PlotKey {
            ordinal,
            public_key,
        })
    }
}

fn derive_seal_key(priv_pass: &str, salt: &[u8]) -> [u8; 32] {
    let hk = Hkdf::<Sha256>::new(Some(salt), priv_pass.as_bytes());
    let mut kek = [0u8; 32];
    hk.expand(SEAL_INFO, &mut kek)
        .expect("32 bytes is a valid hkdf-sha256 output length");
    kek
}

fn pub_check(salt: &[u8], pub_pass: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(pub_pass.as_bytes());
    hasher.finalize().to_vec()
}

fn decode_field(value: &str, field: &str, path: &Path) -> PaverResult<Vec<u8>> {
    hex::decode(value).map_err(|_| {
        PaverError::Config(format!(
            "corrupt keystore {}: bad {} field",
            path.display(),
            field
        ))
    })
}
