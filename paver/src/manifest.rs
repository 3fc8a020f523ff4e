//! Plot manifest generation.
//!
//! One manifest file per usable directory, listing the key records
//! backing that directory's plots. The format is consumed by the
//! miner and is fixed: one `|`-delimited record per line,
//! `ordinal|addr_hash|pubkey_hex|bit_length`, trailing newline, no
//! header, no checksum.
//!
//! Generation is all-or-nothing across the whole run: if any
//! directory fails, every manifest already written is deleted before
//! the error surfaces.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::errors::{PaverError, PaverResult};
use crate::plan::PlanEntry;
use crate::wallet::{KeySource, PlotKey};

/// Manifest filename inside each plot directory. Fixed by the miner.
pub const PLOT_MANIFEST_FILE: &str = "pks.conf";

/// Bit length recorded for every plot. Fixed by the plot format.
pub const BIT_LENGTH: u32 = 32;

/// Hex-encoded address hash of a compressed public key.
pub fn addr_hash(public_key: &[u8]) -> String {
    hex::encode(Sha256::digest(public_key))
}

fn render_record(key: &PlotKey) -> String {
    format!(
        "{}|{}|{}|{}",
        key.ordinal,
        addr_hash(&key.public_key),
        hex::encode(key.public_key),
        BIT_LENGTH
    )
}

/// Write one manifest per plan entry, pulling keys from `keys`.
///
/// Each manifest is assembled fully in memory and written in one
/// shot, so no partial manifest survives a failed run. On any key
/// supplier or write failure, manifests already written by this call
/// are removed and the original error is returned. Directories are
/// never removed here; that is the caller's rollback.
pub fn write_manifests(entries: &[PlanEntry], keys: &mut dyn KeySource) -> PaverResult<()> {
    let mut written: Vec<PathBuf> = Vec::with_capacity(entries.len());

    let result = (|| {
        for entry in entries {
            let mut lines = Vec::with_capacity(entry.count as usize);
            for _ in 0..entry.count {
                let key = keys.next_key()?;
                lines.push(render_record(&key));
            }

            let path = entry.dir.join(PLOT_MANIFEST_FILE);
            fs::write(&path, lines.join("\n") + "\n").map_err(|e| {
                PaverError::storage(format!("cannot write plot manifest {}", path.display()), e)
            })?;
            tracing::info!(
                path = %path.display(),
                plots = entry.count,
                "wrote plot manifest"
            );
            written.push(path);
        }
        Ok(())
    })();

    if result.is_err() {
        remove_manifests(&written);
    }
    result
}

/// Best-effort removal of manifests written earlier in a failed run.
///
/// Also used by the orchestrator when a step after generation fails:
/// once `write_manifests` has returned, the manifest set is an
/// acquired resource the caller must release on its own failure path.
pub fn remove_manifests(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove plot manifest");
        } else {
            tracing::debug!(path = %path.display(), "removed plot manifest");
        }
    }
}

/// Path of the manifest a directory would hold.
pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(PLOT_MANIFEST_FILE)
}
