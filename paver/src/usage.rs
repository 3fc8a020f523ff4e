//! Disk usage oracle.
//!
//! The planner only needs free bytes per directory; the trait keeps
//! the filesystem query injectable so planning stays testable without
//! real disks.

use std::path::Path;

use sysinfo::Disks;

use crate::errors::{PaverError, PaverResult};

/// Answers "how many bytes are free on the filesystem holding `path`".
pub trait UsageOracle {
    fn free_bytes(&self, path: &Path) -> PaverResult<u64>;
}

/// Oracle backed by the live mount table via `sysinfo`.
///
/// Picks the mounted filesystem with the longest mount-point prefix of
/// the queried path, so nested mounts resolve to the innermost one.
pub struct SystemUsage;

impl UsageOracle for SystemUsage {
    fn free_bytes(&self, path: &Path) -> PaverResult<u64> {
        let disks = Disks::new_with_refreshed_list();

        let mut best: Option<(usize, u64)> = None;
        for disk in disks.list() {
            let mount = disk.mount_point();
            if path.starts_with(mount) {
                let depth = mount.components().count();
                if best.map_or(true, |(d, _)| depth >= d) {
                    best = Some((depth, disk.available_space()));
                }
            }
        }

        best.map(|(_, free)| free).ok_or_else(|| PaverError::DiskUsage {
            path: path.to_path_buf(),
            reason: "no mounted filesystem covers this path".into(),
        })
    }
}
