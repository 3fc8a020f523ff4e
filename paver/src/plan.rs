//! Capacity planner.
//!
//! Converts free-space measurements plus optional requested counts
//! into a per-directory plot allocation, partitioning directories
//! into usable and useless (zero capacity) sets.

use std::path::PathBuf;

use crate::errors::PaverResult;
use crate::usage::UsageOracle;

pub const GIB: u64 = 1 << 30;

/// On-disk footprint of one plot file. Fixed by the external plot
/// format, not user-configurable.
pub const PLOT_UNIT_BYTES: u64 = 32 * GIB;

/// Units of headroom withheld from every directory so the miner never
/// runs a volume to exactly zero free space.
pub const RESERVED_UNITS: u64 = 3;

/// One usable directory with its resolved plot count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanEntry {
    pub dir: PathBuf,
    pub count: u32,
}

/// Planner output. Input order is preserved in both partitions.
#[derive(Clone, Debug, Default)]
pub struct CapacityPlan {
    pub usable: Vec<PlanEntry>,
    pub useless: Vec<PathBuf>,
}

/// Resolve the plot count for one directory.
///
/// `max = floor(free / unit) - reserved`, clamped to >= 0. A requested
/// count of 0 means "auto" (take the maximum); otherwise the requested
/// count is honoured up to the maximum.
pub fn resolve_count(free_bytes: u64, requested: u32) -> u32 {
    let max_units = (free_bytes / PLOT_UNIT_BYTES).saturating_sub(RESERVED_UNITS);
    let max_units = u32::try_from(max_units).unwrap_or(u32::MAX);
    if requested == 0 {
        max_units
    } else {
        requested.min(max_units)
    }
}

/// Plan plot allocation across all target directories.
///
/// Directories are planned independently and in input order. A
/// zero-capacity directory lands in `useless` rather than failing the
/// plan; deciding whether an all-useless plan is fatal is left to the
/// caller. An oracle error aborts the whole plan.
pub fn plan(
    oracle: &dyn UsageOracle,
    dirs: &[PathBuf],
    requested: &[u32],
) -> PaverResult<CapacityPlan> {
    debug_assert_eq!(dirs.len(), requested.len());

    let mut out = CapacityPlan::default();
    for (dir, &want) in dirs.iter().zip(requested) {
        let free = oracle.free_bytes(dir)?;
        let count = resolve_count(free, want);
        tracing::debug!(
            path = %dir.display(),
            free_gib = free / GIB,
            requested = want,
            resolved = count,
            "planned plot directory"
        );
        if count > 0 {
            out.usable.push(PlanEntry {
                dir: dir.clone(),
                count,
            });
        } else {
            out.useless.push(dir.clone());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PaverError;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::path::Path;

    struct FixedUsage(HashMap<PathBuf, u64>);

    impl UsageOracle for FixedUsage {
        fn free_bytes(&self, path: &Path) -> PaverResult<u64> {
            self.0
                .get(path)
                .copied()
                .ok_or_else(|| PaverError::DiskUsage {
                    path: path.to_path_buf(),
                    reason: "unknown path".into(),
                })
        }
    }

    #[test]
    fn test_resolve_count_auto() {
        assert_eq!(resolve_count(35 * PLOT_UNIT_BYTES, 0), 32);
        assert_eq!(resolve_count(4 * PLOT_UNIT_BYTES, 0), 1);
        assert_eq!(resolve_count(3 * PLOT_UNIT_BYTES, 0), 0);
        assert_eq!(resolve_count(2 * PLOT_UNIT_BYTES, 0), 0);
        assert_eq!(resolve_count(0, 0), 0);
    }

    #[test]
    fn test_resolve_count_requested_clamped() {
        // Plenty of space: requested count honoured.
        assert_eq!(resolve_count(100 * PLOT_UNIT_BYTES, 10), 10);
        // Tight space: clamped to the maximum.
        assert_eq!(resolve_count(10 * PLOT_UNIT_BYTES, 10), 7);
        // No space at all: clamped to zero.
        assert_eq!(resolve_count(PLOT_UNIT_BYTES, 10), 0);
    }

    #[test]
    fn test_plan_partitions_and_preserves_order() {
        let a = PathBuf::from("/plots/a");
        let b = PathBuf::from("/plots/b");
        let c = PathBuf::from("/plots/c");
        let oracle = FixedUsage(HashMap::from([
            (a.clone(), 35 * PLOT_UNIT_BYTES),
            (b.clone(), 2 * PLOT_UNIT_BYTES),
            (c.clone(), 5 * PLOT_UNIT_BYTES),
        ]));

        let plan = plan(&oracle, &[a.clone(), b.clone(), c.clone()], &[0, 0, 0]).unwrap();
        assert_eq!(
            plan.usable,
            vec![
                PlanEntry { dir: a, count: 32 },
                PlanEntry { dir: c, count: 2 },
            ]
        );
        assert_eq!(plan.useless, vec![b]);
    }

    #[test]
    fn test_plan_all_useless_is_not_an_error() {
        let a = PathBuf::from("/plots/a");
        let oracle = FixedUsage(HashMap::from([(a.clone(), 2 * PLOT_UNIT_BYTES)]));

        let plan = plan(&oracle, &[a.clone()], &[0]).unwrap();
        assert!(plan.usable.is_empty());
        assert_eq!(plan.useless, vec![a]);
    }

    #[test]
    fn test_plan_oracle_error_aborts() {
        let oracle = FixedUsage(HashMap::new());
        let err = plan(&oracle, &[PathBuf::from("/plots/a")], &[0]).unwrap_err();
        assert!(matches!(err, PaverError::DiskUsage { .. }));
    }

    proptest! {
        /// Auto-resolved capacity never decreases as free space grows.
        #[test]
        fn prop_resolved_monotone_in_free_space(f1 in 0u64..(1 << 50), delta in 0u64..(1 << 50)) {
            let lo = resolve_count(f1, 0);
            let hi = resolve_count(f1 + delta, 0);
            prop_assert!(hi >= lo);
        }

        /// An explicit request is an upper bound on the resolution.
        #[test]
        fn prop_resolved_never_exceeds_request(free in 0u64..(1 << 50), req in 1u32..10_000) {
            prop_assert!(resolve_count(free, req) <= req);
        }
    }
}
