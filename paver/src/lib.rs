//! paver - capacity provisioning for proof-of-capacity plot storage.
//!
//! Converts a set of target directories and optional per-directory
//! plot counts into a validated, capacity-aware allocation plan, then
//! materializes that plan as generated key manifests on disk,
//! atomically with respect to partial failure:
//!
//! - [`target`] validates the directory/count lists and manages
//!   directory lifecycle (create, emptiness guard, rollback).
//! - [`usage`] answers free-space queries ([`usage::UsageOracle`]).
//! - [`plan`] computes how many 32 GiB plot units each directory can
//!   safely hold and partitions directories into usable and useless.
//! - [`wallet`] supplies sequentially-ordinaled plot keys
//!   ([`wallet::KeySource`]).
//! - [`manifest`] writes one key manifest per usable directory, with
//!   rollback of partial output.
//! - [`provision`] sequences it all into an all-or-nothing `init`
//!   run; [`doctor`] is the read-only diagnostic counterpart.

pub mod config;
pub mod doctor;
pub mod errors;
pub mod manifest;
pub mod plan;
pub mod provision;
pub mod target;
pub mod usage;
pub mod wallet;

pub use doctor::run_doctor;
pub use errors::{PaverError, PaverResult};
pub use provision::{run_init, InitOptions, InitSummary};
pub use usage::{SystemUsage, UsageOracle};
