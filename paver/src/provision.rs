//! Provisioning workflow.
//!
//! Sequences one `init` invocation end to end:
//!
//! ```text
//! validate dirs/counts → create dirs → check emptiness → plan
//!     → load config + passwords → create wallet → write manifests
//!     → persist cursor → summary
//! ```
//!
//! Any failure rolls back, in reverse order of acquisition: manifests
//! already written are removed by the generator itself (or by the
//! orchestrator when the cursor commit fails after generation), then
//! `CleanupGuard` removes the directories this run created. Rollback
//! failures are warnings; the original error always surfaces.

use std::path::PathBuf;

use crate::config;
use crate::errors::{PaverError, PaverResult};
use crate::manifest;
use crate::plan::{self, PlanEntry};
use crate::target;
use crate::usage::UsageOracle;
use crate::wallet::Wallet;

/// Inputs for one provisioning run, as collected by the CLI.
#[derive(Clone, Debug)]
pub struct InitOptions {
    /// Miner config file path.
    pub config_file: PathBuf,
    /// Private password protecting the wallet keystore.
    pub private_pass: String,
    /// Comma-separated plot directory list.
    pub dirs: String,
    /// Comma-separated per-directory plot counts; empty means "auto".
    pub counts: String,
}

/// What a successful run produced. The CLI renders this for the
/// operator.
#[derive(Clone, Debug)]
pub struct InitSummary {
    /// Usable directories with their resolved plot counts, in input
    /// order.
    pub plots: Vec<PlanEntry>,
    /// Directories excluded for zero capacity, in input order.
    pub useless: Vec<PathBuf>,
    pub config_file: PathBuf,
    pub private_pass: String,
}

/// RAII rollback of directories created during this run.
///
/// Armed on construction; `disarm` on success. Dropping while armed
/// removes every registered directory, best-effort.
struct CleanupGuard {
    created: Vec<PathBuf>,
    armed: bool,
}

impl CleanupGuard {
    fn new() -> Self {
        Self {
            created: Vec::new(),
            armed: true,
        }
    }

    fn created_mut(&mut self) -> &mut Vec<PathBuf> {
        &mut self.created
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if !self.armed || self.created.is_empty() {
            return;
        }
        tracing::warn!(
            count = self.created.len(),
            "provisioning failed, removing directories created this run"
        );
        target::remove_created_dirs(&self.created);
    }
}

/// Run the transactional provisioning workflow.
///
/// All-or-nothing: on return with an error, no manifest written this
/// run remains and no directory created this run remains.
pub fn run_init(opts: &InitOptions, oracle: &dyn UsageOracle) -> PaverResult<InitSummary> {
    let dirs = target::parse_target_dirs(&opts.dirs)?;
    let requested = target::parse_plot_counts(&opts.counts, dirs.len())?;

    let mut guard = CleanupGuard::new();
    target::ensure_dirs(&dirs, guard.created_mut())?;
    target::check_empty(&dirs)?;

    let capacity = plan::plan(oracle, &dirs, &requested)?;
    if capacity.usable.is_empty() {
        return Err(PaverError::InsufficientSpace);
    }
    for dir in &capacity.useless {
        tracing::warn!(path = %dir.display(), "plot directory has zero capacity, skipping");
    }

    let cfg = config::load_config(&opts.config_file)?;
    config::check_password(&cfg.app.pub_password)
        .map_err(|e| PaverError::Config(format!("invalid app.pub_password: {}", e)))?;
    config::check_password(&opts.private_pass)
        .map_err(|e| PaverError::Config(format!("invalid private password: {}", e)))?;

    let mut wallet = Wallet::create(
        &cfg.miner.miner_dir,
        &cfg.app.pub_password,
        &opts.private_pass,
    )?;

    generate_plots(&capacity.usable, &mut wallet)?;

    guard.disarm();
    tracing::info!(
        usable = capacity.usable.len(),
        useless = capacity.useless.len(),
        "provisioning complete"
    );

    Ok(InitSummary {
        plots: capacity.usable,
        useless: capacity.useless,
        config_file: opts.config_file.clone(),
        private_pass: opts.private_pass.clone(),
    })
}

/// Generate all manifests and commit the wallet cursor as one unit.
///
/// Once `write_manifests` returns the manifest set is an acquired
/// resource: a failed cursor commit must release it too, or manifests
/// referencing unpersisted ordinals would survive a failed run.
fn generate_plots(entries: &[PlanEntry], wallet: &mut Wallet) -> PaverResult<()> {
    manifest::write_manifests(entries, wallet)?;
    if let Err(e) = wallet.persist() {
        let written: Vec<PathBuf> = entries
            .iter()
            .map(|entry| manifest::manifest_path(&entry.dir))
            .collect();
        manifest::remove_manifests(&written);
        return Err(e);
    }
    Ok(())
}
