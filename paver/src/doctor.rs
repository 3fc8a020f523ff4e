//! Read-only capacity diagnosis.
//!
//! The doctor shares the validator and planner arithmetic with the
//! init workflow but has no transactional component: every directory
//! problem is reported and the report moves on to the next directory.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::config;
use crate::errors::{PaverError, PaverResult};
use crate::plan::{resolve_count, GIB};
use crate::target::parse_target_dirs;
use crate::usage::UsageOracle;

/// Write the full doctor report to `out`.
///
/// Only an invalid directory list (or a failed write to `out`) is an
/// error; everything else is a finding in the report. Capacity is
/// always reported at the zero requested-count ("auto") baseline.
pub fn run_doctor(
    config_file: &Path,
    dirs_raw: &str,
    oracle: &dyn UsageOracle,
    out: &mut dyn Write,
) -> PaverResult<()> {
    let dirs = parse_target_dirs(dirs_raw)?;

    let mut report = |line: String| -> PaverResult<()> {
        writeln!(out, "{}", line)
            .map_err(|e| PaverError::storage("cannot write doctor report", e))
    };

    report("Running paver doctor...".into())?;
    report(String::new())?;

    match config::load_config(config_file) {
        Err(e) => report(format!("config error: {}", e))?,
        Ok(cfg) => {
            if cfg.app.pub_password.is_empty() {
                report("config error: app.pub_password cannot be empty".into())?;
            } else if let Err(e) = config::check_password(&cfg.app.pub_password) {
                report(format!("config error: app.pub_password is invalid: {}", e))?;
            }
        }
    }
    report(String::new())?;

    for dir in &dirs {
        report(format!("plot directory: {}", dir.display()))?;

        let occupied = match fs::read_dir(dir) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                report("error: directory does not exist, please create it".into())?;
                report(String::new())?;
                continue;
            }
            Err(e) => {
                report(format!("error: cannot read directory: {}", e))?;
                report(String::new())?;
                continue;
            }
            Ok(mut entries) => entries.next().is_some(),
        };
        if occupied {
            report("error: directory must be empty, please back up and remove its contents".into())?;
            report(String::new())?;
            continue;
        }

        match oracle.free_bytes(dir) {
            Err(e) => report(format!("error: {}", e))?,
            Ok(free) => {
                report(format!("available disk space: {} GiB", free / GIB))?;
                report(format!("max plot count: {}", resolve_count(free, 0)))?;
            }
        }
        report(String::new())?;
    }

    report("End of doctor report.".into())
}
