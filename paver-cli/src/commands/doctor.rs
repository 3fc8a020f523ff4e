use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use paver::SystemUsage;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Miner config file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Plot directories, separated by comma
    #[arg(long)]
    pub dirs: String,
}

pub fn execute(args: DoctorArgs) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    paver::run_doctor(&args.config, &args.dirs, &SystemUsage, &mut out)?;
    out.flush()?;
    Ok(())
}
