use std::path::PathBuf;

use clap::Args;
use paver::provision::{InitOptions, InitSummary};
use paver::SystemUsage;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Miner config file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Private password protecting the wallet keystore
    #[arg(long, env = "PAVER_PRIV_PASS")]
    pub priv_pass: String,

    /// Plot directories, separated by comma
    #[arg(long)]
    pub dirs: String,

    /// Plot count per directory, separated by comma (0 or omitted = auto)
    #[arg(long, default_value = "")]
    pub counts: String,
}

pub fn execute(args: InitArgs) -> anyhow::Result<()> {
    let opts = InitOptions {
        config_file: args.config,
        private_pass: args.priv_pass,
        dirs: args.dirs,
        counts: args.counts,
    };

    let summary = paver::run_init(&opts, &SystemUsage)?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &InitSummary) {
    let results: Vec<String> = summary
        .plots
        .iter()
        .map(|p| format!("  \"directory\": {}, \"plots\": {}", p.dir.display(), p.count))
        .collect();
    let proof_dirs: Vec<String> = summary
        .plots
        .iter()
        .map(|p| format!("      \"{}\"", p.dir.display()))
        .collect();

    println!(
        r#"
Successfully provisioned plot storage with paver!

Summary:
{}

Please update the following items in your miner config file ({}):
{{
  "miner": {{
    "proof_dir": [
{}
    ],
    "private_password": "{}"
  }}
}}

Attention: DO NOT run the miner while paver is provisioning, or plot files may be corrupted.
"#,
        results.join("\n"),
        summary.config_file.display(),
        proof_dirs.join(",\n"),
        summary.private_pass
    );

    if !summary.useless.is_empty() {
        let skipped: Vec<String> = summary
            .useless
            .iter()
            .map(|d| d.display().to_string())
            .collect();
        println!(
            "Warning: the following directories were skipped (not enough space):\n{}\n",
            skipped.join("\n")
        );
    }
}
