use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser, Debug)]
#[command(
    name = "paver",
    version,
    about = "Provision plot directories for a proof-of-capacity miner"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plan capacity, initialise the wallet and write plot manifests
    Init(commands::init::InitArgs),
    /// Read-only report on configuration and plot directory capacity
    Doctor(commands::doctor::DoctorArgs),
}
