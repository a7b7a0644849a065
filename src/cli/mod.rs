//! Command-line interface.

pub mod commands;

use crate::core::config::ConfigOverrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Dump etcd auth configuration as etcdctl commands for an empty cluster.
///
/// Connection settings come from the ETCDCTL_* environment variables, an
/// optional config file, and the flags below. Passwords cannot be dumped.
#[derive(Parser, Debug)]
#[command(name = "etcd-auth-dump")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the commands that recreate the auth configuration.
    Dump(commands::DumpArgs),
    /// Show whether auth is enabled and the current auth revision.
    Status(commands::StatusArgs),
    /// Configuration operations.
    Config(commands::ConfigArgs),
}

impl Cli {
    /// Configuration overrides given on the command line.
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = match &self.command {
            Commands::Dump(args) => args.overrides(),
            Commands::Status(args) => args.connect.overrides(),
            Commands::Config(_) => ConfigOverrides::default(),
        };
        overrides.log_level = self.log_level.clone();
        overrides
    }
}
