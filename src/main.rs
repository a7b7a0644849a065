//! etcd-auth-dump - print etcd auth configuration as etcdctl commands.
//!
//! Usage:
//!   etcd-auth-dump dump [--prior-revision N | --revision-file PATH] [--format text|json]
//!   etcd-auth-dump status [--endpoints HOSTS]
//!   etcd-auth-dump config show|validate [--config PATH]

use anyhow::Result;
use authdump::cli::commands::{init_tracing, run_config, run_dump, run_status};
use authdump::cli::{Cli, Commands};
use authdump::config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::resolve(cli.config.as_deref(), &cli.overrides())?;
    init_tracing(&config.log_level);
    tracing::debug!(config = ?config, "configuration resolved");

    let result = match &cli.command {
        Commands::Dump(args) => run_dump(args, &config).await,
        Commands::Status(args) => run_status(args, &config).await,
        Commands::Config(args) => run_config(args, &config),
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        #[cfg(not(feature = "telemetry"))]
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
