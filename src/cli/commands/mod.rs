//! CLI command implementations.

mod config;
mod dump;
mod status;

pub use config::{run_config, ConfigArgs, ConfigCommand, ConfigFormat};
pub use dump::{prefixed, read_revision_file, run_dump, write_revision_file, DumpArgs};
pub use status::{run_status, StatusArgs};

use crate::core::config::{parse_duration, ConfigOverrides};
use clap::{Args, ValueEnum};
use std::time::Duration;

/// Connection flags shared by commands that talk to etcd.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectArgs {
    /// Comma separated etcd endpoints.
    #[arg(long)]
    pub endpoints: Option<String>,

    /// User to authenticate as. The password is read from ETCDCTL_PASSWORD.
    #[arg(long)]
    pub user: Option<String>,

    /// Deadline for the whole command, e.g. `5s` or `500ms`.
    #[arg(long, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,
}

impl ConnectArgs {
    /// Configuration overrides carried by these flags.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            endpoints: self.endpoints.clone(),
            user: self.user.clone(),
            command_timeout: self.timeout,
            ..Default::default()
        }
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, String> {
    parse_duration(raw).map_err(|e| e.to_string())
}

/// Output format for command results.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Initialize the tracing subscriber if the telemetry feature is enabled.
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so stdout
/// carries only command output.
#[cfg(feature = "telemetry")]
pub fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

#[cfg(not(feature = "telemetry"))]
pub fn init_tracing(_level: &str) {}
