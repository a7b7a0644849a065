//! Status command implementation.

use super::{ConnectArgs, OutputFormat};
use crate::adapters::etcd::EtcdAuthClient;
use crate::adapters::AuthSource;
use crate::core::config::Config;
use crate::core::context::DumpContext;
use crate::core::error::UpstreamCall;
use anyhow::{Context, Result};
use clap::Args;

/// Show auth status.
#[derive(Args, Debug, Clone, Default)]
pub struct StatusArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Run the status command.
pub async fn run_status(args: &StatusArgs, config: &Config) -> Result<()> {
    let client = EtcdAuthClient::connect(config)
        .await
        .with_context(|| format!("failed to connect to {}", config.endpoints.join(",")))?;

    let ctx = DumpContext::new().with_timeout(config.command_timeout());
    let status = ctx
        .run(UpstreamCall::AuthStatus, client.auth_status())
        .await?;

    match args.format {
        OutputFormat::Text => {
            println!("Auth enabled:  {}", status.enabled);
            println!("Auth revision: {}", status.revision);
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "enabled": status.enabled,
                "revision": status.revision,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}
