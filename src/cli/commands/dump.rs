//! Dump command implementation.

use super::{ConnectArgs, OutputFormat};
use crate::adapters::etcd::EtcdAuthClient;
use crate::core::config::{Config, ConfigOverrides};
use crate::core::context::DumpContext;
use crate::core::error::DumpError;
use crate::dump::{AuthDump, Dumper};
use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Print the commands that recreate the auth configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct DumpArgs {
    #[command(flatten)]
    pub connect: ConnectArgs,

    /// Skip the dump when the auth revision still equals this value.
    #[arg(long, conflicts_with = "revision_file")]
    pub prior_revision: Option<u64>,

    /// File holding the revision of the previous dump. Read before and
    /// rewritten after a successful dump. A missing file means no prior dump.
    #[arg(long)]
    pub revision_file: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Program name printed before each command.
    #[arg(long)]
    pub command_prefix: Option<String>,
}

impl DumpArgs {
    /// Configuration overrides carried by these flags.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            command_prefix: self.command_prefix.clone(),
            ..self.connect.overrides()
        }
    }
}

/// Run the dump command.
pub async fn run_dump(args: &DumpArgs, config: &Config) -> Result<()> {
    let prior = match &args.revision_file {
        Some(path) => read_revision_file(path)?,
        None => args.prior_revision.unwrap_or(0),
    };

    let client = EtcdAuthClient::connect(config)
        .await
        .with_context(|| format!("failed to connect to {}", config.endpoints.join(",")))?;

    let ctx = DumpContext::new().with_timeout(config.command_timeout());
    let cancel = ctx.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling dump");
            cancel.cancel();
        }
    });

    let result = Dumper::new(&client).dump(&ctx, prior).await;
    interrupt.abort();

    let dump = match result {
        Ok(dump) => dump,
        Err(DumpError::Unchanged { revision }) => {
            tracing::info!(revision, "auth configuration unchanged, nothing to dump");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    write_dump(&dump, args.format, &config.output.command_prefix)?;

    if let Some(path) = &args.revision_file {
        write_revision_file(path, dump.revision)?;
    }
    Ok(())
}

fn write_dump(dump: &AuthDump, format: OutputFormat, prefix: &str) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => {
            for line in &dump.commands {
                writeln!(out, "{}", prefixed(prefix, line))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, dump)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Join the program prefix and a command line.
pub fn prefixed(prefix: &str, line: &str) -> String {
    if prefix.is_empty() {
        line.to_string()
    } else {
        format!("{} {}", prefix, line)
    }
}

/// Read the revision recorded by a previous dump. A missing file is 0.
pub fn read_revision_file(path: &Path) -> Result<u64> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to read revision file: {}", path.display()))
        }
    };
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse()
        .with_context(|| format!("invalid revision in {}: {:?}", path.display(), trimmed))
}

/// Record the revision of a successful dump for the next run.
pub fn write_revision_file(path: &Path, revision: u64) -> Result<()> {
    std::fs::write(path, format!("{}\n", revision))
        .with_context(|| format!("failed to write revision file: {}", path.display()))
}
