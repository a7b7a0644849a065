//! Config command implementation.

use crate::core::config::Config;
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

/// Configuration operations.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the resolved configuration with the password redacted.
    Show {
        /// Output format.
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
    /// Check that the resolved configuration is usable.
    Validate,
}

/// Output format for `config show`.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
}

/// Run the config command against an already resolved configuration.
pub fn run_config(args: &ConfigArgs, config: &Config) -> Result<()> {
    match &args.command {
        ConfigCommand::Show { format } => {
            println!("{}", render_config(config, *format)?);
            Ok(())
        }
        ConfigCommand::Validate => {
            config.validate()?;
            println!("✓ Configuration is valid");
            println!("  Endpoints: {}", config.endpoint_uris().join(", "));
            println!(
                "  Auth:      {}",
                config.user.as_deref().unwrap_or("(none)")
            );
            println!(
                "  TLS:       {}",
                if config.tls.is_enabled() { "enabled" } else { "disabled" }
            );
            Ok(())
        }
    }
}

fn render_config(config: &Config, format: ConfigFormat) -> Result<String> {
    let redacted = config.redacted();
    match format {
        ConfigFormat::Json => Ok(serde_json::to_string_pretty(&redacted)?),
        ConfigFormat::Toml => Ok(toml::to_string_pretty(&redacted)?),
    }
}
