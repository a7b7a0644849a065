//! Client configuration parsing and validation.
//!
//! Configuration is resolved in three layers: an optional TOML file, then the
//! `ETCDCTL_*` environment variables etcdctl itself understands, then CLI
//! overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Environment variable names.
pub mod env_keys {
    pub const ENDPOINTS: &str = "ETCDCTL_ENDPOINTS";
    pub const USER: &str = "ETCDCTL_USER";
    pub const PASSWORD: &str = "ETCDCTL_PASSWORD";
    pub const CACERT: &str = "ETCDCTL_CACERT";
    pub const CERT: &str = "ETCDCTL_CERT";
    pub const KEY: &str = "ETCDCTL_KEY";
    pub const DIAL_TIMEOUT: &str = "ETCDCTL_DIAL_TIMEOUT";
    pub const COMMAND_TIMEOUT: &str = "ETCDCTL_COMMAND_TIMEOUT";
}

/// Top-level configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// etcd endpoints, with or without a scheme.
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,

    /// User to authenticate as.
    #[serde(default)]
    pub user: Option<String>,

    /// Password for `user`.
    #[serde(default)]
    pub password: Option<String>,

    /// TLS material.
    #[serde(default)]
    pub tls: TlsConfig,

    /// Connect timeout in milliseconds.
    #[serde(default = "default_dial_timeout_ms")]
    pub dial_timeout_ms: u64,

    /// Deadline for a whole dump in milliseconds.
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// TLS configuration. All paths are PEM files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TlsConfig {
    /// CA bundle used to verify the server.
    pub ca_path: Option<String>,

    /// Client certificate for mTLS.
    pub cert_path: Option<String>,

    /// Client private key for mTLS.
    pub key_path: Option<String>,
}

impl TlsConfig {
    /// Check if any TLS material is configured.
    pub fn is_enabled(&self) -> bool {
        self.ca_path.is_some() || self.cert_path.is_some() || self.key_path.is_some()
    }
}

/// How commands are printed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Program name each printed command is prefixed with.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_command_prefix(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            user: None,
            password: None,
            tls: TlsConfig::default(),
            dial_timeout_ms: default_dial_timeout_ms(),
            command_timeout_ms: default_command_timeout_ms(),
            output: OutputConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoints", &self.endpoints)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("tls", &self.tls)
            .field("dial_timeout_ms", &self.dial_timeout_ms)
            .field("command_timeout_ms", &self.command_timeout_ms)
            .field("output", &self.output)
            .field("log_level", &self.log_level)
            .finish()
    }
}

/// Upper bound for either timeout.
const MAX_TIMEOUT_MS: u64 = 7 * 24 * 60 * 60 * 1000;

// Default value functions

fn default_endpoints() -> Vec<String> {
    vec!["127.0.0.1:2379".to_string()]
}

fn default_dial_timeout_ms() -> u64 {
    2_000
}

fn default_command_timeout_ms() -> u64 {
    30_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_command_prefix() -> String {
    "etcdctl".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| "failed to parse config file")?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).with_context(|| "failed to parse config")?;
        Ok(config)
    }

    /// Resolve the full configuration: file (if any), process environment, overrides.
    pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Apply `ETCDCTL_*` variables read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(endpoints) = lookup(env_keys::ENDPOINTS) {
            self.endpoints = split_endpoints(&endpoints);
        }
        if let Some(user) = lookup(env_keys::USER) {
            // etcdctl accepts "user:password" in a single variable.
            match user.split_once(':') {
                Some((name, password)) => {
                    self.user = Some(name.to_string());
                    self.password = Some(password.to_string());
                }
                None => self.user = Some(user),
            }
        }
        if let Some(password) = lookup(env_keys::PASSWORD) {
            self.password = Some(password);
        }
        if let Some(ca) = lookup(env_keys::CACERT) {
            self.tls.ca_path = Some(ca);
        }
        if let Some(cert) = lookup(env_keys::CERT) {
            self.tls.cert_path = Some(cert);
        }
        if let Some(key) = lookup(env_keys::KEY) {
            self.tls.key_path = Some(key);
        }
        if let Some(timeout) = lookup(env_keys::DIAL_TIMEOUT) {
            self.dial_timeout_ms = parse_duration(&timeout)
                .with_context(|| format!("invalid {}", env_keys::DIAL_TIMEOUT))?
                .as_millis()
                .try_into()
                .unwrap_or(u64::MAX);
        }
        if let Some(timeout) = lookup(env_keys::COMMAND_TIMEOUT) {
            self.command_timeout_ms = parse_duration(&timeout)
                .with_context(|| format!("invalid {}", env_keys::COMMAND_TIMEOUT))?
                .as_millis()
                .try_into()
                .unwrap_or(u64::MAX);
        }
        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref endpoints) = overrides.endpoints {
            self.endpoints = split_endpoints(endpoints);
        }
        if let Some(ref user) = overrides.user {
            self.user = Some(user.clone());
        }
        if let Some(ref timeout) = overrides.command_timeout {
            self.command_timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        }
        if let Some(ref prefix) = overrides.command_prefix {
            self.output.command_prefix = prefix.clone();
        }
        if let Some(ref log_level) = overrides.log_level {
            self.log_level = log_level.clone();
        }
    }

    /// Validate configuration consistency.
    pub fn validate(&self) -> Result<()> {
        self.validate_endpoints()?;
        self.validate_credentials()?;
        self.validate_tls()?;
        self.validate_timeouts()?;
        self.validate_log_level()?;
        Ok(())
    }

    fn validate_endpoints(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            anyhow::bail!("at least one endpoint is required");
        }
        if let Some(empty) = self.endpoints.iter().position(|e| e.trim().is_empty()) {
            anyhow::bail!("endpoints[{}] is empty", empty);
        }
        Ok(())
    }

    fn validate_credentials(&self) -> Result<()> {
        if self.password.is_some() && self.user.is_none() {
            anyhow::bail!("password set without a user");
        }
        if matches!(self.user.as_deref(), Some("")) {
            anyhow::bail!("user must not be empty");
        }
        Ok(())
    }

    fn validate_tls(&self) -> Result<()> {
        match (&self.tls.cert_path, &self.tls.key_path) {
            (Some(_), None) => anyhow::bail!("tls.key_path required when tls.cert_path is set"),
            (None, Some(_)) => anyhow::bail!("tls.cert_path required when tls.key_path is set"),
            _ => Ok(()),
        }
    }

    fn validate_timeouts(&self) -> Result<()> {
        if self.dial_timeout_ms == 0 {
            anyhow::bail!("dial_timeout_ms must be > 0");
        }
        if self.command_timeout_ms == 0 {
            anyhow::bail!("command_timeout_ms must be > 0");
        }
        for (name, value) in [
            ("dial_timeout_ms", self.dial_timeout_ms),
            ("command_timeout_ms", self.command_timeout_ms),
        ] {
            if value > MAX_TIMEOUT_MS {
                anyhow::bail!(
                    "{} must be <= {} (one week), got: {}",
                    name,
                    MAX_TIMEOUT_MS,
                    value
                );
            }
        }
        Ok(())
    }

    fn validate_log_level(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            anyhow::bail!(
                "log_level must be one of {:?}, got: {}",
                valid_levels,
                self.log_level
            );
        }
        Ok(())
    }

    /// Endpoints as URIs, defaulting the scheme from the TLS setting.
    pub fn endpoint_uris(&self) -> Vec<String> {
        let scheme = if self.tls.is_enabled() { "https" } else { "http" };
        self.endpoints
            .iter()
            .map(|e| {
                let e = e.trim();
                if e.contains("://") {
                    e.to_string()
                } else {
                    format!("{}://{}", scheme, e)
                }
            })
            .collect()
    }

    /// Connect timeout.
    pub fn dial_timeout(&self) -> Duration {
        Duration::from_millis(self.dial_timeout_ms)
    }

    /// Deadline for a whole dump.
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Copy with the password removed, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.password.is_some() {
            config.password = Some("<redacted>".to_string());
        }
        config
    }
}

/// CLI override options that can be applied to configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override endpoints (comma separated).
    pub endpoints: Option<String>,
    /// Override user.
    pub user: Option<String>,
    /// Override dump deadline.
    pub command_timeout: Option<Duration>,
    /// Override printed command prefix.
    pub command_prefix: Option<String>,
    /// Override log level.
    pub log_level: Option<String>,
}

fn split_endpoints(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a duration such as `500ms`, `5s`, `2m` or a bare number of seconds.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => raw.split_at(idx),
        None => (raw, "s"),
    };
    let value: u64 = digits
        .parse()
        .with_context(|| format!("invalid duration: {:?}", raw))?;
    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => scaled_secs(value, 60, raw),
        "h" => scaled_secs(value, 3600, raw),
        _ => anyhow::bail!("invalid duration unit in {:?}", raw),
    }
}

fn scaled_secs(value: u64, factor: u64, raw: &str) -> Result<Duration> {
    match value.checked_mul(factor) {
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => anyhow::bail!("duration out of range: {:?}", raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.endpoint_uris(), vec!["http://127.0.0.1:2379"]);
        assert_eq!(config.output.command_prefix, "etcdctl");
    }

    #[test]
    fn test_env_user_with_password() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                (env_keys::ENDPOINTS, "a:2379, b:2379"),
                (env_keys::USER, "root:hunter2"),
            ]))
            .unwrap();
        assert_eq!(config.endpoints, vec!["a:2379", "b:2379"]);
        assert_eq!(config.user.as_deref(), Some("root"));
        assert_eq!(config.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_env_tls_switches_scheme() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                (env_keys::CACERT, "/etc/etcd/ca.pem"),
                (env_keys::DIAL_TIMEOUT, "500ms"),
            ]))
            .unwrap();
        assert_eq!(config.endpoint_uris(), vec!["https://127.0.0.1:2379"]);
        assert_eq!(config.dial_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn test_env_bad_duration() {
        let mut config = Config::default();
        assert!(config
            .apply_env(env(&[(env_keys::COMMAND_TIMEOUT, "soon")]))
            .is_err());
    }

    #[test]
    fn test_explicit_scheme_kept() {
        let config = Config {
            endpoints: vec!["https://etcd:2379".to_string()],
            ..Default::default()
        };
        assert_eq!(config.endpoint_uris(), vec!["https://etcd:2379"]);
    }

    #[test]
    fn test_validation_failures() {
        let config = Config {
            password: Some("x".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tls.cert_path = Some("client.pem".to_string());
        assert!(config.validate().is_err());

        let config = Config {
            endpoints: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_password_redacted() {
        let config = Config {
            user: Some("root".to_string()),
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("hunter2"));
        assert_eq!(config.redacted().password.as_deref(), Some("<redacted>"));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("5").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        let err = parse_duration("999999999999999999h").unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(parse_duration("999999999999999999m").is_err());
        assert!(parse_duration("99999999999999999999s").is_err());
    }

    #[test]
    fn test_huge_env_timeout_rejected_by_validate() {
        let mut config = Config::default();
        config
            .apply_env(env(&[("ETCDCTL_COMMAND_TIMEOUT", "999999999999999h")]))
            .unwrap();
        assert_eq!(config.command_timeout_ms, u64::MAX);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_cap() {
        let config = Config {
            command_timeout_ms: MAX_TIMEOUT_MS,
            ..Default::default()
        };
        config.validate().unwrap();

        let config = Config {
            dial_timeout_ms: MAX_TIMEOUT_MS + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
