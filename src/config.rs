// src/config.rs

//! Manages configuration: loading, resolving defaults, and validation.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// The path probed when no `--config` flag is given.
pub const DEFAULT_CONFIG_PATH: &str = "hoststat.toml";

/// How requests and replies are delimited on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Framing {
    /// One read is one request; replies carry no terminator.
    #[default]
    Raw,
    /// Requests and replies are terminated by `\n`.
    Newline,
}

/// Settings for the polling client.
#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    pub server_host: String,
    pub server_port: u16,
    pub interval: Duration,
    pub connect_timeout: Duration,
    /// Upper bound on waiting for one reply after the command is sent.
    pub reply_timeout: Duration,
    pub max_response_bytes: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            server_host: default_server_host(),
            server_port: default_port(),
            interval: default_interval(),
            connect_timeout: default_connect_timeout(),
            reply_timeout: default_reply_timeout(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

/// The `[poller]` table as written in the file. `server_port` falls back to
/// the top-level `port`.
#[derive(Deserialize, Debug)]
struct RawPollerConfig {
    #[serde(default = "default_server_host")]
    server_host: String,
    #[serde(default)]
    server_port: Option<u16>,
    #[serde(with = "humantime_serde", default = "default_interval")]
    interval: Duration,
    #[serde(with = "humantime_serde", default = "default_connect_timeout")]
    connect_timeout: Duration,
    #[serde(with = "humantime_serde", default = "default_reply_timeout")]
    reply_timeout: Duration,
    #[serde(default = "default_max_response_bytes")]
    max_response_bytes: usize,
}

impl Default for RawPollerConfig {
    fn default() -> Self {
        Self {
            server_host: default_server_host(),
            server_port: None,
            interval: default_interval(),
            connect_timeout: default_connect_timeout(),
            reply_timeout: default_reply_timeout(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

/// A raw representation of the config file before validation and resolution.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_command")]
    command: String,
    #[serde(default)]
    framing: Framing,
    #[serde(default = "default_max_request_bytes")]
    max_request_bytes: usize,
    #[serde(default)]
    max_clients: Option<usize>,
    #[serde(default, with = "humantime_serde")]
    read_timeout: Option<Duration>,
    #[serde(with = "humantime_serde", default = "default_shutdown_grace")]
    shutdown_grace: Duration,
    #[serde(default = "default_device_interface")]
    device_interface: String,
    #[serde(default)]
    poller: RawPollerConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    9999
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_command() -> String {
    "GET_DATA".to_string()
}
fn default_max_request_bytes() -> usize {
    1024
}
fn default_shutdown_grace() -> Duration {
    Duration::from_secs(5)
}
fn default_device_interface() -> String {
    "eth0".to_string()
}
fn default_server_host() -> String {
    "127.0.0.1".to_string()
}
fn default_interval() -> Duration {
    Duration::from_secs(60)
}
fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}
fn default_reply_timeout() -> Duration {
    Duration::from_secs(5)
}
fn default_max_response_bytes() -> usize {
    4096
}

/// Represents the final, validated, and resolved configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// The single recognized request token.
    pub command: String,
    pub framing: Framing,
    /// Upper bound on the bytes taken as one request.
    pub max_request_bytes: usize,
    /// `None` leaves concurrent sessions unbounded.
    pub max_clients: Option<usize>,
    /// `None` means an idle session is never evicted.
    pub read_timeout: Option<Duration>,
    pub shutdown_grace: Duration,
    /// Network interface whose MAC address identifies the device.
    pub device_interface: String,
    pub poller: PollerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            command: default_command(),
            framing: Framing::default(),
            max_request_bytes: default_max_request_bytes(),
            max_clients: None,
            read_timeout: None,
            shutdown_grace: default_shutdown_grace(),
            device_interface: default_device_interface(),
            poller: PollerConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        Self::from_toml_str(&contents).with_context(|| format!("Invalid config in '{path}'"))
    }

    /// Parses, resolves and validates configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let raw_config: RawConfig =
            toml::from_str(contents).context("Failed to parse TOML configuration")?;

        let raw_poller = raw_config.poller;
        let config = Config {
            host: raw_config.host,
            port: raw_config.port,
            log_level: raw_config.log_level,
            command: raw_config.command,
            framing: raw_config.framing,
            max_request_bytes: raw_config.max_request_bytes,
            max_clients: raw_config.max_clients,
            read_timeout: raw_config.read_timeout,
            shutdown_grace: raw_config.shutdown_grace,
            device_interface: raw_config.device_interface,
            poller: PollerConfig {
                server_host: raw_poller.server_host,
                server_port: raw_poller.server_port.unwrap_or(raw_config.port),
                interval: raw_poller.interval,
                connect_timeout: raw_poller.connect_timeout,
                reply_timeout: raw_poller.reply_timeout,
                max_response_bytes: raw_poller.max_response_bytes,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given; otherwise loads `hoststat.toml` when present and
    /// falls back to defaults when it is not.
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(DEFAULT_CONFIG_PATH)
            }
            None => Ok(Self::default()),
        }
    }

    /// Validates the resolved configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.host.trim().is_empty() {
            return Err(anyhow!("host cannot be empty"));
        }
        if self.command.is_empty() {
            return Err(anyhow!("command cannot be empty"));
        }
        if self.command.chars().any(char::is_whitespace) {
            // Requests are trimmed before comparison, so such a token could never match.
            return Err(anyhow!("command cannot contain whitespace"));
        }
        if self.max_request_bytes == 0 {
            return Err(anyhow!("max_request_bytes cannot be 0"));
        }
        if self.max_clients == Some(0) {
            return Err(anyhow!("max_clients cannot be 0; omit it for no limit"));
        }
        if self.read_timeout == Some(Duration::ZERO) {
            return Err(anyhow!("read_timeout cannot be 0; omit it for no timeout"));
        }
        if self.device_interface.trim().is_empty() {
            return Err(anyhow!("device_interface cannot be empty"));
        }

        if self.poller.server_host.trim().is_empty() {
            return Err(anyhow!("poller.server_host cannot be empty"));
        }
        if self.poller.server_port == 0 {
            return Err(anyhow!("poller.server_port cannot be 0"));
        }
        if self.poller.interval.is_zero() {
            return Err(anyhow!("poller.interval cannot be 0"));
        }
        if self.poller.reply_timeout.is_zero() {
            return Err(anyhow!("poller.reply_timeout cannot be 0"));
        }
        if self.poller.max_response_bytes == 0 {
            return Err(anyhow!("poller.max_response_bytes cannot be 0"));
        }

        Ok(())
    }
}

