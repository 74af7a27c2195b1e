// src/config.rs

//! Manages client configuration: loading, defaults, and validation.

use crate::core::queue::OverflowPolicy;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Bounds and overflow behavior of the outbound command queue.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QueueConfig {
    /// Maximum number of queued commands.
    #[serde(default = "default_queue_capacity")]
    pub capacity: usize,
    /// What `enqueue` does when the queue is full.
    #[serde(default)]
    pub overflow: OverflowPolicy,
    /// Whether queued commands are discarded when the connection drops.
    /// Discovery restarts from scratch on reconnect either way.
    #[serde(default = "default_purge_on_disconnect")]
    pub purge_on_disconnect: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: default_queue_capacity(),
            overflow: OverflowPolicy::default(),
            purge_on_disconnect: default_purge_on_disconnect(),
        }
    }
}

fn default_queue_capacity() -> usize {
    64
}
fn default_purge_on_disconnect() -> bool {
    true
}

/// Reconnect pacing. The retry delay doubles per consecutive failure from
/// `initial_delay` up to `max_delay` and resets on a successful connect.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReconnectConfig {
    #[serde(default = "default_initial_delay", with = "humantime_serde")]
    pub initial_delay: Duration,
    #[serde(default = "default_max_delay", with = "humantime_serde")]
    pub max_delay: Duration,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
        }
    }
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(500)
}
fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

/// The validated client configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// Server host name or address.
    pub server: String,
    /// Server CLI port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Name of the player this client controls, as configured on the server.
    pub player: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Cadence at which queued commands are dispatched, one per tick.
    #[serde(default = "default_tick_interval", with = "humantime_serde")]
    pub tick_interval: Duration,
    /// Bound on a single inbound protocol line.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
}

fn default_port() -> u16 {
    9090
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_tick_interval() -> Duration {
    Duration::from_millis(250)
}
fn default_max_line_len() -> usize {
    4096
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration to ensure logical consistency.
    pub fn validate(&self) -> Result<()> {
        if self.server.trim().is_empty() {
            return Err(anyhow!("server cannot be empty"));
        }
        if self.port == 0 {
            return Err(anyhow!("port cannot be 0"));
        }
        if self.player.trim().is_empty() {
            return Err(anyhow!("player cannot be empty"));
        }
        if self.tick_interval.is_zero() {
            return Err(anyhow!("tick_interval cannot be 0"));
        }
        if self.max_line_len == 0 {
            return Err(anyhow!("max_line_len cannot be 0"));
        }
        if self.queue.capacity == 0 {
            return Err(anyhow!("queue.capacity cannot be 0"));
        }
        if self.reconnect.initial_delay > self.reconnect.max_delay {
            return Err(anyhow!(
                "reconnect.initial_delay cannot exceed reconnect.max_delay"
            ));
        }
        Ok(())
    }

    /// The `host:port` address of the server's CLI endpoint.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }
}
