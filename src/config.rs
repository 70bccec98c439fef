//! Server configuration.
//!
//! Values come from built-in defaults, then an optional YAML file named by
//! the `CONFIG` environment variable, then the `LISTEN`, `DOC_ROOT` and
//! `LOG_LEVEL` environment variables, and finally the port given on the
//! command line.
//!
//! ```yaml
//! server:
//!   listen_addr: "0.0.0.0:8000"
//!   keep_alive_timeout_secs: 5
//!   shutdown_grace_secs: 3
//!   max_body_bytes: 8388608
//! static_files:
//!   root: "./public"
//!   diagnostic_prefix: "/test"
//! log_level: info
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// How long an idle connection waits for its next request.
    pub keep_alive_timeout_secs: u64,
    /// How long in-flight connections may run after a shutdown signal.
    pub shutdown_grace_secs: u64,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub root: PathBuf,
    /// GET paths under this prefix that match no file are echoed back.
    pub diagnostic_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            static_files: StaticFilesConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            keep_alive_timeout_secs: 5,
            shutdown_grace_secs: 3,
            max_body_bytes: 8 * 1024 * 1024,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            diagnostic_prefix: "/test".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from the process environment.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var("CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path))?;
                Self::from_yaml_str(&text)
                    .with_context(|| format!("failed to parse config file {}", path))?
            }
            Err(_) => Self::default(),
        };

        cfg.apply_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies `LISTEN`, `DOC_ROOT` and `LOG_LEVEL` overrides read through
    /// `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("LISTEN") {
            self.server.listen_addr = addr;
        }
        if let Some(root) = lookup("DOC_ROOT") {
            self.static_files.root = PathBuf::from(root);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_level = level;
        }
    }

    /// Replaces the port of the listen address, keeping its host.
    pub fn set_port(&mut self, port: u16) {
        let host = match self.server.listen_addr.rsplit_once(':') {
            Some((host, _)) => host,
            None => self.server.listen_addr.as_str(),
        };
        self.server.listen_addr = format!("{}:{}", host, port);
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid log level {:?}", self.log_level))
    }
}

impl ServerConfig {
    pub fn keep_alive_timeout(&self) -> Duration {
        Duration::from_secs(self.keep_alive_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
