use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::Config;

/// State shared by every connection.
///
/// Built once at startup and never mutated afterwards, so handlers read it
/// through an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct ServerContext {
    root: PathBuf,
    listen_addr: String,
    diagnostic_prefix: String,
    diagnostic_segments: Vec<String>,
    keep_alive_timeout: Duration,
    max_body_bytes: usize,
}

impl ServerContext {
    /// Canonicalizes the document root and freezes the settings.
    pub fn new(cfg: &Config) -> Result<Self> {
        let configured = &cfg.static_files.root;
        let root = std::fs::canonicalize(configured).with_context(|| {
            format!("document root {} is not accessible", configured.display())
        })?;

        if !root.is_dir() {
            anyhow::bail!("document root {} is not a directory", root.display());
        }

        Ok(Self {
            root,
            listen_addr: cfg.server.listen_addr.clone(),
            diagnostic_prefix: cfg.static_files.diagnostic_prefix.clone(),
            diagnostic_segments: cfg
                .static_files
                .diagnostic_prefix
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            keep_alive_timeout: cfg.server.keep_alive_timeout(),
            max_body_bytes: cfg.server.max_body_bytes,
        })
    }

    /// The canonical document root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn diagnostic_prefix(&self) -> &str {
        &self.diagnostic_prefix
    }

    pub fn echo_enabled(&self) -> bool {
        !self.diagnostic_segments.is_empty()
    }

    /// Whether a normalized path lies under the diagnostic prefix.
    ///
    /// Matching is per segment: with prefix `/test`, `/test` and `/test/x`
    /// match but `/testdir` does not. An empty prefix (or `/`) disables the
    /// echo.
    pub fn is_diagnostic(&self, segments: &[&str]) -> bool {
        self.echo_enabled()
            && segments.len() >= self.diagnostic_segments.len()
            && self
                .diagnostic_segments
                .iter()
                .zip(segments)
                .all(|(prefix, segment)| prefix == segment)
    }

    pub fn keep_alive_timeout(&self) -> Duration {
        self.keep_alive_timeout
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }
}
