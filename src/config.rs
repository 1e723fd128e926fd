//! Configuration for calcd
//!
//! Centralized configuration with sensible defaults.

use std::net::SocketAddr;

use crate::error::{CalcError, Result};

/// Default TCP port the server listens on
pub const DEFAULT_PORT: u16 = 9999;

/// Smallest worker pool the server will run with
pub const MIN_WORKERS: usize = 2;

/// Main configuration for a calcd server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address (all interfaces by default)
    pub listen_addr: String,

    /// Idle read timeout per connection (milliseconds).
    /// A client that sends nothing for this long is disconnected.
    pub read_timeout_ms: u64,

    /// Write timeout per connection (milliseconds), 0 disables it
    pub write_timeout_ms: u64,

    /// Longest request line in bytes, excluding the line break.
    /// Longer lines are skipped and answered with BAD_FORMAT.
    pub max_line_len: usize,

    // -------------------------------------------------------------------------
    // Worker Pool Configuration
    // -------------------------------------------------------------------------
    /// Requested number of worker threads; see [`ServerConfig::effective_workers`]
    pub worker_threads: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{}", DEFAULT_PORT),
            read_timeout_ms: 20_000,
            write_timeout_ms: 20_000,
            max_line_len: 8 * 1024, // 8 KB
            worker_threads: max_workers(),
        }
    }
}

impl ServerConfig {
    /// Create a new config builder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Check the config before binding anything
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.read_timeout_ms == 0 {
            return Err(CalcError::Config(
                "read timeout must be greater than zero".to_string(),
            ));
        }
        if self.max_line_len == 0 {
            return Err(CalcError::Config(
                "max line length must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Parse the listen address
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_addr.parse().map_err(|e| {
            CalcError::Config(format!("invalid listen address {:?}: {}", self.listen_addr, e))
        })
    }

    /// Pool size actually used: `worker_threads` clamped to
    /// `[MIN_WORKERS, max(MIN_WORKERS, available_parallelism)]`
    pub fn effective_workers(&self) -> usize {
        self.worker_threads.clamp(MIN_WORKERS, max_workers())
    }
}

/// Upper bound for the pool: the host's parallelism, but never below the minimum
fn max_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(MIN_WORKERS)
}

/// Builder for ServerConfig
#[derive(Default)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the idle read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the maximum request line length (in bytes)
    pub fn max_line_len(mut self, len: usize) -> Self {
        self.config.max_line_len = len;
        self
    }

    /// Set the requested number of worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}
