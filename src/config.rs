//! Configuration for irrq
//!
//! Centralized configuration with sensible defaults.

use crate::error::{IrrError, Result};

/// Default IRR server
pub const DEFAULT_HOST: &str = "whois.radb.net";

/// Default whois port
pub const DEFAULT_PORT: u16 = 43;

/// Main configuration for an IRR connection
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Server Configuration
    // -------------------------------------------------------------------------
    /// IRR server host name or address
    pub host: String,

    /// IRR server TCP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Session Configuration
    // -------------------------------------------------------------------------
    /// Send `!!` on open so the server keeps the session after each reply
    pub keepalive: bool,

    /// Name sent in the `!n` identification command
    pub client_name: String,

    /// Version sent in the `!n` identification command
    pub client_version: String,

    /// Source databases selected with `!s` during open (None = server default)
    pub sources: Option<Vec<String>>,

    // -------------------------------------------------------------------------
    // Transport Configuration
    // -------------------------------------------------------------------------
    /// Connect timeout (milliseconds, 0 = none)
    pub connect_timeout_ms: u64,

    /// Read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,

    /// Max bytes requested per read
    pub read_chunk_size: usize,

    /// Largest payload length accepted from an `A` status line (in bytes)
    pub max_payload_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            keepalive: true,
            client_name: "irrq".to_string(),
            client_version: crate::VERSION.to_string(),
            sources: None,
            connect_timeout_ms: 0,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            read_chunk_size: 4096,
            max_payload_size: 64 * 1024 * 1024, // 64 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// `host:port` as used for resolution and log messages
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Identification string sent with `!n`
    pub fn client_id(&self) -> String {
        format!("{}-{}", self.client_name, self.client_version)
    }

    /// Check the values a connection cannot work without
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(IrrError::Config("host must not be empty".to_string()));
        }
        if self.read_chunk_size == 0 {
            return Err(IrrError::Config(
                "read_chunk_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Enable or disable `!!` on open
    pub fn keepalive(mut self, enabled: bool) -> Self {
        self.config.keepalive = enabled;
        self
    }

    /// Set the identification name
    pub fn client_name(mut self, name: impl Into<String>) -> Self {
        self.config.client_name = name.into();
        self
    }

    /// Set the identification version
    pub fn client_version(mut self, version: impl Into<String>) -> Self {
        self.config.client_version = version.into();
        self
    }

    /// Select source databases on open
    pub fn sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.sources = Some(sources.into_iter().map(Into::into).collect());
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the max bytes per read
    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.config.read_chunk_size = size;
        self
    }

    /// Set the largest accepted payload (in bytes)
    pub fn max_payload_size(mut self, size: usize) -> Self {
        self.config.max_payload_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
