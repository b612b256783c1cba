//! Shared configuration for the PGPT command client.
//!
//! Settings are layered by `ortho_config`: built-in defaults, then an
//! optional TOML file (`--config-path` or `PGPT_CONFIG_PATH`), then `PGPT_*`
//! environment variables, then command-line flags. Nothing here touches the
//! network; the CLI crate turns a loaded [`Config`] into a transport and a
//! telemetry subscriber.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod defaults;
mod logging;
mod wire;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_READ_BUFFER_SIZE, default_error_style, default_framing,
    default_log_filter, default_log_filter_string, default_log_format, default_read_buffer_size,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use ortho_config::OrthoConfig;
pub use wire::{ErrorStyle, FramingMode, WireSettingParseError};

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "PGPT")]
pub struct Config {
    /// Tracing filter directive for diagnostics written to stderr.
    #[ortho_config(default = defaults::default_log_filter_string())]
    pub log_filter: String,
    /// Output format for diagnostics.
    #[ortho_config(default = defaults::default_log_format())]
    pub log_format: LogFormat,
    /// Rendering of locally synthesised transport errors.
    #[ortho_config(default = defaults::default_error_style())]
    pub error_style: ErrorStyle,
    /// Policy deciding when a server reply is complete.
    #[ortho_config(default = defaults::default_framing())]
    pub framing: FramingMode,
    /// Capacity of the read buffer used by the short-read policy.
    #[ortho_config(default = defaults::default_read_buffer_size())]
    pub read_buffer_size: usize,
    /// Optional bound, in seconds, on connect, read, and write operations.
    pub io_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            error_style: default_error_style(),
            framing: default_framing(),
            read_buffer_size: default_read_buffer_size(),
            io_timeout_secs: None,
        }
    }
}

impl Config {
    /// Tracing filter directive.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Diagnostics output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Transport error rendering.
    #[must_use]
    pub const fn error_style(&self) -> ErrorStyle {
        self.error_style
    }

    /// Response framing policy.
    #[must_use]
    pub const fn framing(&self) -> FramingMode {
        self.framing
    }

    /// Read buffer capacity for the short-read policy.
    #[must_use]
    pub const fn read_buffer_size(&self) -> usize {
        self.read_buffer_size
    }

    /// I/O timeout, or `None` when reads may block indefinitely.
    ///
    /// A configured value of zero is treated as unset because the standard
    /// library rejects zero-length socket timeouts.
    #[must_use]
    pub fn io_timeout(&self) -> Option<Duration> {
        self.io_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Rejects settings that load cleanly but cannot drive a transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroReadBuffer`] when the read buffer has no
    /// capacity.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.read_buffer_size == 0 {
            return Err(ConfigError::ZeroReadBuffer);
        }
        Ok(())
    }
}

/// Semantic configuration errors detected after loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The short-read policy needs a non-empty buffer.
    #[error("read_buffer_size must be greater than zero")]
    ZeroReadBuffer,
}
