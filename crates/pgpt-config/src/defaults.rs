use crate::logging::LogFormat;
use crate::wire::{ErrorStyle, FramingMode};

/// Default log filter expression. Diagnostics stay quiet unless something
/// goes wrong so stdout and stderr carry only the command result.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Read buffer capacity used by the short-read framing heuristic.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default rendering for locally synthesised transport errors.
#[must_use]
pub const fn default_error_style() -> ErrorStyle {
    ErrorStyle::Structured
}

/// Default response framing policy.
#[must_use]
pub const fn default_framing() -> FramingMode {
    FramingMode::ShortRead
}

/// Default read buffer capacity.
#[must_use]
pub const fn default_read_buffer_size() -> usize {
    DEFAULT_READ_BUFFER_SIZE
}
