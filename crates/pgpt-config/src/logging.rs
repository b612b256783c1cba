//! Format of the diagnostics the client writes to stderr.
//!
//! Stdout carries only the server reply, so every tracing event goes to
//! stderr in one of these shapes.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Shape of stderr diagnostic lines.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event, for wrappers that collect stderr.
    Json,
    /// One terse line per event for an operator at a terminal.
    #[default]
    Compact,
}

/// Error returned when text names no [`LogFormat`].
pub type LogFormatParseError = strum::ParseError;
