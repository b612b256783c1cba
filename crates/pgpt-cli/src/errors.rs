//! Error types for the CLI runtime.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use pgpt_config::ConfigError;
use thiserror::Error;

use crate::command::UsageError;
use crate::telemetry::TelemetryError;

/// Exit status for invocations rejected before any network activity.
pub(crate) const USAGE_EXIT_CODE: u8 = 2;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[source] ConfigError),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("a command must be provided; run `pgpt --list-commands` to see them")]
    MissingCommand,
    #[error("unknown command '{name}'; run `pgpt --list-commands` to see them")]
    UnknownCommand { name: String },
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error("failed to initialise diagnostics: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] io::Error),
}

impl AppError {
    /// Usage problems exit with 2; every other failure exits with 1.
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::CliUsage(_)
            | Self::MissingCommand
            | Self::UnknownCommand { .. }
            | Self::Usage(_) => ExitCode::from(USAGE_EXIT_CODE),
            Self::LoadConfiguration(_)
            | Self::InvalidConfiguration(_)
            | Self::Telemetry(_)
            | Self::WriteOutput(_) => ExitCode::FAILURE,
        }
    }
}
