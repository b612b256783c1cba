//! Normalisation of transport outcomes into printable text.

use pgpt_config::ErrorStyle;
use serde::Serialize;

use crate::transport::TransportError;

const ERROR_STATUS: &str = "error";

/// Outcome of one invocation after the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NormalizedResult {
    /// Reply text exactly as the server sent it.
    Response(String),
    /// Locally synthesised error for a failed transport.
    TransportFailure(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: &'a str,
    message: &'a str,
}

impl NormalizedResult {
    pub(crate) fn from_outcome(outcome: Result<String, TransportError>, style: ErrorStyle) -> Self {
        match outcome {
            Ok(text) => Self::Response(text),
            Err(error) => Self::TransportFailure(render_error(&error.to_string(), style)),
        }
    }

    pub(crate) fn text(&self) -> &str {
        match self {
            Self::Response(text) | Self::TransportFailure(text) => text,
        }
    }

    pub(crate) const fn is_success(&self) -> bool {
        matches!(self, Self::Response(_))
    }
}

fn render_error(message: &str, style: ErrorStyle) -> String {
    match style {
        ErrorStyle::Plain => format!("Error: {message}"),
        ErrorStyle::Structured => {
            let body = ErrorBody {
                status: ERROR_STATUS,
                message,
            };
            serde_json::to_string(&body).unwrap_or_else(|_| format!("Error: {message}"))
        }
    }
}
