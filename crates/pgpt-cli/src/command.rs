//! Command envelope construction.
//!
//! This module turns a catalog row and the raw command tokens into the JSON
//! envelope sent to the server. Validation happens here so that an envelope
//! with missing required fields can never be built, let alone serialised.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::args::{ArgumentValue, get_flag, get_list, get_single};
use crate::catalog::{
    Command, CommandSpec, Container, FieldKind, FieldSpec, Presence, SERVER_IP_FLAG,
    SERVER_PORT_FLAG, TOKEN_FLAG,
};

/// Failures detected before any network activity.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum UsageError {
    #[error("{command}: missing required flag(s): {}", .flags.join(", "))]
    MissingFlags {
        command: Command,
        flags: Vec<&'static str>,
    },
    #[error("{command}: --server-port expects a port number, got '{value}'")]
    InvalidPort { command: Command, value: String },
}

impl UsageError {
    pub(crate) const fn command(&self) -> Command {
        match self {
            Self::MissingFlags { command, .. } | Self::InvalidPort { command, .. } => *command,
        }
    }
}

/// Host and port of the command server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ServerAddress {
    pub(crate) host: String,
    pub(crate) port: u16,
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.host, self.port)
    }
}

/// JSON envelope understood by the server.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CommandRequest {
    pub(crate) command: Command,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) arguments: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) attributes: Option<Map<String, Value>>,
}

impl CommandRequest {
    /// Serialises the envelope as a single compact JSON document.
    pub(crate) fn to_wire(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// A fully validated request together with its destination.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Invocation {
    pub(crate) address: ServerAddress,
    pub(crate) request: CommandRequest,
}

impl Invocation {
    /// Validates `tokens` against the catalog row for `command`.
    ///
    /// Every missing required flag is reported at once, in catalog order, so
    /// the operator can fix the invocation in a single pass.
    pub(crate) fn build(command: Command, tokens: &[String]) -> Result<Self, UsageError> {
        let spec = command.spec();
        let mut missing: Vec<&'static str> = Vec::new();

        let host = require(tokens, SERVER_IP_FLAG, &mut missing);
        let port = require(tokens, SERVER_PORT_FLAG, &mut missing);
        let token = if spec.requires_token {
            require(tokens, TOKEN_FLAG, &mut missing)
        } else {
            None
        };
        let fields = collect_fields(spec, tokens, &mut missing);

        if !missing.is_empty() {
            return Err(UsageError::MissingFlags {
                command,
                flags: missing,
            });
        }

        // Both are present once `missing` is empty.
        let (Some(host), Some(port)) = (host, port) else {
            return Err(UsageError::MissingFlags {
                command,
                flags: vec![SERVER_IP_FLAG, SERVER_PORT_FLAG],
            });
        };
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| UsageError::InvalidPort {
                command,
                value: port.to_owned(),
            })?;

        let (arguments, attributes) = match spec.container {
            Container::Arguments => (Some(fields), None),
            Container::Attributes => (None, Some(fields)),
            Container::TopLevel => (None, None),
        };

        Ok(Self {
            address: ServerAddress {
                host: host.to_owned(),
                port,
            },
            request: CommandRequest {
                command,
                token: token.map(str::to_owned),
                arguments,
                attributes,
            },
        })
    }
}

fn require<'a>(
    tokens: &'a [String],
    flag: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<&'a str> {
    let value = get_single(tokens, flag);
    if value.is_none() {
        missing.push(flag);
    }
    value
}

fn collect_fields(
    spec: &CommandSpec,
    tokens: &[String],
    missing: &mut Vec<&'static str>,
) -> Map<String, Value> {
    let mut fields = Map::new();
    for field in spec.fields {
        match resolve_field(field, tokens) {
            Resolved::Value(value) => {
                fields.insert(field.key.to_owned(), Value::from(value));
            }
            Resolved::Omitted => {}
            Resolved::Missing => missing.push(field.flag),
        }
    }
    fields
}

enum Resolved {
    Value(ArgumentValue),
    Omitted,
    Missing,
}

fn resolve_field(field: &FieldSpec, tokens: &[String]) -> Resolved {
    match field.kind {
        FieldKind::Flag => {
            let present = get_flag(tokens, field.flag);
            return Resolved::Value(ArgumentValue::Flag(present));
        }
        FieldKind::List => {
            let values = get_list(tokens, field.flag)
                .into_iter()
                .map(str::to_owned)
                .collect();
            return Resolved::Value(ArgumentValue::List(values));
        }
        FieldKind::Text => {}
    }

    let value = get_single(tokens, field.flag);
    match (field.presence, value) {
        (Presence::Sparse, Some(text)) if text.trim().is_empty() => Resolved::Omitted,
        (_, Some(text)) => Resolved::Value(ArgumentValue::Single(text.to_owned())),
        (Presence::Required, None) => Resolved::Missing,
        (Presence::DefaultText(default), None) => {
            Resolved::Value(ArgumentValue::Single(default.to_owned()))
        }
        (Presence::Sparse | Presence::Implicit, None) => Resolved::Omitted,
    }
}

impl From<ArgumentValue> for Value {
    fn from(value: ArgumentValue) -> Self {
        match value {
            ArgumentValue::Single(text) => Self::String(text),
            ArgumentValue::Flag(flag) => Self::Bool(flag),
            ArgumentValue::List(items) => {
                Self::Array(items.into_iter().map(Self::String).collect())
            }
        }
    }
}
