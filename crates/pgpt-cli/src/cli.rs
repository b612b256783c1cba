//! Top-level argument definitions.
//!
//! Clap only sees the command name and the switches that precede it. The
//! command's own tokens are captured verbatim and parsed by [`crate::args`].

use clap::Parser;

use crate::args::FLAG_PREFIX;
use crate::catalog::{CommandSpec, FieldKind};

/// Command-line client for the PGPT command server.
#[derive(Parser, Debug)]
#[command(
    name = "pgpt",
    version,
    disable_help_flag = true,
    after_help = "Run `pgpt --list-commands` to see every command, \
                  or `pgpt <COMMAND> --help` for its flags."
)]
pub(crate) struct Cli {
    /// Prints help, or the command's usage when given after a command.
    #[arg(short = 'h', long)]
    pub(crate) help: bool,
    /// Prints the available commands and exits.
    #[arg(long)]
    pub(crate) list_commands: bool,
    /// The server command to run (for example `chat`).
    #[arg(value_name = "COMMAND")]
    pub(crate) command: Option<String>,
    /// Flags passed to the command, such as `--token <TOKEN>`.
    #[arg(
        value_name = "ARG",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub(crate) arguments: Vec<String>,
}

impl Cli {
    /// Returns true when neither a command nor a listing was requested.
    pub(crate) const fn is_bare_invocation(&self) -> bool {
        self.command.is_none() && !self.list_commands && !self.help
    }

    /// Returns true when help was requested for `spec`.
    ///
    /// Once the command's tokens begin, clap stops matching switches, so a
    /// trailing `--help` arrives among the arguments. A token the command
    /// reads as a value is never taken for help: `--question -h` asks "-h".
    pub(crate) fn wants_help(&self, spec: &CommandSpec) -> bool {
        if self.help {
            return true;
        }
        let mut awaiting_value = false;
        let mut in_list = false;
        for argument in &self.arguments {
            if awaiting_value {
                awaiting_value = false;
                continue;
            }
            if argument == "--help" || (argument == "-h" && !in_list) {
                return true;
            }
            if argument.starts_with(FLAG_PREFIX) {
                let kind = spec.flag_kind(argument);
                awaiting_value = kind == Some(FieldKind::Text);
                in_list = kind == Some(FieldKind::List);
            }
        }
        false
    }
}
