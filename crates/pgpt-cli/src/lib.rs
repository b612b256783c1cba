//! Command-line runtime for the PGPT command client.
//!
//! The runtime splits leading configuration flags from the command line,
//! resolves the command against the catalog, builds and sends one JSON
//! envelope over a fresh TCP connection, and prints exactly one result. IO
//! streams and configuration loading can be substituted so the whole path is
//! testable in-process.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::str::FromStr;

use clap::{CommandFactory, Parser};
use pgpt_config::Config;

mod args;
mod catalog;
mod cli;
mod command;
mod config;
mod engine;
mod errors;
mod framing;
mod response;
mod runtime_utils;
mod telemetry;
mod transport;
mod usage;

use catalog::Command;
use cli::Cli;
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
use config::{command_arguments, split_config_arguments};
use errors::AppError;
use runtime_utils::{emit_command_help, emit_command_list, emit_general_help, emit_result};
use transport::TcpTransport;
use usage::usage_line;

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    const fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);
        let cli_arguments = command_arguments(&args, &split);

        let result = match Cli::try_parse_from(cli_arguments) {
            Ok(cli) => self.dispatch(&cli, &split.config_arguments),
            // `--version` arrives as a clap "error" destined for stdout.
            Err(error) if !error.use_stderr() => {
                let _ = write!(self.io.stdout, "{error}");
                Ok(ExitCode::SUCCESS)
            }
            Err(error) => Err(AppError::CliUsage(error)),
        };

        match result {
            Ok(exit_code) => exit_code,
            Err(error) => self.report(&error),
        }
    }

    fn dispatch(
        &mut self,
        cli: &Cli,
        config_arguments: &[OsString],
    ) -> Result<ExitCode, AppError> {
        if cli.list_commands {
            return emit_command_list(self.io.stdout);
        }
        if cli.is_bare_invocation() {
            return Err(AppError::MissingCommand);
        }
        let Some(name) = cli.command.as_deref() else {
            let help = Cli::command().render_long_help().to_string();
            return emit_general_help(self.io.stdout, &help);
        };
        let command = Command::from_str(name).map_err(|_| AppError::UnknownCommand {
            name: name.to_owned(),
        })?;
        if cli.wants_help(command.spec()) {
            return emit_command_help(command.spec(), self.io.stdout);
        }

        let config: Config = self.loader.load(config_arguments)?;
        telemetry::initialise(&config)?;

        let transport = TcpTransport::from_config(&config);
        let result = engine::invoke(command, &cli.arguments, &transport, config.error_style())?;
        emit_result(self.io.stdout, &result)
    }

    fn report(&mut self, error: &AppError) -> ExitCode {
        let _ = writeln!(self.io.stderr, "{error}");
        match error {
            AppError::Usage(usage) => {
                let _ = writeln!(self.io.stderr, "{}", usage_line(usage.command().spec()));
            }
            AppError::MissingCommand => {
                let _ = writeln!(self.io.stderr, "{}", Cli::command().render_usage());
            }
            _ => {}
        }
        error.exit_code()
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}
