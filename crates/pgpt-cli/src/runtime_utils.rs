//! Output helpers for the CLI entrypoints.

use std::io::Write;
use std::process::ExitCode;

use crate::catalog::CommandSpec;
use crate::errors::AppError;
use crate::response::NormalizedResult;
use crate::usage::{command_help, command_list};

pub(crate) fn emit_command_list<W>(stdout: &mut W) -> Result<ExitCode, AppError>
where
    W: Write,
{
    emit_text(stdout, &command_list())?;
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn emit_general_help<W>(stdout: &mut W, help: &str) -> Result<ExitCode, AppError>
where
    W: Write,
{
    emit_text(stdout, help)?;
    Ok(ExitCode::SUCCESS)
}

pub(crate) fn emit_command_help<W>(
    spec: &CommandSpec,
    stdout: &mut W,
) -> Result<ExitCode, AppError>
where
    W: Write,
{
    emit_text(stdout, &command_help(spec))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the one result line of an invocation.
///
/// Transport failures still print their normalised text, then exit with 1.
pub(crate) fn emit_result<W>(
    stdout: &mut W,
    result: &NormalizedResult,
) -> Result<ExitCode, AppError>
where
    W: Write,
{
    emit_text(stdout, result.text())?;
    if result.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Writes `text`, adding a trailing newline only when it lacks one.
fn emit_text<W>(stdout: &mut W, text: &str) -> Result<(), AppError>
where
    W: Write,
{
    stdout
        .write_all(text.as_bytes())
        .map_err(AppError::WriteOutput)?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n").map_err(AppError::WriteOutput)?;
    }
    stdout.flush().map_err(AppError::WriteOutput)
}
