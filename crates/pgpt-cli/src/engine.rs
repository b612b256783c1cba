//! The single request/response engine shared by every catalog command.

use pgpt_config::ErrorStyle;
use tracing::{debug, info_span};

use crate::catalog::Command;
use crate::command::{Invocation, UsageError};
use crate::response::NormalizedResult;
use crate::transport::{Transport, TransportError};

/// Builds the envelope for `command`, sends it, and normalises the outcome.
///
/// Usage errors are returned before `transport` is touched. Once the
/// envelope exists every failure is folded into the [`NormalizedResult`].
pub(crate) fn invoke<T>(
    command: Command,
    tokens: &[String],
    transport: &T,
    style: ErrorStyle,
) -> Result<NormalizedResult, UsageError>
where
    T: Transport + ?Sized,
{
    let span = info_span!("invoke", %command);
    let _entered = span.enter();

    let invocation = Invocation::build(command, tokens)?;
    let outcome = invocation
        .request
        .to_wire()
        .map_err(TransportError::Serialise)
        .and_then(|payload| transport.send(&invocation.address, &payload));
    if let Err(error) = &outcome {
        debug!(%error, "transport failed");
    }
    Ok(NormalizedResult::from_outcome(outcome, style))
}
