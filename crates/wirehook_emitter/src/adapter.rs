//! Fire-on-completion helpers.
//!
//! Used by code generated from `#[fires]`, and usable directly.

use serde::Serialize;

use crate::emitter::Emitter;
use crate::error::HookError;
use crate::params::Params;

/// Serializes `value` and fires `hook` on `target` with it.
pub fn fire_on_completion<T: Serialize + ?Sized>(
    target: &Emitter,
    hook: &str,
    value: &T,
) -> Result<(), HookError> {
    fire_params(target, hook, Params::from_serialize(value))
}

/// Fires `hook` on `target` with an already-built payload.
///
/// A payload error is returned without dispatching.
pub fn fire_params(
    target: &Emitter,
    hook: &str,
    params: Result<Params, HookError>,
) -> Result<(), HookError> {
    let params = params.inspect_err(|err| {
        tracing::warn!(emitter = %target.id(), hook, error = %err, "cannot build completion params");
    })?;
    target.dispatch(hook, &params)
}

/// Logs a completion dispatch failure that cannot be returned to the caller.
pub fn report_failure(target: &Emitter, hook: &str, err: &HookError) {
    tracing::error!(
        emitter = %target.id(),
        label = target.label(),
        hook,
        error = %err,
        "completion hook failed"
    );
}
