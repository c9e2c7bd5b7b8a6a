//! Error types for hook dispatch.

use thiserror::Error;

/// Errors surfaced by [`Emitter::fire`](crate::Emitter::fire) and the
/// completion adapters.
///
/// A failing callback aborts the remainder of the dispatch it runs in. The
/// error is returned unchanged through nested dispatches, so a callback that
/// re-fires another hook with `?` hands the inner failure straight to the
/// outermost caller.
#[derive(Debug, Error)]
pub enum HookError {
    /// A callback reported a failure.
    #[error("hook handler failed: {0}")]
    Handler(Box<dyn core::error::Error + Send + Sync>),

    /// The dispatch payload could not be serialized or deserialized.
    #[error("params error: {0}")]
    Params(#[from] serde_json::Error),
}

impl HookError {
    /// Creates a [`Handler`](Self::Handler) error.
    ///
    /// Accepts anything convertible into a boxed error, including plain
    /// strings.
    pub fn handler(err: impl Into<Box<dyn core::error::Error + Send + Sync>>) -> Self {
        Self::Handler(err.into())
    }
}

/// Conversion from a callback's return value into a dispatch result.
///
/// Callbacks may return `()` when they cannot fail, or
/// `Result<(), HookError>` when they can.
pub trait IntoHookResult {
    /// Converts `self` into the dispatch result.
    fn into_hook_result(self) -> Result<(), HookError>;
}

impl IntoHookResult for () {
    fn into_hook_result(self) -> Result<(), HookError> {
        Ok(())
    }
}

impl IntoHookResult for Result<(), HookError> {
    fn into_hook_result(self) -> Result<(), HookError> {
        self
    }
}
