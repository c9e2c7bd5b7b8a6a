//! In-process named hooks with emitter wiring and synchronous dispatch.
//!

/// Hook registration, wiring and dispatch.
pub use wirehook_emitter;

pub use wirehook_emitter::{
    Callback, Emitter, EmitterBuilder, HasEmitter, HookClass, HookError, Params, Scope, adapter,
    dispatch, fires, hooks,
};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use wirehook_emitter::prelude::*;
}
