//! In-process hook registration, wiring and synchronous dispatch.
//!
//! `wirehook_emitter` provides the [`Emitter`]: a registry of named hooks
//! whose callbacks run synchronously when the hook fires. Emitters can be
//! wired to other emitters so that firing on one also runs the matching
//! callbacks of every emitter wired to it.
//!
//! # Core Concepts
//!
//! - [`Emitter`] - registration (`on`, `once`, `off`), wiring and dispatch
//! - [`Callback`] - identity-comparable callback handle
//! - [`Event`] - one immutable registration record
//! - [`Params`] - payload copied to every callback
//! - [`dispatch`] - static forms taking the target explicitly
//! - [`HookClass`] / [`macro@hooks`] - class-level registration
//! - [`HasEmitter`] / [`macro@fires`] - fire when a method completes
//!
//! # Dispatch Rules
//!
//! - Callbacks for a hook run in registration order.
//! - Local callbacks run before wired ones; wired emitters run in wiring
//!   order, one level deep.
//! - A callback's context is always the emitter that owns its registration.
//! - The first callback error aborts the rest of the dispatch.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use wirehook_emitter::{Callback, Emitter};
//!
//! let first = Emitter::new();
//! let second = Emitter::new();
//! let shared = Emitter::new();
//! first.wire(&shared);
//! second.wire(&shared);
//!
//! let count = Arc::new(AtomicUsize::new(0));
//! let count_clone = Arc::clone(&count);
//! shared.on("x", Callback::new(move |_, _| {
//!     count_clone.fetch_add(1, Ordering::SeqCst);
//! }));
//!
//! first.fire("x")?;
//! second.fire("x")?;
//! assert_eq!(count.load(Ordering::SeqCst), 2);
//! # Ok::<(), wirehook_emitter::HookError>(())
//! ```

// Self-reference so `#[hooks]`/`#[fires]` generated code can use `wirehook_emitter::` paths
// within this crate.
extern crate self as wirehook_emitter;

pub mod adapter;
pub mod callback;
pub mod class;
pub mod dispatch;
pub mod emitter;
pub mod error;
pub mod event;
pub mod params;

pub use callback::Callback;
pub use class::{HasEmitter, HookClass};
pub use emitter::{Emitter, EmitterBuilder, EmitterId, Events, Scope, WeakEmitter};
pub use error::{HookError, IntoHookResult};
pub use event::{Event, EventConfig};
pub use params::Params;

// Re-export proc macros.
pub use hook_macros::{fires, hooks};

/// Re-export all common types for easy access.
pub mod prelude {
    pub use crate::dispatch;
    pub use crate::{
        Callback, Emitter, EmitterBuilder, HasEmitter, HookClass, HookError, Params, Scope, fires,
        hooks,
    };
}
