//! Callback handles and the self-removing `once` wrapper.
//!
//! A [`Callback`] is a reference-counted handle around a handler function.
//! Cloning a callback clones the handle, not the function, and two callbacks
//! compare equal only when they point at the same handler. This identity is
//! what [`Emitter::off`](crate::Emitter::off) matches on, so callers keep a
//! clone of the handle they registered if they want to remove it later.
//!
//! # Example
//!
//! ```
//! use wirehook_emitter::{Callback, Emitter};
//!
//! let emitter = Emitter::new();
//! let log = Callback::new(|emitter: &Emitter, params| {
//!     println!("{} saw {:?}", emitter.id(), params);
//! });
//!
//! emitter.on("saved", log.clone());
//! emitter.off("saved", &log);
//! assert_eq!(emitter.hook_count("saved"), 0);
//! ```

use core::fmt;
use core::marker::PhantomData;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use crate::emitter::Emitter;
use crate::error::{HookError, IntoHookResult};
use crate::params::Params;

/// Type-erased callback body.
///
/// `ctx` is the emitter that owns the registration being invoked.
trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: &Emitter, params: Params) -> Result<(), HookError>;

    /// Whether this handler stands in for `callback` (used by `once` wrappers).
    fn wraps(&self, _callback: &Callback) -> bool {
        false
    }
}

struct FnHandler<F, R> {
    func: F,
    _marker: PhantomData<fn() -> R>,
}

impl<F, R> Handler for FnHandler<F, R>
where
    F: Fn(&Emitter, Params) -> R + Send + Sync + 'static,
    R: IntoHookResult + 'static,
{
    fn call(&self, ctx: &Emitter, params: Params) -> Result<(), HookError> {
        (self.func)(ctx, params).into_hook_result()
    }
}

/// Handler registered by [`Emitter::once`](crate::Emitter::once).
///
/// Disarms before running the original, so a re-entrant `fire` of the same
/// hook from inside the original never reaches it twice. After the original
/// returns, the wrapper removes its own registration from the invocation
/// context through the weak reference to itself.
struct OnceHandler {
    hook: String,
    original: Callback,
    armed: AtomicBool,
    this: Weak<OnceHandler>,
}

impl Handler for OnceHandler {
    fn call(&self, ctx: &Emitter, params: Params) -> Result<(), HookError> {
        if !self.armed.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        let result = self.original.invoke(ctx, params);

        if let Some(this) = self.this.upgrade() {
            let handler: Arc<dyn Handler> = this;
            ctx.off(&self.hook, &Callback { handler });
        }

        result
    }

    fn wraps(&self, callback: &Callback) -> bool {
        self.original.matches(callback)
    }
}

/// A registered hook callback.
///
/// Build one from any `Fn(&Emitter, Params)` returning `()` or
/// `Result<(), HookError>`. The `&Emitter` argument is the emitter that owns
/// the registration, which for wired dispatch is the wired emitter rather
/// than the one `fire` was called on.
#[derive(Clone)]
pub struct Callback {
    handler: Arc<dyn Handler>,
}

impl Callback {
    /// Wraps a function as a callback.
    pub fn new<F, R>(func: F) -> Self
    where
        F: Fn(&Emitter, Params) -> R + Send + Sync + 'static,
        R: IntoHookResult + 'static,
    {
        Self {
            handler: Arc::new(FnHandler {
                func,
                _marker: PhantomData,
            }),
        }
    }

    /// Wraps `original` so that it runs at most once for `hook`.
    pub(crate) fn once(hook: impl Into<String>, original: Callback) -> Self {
        let hook = hook.into();
        let handler = Arc::new_cyclic(|this: &Weak<OnceHandler>| OnceHandler {
            hook,
            original,
            armed: AtomicBool::new(true),
            this: this.clone(),
        });
        Self { handler }
    }

    /// Runs the callback with `ctx` as invocation context.
    pub(crate) fn invoke(&self, ctx: &Emitter, params: Params) -> Result<(), HookError> {
        self.handler.call(ctx, params)
    }

    /// Returns `true` if both handles point at the same handler.
    #[must_use]
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Arc::ptr_eq(&self.handler, &other.handler)
    }

    /// Identity check used by `off`: the same handler, or a `once` wrapper
    /// around it.
    pub(crate) fn matches(&self, other: &Callback) -> bool {
        self.ptr_eq(other) || self.handler.wraps(other)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Callback {}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&Arc::as_ptr(&self.handler).cast::<()>())
            .finish()
    }
}
