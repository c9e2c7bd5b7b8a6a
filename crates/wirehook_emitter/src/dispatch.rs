//! Static forms of the emitter operations.
//!
//! These free functions take the target emitter explicitly. They share the
//! registration and dispatch code of the instance methods; the only extra
//! capability is writing into the class-level registry with [`Scope::Class`],
//! which is what class-level registration (see [`HookClass`](crate::HookClass)
//! and the `#[hooks]` attribute) uses.
//!
//! # Example
//!
//! ```
//! use wirehook_emitter::{Callback, Emitter, Params, Scope, dispatch};
//!
//! let emitter = Emitter::new();
//! dispatch::on("ping", Callback::new(|_, _| {}), &emitter, Scope::Instance);
//! dispatch::fire("ping", &emitter, Params::new())?;
//! # Ok::<(), wirehook_emitter::HookError>(())
//! ```

use crate::callback::Callback;
use crate::emitter::{Emitter, Scope};
use crate::error::HookError;
use crate::params::Params;

/// Registers `callback` for `hook` on `target` in the given scope.
pub fn on(
    hook: impl Into<String>,
    callback: Callback,
    target: &Emitter,
    scope: Scope,
) -> &Emitter {
    target.register(hook.into(), callback, scope)
}

/// Registers `callback` for `hook` on `target` in the given scope, to run at
/// most once.
///
/// The wrapper is created here, before the scope is chosen, so a
/// class-scoped `once` is replayed into the instance registry as the same
/// wrapper and stays removable through the original `callback`.
pub fn once(
    hook: impl Into<String>,
    callback: Callback,
    target: &Emitter,
    scope: Scope,
) -> &Emitter {
    let hook = hook.into();
    let wrapper = Callback::once(hook.clone(), callback);
    target.register(hook, wrapper, scope)
}

/// Fires `hook` on `target` with `params`.
///
/// Identical to [`Emitter::fire_with`]: callbacks always receive the emitter
/// owning their registration as context.
pub fn fire<'a>(
    hook: &str,
    target: &'a Emitter,
    params: impl Into<Params>,
) -> Result<&'a Emitter, HookError> {
    target.fire_with(hook, params)
}
