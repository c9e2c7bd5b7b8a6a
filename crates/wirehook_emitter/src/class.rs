//! Class-level registration and emitter ownership.
//!
//! [`HookClass`] lets a type declare hooks before any emitter for it exists.
//! The declarations are written into the class registry of a fresh emitter
//! and replayed into its instance registry when the emitter is built, so they
//! behave exactly like hooks registered with [`Emitter::on`] afterwards,
//! including removal with [`Emitter::off`].
//!
//! The `#[hooks]` attribute generates a [`HookClass`] impl from annotated
//! associated functions:
//!
//! ```
//! use wirehook_emitter::{Emitter, Params, hooks};
//!
//! struct Uploader;
//!
//! #[hooks]
//! impl Uploader {
//!     #[on("uploaded")]
//!     fn record(_emitter: &Emitter, params: Params) {
//!         let _ = params.get("path");
//!     }
//! }
//!
//! let emitter = Emitter::of::<Uploader>();
//! assert_eq!(emitter.hook_count("uploaded"), 1);
//! ```

use crate::emitter::Emitter;

/// A type with class-level hooks.
///
/// Implementations register through the static forms in
/// [`dispatch`](crate::dispatch) with [`Scope::Class`](crate::Scope::Class).
/// `target` has not been seeded yet: its instance registry is empty.
pub trait HookClass {
    /// Writes this type's class-level hooks into `target`.
    fn register_hooks(target: &Emitter);
}

/// A type that owns an emitter.
///
/// Required by `#[fires]`, which fires on the emitter returned here once the
/// wrapped method returns.
pub trait HasEmitter {
    /// Returns the emitter owned by `self`.
    fn emitter(&self) -> &Emitter;
}

impl HasEmitter for Emitter {
    fn emitter(&self) -> &Emitter {
        self
    }
}
