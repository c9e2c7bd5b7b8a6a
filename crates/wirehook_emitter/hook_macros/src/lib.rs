//! Procedural macros for wirehook emitters.
//!
//! Provides `#[hooks]` for class-level hook registration on impl blocks and
//! `#[fires]` for firing a hook when a method completes.

mod common;
mod fires;
mod hooks;

use proc_macro::TokenStream;

/// Declares class-level hooks from an impl block.
///
/// Associated functions marked `#[on("hook")]` or `#[once("hook")]` are
/// registered as class-scoped hooks of the type through a generated
/// `HookClass` impl. Emitters built with `Emitter::of::<T>()` (or
/// `Emitter::builder().with_class::<T>()`) start with those hooks registered.
///
/// Marked functions take `(&Emitter, Params)` and return `()` or
/// `Result<(), HookError>`. They cannot take `self`, be async, be generic or
/// be unsafe. A function may carry several markers.
///
/// # Example
///
/// ```
/// use wirehook_emitter::{Emitter, HookError, Params, hooks};
///
/// struct Cache;
///
/// #[hooks]
/// impl Cache {
///     #[on("evicted")]
///     #[on("expired")]
///     fn forget(_emitter: &Emitter, _params: Params) {}
///
///     #[once("warmed")]
///     fn first_warm(_emitter: &Emitter, params: Params) -> Result<(), HookError> {
///         let _entries: u64 = params.deserialize()?;
///         Ok(())
///     }
/// }
///
/// let emitter = Emitter::of::<Cache>();
/// assert_eq!(emitter.hook_count("evicted"), 1);
/// assert_eq!(emitter.hook_count("warmed"), 1);
/// ```
#[proc_macro_attribute]
pub fn hooks(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemImpl);
    hooks::generate_hook_class(&input).into()
}

/// Fires a hook after the annotated method returns.
///
/// The method's type must implement `HasEmitter`. The hook receives the
/// method's return value, serialized into `Params`. Methods returning `()`
/// (or `Result<(), E>`) send their arguments instead, as an object keyed by
/// parameter name.
///
/// Methods returning `Result<T, E>` fire only on `Ok`, and a failing dispatch
/// is returned through `E: From<HookError>`. For other methods a failing
/// dispatch is logged, since it cannot be returned.
///
/// # Example
///
/// ```
/// use wirehook_emitter::{Emitter, HasEmitter, fires};
///
/// struct Counter {
///     emitter: Emitter,
///     total: u64,
/// }
///
/// impl HasEmitter for Counter {
///     fn emitter(&self) -> &Emitter {
///         &self.emitter
///     }
/// }
///
/// impl Counter {
///     #[fires("added")]
///     fn add(&mut self, amount: u64) -> u64 {
///         self.total += amount;
///         self.total
///     }
/// }
///
/// let mut counter = Counter { emitter: Emitter::new(), total: 0 };
/// assert_eq!(counter.add(5), 5);
/// ```
#[proc_macro_attribute]
pub fn fires(attr: TokenStream, item: TokenStream) -> TokenStream {
    let hook = syn::parse_macro_input!(attr as syn::LitStr);
    let input = syn::parse_macro_input!(item as syn::ImplItemFn);
    fires::generate_fires(&hook, &input).into()
}
