//! Shared utilities for wirehook procedural macro crates.
//!
//! Generated code has to name `wirehook_emitter` items. Consumers may depend
//! on that crate directly (possibly under another name) or only on the
//! `wirehook` umbrella crate, which re-exports it. [`emitter_path`] finds the
//! right path from the consuming crate's `Cargo.toml`.

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;

/// Package name of the core crate.
const EMITTER_CRATE: &str = "wirehook_emitter";

/// Package name of the umbrella crate.
const UMBRELLA_CRATE: &str = "wirehook";

/// Returns the path generated code should use for `wirehook_emitter`.
///
/// Resolution order:
/// 1. A direct dependency, honouring renames.
/// 2. The umbrella crate, as `wirehook::wirehook_emitter`.
/// 3. The bare package name, so the compiler reports the missing dependency.
pub fn emitter_path() -> TokenStream {
    if let Some(path) = dependency_path(EMITTER_CRATE) {
        return path;
    }

    let inner = ident(EMITTER_CRATE);
    match dependency_path(UMBRELLA_CRATE) {
        Some(umbrella) => quote!(#umbrella::#inner),
        None => quote!(::#inner),
    }
}

/// Looks up `package` in the consuming crate's dependencies.
///
/// Inside the package itself the path is the bare package name, which the
/// package makes resolvable with `extern crate self as <name>;`.
fn dependency_path(package: &str) -> Option<TokenStream> {
    match crate_name(package).ok()? {
        FoundCrate::Itself => {
            let name = ident(package);
            Some(quote!(#name))
        }
        FoundCrate::Name(found) => {
            let name = ident(&found);
            Some(quote!(::#name))
        }
    }
}

fn ident(name: &str) -> Ident {
    Ident::new(&name.replace('-', "_"), Span::call_site())
}
