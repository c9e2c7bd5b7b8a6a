//! Shared signature checks and type helpers.

use proc_macro2::TokenStream;
use syn::{FnArg, GenericArgument, PathArguments, ReturnType, Signature, Type};

/// Rejects async, unsafe, extern and generic functions.
pub(crate) fn validate_plain_fn(sig: &Signature, attr: &str) -> Option<TokenStream> {
    if let Some(asyncness) = &sig.asyncness {
        return Some(
            syn::Error::new_spanned(
                asyncness,
                format!("#[{attr}] cannot be applied to async functions"),
            )
            .to_compile_error(),
        );
    }

    if let Some(unsafety) = &sig.unsafety {
        return Some(
            syn::Error::new_spanned(
                unsafety,
                format!("#[{attr}] cannot be applied to unsafe functions"),
            )
            .to_compile_error(),
        );
    }

    if let Some(abi) = &sig.abi {
        return Some(
            syn::Error::new_spanned(
                abi,
                format!("#[{attr}] cannot be applied to extern functions"),
            )
            .to_compile_error(),
        );
    }

    if !sig.generics.params.is_empty() {
        return Some(
            syn::Error::new_spanned(
                &sig.generics,
                format!("#[{attr}] does not support generic parameters"),
            )
            .to_compile_error(),
        );
    }

    None
}

/// Requires a hook function to be an associated function without `self`.
pub(crate) fn validate_no_receiver(sig: &Signature, attr: &str) -> Option<TokenStream> {
    if let Some(FnArg::Receiver(receiver)) = sig.inputs.first() {
        return Some(
            syn::Error::new_spanned(
                receiver,
                format!(
                    "#[{attr}] functions cannot take `self`; class-level hooks receive the \
                     owning emitter as their first argument"
                ),
            )
            .to_compile_error(),
        );
    }
    None
}

/// Requires a `&self` or `&mut self` receiver.
pub(crate) fn validate_ref_receiver(sig: &Signature) -> Option<TokenStream> {
    match sig.inputs.first() {
        Some(FnArg::Receiver(receiver)) if receiver.reference.is_some() => None,
        Some(FnArg::Receiver(receiver)) => Some(
            syn::Error::new_spanned(
                receiver,
                "#[fires] methods must take `&self` or `&mut self`, not `self` by value; \
                 the emitter is reached through `self` after the method returns",
            )
            .to_compile_error(),
        ),
        _ => Some(
            syn::Error::new_spanned(
                sig.fn_token,
                "#[fires] methods must take `&self` or `&mut self` as the first parameter",
            )
            .to_compile_error(),
        ),
    }
}

/// Returns the `Ok` type when `ty` is a `Result`.
fn result_ok_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty
        && let Some(segment) = type_path.path.segments.last()
        && segment.ident == "Result"
    {
        if let PathArguments::AngleBracketed(args) = &segment.arguments
            && let Some(GenericArgument::Type(ok)) = args.args.first()
        {
            return Some(ok);
        }
        // Aliases without arguments; the Ok type is unknown, treat it as a value.
        return Some(ty);
    }
    None
}

fn is_unit(ty: &Type) -> bool {
    matches!(ty, Type::Tuple(tuple) if tuple.elems.is_empty())
}

/// How a `#[fires]` method's return type is handled.
pub(crate) struct ReturnShape {
    /// The method returns `Result<_, _>`.
    pub is_result: bool,
    /// The (Ok) value is `()`, so arguments are sent instead.
    pub sends_args: bool,
}

impl ReturnShape {
    pub(crate) fn of(output: &ReturnType) -> Self {
        let ty = match output {
            ReturnType::Default => {
                return Self {
                    is_result: false,
                    sends_args: true,
                };
            }
            ReturnType::Type(_, ty) => ty.as_ref(),
        };

        match result_ok_type(ty) {
            Some(ok) => Self {
                is_result: true,
                sends_args: is_unit(ok),
            },
            None => Self {
                is_result: false,
                sends_args: is_unit(ty),
            },
        }
    }
}
