//! Code generation for `#[fires]` on methods.
//!
//! The annotated method is kept as a hidden inner method. A wrapper with the
//! original name and signature calls it, then fires the hook on the emitter
//! returned by `HasEmitter::emitter(self)`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, Ident, ImplItemFn, LitStr, Pat};
use wirehook_macro_utils::emitter_path;

use crate::common::{ReturnShape, validate_plain_fn, validate_ref_receiver};

/// Attributes copied onto the hidden inner method.
const INNER_ATTRS: &[&str] = &["cfg", "allow", "expect", "warn", "deny"];

/// Generates the wrapper and inner method for `#[fires("hook")]`.
pub(crate) fn generate_fires(hook: &LitStr, method: &ImplItemFn) -> TokenStream {
    if let Some(err) = validate_plain_fn(&method.sig, "fires") {
        return err;
    }
    if let Some(err) = validate_ref_receiver(&method.sig) {
        return err;
    }

    let params = match collect_params(method) {
        Ok(params) => params,
        Err(err) => return err.to_compile_error(),
    };

    let krate = emitter_path();
    let name = &method.sig.ident;
    let inner_name = format_ident!("__wirehook_fires_{}", name);

    // Hidden inner method: the original body under a private name.
    let mut inner = method.clone();
    inner.sig.ident = inner_name.clone();
    inner.vis = syn::Visibility::Inherited;
    inner.attrs.retain(|attr| {
        INNER_ATTRS
            .iter()
            .any(|keep| attr.path().is_ident(keep))
    });

    // Public wrapper: same signature, parameter patterns without `mut`.
    let mut wrapper_sig = method.sig.clone();
    for input in &mut wrapper_sig.inputs {
        if let FnArg::Typed(pat_type) = input
            && let Pat::Ident(pat_ident) = pat_type.pat.as_mut()
        {
            pat_ident.mutability = None;
        }
    }
    let attrs = &method.attrs;
    let vis = &method.vis;

    let shape = ReturnShape::of(&method.sig.output);
    let emitter = quote!(#krate::HasEmitter::emitter(self));

    let args_payload = if params.is_empty() {
        quote! {
            let __wirehook_args: ::core::result::Result<#krate::Params, #krate::HookError> =
                ::core::result::Result::Ok(#krate::Params::new());
        }
    } else {
        let keys = params.iter().map(Ident::to_string);
        quote! {
            let __wirehook_args = (|| -> ::core::result::Result<#krate::Params, #krate::HookError> {
                let mut __params = #krate::Params::new();
                #( __params.insert_serialized(#keys, &#params)?; )*
                ::core::result::Result::Ok(__params)
            })();
        }
    };

    let (prelude, payload) = if shape.sends_args {
        (args_payload, quote!(__wirehook_args))
    } else {
        (
            quote! {},
            quote!(#krate::Params::from_serialize(&__wirehook_value)),
        )
    };

    let body = if shape.is_result {
        quote! {
            #prelude
            let __wirehook_value = self.#inner_name(#(#params),*)?;
            #krate::adapter::fire_params(#emitter, #hook, #payload)?;
            ::core::result::Result::Ok(__wirehook_value)
        }
    } else {
        quote! {
            #prelude
            let __wirehook_value = self.#inner_name(#(#params),*);
            if let ::core::result::Result::Err(__wirehook_err) =
                #krate::adapter::fire_params(#emitter, #hook, #payload)
            {
                #krate::adapter::report_failure(#emitter, #hook, &__wirehook_err);
            }
            __wirehook_value
        }
    };

    quote! {
        #[doc(hidden)]
        #[inline(always)]
        #inner

        #(#attrs)*
        #vis #wrapper_sig {
            #body
        }
    }
}

/// Collects parameter names, rejecting patterns that cannot be forwarded.
fn collect_params(method: &ImplItemFn) -> syn::Result<Vec<Ident>> {
    method
        .sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(pat_type) => Some(pat_type),
            FnArg::Receiver(_) => None,
        })
        .map(|pat_type| match pat_type.pat.as_ref() {
            Pat::Ident(pat_ident) if pat_ident.by_ref.is_none() && pat_ident.subpat.is_none() => {
                Ok(pat_ident.ident.clone())
            }
            other => Err(syn::Error::new_spanned(
                other,
                "#[fires] parameters must be plain identifiers",
            )),
        })
        .collect()
}
