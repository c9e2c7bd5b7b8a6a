//! Code generation for `#[hooks]` on impl blocks.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Ident, ImplItem, ItemImpl, LitStr};
use wirehook_macro_utils::emitter_path;

use crate::common::{validate_no_receiver, validate_plain_fn};

/// Registration marker found on an associated function.
enum Marker {
    On,
    Once,
}

impl Marker {
    fn of(attr: &Attribute) -> Option<Self> {
        if attr.path().is_ident("on") {
            Some(Self::On)
        } else if attr.path().is_ident("once") {
            Some(Self::Once)
        } else {
            None
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Once => "once",
        }
    }
}

struct Registration {
    marker: Marker,
    hook: LitStr,
    function: Ident,
}

/// Generates a `HookClass` impl for an impl block with `#[on]`/`#[once]` functions.
pub(crate) fn generate_hook_class(input: &ItemImpl) -> TokenStream {
    if let Some((_, path, _)) = &input.trait_ {
        return syn::Error::new_spanned(path, "#[hooks] must be applied to an inherent impl block")
            .to_compile_error();
    }

    let krate = emitter_path();

    let self_ty = &input.self_ty;
    let (impl_generics, _ty_generics, where_clause) = input.generics.split_for_impl();

    let mut registrations = Vec::new();
    for item in &input.items {
        let ImplItem::Fn(method) = item else {
            continue;
        };

        for attr in &method.attrs {
            let Some(marker) = Marker::of(attr) else {
                continue;
            };

            if let Some(err) = validate_plain_fn(&method.sig, marker.name()) {
                return err;
            }
            if let Some(err) = validate_no_receiver(&method.sig, marker.name()) {
                return err;
            }

            let hook = match attr.parse_args::<LitStr>() {
                Ok(hook) => hook,
                Err(_) => {
                    return syn::Error::new_spanned(
                        attr,
                        format!(
                            "#[{}] expects a hook name, e.g. #[{}(\"saved\")]",
                            marker.name(),
                            marker.name()
                        ),
                    )
                    .to_compile_error();
                }
            };

            registrations.push(Registration {
                marker,
                hook,
                function: method.sig.ident.clone(),
            });
        }
    }

    let calls = registrations.iter().map(|registration| {
        let hook = &registration.hook;
        let function = &registration.function;
        let register = match registration.marker {
            Marker::On => quote!(#krate::dispatch::on),
            Marker::Once => quote!(#krate::dispatch::once),
        };
        quote! {
            #register(
                #hook,
                #krate::Callback::new(Self::#function),
                __target,
                #krate::Scope::Class,
            );
        }
    });

    // Strip the registration markers; they are not real attributes.
    let cleaned_items = input.items.iter().map(|item| {
        if let ImplItem::Fn(method) = item {
            let mut cleaned = method.clone();
            cleaned.attrs.retain(|attr| Marker::of(attr).is_none());
            ImplItem::Fn(cleaned)
        } else {
            item.clone()
        }
    });

    let attrs = &input.attrs;
    let unsafety = &input.unsafety;

    quote! {
        #(#attrs)*
        #unsafety impl #impl_generics #self_ty #where_clause {
            #(#cleaned_items)*
        }

        impl #impl_generics #krate::HookClass for #self_ty #where_clause {
            fn register_hooks(__target: &#krate::Emitter) {
                #(#calls)*
            }
        }
    }
}
