//! Code generation for the `Command` and `Hooks` implementations.

use proc_macro2::{Literal, TokenStream};
use quote::quote;

use super::parse::{CommandInput, Details, FieldSpec, Role};

fn modifiers(details: &Details) -> TokenStream {
    let mut out = TokenStream::new();
    if let Some(help) = &details.help {
        out.extend(quote! { .help(#help) });
    }
    if let Some(default) = &details.default {
        out.extend(quote! { .default_value(#default) });
    }
    if let Some(env) = &details.env {
        out.extend(quote! { .env(#env) });
    }
    if details.required {
        out.extend(quote! { .required(true) });
    }
    if let Some(choices) = &details.choices {
        out.extend(quote! { .choices([#(#choices),*]) });
    }
    if !details.aliases.is_empty() {
        let aliases = &details.aliases;
        out.extend(quote! { .aliases([#(#aliases),*]) });
    }
    out
}

/// `FieldDescriptor` expression for one field.
fn descriptor(krate: &TokenStream, field: &FieldSpec) -> TokenStream {
    let index = Literal::usize_unsuffixed(field.index);
    let name = syn::ext::IdentExt::unraw(&field.ident).to_string();
    let base = match &field.role {
        Role::Flag { name: flag, short } => {
            let short = short.as_ref().map(|short| quote! { .short(#short) });
            quote! { #krate::FieldDescriptor::flag(#index, #name, #flag) #short }
        }
        Role::Arg => quote! { #krate::FieldDescriptor::arg(#index, #name) },
        Role::Cmd { name: cmd, .. } => {
            quote! { #krate::FieldDescriptor::command(#index, #name, #cmd) }
        }
        Role::Commands => quote! { #krate::FieldDescriptor::commands(#index, #name) },
        Role::Reporter => quote! { #krate::FieldDescriptor::reporter(#index, #name) },
    };
    let modifiers = modifiers(&field.details);
    quote! { #base #modifiers }
}

/// `field_mut` match arm for one field.
fn accessor(krate: &TokenStream, field: &FieldSpec) -> TokenStream {
    let index = Literal::usize_unsuffixed(field.index);
    let ident = &field.ident;
    let view = match &field.role {
        Role::Flag { .. } | Role::Arg => quote! { #krate::FieldMut::Value(&mut self.#ident) },
        Role::Cmd { optional: true, .. } => quote! {
            #krate::FieldMut::Command(#krate::describe::optional_slot(&mut self.#ident))
        },
        Role::Cmd { optional: false, .. } => {
            quote! { #krate::FieldMut::Command(&mut self.#ident) }
        }
        Role::Commands => quote! { #krate::FieldMut::Commands(&mut self.#ident) },
        Role::Reporter => quote! { #krate::FieldMut::Reporter(&mut self.#ident) },
    };
    quote! { #index => ::core::option::Option::Some(#view) }
}

/// Emits the `Command` impl and, unless `hooks` is set, an empty `Hooks` impl.
pub(crate) fn generate(input: &CommandInput<'_>, krate: &TokenStream) -> TokenStream {
    let ident = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let descriptors = input.fields.iter().map(|field| descriptor(krate, field));
    let accessors = input.fields.iter().map(|field| accessor(krate, field));

    let hooks = if input.attrs.hooks {
        TokenStream::new()
    } else {
        quote! {
            impl #impl_generics #krate::Hooks for #ident #ty_generics #where_clause {}
        }
    };

    quote! {
        impl #impl_generics #krate::Command for #ident #ty_generics #where_clause {
            fn fields(&self) -> ::std::vec::Vec<#krate::FieldDescriptor> {
                ::std::vec![#(#descriptors),*]
            }

            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<#krate::FieldMut<'_>> {
                match index {
                    #(#accessors,)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        #hooks
    }
}
