//! Procedural macros for `argtree`.
//!
//! `#[derive(Command)]` reads the `#[cli(...)]` attributes of a struct and
//! emits its `argtree::Command` implementation: a `fields()` list describing
//! every annotated field and a `field_mut()` accessor handing out mutable
//! access by declaration index. Flag names default to the field name in
//! kebab-case; subcommand names default to the lower-cased field name.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `argtree::Command`.
///
/// See the `argtree` crate documentation for the accepted `#[cli(...)]` keys.
#[proc_macro_derive(Command, attributes(cli))]
pub fn derive_command(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
