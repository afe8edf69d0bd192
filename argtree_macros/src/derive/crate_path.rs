//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[cli(crate = "...")]` attribute value into the
//! path that prefixes every `argtree` item in generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolves the crate path, defaulting to `::argtree`.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::argtree }, |path| quote! { #path })
}
