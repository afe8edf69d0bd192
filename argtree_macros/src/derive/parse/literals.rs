//! Literal parsing helpers for `#[cli(...)]` keys.

use syn::meta::ParseNestedMeta;
use syn::{Lit, LitStr};

fn parse_lit<T, F>(meta: &ParseNestedMeta, key: &str, expected: &str, extractor: F) -> syn::Result<T>
where
    F: FnOnce(Lit) -> Option<T>,
{
    let literal = meta.value()?.parse::<Lit>()?;
    let span = literal.span();
    extractor(literal).ok_or_else(|| syn::Error::new(span, format!("{key} must be a {expected}")))
}

/// Parses `key = "..."`.
pub(crate) fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    parse_lit(meta, key, "string", |lit| match lit {
        Lit::Str(s) => Some(s),
        _ => None,
    })
}

/// Parses `key = true|false`.
pub(crate) fn lit_bool(meta: &ParseNestedMeta, key: &str) -> syn::Result<bool> {
    parse_lit(meta, key, "boolean", |lit| match lit {
        Lit::Bool(b) => Some(b.value),
        _ => None,
    })
}

/// Parses an optional `= "..."` after a bare key such as `flag` or `cmd`.
pub(crate) fn optional_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<Option<LitStr>> {
    if meta.input.peek(syn::Token![=]) {
        lit_str(meta, key).map(Some)
    } else {
        Ok(None)
    }
}

/// Parses an optional `= true|false` after a bare key such as `required`.
pub(crate) fn optional_bool(meta: &ParseNestedMeta, key: &str) -> syn::Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        lit_bool(meta, key)
    } else {
        Ok(true)
    }
}

/// Splits a comma-joined list literal, trimming entries and dropping empty ones.
pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}
