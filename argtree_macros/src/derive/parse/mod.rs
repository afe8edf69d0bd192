//! Tag Reader: turns `#[cli(...)]` attributes into per-field roles.
//!
//! The canonical flag syntax is `flag = "name,short"`. Structured `short = ..`
//! and `long = ..` keys are rejected with a pointer to it. Unknown keys are
//! consumed and ignored so newer attributes keep older builds compiling.

use heck::ToKebabCase;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Data, DeriveInput, Fields, Generics, Ident, LitStr, Token, parenthesized};

mod literals;
mod type_utils;

use literals::{lit_str, optional_bool, optional_str, split_list};
use type_utils::option_inner;

/// Struct-level `#[cli(...)]` keys.
#[derive(Default)]
pub(crate) struct StructAttrs {
    /// The type implements `Hooks` itself.
    pub hooks: bool,
    /// Overrides the generated `::argtree` path.
    pub crate_path: Option<syn::Path>,
}

/// What a field is bound as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Role {
    Flag { name: String, short: Option<String> },
    Arg,
    Cmd { name: String, optional: bool },
    Commands,
    Reporter,
}

impl Role {
    const fn label(&self) -> &'static str {
        match self {
            Self::Flag { .. } => "flag",
            Self::Arg => "arg",
            Self::Cmd { .. } => "cmd",
            Self::Commands => "commands",
            Self::Reporter => "reporter",
        }
    }
}

/// Field-level details shared by the roles.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Details {
    pub help: Option<String>,
    pub default: Option<String>,
    pub env: Option<String>,
    pub required: bool,
    pub choices: Option<Vec<String>>,
    pub aliases: Vec<String>,
}

/// One annotated field, ready for code generation.
pub(crate) struct FieldSpec {
    /// Declaration index among all fields.
    pub index: usize,
    pub ident: Ident,
    pub role: Role,
    pub details: Details,
}

/// The parsed derive input.
pub(crate) struct CommandInput<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attrs: StructAttrs,
    pub fields: Vec<FieldSpec>,
}

/// Iterate all `#[cli(...)]` attributes once and apply a callback.
fn parse_cli<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("cli")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
fn discard_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let value = meta.value()?;
        while !value.is_empty() && !value.peek(Token![,]) {
            value.parse::<proc_macro2::TokenTree>()?;
        }
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

fn key_of(meta: &ParseNestedMeta) -> Option<String> {
    meta.path.get_ident().map(|ident| ident.unraw().to_string())
}

/// Extracts struct-level keys.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_cli(attrs, |meta| {
        match key_of(meta).as_deref() {
            Some("hooks") => out.hooks = optional_bool(meta, "hooks")?,
            Some("crate") => out.crate_path = Some(lit_str(meta, "crate")?.parse()?),
            _ => discard_unknown(meta)?,
        }
        Ok(())
    })?;
    Ok(out)
}

/// Role keys as written, before defaults are applied.
enum RoleKey {
    Flag(Option<LitStr>),
    Arg,
    Cmd(Option<LitStr>),
    Commands,
    Reporter,
}

impl RoleKey {
    const fn label(&self) -> &'static str {
        match self {
            Self::Flag(_) => "flag",
            Self::Arg => "arg",
            Self::Cmd(_) => "cmd",
            Self::Commands => "commands",
            Self::Reporter => "reporter",
        }
    }
}

#[derive(Default)]
struct RawField {
    ignore: bool,
    role: Option<RoleKey>,
    details: Details,
    /// Span of the first detail key, for errors on fields without a role.
    detail_span: Option<proc_macro2::Span>,
}

fn set_role(raw: &mut RawField, meta: &ParseNestedMeta, role: RoleKey) -> syn::Result<()> {
    if let Some(existing) = &raw.role {
        return Err(meta.error(format!(
            "field is already declared as `{}`; a field takes one role",
            existing.label()
        )));
    }
    raw.role = Some(role);
    Ok(())
}

fn parse_field_key(raw: &mut RawField, meta: &ParseNestedMeta) -> syn::Result<()> {
    let Some(key) = key_of(meta) else {
        return discard_unknown(meta);
    };
    let is_detail = matches!(
        key.as_str(),
        "help" | "default" | "env" | "required" | "choices" | "aliases"
    );
    if is_detail && raw.detail_span.is_none() {
        raw.detail_span = Some(meta.path.span());
    }
    match key.as_str() {
        "ignore" => raw.ignore = optional_bool(meta, "ignore")?,
        "flag" => set_role(raw, meta, RoleKey::Flag(optional_str(meta, "flag")?))?,
        "arg" => set_role(raw, meta, RoleKey::Arg)?,
        "cmd" => set_role(raw, meta, RoleKey::Cmd(optional_str(meta, "cmd")?))?,
        "commands" => set_role(raw, meta, RoleKey::Commands)?,
        "reporter" => set_role(raw, meta, RoleKey::Reporter)?,
        "help" => raw.details.help = Some(lit_str(meta, "help")?.value()),
        "default" => raw.details.default = Some(lit_str(meta, "default")?.value()),
        "env" => raw.details.env = Some(lit_str(meta, "env")?.value()),
        "required" => raw.details.required = optional_bool(meta, "required")?,
        "choices" => {
            let lit = lit_str(meta, "choices")?;
            let choices = split_list(&lit.value());
            if choices.is_empty() {
                return Err(syn::Error::new(
                    lit.span(),
                    "choices must list at least one value",
                ));
            }
            raw.details.choices = Some(choices);
        }
        "aliases" => raw
            .details
            .aliases
            .extend(split_list(&lit_str(meta, "aliases")?.value())),
        "short" | "long" => {
            return Err(meta.error(
                "use the comma-joined form `flag = \"name,short\"` to name a flag",
            ));
        }
        _ => discard_unknown(meta)?,
    }
    Ok(())
}

/// Splits `"name,short"`; either side may be empty to keep its default.
fn split_flag(lit: &LitStr, default_name: &str) -> syn::Result<(String, Option<String>)> {
    let value = lit.value();
    let mut parts = value.split(',').map(str::trim);
    let name = parts.next().unwrap_or_default();
    let short = parts.next().filter(|short| !short.is_empty());
    if parts.next().is_some() {
        return Err(syn::Error::new(
            lit.span(),
            "flag takes \"name\" or \"name,short\"",
        ));
    }
    let name = if name.is_empty() {
        default_name.to_owned()
    } else {
        name.to_owned()
    };
    Ok((name, short.map(str::to_owned)))
}

fn check_details(role: &Role, details: &Details, span: proc_macro2::Span) -> syn::Result<()> {
    let flag_only = details.default.is_some() || details.env.is_some() || details.choices.is_some();
    let aliased = !details.aliases.is_empty();
    let misplaced = match role {
        Role::Flag { .. } => aliased.then_some("aliases"),
        Role::Arg => (flag_only || aliased).then_some("default, env, choices and aliases"),
        Role::Cmd { .. } => {
            (flag_only || details.required).then_some("default, env, choices and required")
        }
        Role::Commands | Role::Reporter => (flag_only || details.required || aliased)
            .then_some("default, env, choices, required and aliases"),
    };
    misplaced.map_or(Ok(()), |keys| {
        Err(syn::Error::new(
            span,
            format!("{keys} do not apply to a `{}` field", role.label()),
        ))
    })
}

/// Reads the `#[cli]` attributes of one field.
///
/// Returns `None` for ignored fields and for fields without a role.
pub(crate) fn parse_field(index: usize, field: &syn::Field) -> syn::Result<Option<FieldSpec>> {
    let Some(ident) = field.ident.clone() else {
        return Err(syn::Error::new_spanned(field, "Command requires named fields"));
    };
    let mut raw = RawField::default();
    parse_cli(&field.attrs, |meta| parse_field_key(&mut raw, meta))?;
    if raw.ignore {
        return Ok(None);
    }
    let Some(key) = raw.role else {
        return raw.detail_span.map_or(Ok(None), |span| {
            Err(syn::Error::new(
                span,
                "#[cli] keys need a role: flag, arg, cmd, commands, reporter or ignore",
            ))
        });
    };

    let unraw = ident.unraw().to_string();
    let kebab = unraw.to_kebab_case();
    let role = match key {
        RoleKey::Flag(lit) => {
            let (name, short) = match lit {
                Some(lit) => split_flag(&lit, &kebab)?,
                None => (kebab, None),
            };
            Role::Flag { name, short }
        }
        RoleKey::Arg => Role::Arg,
        RoleKey::Cmd(lit) => Role::Cmd {
            name: lit.map_or_else(|| unraw.to_lowercase(), |lit| lit.value()),
            optional: option_inner(&field.ty).is_some(),
        },
        RoleKey::Commands => Role::Commands,
        RoleKey::Reporter => Role::Reporter,
    };
    check_details(&role, &raw.details, ident.span())?;
    Ok(Some(FieldSpec {
        index,
        ident,
        role,
        details: raw.details,
    }))
}

/// Parses a derive input into its annotated fields.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<CommandInput<'_>> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Command can only be derived for structs",
        ));
    };
    let fields = match &data.fields {
        Fields::Named(named) => named
            .named
            .iter()
            .enumerate()
            .filter_map(|(index, field)| parse_field(index, field).transpose())
            .collect::<syn::Result<Vec<_>>>()?,
        Fields::Unit => Vec::new(),
        Fields::Unnamed(_) => {
            return Err(syn::Error::new_spanned(
                data.struct_token,
                "Command requires named fields",
            ));
        }
    };
    Ok(CommandInput {
        ident: &input.ident,
        generics: &input.generics,
        attrs: parse_struct_attrs(&input.attrs)?,
        fields,
    })
}
