//! Effective flag sets and the flag/positional split.

use std::collections::BTreeMap;

use crate::error::{CliError, CliResult};
use crate::tree::{CommandTree, FlagMeta, HELP_LONG, HELP_SHORT, NodeId};

/// Flags visible at a node: its own plus every ancestor's.
///
/// A descendant flag shadows an ancestor flag of the same long name. Short
/// letters map to long names, so an ancestor's short letter follows the
/// shadowing flag.
#[derive(Debug)]
pub struct EffectiveFlags<'t> {
    long: BTreeMap<&'t str, &'t FlagMeta>,
    short: BTreeMap<char, &'t str>,
}

impl<'t> EffectiveFlags<'t> {
    /// Collects the flags of every node on `path`, root first.
    #[must_use]
    pub fn collect(tree: &'t CommandTree, path: &[NodeId]) -> Self {
        let mut long = BTreeMap::new();
        let mut short = BTreeMap::new();
        for node in path.iter().filter_map(|id| tree.get(*id)) {
            for (name, meta) in &node.flags {
                long.insert(name.as_str(), meta);
            }
            for (letter, name) in &node.shorts {
                short.insert(*letter, name.as_str());
            }
        }
        Self { long, short }
    }

    /// Flag registered under the long `name`.
    #[must_use]
    pub fn long(&self, name: &str) -> Option<&'t FlagMeta> {
        self.long.get(name).copied()
    }

    /// Flag named by a single-dash token body: a short letter, or a long
    /// name written with one dash.
    #[must_use]
    pub fn short(&self, name: &str) -> Option<&'t FlagMeta> {
        let mut chars = name.chars();
        if let (Some(letter), None) = (chars.next(), chars.next()) {
            if let Some(long) = self.short.get(&letter) {
                return self.long(long);
            }
        }
        self.long(name)
    }

    /// Effective flags in deterministic order, deepest declaration winning.
    pub fn flags(&self) -> impl Iterator<Item = &'t FlagMeta> + '_ {
        self.long.values().copied()
    }

    /// Looks up a flag token (`--name[=v]` or `-n[=v]`) without validating it.
    #[must_use]
    pub fn lookup_token(&self, token: &str) -> Option<&'t FlagMeta> {
        let (body, long) = flag_body(token)?;
        let name = body.split_once('=').map_or(body, |(name, _)| name);
        if long {
            self.long(name)
        } else {
            self.short(name)
        }
    }
}

/// Strips the dashes of a flag token. Returns the body and whether the token
/// used the long `--` form. `-`, `--` and non-flag tokens yield `None`.
pub(crate) fn flag_body(token: &str) -> Option<(&str, bool)> {
    if let Some(body) = token.strip_prefix("--") {
        return (!body.is_empty()).then_some((body, true));
    }
    token
        .strip_prefix('-')
        .filter(|body| !body.is_empty())
        .map(|body| (body, false))
}

/// Whether `token` asks for help.
pub(crate) fn is_help(token: &str) -> bool {
    match flag_body(token) {
        Some((body, true)) => body == HELP_LONG,
        Some((body, false)) => {
            let mut chars = body.chars();
            chars.next() == Some(HELP_SHORT) && chars.next().is_none()
        }
        None => false,
    }
}

/// Marker ending flag parsing.
pub(crate) const TERMINATOR: &str = "--";

/// Outcome of the flag/positional split.
#[derive(Debug, Default)]
pub struct Split<'t> {
    /// Flag occurrences in encounter order, with their explicit values.
    pub flags: Vec<(&'t FlagMeta, String)>,
    /// Positional tokens in encounter order.
    pub positionals: Vec<String>,
}

/// Separates flags from positionals.
///
/// # Errors
///
/// Returns [`CliError::UnknownFlag`] for flags outside `effective`, and
/// [`CliError::MissingFlagValue`] when a value-taking flag ends the input.
pub fn split<'t>(effective: &EffectiveFlags<'t>, tokens: &[String]) -> CliResult<Split<'t>> {
    let mut out = Split::default();
    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        if token == TERMINATOR {
            out.positionals.extend(iter.by_ref().cloned());
            break;
        }
        let Some((body, long)) = flag_body(token) else {
            out.positionals.push(token.clone());
            continue;
        };
        let (name, inline) = body
            .split_once('=')
            .map_or((body, None), |(name, value)| (name, Some(value)));
        let found = if long {
            effective.long(name)
        } else {
            effective.short(name)
        };
        let meta = found.ok_or_else(|| CliError::UnknownFlag {
            flag: token.clone(),
        })?;
        let value = match inline {
            Some(value) => value.to_owned(),
            None if meta.kind.is_bool() => String::from("true"),
            None => iter.next().cloned().ok_or_else(|| CliError::MissingFlagValue {
                flag: token.clone(),
            })?,
        };
        out.flags.push((meta, value));
    }
    Ok(out)
}
