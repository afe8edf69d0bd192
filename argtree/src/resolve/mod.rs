//! Argument Resolver: maps raw tokens onto a command path, flag values and
//! positional values.
//!
//! Resolution happens in two phases. [`route`] walks the tree consuming
//! command names and sets flag tokens aside, so global flags may precede the
//! command. [`Route::resolve`] then splits the remaining tokens into flags
//! and positionals against the effective flag set of the resolved path and
//! picks each flag's final value by priority: command line, environment,
//! declared default.

mod env;
mod flags;

pub use env::{Environment, MapEnv, ProcessEnv};
pub use flags::{EffectiveFlags, Split, split};

use crate::bind::ValueKind;
use crate::error::{CliError, CliResult};
use crate::tree::{ArgMeta, CommandTree, FieldRef, NodeId};
use flags::{TERMINATOR, flag_body, is_help};

/// Where a flag's final value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Given on the command line.
    CommandLine,
    /// Read from this environment variable.
    Environment(String),
    /// Declared default.
    Default,
    /// No value from any source.
    Absent,
}

/// Command path selected by phase 1, plus the tokens left for phase 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Nodes from the root down to the resolved command.
    pub path: Vec<NodeId>,
    /// Tokens not consumed as command names, in their original order.
    pub rest: Vec<String>,
}

impl Route {
    /// The resolved command.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.path.last().copied().unwrap_or_default()
    }

    /// Whether a help flag appears before any `--`.
    #[must_use]
    pub fn wants_help(&self) -> bool {
        self.rest
            .iter()
            .take_while(|token| *token != TERMINATOR)
            .any(|token| is_help(token))
    }

    /// Phase 2: splits the remaining tokens and resolves every value.
    ///
    /// # Errors
    ///
    /// Returns the first usage error: unknown flags, missing flag values,
    /// missing required flags or arguments, and surplus positionals.
    pub fn resolve(&self, tree: &CommandTree, env: &dyn Environment) -> CliResult<Invocation> {
        let effective = EffectiveFlags::collect(tree, &self.path);
        let split = split(&effective, &self.rest)?;
        let flags = resolve_flags(&effective, &split, env)?;
        let args = tree
            .get(self.node())
            .map_or(&[][..], |node| node.args.as_slice());
        let positionals = plan_positionals(args, split.positionals)?;
        Ok(Invocation {
            node: self.node(),
            flags,
            positionals,
        })
    }
}

/// Phase 1: consumes leading command names.
///
/// Flag tokens are set aside for phase 2 without ending the walk. A known
/// value-taking flag written without `=` also sets aside the token after
/// it. The first other token that is not a child name, or a `--`, ends the
/// walk.
#[must_use]
pub fn route(tree: &CommandTree, tokens: &[String]) -> Route {
    let mut path = vec![tree.root()];
    let mut rest = Vec::new();
    let mut iter = tokens.iter();
    while let Some(token) = iter.next() {
        if token == TERMINATOR {
            rest.push(token.clone());
            break;
        }
        if flag_body(token).is_some() {
            rest.push(token.clone());
            let effective = EffectiveFlags::collect(tree, &path);
            let takes_value = !token.contains('=')
                && effective
                    .lookup_token(token)
                    .is_some_and(|meta| !meta.kind.is_bool());
            if takes_value {
                rest.extend(iter.next().cloned());
            }
            continue;
        }
        let current = path.last().copied().unwrap_or_else(|| tree.root());
        match tree.child(current, token) {
            Some(child) => path.push(child),
            None => {
                rest.push(token.clone());
                break;
            }
        }
    }
    rest.extend(iter.cloned());
    if let Some(node) = path.last().and_then(|id| tree.get(*id)) {
        tracing::debug!(command = %node.name, depth = path.len(), "resolved command");
    }
    Route { path, rest }
}

/// Final value of one flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFlag {
    /// Long name.
    pub name: String,
    /// Destination field.
    pub field: FieldRef,
    /// Destination kind.
    pub kind: ValueKind,
    /// Values to bind in order; a scalar flag carries at most one.
    pub values: Vec<String>,
    /// Where the values came from.
    pub source: Source,
    /// Accepted values, if enumerated.
    pub choices: Option<Vec<String>>,
}

/// Tokens consumed by one positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArg {
    /// Argument name.
    pub name: String,
    /// Destination field.
    pub field: FieldRef,
    /// Tokens to bind in order; empty for an optional argument left out.
    pub values: Vec<String>,
}

/// Everything phase 2 decided, ready for binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Resolved command.
    pub node: NodeId,
    /// Effective flags with their final values.
    pub flags: Vec<ResolvedFlag>,
    /// Positional arguments with their tokens.
    pub positionals: Vec<ResolvedArg>,
}

fn resolve_flags(
    effective: &EffectiveFlags<'_>,
    split: &Split<'_>,
    env: &dyn Environment,
) -> CliResult<Vec<ResolvedFlag>> {
    let mut resolved = Vec::new();
    for meta in effective.flags() {
        let given: Vec<&String> = split
            .flags
            .iter()
            .filter(|(flag, _)| flag.field == meta.field)
            .map(|(_, value)| value)
            .collect();
        let (values, source) = if let Some(last) = given.last() {
            let values: Vec<String> = if meta.kind.is_list() {
                given.iter().map(|value| (*value).clone()).collect()
            } else {
                vec![(*last).clone()]
            };
            (values, Source::CommandLine)
        } else if let Some((name, value)) = meta
            .env
            .as_ref()
            .and_then(|name| env.var(name).map(|value| (name, value)))
        {
            (expand(meta.kind, &value), Source::Environment(name.clone()))
        } else if let Some(default) = &meta.default {
            (expand(meta.kind, default), Source::Default)
        } else {
            (Vec::new(), Source::Absent)
        };

        let empty = values.iter().all(String::is_empty);
        if meta.required && empty && !meta.kind.is_bool() {
            return Err(CliError::MissingRequiredFlag {
                flag: meta.name.clone(),
            });
        }
        tracing::debug!(flag = %meta.name, source = ?source, "resolved flag value");
        resolved.push(ResolvedFlag {
            name: meta.name.clone(),
            field: meta.field,
            kind: meta.kind,
            values: values.into_iter().filter(|value| !value.is_empty()).collect(),
            source,
            choices: meta.choices.clone(),
        });
    }
    Ok(resolved)
}

fn expand(kind: ValueKind, raw: &str) -> Vec<String> {
    if kind.is_list() {
        env::split_list(raw)
    } else {
        vec![raw.to_owned()]
    }
}

/// Assigns positional tokens to the declared arguments, in order.
///
/// # Errors
///
/// Returns [`CliError::MissingRequiredArgument`] when a required argument
/// has no token left, and [`CliError::UnexpectedArgument`] for surplus tokens.
pub fn plan_positionals(args: &[ArgMeta], tokens: Vec<String>) -> CliResult<Vec<ResolvedArg>> {
    let mut remaining = tokens.into_iter();
    let mut planned = Vec::with_capacity(args.len());
    for arg in args {
        let values: Vec<String> = if arg.greedy {
            remaining.by_ref().collect()
        } else {
            remaining.next().into_iter().collect()
        };
        if values.is_empty() && arg.required {
            return Err(CliError::MissingRequiredArgument {
                argument: arg.name.clone(),
            });
        }
        planned.push(ResolvedArg {
            name: arg.name.clone(),
            field: arg.field,
            values,
        });
    }
    remaining.next().map_or(Ok(planned), |argument| {
        Err(CliError::UnexpectedArgument { argument })
    })
}
