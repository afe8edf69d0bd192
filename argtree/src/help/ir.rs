//! Serialisable description of one command, consumed by help renderers and
//! external documentation tooling.

use serde::Serialize;

use super::Localizer;
use crate::resolve::EffectiveFlags;
use crate::tree::{CommandTree, FlagMeta, NodeId, Text};

/// Current IR schema version.
pub const HELP_IR_VERSION: &str = "1.0";

/// Everything help output may show about one command.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CommandDoc {
    /// Schema version, [`HELP_IR_VERSION`].
    pub ir_version: String,
    /// Command names from the root.
    pub path: Vec<String>,
    /// One-line usage synopsis.
    pub usage: String,
    /// Translated description.
    pub description: Option<String>,
    /// Additional names of this command.
    pub aliases: Vec<String>,
    /// Children under their primary names.
    pub subcommands: Vec<SubcommandDoc>,
    /// Flags declared on this command.
    pub flags: Vec<FlagDoc>,
    /// Flags declared on ancestors and not shadowed here.
    pub inherited_flags: Vec<FlagDoc>,
    /// Positional arguments in declaration order.
    pub args: Vec<ArgDoc>,
}

/// Summary of a child command.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubcommandDoc {
    /// Primary name.
    pub name: String,
    /// Additional names.
    pub aliases: Vec<String>,
    /// Translated description.
    pub description: Option<String>,
}

/// One flag.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FlagDoc {
    /// Long name.
    pub long: String,
    /// Short letter.
    pub short: Option<char>,
    /// Placeholder for the value; `None` for boolean flags.
    pub value_name: Option<String>,
    /// Help text.
    pub help: String,
    /// Declared default.
    pub default: Option<String>,
    /// Environment variable.
    pub env: Option<String>,
    /// Whether the flag must resolve to a value.
    pub required: bool,
    /// Whether repeated occurrences accumulate.
    pub multiple: bool,
    /// Enumerated values, empty when unrestricted.
    pub possible_values: Vec<String>,
}

/// One positional argument.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArgDoc {
    /// Display name.
    pub name: String,
    /// Help text.
    pub help: String,
    /// Whether a token must be given.
    pub required: bool,
    /// Whether it absorbs every remaining token.
    pub greedy: bool,
}

fn resolve_text(text: Option<&Text>, localizer: &dyn Localizer) -> Option<String> {
    match text? {
        Text::Plain(plain) => Some(plain.clone()),
        Text::Key(key) => Some(localizer.message(key, key)),
    }
}

impl From<&FlagMeta> for FlagDoc {
    fn from(meta: &FlagMeta) -> Self {
        Self {
            long: meta.name.clone(),
            short: meta.short,
            value_name: (!meta.kind.is_bool()).then(|| meta.kind.placeholder().to_owned()),
            help: meta.help.clone(),
            default: meta.default.clone(),
            env: meta.env.clone(),
            required: meta.required,
            multiple: meta.kind.is_list(),
            possible_values: meta.choices.clone().unwrap_or_default(),
        }
    }
}

impl CommandDoc {
    /// Describes `node`, resolving translation keys through `localizer`.
    ///
    /// Returns `None` when `node` is not part of `tree`.
    #[must_use]
    pub fn from_tree(tree: &CommandTree, node: NodeId, localizer: &dyn Localizer) -> Option<Self> {
        let current = tree.get(node)?;
        let lineage = tree.path_to(node);
        let path: Vec<String> = lineage
            .iter()
            .filter_map(|id| tree.get(*id))
            .map(|n| n.name.clone())
            .collect();

        let subcommands: Vec<SubcommandDoc> = tree
            .subcommands(node)
            .into_iter()
            .filter_map(|(_, id)| tree.get(id))
            .map(|child| SubcommandDoc {
                name: child.name.clone(),
                aliases: child.aliases.clone(),
                description: resolve_text(child.description.as_ref(), localizer),
            })
            .collect();

        let flags: Vec<FlagDoc> = current.flags.values().map(FlagDoc::from).collect();
        let inherited_flags: Vec<FlagDoc> = EffectiveFlags::collect(tree, &lineage)
            .flags()
            .filter(|meta| meta.field.node != node)
            .map(FlagDoc::from)
            .collect();
        let args: Vec<ArgDoc> = current
            .args
            .iter()
            .map(|arg| ArgDoc {
                name: arg.name.clone(),
                help: arg.help.clone(),
                required: arg.required,
                greedy: arg.greedy,
            })
            .collect();

        let usage = usage_line(&path, !subcommands.is_empty(), &args);
        Some(Self {
            ir_version: HELP_IR_VERSION.to_owned(),
            path,
            usage,
            description: resolve_text(current.description.as_ref(), localizer),
            aliases: current.aliases.clone(),
            subcommands,
            flags,
            inherited_flags,
            args,
        })
    }

    /// Serialises the document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates serialisation failures from `serde_json`.
    #[cfg(feature = "serde_json")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn usage_line(path: &[String], has_subcommands: bool, args: &[ArgDoc]) -> String {
    let mut parts: Vec<String> = path.to_vec();
    parts.push(String::from("[flags]"));
    if has_subcommands {
        parts.push(String::from("<command>"));
    }
    parts.extend(args.iter().map(|arg| match (arg.required, arg.greedy) {
        (true, true) => format!("<{}>...", arg.name),
        (false, true) => format!("[{}...]", arg.name),
        (true, false) => format!("<{}>", arg.name),
        (false, false) => format!("[{}]", arg.name),
    }));
    parts.join(" ")
}
