//! Walks command objects through their [`Command`] visitor and validates the
//! resulting tree.

use super::{
    ArgMeta, CommandNode, CommandTree, FieldRef, FlagMeta, Handle, NodeId, Origin, Step, Text,
};
use crate::bind::ValueKind;
use crate::describe::{
    ArgSpec, CollectionSpec, Command, CommandSpec, FieldDescriptor, FieldMut, FieldRole, FlagSpec,
};
use crate::error::ConfigurationError;

/// Long flag name reserved for the built-in help flag.
pub const HELP_LONG: &str = "help";
/// Short flag letter reserved for the built-in help flag.
pub const HELP_SHORT: char = 'h';

/// A command attached to the root from outside the root struct.
pub struct ExtraInput<'a> {
    /// Primary name under the root.
    pub name: &'a str,
    /// Description shown in help.
    pub help: &'a str,
    /// The command object.
    pub command: &'a mut dyn Command,
}

/// Everything the builder needs to produce a tree.
pub struct BuildInput<'a> {
    /// Application (root command) name.
    pub name: &'a str,
    /// Application description.
    pub about: Option<&'a str>,
    /// Root command object.
    pub root: &'a mut dyn Command,
    /// Commands added with [`crate::App::add_command`], in insertion order.
    pub extras: Vec<ExtraInput<'a>>,
}

/// Builds and validates a command tree.
///
/// Walking visits fields in declaration order. Optional subcommand slots are
/// allocated on the way, so building mutates the command objects.
///
/// # Errors
///
/// Returns the first [`ConfigurationError`] encountered.
pub fn build(input: BuildInput<'_>) -> Result<CommandTree, ConfigurationError> {
    let BuildInput {
        name,
        about,
        root,
        extras,
    } = input;

    let mut node = CommandNode::new(name.to_owned(), None, Handle::origin(Origin::Root));
    node.description = about.map(|text| Text::Plain(text.to_owned()));
    let mut tree = CommandTree::with_root(node);
    let root_id = tree.root();
    walk(&mut tree, root_id, root)?;

    for (position, extra) in extras.into_iter().enumerate() {
        let mut child = CommandNode::new(
            extra.name.to_owned(),
            Some(root_id),
            Handle::origin(Origin::Extra(position)),
        );
        child.description = plain(extra.help);
        let id = attach(&mut tree, root_id, child)?;
        walk(&mut tree, id, extra.command)?;
    }

    tracing::debug!(nodes = tree.len(), root = name, "built command tree");
    Ok(tree)
}

fn plain(help: &str) -> Option<Text> {
    (!help.is_empty()).then(|| Text::Plain(help.to_owned()))
}

fn walk(
    tree: &mut CommandTree,
    id: NodeId,
    command: &mut dyn Command,
) -> Result<(), ConfigurationError> {
    for descriptor in command.fields() {
        let FieldDescriptor { index, field, role } = descriptor;
        match role {
            FieldRole::Flag(spec) => add_flag(tree, id, command, index, &field, spec)?,
            FieldRole::Arg(spec) => add_arg(tree, id, command, index, field, spec)?,
            FieldRole::Command(spec) => add_command(tree, id, command, index, &field, spec)?,
            FieldRole::Commands(spec) => add_collection(tree, id, command, index, &field, &spec)?,
            FieldRole::Reporter => {
                if !matches!(command.field_mut(index), Some(FieldMut::Reporter(_))) {
                    return Err(mismatch(tree, id, &field, "reporter"));
                }
                if let Some(node) = tree.node_mut(id) {
                    node.reporters.push(index);
                }
            }
        }
    }
    check_greedy(tree, id)
}

fn mismatch(tree: &CommandTree, id: NodeId, field: &str, role: &'static str) -> ConfigurationError {
    ConfigurationError::RoleMismatch {
        command: tree.display_path(id),
        field: field.to_owned(),
        role,
    }
}

fn value_kind(
    tree: &CommandTree,
    id: NodeId,
    command: &mut dyn Command,
    index: usize,
    field: &str,
    role: &'static str,
) -> Result<ValueKind, ConfigurationError> {
    match command.field_mut(index) {
        Some(FieldMut::Value(value)) => Ok(value.kind()),
        _ => Err(mismatch(tree, id, field, role)),
    }
}

fn valid_flag_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

fn parse_short(command: &str, flag: &str, short: &str) -> Result<char, ConfigurationError> {
    let mut chars = short.chars();
    match (chars.next(), chars.next()) {
        (Some(HELP_SHORT), None) => Err(ConfigurationError::ReservedFlag {
            command: command.to_owned(),
            flag: short.to_owned(),
        }),
        (Some(letter), None) if letter.is_ascii_alphanumeric() => Ok(letter),
        _ => Err(ConfigurationError::InvalidShort {
            command: command.to_owned(),
            flag: flag.to_owned(),
            short: short.to_owned(),
        }),
    }
}

fn add_flag(
    tree: &mut CommandTree,
    id: NodeId,
    command: &mut dyn Command,
    index: usize,
    field: &str,
    spec: FlagSpec,
) -> Result<(), ConfigurationError> {
    let path = tree.display_path(id);
    if spec.name == HELP_LONG {
        return Err(ConfigurationError::ReservedFlag {
            command: path,
            flag: spec.name,
        });
    }
    if !valid_flag_name(&spec.name) {
        return Err(ConfigurationError::InvalidFlagName {
            command: path,
            flag: spec.name,
        });
    }
    let short = spec
        .short
        .as_deref()
        .map(|short| parse_short(&path, &spec.name, short))
        .transpose()?;
    if spec.choices.as_ref().is_some_and(Vec::is_empty) {
        return Err(ConfigurationError::EmptyChoices {
            command: path,
            flag: spec.name,
        });
    }
    let kind = value_kind(tree, id, command, index, field, "flag")?;

    let node = tree
        .node_mut(id)
        .ok_or_else(|| mismatch_detached(&path, field))?;
    if node.flags.contains_key(&spec.name) {
        return Err(ConfigurationError::DuplicateFlag {
            command: path,
            flag: spec.name,
        });
    }
    if let Some(letter) = short {
        if node.shorts.contains_key(&letter) {
            return Err(ConfigurationError::DuplicateShort {
                command: path,
                short: letter,
            });
        }
        node.shorts.insert(letter, spec.name.clone());
    }
    let meta = FlagMeta {
        name: spec.name.clone(),
        short,
        help: spec.help,
        default: spec.default,
        env: spec.env,
        required: spec.required,
        choices: spec.choices,
        kind,
        field: FieldRef { node: id, index },
    };
    node.flags.insert(spec.name, meta);
    Ok(())
}

fn mismatch_detached(path: &str, field: &str) -> ConfigurationError {
    ConfigurationError::RoleMismatch {
        command: path.to_owned(),
        field: field.to_owned(),
        role: "node",
    }
}

fn add_arg(
    tree: &mut CommandTree,
    id: NodeId,
    command: &mut dyn Command,
    index: usize,
    field: String,
    spec: ArgSpec,
) -> Result<(), ConfigurationError> {
    let kind = value_kind(tree, id, command, index, &field, "arg")?;
    let path = tree.display_path(id);
    let node = tree
        .node_mut(id)
        .ok_or_else(|| mismatch_detached(&path, &field))?;
    node.args.push(ArgMeta {
        name: field,
        help: spec.help,
        required: spec.required,
        greedy: kind.is_list(),
        kind,
        field: FieldRef { node: id, index },
    });
    Ok(())
}

fn check_greedy(tree: &CommandTree, id: NodeId) -> Result<(), ConfigurationError> {
    let Some(node) = tree.get(id) else {
        return Ok(());
    };
    let last = node.args.len().saturating_sub(1);
    node.args
        .iter()
        .enumerate()
        .find(|(position, arg)| arg.greedy && *position != last)
        .map_or(Ok(()), |(_, arg)| {
            Err(ConfigurationError::GreedyNotLast {
                command: tree.display_path(id),
                argument: arg.name.clone(),
            })
        })
}

fn valid_command_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('-') && !name.chars().any(char::is_whitespace)
}

/// Registers `node` under its name and aliases among `parent`'s children.
fn attach(
    tree: &mut CommandTree,
    parent: NodeId,
    node: CommandNode,
) -> Result<NodeId, ConfigurationError> {
    let path = tree.display_path(parent);
    let names: Vec<String> = std::iter::once(node.name.clone())
        .chain(node.aliases.iter().cloned())
        .collect();
    for (position, name) in names.iter().enumerate() {
        if !valid_command_name(name) {
            return Err(ConfigurationError::InvalidCommandName {
                command: path,
                name: name.clone(),
            });
        }
        let taken = tree
            .get(parent)
            .is_some_and(|existing| existing.children.contains_key(name))
            || names.iter().take(position).any(|earlier| earlier == name);
        if taken {
            return Err(ConfigurationError::DuplicateCommand {
                command: path,
                name: name.clone(),
            });
        }
    }

    let id = tree.push(node);
    if let Some(parent_node) = tree.node_mut(parent) {
        parent_node
            .children
            .extend(names.into_iter().map(|name| (name, id)));
    }
    Ok(id)
}

fn node_handle(tree: &CommandTree, id: NodeId) -> Handle {
    tree.get(id)
        .map_or_else(|| Handle::origin(Origin::Root), |node| node.handle.clone())
}

fn add_command(
    tree: &mut CommandTree,
    parent: NodeId,
    command: &mut dyn Command,
    index: usize,
    field: &str,
    spec: CommandSpec,
) -> Result<(), ConfigurationError> {
    let handle = node_handle(tree, parent).join(Step::Field(index));
    let Some(FieldMut::Command(child)) = command.field_mut(index) else {
        return Err(mismatch(tree, parent, field, "cmd"));
    };
    let mut node = CommandNode::new(spec.name, Some(parent), handle);
    node.description = plain(&spec.help);
    node.aliases = spec.aliases;
    let id = attach(tree, parent, node)?;
    walk(tree, id, child)
}

fn add_collection(
    tree: &mut CommandTree,
    parent: NodeId,
    command: &mut dyn Command,
    index: usize,
    field: &str,
    spec: &CollectionSpec,
) -> Result<(), ConfigurationError> {
    let base = node_handle(tree, parent);
    let Some(FieldMut::Commands(map)) = command.field_mut(index) else {
        return Err(mismatch(tree, parent, field, "commands"));
    };
    for key in map.keys() {
        let Some(entry) = map.entry_mut(&key) else {
            continue;
        };
        let handle = base.join(Step::Entry {
            field: index,
            key: key.clone(),
        });
        let mut node = CommandNode::new(key.clone(), Some(parent), handle);
        node.description = spec
            .help_prefix
            .as_ref()
            .map(|prefix| Text::Key(format!("{prefix}.{key}")));
        let id = attach(tree, parent, node)?;
        walk(tree, id, entry)?;
    }
    Ok(())
}
