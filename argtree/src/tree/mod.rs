//! The command tree: one node per command, stored in an arena.
//!
//! Nodes never borrow the command structs they describe. Each node keeps a
//! [`Handle`] (a path of field and entry steps from its origin object) and
//! every flag or argument keeps a [`FieldRef`] (owning node plus field
//! index). The application resolves these against the live objects when it
//! binds or dispatches.

mod builder;
mod handle;

use std::collections::BTreeMap;

pub use builder::{BuildInput, ExtraInput, HELP_LONG, HELP_SHORT, build};
pub use handle::{FieldRef, Handle, Origin, Step};

use crate::bind::ValueKind;

/// Index of a node inside its [`CommandTree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Description of a command, either literal or a translation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Text {
    /// Shown as written.
    Plain(String),
    /// Looked up through the application's localizer.
    Key(String),
}

/// Metadata of one flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagMeta {
    /// Long name, without dashes.
    pub name: String,
    /// One-letter alias.
    pub short: Option<char>,
    /// Help text.
    pub help: String,
    /// Default value in string form.
    pub default: Option<String>,
    /// Environment variable consulted when no command-line value is given.
    pub env: Option<String>,
    /// Whether an empty resolved value is an error (ignored for booleans).
    pub required: bool,
    /// Accepted values, if enumerated.
    pub choices: Option<Vec<String>>,
    /// Shape of the destination.
    pub kind: ValueKind,
    /// Destination field.
    pub field: FieldRef,
}

/// Metadata of one positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgMeta {
    /// Display name, taken from the field name.
    pub name: String,
    /// Help text.
    pub help: String,
    /// Whether a missing token is an error.
    pub required: bool,
    /// Consumes every remaining token.
    pub greedy: bool,
    /// Shape of the destination.
    pub kind: ValueKind,
    /// Destination field.
    pub field: FieldRef,
}

/// One command or subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    /// Primary name, unique among siblings.
    pub name: String,
    /// Optional description.
    pub description: Option<Text>,
    /// Additional names, each mapped to this node in the parent's children.
    pub aliases: Vec<String>,
    /// Flags declared on this node, by long name.
    pub flags: BTreeMap<String, FlagMeta>,
    /// Short letter to long name, for this node's flags.
    pub shorts: BTreeMap<char, String>,
    /// Positional arguments in declaration order.
    pub args: Vec<ArgMeta>,
    /// Children by name and alias; aliases share the primary entry's id.
    pub children: BTreeMap<String, NodeId>,
    /// Parent node; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Handle to the bound command object.
    pub handle: Handle,
    /// Indices of `#[cli(reporter)]` fields.
    pub reporters: Vec<usize>,
}

impl CommandNode {
    pub(crate) const fn new(name: String, parent: Option<NodeId>, handle: Handle) -> Self {
        Self {
            name,
            description: None,
            aliases: Vec::new(),
            flags: BTreeMap::new(),
            shorts: BTreeMap::new(),
            args: Vec::new(),
            children: BTreeMap::new(),
            parent,
            handle,
            reporters: Vec::new(),
        }
    }
}

/// Arena of command nodes rooted at [`CommandTree::root`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTree {
    nodes: Vec<CommandNode>,
}

impl CommandTree {
    const ROOT: NodeId = NodeId(0);

    pub(crate) fn with_root(node: CommandNode) -> Self {
        Self { nodes: vec![node] }
    }

    pub(crate) fn push(&mut self, node: CommandNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut CommandNode> {
        self.nodes.get_mut(id.0)
    }

    /// Id of the root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        Self::ROOT
    }

    /// Node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&CommandNode> {
        self.nodes.get(id.0)
    }

    /// Number of distinct nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CommandNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// Child of `parent` reachable under `name` (primary name or alias).
    #[must_use]
    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.get(parent)?.children.get(name).copied()
    }

    /// Children of `parent` under their primary names only, in name order.
    #[must_use]
    pub fn subcommands(&self, parent: NodeId) -> Vec<(&str, NodeId)> {
        let Some(node) = self.get(parent) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter(|(key, id)| self.get(**id).is_some_and(|child| child.name == **key))
            .map(|(key, id)| (key.as_str(), *id))
            .collect()
    }

    /// Follows `names` from the root, returning the node they lead to.
    #[must_use]
    pub fn find(&self, names: &[&str]) -> Option<NodeId> {
        names
            .iter()
            .try_fold(self.root(), |current, name| self.child(current, name))
    }

    /// Ids from the root down to `id`, inclusive.
    #[must_use]
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.get(current).and_then(|node| node.parent);
        }
        path.reverse();
        path
    }

    /// Space-separated command names from the root down to `id`.
    #[must_use]
    pub fn display_path(&self, id: NodeId) -> String {
        self.path_to(id)
            .into_iter()
            .filter_map(|node| self.get(node).map(|n| n.name.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
