//! Stable handles from tree nodes back to live command objects.

use super::NodeId;
use crate::describe::{Command, FieldMut};

/// Object a handle starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The application's root struct.
    Root,
    /// A command added with [`crate::App::add_command`], by insertion order.
    Extra(usize),
}

/// One step from a command object to a nested one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Subcommand field at this declaration index.
    Field(usize),
    /// Entry `key` of the keyed collection at declaration index `field`.
    Entry {
        /// Declaration index of the collection field.
        field: usize,
        /// Collection key.
        key: String,
    },
}

/// Path from an [`Origin`] to a node's command object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle {
    /// Starting object.
    pub origin: Origin,
    /// Steps taken from the origin.
    pub steps: Vec<Step>,
}

impl Handle {
    /// Handle of an origin object itself.
    #[must_use]
    pub const fn origin(origin: Origin) -> Self {
        Self {
            origin,
            steps: Vec::new(),
        }
    }

    /// Handle one step further down.
    #[must_use]
    pub fn join(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self {
            origin: self.origin,
            steps,
        }
    }

    /// Walks the steps from `origin`, returning the command they lead to.
    ///
    /// Returns `None` when a step no longer matches the object graph, for
    /// example after a collection entry was removed.
    pub fn locate<'a>(&self, origin: &'a mut dyn Command) -> Option<&'a mut dyn Command> {
        let mut current = origin;
        for step in &self.steps {
            current = match step {
                Step::Field(index) => match current.field_mut(*index)? {
                    FieldMut::Command(command) => command,
                    _ => return None,
                },
                Step::Entry { field, key } => match current.field_mut(*field)? {
                    FieldMut::Commands(map) => map.entry_mut(key)?,
                    _ => return None,
                },
            };
        }
        Some(current)
    }
}

/// Destination of a flag or positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRef {
    /// Node whose command object owns the field.
    pub node: NodeId,
    /// Declaration index of the field.
    pub index: usize,
}
