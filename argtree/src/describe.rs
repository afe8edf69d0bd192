//! Field-describing visitor implemented by every bound command struct.
//!
//! Rust has no runtime reflection, so `#[derive(Command)]` emits two
//! functions per struct: [`Command::fields`] lists the declared roles of the
//! annotated fields, and [`Command::field_mut`] hands out mutable access to a
//! field by its declaration index. The tree builder reads the former once;
//! the binder and dispatcher use the latter through stable handles.
//!
//! Hand-written implementations are supported and validated exactly like
//! derived ones:
//!
//! ```rust
//! use argtree::{Command, FieldDescriptor, FieldMut, Hooks};
//!
//! #[derive(Default)]
//! struct Greet {
//!     name: String,
//! }
//!
//! impl Command for Greet {
//!     fn fields(&self) -> Vec<FieldDescriptor> {
//!         vec![FieldDescriptor::flag(0, "name", "name").short("n")]
//!     }
//!
//!     fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
//!         match index {
//!             0 => Some(FieldMut::Value(&mut self.name)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl Hooks for Greet {}
//! ```

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::bind::Value;
use crate::dispatch::Hooks;
use crate::report::Logger;

/// A struct that can be bound as a command node.
///
/// Usually derived; see the crate documentation for the `#[cli(...)]` keys.
pub trait Command: Hooks {
    /// Declared roles of the struct's annotated fields, in declaration order.
    fn fields(&self) -> Vec<FieldDescriptor>;

    /// Mutable access to the field at `index`, as announced by [`Self::fields`].
    ///
    /// Returns `None` for indices that carry no role. Optional subcommand
    /// slots are allocated with `Default` on first access.
    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>>;
}

impl<T: Command + ?Sized> Command for Box<T> {
    fn fields(&self) -> Vec<FieldDescriptor> {
        (**self).fields()
    }

    fn field_mut(&mut self, index: usize) -> Option<FieldMut<'_>> {
        (**self).field_mut(index)
    }
}

/// Mutable view of one field, tagged by role.
pub enum FieldMut<'a> {
    /// Flag or positional destination.
    Value(&'a mut dyn Value),
    /// Nested subcommand struct.
    Command(&'a mut dyn Command),
    /// Keyed collection whose entries are subcommands.
    Commands(&'a mut dyn CommandMap),
    /// Logging capability slot.
    Reporter(&'a mut Logger),
}

impl FieldMut<'_> {
    /// Short role label used in diagnostics.
    #[must_use]
    pub const fn role(&self) -> &'static str {
        match self {
            Self::Value(_) => "value",
            Self::Command(_) => "command",
            Self::Commands(_) => "commands",
            Self::Reporter(_) => "reporter",
        }
    }
}

/// Allocates an optional subcommand slot on first access.
///
/// Used by the derive for `Option<T>` and `Option<Box<T>>` command fields.
pub fn optional_slot<'a, T>(slot: &'a mut Option<T>) -> &'a mut dyn Command
where
    T: Command + Default + 'a,
{
    slot.get_or_insert_with(T::default)
}

/// Keyed collection of subcommands ("any key is a subcommand").
///
/// Entries present when the tree is built become child nodes named by their
/// key. Entries added later appear only after [`crate::App::reload`].
pub trait CommandMap {
    /// Current keys, in a stable order.
    fn keys(&self) -> Vec<String>;

    /// Mutable access to the entry stored under `key`.
    fn entry_mut(&mut self, key: &str) -> Option<&mut dyn Command>;
}

impl<T: Command> CommandMap for BTreeMap<String, T> {
    fn keys(&self) -> Vec<String> {
        self.iter().map(|(key, _)| key.clone()).collect()
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut dyn Command> {
        self.get_mut(key).map(|entry| entry as &mut dyn Command)
    }
}

impl<T: Command, S: BuildHasher> CommandMap for HashMap<String, T, S> {
    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.iter().map(|(key, _)| key.clone()).collect();
        keys.sort_unstable();
        keys
    }

    fn entry_mut(&mut self, key: &str) -> Option<&mut dyn Command> {
        self.get_mut(key).map(|entry| entry as &mut dyn Command)
    }
}

/// Declared role of one struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declaration index, passed back to [`Command::field_mut`].
    pub index: usize,
    /// Rust field name, used for argument names and diagnostics.
    pub field: String,
    /// What the field is bound as.
    pub role: FieldRole,
}

/// Role-specific metadata of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRole {
    /// `--name[=value]` flag.
    Flag(FlagSpec),
    /// Positional argument.
    Arg(ArgSpec),
    /// Subcommand held in the field.
    Command(CommandSpec),
    /// Keyed collection of subcommands.
    Commands(CollectionSpec),
    /// Logging capability slot.
    Reporter,
}

/// Flag declaration as written on the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSpec {
    /// Long name, without dashes.
    pub name: String,
    /// Optional one-letter alias, validated by the tree builder.
    pub short: Option<String>,
    /// Help text.
    pub help: String,
    /// Default value in string form.
    pub default: Option<String>,
    /// Environment variable consulted when no command-line value is given.
    pub env: Option<String>,
    /// Whether an empty resolved value is an error.
    pub required: bool,
    /// Enumerated accepted values.
    pub choices: Option<Vec<String>>,
}

/// Positional argument declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgSpec {
    /// Help text.
    pub help: String,
    /// Whether a missing token is an error.
    pub required: bool,
}

/// Subcommand declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    /// Primary name.
    pub name: String,
    /// Additional names resolving to the same node.
    pub aliases: Vec<String>,
    /// Help text.
    pub help: String,
}

/// Keyed collection declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionSpec {
    /// Translation-key prefix; entry descriptions become `<prefix>.<key>`.
    pub help_prefix: Option<String>,
}

impl FieldDescriptor {
    fn new(index: usize, field: impl Into<String>, role: FieldRole) -> Self {
        Self {
            index,
            field: field.into(),
            role,
        }
    }

    /// Declares a flag named `name`.
    #[must_use]
    pub fn flag(index: usize, field: impl Into<String>, name: impl Into<String>) -> Self {
        let spec = FlagSpec {
            name: name.into(),
            ..FlagSpec::default()
        };
        Self::new(index, field, FieldRole::Flag(spec))
    }

    /// Declares a positional argument.
    #[must_use]
    pub fn arg(index: usize, field: impl Into<String>) -> Self {
        Self::new(index, field, FieldRole::Arg(ArgSpec::default()))
    }

    /// Declares a subcommand named `name`.
    #[must_use]
    pub fn command(index: usize, field: impl Into<String>, name: impl Into<String>) -> Self {
        let spec = CommandSpec {
            name: name.into(),
            ..CommandSpec::default()
        };
        Self::new(index, field, FieldRole::Command(spec))
    }

    /// Declares a keyed collection of subcommands.
    #[must_use]
    pub fn commands(index: usize, field: impl Into<String>) -> Self {
        Self::new(index, field, FieldRole::Commands(CollectionSpec::default()))
    }

    /// Declares a logging capability slot.
    #[must_use]
    pub fn reporter(index: usize, field: impl Into<String>) -> Self {
        Self::new(index, field, FieldRole::Reporter)
    }

    /// Sets the short alias of a flag.
    #[must_use]
    pub fn short(mut self, short: impl Into<String>) -> Self {
        if let FieldRole::Flag(spec) = &mut self.role {
            spec.short = Some(short.into());
        }
        self
    }

    /// Sets help text; for collections this is the translation-key prefix.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        let help = help.into();
        match &mut self.role {
            FieldRole::Flag(spec) => spec.help = help,
            FieldRole::Arg(spec) => spec.help = help,
            FieldRole::Command(spec) => spec.help = help,
            FieldRole::Commands(spec) => spec.help_prefix = Some(help),
            FieldRole::Reporter => {}
        }
        self
    }

    /// Sets the default value of a flag.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        if let FieldRole::Flag(spec) = &mut self.role {
            spec.default = Some(value.into());
        }
        self
    }

    /// Sets the environment variable of a flag.
    #[must_use]
    pub fn env(mut self, name: impl Into<String>) -> Self {
        if let FieldRole::Flag(spec) = &mut self.role {
            spec.env = Some(name.into());
        }
        self
    }

    /// Marks a flag or argument as required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        match &mut self.role {
            FieldRole::Flag(spec) => spec.required = required,
            FieldRole::Arg(spec) => spec.required = required,
            _ => {}
        }
        self
    }

    /// Restricts a flag to an enumerated set of values.
    #[must_use]
    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let FieldRole::Flag(spec) = &mut self.role {
            spec.choices = Some(choices.into_iter().map(Into::into).collect());
        }
        self
    }

    /// Adds aliases to a subcommand.
    #[must_use]
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let FieldRole::Command(spec) = &mut self.role {
            spec.aliases.extend(aliases.into_iter().map(Into::into));
        }
        self
    }
}
