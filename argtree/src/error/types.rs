//! Error enums for the three failure domains: tree construction, value
//! conversion, and everything surfaced by [`crate::App::run`].

use std::fmt;

use thiserror::Error;

/// Boxed error returned by lifecycle hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type CliResult<T> = Result<T, CliError>;

/// Malformed command declarations, discovered while building the tree.
///
/// `command` is always the space-separated path of the node being built, so
/// `"app remote add"` for a nested declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// Flag name is empty, starts with `-`, or contains unsupported characters.
    #[error("invalid flag name '{flag}' on '{command}'")]
    InvalidFlagName {
        /// Command declaring the flag.
        command: String,
        /// Offending flag name.
        flag: String,
    },

    /// Short form is not exactly one ASCII alphanumeric character.
    #[error("invalid short form '{short}' for flag --{flag} on '{command}'")]
    InvalidShort {
        /// Command declaring the flag.
        command: String,
        /// Long name of the flag.
        flag: String,
        /// Offending short form as written.
        short: String,
    },

    /// Flag collides with the built-in help flag.
    #[error("flag '{flag}' on '{command}' is reserved for help")]
    ReservedFlag {
        /// Command declaring the flag.
        command: String,
        /// Reserved long or short form.
        flag: String,
    },

    /// Two flags on the same command share a long name.
    #[error("duplicate flag --{flag} on '{command}'")]
    DuplicateFlag {
        /// Command declaring the flags.
        command: String,
        /// Duplicated long name.
        flag: String,
    },

    /// Two flags on the same command share a short letter.
    #[error("duplicate short flag -{short} on '{command}'")]
    DuplicateShort {
        /// Command declaring the flags.
        command: String,
        /// Duplicated short letter.
        short: char,
    },

    /// Command name or alias is empty, starts with `-`, or contains whitespace.
    #[error("invalid command name '{name}' under '{command}'")]
    InvalidCommandName {
        /// Parent command.
        command: String,
        /// Offending name.
        name: String,
    },

    /// Two children of the same command share a name or alias.
    #[error("duplicate command name '{name}' under '{command}'")]
    DuplicateCommand {
        /// Parent command.
        command: String,
        /// Duplicated name.
        name: String,
    },

    /// More than one greedy positional, or a greedy positional followed by
    /// another positional.
    #[error("greedy argument <{argument}> on '{command}' must be the last positional")]
    GreedyNotLast {
        /// Command declaring the arguments.
        command: String,
        /// Greedy argument that is out of place.
        argument: String,
    },

    /// A `choices` list was declared without any entries.
    #[error("flag --{flag} on '{command}' declares an empty choice list")]
    EmptyChoices {
        /// Command declaring the flag.
        command: String,
        /// Flag carrying the empty list.
        flag: String,
    },

    /// The descriptor for a field disagrees with what `field_mut` returns.
    #[error("field '{field}' on '{command}' does not match its declared role ({role})")]
    RoleMismatch {
        /// Command declaring the field.
        command: String,
        /// Rust field name.
        field: String,
        /// Role the descriptor announced.
        role: &'static str,
    },
}

/// Conversion failures raised while binding a raw string onto a field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BindError {
    /// Not a base-10 integer, or out of range for the field.
    #[error("invalid integer '{value}'")]
    InvalidInteger {
        /// Raw input.
        value: String,
    },

    /// Not a decimal floating point literal.
    #[error("invalid float '{value}'")]
    InvalidFloat {
        /// Raw input.
        value: String,
    },

    /// Not in the accepted truthy or falsy token sets.
    #[error("invalid boolean '{value}'")]
    InvalidBoolean {
        /// Raw input.
        value: String,
    },

    /// Not a duration literal such as `5s` or `1h30m`.
    #[error("invalid duration '{value}'")]
    InvalidDuration {
        /// Raw input.
        value: String,
    },

    /// Value outside an enumerated set.
    #[error("invalid value '{value}', expected one of: {}", .choices.join(", "))]
    InvalidChoice {
        /// Raw input.
        value: String,
        /// Accepted values.
        choices: Vec<String>,
    },

    /// Failure reported by a caller-registered handler.
    #[error("{message}")]
    Custom {
        /// Handler-provided explanation.
        message: String,
    },
}

impl BindError {
    /// Builds a [`BindError::Custom`] from any displayable message.
    #[must_use]
    pub fn custom(message: impl fmt::Display) -> Self {
        Self::Custom {
            message: message.to_string(),
        }
    }
}

/// Lifecycle stage in which a hook failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Pre-action hook.
    Before,
    /// Primary action.
    Run,
    /// Post-action hook.
    After,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Before => "before",
            Self::Run => "run",
            Self::After => "after",
        })
    }
}

/// Everything that can go wrong in one parse-and-dispatch cycle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    /// Malformed declarations found while (re)building the tree.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Flag not present in the effective flag set.
    #[error("unknown flag: {flag}")]
    UnknownFlag {
        /// Flag as written on the command line.
        flag: String,
    },

    /// Value-taking flag at the end of the input.
    #[error("flag needs a value: {flag}")]
    MissingFlagValue {
        /// Flag as written on the command line.
        flag: String,
    },

    /// Required flag resolved to an empty value.
    #[error("missing required flag: --{flag}")]
    MissingRequiredFlag {
        /// Long name of the flag.
        flag: String,
    },

    /// Required positional argument with no token left to consume.
    #[error("missing required argument: <{argument}>")]
    MissingRequiredArgument {
        /// Name of the argument.
        argument: String,
    },

    /// Positional token with no declared argument to receive it.
    #[error("unexpected argument: '{argument}'")]
    UnexpectedArgument {
        /// The surplus token.
        argument: String,
    },

    /// A flag or argument value failed conversion.
    #[error("invalid value for {target}: {source}")]
    InvalidValue {
        /// `--flag` or `<argument>` that failed.
        target: String,
        /// Conversion failure.
        #[source]
        source: BindError,
    },

    /// A lifecycle hook or the primary action failed.
    #[error("{stage} hook of '{command}' failed: {source}")]
    Hook {
        /// Command whose hook failed.
        command: String,
        /// Stage that failed.
        stage: Stage,
        /// Error returned by the hook, unchanged.
        #[source]
        source: BoxError,
    },

    /// A node's handle no longer resolves to a live command object, usually
    /// because a keyed collection changed without a reload.
    #[error("command '{command}' is no longer present; reload the application")]
    StaleTree {
        /// Command whose handle failed to resolve.
        command: String,
    },

    /// Writing help output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl CliError {
    /// Process exit status conventionally associated with this error.
    ///
    /// Usage mistakes map to `2`; everything else maps to `1`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::UnknownFlag { .. }
            | Self::MissingFlagValue { .. }
            | Self::MissingRequiredFlag { .. }
            | Self::MissingRequiredArgument { .. }
            | Self::UnexpectedArgument { .. }
            | Self::InvalidValue { .. } => 2,
            _ => 1,
        }
    }

    /// Returns `true` for failures caused by the user's input rather than by
    /// the application.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        self.exit_code() == 2
    }

    /// Conversion failure behind an [`CliError::InvalidValue`], if any.
    #[must_use]
    pub const fn bind_error(&self) -> Option<&BindError> {
        match self {
            Self::InvalidValue { source, .. } => Some(source),
            _ => None,
        }
    }
}
