//! Command Dispatcher: lifecycle hooks along the resolved path.
//!
//! Pre-hooks run root to leaf, then the leaf's action, then post-hooks leaf
//! to root. The first failure aborts the rest of the pipeline. A leaf
//! without an action ends dispatch with help instead of an error; its
//! pre-hooks have already run by then.

mod pipeline;

pub(crate) use pipeline::{Locate, dispatch};

use crate::error::BoxError;
use crate::report::Logger;

/// Result of a lifecycle hook.
pub type HookResult = Result<(), BoxError>;

/// Lifecycle capabilities of a command struct.
///
/// Every method defaults to doing nothing. `run` returns `None` for commands
/// that only group subcommands; dispatching to such a command shows its help.
///
/// Dispatch reports nothing on a hook's behalf. User-facing messages come
/// from the hooks, through [`Context::logger`] or a `reporter` field; the
/// application itself only reports usage errors.
///
/// # Examples
///
/// ```rust
/// use argtree::{Context, HookResult, Hooks};
///
/// struct Deploy {
///     target: String,
/// }
///
/// impl Hooks for Deploy {
///     fn run(&mut self, ctx: &Context<'_>) -> Option<HookResult> {
///         ctx.logger().info(format_args!("deploying to {}", self.target));
///         Some(Ok(()))
///     }
/// }
/// ```
pub trait Hooks {
    /// Runs before the action, root first.
    ///
    /// # Errors
    ///
    /// An error aborts dispatch; later hooks and the action do not run.
    fn before(&mut self, ctx: &Context<'_>) -> HookResult {
        let _ = ctx;
        Ok(())
    }

    /// The primary action, run only on the resolved command.
    fn run(&mut self, ctx: &Context<'_>) -> Option<HookResult> {
        let _ = ctx;
        None
    }

    /// Runs after the action, leaf first.
    ///
    /// # Errors
    ///
    /// An error aborts dispatch; hooks closer to the root do not run.
    fn after(&mut self, ctx: &Context<'_>) -> HookResult {
        let _ = ctx;
        Ok(())
    }
}

impl<T: Hooks + ?Sized> Hooks for Box<T> {
    fn before(&mut self, ctx: &Context<'_>) -> HookResult {
        (**self).before(ctx)
    }

    fn run(&mut self, ctx: &Context<'_>) -> Option<HookResult> {
        (**self).run(ctx)
    }

    fn after(&mut self, ctx: &Context<'_>) -> HookResult {
        (**self).after(ctx)
    }
}

/// What a hook can see of the invocation.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    path: &'a [String],
    depth: usize,
    logger: &'a Logger,
}

impl<'a> Context<'a> {
    pub(crate) const fn new(path: &'a [String], depth: usize, logger: &'a Logger) -> Self {
        Self {
            path,
            depth,
            logger,
        }
    }

    /// Command names from the root to the resolved command.
    #[must_use]
    pub const fn path(&self) -> &'a [String] {
        self.path
    }

    /// Name of the command whose hook is running.
    #[must_use]
    pub fn command(&self) -> &'a str {
        self.path.get(self.depth).map_or("", String::as_str)
    }

    /// Name of the resolved command.
    #[must_use]
    pub fn resolved(&self) -> &'a str {
        self.path.last().map_or("", String::as_str)
    }

    /// Whether the running hook belongs to the resolved command.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.depth + 1 == self.path.len()
    }

    /// The application's logger.
    #[must_use]
    pub const fn logger(&self) -> &'a Logger {
        self.logger
    }
}

/// Why help was shown instead of running an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpReason {
    /// `-h` or `--help` was given.
    Requested,
    /// The resolved command has no action.
    NoActionDefined,
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Outcome {
    /// The action and every hook ran.
    Completed,
    /// Help was written instead.
    HelpShown(HelpReason),
}

impl Outcome {
    /// Process exit status; always success.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        0
    }

    /// Whether the action ran.
    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}
