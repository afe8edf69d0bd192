//! Declarative command-line binding for annotated structs.
//!
//! Derive [`Command`] on a struct, annotate its fields with `#[cli(...)]`,
//! and hand an instance to [`App::new`]. The application builds a command
//! tree from the declarations, parses arguments against it, binds values
//! back onto the fields, and runs the [`Hooks`] of the selected command.
//!
//! ```rust
//! use argtree::{App, Command, Context, HookResult, Hooks, MapEnv};
//!
//! #[derive(Command, Default)]
//! struct Cli {
//!     #[cli(flag = "verbose,v", help = "Print more")]
//!     verbose: bool,
//!     #[cli(cmd, aliases = "a", help = "Add an item")]
//!     add: Add,
//! }
//!
//! #[derive(Command, Default)]
//! #[cli(hooks)]
//! struct Add {
//!     #[cli(flag = "priority,p", default = "3", env = "TODO_PRIORITY")]
//!     priority: u8,
//!     #[cli(arg, required)]
//!     item: String,
//! }
//!
//! impl Hooks for Add {
//!     fn run(&mut self, ctx: &Context<'_>) -> Option<HookResult> {
//!         ctx.logger().success(format_args!("added {}", self.item));
//!         Some(Ok(()))
//!     }
//! }
//!
//! # fn main() -> argtree::CliResult<()> {
//! let mut app = App::new(Cli::default())?.with_env(MapEnv::new());
//! app.run_from(["todo", "-v", "a", "widget"])?;
//! assert!(app.root().verbose);
//! assert_eq!(app.root().add.item, "widget");
//! assert_eq!(app.root().add.priority, 3);
//! # Ok(())
//! # }
//! ```
//!
//! # Field keys
//!
//! | Key | Meaning |
//! |---|---|
//! | `flag`, `flag = "name"`, `flag = "name,s"` | flag with optional short letter |
//! | `arg` | positional argument; a `Vec<String>` field is greedy |
//! | `cmd`, `cmd = "name"` | subcommand, named after the lower-cased field by default |
//! | `aliases = "a,b"` | extra subcommand names |
//! | `commands` | map whose every key is a subcommand |
//! | `reporter` | [`Logger`] slot filled before hooks run |
//! | `help`, `default`, `env`, `required`, `choices` | flag and argument details |
//! | `ignore` | skip the field |
//!
//! Struct keys: `hooks` when the type implements [`Hooks`] itself, and
//! `crate = "path"` to rename this crate.

extern crate self as argtree;

pub mod bind;
pub mod describe;
pub mod dispatch;
pub mod help;
pub mod resolve;
pub mod tree;

mod app;
mod error;
mod report;

pub use app::App;
pub use argtree_macros::Command;
pub use bind::{Handler, Value, ValueKind};
pub use describe::{Command, CommandMap, FieldDescriptor, FieldMut, FieldRole};
pub use dispatch::{Context, HelpReason, HookResult, Hooks, Outcome};
pub use error::{BindError, BoxError, CliError, CliResult, ConfigurationError, Stage};
pub use report::{Logger, Reporter, TracingReporter};
pub use resolve::{Environment, MapEnv, ProcessEnv};

/// Conversion handlers, re-exported under their conventional path.
pub mod handlers {
    pub use crate::bind::{Handler, choice};
}
