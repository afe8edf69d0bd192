//! A small task manager showing flags, aliases, greedy arguments and
//! plugin-style keyed subcommands.
//!
//! ```text
//! cargo run --example todo -- -v add -p 5 -t home "buy milk"
//! TODO_PRIORITY=1 cargo run --example todo -- new "call back"
//! cargo run --example todo -- tag home urgent
//! cargo run --example todo -- greet --dry-run
//! RUST_LOG=argtree=debug cargo run --example todo -- add x
//! ```

use std::collections::BTreeMap;
use std::process::ExitCode;

use argtree::help::MapLocalizer;
use argtree::{App, Command, Context, HookResult, Hooks, Logger};
use tracing_subscriber::EnvFilter;

#[derive(Command, Default)]
#[cli(hooks)]
struct Todo {
    #[cli(flag = "verbose,v", help = "Print each step")]
    verbose: bool,
    #[cli(cmd = "add", aliases = "a,new", help = "Add a task")]
    add: Add,
    #[cli(cmd, help = "Label existing tasks")]
    tag: Tag,
    #[cli(commands, help = "plugins")]
    plugins: BTreeMap<String, Plugin>,
    #[cli(reporter)]
    log: Logger,
}

impl Hooks for Todo {
    fn before(&mut self, ctx: &Context<'_>) -> HookResult {
        if self.verbose {
            self.log.info(format_args!("running {}", ctx.path().join(" ")));
        }
        Ok(())
    }
}

#[derive(Command, Default)]
#[cli(hooks)]
struct Add {
    #[cli(flag = "priority,p", default = "3", env = "TODO_PRIORITY", help = "Task priority")]
    priority: u8,
    #[cli(flag = "tag,t", help = "Labels to attach")]
    tags: Vec<String>,
    #[cli(flag, choices = "low,high", help = "How soon it matters")]
    urgency: Option<String>,
    #[cli(arg, required, help = "What to do")]
    item: String,
    #[cli(reporter)]
    log: Logger,
}

impl Hooks for Add {
    fn run(&mut self, _ctx: &Context<'_>) -> Option<HookResult> {
        let labels = if self.tags.is_empty() {
            String::from("none")
        } else {
            self.tags.join(", ")
        };
        self.log.success(format_args!(
            "added '{}' (priority {}, labels: {labels})",
            self.item, self.priority
        ));
        if let Some(urgency) = &self.urgency {
            self.log.info(format_args!("urgency {urgency}"));
        }
        Some(Ok(()))
    }
}

#[derive(Command, Default)]
#[cli(hooks)]
struct Tag {
    #[cli(arg, required, help = "Labels to apply")]
    labels: Vec<String>,
    #[cli(reporter)]
    log: Logger,
}

impl Hooks for Tag {
    fn run(&mut self, _ctx: &Context<'_>) -> Option<HookResult> {
        self.log.success(format_args!("tagged with {}", self.labels.join(" ")));
        Some(Ok(()))
    }
}

#[derive(Command, Default)]
#[cli(hooks)]
struct Plugin {
    #[cli(flag, help = "Report without changing anything")]
    dry_run: bool,
    #[cli(reporter)]
    log: Logger,
}

impl Hooks for Plugin {
    fn run(&mut self, ctx: &Context<'_>) -> Option<HookResult> {
        let mode = if self.dry_run { " (dry run)" } else { "" };
        self.log.success(format_args!("plugin {}{mode}", ctx.command()));
        Some(Ok(()))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    let mut root = Todo::default();
    root.plugins.insert("greet".to_owned(), Plugin::default());

    let catalogue = MapLocalizer::new().with("plugins.greet", "Say hello");
    match App::new(root) {
        Ok(app) => app
            .with_name("todo")
            .with_about("Keep track of things to do")
            .with_translator(catalogue)
            .main(),
        Err(err) => {
            Logger::default().error(&err);
            ExitCode::FAILURE
        }
    }
}
