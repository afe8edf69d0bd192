//! Shared fixtures for integration tests: a small task-manager command tree,
//! a recording reporter, and an `App` factory wired to in-memory output.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use argtree::{App, Command, Context, HookResult, Hooks, Logger, MapEnv, Reporter};
use test_helpers::output::SharedBuffer;

/// Lifecycle journal shared between the fixture commands and the test.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn record(journal: &Journal, entry: impl Into<String>) {
    if let Ok(mut entries) = journal.lock() {
        entries.push(entry.into());
    }
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().map(|e| e.clone()).unwrap_or_default()
}

#[derive(Command, Default)]
#[cli(hooks)]
pub struct AddCmd {
    #[cli(flag = "priority,p", default = "3", env = "TODO_PRIORITY", help = "Task priority")]
    pub priority: u8,
    #[cli(flag = "tag,t", help = "Labels to attach")]
    pub tags: Vec<String>,
    #[cli(flag, choices = "low,high", help = "Urgency")]
    pub urgency: Option<String>,
    #[cli(arg, required, help = "Task name")]
    pub item: String,
    #[cli(reporter)]
    pub log: Logger,
    pub journal: Journal,
}

impl Hooks for AddCmd {
    fn before(&mut self, ctx: &Context<'_>) -> HookResult {
        record(&self.journal, format!("before:{}", ctx.command()));
        Ok(())
    }

    fn run(&mut self, ctx: &Context<'_>) -> Option<HookResult> {
        record(&self.journal, format!("run:{}", ctx.command()));
        self.log.success(format_args!("added {}", self.item));
        Some(Ok(()))
    }

    fn after(&mut self, ctx: &Context<'_>) -> HookResult {
        record(&self.journal, format!("after:{}", ctx.command()));
        Ok(())
    }
}

#[derive(Command, Default)]
pub struct TagCmd {
    #[cli(arg)]
    pub names: Vec<String>,
}

#[derive(Command, Default)]
#[cli(hooks)]
pub struct Plugin {
    #[cli(flag)]
    pub dry_run: bool,
    pub journal: Journal,
}

impl Hooks for Plugin {
    fn run(&mut self, ctx: &Context<'_>) -> Option<HookResult> {
        record(&self.journal, format!("plugin:{}", ctx.command()));
        Some(Ok(()))
    }
}

#[derive(Command, Default)]
#[cli(hooks)]
pub struct Todo {
    #[cli(flag = "verbose,v", help = "Print more")]
    pub verbose: bool,
    #[cli(flag = "name,n", help = "Owner name")]
    pub name: String,
    #[cli(cmd = "add", aliases = "a,new", help = "Add a task")]
    pub add: AddCmd,
    #[cli(cmd, help = "Tag tasks")]
    pub tag: Option<Box<TagCmd>>,
    #[cli(commands, help = "plugins")]
    pub plugins: BTreeMap<String, Plugin>,
    pub journal: Journal,
}

impl Hooks for Todo {
    fn before(&mut self, ctx: &Context<'_>) -> HookResult {
        record(&self.journal, format!("before:{}", ctx.command()));
        Ok(())
    }

    fn after(&mut self, ctx: &Context<'_>) -> HookResult {
        record(&self.journal, format!("after:{}", ctx.command()));
        Ok(())
    }
}

/// Root struct with one shared journal.
pub fn todo(journal: &Journal) -> Todo {
    Todo {
        add: AddCmd {
            journal: Arc::clone(journal),
            ..AddCmd::default()
        },
        journal: Arc::clone(journal),
        ..Todo::default()
    }
}

/// Reporter collecting `level: message` lines.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    lines: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    fn push(&self, level: &str, message: fmt::Arguments<'_>) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(format!("{level}: {message}"));
        }
    }
}

impl Reporter for Recorder {
    fn info(&self, message: fmt::Arguments<'_>) {
        self.push("info", message);
    }

    fn warning(&self, message: fmt::Arguments<'_>) {
        self.push("warning", message);
    }

    fn error(&self, message: fmt::Arguments<'_>) {
        self.push("error", message);
    }

    fn success(&self, message: fmt::Arguments<'_>) {
        self.push("success", message);
    }
}

/// Everything a test observes about one application.
pub struct Harness {
    pub app: App<Todo>,
    pub output: SharedBuffer,
    pub recorder: Recorder,
    pub journal: Journal,
}

/// Builds the task-manager application with isolated environment and output.
pub fn harness(env: MapEnv) -> anyhow::Result<Harness> {
    let journal = Journal::default();
    let output = SharedBuffer::default();
    let recorder = Recorder::default();
    let app = App::new(todo(&journal))?
        .with_name("todo")
        .with_env(env)
        .with_output(output.clone())
        .with_logger(Logger::new(recorder.clone()));
    Ok(Harness {
        app,
        output,
        recorder,
        journal,
    })
}
