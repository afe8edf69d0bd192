//! The application: owns the command objects, their tree and the
//! collaborators used during one parse-and-dispatch cycle.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use crate::bind::{Handler, Handlers, Value, bind_value};
use crate::describe::{Command, FieldMut};
use crate::dispatch::{self, HelpReason, Locate, Outcome};
use crate::error::{BindError, CliError, CliResult, ConfigurationError};
use crate::help::{CommandDoc, HelpRenderer, Localizer, NoOpLocalizer, PlainHelp};
use crate::report::Logger;
use crate::resolve::{self, Environment, Invocation, ProcessEnv, Route};
use crate::tree::{self, BuildInput, CommandTree, ExtraInput, FieldRef, NodeId, Origin};

/// Root name used until [`App::with_name`] or the program path supplies one.
const DEFAULT_NAME: &str = "app";

struct Extra {
    name: String,
    help: String,
    command: Box<dyn Command>,
}

/// A command-line application bound to the root struct `T`.
///
/// # Examples
///
/// ```rust
/// use argtree::{App, Command, Context, HookResult, Hooks};
///
/// #[derive(Command, Default)]
/// struct Cli {
///     #[cli(cmd = "add")]
///     add: Add,
/// }
///
/// #[derive(Command, Default)]
/// #[cli(hooks)]
/// struct Add {
///     #[cli(arg, required)]
///     item: String,
/// }
///
/// impl Hooks for Add {
///     fn run(&mut self, _ctx: &Context<'_>) -> Option<HookResult> {
///         Some(Ok(()))
///     }
/// }
///
/// # fn main() -> argtree::CliResult<()> {
/// let mut app = App::new(Cli::default())?.with_name("todo");
/// let outcome = app.run_from(["todo", "add", "widget"])?;
/// assert!(outcome.is_completed());
/// assert_eq!(app.root().add.item, "widget");
/// # Ok(())
/// # }
/// ```
pub struct App<T: Command> {
    root: T,
    extras: Vec<Extra>,
    name: Option<String>,
    about: Option<String>,
    tree: CommandTree,
    logger: Logger,
    env: Box<dyn Environment>,
    output: Box<dyn Write>,
    renderer: Box<dyn HelpRenderer>,
    localizer: Box<dyn Localizer>,
    handlers: Handlers,
}

impl<T: Command> App<T> {
    /// Builds the command tree for `root`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Configuration`] when the declarations are invalid.
    pub fn new(mut root: T) -> CliResult<Self> {
        let tree = tree::build(BuildInput {
            name: DEFAULT_NAME,
            about: None,
            root: &mut root,
            extras: Vec::new(),
        })?;
        Ok(Self {
            root,
            extras: Vec::new(),
            name: None,
            about: None,
            tree,
            logger: Logger::default(),
            env: Box::new(ProcessEnv),
            output: Box::new(io::stdout()),
            renderer: Box::new(PlainHelp),
            localizer: Box::new(NoOpLocalizer),
            handlers: Handlers::default(),
        })
    }

    /// Sets the application name shown as the root of every usage line.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.set_root_name(&name);
        self.name = Some(name);
        self
    }

    /// Sets the root command's description.
    #[must_use]
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        let about = about.into();
        let root = self.tree.root();
        if let Some(node) = self.tree.node_mut(root) {
            node.description = Some(tree::Text::Plain(about.clone()));
        }
        self.about = Some(about);
        self
    }

    /// Replaces the logger injected into reporter slots and hook contexts.
    #[must_use]
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Replaces the environment consulted for flag values.
    #[must_use]
    pub fn with_env(mut self, env: impl Environment + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Redirects help output, standard output by default.
    #[must_use]
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// Replaces the help renderer.
    #[must_use]
    pub fn with_help_renderer(mut self, renderer: impl HelpRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Sets the localizer resolving translation-key descriptions.
    #[must_use]
    pub fn with_translator(mut self, localizer: impl Localizer + 'static) -> Self {
        self.localizer = Box::new(localizer);
        self
    }

    /// Registers a conversion handler for the flag `flag`.
    ///
    /// The handler replaces default conversion for every command declaring a
    /// flag with that long name.
    #[must_use]
    pub fn handler(mut self, flag: impl Into<String>, handler: Handler) -> Self {
        self.handlers.insert(flag, handler);
        self
    }

    /// The root command object.
    #[must_use]
    pub const fn root(&self) -> &T {
        &self.root
    }

    /// Mutable access to the root command object.
    ///
    /// Changes to keyed collections become visible after [`Self::reload`].
    #[must_use]
    pub const fn root_mut(&mut self) -> &mut T {
        &mut self.root
    }

    /// Consumes the application, returning the root command object.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.root
    }

    /// The current command tree.
    #[must_use]
    pub const fn tree(&self) -> &CommandTree {
        &self.tree
    }

    /// Help IR of the command reached by `names` from the root.
    #[must_use]
    pub fn command_doc(&self, names: &[&str]) -> Option<CommandDoc> {
        let node = self.tree.find(names)?;
        CommandDoc::from_tree(&self.tree, node, self.localizer.as_ref())
    }

    /// Attaches `command` under the root as `name`, then rebuilds the tree.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Configuration`] when the name collides or the
    /// command's declarations are invalid; the command is not kept.
    pub fn add_command(
        &mut self,
        name: impl Into<String>,
        help: impl Into<String>,
        command: Box<dyn Command>,
    ) -> CliResult<()> {
        self.extras.push(Extra {
            name: name.into(),
            help: help.into(),
            command,
        });
        if let Err(err) = self.reload() {
            self.extras.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Rebuilds the tree from the command objects.
    ///
    /// Picks up entries added to keyed collections since the last build.
    /// Rebuilding an unchanged application yields an identical tree.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Configuration`] when the declarations are invalid;
    /// the previous tree stays in place.
    pub fn reload(&mut self) -> CliResult<()> {
        self.tree = self.rebuild()?;
        Ok(())
    }

    fn rebuild(&mut self) -> Result<CommandTree, ConfigurationError> {
        let extras = self
            .extras
            .iter_mut()
            .map(|extra| ExtraInput {
                name: &extra.name,
                help: &extra.help,
                command: extra.command.as_mut(),
            })
            .collect();
        tree::build(BuildInput {
            name: self.name.as_deref().unwrap_or(DEFAULT_NAME),
            about: self.about.as_deref(),
            root: &mut self.root,
            extras,
        })
    }

    fn set_root_name(&mut self, name: &str) {
        let root = self.tree.root();
        if let Some(node) = self.tree.node_mut(root) {
            name.clone_into(&mut node.name);
        }
    }

    /// Parses the process arguments and dispatches.
    ///
    /// # Errors
    ///
    /// See [`Self::run_from`].
    pub fn run(&mut self) -> CliResult<Outcome> {
        self.run_from(std::env::args())
    }

    /// Parses the process arguments, dispatches, and maps the result to an
    /// exit status.
    ///
    /// Usage errors have already been reported with help by then; other
    /// failures are reported through the logger here.
    pub fn main(&mut self) -> ExitCode {
        match self.run() {
            Ok(outcome) => ExitCode::from(outcome.exit_code()),
            Err(err) => {
                if !err.is_usage() {
                    self.logger.error(&err);
                }
                ExitCode::from(err.exit_code())
            }
        }
    }

    /// Parses `args` and dispatches. The first element is the program path.
    ///
    /// Every flag and argument on the resolved path starts from its absent
    /// state, so nothing bound by an earlier run carries over.
    ///
    /// # Errors
    ///
    /// Usage errors ([`CliError::is_usage`]) are reported through the logger
    /// and followed by the resolved command's help before they are returned.
    /// Hook failures are returned as [`CliError::Hook`].
    pub fn run_from<I, S>(&mut self, args: I) -> CliResult<Outcome>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        if let Some(program) = args.next() {
            if self.name.is_none() {
                if let Some(stem) = Path::new(&program).file_stem().and_then(|s| s.to_str()) {
                    self.set_root_name(stem);
                    self.name = Some(stem.to_owned());
                }
            }
        }
        let tokens: Vec<String> = args.collect();

        let route = resolve::route(&self.tree, &tokens);
        if route.wants_help() {
            self.show_help(route.node())?;
            return Ok(Outcome::HelpShown(HelpReason::Requested));
        }

        let invocation = match route
            .resolve(&self.tree, self.env.as_ref())
            .and_then(|invocation| self.bind(&invocation).map(|()| invocation))
        {
            Ok(invocation) => invocation,
            Err(err) => return Err(self.usage_failure(route.node(), err)),
        };
        self.inject_reporters(&route)?;

        let outcome = {
            let mut objects = Objects {
                root: &mut self.root,
                extras: &mut self.extras,
                tree: &self.tree,
            };
            dispatch::dispatch(&mut objects, &self.tree, &route.path, &self.logger)?
        };
        if outcome == Outcome::HelpShown(HelpReason::NoActionDefined) {
            self.show_help(invocation.node)?;
        }
        Ok(outcome)
    }

    fn usage_failure(&mut self, node: NodeId, err: CliError) -> CliError {
        self.logger.error(&err);
        self.show_help(node).map_or_else(|output| output, |()| err)
    }

    fn show_help(&mut self, node: NodeId) -> CliResult<()> {
        let Some(doc) = CommandDoc::from_tree(&self.tree, node, self.localizer.as_ref()) else {
            return Err(stale(&self.tree, node));
        };
        self.renderer.render(&doc, self.output.as_mut())?;
        self.output.flush()?;
        Ok(())
    }

    fn objects(&mut self) -> Objects<'_> {
        Objects {
            root: &mut self.root,
            extras: &mut self.extras,
            tree: &self.tree,
        }
    }

    fn bind(&mut self, invocation: &Invocation) -> CliResult<()> {
        let handlers = self.handlers.clone();
        let mut objects = self.objects();
        for flag in &invocation.flags {
            let target = format!("--{}", flag.name);
            let handler = handlers.get(&flag.name);
            objects.with_value(flag.field, &target, |value| {
                value.reset();
                for raw in &flag.values {
                    if let Some(choices) = &flag.choices {
                        if !choices.iter().any(|choice| choice == raw) {
                            return Err(BindError::InvalidChoice {
                                value: raw.clone(),
                                choices: choices.clone(),
                            });
                        }
                    }
                    bind_value(value, raw, handler)?;
                }
                Ok(())
            })?;
        }
        for arg in &invocation.positionals {
            let target = format!("<{}>", arg.name);
            objects.with_value(arg.field, &target, |value| {
                value.reset();
                arg.values.iter().try_for_each(|raw| value.bind(raw))
            })?;
        }
        Ok(())
    }

    fn inject_reporters(&mut self, route: &Route) -> CliResult<()> {
        let logger = self.logger.clone();
        let tree = &self.tree;
        let mut objects = Objects {
            root: &mut self.root,
            extras: &mut self.extras,
            tree,
        };
        for id in &route.path {
            let Some(node) = tree.get(*id) else {
                continue;
            };
            for index in &node.reporters {
                let command = objects.locate(*id)?;
                match command.field_mut(*index) {
                    Some(FieldMut::Reporter(slot)) => *slot = logger.clone(),
                    _ => return Err(stale(tree, *id)),
                }
            }
        }
        Ok(())
    }
}

fn stale(tree: &CommandTree, node: NodeId) -> CliError {
    tracing::warn!(node = node.index(), "command handle no longer resolves");
    CliError::StaleTree {
        command: tree.display_path(node),
    }
}

/// Live command objects addressed through tree handles.
struct Objects<'a> {
    root: &'a mut dyn Command,
    extras: &'a mut [Extra],
    tree: &'a CommandTree,
}

impl Objects<'_> {
    fn with_value<F>(&mut self, field: FieldRef, target: &str, bind: F) -> CliResult<()>
    where
        F: FnOnce(&mut dyn Value) -> Result<(), BindError>,
    {
        let tree = self.tree;
        let command = self.locate(field.node)?;
        let Some(FieldMut::Value(value)) = command.field_mut(field.index) else {
            return Err(stale(tree, field.node));
        };
        bind(value).map_err(|source| CliError::InvalidValue {
            target: target.to_owned(),
            source,
        })
    }
}

impl Locate for Objects<'_> {
    fn locate(&mut self, node: NodeId) -> CliResult<&mut dyn Command> {
        let tree = self.tree;
        let Some(meta) = tree.get(node) else {
            return Err(stale(tree, node));
        };
        let origin: &mut dyn Command = match meta.handle.origin {
            Origin::Root => &mut *self.root,
            Origin::Extra(position) => match self.extras.get_mut(position) {
                Some(extra) => extra.command.as_mut(),
                None => return Err(stale(tree, node)),
            },
        };
        meta.handle.locate(origin).ok_or_else(|| stale(tree, node))
    }
}
