//! End-to-end runs of the task-manager fixture through `App::run_from`.

mod common;

use anyhow::{Context as _, Result, ensure};
use argtree::{App, CliError, Command, Context, HelpReason, HookResult, Hooks, MapEnv, Outcome};
use common::{entries, harness};
use rstest::rstest;

#[derive(Command, Default)]
#[cli(hooks)]
struct AddOnly {
    #[cli(arg, required)]
    item: String,
    ran: bool,
}

impl Hooks for AddOnly {
    fn run(&mut self, _ctx: &Context<'_>) -> Option<HookResult> {
        self.ran = true;
        Some(Ok(()))
    }
}

#[derive(Command, Default)]
struct Minimal {
    #[cli(cmd = "add")]
    add: AddOnly,
}

#[rstest]
fn add_widget_runs_the_action() -> Result<()> {
    let mut app = App::new(Minimal::default())?
        .with_env(MapEnv::new())
        .with_output(test_helpers::output::SharedBuffer::default());
    let outcome = app.run_from(["prog", "add", "widget"])?;
    ensure!(outcome == Outcome::Completed, "outcome {outcome:?}");
    ensure!(outcome.exit_code() == 0, "exit status");
    ensure!(app.root().add.item == "widget", "item {}", app.root().add.item);
    ensure!(app.root().add.ran, "action ran");
    Ok(())
}

#[rstest]
fn missing_argument_shows_help_and_fails() -> Result<()> {
    let output = test_helpers::output::SharedBuffer::default();
    let mut app = App::new(Minimal::default())?
        .with_env(MapEnv::new())
        .with_output(output.clone());
    let err = app
        .run_from(["prog", "add"])
        .err()
        .context("run should fail")?;
    ensure!(
        matches!(&err, CliError::MissingRequiredArgument { argument } if argument == "item"),
        "error {err}"
    );
    ensure!(err.exit_code() != 0, "non-zero status");
    ensure!(!app.root().add.ran, "action must not run");
    let help = output.contents();
    ensure!(help.contains("Usage: prog add [flags] <item>"), "help shown:\n{help}");
    Ok(())
}

#[rstest]
fn program_name_comes_from_argv0() -> Result<()> {
    let output = test_helpers::output::SharedBuffer::default();
    let mut app = App::new(Minimal::default())?
        .with_env(MapEnv::new())
        .with_output(output.clone());
    let outcome = app.run_from(["/usr/local/bin/tasks", "--help"])?;
    ensure!(outcome == Outcome::HelpShown(HelpReason::Requested), "outcome {outcome:?}");
    ensure!(output.contents().starts_with("Usage: tasks [flags] <command>"), "usage line");
    Ok(())
}

#[rstest]
fn values_bind_through_global_flags_and_aliases() -> Result<()> {
    let mut h = harness(MapEnv::new())?;
    let outcome = h
        .app
        .run_from(["todo", "-v", "--name=ana", "new", "-p", "7", "-t", "a", "--tag", "b", "write"])?;
    ensure!(outcome.is_completed(), "alias reaches the add action");
    let root = h.app.root();
    ensure!(root.verbose, "global bool flag before the command");
    ensure!(root.name == "ana", "text round-trip {}", root.name);
    ensure!(root.add.priority == 7, "priority {}", root.add.priority);
    ensure!(root.add.tags == ["a", "b"], "tags {:?}", root.add.tags);
    ensure!(root.add.item == "write", "item {}", root.add.item);
    Ok(())
}

#[rstest]
#[case::long(&["todo", "--name", "foo", "add", "x"][..])]
#[case::short(&["todo", "-n", "foo", "add", "x"][..])]
#[case::inline(&["todo", "--name=foo", "add", "x"][..])]
#[case::after_command(&["todo", "add", "-n", "foo", "x"][..])]
fn short_and_long_forms_resolve_identically(#[case] args: &[&str]) -> Result<()> {
    let mut h = harness(MapEnv::new())?;
    let outcome = h.app.run_from(args.iter().copied())?;
    ensure!(outcome.is_completed(), "outcome {outcome:?}");
    ensure!(h.app.root().name == "foo", "name {}", h.app.root().name);
    Ok(())
}

#[rstest]
fn greedy_positional_keeps_encounter_order() -> Result<()> {
    let mut h = harness(MapEnv::new())?;
    let outcome = h.app.run_from(["todo", "tag", "x", "y", "z"])?;
    let names = h.app.root().tag.as_ref().map(|tag| tag.names.clone());
    ensure!(
        names == Some(vec!["x".to_owned(), "y".to_owned(), "z".to_owned()]),
        "names {names:?}"
    );
    ensure!(
        outcome == Outcome::HelpShown(HelpReason::NoActionDefined),
        "tag has no action: {outcome:?}"
    );
    Ok(())
}

#[rstest]
fn terminator_passes_dash_tokens_through() -> Result<()> {
    let mut h = harness(MapEnv::new())?;
    let outcome = h.app.run_from(["todo", "tag", "--", "-h", "--verbose"])?;
    ensure!(!outcome.is_completed(), "tag has no action");
    let names = h.app.root().tag.as_ref().map(|tag| tag.names.clone()).unwrap_or_default();
    ensure!(names == ["-h", "--verbose"], "names {names:?}");
    ensure!(!h.app.root().verbose, "terminated flags are not parsed");
    Ok(())
}

#[rstest]
fn help_wins_over_usage_errors() -> Result<()> {
    let mut h = harness(MapEnv::new())?;
    let outcome = h.app.run_from(["todo", "add", "--bogus", "-h"])?;
    ensure!(outcome == Outcome::HelpShown(HelpReason::Requested), "outcome {outcome:?}");
    let help = h.output.contents();
    ensure!(help.contains("Usage: todo add [flags] <item>"), "help:\n{help}");
    ensure!(entries(&h.journal).is_empty(), "no hook runs for help");
    Ok(())
}

#[rstest]
fn root_without_action_shows_help() -> Result<()> {
    let mut h = harness(MapEnv::new())?;
    let outcome = h.app.run_from(["todo"])?;
    ensure!(outcome == Outcome::HelpShown(HelpReason::NoActionDefined), "outcome {outcome:?}");
    ensure!(entries(&h.journal) == ["before:todo"], "pre-hooks ran first");
    ensure!(h.output.contents().contains("Commands:"), "root help lists commands");
    Ok(())
}

#[rstest]
#[case::unknown(&["todo", "add", "--nope", "x"][..], "unknown flag: --nope")]
#[case::missing_value(&["todo", "add", "x", "-p"][..], "flag needs a value: -p")]
#[case::bad_integer(&["todo", "add", "-p", "high", "x"][..], "invalid value for --priority: invalid integer 'high'")]
#[case::bad_bool(&["todo", "--verbose=maybe", "add", "x"][..], "invalid value for --verbose: invalid boolean 'maybe'")]
#[case::surplus(&["todo", "add", "x", "y"][..], "unexpected argument: 'y'")]
fn usage_errors_are_reported_before_help(#[case] args: &[&str], #[case] message: &str) -> Result<()> {
    let mut h = harness(MapEnv::new())?;
    let err = h
        .app
        .run_from(args.iter().copied())
        .err()
        .context("run should fail")?;
    ensure!(err.to_string() == message, "message {err}");
    ensure!(err.is_usage() && err.exit_code() == 2, "usage status");
    let logged = h.recorder.lines();
    ensure!(logged == [format!("error: {message}")], "logged {logged:?}");
    ensure!(h.output.contents().starts_with("Usage: todo"), "help follows the error");
    ensure!(entries(&h.journal).is_empty(), "no hooks on usage errors");
    Ok(())
}
