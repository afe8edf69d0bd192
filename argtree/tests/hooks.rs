//! Lifecycle ordering, hook failures and reporter injection through `App`.

mod common;

use std::sync::{Arc, Mutex};

use anyhow::{Context as _, Result, ensure};
use argtree::{App, CliError, Command, Context, HookResult, Hooks, MapEnv, Stage};
use common::{Plugin, entries, harness};
use rstest::rstest;
use test_helpers::output::SharedBuffer;

#[rstest]
fn hooks_wrap_the_action_in_path_order() -> Result<()> {
    let mut h = harness(MapEnv::new())?;
    let outcome = h.app.run_from(["todo", "add", "widget"])?;
    ensure!(outcome.is_completed(), "outcome {outcome:?}");
    ensure!(
        entries(&h.journal)
            == [
                "before:todo",
                "before:add",
                "run:add",
                "after:add",
                "after:todo",
            ],
        "journal {:?}",
        entries(&h.journal)
    );
    Ok(())
}

#[rstest]
fn reporter_slot_receives_the_application_logger() -> Result<()> {
    let mut h = harness(MapEnv::new())?;
    let outcome = h.app.run_from(["todo", "add", "widget"])?;
    ensure!(outcome.is_completed(), "outcome {outcome:?}");
    ensure!(
        h.recorder.lines() == ["success: added widget"],
        "lines {:?}",
        h.recorder.lines()
    );
    Ok(())
}

#[rstest]
fn silent_hooks_leave_the_reporter_empty() -> Result<()> {
    let mut h = harness(MapEnv::new())?;
    let lint = Plugin {
        journal: Arc::clone(&h.journal),
        ..Plugin::default()
    };
    h.app.root_mut().plugins.insert("lint".to_owned(), lint);
    h.app.reload()?;
    let outcome = h.app.run_from(["todo", "lint"])?;
    ensure!(outcome.is_completed(), "outcome {outcome:?}");
    ensure!(entries(&h.journal).contains(&"plugin:lint".to_owned()), "plugin ran");
    ensure!(h.recorder.lines().is_empty(), "lines {:?}", h.recorder.lines());
    Ok(())
}

type Log = Arc<Mutex<Vec<String>>>;

fn note(log: &Log, entry: String) {
    if let Ok(mut log) = log.lock() {
        log.push(entry);
    }
}

#[derive(Command, Default)]
#[cli(hooks)]
struct Step {
    fail: Option<Stage>,
    log: Log,
}

impl Step {
    fn stage(&self, stage: Stage, ctx: &Context<'_>) -> HookResult {
        note(&self.log, format!("{stage}:{}", ctx.command()));
        if self.fail == Some(stage) {
            return Err(format!("{} refused", ctx.command()).into());
        }
        Ok(())
    }
}

impl Hooks for Step {
    fn before(&mut self, ctx: &Context<'_>) -> HookResult {
        self.stage(Stage::Before, ctx)
    }

    fn run(&mut self, ctx: &Context<'_>) -> Option<HookResult> {
        Some(self.stage(Stage::Run, ctx))
    }

    fn after(&mut self, ctx: &Context<'_>) -> HookResult {
        self.stage(Stage::After, ctx)
    }
}

#[derive(Command, Default)]
#[cli(hooks)]
struct Pipeline {
    #[cli(cmd)]
    deploy: Step,
    fail: Option<Stage>,
    log: Log,
}

impl Hooks for Pipeline {
    fn before(&mut self, ctx: &Context<'_>) -> HookResult {
        note(&self.log, format!("before:{}", ctx.command()));
        if self.fail == Some(Stage::Before) {
            return Err("root refused".into());
        }
        Ok(())
    }

    fn after(&mut self, ctx: &Context<'_>) -> HookResult {
        note(&self.log, format!("after:{}", ctx.command()));
        Ok(())
    }
}

fn pipeline(root_fail: Option<Stage>, leaf_fail: Option<Stage>) -> Result<(App<Pipeline>, Log)> {
    let log = Log::default();
    let root = Pipeline {
        deploy: Step {
            fail: leaf_fail,
            log: Arc::clone(&log),
        },
        fail: root_fail,
        log: Arc::clone(&log),
    };
    let app = App::new(root)?
        .with_name("ci")
        .with_env(MapEnv::new())
        .with_output(SharedBuffer::default());
    Ok((app, log))
}

fn logged(log: &Log) -> Vec<String> {
    log.lock().map(|l| l.clone()).unwrap_or_default()
}

#[rstest]
#[case::root_before(Some(Stage::Before), None, "ci", Stage::Before, &["before:ci"][..])]
#[case::leaf_before(None, Some(Stage::Before), "ci deploy", Stage::Before, &["before:ci", "before:deploy"][..])]
#[case::leaf_run(None, Some(Stage::Run), "ci deploy", Stage::Run, &["before:ci", "before:deploy", "run:deploy"][..])]
#[case::leaf_after(
    None,
    Some(Stage::After),
    "ci deploy",
    Stage::After,
    &["before:ci", "before:deploy", "run:deploy", "after:deploy"][..]
)]
fn failing_hook_aborts_the_rest(
    #[case] root_fail: Option<Stage>,
    #[case] leaf_fail: Option<Stage>,
    #[case] command: &str,
    #[case] stage: Stage,
    #[case] expected: &[&str],
) -> Result<()> {
    let (mut app, log) = pipeline(root_fail, leaf_fail)?;
    let err = app
        .run_from(["ci", "deploy"])
        .err()
        .context("hook failure must surface")?;
    let CliError::Hook {
        command: failed,
        stage: failed_stage,
        source,
    } = &err
    else {
        anyhow::bail!("expected a hook error, got {err}");
    };
    ensure!(failed == command, "command {failed}");
    ensure!(*failed_stage == stage, "stage {failed_stage}");
    ensure!(source.to_string().ends_with("refused"), "source kept: {source}");
    ensure!(err.exit_code() == 1, "hook failures are not usage errors");
    ensure!(logged(&log) == expected, "log {:?}", logged(&log));
    Ok(())
}
