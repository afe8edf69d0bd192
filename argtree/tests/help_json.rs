//! The help IR as seen by documentation tooling and custom renderers.

mod common;

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use anyhow::{Context as _, Result, ensure};
use argtree::help::{CommandDoc, HELP_IR_VERSION, HelpRenderer, MapLocalizer};
use argtree::{HelpReason, MapEnv, Outcome};
use common::{Harness, Plugin, harness};
use rstest::{fixture, rstest};
use serde_json::Value;

#[fixture]
fn app() -> Harness {
    let mut h = harness(MapEnv::new()).unwrap_or_else(|err| panic!("fixture tree: {err}"));
    for key in ["lint", "fmt"] {
        let plugin = Plugin {
            journal: Arc::clone(&h.journal),
            ..Plugin::default()
        };
        h.app.root_mut().plugins.insert(key.to_owned(), plugin);
    }
    h.app
        .reload()
        .unwrap_or_else(|err| panic!("fixture reload: {err}"));
    h
}

#[rstest]
#[cfg(feature = "serde_json")]
fn add_doc_serialises_flags_and_arguments(app: Harness) -> Result<()> {
    let doc = app.app.command_doc(&["add"]).context("add doc")?;
    let json: Value = serde_json::from_str(&doc.to_json()?)?;
    ensure!(json["ir_version"] == HELP_IR_VERSION, "version {}", json["ir_version"]);
    ensure!(json["path"] == serde_json::json!(["todo", "add"]), "path {}", json["path"]);
    ensure!(json["aliases"] == serde_json::json!(["a", "new"]), "aliases {}", json["aliases"]);

    let flags = json["flags"].as_array().context("flags array")?;
    let priority = flags
        .iter()
        .find(|flag| flag["long"] == "priority")
        .context("priority flag")?;
    ensure!(priority["short"] == "p", "short {}", priority["short"]);
    ensure!(priority["default"] == "3", "default {}", priority["default"]);
    ensure!(priority["env"] == "TODO_PRIORITY", "env {}", priority["env"]);
    let urgency = flags
        .iter()
        .find(|flag| flag["long"] == "urgency")
        .context("urgency flag")?;
    ensure!(
        urgency["possible_values"] == serde_json::json!(["low", "high"]),
        "choices {}",
        urgency["possible_values"]
    );

    let mut inherited: Vec<&str> = json["inherited_flags"]
        .as_array()
        .context("inherited array")?
        .iter()
        .filter_map(|flag| flag["long"].as_str())
        .collect();
    inherited.sort_unstable();
    ensure!(inherited == ["name", "verbose"], "inherited {inherited:?}");
    ensure!(
        json["args"] == serde_json::json!([{ "name": "item", "help": "Task name", "required": true, "greedy": false }]),
        "args {}",
        json["args"]
    );
    Ok(())
}

#[rstest]
fn plugin_descriptions_go_through_the_translator(app: Harness) -> Result<()> {
    let untranslated = app.app.command_doc(&[]).context("root doc")?;
    let lint = untranslated
        .subcommands
        .iter()
        .find(|sub| sub.name == "lint")
        .context("lint listed")?;
    ensure!(lint.description.as_deref() == Some("plugins.lint"), "key shown verbatim");

    let catalogue = MapLocalizer::new().with("plugins.lint", "Check style");
    let translated = app.app.with_translator(catalogue);
    let doc = translated.command_doc(&[]).context("root doc")?;
    let described: Vec<(&str, Option<&str>)> = doc
        .subcommands
        .iter()
        .map(|sub| (sub.name.as_str(), sub.description.as_deref()))
        .collect();
    ensure!(
        described.contains(&("lint", Some("Check style"))),
        "lint translated: {described:?}"
    );
    ensure!(
        described.contains(&("fmt", Some("plugins.fmt"))),
        "fmt falls back to its key: {described:?}"
    );
    Ok(())
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Option<CommandDoc>>>);

impl HelpRenderer for Captured {
    fn render(&self, doc: &CommandDoc, out: &mut dyn Write) -> io::Result<()> {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(doc.clone());
        }
        writeln!(out, "{}", doc.usage)
    }
}

#[rstest]
fn custom_renderer_receives_the_resolved_doc(app: Harness) -> Result<()> {
    let captured = Captured::default();
    let output = app.output.clone();
    let mut renderer_app = app.app.with_help_renderer(captured.clone());
    let outcome = renderer_app.run_from(["todo", "new", "--help"])?;
    ensure!(outcome == Outcome::HelpShown(HelpReason::Requested), "outcome {outcome:?}");
    let doc = captured
        .0
        .lock()
        .ok()
        .and_then(|slot| slot.clone())
        .context("renderer was called")?;
    ensure!(doc.path == ["todo", "add"], "alias resolves to the canonical path");
    ensure!(output.contents() == "todo add [flags] <item>\n", "output {:?}", output.contents());
    Ok(())
}
