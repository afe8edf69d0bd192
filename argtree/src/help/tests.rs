use std::collections::BTreeMap;

use super::*;
use crate::tree::{BuildInput, CommandTree, build};
use anyhow::{Context, Result, ensure};
use rstest::{fixture, rstest};

#[derive(crate::Command, Default)]
struct Add {
    #[cli(flag = "priority,p", help = "Task priority", default = "3", env = "TODO_PRIORITY")]
    priority: u8,
    #[cli(flag, help = "Output format", choices = "text,json")]
    format: String,
    #[cli(flag = "verbose", help = "Chatty add")]
    verbose: bool,
    #[cli(arg, required, help = "Task name")]
    name: String,
    #[cli(arg, help = "Labels")]
    labels: Vec<String>,
}

#[derive(crate::Command, Default)]
struct Plugin {}

#[derive(crate::Command, Default)]
struct Todo {
    #[cli(flag = "verbose,v", help = "Verbose output")]
    verbose: bool,
    #[cli(flag, help = "Data file", required)]
    file: String,
    #[cli(cmd, aliases = "a", help = "Add a task")]
    add: Add,
    #[cli(commands, help = "plugins")]
    plugins: BTreeMap<String, Plugin>,
}

#[fixture]
fn tree() -> CommandTree {
    let mut todo = Todo::default();
    todo.plugins.insert("sync".to_owned(), Plugin::default());
    let built = build(BuildInput {
        name: "todo",
        about: Some("Manage tasks"),
        root: &mut todo,
        extras: Vec::new(),
    });
    built.unwrap_or_else(|err| panic!("fixture tree: {err}"))
}

fn doc(tree: &CommandTree, names: &[&str], localizer: &dyn Localizer) -> Result<CommandDoc> {
    let node = tree.find(names).context("node exists")?;
    CommandDoc::from_tree(tree, node, localizer).context("doc")
}

#[rstest]
fn root_doc_lists_children_and_own_flags(tree: CommandTree) -> Result<()> {
    let root = doc(&tree, &[], &NoOpLocalizer)?;
    ensure!(root.ir_version == HELP_IR_VERSION, "version");
    ensure!(root.path == ["todo"], "path {:?}", root.path);
    ensure!(root.usage == "todo [flags] <command>", "usage {}", root.usage);
    ensure!(root.description.as_deref() == Some("Manage tasks"), "description");
    let names: Vec<&str> = root.subcommands.iter().map(|s| s.name.as_str()).collect();
    ensure!(names == ["add", "sync"], "subcommands {names:?}");
    let add = root.subcommands.first().context("add summary")?;
    ensure!(add.aliases == ["a"], "aliases {:?}", add.aliases);
    ensure!(root.inherited_flags.is_empty(), "root inherits nothing");
    let file = root.flags.iter().find(|f| f.long == "file").context("file flag")?;
    ensure!(file.required && file.value_name.as_deref() == Some("string"), "file flag");
    Ok(())
}

#[rstest]
fn shadowed_ancestor_flags_are_not_inherited(tree: CommandTree) -> Result<()> {
    let add = doc(&tree, &["a"], &NoOpLocalizer)?;
    ensure!(add.path == ["todo", "add"], "path {:?}", add.path);
    ensure!(
        add.usage == "todo add [flags] <name> [labels...]",
        "usage {}",
        add.usage
    );
    let own: Vec<&str> = add.flags.iter().map(|f| f.long.as_str()).collect();
    ensure!(own == ["format", "priority", "verbose"], "own {own:?}");
    let inherited: Vec<&str> = add.inherited_flags.iter().map(|f| f.long.as_str()).collect();
    ensure!(inherited == ["file"], "inherited {inherited:?}");
    let priority = add.flags.iter().find(|f| f.long == "priority").context("priority")?;
    ensure!(priority.short == Some('p'), "short");
    ensure!(priority.value_name.as_deref() == Some("int"), "value name");
    ensure!(priority.env.as_deref() == Some("TODO_PRIORITY"), "env");
    let verbose = add.flags.iter().find(|f| f.long == "verbose").context("verbose")?;
    ensure!(verbose.value_name.is_none(), "bool flags take no value");
    let labels = add.args.last().context("labels")?;
    ensure!(labels.greedy && !labels.required, "labels arg");
    Ok(())
}

#[rstest]
fn collection_descriptions_are_translated(tree: CommandTree) -> Result<()> {
    let catalogue = MapLocalizer::new().with("plugins.sync", "Synchronise tasks");
    let root = doc(&tree, &[], &catalogue)?;
    let sync = root.subcommands.iter().find(|s| s.name == "sync").context("sync")?;
    ensure!(
        sync.description.as_deref() == Some("Synchronise tasks"),
        "description {:?}",
        sync.description
    );
    let untranslated = doc(&tree, &["sync"], &NoOpLocalizer)?;
    ensure!(
        untranslated.description.as_deref() == Some("plugins.sync"),
        "keys fall back verbatim"
    );
    Ok(())
}

#[rstest]
fn plain_help_renders_sections(tree: CommandTree) -> Result<()> {
    let add = doc(&tree, &["add"], &NoOpLocalizer)?;
    let mut out = Vec::new();
    PlainHelp.render(&add, &mut out)?;
    let text = String::from_utf8(out)?;
    for needle in [
        "Usage: todo add [flags] <name> [labels...]",
        "Arguments:",
        "name",
        "Task name (required)",
        "labels...",
        "-p, --priority int",
        "(default: 3; env: TODO_PRIORITY)",
        "(one of: text, json)",
        "-h, --help",
        "Global flags:",
        "--file string",
    ] {
        ensure!(text.contains(needle), "missing `{needle}` in:\n{text}");
    }
    let flags_at = text.find("Flags:").context("flags section")?;
    let global_at = text.find("Global flags:").context("global section")?;
    ensure!(flags_at < global_at, "own flags come first");
    Ok(())
}

#[cfg(feature = "serde_json")]
#[rstest]
fn json_ir_is_stable(tree: CommandTree) -> Result<()> {
    let root = doc(&tree, &[], &NoOpLocalizer)?;
    let value: serde_json::Value = serde_json::from_str(&root.to_json()?)?;
    ensure!(value["ir_version"] == "1.0", "version field");
    ensure!(value["subcommands"][0]["name"] == "add", "subcommand field");
    ensure!(value["flags"][0]["long"] == "file", "flag field");
    ensure!(value["flags"][0]["required"] == true, "required field");
    Ok(())
}
