//! Help collaborator: the [`CommandDoc`] IR and its renderers.
//!
//! The core builds a [`CommandDoc`] for the resolved command and hands it to
//! the application's [`HelpRenderer`]. Layout belongs to the renderer; the
//! IR is the stable contract.

mod ir;
mod localizer;

use std::io::{self, Write};

pub use ir::{ArgDoc, CommandDoc, FlagDoc, HELP_IR_VERSION, SubcommandDoc};
pub use localizer::{Localizer, MapLocalizer, NoOpLocalizer};

/// Writes user-facing help for one command.
pub trait HelpRenderer {
    /// Renders `doc` into `out`.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    fn render(&self, doc: &CommandDoc, out: &mut dyn Write) -> io::Result<()>;
}

/// Plain-text renderer used by default.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHelp;

fn flag_label(flag: &FlagDoc) -> String {
    let mut label = flag.short.map_or_else(
        || format!("    --{}", flag.long),
        |short| format!("-{short}, --{}", flag.long),
    );
    if let Some(value) = &flag.value_name {
        label.push(' ');
        label.push_str(value);
    }
    label
}

fn flag_notes(flag: &FlagDoc) -> String {
    let mut notes = Vec::new();
    if flag.required {
        notes.push(String::from("required"));
    }
    if let Some(default) = &flag.default {
        notes.push(format!("default: {default}"));
    }
    if let Some(env) = &flag.env {
        notes.push(format!("env: {env}"));
    }
    if !flag.possible_values.is_empty() {
        notes.push(format!("one of: {}", flag.possible_values.join(", ")));
    }
    if notes.is_empty() {
        String::new()
    } else {
        format!(" ({})", notes.join("; "))
    }
}

fn write_flag_lines(out: &mut dyn Write, flags: &[FlagDoc]) -> io::Result<()> {
    for flag in flags {
        writeln!(
            out,
            "  {:<28} {}{}",
            flag_label(flag),
            flag.help,
            flag_notes(flag)
        )?;
    }
    Ok(())
}

impl HelpRenderer for PlainHelp {
    fn render(&self, doc: &CommandDoc, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Usage: {}", doc.usage)?;
        if let Some(description) = &doc.description {
            writeln!(out, "\n{description}")?;
        }
        if !doc.aliases.is_empty() {
            writeln!(out, "\nAliases: {}", doc.aliases.join(", "))?;
        }
        if !doc.subcommands.is_empty() {
            writeln!(out, "\nCommands:")?;
            for sub in &doc.subcommands {
                let mut name = sub.name.clone();
                if !sub.aliases.is_empty() {
                    name = format!("{name} ({})", sub.aliases.join(", "));
                }
                writeln!(
                    out,
                    "  {name:<28} {}",
                    sub.description.as_deref().unwrap_or_default()
                )?;
            }
        }
        if !doc.args.is_empty() {
            writeln!(out, "\nArguments:")?;
            for arg in &doc.args {
                let name = if arg.greedy {
                    format!("{}...", arg.name)
                } else {
                    arg.name.clone()
                };
                let required = if arg.required { " (required)" } else { "" };
                writeln!(out, "  {name:<28} {}{required}", arg.help)?;
            }
        }
        writeln!(out, "\nFlags:")?;
        write_flag_lines(out, &doc.flags)?;
        writeln!(out, "  {:<28} Show this help", "-h, --help")?;
        if !doc.inherited_flags.is_empty() {
            writeln!(out, "\nGlobal flags:")?;
            write_flag_lines(out, &doc.inherited_flags)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
