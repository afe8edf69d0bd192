//! The hook pipeline over a resolved path.

use super::{Context, HelpReason, Outcome};
use crate::describe::Command;
use crate::error::{BoxError, CliError, CliResult, Stage};
use crate::report::Logger;
use crate::tree::{CommandTree, NodeId};

/// Resolves tree nodes to their live command objects.
pub(crate) trait Locate {
    /// Command object behind `node`.
    fn locate(&mut self, node: NodeId) -> CliResult<&mut dyn Command>;
}

fn failed(tree: &CommandTree, node: NodeId, stage: Stage, source: BoxError) -> CliError {
    CliError::Hook {
        command: tree.display_path(node),
        stage,
        source,
    }
}

/// Runs pre-hooks, the action, and post-hooks for `path`.
pub(crate) fn dispatch(
    targets: &mut dyn Locate,
    tree: &CommandTree,
    path: &[NodeId],
    logger: &Logger,
) -> CliResult<Outcome> {
    let names: Vec<String> = path
        .iter()
        .filter_map(|id| tree.get(*id))
        .map(|node| node.name.clone())
        .collect();

    for (depth, id) in path.iter().enumerate() {
        let ctx = Context::new(&names, depth, logger);
        tracing::debug!(command = ctx.command(), stage = %Stage::Before, "running hook");
        targets
            .locate(*id)?
            .before(&ctx)
            .map_err(|source| failed(tree, *id, Stage::Before, source))?;
    }

    let Some((depth, leaf)) = path.iter().copied().enumerate().last() else {
        return Ok(Outcome::HelpShown(HelpReason::NoActionDefined));
    };
    let ctx = Context::new(&names, depth, logger);
    tracing::debug!(command = ctx.command(), stage = %Stage::Run, "running hook");
    match targets.locate(leaf)?.run(&ctx) {
        None => {
            tracing::debug!(command = ctx.command(), "no action defined");
            return Ok(Outcome::HelpShown(HelpReason::NoActionDefined));
        }
        Some(Err(source)) => return Err(failed(tree, leaf, Stage::Run, source)),
        Some(Ok(())) => {}
    }

    for (depth, id) in path.iter().enumerate().rev() {
        let ctx = Context::new(&names, depth, logger);
        tracing::debug!(command = ctx.command(), stage = %Stage::After, "running hook");
        targets
            .locate(*id)?
            .after(&ctx)
            .map_err(|source| failed(tree, *id, Stage::After, source))?;
    }
    Ok(Outcome::Completed)
}
