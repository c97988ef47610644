//! Operation: audit a module graph against a reference version.

use depinambour_core::config::ColorMode;
use depinambour_core::conflict::find_conflicted;
use depinambour_core::graph::ModuleGraph;
use depinambour_core::identity::ModuleIdentity;
use depinambour_core::render::{Palette, TreeRenderer};
use depinambour_util::progress;
use tracing::{info, warn};

use crate::producer::{read_edges, EdgeSource};

/// Options for an audit run.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    /// Reference module, `path` or `path@version`.
    pub reference: String,
    /// Where the module graph comes from.
    pub source: EdgeSource,
    /// Explicit root module; defaults to the parent of the first edge.
    pub root: Option<String>,
    pub color: ColorMode,
}

/// The result of an audit.
#[derive(Debug)]
pub struct AuditOutcome {
    /// The rendered tree, ending with a newline unless the graph was empty.
    pub tree: String,
    pub modules: usize,
    pub implicated: usize,
    pub direct_offenders: usize,
}

/// Build the graph, detect conflicts, and render the tree without printing.
pub fn audit(opts: &AuditOptions) -> miette::Result<AuditOutcome> {
    let reference = ModuleIdentity::parse(&opts.reference)?;
    let text = read_edges(&opts.source)?;

    let mut graph = ModuleGraph::from_edges(text.lines())?;
    if let Some(ref root) = opts.root {
        graph.set_root(root)?;
    }
    for idx in graph.unreachable_modules() {
        warn!(module = %graph.module(idx), "module is not reachable from the root");
    }

    let conflicted = find_conflicted(&graph, &reference);
    let direct_offenders = conflicted.direct_offenders(&graph, &reference).len();
    info!(
        reference = %reference,
        modules = graph.module_count(),
        implicated = conflicted.len(),
        direct_offenders,
        "audit complete"
    );

    let tree = TreeRenderer::new(&graph, &conflicted, &reference)
        .with_palette(Palette::for_mode(opts.color))
        .render();

    Ok(AuditOutcome {
        tree,
        modules: graph.module_count(),
        implicated: conflicted.len(),
        direct_offenders,
    })
}

/// Run an audit and print the tree to stdout, with a summary on stderr.
pub fn run(opts: &AuditOptions) -> miette::Result<()> {
    let outcome = audit(opts)?;

    if outcome.modules == 0 {
        progress::status_warn("Empty", "the module graph has no dependencies");
        return Ok(());
    }

    print!("{}", outcome.tree);
    if outcome.implicated == 0 {
        progress::status("Checked", &format!("{} modules, no conflicts", outcome.modules));
    } else {
        progress::status_warn(
            "Conflicts",
            &format!(
                "{} modules implicated, {} depend directly on a version below {}",
                outcome.implicated, outcome.direct_offenders, opts.reference
            ),
        );
    }
    Ok(())
}
