//! Tree rendering of the conflicted part of a module graph.
//!
//! Only edges leading to implicated modules (or to the stale module itself)
//! are drawn. Cycle detection is path-local: each branch carries its own
//! copy of the edges taken from the root, so a module may appear under
//! several parents.

use std::collections::HashSet;

use console::Style;
use petgraph::graph::NodeIndex;

use crate::config::ColorMode;
use crate::conflict::{classify, Classification, ConflictSet};
use crate::graph::ModuleGraph;
use crate::identity::ModuleIdentity;

/// Suffix appended to a node whose edge was already taken on the current path.
pub const CYCLE_MARKER: &str = " [...] (cycle)";

type EdgeSet = HashSet<(NodeIndex, NodeIndex)>;

/// Terminal styles for each [`Classification`].
#[derive(Debug, Clone)]
pub struct Palette {
    default: Style,
    implicated: Style,
    offender: Style,
    stale: Style,
}

impl Palette {
    /// Green for uninvolved modules, bright yellow for implicated ones, red
    /// for direct offenders and stale versions.
    pub fn colored() -> Self {
        Self {
            default: Style::new().green(),
            implicated: Style::new().yellow().bright(),
            offender: Style::new().red(),
            stale: Style::new().red(),
        }
    }

    /// No styling at all.
    pub fn plain() -> Self {
        Self {
            default: Style::new(),
            implicated: Style::new(),
            offender: Style::new(),
            stale: Style::new(),
        }
    }

    /// Resolve a configured colour mode. `Auto` defers to terminal detection.
    pub fn for_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Never => Self::plain(),
            ColorMode::Auto => Self::colored(),
            ColorMode::Always => {
                let c = Self::colored();
                Self {
                    default: c.default.force_styling(true),
                    implicated: c.implicated.force_styling(true),
                    offender: c.offender.force_styling(true),
                    stale: c.stale.force_styling(true),
                }
            }
        }
    }

    pub fn style(&self, class: Classification) -> &Style {
        match class {
            Classification::Default => &self.default,
            Classification::Implicated => &self.implicated,
            Classification::DirectOffender => &self.offender,
            Classification::Stale => &self.stale,
        }
    }
}

/// Renders the paths from the root to every implicated module.
pub struct TreeRenderer<'a> {
    graph: &'a ModuleGraph,
    conflicted: &'a ConflictSet,
    reference: &'a ModuleIdentity,
    palette: Palette,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(
        graph: &'a ModuleGraph,
        conflicted: &'a ConflictSet,
        reference: &'a ModuleIdentity,
    ) -> Self {
        Self {
            graph,
            conflicted,
            reference,
            palette: Palette::plain(),
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Render the tree. The root is always shown; an empty graph renders
    /// as an empty string. When no module other than the root is
    /// implicated, the root is the whole tree, even if it holds a stale
    /// dependency directly.
    pub fn render(&self) -> String {
        let mut output = String::new();
        let Some(root) = self.graph.root() else {
            return output;
        };

        output.push_str(&self.label(root));
        output.push('\n');
        if self.conflicted.iter().all(|idx| idx == root) {
            return output;
        }
        self.render_children(&mut output, root, "", &EdgeSet::new());
        output
    }

    fn render_children(&self, output: &mut String, idx: NodeIndex, prefix: &str, path: &EdgeSet) {
        let shown: Vec<NodeIndex> = self
            .graph
            .dependencies_of(idx)
            .into_iter()
            .filter(|&dep| self.is_shown(dep))
            .collect();

        let count = shown.len();
        for (i, dep) in shown.into_iter().enumerate() {
            let is_last = i == count - 1;
            let connector = if is_last { "└── " } else { "├── " };
            let label = self.label(dep);

            let edge = (idx, dep);
            if path.contains(&edge) {
                output.push_str(&format!("{prefix}{connector}{label}{CYCLE_MARKER}\n"));
                continue;
            }
            output.push_str(&format!("{prefix}{connector}{label}\n"));

            let mut branch = path.clone();
            branch.insert(edge);
            let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
            self.render_children(output, dep, &child_prefix, &branch);
        }
    }

    fn is_shown(&self, idx: NodeIndex) -> bool {
        self.conflicted.contains(idx)
            || self.graph.module(idx).is_lower_than(self.reference) == Some(true)
    }

    fn label(&self, idx: NodeIndex) -> String {
        let class = classify(self.graph, idx, self.conflicted, self.reference);
        let name = self.graph.module(idx).canonical_name();
        self.palette.style(class).apply_to(name).to_string()
    }
}

/// Render with the given palette.
pub fn render(
    graph: &ModuleGraph,
    conflicted: &ConflictSet,
    reference: &ModuleIdentity,
    palette: Palette,
) -> String {
    TreeRenderer::new(graph, conflicted, reference)
        .with_palette(palette)
        .render()
}
