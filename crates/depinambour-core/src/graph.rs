//! Module graph construction and traversal.

use std::collections::{HashMap, HashSet, VecDeque};

use depinambour_util::errors::DepError;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::debug;

use crate::identity::ModuleIdentity;

/// Split a producer line into a `(parent, child)` pair.
///
/// Returns `None` unless the line holds exactly two whitespace-separated tokens.
pub fn parse_edge_line(line: &str) -> Option<(&str, &str)> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(parent), Some(child), None) => Some((parent, child)),
        _ => None,
    }
}

/// A module dependency graph backed by petgraph.
///
/// Every module is stored once, keyed by its canonical name. The graph may
/// contain cycles.
pub struct ModuleGraph {
    graph: DiGraph<ModuleIdentity, ()>,
    /// Lookup from canonical name to node index.
    index: HashMap<String, NodeIndex>,
    root: Option<NodeIndex>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            root: None,
        }
    }

    /// Build a graph from producer output lines (`<parent> <child>`).
    ///
    /// Lines without exactly two tokens are skipped. The root is the parent
    /// of the first valid edge.
    pub fn from_edges<I, S>(lines: I) -> Result<Self, DepError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut graph = Self::new();
        let mut edges = 0usize;
        for line in lines {
            let line = line.as_ref();
            match parse_edge_line(line) {
                Some((parent, child)) => {
                    graph.add_dependency(parent, child)?;
                    edges += 1;
                }
                None => debug!(line, "skipping line that is not an edge"),
            }
        }
        debug!(
            edges,
            modules = graph.module_count(),
            "module graph constructed"
        );
        Ok(graph)
    }

    /// Add or retrieve a module. If the canonical name already exists, returns the existing index.
    fn add_module(&mut self, identity: ModuleIdentity) -> NodeIndex {
        if let Some(&idx) = self.index.get(identity.canonical_name()) {
            return idx;
        }
        let key = identity.canonical_name().to_string();
        let idx = self.graph.add_node(identity);
        self.index.insert(key, idx);
        idx
    }

    /// Record that `parent` depends on `child`, creating either module as needed.
    ///
    /// The first parent ever added becomes the root unless one was set explicitly.
    pub fn add_dependency(&mut self, parent: &str, child: &str) -> Result<(), DepError> {
        let parent = ModuleIdentity::parse(parent)?;
        let child = ModuleIdentity::parse(child)?;

        let from = self.add_module(parent);
        let to = self.add_module(child);
        if self.root.is_none() {
            debug!(root = %self.graph[from], "selected root module");
            self.root = Some(from);
        }
        if !self.graph.edges(from).any(|e| e.target() == to) {
            self.graph.add_edge(from, to, ());
        }
        Ok(())
    }

    /// Designate the module under audit explicitly.
    pub fn set_root(&mut self, name: &str) -> Result<NodeIndex, DepError> {
        let idx = self.lookup(name).ok_or_else(|| DepError::UnknownModule {
            name: name.to_string(),
        })?;
        self.root = Some(idx);
        Ok(idx)
    }

    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    /// Look up a module by canonical name.
    pub fn lookup(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    /// Get the identity of a module.
    pub fn module(&self, idx: NodeIndex) -> &ModuleIdentity {
        &self.graph[idx]
    }

    /// All modules, in insertion order.
    pub fn modules(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Number of modules, root included.
    pub fn module_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Direct dependencies of a module, sorted by canonical name.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_sorted(idx, Direction::Outgoing)
    }

    /// Modules that directly depend on this one, sorted by canonical name.
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_sorted(idx, Direction::Incoming)
    }

    fn neighbors_sorted(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(idx, dir).collect();
        out.sort_by(|a, b| {
            self.graph[*a]
                .canonical_name()
                .cmp(self.graph[*b].canonical_name())
        });
        out
    }

    /// Whether `parent` directly depends on `child`.
    pub fn depends_on(&self, parent: NodeIndex, child: NodeIndex) -> bool {
        self.graph.find_edge(parent, child).is_some()
    }

    /// Modules that cannot be reached from the root.
    ///
    /// Empty for well-formed producer output; anything listed here was
    /// introduced as a parent that nothing else depends on.
    pub fn unreachable_modules(&self) -> Vec<NodeIndex> {
        let Some(root) = self.root else {
            return self.graph.node_indices().collect();
        };

        let mut seen = HashSet::from([root]);
        let mut queue = VecDeque::from([root]);
        while let Some(idx) = queue.pop_front() {
            for next in self.graph.neighbors(idx) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        self.graph
            .node_indices()
            .filter(|idx| !seen.contains(idx))
            .collect()
    }
}

impl Default for ModuleGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(g: &ModuleGraph, idxs: &[NodeIndex]) -> Vec<String> {
        idxs.iter()
            .map(|&i| g.module(i).canonical_name().to_string())
            .collect()
    }

    #[test]
    fn edge_line_needs_two_tokens() {
        assert_eq!(parse_edge_line("a b@v1.0.0"), Some(("a", "b@v1.0.0")));
        assert_eq!(parse_edge_line("onlyonetoken"), None);
        assert_eq!(parse_edge_line("a b c"), None);
        assert_eq!(parse_edge_line(""), None);
    }

    #[test]
    fn add_and_lookup() {
        let mut g = ModuleGraph::new();
        g.add_dependency("app", "lib@v1.0.0").unwrap();
        let lib = g.lookup("lib@v1.0.0").unwrap();
        assert_eq!(g.module(lib).path(), "lib");
        assert_eq!(g.module_count(), 2);
        assert!(g.lookup("lib").is_none());
    }

    #[test]
    fn readding_reuses_module() {
        let mut g = ModuleGraph::new();
        g.add_dependency("app", "a@v1.0.0").unwrap();
        g.add_dependency("a@v1.0.0", "b@v1.0.0").unwrap();
        g.add_dependency("app", "b@v1.0.0").unwrap();
        g.add_dependency("app", "a@v1.0.0").unwrap();
        assert_eq!(g.module_count(), 3);

        let app = g.lookup("app").unwrap();
        assert_eq!(g.dependencies_of(app).len(), 2);
    }

    #[test]
    fn first_parent_is_root() {
        let g = ModuleGraph::from_edges(["app a@v1", "a@v1 b@v1", "other c@v1"]).unwrap();
        assert_eq!(g.module(g.root().unwrap()).canonical_name(), "app");
    }

    #[test]
    fn explicit_root_overrides() {
        let mut g = ModuleGraph::from_edges(["app a@v1", "a@v1 b@v1"]).unwrap();
        let a = g.set_root("a@v1").unwrap();
        assert_eq!(g.root(), Some(a));
        assert!(matches!(
            g.set_root("missing"),
            Err(DepError::UnknownModule { .. })
        ));
    }

    #[test]
    fn dependencies_are_sorted() {
        let g = ModuleGraph::from_edges(["app z@v1", "app a@v1", "app m@v1"]).unwrap();
        let deps = g.dependencies_of(g.root().unwrap());
        assert_eq!(names(&g, &deps), ["a@v1", "m@v1", "z@v1"]);
    }

    #[test]
    fn dependents_follow_reverse_edges() {
        let g = ModuleGraph::from_edges(["app a@v1", "app b@v1", "a@v1 c@v1", "b@v1 c@v1"])
            .unwrap();
        let c = g.lookup("c@v1").unwrap();
        assert_eq!(names(&g, &g.dependents_of(c)), ["a@v1", "b@v1"]);
    }

    #[test]
    fn cycles_are_tolerated() {
        let g = ModuleGraph::from_edges(["app a@v1", "a@v1 b@v1", "b@v1 a@v1"]).unwrap();
        let a = g.lookup("a@v1").unwrap();
        let b = g.lookup("b@v1").unwrap();
        assert!(g.depends_on(a, b));
        assert!(g.depends_on(b, a));
        assert!(g.unreachable_modules().is_empty());
    }

    #[test]
    fn orphan_parent_is_reported() {
        let g = ModuleGraph::from_edges(["app a@v1", "stray b@v1"]).unwrap();
        let orphans = g.unreachable_modules();
        assert_eq!(names(&g, &orphans), ["stray", "b@v1"]);
    }

    #[test]
    fn bad_version_fails() {
        let err = ModuleGraph::from_edges(["app lib@vX.Y"]).err().unwrap();
        assert!(matches!(err, DepError::Parse { .. }));
    }
}
