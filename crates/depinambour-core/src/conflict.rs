//! Detection of modules implicated in a lower-than-reference dependency.
//!
//! A module is a *direct offender* when one of its own dependencies has the
//! reference's path at a lower version. Every module that (transitively)
//! depends on an offender is implicated as well.

use std::collections::{BTreeSet, VecDeque};

use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::graph::ModuleGraph;
use crate::identity::ModuleIdentity;

/// How a module relates to the reference version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Not implicated.
    Default,
    /// Implicated only through a descendant.
    Implicated,
    /// Directly depends on the reference path at a lower version.
    DirectOffender,
    /// The reference path itself, held at a lower version.
    Stale,
}

/// The set of modules implicated in a conflict with the reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictSet {
    modules: BTreeSet<NodeIndex>,
}

impl ConflictSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.modules.contains(&idx)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.modules.iter().copied()
    }

    /// Canonical names of all members, sorted.
    pub fn names(&self, graph: &ModuleGraph) -> Vec<String> {
        let mut names: Vec<String> = self
            .iter()
            .map(|idx| graph.module(idx).canonical_name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Members that are direct offenders themselves.
    pub fn direct_offenders(
        &self,
        graph: &ModuleGraph,
        reference: &ModuleIdentity,
    ) -> Vec<NodeIndex> {
        self.iter()
            .filter(|&idx| has_direct_lower_dependency(graph, idx, reference))
            .collect()
    }

    fn insert(&mut self, idx: NodeIndex) -> bool {
        self.modules.insert(idx)
    }
}

/// Whether `idx` has a direct dependency on the reference path at a lower version.
pub fn has_direct_lower_dependency(
    graph: &ModuleGraph,
    idx: NodeIndex,
    reference: &ModuleIdentity,
) -> bool {
    graph
        .dependencies_of(idx)
        .into_iter()
        .any(|dep| graph.module(dep).is_lower_than(reference) == Some(true))
}

/// Find every module implicated in a dependency on `reference`'s path at a
/// lower version.
///
/// The result is the smallest set containing all direct offenders that is
/// closed under "has a dependency in the set". It is empty when the
/// reference carries no version.
pub fn find_conflicted(graph: &ModuleGraph, reference: &ModuleIdentity) -> ConflictSet {
    let mut conflicted = ConflictSet::new();
    if reference.version().is_none() {
        debug!(reference = %reference, "reference has no version, nothing can be lower");
        return conflicted;
    }

    let mut queue: VecDeque<NodeIndex> = graph
        .modules()
        .filter(|&idx| has_direct_lower_dependency(graph, idx, reference))
        .collect();
    for &idx in &queue {
        conflicted.insert(idx);
    }
    let offenders = queue.len();

    while let Some(idx) = queue.pop_front() {
        for parent in graph.dependents_of(idx) {
            if conflicted.insert(parent) {
                queue.push_back(parent);
            }
        }
    }

    debug!(
        reference = %reference,
        offenders,
        implicated = conflicted.len(),
        "conflict closure computed"
    );
    conflicted
}

/// Classify a module for display.
///
/// Membership in `conflicted` takes precedence; a non-member is only
/// [`Classification::Stale`] when it is a lower version of the reference.
pub fn classify(
    graph: &ModuleGraph,
    idx: NodeIndex,
    conflicted: &ConflictSet,
    reference: &ModuleIdentity,
) -> Classification {
    if conflicted.contains(idx) {
        if has_direct_lower_dependency(graph, idx, reference) {
            Classification::DirectOffender
        } else {
            Classification::Implicated
        }
    } else if graph.module(idx).is_lower_than(reference) == Some(true) {
        Classification::Stale
    } else {
        Classification::Default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(name: &str) -> ModuleIdentity {
        ModuleIdentity::parse(name).unwrap()
    }

    #[test]
    fn empty_set() {
        let set = ConflictSet::new();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn seeds_only_direct_offenders() {
        let g = ModuleGraph::from_edges(["app a@v1.0.0", "a@v1.0.0 lib@v1.0.0"]).unwrap();
        let a = g.lookup("a@v1.0.0").unwrap();
        let r = reference("lib@v2.0.0");
        assert!(has_direct_lower_dependency(&g, a, &r));
        assert!(!has_direct_lower_dependency(&g, g.root().unwrap(), &r));
    }

    #[test]
    fn closure_reaches_all_ancestors() {
        let g = ModuleGraph::from_edges([
            "app a@v1",
            "a@v1 b@v1",
            "b@v1 lib@v1.0.0",
            "app c@v1",
        ])
        .unwrap();
        let set = find_conflicted(&g, &reference("lib@v1.5.0"));
        assert_eq!(set.names(&g), ["a@v1", "app", "b@v1"]);
    }

    #[test]
    fn closure_terminates_on_cycles() {
        let g = ModuleGraph::from_edges([
            "app a@v1",
            "a@v1 b@v1",
            "b@v1 a@v1",
            "b@v1 lib@v1.0.0",
        ])
        .unwrap();
        let set = find_conflicted(&g, &reference("lib@v2"));
        assert_eq!(set.names(&g), ["a@v1", "app", "b@v1"]);
    }

    #[test]
    fn equal_or_higher_versions_are_fine() {
        let g = ModuleGraph::from_edges(["app lib@v2.0.0", "app x@v1", "x@v1 lib@v2.1.0"]).unwrap();
        assert!(find_conflicted(&g, &reference("lib@v2.0.0")).is_empty());
    }

    #[test]
    fn unversioned_reference_yields_nothing() {
        let g = ModuleGraph::from_edges(["app lib@v1.0.0"]).unwrap();
        assert!(find_conflicted(&g, &reference("lib")).is_empty());
    }

    #[test]
    fn classification() {
        let g = ModuleGraph::from_edges([
            "app a@v1",
            "a@v1 lib@v1.0.0",
            "app b@v1",
        ])
        .unwrap();
        let r = reference("lib@v2.0.0");
        let set = find_conflicted(&g, &r);
        let at = |name: &str| classify(&g, g.lookup(name).unwrap(), &set, &r);
        assert_eq!(at("app"), Classification::Implicated);
        assert_eq!(at("a@v1"), Classification::DirectOffender);
        assert_eq!(at("b@v1"), Classification::Default);
        assert_eq!(at("lib@v1.0.0"), Classification::Stale);
        assert_eq!(set.direct_offenders(&g, &r).len(), 1);
    }
}
