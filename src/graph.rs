//! The de Bruijn graph itself: interned `(k-1)`-mer nodes, a directed
//! multigraph over them (outgoing sets + incoming counts), and a coverage
//! map tracking edge multiplicity.
//!
//! Node/edge storage shape is modeled on the teacher's `OverlapGraph`/`Node`
//! (`create_overlap_graph.rs`): dense ids into owned state rather than
//! pointer-ish cross references, so edge deletion is a pure index update.
//! The build algorithm itself is grounded on
//! `original_source/phiX174_error_prone.py`'s `DeBruijnGraph.build_de_bruijn_graph`.

use crate::interner::{Interner, NodeId};
use crate::kmer::kmers_of_reads;
use std::collections::{HashMap, HashSet};

/// Per-node bookkeeping: outgoing neighbor set and incoming-edge count.
#[derive(Default)]
pub struct NodeState {
    pub outgoing: HashSet<NodeId>,
    pub incoming: usize,
}

pub struct DeBruijnGraph {
    pub interner: Interner,
    pub nodes: HashMap<NodeId, NodeState>,
    pub coverage: HashMap<(NodeId, NodeId), u32>,
}

impl DeBruijnGraph {
    pub fn new() -> Self {
        Self {
            interner: Interner::new(),
            nodes: HashMap::new(),
            coverage: HashMap::new(),
        }
    }

    /// Build the graph from a set of equal(ish)-length reads and a k-mer size.
    pub fn build<'a, I>(reads: I, k: usize) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut graph = Self::new();
        for kmer in kmers_of_reads(reads, k) {
            graph.add_kmer(kmer);
        }
        graph
    }

    fn ensure_node(&mut self, id: NodeId) {
        self.nodes.entry(id).or_default();
    }

    /// Add one k-mer's worth of edge to the graph: `left = w[..k-1]`,
    /// `right = w[1..]`. Self-loops (`left == right`) are rejected.
    fn add_kmer(&mut self, kmer: &[u8]) {
        let left_label = &kmer[..kmer.len() - 1];
        let right_label = &kmer[1..];
        if left_label == right_label {
            return;
        }

        let u = self.interner.intern(left_label);
        let v = self.interner.intern(right_label);
        self.ensure_node(u);
        self.ensure_node(v);

        let already_present = self.nodes.get(&u).map(|n| n.outgoing.contains(&v)).unwrap_or(false);
        if already_present {
            *self.coverage.get_mut(&(u, v)).expect("coverage entry must exist for a recorded edge") += 1;
        } else {
            self.nodes.get_mut(&u).unwrap().outgoing.insert(v);
            self.nodes.get_mut(&v).unwrap().incoming += 1;
            self.coverage.insert((u, v), 1);
        }
    }

    pub fn out_degree(&self, u: NodeId) -> usize {
        self.nodes.get(&u).map(|n| n.outgoing.len()).unwrap_or(0)
    }

    pub fn in_degree(&self, u: NodeId) -> usize {
        self.nodes.get(&u).map(|n| n.incoming).unwrap_or(0)
    }

    pub fn coverage_of(&self, u: NodeId, v: NodeId) -> Option<u32> {
        self.coverage.get(&(u, v)).copied()
    }

    /// Delete the edge `(u, v)` if present: removes it from `outgoing(u)`,
    /// decrements `incoming(v)`, erases the coverage entry.
    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> bool {
        let removed = self
            .nodes
            .get_mut(&u)
            .map(|n| n.outgoing.remove(&v))
            .unwrap_or(false);
        if removed {
            if let Some(target) = self.nodes.get_mut(&v) {
                target.incoming = target.incoming.saturating_sub(1);
            }
            self.coverage.remove(&(u, v));
        }
        removed
    }

    /// Remove nodes that have become sources with no outgoing edges, so the
    /// Eulerian stage isn't stranded on a vertex it can never start or pass
    /// through.
    pub fn sweep_empty_leaves(&mut self) -> usize {
        let to_remove: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, state)| state.outgoing.is_empty())
            .map(|(&id, _)| id)
            .collect();
        for id in &to_remove {
            self.nodes.remove(id);
        }
        to_remove.len()
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn label_of(&self, id: NodeId) -> &[u8] {
        self.interner.label_of(id)
    }

    /// Debug/test helper: verify the universal invariants from the spec.
    #[cfg(test)]
    pub fn check_invariants(&self) {
        let mut incoming_count: HashMap<NodeId, usize> = HashMap::new();
        let mut outgoing_count: HashMap<NodeId, usize> = HashMap::new();
        for &(u, v) in self.coverage.keys() {
            assert_ne!(u, v, "no self-loops allowed");
            *outgoing_count.entry(u).or_insert(0) += 1;
            *incoming_count.entry(v).or_insert(0) += 1;
        }
        for (&id, state) in &self.nodes {
            assert_eq!(
                state.outgoing.len(),
                outgoing_count.get(&id).copied().unwrap_or(0),
                "outgoing(u) must match coverage entries keyed by u"
            );
            assert_eq!(
                state.incoming,
                incoming_count.get(&id).copied().unwrap_or(0),
                "incoming(v) must match coverage entries keyed by v"
            );
        }
    }
}

impl Default for DeBruijnGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl DeBruijnGraph {
    /// Test-only: add a raw edge between two already-interned node ids,
    /// bumping coverage if it already exists. Lets sibling modules' tests
    /// (tip removal, bubbles, eulerian) build small hand-shaped graphs
    /// without going through the k-mer builder.
    pub fn test_add_edge(&mut self, u: NodeId, v: NodeId) {
        self.ensure_node(u);
        self.ensure_node(v);
        let already_present = self.nodes.get(&u).map(|n| n.outgoing.contains(&v)).unwrap_or(false);
        if already_present {
            *self.coverage.get_mut(&(u, v)).unwrap() += 1;
        } else {
            self.nodes.get_mut(&u).unwrap().outgoing.insert(v);
            self.nodes.get_mut(&v).unwrap().incoming += 1;
            self.coverage.insert((u, v), 1);
        }
    }

    pub fn test_intern(&mut self, label: &[u8]) -> NodeId {
        self.interner.intern(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reads(strs: &[&str]) -> Vec<Vec<u8>> {
        strs.iter().map(|s| s.as_bytes().to_vec()).collect()
    }

    #[test]
    fn build_rejects_self_loops() {
        // k=1 collapses each base to a node; every 2-mer has identical
        // left/right 0-mers (both empty), so nothing should be built.
        let r = reads(&["AAAA"]);
        let refs: Vec<&[u8]> = r.iter().map(|v| v.as_slice()).collect();
        let graph = DeBruijnGraph::build(refs, 1);
        assert!(graph.coverage.is_empty());
        graph.check_invariants();
    }

    #[test]
    fn duplicate_edges_increment_coverage_not_indegree() {
        let r = reads(&["AAAB", "AAAB"]);
        let refs: Vec<&[u8]> = r.iter().map(|v| v.as_slice()).collect();
        let graph = DeBruijnGraph::build(refs, 4);
        assert_eq!(graph.interner.len(), 2);
        let u = graph.interner.label_to_id_for_test(b"AAA");
        let v = graph.interner.label_to_id_for_test(b"AAB");
        assert_eq!(graph.coverage_of(u, v), Some(2));
        assert_eq!(graph.in_degree(v), 1);
        graph.check_invariants();
    }

    #[test]
    fn build_twice_from_same_reads_is_identical_up_to_id_renaming() {
        let r = reads(&["ACGTACGT", "TTTTGGGG"]);
        let refs: Vec<&[u8]> = r.iter().map(|v| v.as_slice()).collect();
        let g1 = DeBruijnGraph::build(refs.clone(), 4);
        let g2 = DeBruijnGraph::build(refs, 4);
        assert_eq!(g1.interner.len(), g2.interner.len());
        assert_eq!(g1.coverage.len(), g2.coverage.len());

        let mut edges1: Vec<(Vec<u8>, Vec<u8>)> = g1
            .coverage
            .keys()
            .map(|&(u, v)| (g1.label_of(u).to_vec(), g1.label_of(v).to_vec()))
            .collect();
        let mut edges2: Vec<(Vec<u8>, Vec<u8>)> = g2
            .coverage
            .keys()
            .map(|&(u, v)| (g2.label_of(u).to_vec(), g2.label_of(v).to_vec()))
            .collect();
        edges1.sort();
        edges2.sort();
        assert_eq!(edges1, edges2);
    }

    #[test]
    fn remove_edge_updates_incoming_and_coverage() {
        let r = reads(&["ACGTACGT"]);
        let refs: Vec<&[u8]> = r.iter().map(|v| v.as_slice()).collect();
        let mut graph = DeBruijnGraph::build(refs, 4);
        let u = graph.interner.label_to_id_for_test(b"ACG");
        let v = graph.interner.label_to_id_for_test(b"CGT");
        assert!(graph.remove_edge(u, v));
        assert_eq!(graph.coverage_of(u, v), None);
        assert!(!graph.nodes[&u].outgoing.contains(&v));
        graph.check_invariants();
    }

    #[test]
    fn sweep_removes_empty_outgoing_nodes() {
        let r = reads(&["ACGT"]);
        let refs: Vec<&[u8]> = r.iter().map(|v| v.as_slice()).collect();
        let mut graph = DeBruijnGraph::build(refs, 4);
        // "CGT" has no outgoing edges (end of read).
        let v = graph.interner.label_to_id_for_test(b"CGT");
        assert_eq!(graph.out_degree(v), 0);
        let removed = graph.sweep_empty_leaves();
        assert_eq!(removed, 1);
        assert!(!graph.nodes.contains_key(&v));
    }
}

#[cfg(test)]
impl Interner {
    /// Test-only convenience: look up an id for a label known to already be
    /// interned, without mutating the interner.
    pub fn label_to_id_for_test(&self, label: &[u8]) -> NodeId {
        self.intern_readonly(label)
            .unwrap_or_else(|| panic!("label {:?} was never interned", String::from_utf8_lossy(label)))
    }
}
