//! Bubble detection, counting, and weighted removal.
//!
//! Grounded on `original_source/bubble_detection.py` (`dfs`, pairwise
//! vertex-set-intersection counting) for the counting mode, and on
//! `original_source/phiX174_error_prone.py`'s `RemoveBubbles` (`dfs`,
//! `remove_bubbles`, `bubble_possible`, `paths_disjoint`, `path_exists`,
//! `remove_path`) for the weighted removal mode. The bounded-depth recursive
//! DFS shape mirrors the teacher's own `bubble_removal.rs`.

use crate::graph::DeBruijnGraph;
use crate::interner::NodeId;
use std::collections::{HashMap, HashSet};

/// A candidate s-to-t path together with its average coverage weight (sum of
/// edge coverage divided by vertex count).
type WeightedPath = (Vec<NodeId>, f64);

/// Enumerate every simple path from each outgoing-branching vertex to a
/// vertex with incoming-degree > 1, bounded to `bubble_threshold` edges,
/// bucketed by (source, target) and carrying each path's average coverage
/// weight.
fn enumerate_candidates(
    graph: &DeBruijnGraph,
    bubble_threshold: usize,
) -> HashMap<(NodeId, NodeId), Vec<WeightedPath>> {
    let mut buckets: HashMap<(NodeId, NodeId), Vec<WeightedPath>> = HashMap::new();
    for source in graph.node_ids() {
        if graph.out_degree(source) > 1 {
            let mut path = vec![source];
            dfs_collect(graph, source, source, 0, bubble_threshold, &mut path, &mut buckets);
        }
    }
    buckets
}

fn dfs_collect(
    graph: &DeBruijnGraph,
    source: NodeId,
    current: NodeId,
    depth: usize,
    threshold: usize,
    path: &mut Vec<NodeId>,
    buckets: &mut HashMap<(NodeId, NodeId), Vec<WeightedPath>>,
) {
    if current != source && graph.in_degree(current) > 1 {
        let weight = path_weight(graph, path);
        buckets.entry((source, current)).or_default().push((path.clone(), weight));
    }

    if depth == threshold {
        return;
    }

    let neighbors: Vec<NodeId> = match graph.nodes.get(&current) {
        Some(n) => n.outgoing.iter().copied().collect(),
        None => return,
    };
    for next in neighbors {
        if !path.contains(&next) {
            path.push(next);
            dfs_collect(graph, source, next, depth + 1, threshold, path, buckets);
            path.pop();
        }
    }
}

fn path_weight(graph: &DeBruijnGraph, path: &[NodeId]) -> f64 {
    let sum: u32 = path
        .windows(2)
        .map(|w| graph.coverage_of(w[0], w[1]).unwrap_or(0))
        .sum();
    sum as f64 / path.len() as f64
}

/// Number of unordered candidate pairs, within the same (source, target)
/// bucket, whose vertex sets intersect in exactly the two endpoints.
pub fn count_bubbles(graph: &DeBruijnGraph, bubble_threshold: usize) -> usize {
    let buckets = enumerate_candidates(graph, bubble_threshold);
    let mut count = 0;
    for candidates in buckets.values() {
        for i in 0..candidates.len() {
            for j in (i + 1)..candidates.len() {
                if paths_disjoint(&candidates[i].0, &candidates[j].0) {
                    count += 1;
                }
            }
        }
    }
    count
}

fn paths_disjoint(a: &[NodeId], b: &[NodeId]) -> bool {
    let set_a: HashSet<NodeId> = a.iter().copied().collect();
    let set_b: HashSet<NodeId> = b.iter().copied().collect();
    set_a.intersection(&set_b).count() == 2
}

fn path_exists(graph: &DeBruijnGraph, path: &[NodeId]) -> bool {
    path.windows(2).all(|w| {
        graph
            .nodes
            .get(&w[0])
            .map(|n| n.outgoing.contains(&w[1]))
            .unwrap_or(false)
    })
}

fn remove_path(graph: &mut DeBruijnGraph, path: &[NodeId]) {
    for w in path.windows(2) {
        graph.remove_edge(w[0], w[1]);
    }
}

/// Among candidates for one (source, target) bucket, pick the highest-weight
/// path as the keeper. Ties break on the lexicographically smaller vertex-id
/// sequence, which is deterministic given the interner's first-seen-order ids.
fn select_keeper(candidates: &[WeightedPath]) -> Vec<NodeId> {
    let mut best = &candidates[0];
    for candidate in &candidates[1..] {
        if candidate.1 > best.1 || (candidate.1 == best.1 && candidate.0 < best.0) {
            best = candidate;
        }
    }
    best.0.clone()
}

/// Remove every candidate bubble path except the highest-weight keeper per
/// (source, target) bucket, returning the number of edges deleted.
///
/// Before deleting a non-keeper path, re-checks that the bubble is still
/// possible (source still branches, target still has incoming-degree > 1),
/// that the path is vertex-disjoint from the keeper except at the endpoints,
/// and that every edge of the path still exists — cascading removals from an
/// earlier bucket can invalidate a later one.
pub fn remove_bubbles(graph: &mut DeBruijnGraph, bubble_threshold: usize) -> usize {
    let before = graph.coverage.len();
    let buckets = enumerate_candidates(graph, bubble_threshold);

    for ((source, target), candidates) in buckets {
        if candidates.len() < 2 {
            continue;
        }
        let keeper = select_keeper(&candidates);

        for (path, _weight) in &candidates {
            if *path == keeper {
                continue;
            }
            if !(graph.out_degree(source) > 1 && graph.in_degree(target) > 1) {
                continue;
            }
            if !paths_disjoint(&keeper, path) {
                continue;
            }
            if !path_exists(graph, path) {
                continue;
            }
            remove_path(graph, path);
        }
    }

    before - graph.coverage.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DeBruijnGraph;

    fn bubble_graph() -> (DeBruijnGraph, NodeId, NodeId, NodeId, NodeId) {
        let mut g = DeBruijnGraph::new();
        let s = g.test_intern(b"S");
        let a = g.test_intern(b"A");
        let b = g.test_intern(b"B");
        let t = g.test_intern(b"T");
        g.test_add_edge(s, a);
        g.test_add_edge(a, t);
        g.test_add_edge(s, b);
        g.test_add_edge(b, t);
        (g, s, a, b, t)
    }

    #[test]
    fn counts_one_bubble_between_shared_endpoints() {
        let (g, ..) = bubble_graph();
        assert_eq!(count_bubbles(&g, 4), 1);
    }

    #[test]
    fn no_bubble_without_a_shared_target() {
        let mut g = DeBruijnGraph::new();
        let s = g.test_intern(b"S");
        let a = g.test_intern(b"A");
        let b = g.test_intern(b"B");
        g.test_add_edge(s, a);
        g.test_add_edge(s, b);
        assert_eq!(count_bubbles(&g, 4), 0);
    }

    #[test]
    fn higher_weight_path_survives_removal() {
        let (mut g, s, a, b, t) = bubble_graph();
        // a-path carries much higher coverage than the b-path.
        *g.coverage.get_mut(&(s, a)).unwrap() = 5;
        *g.coverage.get_mut(&(a, t)).unwrap() = 5;
        *g.coverage.get_mut(&(s, b)).unwrap() = 1;
        *g.coverage.get_mut(&(b, t)).unwrap() = 1;

        let removed = remove_bubbles(&mut g, 4);
        assert_eq!(removed, 2);
        assert!(g.nodes[&s].outgoing.contains(&a));
        assert!(g.nodes[&a].outgoing.contains(&t));
        assert!(!g.nodes[&s].outgoing.contains(&b));
        g.check_invariants();
    }

    #[test]
    fn equal_weight_tie_keeps_lexicographically_smaller_path() {
        // s=0, a=1, b=2, t=3 by first-seen interning order; [0,1,3] < [0,2,3].
        let (mut g, s, a, b, t) = bubble_graph();
        *g.coverage.get_mut(&(s, a)).unwrap() = 2;
        *g.coverage.get_mut(&(a, t)).unwrap() = 2;
        *g.coverage.get_mut(&(s, b)).unwrap() = 2;
        *g.coverage.get_mut(&(b, t)).unwrap() = 2;

        remove_bubbles(&mut g, 4);
        assert!(g.nodes[&s].outgoing.contains(&a));
        assert!(!g.nodes[&s].outgoing.contains(&b));
    }

    #[test]
    fn second_pass_removes_nothing_further() {
        let (mut g, ..) = bubble_graph();
        remove_bubbles(&mut g, 4);
        let second_pass = remove_bubbles(&mut g, 4);
        assert_eq!(second_pass, 0);
    }
}
