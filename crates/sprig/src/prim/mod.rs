//! Prim's algorithm over a dense adjacency matrix.
//!
//! The tree grows from a single start vertex; every round extracts the frontier vertex with the
//! cheapest connecting edge and relaxes its neighbours. Relaxation only ever lowers a vertex's
//! priority, so the queue re-inserts instead of decreasing keys in place (see [`queue`]).

pub(crate) mod queue;

use crate::graph::Graph;
use crate::matrix::AdjacencyMatrix;
use crate::options::{MstOptions, StartVertex};
use crate::tree::MstMatrix;

use queue::FrontierQueue;

/// Tentative distance of a vertex no tree edge reaches yet.
const UNREACHED: f64 = f64::INFINITY;

/// Builds minimum spanning trees. Holds configuration only; every call owns its working state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MstBuilder {
    options: MstOptions,
}

impl MstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: MstOptions) -> Self {
        Self { options }
    }

    pub fn start(mut self, start: StartVertex) -> Self {
        self.options.start = start;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.options.seed = Some(seed);
        self
    }

    pub fn options(&self) -> &MstOptions {
        &self.options
    }

    /// Computes the MST of `graph` without storing it. See [`Graph::construct_mst`] for the
    /// storing variant.
    pub fn construct(&self, graph: &Graph) -> MstMatrix {
        self.construct_from(graph.adjacency())
    }

    /// Computes a minimum spanning tree of `adj`.
    ///
    /// Never fails: when part of the graph is unreachable from the start vertex the loop stops
    /// early and the result covers only the start vertex's component
    /// ([`MstMatrix::is_spanning`] reports this).
    pub fn construct_from(&self, adj: &AdjacencyMatrix) -> MstMatrix {
        let n = adj.node_count();
        let Some(start) = self.options.resolve_start(n) else {
            return MstMatrix::from_predecessors(adj, None, Vec::new());
        };

        let mut pi: Vec<f64> = vec![UNREACHED; n];
        pi[start] = 0.0;
        let mut predecessor: Vec<Option<usize>> = vec![None; n];
        let mut visited: Vec<bool> = vec![false; n];

        let mut queue = FrontierQueue::with_vertices(n);
        for (v, &p) in pi.iter().enumerate() {
            queue.push(v, p);
        }

        let mut edges = 0usize;
        while let Some((u, pi_u)) = queue.pop() {
            if pi_u == UNREACHED {
                tracing::debug!(
                    vertex = u,
                    remaining = queue.len() + 1,
                    "no frontier edge reaches the remaining vertices"
                );
                break;
            }

            visited[u] = true;
            if predecessor[u].is_some() {
                edges += 1;
            }
            if edges + 1 == n {
                break;
            }

            for (v, w) in adj.neighbors(u) {
                if visited[v] || w >= pi[v] {
                    continue;
                }
                pi[v] = w;
                predecessor[v] = Some(u);
                queue.push(v, w);
                tracing::trace!(from = u, to = v, weight = w, "relaxed frontier edge");
            }
        }

        for (v, seen) in visited.iter().enumerate() {
            if !seen {
                predecessor[v] = None;
            }
        }

        let mst = MstMatrix::from_predecessors(adj, Some(start), predecessor);
        tracing::debug!(
            nodes = n,
            start,
            edges = mst.edge_count(),
            total_weight = mst.total_weight(),
            "constructed minimum spanning tree"
        );
        mst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GraphOptions;
    use nalgebra::DMatrix;

    fn adjacency(n: usize, data: &[f64]) -> AdjacencyMatrix {
        AdjacencyMatrix::from_matrix(DMatrix::from_row_slice(n, n, data), &GraphOptions::default())
            .unwrap()
    }

    #[test]
    fn triangle_drops_heaviest_edge() {
        let adj = adjacency(3, &[0.0, 1.0, 3.0, 1.0, 0.0, 2.0, 3.0, 2.0, 0.0]);
        let mst = MstBuilder::new().construct_from(&adj);
        assert_eq!(mst.edge_count(), 2);
        assert_eq!(mst.total_weight(), 3.0);
        assert_eq!(mst.get(0, 2), 0.0);
        assert_eq!(mst.get(1, 2), 2.0);
        assert_eq!(mst.get(2, 1), 2.0);
    }

    #[test]
    fn equal_weights_prefer_first_queued_vertex() {
        // Square 0-1-2-3-0 with unit weights. From vertex 0 both 1 and 3 sit at distance 1;
        // vertex 1 was relaxed first, so it is extracted first and then reaches 2.
        let adj = adjacency(
            4,
            &[
                0.0, 1.0, 0.0, 1.0, //
                1.0, 0.0, 1.0, 0.0, //
                0.0, 1.0, 0.0, 1.0, //
                1.0, 0.0, 1.0, 0.0,
            ],
        );
        let mst = MstBuilder::new().construct_from(&adj);
        assert_eq!(mst.predecessor(1), Some(0));
        assert_eq!(mst.predecessor(2), Some(1));
        assert_eq!(mst.predecessor(3), Some(0));
        assert_eq!(mst.root(), Some(0));
    }

    #[test]
    fn start_vertex_changes_root_not_weight() {
        let adj = adjacency(3, &[0.0, 1.0, 3.0, 1.0, 0.0, 2.0, 3.0, 2.0, 0.0]);
        for start in 0..3 {
            let mst = MstBuilder::new()
                .start(StartVertex::Index(start))
                .construct_from(&adj);
            assert_eq!(mst.root(), Some(start));
            assert_eq!(mst.predecessor(start), None);
            assert_eq!(mst.total_weight(), 3.0);
        }
    }

    #[test]
    fn unreachable_vertices_leave_a_partial_tree() {
        let opts = GraphOptions::default();
        // Two components {0, 1} and {2, 3}; no row is isolated.
        let m = DMatrix::from_row_slice(
            4,
            4,
            &[
                0.0, 1.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 2.0, //
                0.0, 0.0, 2.0, 0.0,
            ],
        );
        let adj = AdjacencyMatrix::from_matrix(m, &opts).unwrap();
        let mst = MstBuilder::new().construct_from(&adj);
        assert_eq!(mst.covered_vertices(), 2);
        assert!(!mst.is_spanning());
        assert_eq!(mst.edge_count(), 1);
        assert_eq!(mst.total_weight(), 1.0);
    }
}
