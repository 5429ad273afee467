//! The minimum spanning tree result, stored as a weighted adjacency matrix.

use nalgebra::DMatrix;
use serde::{Serialize, Serializer};

use crate::matrix::AdjacencyMatrix;

/// A tree edge with `source < target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MstEdge {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

/// Symmetric N×N matrix holding the original weight of every selected edge and 0 elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub struct MstMatrix {
    matrix: DMatrix<f64>,
    root: Option<usize>,
    predecessors: Vec<Option<usize>>,
}

impl MstMatrix {
    /// Materializes the tree described by `predecessors` (child -> parent) over `adj`.
    pub(crate) fn from_predecessors(
        adj: &AdjacencyMatrix,
        root: Option<usize>,
        predecessors: Vec<Option<usize>>,
    ) -> Self {
        let n = adj.node_count();
        let mut matrix = DMatrix::<f64>::zeros(n, n);
        for (child, parent) in predecessors.iter().enumerate() {
            if let Some(parent) = *parent {
                let w = adj.weight(parent, child);
                matrix[(child, parent)] = w;
                matrix[(parent, child)] = w;
            }
        }
        Self {
            matrix,
            root,
            predecessors,
        }
    }

    pub fn node_count(&self) -> usize {
        self.matrix.nrows()
    }

    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    /// The vertex the tree was grown from; `None` for an empty graph.
    pub fn root(&self) -> Option<usize> {
        self.root
    }

    pub fn predecessor(&self, vertex: usize) -> Option<usize> {
        self.predecessors.get(vertex).copied().flatten()
    }

    /// Tree edges ordered by `(source, target)`.
    pub fn edges(&self) -> Vec<MstEdge> {
        let n = self.node_count();
        let mut out = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                let weight = self.matrix[(i, j)];
                if weight > 0.0 {
                    out.push(MstEdge {
                        source: i,
                        target: j,
                        weight,
                    });
                }
            }
        }
        out
    }

    pub fn edge_count(&self) -> usize {
        self.predecessors.iter().flatten().count()
    }

    /// Sum over the upper triangle.
    pub fn total_weight(&self) -> f64 {
        let n = self.node_count();
        (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .map(|(i, j)| self.matrix[(i, j)])
            .sum()
    }

    /// Number of vertices the tree reaches, the root included.
    pub fn covered_vertices(&self) -> usize {
        usize::from(self.root.is_some()) + self.edge_count()
    }

    pub fn is_spanning(&self) -> bool {
        self.covered_vertices() == self.node_count()
    }

    pub fn degree(&self, vertex: usize) -> usize {
        self.matrix.row(vertex).iter().filter(|w| **w > 0.0).count()
    }

    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        let n = self.node_count();
        (0..n).all(|i| {
            (0..n).all(|j| (self.matrix[(i, j)] - self.matrix[(j, i)]).abs() <= tolerance)
        })
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.matrix
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    /// Renders the matrix as delimited text, one row per line.
    pub fn to_delimited(&self, separator: &str) -> String {
        let mut out = String::new();
        for row in self.matrix.row_iter() {
            let cells: Vec<String> = row.iter().map(|w| w.to_string()).collect();
            out.push_str(&cells.join(separator));
            out.push('\n');
        }
        out
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MstSummary {
    nodes: usize,
    root: Option<usize>,
    covered: usize,
    total_weight: f64,
    edges: Vec<MstEdge>,
}

impl Serialize for MstMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MstSummary {
            nodes: self.node_count(),
            root: self.root,
            covered: self.covered_vertices(),
            total_weight: self.total_weight(),
            edges: self.edges(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GraphOptions;

    fn path_graph() -> AdjacencyMatrix {
        let m = DMatrix::from_row_slice(3, 3, &[0.0, 2.0, 7.0, 2.0, 0.0, 1.5, 7.0, 1.5, 0.0]);
        AdjacencyMatrix::from_matrix(m, &GraphOptions::default()).unwrap()
    }

    fn path_tree() -> MstMatrix {
        MstMatrix::from_predecessors(&path_graph(), Some(0), vec![None, Some(0), Some(1)])
    }

    #[test]
    fn predecessors_materialize_symmetric_weights() {
        let mst = path_tree();
        assert_eq!(mst.get(0, 1), 2.0);
        assert_eq!(mst.get(1, 0), 2.0);
        assert_eq!(mst.get(2, 1), 1.5);
        assert_eq!(mst.get(0, 2), 0.0);
        assert!(mst.is_symmetric(0.0));
        assert_eq!(mst.total_weight(), 3.5);
        assert_eq!(mst.degree(1), 2);
        assert!(mst.is_spanning());
        assert_eq!(
            mst.edges(),
            vec![
                MstEdge { source: 0, target: 1, weight: 2.0 },
                MstEdge { source: 1, target: 2, weight: 1.5 },
            ]
        );
    }

    #[test]
    fn delimited_output_round_trips_through_rows() {
        let mst = path_tree();
        assert_eq!(mst.to_delimited(","), "0,2,0\n2,0,1.5\n0,1.5,0\n");
        assert_eq!(mst.to_rows()[1], vec![2.0, 0.0, 1.5]);
    }

    #[test]
    fn serializes_as_summary() {
        let mst = path_tree();
        let v = serde_json::to_value(&mst).unwrap();
        assert_eq!(v["nodes"], 3);
        assert_eq!(v["root"], 0);
        assert_eq!(v["covered"], 3);
        assert_eq!(v["totalWeight"], 3.5);
        assert_eq!(v["edges"][1]["target"], 2);
    }
}
