//! The graph store: a validated adjacency matrix plus the last computed MST.

use nalgebra::DMatrix;
use serde_json::Value;
use std::path::Path;

use crate::error::{Error, Result};
use crate::matrix::{AdjacencyMatrix, memory_origin};
use crate::options::GraphOptions;
use crate::points;
use crate::prim::MstBuilder;
use crate::source::GraphSource;
use crate::tree::MstMatrix;

/// An undirected weighted graph held as a dense adjacency matrix.
///
/// The matrix is validated once at construction and never mutated afterwards. The MST is
/// derived state: unset until [`Graph::construct_mst`] succeeds, replaced on every later run.
#[derive(Debug, Clone)]
pub struct Graph {
    adjacency: AdjacencyMatrix,
    options: GraphOptions,
    mst: Option<MstMatrix>,
}

impl Graph {
    pub fn new(source: impl Into<GraphSource>) -> Result<Self> {
        Self::with_options(source, GraphOptions::default())
    }

    pub fn with_options(source: impl Into<GraphSource>, options: GraphOptions) -> Result<Self> {
        options.validate()?;
        let adjacency = match source.into() {
            GraphSource::Matrix(m) => AdjacencyMatrix::from_matrix(m, &options)?,
            GraphSource::Rows(rows) => AdjacencyMatrix::from_rows(&rows, &options)?,
            GraphSource::Path(path) => AdjacencyMatrix::load(&path, &options)?,
        };
        Ok(Self::from_adjacency(adjacency, options))
    }

    /// Builds a graph from a dynamically typed value; see [`GraphSource`]'s `TryFrom<&Value>`.
    pub fn from_value(value: &Value, options: GraphOptions) -> Result<Self> {
        Self::with_options(GraphSource::try_from(value)?, options)
    }

    pub fn from_matrix(matrix: DMatrix<f64>) -> Result<Self> {
        Self::new(matrix)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(path.as_ref())
    }

    /// Parses delimited matrix text that is already in memory.
    pub fn from_delimited_str(text: &str, options: GraphOptions) -> Result<Self> {
        options.validate()?;
        let adjacency = AdjacencyMatrix::parse(text, &memory_origin(), &options)?;
        Ok(Self::from_adjacency(adjacency, options))
    }

    /// Complete graph over `points` weighted by Euclidean distance.
    pub fn from_points(points: &[Vec<f64>], options: GraphOptions) -> Result<Self> {
        Self::with_options(points::pairwise_distances(points)?, options)
    }

    pub fn from_points_path(path: impl AsRef<Path>, options: GraphOptions) -> Result<Self> {
        let pts = points::load_points(path.as_ref())?;
        Self::from_points(&pts, options)
    }

    pub fn from_points_str(text: &str, options: GraphOptions) -> Result<Self> {
        let pts = points::parse_points(text, &memory_origin())?;
        Self::from_points(&pts, options)
    }

    fn from_adjacency(adjacency: AdjacencyMatrix, options: GraphOptions) -> Self {
        Self {
            adjacency,
            options,
            mst: None,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.node_count()
    }

    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.adjacency.weight(i, j)
    }

    pub fn adjacency(&self) -> &AdjacencyMatrix {
        &self.adjacency
    }

    pub fn options(&self) -> &GraphOptions {
        &self.options
    }

    pub fn mst(&self) -> Option<&MstMatrix> {
        self.mst.as_ref()
    }

    /// Runs Prim's algorithm from vertex 0 and stores the result.
    pub fn construct_mst(&mut self) -> Result<&MstMatrix> {
        self.construct_mst_with(&MstBuilder::new())
    }

    /// Runs `builder` and stores its result, replacing any previous MST.
    ///
    /// With [`GraphOptions::require_spanning`] set, a tree that misses vertices is rejected with
    /// [`Error::NotSpanning`] and the previously stored MST is kept.
    pub fn construct_mst_with(&mut self, builder: &MstBuilder) -> Result<&MstMatrix> {
        let mst = builder.construct(self);
        if self.options.require_spanning && !mst.is_spanning() {
            return Err(Error::NotSpanning {
                covered: mst.covered_vertices(),
                nodes: mst.node_count(),
            });
        }
        Ok(self.mst.insert(mst))
    }
}
