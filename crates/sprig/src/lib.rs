#![forbid(unsafe_code)]

//! Minimum spanning trees over dense adjacency matrices.
//!
//! A [`Graph`] owns a validated, symmetric adjacency matrix (zero means "no edge").
//! [`MstBuilder`] runs Prim's algorithm over it with a lazily-updated priority queue and
//! produces an [`MstMatrix`] carrying the original weights of the selected edges.
//!
//! ```no_run
//! let mut g = sprig::Graph::new("fixtures/graphs/small.csv")?;
//! let n = g.node_count();
//! let mst = g.construct_mst()?;
//! assert_eq!(mst.edge_count(), n - 1);
//! # Ok::<(), sprig::Error>(())
//! ```

pub mod error;
pub mod graph;
pub mod matrix;
pub mod options;
pub mod points;
pub mod prim;
pub mod source;
pub mod tree;

pub use error::{Error, Result};
pub use graph::Graph;
pub use matrix::AdjacencyMatrix;
pub use options::{Config, GraphOptions, MstOptions, StartVertex};
pub use prim::MstBuilder;
pub use source::GraphSource;
pub use tree::{MstEdge, MstMatrix};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
