use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("graph input must be an adjacency matrix or a file path, got {found}")]
    InvalidInputType { found: &'static str },

    #[error("adjacency matrix file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("adjacency matrix file is empty: {}", path.display())]
    EmptyInput { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("row {row} has {len} values, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("adjacency matrix must be square, got {rows}x{cols}")]
    Shape { rows: usize, cols: usize },

    #[error("edge weight at ({row}, {col}) must be finite and non-negative, got {value}")]
    InvalidWeight { row: usize, col: usize, value: f64 },

    #[error("vertex {vertex} has no incident edges")]
    Disconnected { vertex: usize },

    #[error("adjacency matrix is not symmetric at ({row}, {col}): {upper} != {lower}")]
    NotSymmetric {
        row: usize,
        col: usize,
        upper: f64,
        lower: f64,
    },

    #[error("spanning tree reaches {covered} of {nodes} vertices; the graph is not connected")]
    NotSpanning { covered: usize, nodes: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl Error {
    /// Whether this error rejects the graph input itself, as opposed to failing to read it.
    pub fn is_invalid_graph(&self) -> bool {
        matches!(
            self,
            Error::InvalidInputType { .. }
                | Error::EmptyInput { .. }
                | Error::Parse { .. }
                | Error::RaggedRow { .. }
                | Error::Shape { .. }
                | Error::InvalidWeight { .. }
                | Error::Disconnected { .. }
                | Error::NotSymmetric { .. }
                | Error::NotSpanning { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
