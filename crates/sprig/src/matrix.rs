//! Dense adjacency matrix storage, delimited-text parsing and validation.

use nalgebra::DMatrix;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::options::GraphOptions;

/// A validated N×N adjacency matrix of non-negative weights. Zero means "no edge".
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix {
    inner: DMatrix<f64>,
}

impl AdjacencyMatrix {
    pub fn from_matrix(matrix: DMatrix<f64>, options: &GraphOptions) -> Result<Self> {
        validate(&matrix, options)?;
        Ok(Self { inner: matrix })
    }

    pub fn from_rows(rows: &[Vec<f64>], options: &GraphOptions) -> Result<Self> {
        let matrix = rows_to_matrix(rows).map_err(|(row, len, expected)| Error::RaggedRow {
            row,
            len,
            expected,
        })?;
        Self::from_matrix(matrix, options)
    }

    /// Parses delimited matrix text held in memory. `origin` names the input in errors.
    pub fn parse(text: &str, origin: &Path, options: &GraphOptions) -> Result<Self> {
        let rows = parse_delimited(text)?;
        if rows.is_empty() {
            return Err(Error::EmptyInput {
                path: origin.to_path_buf(),
            });
        }
        Self::from_rows(&rows, options)
    }

    pub fn load(path: &Path, options: &GraphOptions) -> Result<Self> {
        let text = read_nonempty(path)?;
        let matrix = Self::parse(&text, path, options)?;
        tracing::debug!(
            path = %path.display(),
            nodes = matrix.node_count(),
            "loaded adjacency matrix"
        );
        Ok(matrix)
    }

    pub fn node_count(&self) -> usize {
        self.inner.nrows()
    }

    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.inner[(i, j)]
    }

    pub fn try_weight(&self, i: usize, j: usize) -> Option<f64> {
        self.inner.get((i, j)).copied()
    }

    /// Vertices adjacent to `u` with their edge weights. Self loops are skipped.
    pub fn neighbors(&self, u: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        (0..self.node_count())
            .map(move |v| (v, self.inner[(u, v)]))
            .filter(move |&(v, w)| v != u && w != 0.0)
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.inner
    }

    pub fn into_matrix(self) -> DMatrix<f64> {
        self.inner
    }
}

/// Reads a file, distinguishing a missing path and a zero-length file from other I/O failures.
pub(crate) fn read_nonempty(path: &Path) -> Result<String> {
    let io_err = |source: std::io::Error| {
        if source.kind() == std::io::ErrorKind::NotFound {
            Error::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Error::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    };
    let meta = std::fs::metadata(path).map_err(io_err)?;
    if meta.is_file() && meta.len() == 0 {
        return Err(Error::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(io_err)?;
    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let (line, column) = position_after(valid);
        Error::Parse {
            line,
            column,
            message: "content is not valid UTF-8".to_string(),
        }
    })
}

/// 1-based line and character column just past `prefix`, which must be valid UTF-8.
fn position_after(prefix: &[u8]) -> (usize, usize) {
    let text = std::str::from_utf8(prefix).unwrap_or_default();
    let line = text.matches('\n').count() + 1;
    let tail = text.rsplit('\n').next().unwrap_or_default();
    (line, tail.chars().count() + 1)
}

/// Splits text into rows of numbers.
///
/// Each non-blank line is one row. Values are separated by commas, whitespace or both; an empty
/// field between two commas is an error. `#` starts a comment. A leading byte-order mark is
/// ignored. All rows must have the same length.
pub(crate) fn parse_delimited(text: &str) -> Result<Vec<Vec<f64>>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (line_ix, raw) in text.lines().enumerate() {
        let line_no = line_ix + 1;
        let line = match raw.find('#') {
            Some(ix) => &raw[..ix],
            None => raw,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut row: Vec<f64> = Vec::new();
        for field in line.split(',') {
            let mut tokens = field.split_whitespace().peekable();
            if tokens.peek().is_none() {
                return Err(Error::Parse {
                    line: line_no,
                    column: row.len() + 1,
                    message: "missing value".to_string(),
                });
            }
            for token in tokens {
                let value = token.parse::<f64>().map_err(|_| Error::Parse {
                    line: line_no,
                    column: row.len() + 1,
                    message: format!("`{token}` is not a number"),
                })?;
                row.push(value);
            }
        }

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(Error::Parse {
                    line: line_no,
                    column: row.len().min(first.len()) + 1,
                    message: format!("expected {} values, found {}", first.len(), row.len()),
                });
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Packs equal-length rows into a matrix; on a ragged row returns `(row, len, expected)`.
fn rows_to_matrix(
    rows: &[Vec<f64>],
) -> std::result::Result<DMatrix<f64>, (usize, usize, usize)> {
    let ncols = rows.first().map(Vec::len).unwrap_or(0);
    let mut data: Vec<f64> = Vec::with_capacity(rows.len() * ncols);
    for (ix, row) in rows.iter().enumerate() {
        if row.len() != ncols {
            return Err((ix, row.len(), ncols));
        }
        data.extend_from_slice(row);
    }
    Ok(DMatrix::from_row_slice(rows.len(), ncols, &data))
}

fn validate(m: &DMatrix<f64>, options: &GraphOptions) -> Result<()> {
    let (rows, cols) = m.shape();
    if rows != cols {
        return Err(Error::Shape { rows, cols });
    }
    let n = rows;
    if n == 0 {
        return Err(Error::EmptyInput {
            path: memory_origin(),
        });
    }

    for i in 0..n {
        for j in 0..n {
            let value = m[(i, j)];
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidWeight {
                    row: i,
                    col: j,
                    value,
                });
            }
        }
    }

    for i in 0..n {
        let sum: f64 = (0..n).filter(|&j| j != i).map(|j| m[(i, j)]).sum();
        if sum <= options.isolation_tolerance {
            return Err(Error::Disconnected { vertex: i });
        }
    }

    if options.check_symmetry {
        for i in 0..n {
            for j in (i + 1)..n {
                let (upper, lower) = (m[(i, j)], m[(j, i)]);
                let scale = upper.abs().max(lower.abs()).max(1.0);
                if (upper - lower).abs() > options.symmetry_tolerance * scale {
                    return Err(Error::NotSymmetric {
                        row: i,
                        col: j,
                        upper,
                        lower,
                    });
                }
            }
        }
    }

    tracing::debug!(nodes = n, "validated adjacency matrix");
    Ok(())
}

/// Placeholder origin used in errors for text that did not come from a file.
pub(crate) fn memory_origin() -> PathBuf {
    PathBuf::from("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_commas_whitespace_and_comments() {
        let rows = parse_delimited("# header\n0, 1.5,2\n\n1.5 0 3\n2,3,0 # trailing\n").unwrap();
        assert_eq!(
            rows,
            vec![
                vec![0.0, 1.5, 2.0],
                vec![1.5, 0.0, 3.0],
                vec![2.0, 3.0, 0.0]
            ]
        );
    }

    #[test]
    fn parse_reports_line_and_column_of_bad_values() {
        let err = parse_delimited("0,1\n1,x\n").unwrap_err();
        match err {
            Error::Parse { line, column, .. } => assert_eq!((line, column), (2, 2)),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse_delimited("0,,1\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, column: 2, .. }));
    }

    #[test]
    fn parse_accepts_mixed_separators_and_byte_order_mark() {
        let rows = parse_delimited("\u{feff}0 1, 2\n1,0 3\n2 3 ,0\n").unwrap();
        assert_eq!(rows[0], vec![0.0, 1.0, 2.0]);
        assert_eq!(rows[1], vec![1.0, 0.0, 3.0]);
        assert_eq!(rows[2], vec![2.0, 3.0, 0.0]);

        let err = parse_delimited("0 1,,2\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, column: 3, .. }));
    }

    #[test]
    fn parse_rejects_rows_of_different_length() {
        let err = parse_delimited("0,1,2\n1,0\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn whitespace_only_text_is_empty_input() {
        let err =
            AdjacencyMatrix::parse("  \n# nothing\n", Path::new("-"), &GraphOptions::default())
                .unwrap_err();
        assert!(matches!(err, Error::EmptyInput { .. }));
    }

    #[test]
    fn neighbors_skip_missing_edges_and_self_loops() {
        let m = DMatrix::from_row_slice(3, 3, &[5.0, 1.0, 0.0, 1.0, 0.0, 2.0, 0.0, 2.0, 0.0]);
        let adj = AdjacencyMatrix::from_matrix(m, &GraphOptions::default()).unwrap();
        assert_eq!(adj.neighbors(0).collect::<Vec<_>>(), vec![(1, 1.0)]);
        assert_eq!(adj.neighbors(1).collect::<Vec<_>>(), vec![(0, 1.0), (2, 2.0)]);
    }

    #[test]
    fn self_loop_alone_does_not_connect_a_vertex() {
        let m = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 4.0]);
        assert!(AdjacencyMatrix::from_matrix(m, &GraphOptions::default()).is_ok());

        let m = DMatrix::from_row_slice(2, 2, &[3.0, 0.0, 0.0, 0.0]);
        let err = AdjacencyMatrix::from_matrix(m, &GraphOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Disconnected { vertex: 0 }));
    }

    #[test]
    fn asymmetric_weights_are_rejected_unless_disabled() {
        let m = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 2.0, 0.0]);
        let err = AdjacencyMatrix::from_matrix(m.clone(), &GraphOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NotSymmetric { row: 0, col: 1, .. }));

        let lenient = GraphOptions {
            check_symmetry: false,
            ..Default::default()
        };
        assert!(AdjacencyMatrix::from_matrix(m, &lenient).is_ok());
    }

    #[test]
    fn symmetry_tolerance_scales_with_weight_magnitude() {
        let big = 1e9_f64;
        let off_by_ulp = f64::from_bits(big.to_bits() + 1);
        let m = DMatrix::from_row_slice(2, 2, &[0.0, big, off_by_ulp, 0.0]);
        assert!(AdjacencyMatrix::from_matrix(m, &GraphOptions::default()).is_ok());

        let m = DMatrix::from_row_slice(2, 2, &[0.0, big, big * 1.001, 0.0]);
        assert!(matches!(
            AdjacencyMatrix::from_matrix(m, &GraphOptions::default()),
            Err(Error::NotSymmetric { .. })
        ));
    }

    #[test]
    fn empty_matrix_is_rejected() {
        let err = AdjacencyMatrix::from_rows(&[], &GraphOptions::default()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput { .. }));
    }

    #[test]
    fn negative_and_nan_weights_are_rejected() {
        let m = DMatrix::from_row_slice(2, 2, &[0.0, -1.0, -1.0, 0.0]);
        let err = AdjacencyMatrix::from_matrix(m, &GraphOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidWeight { row: 0, col: 1, .. }));

        let m = DMatrix::from_row_slice(2, 2, &[0.0, f64::NAN, f64::NAN, 0.0]);
        assert!(matches!(
            AdjacencyMatrix::from_matrix(m, &GraphOptions::default()),
            Err(Error::InvalidWeight { .. })
        ));
    }
}
