//! Dense Euclidean distance graphs built from point coordinates.

use nalgebra::DMatrix;
use std::path::Path;

use crate::error::{Error, Result};
use crate::matrix::{parse_delimited, read_nonempty};

/// Reads one point per line (whitespace or comma separated coordinates).
pub fn load_points(path: &Path) -> Result<Vec<Vec<f64>>> {
    let text = read_nonempty(path)?;
    let points = parse_points(&text, path)?;
    tracing::debug!(path = %path.display(), points = points.len(), "loaded point coordinates");
    Ok(points)
}

/// Parses point coordinates held in memory. `origin` names the input in errors.
pub fn parse_points(text: &str, origin: &Path) -> Result<Vec<Vec<f64>>> {
    let points = parse_delimited(text)?;
    if points.is_empty() {
        return Err(Error::EmptyInput {
            path: origin.to_path_buf(),
        });
    }
    Ok(points)
}

/// Pairwise Euclidean distances between `points`.
///
/// All points must share the same dimension; a mismatch is reported as a ragged row.
pub fn pairwise_distances(points: &[Vec<f64>]) -> Result<DMatrix<f64>> {
    let dim = points.first().map(Vec::len).unwrap_or(0);
    if let Some((row, p)) = points.iter().enumerate().find(|(_, p)| p.len() != dim) {
        return Err(Error::RaggedRow {
            row,
            len: p.len(),
            expected: dim,
        });
    }

    let n = points.len();
    let mut out = DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let d = points[i]
                .iter()
                .zip(&points[j])
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt();
            out[(i, j)] = d;
            out[(j, i)] = d;
        }
    }
    Ok(out)
}
