//! Graph inputs: an in-memory matrix or a path to a delimited text file.

use nalgebra::DMatrix;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum GraphSource {
    Matrix(DMatrix<f64>),
    Rows(Vec<Vec<f64>>),
    Path(PathBuf),
}

impl From<DMatrix<f64>> for GraphSource {
    fn from(value: DMatrix<f64>) -> Self {
        Self::Matrix(value)
    }
}

impl From<Vec<Vec<f64>>> for GraphSource {
    fn from(value: Vec<Vec<f64>>) -> Self {
        Self::Rows(value)
    }
}

impl From<PathBuf> for GraphSource {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<&Path> for GraphSource {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<&str> for GraphSource {
    fn from(value: &str) -> Self {
        Self::Path(PathBuf::from(value))
    }
}

impl From<String> for GraphSource {
    fn from(value: String) -> Self {
        Self::Path(PathBuf::from(value))
    }
}

/// Dynamic input: a JSON string is a path, an array of numeric arrays is a matrix.
///
/// Anything else is rejected with [`Error::InvalidInputType`].
impl TryFrom<&Value> for GraphSource {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::String(path) => Ok(Self::Path(PathBuf::from(path))),
            Value::Array(rows) => {
                let mut out: Vec<Vec<f64>> = Vec::with_capacity(rows.len());
                for row in rows {
                    let Value::Array(cells) = row else {
                        return Err(Error::InvalidInputType {
                            found: "array of non-array rows",
                        });
                    };
                    let parsed: Option<Vec<f64>> = cells.iter().map(Value::as_f64).collect();
                    let Some(parsed) = parsed else {
                        return Err(Error::InvalidInputType {
                            found: "array with non-numeric entries",
                        });
                    };
                    out.push(parsed);
                }
                Ok(Self::Rows(out))
            }
            other => Err(Error::InvalidInputType {
                found: json_kind(other),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
