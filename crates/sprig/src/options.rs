//! Tunables for graph validation and MST construction.
//!
//! Both option structs deserialize from camelCase JSON so the CLI can load them from a
//! config file (`{ "graph": { ... }, "mst": { ... } }`).

use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Validation knobs applied when a [`crate::Graph`] is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphOptions {
    /// A row whose weights sum to at most this value is an isolated vertex.
    pub isolation_tolerance: f64,
    /// Allowed `|a(i,j) - a(j,i)|`, relative to the larger magnitude when that exceeds 1.
    pub symmetry_tolerance: f64,
    pub check_symmetry: bool,
    /// Reject MST results that do not reach every vertex.
    pub require_spanning: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            isolation_tolerance: 1e-5,
            symmetry_tolerance: 1e-8,
            check_symmetry: true,
            require_spanning: true,
        }
    }
}

impl GraphOptions {
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("isolationTolerance", self.isolation_tolerance),
            ("symmetryTolerance", self.symmetry_tolerance),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be finite and non-negative, got {v}"),
                });
            }
        }
        Ok(())
    }
}

/// Which vertex Prim's algorithm grows the tree from.
///
/// The choice never changes the total weight or edge count, only which tree is produced when
/// several minimum trees exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "RawStartVertex")]
pub enum StartVertex {
    #[default]
    First,
    Index(usize),
    Random,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStartVertex {
    Index(usize),
    Name(String),
}

impl TryFrom<RawStartVertex> for StartVertex {
    type Error = String;

    fn try_from(value: RawStartVertex) -> std::result::Result<Self, Self::Error> {
        match value {
            RawStartVertex::Index(ix) => Ok(Self::Index(ix)),
            RawStartVertex::Name(name) => name.parse(),
        }
    }
}

impl FromStr for StartVertex {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "random" => Ok(Self::Random),
            other => other
                .parse::<usize>()
                .map(Self::Index)
                .map_err(|_| format!("unknown start vertex `{s}` (expected first, random or an index)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MstOptions {
    pub start: StartVertex,
    /// Seed for [`StartVertex::Random`]; unseeded runs draw from the thread RNG.
    pub seed: Option<u64>,
}

impl MstOptions {
    /// Resolves the start vertex for a graph with `node_count` vertices.
    ///
    /// Returns `None` for an empty graph. An out-of-range index falls back to vertex 0.
    pub fn resolve_start(&self, node_count: usize) -> Option<usize> {
        if node_count == 0 {
            return None;
        }
        let ix = match self.start {
            StartVertex::First => 0,
            StartVertex::Index(ix) if ix < node_count => ix,
            StartVertex::Index(ix) => {
                tracing::warn!(
                    start = ix,
                    nodes = node_count,
                    "start vertex out of range; falling back to vertex 0"
                );
                0
            }
            StartVertex::Random => match self.seed {
                Some(seed) => rand::rngs::StdRng::seed_from_u64(seed).gen_range(0..node_count),
                None => rand::thread_rng().gen_range(0..node_count),
            },
        };
        Some(ix)
    }
}

/// Top-level config file layout used by `sprig-cli --config`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub graph: GraphOptions,
    pub mst: MstOptions,
}

impl Config {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(text).map_err(|e| Error::InvalidConfig {
            message: e.to_string(),
        })?;
        cfg.graph.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_missing_keys() {
        let cfg = Config::from_json_str(r#"{ "graph": { "checkSymmetry": false } }"#).unwrap();
        assert!(!cfg.graph.check_symmetry);
        assert_eq!(cfg.graph.isolation_tolerance, 1e-5);
        assert!(cfg.graph.require_spanning);
        assert_eq!(cfg.mst, MstOptions::default());
    }

    #[test]
    fn start_vertex_accepts_names_and_indices() {
        let cfg = Config::from_json_str(r#"{ "mst": { "start": 3 } }"#).unwrap();
        assert_eq!(cfg.mst.start, StartVertex::Index(3));

        let cfg = Config::from_json_str(r#"{ "mst": { "start": "random", "seed": 7 } }"#).unwrap();
        assert_eq!(cfg.mst.start, StartVertex::Random);
        assert_eq!(cfg.mst.seed, Some(7));

        assert!(Config::from_json_str(r#"{ "mst": { "start": "middle" } }"#).is_err());
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let err = Config::from_json_str(r#"{ "graph": { "isolationTolerance": -1.0 } }"#)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn resolve_start_stays_in_range() {
        let opts = MstOptions {
            start: StartVertex::Random,
            seed: Some(42),
        };
        for n in 1..20 {
            let s = opts.resolve_start(n).unwrap();
            assert!(s < n);
            assert_eq!(opts.resolve_start(n), Some(s));
        }
        assert_eq!(opts.resolve_start(0), None);

        let opts = MstOptions {
            start: StartVertex::Index(9),
            seed: None,
        };
        assert_eq!(opts.resolve_start(4), Some(0));
        assert_eq!(opts.resolve_start(10), Some(9));
    }
}
