//! Run configuration, validated identically on every rank before any collective.

use std::path::PathBuf;

use crate::graph::DenseGraph;
use crate::io::read_matrix_file;
use crate::sssp_error::SsspError;

/// Where the coordinator gets the graph from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphSource {
    /// Whitespace-separated dense matrix file, `-1` = no edge.
    File(PathBuf),
    /// Row-major entries in the same convention, already in memory.
    Matrix(Vec<i64>),
}

impl GraphSource {
    /// Load an unpadded graph of `vertex_count` vertices.
    pub fn load(&self, vertex_count: usize) -> Result<DenseGraph, SsspError> {
        match self {
            GraphSource::File(path) => read_matrix_file(path, vertex_count),
            GraphSource::Matrix(entries) => DenseGraph::from_input(vertex_count, entries),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    pub vertex_count: usize,
    pub source: usize,
    pub input: GraphSource,
}

impl RunConfig {
    /// Check raw launch parameters: `vertex_count > 0`, `0 <= source < vertex_count`,
    /// and an input present.
    pub fn from_raw(
        vertex_count: i64,
        source: i64,
        input: Option<GraphSource>,
    ) -> Result<Self, SsspError> {
        if vertex_count <= 0 {
            return Err(SsspError::InvalidVertexCount(vertex_count));
        }
        let n = vertex_count as usize;
        if source < 0 || source >= vertex_count {
            return Err(SsspError::SourceOutOfRange {
                vertex: source,
                vertex_count: n,
            });
        }
        let input = match input {
            Some(GraphSource::File(p)) if p.as_os_str().is_empty() => {
                return Err(SsspError::MissingInput);
            }
            Some(src) => src,
            None => return Err(SsspError::MissingInput),
        };
        Ok(Self {
            vertex_count: n,
            source: source as usize,
            input,
        })
    }

    pub fn validate(&self) -> Result<(), SsspError> {
        Self::from_raw(
            self.vertex_count as i64,
            self.source as i64,
            Some(self.input.clone()),
        )
        .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_launch_parameters() {
        let m = || Some(GraphSource::Matrix(vec![0]));
        assert_eq!(RunConfig::from_raw(0, 0, m()), Err(SsspError::InvalidVertexCount(0)));
        assert_eq!(
            RunConfig::from_raw(3, 3, m()),
            Err(SsspError::SourceOutOfRange {
                vertex: 3,
                vertex_count: 3
            })
        );
        assert!(RunConfig::from_raw(3, -1, m()).is_err());
        assert_eq!(RunConfig::from_raw(3, 0, None), Err(SsspError::MissingInput));
        assert_eq!(
            RunConfig::from_raw(3, 0, Some(GraphSource::File(PathBuf::new()))),
            Err(SsspError::MissingInput)
        );
    }

    #[test]
    fn configuration_errors_are_classified() {
        let err = RunConfig::from_raw(-2, 0, None).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn matrix_source_loads() {
        let cfg = RunConfig::from_raw(2, 1, Some(GraphSource::Matrix(vec![0, 4, -1, 0]))).unwrap();
        cfg.validate().unwrap();
        let g = cfg.input.load(cfg.vertex_count).unwrap();
        assert_eq!(g.weight(0, 1), Some(4));
    }
}
