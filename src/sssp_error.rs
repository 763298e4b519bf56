//! SsspError: Unified error type for dijkstra-spmd public APIs
//!
//! Every fallible operation in the crate reports through this type so that a
//! failure on any worker can be surfaced without panicking.

use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for shortest-path runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SsspError {
    /// The vertex count must be strictly positive.
    #[error("Configuration error: vertex count must be positive, got {0}")]
    InvalidVertexCount(i64),
    /// The source vertex is not in `0..vertex_count`.
    #[error("Configuration error: source vertex {vertex} out of range for {vertex_count} vertices")]
    SourceOutOfRange { vertex: i64, vertex_count: usize },
    /// No graph input was supplied.
    #[error("Configuration error: no graph input supplied")]
    MissingInput,
    /// Random-graph parameters that no graph can satisfy.
    #[error("Configuration error: {0}")]
    InvalidGenerator(String),
    /// A partition was requested for zero workers.
    #[error("Configuration error: worker count must be at least 1")]
    NoWorkers,
    /// A rank outside `0..size` was used.
    #[error("Configuration error: rank {rank} out of range for {size} workers")]
    RankOutOfRange { rank: usize, size: usize },
    /// The input could not be opened or read.
    #[error("I/O error on `{path}`: {message}")]
    Io { path: String, message: String },
    /// A token in the input could not be parsed.
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },
    /// The input did not contain the expected number of entries.
    #[error("Matrix shape error: expected {expected} entries, found {found}")]
    MatrixShape { expected: usize, found: usize },
    /// A negative weight other than the `-1` "no edge" marker.
    #[error("Unsupported input: negative weight {weight} at ({row}, {col})")]
    NegativeWeight { row: usize, col: usize, weight: i64 },
    /// A weight that collides with the internal "no edge" sentinel.
    #[error("Unsupported input: weight {weight} at ({row}, {col}) is reserved for \"no edge\"")]
    WeightTooLarge { row: usize, col: usize, weight: i64 },
    /// A worker attempted to write a column it does not own.
    #[error("Ownership violation: rank {rank} wrote vertex {vertex} outside [{start}, {end})")]
    OwnershipViolation {
        rank: usize,
        vertex: usize,
        start: usize,
        end: usize,
    },
    /// The coordinator signalled an abort during bootstrap.
    #[error("Run aborted by coordinator during bootstrap")]
    Aborted,
    /// A collective returned malformed data.
    #[error("Communication error on rank {rank}: {message}")]
    CommError { rank: usize, message: String },
    /// An internal consistency check failed.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl SsspError {
    /// Wrap an I/O failure for `path`.
    pub fn io(path: impl Debug, err: std::io::Error) -> Self {
        SsspError::Io {
            path: format!("{path:?}").trim_matches('"').to_string(),
            message: err.to_string(),
        }
    }

    /// Whether this error is detected before any collective is entered.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SsspError::InvalidVertexCount(_)
                | SsspError::SourceOutOfRange { .. }
                | SsspError::MissingInput
                | SsspError::NoWorkers
                | SsspError::InvalidGenerator(_)
                | SsspError::RankOutOfRange { .. }
        )
    }
}
