//! Graph I/O helpers: dense text matrices and `u v w` edge lists.
//!
//! Readers and writers are small trait objects over `Read`/`Write` so the
//! coordinator can load from a file and tests can load from byte slices.

pub mod edge_list;
pub mod matrix;

pub use edge_list::{Edge, EdgeListReader, EdgeListWriter};
pub use matrix::{MatrixReader, MatrixWriter};

use crate::graph::DenseGraph;
use crate::sssp_error::SsspError;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

/// Trait for readers that build a [`DenseGraph`] from a byte stream.
pub trait GraphReader {
    fn read<R: Read>(&self, reader: R) -> Result<DenseGraph, SsspError>;
}

/// Trait for writers that serialize a [`DenseGraph`].
pub trait GraphWriter {
    fn write<W: Write>(&self, writer: W, graph: &DenseGraph) -> Result<(), SsspError>;
}

/// Read a dense matrix file of `vertex_count` rows.
pub fn read_matrix_file(path: impl AsRef<Path>, vertex_count: usize) -> Result<DenseGraph, SsspError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| SsspError::io(path, e))?;
    MatrixReader::new(vertex_count)
        .read(BufReader::new(file))
        .map_err(|e| match e {
            SsspError::Io { message, .. } => SsspError::Io {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
}

/// Read a whole stream into a string, tagging failures with `what`.
pub(crate) fn read_to_string<R: Read>(mut reader: R, what: &str) -> Result<String, SsspError> {
    let mut contents = String::new();
    reader
        .read_to_string(&mut contents)
        .map_err(|e| SsspError::io(what, e))?;
    Ok(contents)
}

pub(crate) fn write_err(e: std::io::Error) -> SsspError {
    SsspError::io("<output>", e)
}
