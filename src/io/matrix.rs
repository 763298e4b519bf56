//! Dense adjacency-matrix text format.
//!
//! `n` rows of `n` whitespace-separated integers; `-1` means "no edge", any
//! other value is a non-negative weight. Diagonal entries are read but
//! replaced by zero.

use crate::graph::DenseGraph;
use crate::io::{GraphReader, GraphWriter, read_to_string, write_err};
use crate::sssp_error::SsspError;
use itertools::Itertools;
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy)]
pub struct MatrixReader {
    vertex_count: usize,
}

impl MatrixReader {
    pub fn new(vertex_count: usize) -> Self {
        Self { vertex_count }
    }
}

impl GraphReader for MatrixReader {
    fn read<R: Read>(&self, reader: R) -> Result<DenseGraph, SsspError> {
        let n = self.vertex_count;
        if n == 0 {
            return Err(SsspError::InvalidVertexCount(0));
        }
        let contents = read_to_string(reader, "<matrix>")?;
        let expected = n * n;
        let mut entries = Vec::with_capacity(expected);
        for (lineno, line) in contents.lines().enumerate() {
            for tok in line.split_whitespace() {
                let v = tok.parse::<i64>().map_err(|e| SsspError::Parse {
                    line: lineno + 1,
                    message: format!("invalid weight `{tok}`: {e}"),
                })?;
                entries.push(v);
            }
        }
        if entries.len() != expected {
            return Err(SsspError::MatrixShape {
                expected,
                found: entries.len(),
            });
        }
        DenseGraph::from_input(n, &entries)
    }
}

/// Writes the real block of a graph, one row per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixWriter;

impl GraphWriter for MatrixWriter {
    fn write<W: Write>(&self, mut writer: W, graph: &DenseGraph) -> Result<(), SsspError> {
        let n = graph.vertex_count();
        for row in graph.to_input_entries().chunks(n) {
            writeln!(writer, "{}", row.iter().join(" ")).map_err(write_err)?;
        }
        writer.flush().map_err(write_err)
    }
}
