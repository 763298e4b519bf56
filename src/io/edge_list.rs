//! `u v w` edge lists and their conversion to a dense matrix.
//!
//! In undirected mode every edge is mirrored when building the matrix; a
//! later line for the same pair overwrites an earlier one.

use crate::graph::{DenseGraph, INPUT_NO_EDGE};
use crate::io::{GraphReader, GraphWriter, read_to_string, write_err};
use crate::sssp_error::SsspError;
use std::io::{Read, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub u: usize,
    pub v: usize,
    pub w: i64,
}

impl Edge {
    pub fn new(u: usize, v: usize, w: i64) -> Self {
        Self { u, v, w }
    }
}

/// Parse `u v w` triples, one per line; blank lines are skipped.
pub fn parse_edges(contents: &str) -> Result<Vec<Edge>, SsspError> {
    let mut out = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let bad = |message: String| SsspError::Parse {
            line: lineno + 1,
            message,
        };
        let parts: Vec<&str> = line.split_whitespace().collect();
        let &[u, v, w] = parts.as_slice() else {
            return Err(bad(format!("expected `u v w`, got `{line}`")));
        };
        let u = u.parse::<usize>().map_err(|e| bad(format!("bad source `{u}`: {e}")))?;
        let v = v.parse::<usize>().map_err(|e| bad(format!("bad target `{v}`: {e}")))?;
        let w = w.parse::<i64>().map_err(|e| bad(format!("bad weight `{w}`: {e}")))?;
        out.push(Edge::new(u, v, w));
    }
    Ok(out)
}

/// Build an unpadded `vertex_count` graph from `edges`.
pub fn edges_to_graph(
    vertex_count: usize,
    edges: &[Edge],
    directed: bool,
) -> Result<DenseGraph, SsspError> {
    if vertex_count == 0 {
        return Err(SsspError::InvalidVertexCount(0));
    }
    let n = vertex_count;
    let mut entries = vec![INPUT_NO_EDGE; n * n];
    for i in 0..n {
        entries[i * n + i] = 0;
    }
    for e in edges {
        if e.u >= n || e.v >= n {
            return Err(SsspError::MatrixShape {
                expected: n,
                found: e.u.max(e.v) + 1,
            });
        }
        if e.w < 0 {
            return Err(SsspError::NegativeWeight {
                row: e.u,
                col: e.v,
                weight: e.w,
            });
        }
        entries[e.u * n + e.v] = e.w;
        if !directed {
            entries[e.v * n + e.u] = e.w;
        }
    }
    DenseGraph::from_input(n, &entries)
}

#[derive(Debug, Clone, Copy)]
pub struct EdgeListReader {
    vertex_count: usize,
    directed: bool,
}

impl EdgeListReader {
    pub fn new(vertex_count: usize, directed: bool) -> Self {
        Self {
            vertex_count,
            directed,
        }
    }
}

impl GraphReader for EdgeListReader {
    fn read<R: Read>(&self, reader: R) -> Result<DenseGraph, SsspError> {
        let contents = read_to_string(reader, "<edge list>")?;
        edges_to_graph(self.vertex_count, &parse_edges(&contents)?, self.directed)
    }
}

/// Writes one `u v w` line per real edge of the graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeListWriter;

impl EdgeListWriter {
    /// Write a raw edge list; in undirected mode each edge is written in both directions.
    pub fn write_edges<W: Write>(
        &self,
        mut writer: W,
        edges: &[Edge],
        directed: bool,
    ) -> Result<(), SsspError> {
        for e in edges {
            writeln!(writer, "{} {} {}", e.u, e.v, e.w).map_err(write_err)?;
            if !directed {
                writeln!(writer, "{} {} {}", e.v, e.u, e.w).map_err(write_err)?;
            }
        }
        writer.flush().map_err(write_err)
    }
}

impl GraphWriter for EdgeListWriter {
    fn write<W: Write>(&self, writer: W, graph: &DenseGraph) -> Result<(), SsspError> {
        let edges: Vec<Edge> = graph.edges().map(|(u, v, w)| Edge::new(u, v, w)).collect();
        self.write_edges(writer, &edges, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undirected_edges_are_mirrored() {
        let g = EdgeListReader::new(3, false)
            .read("0 1 4\n\n1 2 6\n".as_bytes())
            .unwrap();
        assert_eq!(g.weight(1, 0), Some(4));
        assert_eq!(g.weight(2, 1), Some(6));
        assert_eq!(g.weight(0, 2), None);
    }

    #[test]
    fn directed_edges_are_one_way() {
        let g = EdgeListReader::new(2, true).read("0 1 4\n".as_bytes()).unwrap();
        assert_eq!(g.weight(0, 1), Some(4));
        assert_eq!(g.weight(1, 0), None);
    }

    #[test]
    fn malformed_line_is_reported() {
        let err = parse_edges("0 1 2\n0 1\n").unwrap_err();
        assert!(matches!(err, SsspError::Parse { line: 2, .. }));
    }

    #[test]
    fn out_of_range_vertex_is_rejected() {
        assert!(edges_to_graph(2, &[Edge::new(0, 5, 1)], true).is_err());
    }

    #[test]
    fn writer_round_trips_directed_graph() {
        let g = edges_to_graph(3, &[Edge::new(0, 2, 3), Edge::new(2, 1, 1)], true).unwrap();
        let mut out = Vec::new();
        EdgeListWriter.write(&mut out, &g).unwrap();
        let back = EdgeListReader::new(3, true).read(&out[..]).unwrap();
        assert_eq!(back, g);
    }
}
