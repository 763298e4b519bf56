//! Single-process label-setting reference.
//!
//! Used as the correctness baseline for the distributed engine, so it shares
//! none of the engine's selection or update code: plain vectors, a linear
//! scan for the closest unvisited vertex (lowest index on ties), and the same
//! report type.

use std::time::Instant;

use crate::graph::DenseGraph;
use crate::report::{RunMode, SsspReport};
use crate::sssp_error::SsspError;

/// Shortest paths from `source` over the real vertices of `graph`.
pub fn dijkstra_serial(graph: &DenseGraph, source: usize) -> Result<SsspReport, SsspError> {
    let n = graph.vertex_count();
    if source >= n {
        return Err(SsspError::SourceOutOfRange {
            vertex: source as i64,
            vertex_count: n,
        });
    }
    let mut dist: Vec<Option<i64>> = vec![None; n];
    let mut pred: Vec<i64> = vec![-1; n];
    let mut visited = vec![false; n];
    dist[source] = Some(0);

    let start = Instant::now();
    let mut iterations = 0;
    for _ in 0..n {
        let next = (0..n)
            .filter(|&v| !visited[v])
            .filter_map(|v| dist[v].map(|d| (d, v)))
            .min();
        let Some((du, u)) = next else {
            break;
        };
        visited[u] = true;
        iterations += 1;
        for v in 0..n {
            if visited[v] {
                continue;
            }
            let Some(cand) = graph.weight(u, v).and_then(|w| du.checked_add(w)) else {
                continue;
            };
            if dist[v].is_none_or(|d| cand < d) {
                dist[v] = Some(cand);
                pred[v] = u as i64;
            }
        }
    }
    let elapsed = start.elapsed();
    Ok(SsspReport {
        mode: RunMode::Serial,
        workers: 1,
        source,
        iterations,
        elapsed_secs: elapsed.as_secs_f64(),
        distances: dist.into_iter().map(|d| d.unwrap_or(-1)).collect(),
        predecessors: pred,
    })
}
