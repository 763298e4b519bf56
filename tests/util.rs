#![allow(dead_code)]
use dijkstra_spmd::generate::{GeneratorConfig, random_edges};
use dijkstra_spmd::io::edge_list::edges_to_graph;
use dijkstra_spmd::prelude::*;

/// Chain 0 -1-> 1 -2-> 2 -1-> 3 plus a long edge 0 -5-> 2.
pub const CHAIN4: [i64; 16] = [
    0, 1, 5, -1, //
    -1, 0, 2, -1, //
    -1, -1, 0, 1, //
    -1, -1, -1, 0,
];

pub fn chain4() -> DenseGraph {
    DenseGraph::from_input(4, &CHAIN4).unwrap()
}

/// Seeded random undirected graph with weights in `1..=10`.
pub fn random_graph(vertices: usize, edges: usize, seed: u64) -> DenseGraph {
    random_graph_with(vertices, edges, false, seed)
}

/// Seeded random graph; `edges` is clamped to what the graph can hold.
pub fn random_graph_with(vertices: usize, edges: usize, directed: bool, seed: u64) -> DenseGraph {
    let mut cfg = GeneratorConfig {
        vertices,
        directed,
        seed,
        ..Default::default()
    };
    cfg.edges = edges.min(cfg.max_edges());
    edges_to_graph(vertices, &random_edges(&cfg).unwrap(), directed).unwrap()
}

/// Distributed run over `workers` in-process ranks; returns the coordinator's report.
pub fn run_workers(graph: &DenseGraph, source: usize, workers: usize) -> SsspReport {
    let mut out = run_local_world(workers, |comm| {
        distributed_sssp_graph(&comm, graph, source).unwrap()
    })
    .unwrap();
    out.swap_remove(0).expect("coordinator reports")
}

/// Every reachable non-source vertex must sit exactly one edge past its predecessor.
pub fn assert_tree_consistent(graph: &DenseGraph, r: &SsspReport) {
    for v in 0..r.vertex_count() {
        let p = r.predecessors[v];
        if v == r.source || p < 0 {
            continue;
        }
        let p = p as usize;
        let w = graph.weight(p, v).expect("predecessor edge exists");
        assert_eq!(
            r.distances[v],
            r.distances[p] + w,
            "dist[{v}] != dist[{p}] + w({p},{v})"
        );
    }
}
