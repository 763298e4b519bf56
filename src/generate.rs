//! Random graph generation for benchmarks and tests.
//!
//! All randomness comes from a `SmallRng` seeded from [`GeneratorConfig::seed`],
//! so the same configuration always yields the same edge list.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use crate::io::Edge;
use crate::sssp_error::SsspError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub vertices: usize,
    pub edges: usize,
    pub directed: bool,
    pub seed: u64,
    /// Weights are drawn uniformly from `1..=max_weight`.
    pub max_weight: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            vertices: 16,
            edges: 32,
            directed: false,
            seed: 42,
            max_weight: 10,
        }
    }
}

impl GeneratorConfig {
    /// Number of distinct edges a simple graph of this kind can hold.
    pub fn max_edges(&self) -> usize {
        let n = self.vertices;
        let ordered = n * n.saturating_sub(1);
        if self.directed { ordered } else { ordered / 2 }
    }
}

/// Draw `cfg.edges` distinct edges without self loops. In undirected mode
/// `(u, v)` and `(v, u)` count as the same edge and only one is returned.
pub fn random_edges(cfg: &GeneratorConfig) -> Result<Vec<Edge>, SsspError> {
    if cfg.vertices == 0 {
        return Err(SsspError::InvalidVertexCount(0));
    }
    if cfg.edges > cfg.max_edges() {
        return Err(SsspError::InvalidGenerator(format!(
            "{} edges requested but a {} graph on {} vertices holds at most {}",
            cfg.edges,
            if cfg.directed { "directed" } else { "undirected" },
            cfg.vertices,
            cfg.max_edges()
        )));
    }
    if cfg.max_weight < 1 {
        return Err(SsspError::InvalidGenerator(format!(
            "maximum weight must be at least 1, got {}",
            cfg.max_weight
        )));
    }
    let mut rng = SmallRng::seed_from_u64(cfg.seed);
    let mut seen = HashSet::with_capacity(cfg.edges);
    let mut out = Vec::with_capacity(cfg.edges);
    while out.len() < cfg.edges {
        let u = rng.gen_range(0..cfg.vertices);
        let v = rng.gen_range(0..cfg.vertices);
        if u == v {
            continue;
        }
        let key = if cfg.directed { (u, v) } else { (u.min(v), u.max(v)) };
        if !seen.insert(key) {
            continue;
        }
        out.push(Edge::new(u, v, rng.gen_range(1..=cfg.max_weight)));
    }
    log::debug!(
        "generated {} edges over {} vertices (seed {})",
        out.len(),
        cfg.vertices,
        cfg.seed
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_edges() {
        let cfg = GeneratorConfig::default();
        assert_eq!(random_edges(&cfg).unwrap(), random_edges(&cfg).unwrap());
    }

    #[test]
    fn edges_are_distinct_and_weighted() {
        let cfg = GeneratorConfig {
            vertices: 6,
            edges: 15,
            ..Default::default()
        };
        let edges = random_edges(&cfg).unwrap();
        assert_eq!(edges.len(), 15);
        let mut keys: Vec<_> = edges.iter().map(|e| (e.u.min(e.v), e.u.max(e.v))).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 15);
        assert!(edges.iter().all(|e| e.u != e.v && (1..=10).contains(&e.w)));
    }

    #[test]
    fn too_many_edges_is_an_error() {
        let cfg = GeneratorConfig {
            vertices: 3,
            edges: 4,
            directed: false,
            ..Default::default()
        };
        assert!(matches!(
            random_edges(&cfg),
            Err(SsspError::InvalidGenerator(_))
        ));
        let directed = GeneratorConfig { directed: true, ..cfg };
        assert_eq!(random_edges(&directed).unwrap().len(), 4);
    }

    #[test]
    fn non_positive_max_weight_is_a_configuration_error() {
        let cfg = GeneratorConfig {
            max_weight: 0,
            ..Default::default()
        };
        let err = random_edges(&cfg).unwrap_err();
        assert!(matches!(err, SsspError::InvalidGenerator(_)));
        assert!(err.is_configuration());
    }
}
