//! Final per-vertex results, trimmed to the real vertex count.

use itertools::Itertools;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::state::{INFINITY, NONE, ReplicatedState};

/// How a report was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Serial,
    Parallel,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Serial => f.write_str("serial"),
            RunMode::Parallel => f.write_str("parallel"),
        }
    }
}

/// Shortest-path tree from `source`. Unreachable vertices carry `-1` in both
/// vectors, as does the source's predecessor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SsspReport {
    pub mode: RunMode,
    pub workers: usize,
    pub source: usize,
    pub iterations: usize,
    /// Wall-clock seconds spent in the iteration loop only.
    pub elapsed_secs: f64,
    pub distances: Vec<i64>,
    pub predecessors: Vec<i64>,
}

impl SsspReport {
    /// Build a report from the first `vertex_count` entries of `state`.
    pub fn from_state(
        state: &ReplicatedState,
        vertex_count: usize,
        source: usize,
        mode: RunMode,
        workers: usize,
        iterations: usize,
        elapsed: Duration,
    ) -> Self {
        let distances = state.distances()[..vertex_count]
            .iter()
            .map(|&d| if d == INFINITY { NONE } else { d })
            .collect();
        let predecessors = state.predecessors()[..vertex_count].to_vec();
        Self {
            mode,
            workers,
            source,
            iterations,
            elapsed_secs: elapsed.as_secs_f64(),
            distances,
            predecessors,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.distances.len()
    }

    pub fn is_reachable(&self, v: usize) -> bool {
        self.distances.get(v).is_some_and(|&d| d != NONE)
    }

    /// Vertices on the shortest path `source → v`, or `None` if unreachable.
    pub fn path_to(&self, v: usize) -> Option<Vec<usize>> {
        if !self.is_reachable(v) {
            return None;
        }
        let mut path = vec![v];
        let mut cur = v;
        while let Ok(p) = usize::try_from(self.predecessors[cur]) {
            // A well-formed tree has at most vertex_count hops.
            if path.len() > self.vertex_count() {
                return None;
            }
            path.push(p);
            cur = p;
        }
        path.reverse();
        (path[0] == self.source).then_some(path)
    }
}

impl fmt::Display for SsspReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Dijkstra ({}) completed in {} seconds.",
            self.mode, self.elapsed_secs
        )?;
        writeln!(
            f,
            "Distances from source {}: {}",
            self.source,
            self.distances.iter().join(" ")
        )?;
        write!(f, "Predecessors: {}", self.predecessors.iter().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> SsspReport {
        let mut state = ReplicatedState::from_distances(vec![0, 1, 3, INFINITY, INFINITY]);
        {
            let mut own = state.owned(0, 0..5).unwrap();
            own.improve(1, 1, 0).unwrap();
            own.improve(2, 3, 1).unwrap();
        }
        SsspReport::from_state(&state, 4, 0, RunMode::Parallel, 2, 3, Duration::from_millis(5))
    }

    #[test]
    fn trims_padding_and_maps_unreachable() {
        let r = report();
        assert_eq!(r.distances, vec![0, 1, 3, -1]);
        assert_eq!(r.predecessors, vec![-1, 0, 1, -1]);
        assert!(!r.is_reachable(3));
    }

    #[test]
    fn path_follows_predecessors() {
        let r = report();
        assert_eq!(r.path_to(2), Some(vec![0, 1, 2]));
        assert_eq!(r.path_to(0), Some(vec![0]));
        assert_eq!(r.path_to(3), None);
    }

    #[test]
    fn display_lists_both_vectors() {
        let text = report().to_string();
        assert!(text.starts_with("Dijkstra (parallel) completed in 0.005 seconds."));
        assert!(text.contains("Distances from source 0: 0 1 3 -1"));
        assert!(text.ends_with("Predecessors: -1 0 1 -1"));
    }
}
