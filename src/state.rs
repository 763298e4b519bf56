//! Replicated per-vertex state: tentative distances, predecessors, visited flags.
//!
//! Every worker holds the full vectors but may only change the entries of its
//! own column range (through [`OwnedColumns`]). The one exception is
//! [`ReplicatedState::mark_visited`], which applies the globally agreed winner
//! identically on every rank. [`ReplicatedState::merge`] reconciles the partial
//! views after each relaxation.

use std::cmp::Ordering;
use std::ops::Range;

use crate::algs::communicator::{Communicator, ReduceOp};
use crate::debug_invariants::{DebugInvariants, ensure};
use crate::sssp_error::SsspError;

pub type Distance = i64;

/// Tentative distance of a vertex not yet reached.
pub const INFINITY: Distance = i64::MAX;

/// "No predecessor" / "no vertex" marker, also the reported unreachable value.
pub const NONE: i64 = -1;

/// A worker's proposal for the next vertex to finalize.
///
/// Ordered by `(dist, vertex)`; "no candidate" sorts after every real one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub dist: Distance,
    pub vertex: Option<usize>,
}

impl Candidate {
    pub fn none() -> Self {
        Self {
            dist: INFINITY,
            vertex: None,
        }
    }

    pub fn at(dist: Distance, vertex: usize) -> Self {
        Self {
            dist,
            vertex: Some(vertex),
        }
    }

    pub fn is_none(&self) -> bool {
        self.vertex.is_none() || self.dist == INFINITY
    }

    fn key(&self) -> (bool, Distance, usize) {
        (self.is_none(), self.dist, self.vertex.unwrap_or(usize::MAX))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplicatedState {
    dist: Vec<Distance>,
    pred: Vec<i64>,
    visited: Vec<u8>,
}

impl ReplicatedState {
    /// State over `padded_count` vertices with only `source` reached.
    pub fn with_source(padded_count: usize, source: usize) -> Result<Self, SsspError> {
        if source >= padded_count {
            return Err(SsspError::SourceOutOfRange {
                vertex: source as i64,
                vertex_count: padded_count,
            });
        }
        let mut dist = vec![INFINITY; padded_count];
        dist[source] = 0;
        Ok(Self::from_distances(dist))
    }

    /// Fresh state from an initial distance vector (as broadcast at bootstrap).
    pub fn from_distances(dist: Vec<Distance>) -> Self {
        let n = dist.len();
        Self {
            dist,
            pred: vec![NONE; n],
            visited: vec![0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.dist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dist.is_empty()
    }

    #[inline]
    pub fn distance(&self, v: usize) -> Distance {
        self.dist[v]
    }

    #[inline]
    pub fn predecessor(&self, v: usize) -> Option<usize> {
        usize::try_from(self.pred[v]).ok()
    }

    #[inline]
    pub fn is_visited(&self, v: usize) -> bool {
        self.visited[v] != 0
    }

    pub fn distances(&self) -> &[Distance] {
        &self.dist
    }

    pub fn predecessors(&self) -> &[i64] {
        &self.pred
    }

    pub fn visited_count(&self) -> usize {
        self.visited.iter().filter(|&&f| f != 0).count()
    }

    /// Unvisited vertex of smallest finite distance within `range`; on equal
    /// distances the lower index wins.
    pub fn local_candidate(&self, range: Range<usize>) -> Candidate {
        let mut best = Candidate::none();
        for v in range {
            if !self.is_visited(v) && self.dist[v] < best.dist {
                best = Candidate::at(self.dist[v], v);
            }
        }
        best
    }

    /// Finalize the globally agreed winner. Idempotent.
    pub fn mark_visited(&mut self, v: usize) {
        self.visited[v] = 1;
    }

    /// Write access restricted to `range`, the columns `rank` owns.
    pub fn owned(&mut self, rank: usize, range: Range<usize>) -> Result<OwnedColumns<'_>, SsspError> {
        if range.end > self.len() || range.start > range.end {
            return Err(SsspError::InvariantViolation(format!(
                "owned range {range:?} exceeds state of {} vertices",
                self.len()
            )));
        }
        Ok(OwnedColumns {
            state: self,
            rank,
            range,
        })
    }

    /// Collective reconciliation after a relaxation step.
    ///
    /// * distances: element-wise min; stale copies are never below the owner's value;
    /// * predecessors: element-wise max where each rank contributes only its own
    ///   columns (`NONE` elsewhere), so the owner's entry is the only candidate;
    /// * visited: element-wise logical OR.
    pub fn merge<C: Communicator>(&mut self, comm: &C, owned: Range<usize>) -> Result<(), SsspError> {
        if owned.end > self.len() {
            return Err(SsspError::InvariantViolation(format!(
                "merge range {owned:?} exceeds state of {} vertices",
                self.len()
            )));
        }
        comm.all_reduce_i64(&mut self.dist, ReduceOp::Min)?;

        let mut contrib = vec![NONE; self.len()];
        contrib[owned.clone()].copy_from_slice(&self.pred[owned]);
        comm.all_reduce_i64(&mut contrib, ReduceOp::Max)?;
        self.pred = contrib;

        comm.all_reduce_or(&mut self.visited)?;
        Ok(())
    }
}

impl DebugInvariants for ReplicatedState {
    fn validate_invariants(&self) -> Result<(), SsspError> {
        let n = self.len();
        ensure(self.pred.len() == n && self.visited.len() == n, || {
            format!(
                "vector lengths differ: dist {n}, pred {}, visited {}",
                self.pred.len(),
                self.visited.len()
            )
        })?;
        for v in 0..n {
            let d = self.dist[v];
            ensure(d >= 0, || format!("negative distance {d} at vertex {v}"))?;
            ensure(!self.is_visited(v) || d != INFINITY, || {
                format!("vertex {v} visited without a finite distance")
            })?;
            let p = self.pred[v];
            if p != NONE {
                ensure(p >= 0 && (p as usize) < n, || {
                    format!("predecessor {p} of vertex {v} out of range")
                })?;
                ensure(d != INFINITY, || {
                    format!("vertex {v} has predecessor {p} but no distance")
                })?;
            }
        }
        Ok(())
    }
}

/// Mutable view of the columns one rank owns.
pub struct OwnedColumns<'a> {
    state: &'a mut ReplicatedState,
    rank: usize,
    range: Range<usize>,
}

impl OwnedColumns<'_> {
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Record an improved distance for `v` reached through `via`.
    ///
    /// Rejects writes outside the owned range and writes to finalized vertices.
    pub fn improve(&mut self, v: usize, dist: Distance, via: usize) -> Result<(), SsspError> {
        if !self.range.contains(&v) {
            return Err(SsspError::OwnershipViolation {
                rank: self.rank,
                vertex: v,
                start: self.range.start,
                end: self.range.end,
            });
        }
        if self.state.is_visited(v) {
            return Err(SsspError::InvariantViolation(format!(
                "rank {} tried to change finalized vertex {v}",
                self.rank
            )));
        }
        self.state.dist[v] = dist;
        self.state.pred[v] = via as i64;
        Ok(())
    }
}
