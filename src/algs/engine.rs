//! Iteration engine: the lockstep label-setting loop run by every worker.
//!
//! Each iteration walks `Selecting → Relaxing → Merging` and returns to
//! `Selecting`; the engine reaches `Done` when the global arg-min finds no
//! reachable unvisited vertex or after `vertex_count` iterations. Every
//! transition out of `Selecting` and `Merging` is a collective, so all ranks
//! must step their engines in lockstep.

use std::ops::Range;

use crate::algs::collective::all_reduce_argmin;
use crate::algs::communicator::Communicator;
use crate::algs::partition::ColumnPartition;
use crate::debug_invariants::DebugInvariants;
use crate::graph::DenseGraph;
use crate::sssp_error::SsspError;
use crate::state::{INFINITY, ReplicatedState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Selecting,
    /// Relaxing edges out of the finalized vertex.
    Relaxing(usize),
    Merging,
    Done,
}

/// Why the loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// No unvisited vertex with a finite distance remained.
    Exhausted,
    /// `vertex_count` vertices were finalized.
    IterationLimit,
}

#[derive(Clone, Debug)]
pub struct EngineOutcome {
    pub state: ReplicatedState,
    pub iterations: usize,
    pub termination: Termination,
}

pub struct IterationEngine<'a, C: Communicator> {
    comm: &'a C,
    graph: &'a DenseGraph,
    partition: ColumnPartition,
    owned: Range<usize>,
    state: ReplicatedState,
    phase: EngineState,
    iterations: usize,
    termination: Option<Termination>,
}

impl<'a, C: Communicator> IterationEngine<'a, C> {
    pub fn new(
        comm: &'a C,
        graph: &'a DenseGraph,
        partition: ColumnPartition,
        initial: ReplicatedState,
    ) -> Result<Self, SsspError> {
        if partition.workers() != comm.size() {
            return Err(SsspError::InvariantViolation(format!(
                "partition built for {} workers, world has {}",
                partition.workers(),
                comm.size()
            )));
        }
        if graph.padded_count() != partition.padded_count()
            || initial.len() != partition.padded_count()
        {
            return Err(SsspError::InvariantViolation(format!(
                "graph ({}) / state ({}) not padded to {}",
                graph.padded_count(),
                initial.len(),
                partition.padded_count()
            )));
        }
        let owned = partition.range(comm.rank())?;
        Ok(Self {
            comm,
            graph,
            partition,
            owned,
            state: initial,
            phase: EngineState::Selecting,
            iterations: 0,
            termination: None,
        })
    }

    pub fn phase(&self) -> EngineState {
        self.phase
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn state(&self) -> &ReplicatedState {
        &self.state
    }

    pub fn owned_range(&self) -> Range<usize> {
        self.owned.clone()
    }

    /// Perform one state transition and return the new phase.
    pub fn step(&mut self) -> Result<EngineState, SsspError> {
        self.phase = match self.phase {
            EngineState::Selecting => self.select()?,
            EngineState::Relaxing(u) => {
                self.relax(u)?;
                EngineState::Merging
            }
            EngineState::Merging => {
                self.state.merge(self.comm, self.owned.clone())?;
                self.iterations += 1;
                self.state.debug_assert_invariants();
                EngineState::Selecting
            }
            EngineState::Done => EngineState::Done,
        };
        Ok(self.phase)
    }

    /// Drive the loop to `Done`.
    pub fn run(mut self) -> Result<EngineOutcome, SsspError> {
        while self.step()? != EngineState::Done {}
        let termination = self.termination.unwrap_or(Termination::IterationLimit);
        log::info!(
            "rank {}: finished after {} iterations ({:?})",
            self.comm.rank(),
            self.iterations,
            termination
        );
        Ok(EngineOutcome {
            state: self.state,
            iterations: self.iterations,
            termination,
        })
    }

    fn select(&mut self) -> Result<EngineState, SsspError> {
        if self.iterations >= self.partition.vertex_count() {
            self.termination = Some(Termination::IterationLimit);
            return Ok(EngineState::Done);
        }
        let local = self.state.local_candidate(self.owned.clone());
        let global = all_reduce_argmin(self.comm, local)?;
        let Some(u) = global.vertex.filter(|_| !global.is_none()) else {
            let unreached = self.partition.vertex_count() - self.state.visited_count();
            if unreached > 0 && self.comm.rank() == 0 {
                log::warn!("{unreached} vertices unreachable from the source");
            }
            self.termination = Some(Termination::Exhausted);
            return Ok(EngineState::Done);
        };
        if self.partition.is_padding(u) {
            return Err(SsspError::InvariantViolation(format!(
                "padding vertex {u} selected at distance {}",
                global.dist
            )));
        }
        log::debug!(
            "rank {}: iteration {} finalizes vertex {u} at distance {}",
            self.comm.rank(),
            self.iterations,
            global.dist
        );
        self.state.mark_visited(u);
        Ok(EngineState::Relaxing(u))
    }

    /// Relax `u → v` for every owned column `v`; returns the number of improvements.
    fn relax(&mut self, u: usize) -> Result<usize, SsspError> {
        let du = self.state.distance(u);
        if du == INFINITY {
            return Err(SsspError::InvariantViolation(format!(
                "finalized vertex {u} has no distance"
            )));
        }
        let improvements: Vec<(usize, i64)> = self
            .owned
            .clone()
            .filter(|&v| !self.state.is_visited(v))
            .filter_map(|v| {
                let w = self.graph.weight(u, v)?;
                // An overflowing path can never be shorter than a stored one.
                let cand = du.checked_add(w)?;
                (cand < self.state.distance(v)).then_some((v, cand))
            })
            .collect();

        let rank = self.comm.rank();
        let mut cols = self.state.owned(rank, self.owned.clone())?;
        for &(v, d) in &improvements {
            log::trace!("rank {rank}: dist[{v}] <- {d} via {u}");
            cols.improve(v, d, u)?;
        }
        Ok(improvements.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::communicator::NoComm;

    fn chain() -> DenseGraph {
        #[rustfmt::skip]
        let m = [
             0,  1,  5, -1,
            -1,  0,  2, -1,
            -1, -1,  0,  1,
            -1, -1, -1,  0,
        ];
        DenseGraph::from_input(4, &m).unwrap()
    }

    #[test]
    fn phases_cycle_in_order() {
        let g = chain();
        let p = ColumnPartition::new(4, 1).unwrap();
        let init = ReplicatedState::with_source(4, 0).unwrap();
        let mut e = IterationEngine::new(&NoComm, &g, p, init).unwrap();
        assert_eq!(e.phase(), EngineState::Selecting);
        assert_eq!(e.step().unwrap(), EngineState::Relaxing(0));
        assert_eq!(e.step().unwrap(), EngineState::Merging);
        assert_eq!(e.step().unwrap(), EngineState::Selecting);
        assert_eq!(e.iterations(), 1);
        assert_eq!(e.state().distance(1), 1);
        assert_eq!(e.state().distance(2), 5);
    }

    #[test]
    fn serial_run_matches_expected_chain() {
        let g = chain();
        let p = ColumnPartition::new(4, 1).unwrap();
        let init = ReplicatedState::with_source(4, 0).unwrap();
        let out = IterationEngine::new(&NoComm, &g, p, init)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(out.state.distances(), &[0, 1, 3, 4]);
        assert_eq!(out.state.predecessors(), &[-1, 0, 1, 2]);
        assert_eq!(out.iterations, 4);
        assert_eq!(out.termination, Termination::IterationLimit);
    }

    #[test]
    fn unreachable_vertices_stop_early() {
        let g = DenseGraph::from_input(3, &[0, 2, -1, -1, 0, -1, -1, -1, 0]).unwrap();
        let p = ColumnPartition::new(3, 1).unwrap();
        let init = ReplicatedState::with_source(3, 0).unwrap();
        let out = IterationEngine::new(&NoComm, &g, p, init)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(out.iterations, 2);
        assert_eq!(out.termination, Termination::Exhausted);
        assert_eq!(out.state.distance(2), INFINITY);
    }

    #[test]
    fn done_is_terminal() {
        let g = DenseGraph::from_input(1, &[0]).unwrap();
        let p = ColumnPartition::new(1, 1).unwrap();
        let init = ReplicatedState::with_source(1, 0).unwrap();
        let mut e = IterationEngine::new(&NoComm, &g, p, init).unwrap();
        while e.step().unwrap() != EngineState::Done {}
        assert_eq!(e.step().unwrap(), EngineState::Done);
        assert_eq!(e.iterations(), 1);
    }

    #[test]
    fn mismatched_padding_is_rejected() {
        let g = chain();
        let p = ColumnPartition::new(4, 1).unwrap();
        let init = ReplicatedState::with_source(6, 0).unwrap();
        assert!(IterationEngine::new(&NoComm, &g, p, init).is_err());
    }
}
