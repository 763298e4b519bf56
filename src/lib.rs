//! # dijkstra-spmd
//!
//! Single-source shortest paths on dense weighted graphs, computed by a fixed
//! set of cooperating workers running the same program in lockstep (SPMD).
//!
//! ## How a run works
//! - The coordinator (rank 0) reads the adjacency matrix and broadcasts it,
//!   padded so the vertex count divides evenly across workers.
//! - Each worker owns a contiguous range of columns ([`algs::partition`]).
//! - Every iteration, workers propose their closest unvisited vertex and agree
//!   on the global winner through a deterministic arg-min (lowest vertex index
//!   wins ties), relax the winner's edges into their own columns, then merge
//!   the replicated state with min / max / OR reductions ([`state`]).
//! - The coordinator reports distances and predecessors (`-1` = unreachable).
//!
//! ## Backends
//! The same code runs over any [`Communicator`](algs::communicator::Communicator):
//! `NoComm` (one rank), `RayonComm` (in-process ranks, see
//! [`run_local_world`](algs::communicator::run_local_world)) and `MpiComm`
//! (feature `mpi-support`).
//!
//! ```toml
//! [dependencies]
//! dijkstra-spmd = "0.1"
//! # features = ["mpi-support", "check-invariants"]
//! ```

pub mod algs;
pub mod config;
pub mod debug_invariants;
pub mod generate;
pub mod graph;
pub mod io;
pub mod report;
pub mod sssp_error;
pub mod state;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    #[cfg(feature = "mpi-support")]
    pub use crate::algs::communicator::MpiComm;
    pub use crate::algs::communicator::{Communicator, NoComm, RayonComm, run_local_world};
    pub use crate::algs::partition::ColumnPartition;
    pub use crate::algs::{dijkstra_serial, distributed_sssp, distributed_sssp_graph};
    pub use crate::config::{GraphSource, RunConfig};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::graph::DenseGraph;
    pub use crate::io::{GraphReader, GraphWriter};
    pub use crate::report::{RunMode, SsspReport};
    pub use crate::sssp_error::SsspError;
}
