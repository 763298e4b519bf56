//! Re-export public algorithms.

pub mod bootstrap;
pub mod collective;
pub mod communicator;
pub mod engine;
pub mod partition;
pub mod serial;
pub mod sssp;
pub mod wire;

pub use serial::dijkstra_serial;
pub use sssp::{distributed_sssp, distributed_sssp_graph};
