//! Run under `mpirun -n <k> cargo test --features mpi-support --test mpi_smoke`.
#![cfg(feature = "mpi-support")]
mod util;

use dijkstra_spmd::prelude::*;
use serial_test::serial;
use util::*;

#[test]
#[serial]
fn chain_over_mpi_world() {
    let comm = MpiComm::new().unwrap();
    let out = distributed_sssp_graph(&comm, &chain4(), 0).unwrap();
    if comm.rank() == 0 {
        let r = out.unwrap();
        assert_eq!(r.distances, vec![0, 1, 3, 4]);
        assert_eq!(r.predecessors, vec![-1, 0, 1, 2]);
        assert_eq!(r.workers, comm.size());
    } else {
        assert!(out.is_none());
    }
}
