//! One-shot distribution of the graph and the initial distances.
//!
//! Only the coordinator (rank 0) touches the input. It always broadcasts a
//! status header first, so that a failed load turns into a symmetric abort
//! instead of leaving the other ranks blocked on a payload broadcast that
//! never comes.

use crate::algs::collective::{broadcast_header, broadcast_i64s};
use crate::algs::communicator::Communicator;
use crate::algs::partition::ColumnPartition;
use crate::algs::wire::{HDR_ABORT, HDR_OK, WIRE_VERSION, WireHdr};
use crate::graph::{DenseGraph, NO_EDGE};
use crate::sssp_error::SsspError;
use crate::state::{INFINITY, ReplicatedState};

/// Rank that reads the input and produces the report.
pub const COORDINATOR: usize = 0;

/// Everything a worker needs to enter the iteration loop.
#[derive(Clone, Debug)]
pub struct Bootstrapped {
    pub partition: ColumnPartition,
    pub graph: DenseGraph,
    pub initial: ReplicatedState,
}

/// Distribute the graph produced by `load` (called on the coordinator only)
/// and the initial distance vector for `source`.
///
/// `vertex_count` and `source` must already be validated and identical on
/// every rank.
pub fn bootstrap<C, L>(
    comm: &C,
    vertex_count: usize,
    source: usize,
    load: L,
) -> Result<Bootstrapped, SsspError>
where
    C: Communicator,
    L: FnOnce() -> Result<DenseGraph, SsspError>,
{
    let partition = ColumnPartition::new(vertex_count, comm.size())?;
    let padded = partition.padded_count();
    let rank = comm.rank();

    let (hdr, local) = if rank == COORDINATOR {
        let loaded = load().and_then(|g| {
            if g.vertex_count() != vertex_count {
                return Err(SsspError::MatrixShape {
                    expected: vertex_count * vertex_count,
                    found: g.vertex_count() * g.vertex_count(),
                });
            }
            g.padded(padded)
        });
        match loaded {
            Ok(g) => (Some(WireHdr::ok(padded)), Ok(Some(g))),
            Err(e) => {
                log::error!("coordinator failed to load graph: {e}");
                (Some(WireHdr::abort()), Err(e))
            }
        }
    } else {
        (None, Ok(None))
    };

    let hdr = broadcast_header(comm, COORDINATOR, hdr)?;
    if hdr.version() != WIRE_VERSION {
        return Err(SsspError::CommError {
            rank,
            message: format!("wire version {} != {}", hdr.version(), WIRE_VERSION),
        });
    }
    match hdr.kind() {
        HDR_OK => {}
        HDR_ABORT => {
            log::warn!("rank {rank}: bootstrap aborted by coordinator");
            return Err(local.err().unwrap_or(SsspError::Aborted));
        }
        other => {
            return Err(SsspError::CommError {
                rank,
                message: format!("unknown bootstrap header kind {other}"),
            });
        }
    }
    if hdr.padded() != padded {
        return Err(SsspError::CommError {
            rank,
            message: format!("coordinator padded to {}, expected {padded}", hdr.padded()),
        });
    }

    let mut weights = match local? {
        Some(g) => g.weights().to_vec(),
        None => vec![NO_EDGE; padded * padded],
    };
    broadcast_i64s(comm, COORDINATOR, &mut weights)?;

    let mut dist = vec![INFINITY; padded];
    if rank == COORDINATOR {
        dist[source] = 0;
    }
    broadcast_i64s(comm, COORDINATOR, &mut dist)?;

    let graph = DenseGraph::from_padded_weights(vertex_count, padded, weights)?;
    log::info!(
        "rank {rank}: bootstrap complete ({vertex_count} vertices padded to {padded}, columns {:?})",
        partition.range(rank)?
    );
    Ok(Bootstrapped {
        partition,
        graph,
        initial: ReplicatedState::from_distances(dist),
    })
}
