//! Typed collectives built on the byte-level [`Communicator`] primitives.

use crate::algs::communicator::Communicator;
use crate::algs::wire::{WireCandidate, WireHdr, cast_slice, decode_i64s, encode_i64s, pod_vec_from};
use crate::sssp_error::SsspError;
use crate::state::Candidate;
use std::mem::size_of;

/// Broadcast an `i64` buffer from `root`; every rank must pass a buffer of the same length.
pub fn broadcast_i64s<C: Communicator>(
    comm: &C,
    root: usize,
    buf: &mut [i64],
) -> Result<(), SsspError> {
    let mut bytes = encode_i64s(buf);
    comm.broadcast(root, &mut bytes)?;
    let vals = decode_i64s(&bytes).map_err(|message| SsspError::CommError {
        rank: comm.rank(),
        message,
    })?;
    buf.copy_from_slice(&vals);
    Ok(())
}

/// Broadcast the bootstrap header. `root` supplies `Some(hdr)`, everyone else `None`.
pub fn broadcast_header<C: Communicator>(
    comm: &C,
    root: usize,
    hdr: Option<WireHdr>,
) -> Result<WireHdr, SsspError> {
    let mut bytes = match hdr {
        Some(h) => cast_slice(std::slice::from_ref(&h)).to_vec(),
        None => vec![0u8; size_of::<WireHdr>()],
    };
    comm.broadcast(root, &mut bytes)?;
    pod_vec_from::<WireHdr>(&bytes)
        .first()
        .copied()
        .ok_or_else(|| SsspError::CommError {
            rank: comm.rank(),
            message: "empty bootstrap header".into(),
        })
}

/// Global arg-min over every rank's local candidate.
///
/// Candidates are gathered and folded in rank order with the
/// `(distance, vertex)` ordering of [`Candidate`], so the lowest vertex index
/// wins ties no matter which backend performs the exchange.
pub fn all_reduce_argmin<C: Communicator>(
    comm: &C,
    local: Candidate,
) -> Result<Candidate, SsspError> {
    let wire = WireCandidate::of(local);
    let gathered = comm.all_gather(cast_slice(std::slice::from_ref(&wire)));
    if gathered.len() != comm.size() {
        return Err(SsspError::CommError {
            rank: comm.rank(),
            message: format!("arg-min gathered {} of {} ranks", gathered.len(), comm.size()),
        });
    }
    let mut best = Candidate::none();
    for part in &gathered {
        if part.len() != WireCandidate::SIZE {
            return Err(SsspError::CommError {
                rank: comm.rank(),
                message: format!("arg-min record of {} bytes", part.len()),
            });
        }
        let c = pod_vec_from::<WireCandidate>(part)[0].get();
        best = best.min(c);
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::communicator::{NoComm, run_local_world};
    use crate::state::INFINITY;

    #[test]
    fn argmin_breaks_ties_by_lowest_vertex() {
        // Rank r proposes vertex 10 - r at distance 5: all tie, vertex 7 must win.
        let got = run_local_world(4, |comm| {
            let v = 10 - comm.rank();
            all_reduce_argmin(&comm, Candidate::at(5, v)).unwrap()
        })
        .unwrap();
        assert!(got.iter().all(|c| *c == Candidate::at(5, 7)));
    }

    #[test]
    fn argmin_ignores_empty_ranks() {
        let got = run_local_world(3, |comm| {
            let local = if comm.rank() == 1 {
                Candidate::at(9, 4)
            } else {
                Candidate::none()
            };
            all_reduce_argmin(&comm, local).unwrap()
        })
        .unwrap();
        assert!(got.iter().all(|c| *c == Candidate::at(9, 4)));
    }

    #[test]
    fn argmin_all_empty_is_none() {
        let c = all_reduce_argmin(&NoComm, Candidate::none()).unwrap();
        assert!(c.is_none());
        assert_eq!(c.dist, INFINITY);
    }

    #[test]
    fn broadcast_i64s_copies_root() {
        let got = run_local_world(2, |comm| {
            let mut buf = if comm.rank() == 0 { vec![4, INFINITY, -1] } else { vec![0; 3] };
            broadcast_i64s(&comm, 0, &mut buf).unwrap();
            buf
        })
        .unwrap();
        assert_eq!(got[1], vec![4, INFINITY, -1]);
    }
}
