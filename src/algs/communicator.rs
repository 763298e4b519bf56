//! Thin façade over intra-process (Rayon) or inter-process (MPI) collectives.
//!
//! Every method is a **collective**: all ranks of a world must call the same
//! method, in the same order, with equally sized buffers, or the run hangs.
//! There is no timeout and no cancellation.
//!
//! Payloads are contiguous byte slices or `i64` slices; typed helpers live in
//! [`collective`](crate::algs::collective).

use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

use crate::algs::wire::{decode_i64s, encode_i64s};
use crate::sssp_error::SsspError;

/// Element-wise reduction applied by [`Communicator::all_reduce_i64`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReduceOp {
    Min,
    Max,
}

impl ReduceOp {
    #[inline]
    pub fn apply(self, a: i64, b: i64) -> i64 {
        match self {
            ReduceOp::Min => a.min(b),
            ReduceOp::Max => a.max(b),
        }
    }
}

/// Blocking collective interface.
///
/// Length mismatches between ranks are reported as [`SsspError::CommError`].
/// Reductions see every contribution, so every rank reports the mismatch;
/// a broadcast mismatch is only visible to the receiving ranks.
pub trait Communicator {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    /// `true` only for the serial [`NoComm`] backend.
    fn is_no_comm(&self) -> bool {
        false
    }

    fn barrier(&self);

    /// Overwrite `buf` on every rank with the contents of `buf` on `root`.
    fn broadcast(&self, root: usize, buf: &mut [u8]) -> Result<(), SsspError>;

    /// Gather every rank's `local` bytes, returned in rank order.
    fn all_gather(&self, local: &[u8]) -> Vec<Vec<u8>>;

    /// Element-wise reduction of `buf` across all ranks, result on every rank.
    fn all_reduce_i64(&self, buf: &mut [i64], op: ReduceOp) -> Result<(), SsspError> {
        let gathered = self.all_gather(&encode_i64s(buf));
        let parts = gathered
            .iter()
            .enumerate()
            .map(|(peer, part)| {
                let vals = decode_i64s(part).map_err(|message| SsspError::CommError {
                    rank: self.rank(),
                    message: format!("all_reduce_i64 from rank {peer}: {message}"),
                })?;
                check_len(self.rank(), "all_reduce_i64", peer, vals.len(), buf.len())?;
                Ok(vals)
            })
            .collect::<Result<Vec<_>, SsspError>>()?;
        let mut parts = parts.into_iter();
        if let Some(first) = parts.next() {
            buf.copy_from_slice(&first);
        }
        for vals in parts {
            for (acc, v) in buf.iter_mut().zip(vals) {
                *acc = op.apply(*acc, v);
            }
        }
        Ok(())
    }

    /// Element-wise logical OR of 0/1 flags across all ranks.
    fn all_reduce_or(&self, flags: &mut [u8]) -> Result<(), SsspError> {
        let gathered = self.all_gather(flags);
        for (peer, part) in gathered.iter().enumerate() {
            check_len(self.rank(), "all_reduce_or", peer, part.len(), flags.len())?;
        }
        for part in gathered {
            for (acc, f) in flags.iter_mut().zip(part) {
                *acc = u8::from(*acc != 0 || f != 0);
            }
        }
        Ok(())
    }
}

fn check_len(
    rank: usize,
    what: &str,
    peer: usize,
    found: usize,
    expected: usize,
) -> Result<(), SsspError> {
    if found == expected {
        return Ok(());
    }
    log::error!("rank {rank}: {what} got {found} elements from rank {peer}, expected {expected}");
    Err(SsspError::CommError {
        rank,
        message: format!("{what}: rank {peer} contributed {found} elements, expected {expected}"),
    })
}

/// Compile-time no-op comm for pure serial runs: one rank, identity collectives.
#[derive(Clone, Debug, Default)]
pub struct NoComm;

impl Communicator for NoComm {
    fn rank(&self) -> usize {
        0
    }
    fn size(&self) -> usize {
        1
    }
    fn is_no_comm(&self) -> bool {
        true
    }
    fn barrier(&self) {}
    fn broadcast(&self, _root: usize, _buf: &mut [u8]) -> Result<(), SsspError> {
        Ok(())
    }
    fn all_gather(&self, local: &[u8]) -> Vec<Vec<u8>> {
        vec![local.to_vec()]
    }
    fn all_reduce_i64(&self, _buf: &mut [i64], _op: ReduceOp) -> Result<(), SsspError> {
        Ok(())
    }
    fn all_reduce_or(&self, _flags: &mut [u8]) -> Result<(), SsspError> {
        Ok(())
    }
}

// --- RayonComm: intra-process / multi-thread ---
type Key = (usize, usize, u64); // (src, dst, epoch)

/// Shared mailbox for the ranks of one in-process world.
///
/// Each collective call bumps the caller's epoch; since every rank issues the
/// same collectives in the same order, `(src, dst, epoch)` keys never collide.
pub struct LocalWorld {
    size: usize,
    mailbox: DashMap<Key, Bytes>,
    signal: Mutex<()>,
    ready: Condvar,
}

impl LocalWorld {
    pub fn new(size: usize) -> Arc<Self> {
        Arc::new(Self {
            size,
            mailbox: DashMap::new(),
            signal: Mutex::new(()),
            ready: Condvar::new(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Communicator handle for `rank` in this world.
    pub fn comm(self: &Arc<Self>, rank: usize) -> RayonComm {
        RayonComm {
            rank,
            world: Arc::clone(self),
            epoch: AtomicU64::new(0),
        }
    }

    fn post(&self, key: Key, payload: Bytes) {
        let _guard = self.signal.lock();
        self.mailbox.insert(key, payload);
        self.ready.notify_all();
    }

    fn take(&self, key: Key) -> Bytes {
        let mut guard = self.signal.lock();
        loop {
            if let Some((_, bytes)) = self.mailbox.remove(&key) {
                return bytes;
            }
            self.ready.wait(&mut guard);
        }
    }
}

/// One rank of an in-process [`LocalWorld`].
pub struct RayonComm {
    rank: usize,
    world: Arc<LocalWorld>,
    epoch: AtomicU64,
}

impl std::fmt::Debug for RayonComm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RayonComm")
            .field("rank", &self.rank)
            .field("size", &self.world.size)
            .finish()
    }
}

impl RayonComm {
    fn next_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Relaxed)
    }
}

impl Communicator for RayonComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.world.size
    }

    fn barrier(&self) {
        let _ = self.all_gather(&[]);
    }

    fn broadcast(&self, root: usize, buf: &mut [u8]) -> Result<(), SsspError> {
        let epoch = self.next_epoch();
        if self.rank == root {
            let payload = Bytes::copy_from_slice(buf);
            for peer in (0..self.world.size).filter(|&p| p != root) {
                self.world.post((root, peer, epoch), payload.clone());
            }
            return Ok(());
        }
        let got = self.world.take((root, self.rank, epoch));
        check_len(self.rank, "broadcast", root, got.len(), buf.len())?;
        buf.copy_from_slice(&got);
        Ok(())
    }

    fn all_gather(&self, local: &[u8]) -> Vec<Vec<u8>> {
        let epoch = self.next_epoch();
        let payload = Bytes::copy_from_slice(local);
        for peer in (0..self.world.size).filter(|&p| p != self.rank) {
            self.world.post((self.rank, peer, epoch), payload.clone());
        }
        (0..self.world.size)
            .map(|peer| {
                if peer == self.rank {
                    local.to_vec()
                } else {
                    self.world.take((peer, self.rank, epoch)).to_vec()
                }
            })
            .collect()
    }
}

/// Run `f` once per rank of a fresh `size`-rank in-process world.
///
/// Each rank gets its own thread of a dedicated Rayon pool, so blocking
/// collectives cannot starve one another. Results are returned in rank order.
pub fn run_local_world<F, R>(size: usize, f: F) -> Result<Vec<R>, SsspError>
where
    F: Fn(RayonComm) -> R + Sync,
    R: Send,
{
    if size == 0 {
        return Err(SsspError::NoWorkers);
    }
    let world = LocalWorld::new(size);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(size)
        .thread_name(|i| format!("sssp-rank-{i}"))
        .build()
        .map_err(|e| SsspError::CommError {
            rank: 0,
            message: format!("failed to build worker pool: {e}"),
        })?;
    log::debug!("launching in-process world with {size} ranks");
    Ok(pool.broadcast(|ctx| f(world.comm(ctx.index()))))
}

// --- MPI backend (feature = "mpi-support") ---
#[cfg(feature = "mpi-support")]
mod mpi_backend {
    use super::*;
    use mpi::Count;
    use mpi::collective::SystemOperation;
    use mpi::datatype::PartitionMut;
    use mpi::environment::Universe;
    use mpi::topology::SimpleCommunicator;
    use mpi::traits::*;

    /// MPI world communicator. Owns the MPI environment; dropping it finalizes MPI.
    pub struct MpiComm {
        pub world: SimpleCommunicator,
        rank: usize,
        size: usize,
        _universe: Universe,
    }

    impl MpiComm {
        pub fn new() -> Result<Self, SsspError> {
            let universe = mpi::initialize().ok_or_else(|| SsspError::CommError {
                rank: 0,
                message: "MPI already initialized or unavailable".into(),
            })?;
            let world = universe.world();
            let rank = world.rank() as usize;
            let size = world.size() as usize;
            Ok(Self {
                world,
                rank,
                size,
                _universe: universe,
            })
        }
    }

    impl Communicator for MpiComm {
        fn rank(&self) -> usize {
            self.rank
        }

        fn size(&self) -> usize {
            self.size
        }

        fn barrier(&self) {
            self.world.barrier();
        }

        fn broadcast(&self, root: usize, buf: &mut [u8]) -> Result<(), SsspError> {
            let root_proc = self.world.process_at_rank(root as i32);
            let mut len = buf.len() as u64;
            root_proc.broadcast_into(&mut len);
            // Agree on the outcome before the payload so no rank is left waiting.
            let mine = i32::from(len != buf.len() as u64);
            let mut any = 0i32;
            self.world
                .all_reduce_into(&mine, &mut any, SystemOperation::max());
            if any != 0 {
                check_len(self.rank, "broadcast", root, len as usize, buf.len())?;
                return Err(SsspError::CommError {
                    rank: self.rank,
                    message: "broadcast length mismatch on another rank".into(),
                });
            }
            root_proc.broadcast_into(buf);
            Ok(())
        }

        fn all_gather(&self, local: &[u8]) -> Vec<Vec<u8>> {
            let mine = local.len() as Count;
            let mut counts = vec![0 as Count; self.size];
            self.world.all_gather_into(&mine, &mut counts[..]);
            let displs: Vec<Count> = counts
                .iter()
                .scan(0, |acc, &c| {
                    let d = *acc;
                    *acc += c;
                    Some(d)
                })
                .collect();
            let total: Count = counts.iter().sum();
            let mut recv = vec![0u8; total as usize];
            {
                let mut part = PartitionMut::new(&mut recv[..], &counts[..], &displs[..]);
                self.world.all_gather_varcount_into(local, &mut part);
            }
            counts
                .iter()
                .zip(&displs)
                .map(|(&c, &d)| recv[d as usize..(d + c) as usize].to_vec())
                .collect()
        }

        fn all_reduce_i64(&self, buf: &mut [i64], op: ReduceOp) -> Result<(), SsspError> {
            self.agree_len("all_reduce_i64", buf.len())?;
            let send = buf.to_vec();
            let op = match op {
                ReduceOp::Min => SystemOperation::min(),
                ReduceOp::Max => SystemOperation::max(),
            };
            self.world.all_reduce_into(&send[..], buf, op);
            Ok(())
        }

        fn all_reduce_or(&self, flags: &mut [u8]) -> Result<(), SsspError> {
            self.agree_len("all_reduce_or", flags.len())?;
            let send = flags.to_vec();
            self.world
                .all_reduce_into(&send[..], flags, SystemOperation::logical_or());
            Ok(())
        }
    }

    impl MpiComm {
        /// Fail on every rank unless all ranks pass the same `len`.
        fn agree_len(&self, what: &str, len: usize) -> Result<(), SsspError> {
            let send = [len as i64, -(len as i64)];
            let mut bounds = [0i64; 2];
            self.world
                .all_reduce_into(&send[..], &mut bounds[..], SystemOperation::max());
            let (max, min) = (bounds[0], -bounds[1]);
            if max == min {
                return Ok(());
            }
            Err(SsspError::CommError {
                rank: self.rank,
                message: format!("{what}: ranks disagree on length ({min}..={max})"),
            })
        }
    }
}

#[cfg(feature = "mpi-support")]
pub use mpi_backend::MpiComm;
