//! Column partitioning of a padded vertex range across workers.
//!
//! The vertex count is padded up to a multiple of the worker count (or to the
//! worker count itself when there are more workers than vertices), so every
//! worker owns a contiguous, equally sized, half-open column range.

use std::ops::Range;

use crate::sssp_error::SsspError;

/// Padded vertex count for `vertex_count` vertices over `workers` workers.
///
/// # Panics
/// Panics if `workers == 0`; use [`ColumnPartition::new`] for a checked version.
pub fn padded_count(vertex_count: usize, workers: usize) -> usize {
    assert!(workers > 0, "worker count must be at least 1");
    if workers > vertex_count {
        workers
    } else {
        vertex_count.div_ceil(workers) * workers
    }
}

/// Assignment of padded columns to workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnPartition {
    vertex_count: usize,
    workers: usize,
    padded_count: usize,
}

impl ColumnPartition {
    pub fn new(vertex_count: usize, workers: usize) -> Result<Self, SsspError> {
        if workers == 0 {
            return Err(SsspError::NoWorkers);
        }
        if vertex_count == 0 {
            return Err(SsspError::InvalidVertexCount(0));
        }
        Ok(Self {
            vertex_count,
            workers,
            padded_count: padded_count(vertex_count, workers),
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn padded_count(&self) -> usize {
        self.padded_count
    }

    /// Columns per worker; exact because of the padding rule.
    pub fn width(&self) -> usize {
        self.padded_count / self.workers
    }

    /// Half-open column range owned by `rank`.
    pub fn range(&self, rank: usize) -> Result<Range<usize>, SsspError> {
        if rank >= self.workers {
            return Err(SsspError::RankOutOfRange {
                rank,
                size: self.workers,
            });
        }
        let start = rank * self.width();
        Ok(start..start + self.width())
    }

    /// Rank owning `vertex`, or `None` past the padded range.
    pub fn owner_of(&self, vertex: usize) -> Option<usize> {
        (vertex < self.padded_count).then(|| vertex / self.width())
    }

    /// All ranges in rank order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        let w = self.width();
        (0..self.workers).map(move |r| r * w..(r + 1) * w)
    }

    pub fn is_padding(&self, vertex: usize) -> bool {
        vertex >= self.vertex_count && vertex < self.padded_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_vertices_three_workers_pads_to_six() {
        let p = ColumnPartition::new(5, 3).unwrap();
        assert_eq!(p.padded_count(), 6);
        assert_eq!(p.width(), 2);
        assert_eq!(p.range(2).unwrap(), 4..6);
        assert!(p.is_padding(5));
        assert!(!p.is_padding(4));
    }

    #[test]
    fn more_workers_than_vertices() {
        let p = ColumnPartition::new(3, 8).unwrap();
        assert_eq!(p.padded_count(), 8);
        assert_eq!(p.width(), 1);
        assert_eq!(p.owner_of(7), Some(7));
        assert_eq!(p.owner_of(8), None);
    }

    #[test]
    fn exact_division_needs_no_padding() {
        assert_eq!(padded_count(12, 4), 12);
        assert_eq!(padded_count(1, 1), 1);
    }

    #[test]
    fn ranges_cover_without_overlap() {
        for n in 1..20 {
            for w in 1..9 {
                let p = ColumnPartition::new(n, w).unwrap();
                let mut next = 0;
                for (r, range) in p.ranges().enumerate() {
                    assert_eq!(range.start, next);
                    assert_eq!(range, p.range(r).unwrap());
                    for v in range.clone() {
                        assert_eq!(p.owner_of(v), Some(r));
                    }
                    next = range.end;
                }
                assert_eq!(next, p.padded_count());
                assert!(p.padded_count() >= n);
                assert_eq!(p.padded_count() % w, 0);
            }
        }
    }

    #[test]
    fn precondition_violations_are_errors() {
        assert_eq!(ColumnPartition::new(4, 0), Err(SsspError::NoWorkers));
        assert_eq!(ColumnPartition::new(0, 2), Err(SsspError::InvalidVertexCount(0)));
        let p = ColumnPartition::new(4, 2).unwrap();
        assert_eq!(
            p.range(2),
            Err(SsspError::RankOutOfRange { rank: 2, size: 2 })
        );
    }
}
