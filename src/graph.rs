//! Dense weighted adjacency matrix, padded to the partition size.
//!
//! Weights are stored row-major as `i64`. Missing edges hold [`NO_EDGE`],
//! which is never combined arithmetically; use [`DenseGraph::weight`] to get
//! an `Option` instead of the raw sentinel.

use crate::debug_invariants::{DebugInvariants, ensure};
use crate::sssp_error::SsspError;

pub type Weight = i64;

/// In-memory "no edge" sentinel.
pub const NO_EDGE: Weight = i64::MAX;

/// "No edge" marker used by the text formats.
pub const INPUT_NO_EDGE: i64 = -1;

/// Square weight matrix. The top-left `vertex_count` block holds the real
/// graph; rows and columns past it are padding with no edges at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseGraph {
    vertex_count: usize,
    padded_count: usize,
    weights: Vec<Weight>,
}

impl DenseGraph {
    /// Build an unpadded graph from row-major entries in input convention
    /// (`-1` = no edge). Diagonal entries are forced to zero.
    pub fn from_input(vertex_count: usize, entries: &[i64]) -> Result<Self, SsspError> {
        if vertex_count == 0 {
            return Err(SsspError::InvalidVertexCount(0));
        }
        let expected = vertex_count * vertex_count;
        if entries.len() != expected {
            return Err(SsspError::MatrixShape {
                expected,
                found: entries.len(),
            });
        }
        let mut weights = Vec::with_capacity(expected);
        for (i, &raw) in entries.iter().enumerate() {
            let (row, col) = (i / vertex_count, i % vertex_count);
            let w = match raw {
                _ if row == col => 0,
                INPUT_NO_EDGE => NO_EDGE,
                w if w < 0 => {
                    return Err(SsspError::NegativeWeight {
                        row,
                        col,
                        weight: w,
                    });
                }
                NO_EDGE => {
                    return Err(SsspError::WeightTooLarge {
                        row,
                        col,
                        weight: raw,
                    });
                }
                w => w,
            };
            weights.push(w);
        }
        Ok(Self {
            vertex_count,
            padded_count: vertex_count,
            weights,
        })
    }

    /// Reassemble a padded graph received over the wire.
    pub fn from_padded_weights(
        vertex_count: usize,
        padded_count: usize,
        weights: Vec<Weight>,
    ) -> Result<Self, SsspError> {
        if padded_count < vertex_count {
            return Err(SsspError::InvariantViolation(format!(
                "padded count {padded_count} below vertex count {vertex_count}"
            )));
        }
        if weights.len() != padded_count * padded_count {
            return Err(SsspError::MatrixShape {
                expected: padded_count * padded_count,
                found: weights.len(),
            });
        }
        let g = Self {
            vertex_count,
            padded_count,
            weights,
        };
        g.validate_invariants()?;
        Ok(g)
    }

    /// Copy of this graph padded to `padded_count` vertices.
    pub fn padded(&self, padded_count: usize) -> Result<Self, SsspError> {
        if padded_count < self.vertex_count {
            return Err(SsspError::InvariantViolation(format!(
                "cannot pad {} vertices down to {padded_count}",
                self.vertex_count
            )));
        }
        let mut weights = vec![NO_EDGE; padded_count * padded_count];
        for u in 0..self.vertex_count {
            let src = &self.row(u)[..self.vertex_count];
            weights[u * padded_count..u * padded_count + self.vertex_count].copy_from_slice(src);
        }
        Ok(Self {
            vertex_count: self.vertex_count,
            padded_count,
            weights,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn padded_count(&self) -> usize {
        self.padded_count
    }

    /// Edge weight `u → v`, or `None` when there is no edge.
    #[inline]
    pub fn weight(&self, u: usize, v: usize) -> Option<Weight> {
        match self.weights[u * self.padded_count + v] {
            NO_EDGE => None,
            w => Some(w),
        }
    }

    #[inline]
    pub fn row(&self, u: usize) -> &[Weight] {
        &self.weights[u * self.padded_count..(u + 1) * self.padded_count]
    }

    /// Raw row-major weights, including padding and sentinels.
    pub fn weights(&self) -> &[Weight] {
        &self.weights
    }

    /// Real edges `(u, v, w)` with `u != v`, in row-major order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, Weight)> + '_ {
        let n = self.vertex_count;
        (0..n).flat_map(move |u| {
            (0..n).filter_map(move |v| {
                if u == v {
                    return None;
                }
                self.weight(u, v).map(|w| (u, v, w))
            })
        })
    }

    /// Unpadded entries in input convention (`-1` = no edge).
    pub fn to_input_entries(&self) -> Vec<i64> {
        let n = self.vertex_count;
        let mut out = Vec::with_capacity(n * n);
        for u in 0..n {
            out.extend(
                (0..n).map(|v| self.weight(u, v).unwrap_or(INPUT_NO_EDGE)),
            );
        }
        out
    }
}

impl DebugInvariants for DenseGraph {
    fn validate_invariants(&self) -> Result<(), SsspError> {
        let p = self.padded_count;
        if self.weights.len() != p * p {
            return Err(SsspError::MatrixShape {
                expected: p * p,
                found: self.weights.len(),
            });
        }
        for u in 0..p {
            for v in 0..p {
                let w = self.weights[u * p + v];
                let real = u < self.vertex_count && v < self.vertex_count;
                ensure(!(real && u == v) || w == 0, || {
                    format!("self weight of {u} is {w}, expected 0")
                })?;
                ensure(real || w == NO_EDGE, || {
                    format!("padding entry ({u}, {v}) carries weight {w}")
                })?;
                if w < 0 {
                    return Err(SsspError::NegativeWeight {
                        row: u,
                        col: v,
                        weight: w,
                    });
                }
            }
        }
        Ok(())
    }
}
