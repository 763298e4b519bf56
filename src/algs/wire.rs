//! Fixed, versioned, little-endian wire types for collectives.
//!
//! Backends that move raw bytes (`RayonComm`) and the typed helpers in
//! [`collective`](crate::algs::collective) agree on these layouts.

use bytemuck::{Pod, Zeroable};
use static_assertions::assert_eq_size;
use std::mem::size_of;

use crate::state::{Candidate, INFINITY, NONE};

pub fn cast_slice<T: Pod>(v: &[T]) -> &[u8] {
    bytemuck::cast_slice(v)
}

/// Copy `bytes` into a fresh `Vec<T>`; tolerates unaligned input.
pub fn pod_vec_from<T: Pod>(bytes: &[u8]) -> Vec<T> {
    bytemuck::pod_collect_to_vec(bytes)
}

/// Encode an `i64` slice as little-endian bytes.
pub fn encode_i64s(v: &[i64]) -> Vec<u8> {
    let le: Vec<i64> = v.iter().map(|x| x.to_le()).collect();
    cast_slice(&le).to_vec()
}

/// Decode little-endian bytes produced by [`encode_i64s`].
pub fn decode_i64s(bytes: &[u8]) -> Result<Vec<i64>, String> {
    if bytes.len() % size_of::<i64>() != 0 {
        return Err(format!("{} bytes is not a whole number of i64", bytes.len()));
    }
    Ok(pod_vec_from::<i64>(bytes)
        .into_iter()
        .map(i64::from_le)
        .collect())
}

/// Bump when the layout or semantics change in incompatible ways.
pub const WIRE_VERSION: u16 = 1;

/// Bootstrap status carried in [`WireHdr::kind`].
pub const HDR_OK: u16 = 1;
pub const HDR_ABORT: u16 = 2;

// ===== Bootstrap header ====================================================

/// First record broadcast by the coordinator: tells every worker whether a
/// graph payload follows and how large it is.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireHdr {
    pub version_le: u16,
    pub kind_le: u16,
    pub reserved_le: u32,
    pub padded_le: u64,
}

impl WireHdr {
    pub fn ok(padded: usize) -> Self {
        Self::new(HDR_OK, padded)
    }
    pub fn abort() -> Self {
        Self::new(HDR_ABORT, 0)
    }
    fn new(kind: u16, padded: usize) -> Self {
        Self {
            version_le: WIRE_VERSION.to_le(),
            kind_le: kind.to_le(),
            reserved_le: 0,
            padded_le: (padded as u64).to_le(),
        }
    }
    pub fn kind(&self) -> u16 {
        u16::from_le(self.kind_le)
    }
    pub fn version(&self) -> u16 {
        u16::from_le(self.version_le)
    }
    pub fn padded(&self) -> usize {
        u64::from_le(self.padded_le) as usize
    }
}

// ===== Arg-min candidate ===================================================

/// A `(distance, vertex)` pair; `vertex_le == -1` means "no candidate".
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireCandidate {
    pub dist_le: i64,
    pub vertex_le: i64,
}

impl WireCandidate {
    pub const SIZE: usize = 16;

    pub fn of(c: Candidate) -> Self {
        match c.vertex {
            Some(v) => Self {
                dist_le: c.dist.to_le(),
                vertex_le: (v as i64).to_le(),
            },
            None => Self {
                dist_le: INFINITY.to_le(),
                vertex_le: NONE.to_le(),
            },
        }
    }

    pub fn get(&self) -> Candidate {
        let vertex = i64::from_le(self.vertex_le);
        if vertex < 0 {
            Candidate::none()
        } else {
            Candidate {
                dist: i64::from_le(self.dist_le),
                vertex: Some(vertex as usize),
            }
        }
    }
}

// ===== Compile-time sanity checks =========================================

assert_eq_size!(WireHdr, [u8; 16]);
assert_eq_size!(WireCandidate, [u8; WireCandidate::SIZE]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i64_codec_preserves_sentinels() {
        let v = vec![0, -1, INFINITY, 42];
        let bytes = encode_i64s(&v);
        assert_eq!(bytes.len(), 32);
        assert_eq!(decode_i64s(&bytes).unwrap(), v);
    }

    #[test]
    fn decode_rejects_ragged_input() {
        assert!(decode_i64s(&[0u8; 7]).is_err());
    }

    #[test]
    fn none_candidate_decodes_as_none() {
        let w = WireCandidate::of(Candidate::none());
        assert_eq!(w.get(), Candidate::none());
        let w = WireCandidate::of(Candidate::at(3, 7));
        assert_eq!(w.get(), Candidate::at(3, 7));
    }

    #[test]
    fn header_kind_survives_bytes() {
        let h = WireHdr::ok(12);
        let bytes = cast_slice(std::slice::from_ref(&h)).to_vec();
        let back: Vec<WireHdr> = pod_vec_from(&bytes);
        assert_eq!(back[0].kind(), HDR_OK);
        assert_eq!(back[0].padded(), 12);
        assert_eq!(back[0].version(), WIRE_VERSION);
    }
}
