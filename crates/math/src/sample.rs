//! Sealed sampler backends and the scalar reference.

use crate::{CANDIDATE_BYTES, CANDIDATE_MASK, Q, simd, table::CompactionTable};

mod sealed {
    pub trait Sealed {}
}

/// A rejection-sampling backend.
///
/// `sample` fills `r` with accepted candidates from `buf`, in input order,
/// never writing past `r.len()`, and returns how many slots were filled.
pub trait RejectionSampler: sealed::Sealed {
    const NAME: &'static str;
    /// Whether every whole candidate in `buf` is examined before the input is
    /// declared exhausted.
    const FULL_COVERAGE: bool;

    fn sample(r: &mut [i32], buf: &[u8], table: &CompactionTable) -> usize;
}

/// Sequential reference sampler.
pub struct Scalar;
/// 256-bit kernel; drops a tail shorter than [`crate::FIXED_GROUP_BYTES`].
pub struct FixedWidth;
/// Predicated kernel at the process-wide [`crate::VectorLength`].
pub struct VariableLength;

impl sealed::Sealed for Scalar {}
impl RejectionSampler for Scalar {
    const FULL_COVERAGE: bool = true;
    const NAME: &'static str = "scalar";

    #[inline]
    fn sample(r: &mut [i32], buf: &[u8], _table: &CompactionTable) -> usize {
        rej_uniform_scalar(r, buf)
    }
}

impl sealed::Sealed for FixedWidth {}
impl RejectionSampler for FixedWidth {
    const FULL_COVERAGE: bool = false;
    const NAME: &'static str = "fixed-width";

    #[inline]
    fn sample(r: &mut [i32], buf: &[u8], table: &CompactionTable) -> usize {
        simd::rej_uniform_fixed(r, buf, table)
    }
}

impl sealed::Sealed for VariableLength {}
impl RejectionSampler for VariableLength {
    const FULL_COVERAGE: bool = true;
    const NAME: &'static str = "variable-length";

    #[inline]
    fn sample(r: &mut [i32], buf: &[u8], table: &CompactionTable) -> usize {
        simd::rej_uniform_vla(r, buf, table)
    }
}

/// Scalar uniform rejection sampling.
///
/// Reads little-endian 3-byte candidates, clears bit 23 and keeps those below
/// `q`. Stops once `r` is full or fewer than three bytes remain; a 1-2 byte
/// remainder is ignored.
pub fn rej_uniform_scalar(r: &mut [i32], buf: &[u8]) -> usize {
    let mut ctr = 0;
    for c in buf.as_chunks::<CANDIDATE_BYTES>().0 {
        if ctr == r.len() {
            break;
        }
        let t = u32::from_le_bytes([c[0], c[1], c[2], 0]) & CANDIDATE_MASK;
        if t < Q as u32 {
            r[ctr] = t as i32;
            ctr += 1;
        }
    }
    ctr
}
