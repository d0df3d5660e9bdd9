mod fixed;
mod variable;

use core::{
    fmt::Display,
    simd::{ToBytes, num::SimdUint, u32x8},
    sync::atomic::{AtomicU8, Ordering},
};

pub use fixed::{FIXED_GROUP_BYTES, FIXED_MAX_DIVERGENCE, rej_uniform_fixed};
pub use variable::{rej_uniform_vla, rej_uniform_vla_lanes};

use crate::table::CompactionTable;

/// Vector length of the variable-length kernel, in 32-bit lanes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VectorLength {
    L8  = 8,
    L16 = 16,
    L32 = 32,
    L64 = 64,
}

impl VectorLength {
    pub const ALL: [Self; 4] = [Self::L8, Self::L16, Self::L32, Self::L64];

    #[inline]
    #[must_use]
    pub const fn lanes(self) -> usize {
        self as usize
    }

    #[inline]
    #[must_use]
    pub const fn bits(self) -> usize {
        32 * self.lanes()
    }

    /// Widest length the compilation target is known to run natively.
    #[must_use]
    pub const fn preferred() -> Self {
        if cfg!(target_feature = "avx512f") {
            Self::L16
        } else {
            Self::L8
        }
    }

    #[must_use]
    pub const fn from_lanes(lanes: usize) -> Option<Self> {
        match lanes {
            8 => Some(Self::L8),
            16 => Some(Self::L16),
            32 => Some(Self::L32),
            64 => Some(Self::L64),
            _ => None,
        }
    }
}

impl Display for VectorLength {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

impl From<u8> for VectorLength {
    fn from(value: u8) -> Self {
        match Self::from_lanes(value as usize) {
            Some(vl) => vl,
            None => unreachable!(),
        }
    }
}

static VECTOR_LENGTH: AtomicU8 = AtomicU8::new(VectorLength::preferred() as u8);

/// Set the process-wide vector length used by [`rej_uniform_vla`].
pub fn set_vector_length(vl: VectorLength) {
    VECTOR_LENGTH.store(vl as u8, Ordering::Relaxed);
}

#[must_use]
pub fn get_vector_length() -> VectorLength {
    VECTOR_LENGTH.load(Ordering::Relaxed).into()
}

/// Dispatch a generic `fn<const L: usize>(...)` over the runtime vector length.
macro_rules! dispatch_lanes {
    ($fn:ident ( $($arg:expr),* $(,)? )) => {
        match $crate::simd::get_vector_length() {
            $crate::simd::VectorLength::L8  => $fn::<8>($($arg),*),
            $crate::simd::VectorLength::L16 => $fn::<16>($($arg),*),
            $crate::simd::VectorLength::L32 => $fn::<32>($($arg),*),
            $crate::simd::VectorLength::L64 => $fn::<64>($($arg),*),
        }
    };
}
pub(crate) use dispatch_lanes;

/// Move the accepted lanes of one group to the front and store as many as
/// `r` can hold. Returns the number of coefficients written.
#[inline]
fn compact_store(r: &mut [i32], values: u32x8, accept: u8, table: &CompactionTable) -> usize {
    let entry = table.entry(accept);
    if entry.is_empty() {
        return 0;
    }
    let packed = u32x8::from_le_bytes(values.to_le_bytes().swizzle_dyn(entry.shuffle()));
    let n = entry.len().min(r.len());
    r[..n].copy_from_slice(&packed.cast::<i32>().as_array()[..n]);
    n
}

#[cfg(test)]
mod tests {
    use core::simd::u32x8;

    use super::*;
    use crate::COMPACTION_TABLE;

    #[test]
    fn compact_store_packs_in_order() {
        let values = u32x8::from_array([10, 11, 12, 13, 14, 15, 16, 17]);
        let mut r = [0i32; 8];
        let n = compact_store(&mut r, values, 0b1001_0110, &COMPACTION_TABLE);
        assert_eq!(n, 4);
        assert_eq!(r[..4], [11, 12, 14, 17]);
    }

    #[test]
    fn compact_store_truncates_to_capacity() {
        let values = u32x8::from_array([1, 2, 3, 4, 5, 6, 7, 8]);
        let mut r = [-1i32; 4];
        let n = compact_store(&mut r[..3], values, u8::MAX, &COMPACTION_TABLE);
        assert_eq!(n, 3);
        assert_eq!(r, [1, 2, 3, -1]);
        assert_eq!(compact_store(&mut [], values, u8::MAX, &COMPACTION_TABLE), 0);
    }

    #[test]
    fn vector_length_roundtrips_through_lanes() {
        for vl in VectorLength::ALL {
            assert_eq!(VectorLength::from_lanes(vl.lanes()), Some(vl));
            assert_eq!(VectorLength::from(vl as u8), vl);
            assert_eq!(vl.lanes() % crate::GROUP_LANES, 0);
        }
        assert_eq!(VectorLength::from_lanes(4), None);
    }
}
