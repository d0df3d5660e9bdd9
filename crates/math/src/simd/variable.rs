//! Variable-length kernel with predicated tail handling.
//!
//! Each iteration covers up to `L` candidates. The lane predicate is built
//! from the number of whole candidates left in the input (`whilelt`-style),
//! and the three byte planes are fetched with predicated gathers, so disabled
//! lanes never touch memory and a trailing 1-2 byte remainder is never read.
//! With the predicate folded into the acceptance mask the final, partial
//! iteration behaves exactly like the scalar reference.

use core::simd::{Mask, Simd, prelude::*, u32x8};

use super::{compact_store, dispatch_lanes};
use crate::{CANDIDATE_BYTES, GROUP_LANES, Q, table::CompactionTable};

/// Variable-length rejection sampling at the process-wide vector length.
pub fn rej_uniform_vla(r: &mut [i32], buf: &[u8], table: &CompactionTable) -> usize {
    dispatch_lanes!(rej_uniform_vla_lanes(r, buf, table))
}

/// Variable-length rejection sampling with an `L`-lane vector.
///
/// `L` must be a multiple of [`GROUP_LANES`] and at most 64. Agrees with
/// [`crate::rej_uniform_scalar`] for every input length.
pub fn rej_uniform_vla_lanes<const L: usize>(
    r: &mut [i32], buf: &[u8], table: &CompactionTable,
) -> usize {
    const { assert!(L % GROUP_LANES == 0 && L <= 64) };

    let lane = Simd::<usize, L>::from_array(core::array::from_fn(|i| i));
    let offsets = lane * Simd::splat(CANDIDATE_BYTES);
    let q = Simd::<u32, L>::splat(Q as u32);

    let mut ctr = 0;
    let mut pos = 0;
    while ctr < r.len() {
        let remaining = (buf.len() - pos) / CANDIDATE_BYTES;
        if remaining == 0 {
            break;
        }
        let active: Mask<isize, L> = lane.simd_lt(Simd::splat(remaining));
        let window = &buf[pos..];
        let plane = |k: usize| {
            Simd::<u8, L>::gather_select(window, active, offsets + Simd::splat(k), Simd::splat(0))
                .cast::<u32>()
        };
        let values = plane(0)
            | (plane(1) << Simd::splat(8))
            | ((plane(2) & Simd::splat(0x7F)) << Simd::splat(16));

        let accept = (values.simd_lt(q) & active.cast::<i32>()).to_bitmask();
        for (seg, group) in values.as_array().as_chunks::<GROUP_LANES>().0.iter().enumerate() {
            if ctr == r.len() {
                break;
            }
            let mask = (accept >> (seg * GROUP_LANES)) as u8;
            ctr += compact_store(&mut r[ctr..], u32x8::from_array(*group), mask, table);
        }
        pos += CANDIDATE_BYTES * remaining.min(L);
    }
    ctr
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{COMPACTION_TABLE, N, VectorLength, rej_uniform_scalar, set_vector_length};

    fn check_against_scalar<const L: usize>(buf: &[u8]) {
        for len in 0..=buf.len() {
            let mut expected = [0i32; N];
            let mut actual = [0i32; N];
            let n = rej_uniform_scalar(&mut expected, &buf[..len]);
            assert_eq!(
                rej_uniform_vla_lanes::<L>(&mut actual, &buf[..len], &COMPACTION_TABLE),
                n,
                "L={L} len={len}"
            );
            assert_eq!(expected[..n], actual[..n], "L={L} len={len}");
        }
    }

    fn mixed_input() -> [u8; 420] {
        core::array::from_fn(|i| match i % 5 {
            0 | 3 => 0xFF,
            1 => (i as u8).wrapping_mul(31),
            _ => 0x7F ^ (i as u8),
        })
    }

    #[test]
    fn every_length_matches_scalar_l8() {
        check_against_scalar::<8>(&mixed_input());
    }

    #[test]
    fn every_length_matches_scalar_l16() {
        check_against_scalar::<16>(&mixed_input());
    }

    #[test]
    fn every_length_matches_scalar_l32() {
        check_against_scalar::<32>(&mixed_input());
    }

    #[test]
    fn every_length_matches_scalar_l64() {
        check_against_scalar::<64>(&mixed_input());
    }

    #[test]
    fn tail_of_300_bytes_is_covered() {
        let buf: [u8; 300] = core::array::from_fn(|i| (i % 128) as u8);
        let mut r = [0i32; N];
        assert_eq!(rej_uniform_vla_lanes::<8>(&mut r, &buf, &COMPACTION_TABLE), 100);
        // bytes 297..300 hold 41, 42, 43
        assert_eq!(r[99], i32::from_le_bytes([41, 42, 43, 0]));
    }

    #[test]
    fn fills_exactly_to_capacity() {
        let buf = [0x11u8; 3 * 300];
        let mut r = [-1i32; N + 8];
        let n = rej_uniform_vla_lanes::<64>(&mut r[..N], &buf, &COMPACTION_TABLE);
        assert_eq!(n, N);
        assert!(r[..N].iter().all(|&c| c == 0x11_1111));
        assert!(r[N..].iter().all(|&c| c == -1));
    }

    #[test]
    fn dispatch_uses_selected_length() {
        let buf = mixed_input();
        let mut expected = [0i32; N];
        let n = rej_uniform_scalar(&mut expected, &buf);
        for vl in VectorLength::ALL {
            set_vector_length(vl);
            let mut actual = [0i32; N];
            assert_eq!(rej_uniform_vla(&mut actual, &buf, &COMPACTION_TABLE), n, "{vl:?}");
            assert_eq!(expected, actual, "{vl:?}");
        }
        set_vector_length(VectorLength::preferred());
    }
}
