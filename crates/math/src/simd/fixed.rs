//! Fixed-width kernel: eight candidates (24 bytes) per iteration.
//!
//! Mirrors a 128-bit-pair / 256-bit baseline: one group is loaded, expanded
//! into eight 32-bit lanes with a byte shuffle, compared against `q` and
//! compacted through the shared table. Input past the last whole group is
//! not examined, so for `buf.len() % 24 != 0` this kernel may return fewer
//! coefficients than the scalar reference. The gap is confined to candidates
//! of the final partial group, at most [`FIXED_MAX_DIVERGENCE`].

use core::simd::{ToBytes, prelude::*, u8x32, u32x8};

use super::compact_store;
use crate::{CANDIDATE_BYTES, CANDIDATE_MASK, GROUP_LANES, Q, table::CompactionTable};

/// Input bytes consumed per iteration.
pub const FIXED_GROUP_BYTES: usize = CANDIDATE_BYTES * GROUP_LANES;

/// Upper bound on coefficients lost to an unprocessed tail.
pub const FIXED_MAX_DIVERGENCE: usize = GROUP_LANES;

const PAD: u8 = 0xFF;

/// Spread 24 packed bytes into eight little-endian `u32` lanes, zeroing the
/// top byte of each lane.
const DECODE: u8x32 = u8x32::from_array([
    0, 1, 2, PAD, 3, 4, 5, PAD, 6, 7, 8, PAD, 9, 10, 11, PAD, 12, 13, 14, PAD, 15, 16, 17, PAD, 18,
    19, 20, PAD, 21, 22, 23, PAD,
]);

#[inline]
fn decode_group(chunk: &[u8; FIXED_GROUP_BYTES]) -> u32x8 {
    let mut bytes = [0u8; 32];
    bytes[..FIXED_GROUP_BYTES].copy_from_slice(chunk);
    u32x8::from_le_bytes(u8x32::from_array(bytes).swizzle_dyn(DECODE))
        & u32x8::splat(CANDIDATE_MASK)
}

/// Fixed-width rejection sampling over whole 24-byte groups of `buf`.
///
/// Returns the number of coefficients written to `r`, at most `r.len()`.
pub fn rej_uniform_fixed(r: &mut [i32], buf: &[u8], table: &CompactionTable) -> usize {
    let q = u32x8::splat(Q as u32);
    let mut ctr = 0;
    for chunk in buf.as_chunks::<FIXED_GROUP_BYTES>().0 {
        if ctr == r.len() {
            break;
        }
        let values = decode_group(chunk);
        let accept = values.simd_lt(q).to_bitmask() as u8;
        ctr += compact_store(&mut r[ctr..], values, accept, table);
    }
    ctr
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{COMPACTION_TABLE, N, rej_uniform_scalar};

    fn pattern(len: usize, f: impl Fn(usize) -> u8) -> [u8; 1024] {
        let mut buf = [0u8; 1024];
        for (i, b) in buf.iter_mut().enumerate().take(len) {
            *b = f(i);
        }
        buf
    }

    #[test]
    fn decode_matches_scalar_layout() {
        let chunk: [u8; FIXED_GROUP_BYTES] = core::array::from_fn(|i| (i as u8) | 0x80);
        let lanes = decode_group(&chunk).to_array();
        for (i, &lane) in lanes.iter().enumerate() {
            let c = &chunk[3 * i..3 * i + 3];
            let expected = u32::from_le_bytes([c[0], c[1], c[2], 0]) & CANDIDATE_MASK;
            assert_eq!(lane, expected, "lane {i}");
        }
    }

    #[test]
    fn aligned_input_matches_scalar() {
        for len in (0..=1008).step_by(FIXED_GROUP_BYTES) {
            let buf = pattern(len, |i| (i as u8).wrapping_mul(97) ^ 0xA5);
            let mut expected = [0i32; N];
            let mut actual = [0i32; N];
            let n = rej_uniform_scalar(&mut expected, &buf[..len]);
            assert_eq!(rej_uniform_fixed(&mut actual, &buf[..len], &COMPACTION_TABLE), n);
            assert_eq!(expected[..n], actual[..n], "len {len}");
        }
    }

    #[test]
    fn unaligned_tail_is_dropped() {
        let buf = pattern(300, |i| (i % 128) as u8);
        let mut expected = [0i32; N];
        let mut actual = [0i32; N];
        let full = rej_uniform_scalar(&mut expected, &buf[..300]);
        let n = rej_uniform_fixed(&mut actual, &buf[..300], &COMPACTION_TABLE);
        assert_eq!(full, 100);
        assert_eq!(n, 96);
        assert!(full - n <= FIXED_MAX_DIVERGENCE);
        assert_eq!(expected[..n], actual[..n]);
    }

    #[test]
    fn shorter_than_one_group() {
        let buf = [0u8; FIXED_GROUP_BYTES - 1];
        let mut r = [0i32; N];
        assert_eq!(rej_uniform_fixed(&mut r, &buf, &COMPACTION_TABLE), 0);
    }

    #[test]
    fn stops_mid_group_at_capacity() {
        let buf = pattern(48, |i| i as u8);
        let mut r = [-1i32; 16];
        let n = rej_uniform_fixed(&mut r[..11], &buf[..48], &COMPACTION_TABLE);
        assert_eq!(n, 11);
        assert!(r[11..].iter().all(|&c| c == -1));

        let mut expected = [0i32; 11];
        rej_uniform_scalar(&mut expected, &buf[..48]);
        assert_eq!(r[..11], expected);
    }
}
