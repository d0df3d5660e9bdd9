//! `rej-math` -- uniform rejection sampling kernels for ML-DSA.
//!
//! `no_std`, zero-allocation sampling of coefficients in `[0, q)` from a
//! pseudorandom byte stream. Every three input bytes form one 23-bit candidate
//! which is kept iff it is below `q`. Sub-modules cover the stream-compaction
//! lookup table, the scalar reference sampler and two portable-SIMD kernels:
//! a fixed 256-bit baseline and a predicated variable-length kernel.

#![no_std]
#![feature(portable_simd)]
#![deny(unsafe_code)]
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]

pub mod sample;
pub mod simd;
pub mod table;

pub use sample::{FixedWidth, RejectionSampler, Scalar, VariableLength, rej_uniform_scalar};
pub use simd::{
    FIXED_GROUP_BYTES, FIXED_MAX_DIVERGENCE, VectorLength, get_vector_length, rej_uniform_fixed,
    rej_uniform_vla, rej_uniform_vla_lanes, set_vector_length,
};
pub use table::{COMPACTION_TABLE, CompactionEntry, CompactionTable, GROUP_LANES};

/// Polynomial ring degree.
pub const N: usize = 256;

/// Field modulus `q = 2^23 - 2^13 + 1`.
pub const Q: i32 = 8_380_417;

/// Size in bytes of the public matrix seed `rho`.
pub const SEEDBYTES: usize = 32;

/// Input bytes consumed per candidate.
pub const CANDIDATE_BYTES: usize = 3;

/// Mask clearing the top bit of the third candidate byte.
pub const CANDIDATE_MASK: u32 = 0x7F_FFFF;

const _: () = {
    assert!(CANDIDATE_MASK < (1 << 23));
    assert!((Q as u32) <= CANDIDATE_MASK);
    assert!(N % GROUP_LANES == 0);
};
