//! `ExpandA`: uniform polynomials from `SHAKE-128(rho || nonce)`.
//!
//! Five rate blocks (840 bytes) cover 256 coefficients with overwhelming
//! probability; if rejections leave the polynomial short, further single
//! blocks are squeezed and sampling resumes at the first empty slot. Both
//! buffer sizes are whole multiples of the fixed-width group, so no backend
//! ever leaves bytes unexamined here.

use rej_math::FIXED_GROUP_BYTES;
use tracing::trace;

use crate::{
    Backend, N, SEEDBYTES,
    backend::backend,
    hash::{SHAKE128_RATE, XofReader, stream128},
    params::Matrix,
};

/// Rate blocks squeezed up front: `ceil(3N / 168)`.
pub const POLY_UNIFORM_NBLOCKS: usize = (3 * N).div_ceil(SHAKE128_RATE);

const _: () = {
    assert!(POLY_UNIFORM_NBLOCKS == 5);
    assert!(SHAKE128_RATE % FIXED_GROUP_BYTES == 0);
    assert!((POLY_UNIFORM_NBLOCKS * SHAKE128_RATE) % FIXED_GROUP_BYTES == 0);
};

/// Sample a uniform polynomial with the process-wide backend.
#[must_use]
pub fn poly_uniform(seed: &[u8; SEEDBYTES], nonce: u16) -> [i32; N] {
    poly_uniform_with(backend(), seed, nonce)
}

/// Sample a uniform polynomial with an explicit backend.
#[must_use]
pub fn poly_uniform_with(backend: Backend, seed: &[u8; SEEDBYTES], nonce: u16) -> [i32; N] {
    let mut a = [0i32; N];
    let mut xof = stream128(seed, nonce);

    let mut buf = [0u8; POLY_UNIFORM_NBLOCKS * SHAKE128_RATE];
    xof.read(&mut buf);
    let mut ctr = backend.sample(&mut a, &buf);

    let mut block = [0u8; SHAKE128_RATE];
    while ctr < N {
        trace!(nonce, ctr, "squeezing extra block");
        xof.read(&mut block);
        ctr += backend.sample(&mut a[ctr..], &block);
    }
    a
}

/// Expand `rho` into the `K x L` matrix `A`; entry `(i, j)` uses nonce
/// `(i << 8) + j`.
#[must_use]
pub fn expand_a<const K: usize, const L: usize>(rho: &[u8; SEEDBYTES]) -> Matrix<K, L> {
    let b = backend();
    core::array::from_fn(|i| core::array::from_fn(|j| poly_uniform_with(b, rho, nonce(i, j))))
}

#[inline]
const fn nonce(i: usize, j: usize) -> u16 {
    ((i << 8) + j) as u16
}
