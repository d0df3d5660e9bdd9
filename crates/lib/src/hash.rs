//! SHAKE-128 stream used to expand the public matrix seed.

pub use sha3::digest::XofReader;
use sha3::{
    Shake128,
    digest::{ExtendableOutput, Update},
};

use crate::SEEDBYTES;

/// SHAKE-128 rate in bytes.
pub const SHAKE128_RATE: usize = 168;

/// `SHAKE-128(seed || nonce)` with the 16-bit nonce little-endian.
#[must_use]
pub fn stream128(seed: &[u8; SEEDBYTES], nonce: u16) -> impl XofReader {
    Shake128::default()
        .chain(seed)
        .chain(nonce.to_le_bytes())
        .finalize_xof()
}
