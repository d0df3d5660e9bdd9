//! `mldsa-rej` -- ML-DSA uniform rejection sampling.
//!
//! Wraps the `rej-math` kernels with a runtime backend selection layer, the
//! SHAKE-128 driven `ExpandA` polynomial sampler and an equivalence harness
//! that checks every vector kernel against the scalar reference.

#![deny(unsafe_code)]

pub mod backend;
pub mod config;
pub mod expand;
pub mod harness;
pub mod hash;
pub mod params;

pub use backend::{Backend, backend, rej_uniform, set_backend};
pub use config::Config;
pub use expand::{expand_a, poly_uniform, poly_uniform_with};
pub use params::{MlDsa44, MlDsa65, MlDsa87, MlDsaParams};
pub use rej_math as math;
pub use rej_math::{N, Q, SEEDBYTES, VectorLength};

/// Errors returned when parsing backend configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend name is not one of `scalar`, `fixed-width`, `variable-length`.
    UnknownBackend(String),
    /// Vector length is not 256, 512, 1024 or 2048 bits.
    InvalidVectorLength(String),
    /// Log level is not a `tracing` level name.
    InvalidLogLevel(String),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownBackend(name) => write!(f, "unknown backend: {name:?}"),
            Self::InvalidVectorLength(value) => {
                write!(f, "invalid vector length: {value:?} (expected 256, 512, 1024 or 2048)")
            }
            Self::InvalidLogLevel(value) => write!(f, "invalid log level: {value:?}"),
        }
    }
}

impl core::error::Error for Error {}
