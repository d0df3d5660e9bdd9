//! Backend selection and the full-coverage sampling entry point.
//!
//! The kernels live in `rej-math`; this layer picks one at runtime. The
//! fixed-width kernel only examines whole 24-byte groups, so
//! [`Backend::sample`] hands any remainder to the scalar reference. Callers
//! who want the raw kernel contract use [`Backend::kernel`].

use core::{
    fmt::Display,
    str::FromStr,
    sync::atomic::{AtomicU8, Ordering},
};

use rej_math::{
    COMPACTION_TABLE, FIXED_GROUP_BYTES, FixedWidth, RejectionSampler, Scalar, VariableLength,
    rej_uniform_scalar,
};

use crate::Error;

/// Rejection-sampling implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Backend {
    Scalar         = 0,
    FixedWidth     = 1,
    VariableLength = 2,
}

impl Backend {
    pub const ALL: [Self; 3] = [Self::Scalar, Self::FixedWidth, Self::VariableLength];

    /// Compile-time capability probe.
    ///
    /// Predicated vector units (SVE, AVX-512) get the variable-length kernel,
    /// fixed 128/256-bit units (including the SSE2 baseline of every x86_64
    /// target) the fixed-width kernel, anything else scalar.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(any(target_feature = "sve", target_feature = "avx512f")) {
            Self::VariableLength
        } else if cfg!(any(
            target_feature = "neon",
            target_feature = "sse2",
            target_feature = "avx2",
            target_feature = "simd128"
        )) {
            Self::FixedWidth
        } else {
            Self::Scalar
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Scalar => Scalar::NAME,
            Self::FixedWidth => FixedWidth::NAME,
            Self::VariableLength => VariableLength::NAME,
        }
    }

    /// Whether [`Backend::kernel`] examines every whole candidate of its input.
    #[must_use]
    pub const fn full_coverage(self) -> bool {
        match self {
            Self::Scalar => Scalar::FULL_COVERAGE,
            Self::FixedWidth => FixedWidth::FULL_COVERAGE,
            Self::VariableLength => VariableLength::FULL_COVERAGE,
        }
    }

    /// Run the raw kernel, with its own tail behaviour.
    #[inline]
    pub fn kernel(self, r: &mut [i32], buf: &[u8]) -> usize {
        match self {
            Self::Scalar => Scalar::sample(r, buf, &COMPACTION_TABLE),
            Self::FixedWidth => FixedWidth::sample(r, buf, &COMPACTION_TABLE),
            Self::VariableLength => VariableLength::sample(r, buf, &COMPACTION_TABLE),
        }
    }

    /// Sample into `r` from all of `buf`; agrees with the scalar reference
    /// for every backend and input length.
    #[inline]
    pub fn sample(self, r: &mut [i32], buf: &[u8]) -> usize {
        let ctr = self.kernel(r, buf);
        if self.full_coverage() || ctr == r.len() {
            return ctr;
        }
        let consumed = buf.len() - buf.len() % FIXED_GROUP_BYTES;
        ctr + rej_uniform_scalar(&mut r[ctr..], &buf[consumed..])
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" | "ref" => Ok(Self::Scalar),
            "fixed-width" | "fixed" | "neon" => Ok(Self::FixedWidth),
            "variable-length" | "variable" | "vla" | "sve" => Ok(Self::VariableLength),
            _ => Err(Error::UnknownBackend(s.to_owned())),
        }
    }
}

impl From<u8> for Backend {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Scalar,
            1 => Self::FixedWidth,
            2 => Self::VariableLength,
            _ => unreachable!(),
        }
    }
}

static BACKEND: AtomicU8 = AtomicU8::new(Backend::detect() as u8);

/// Set the process-wide backend used by [`rej_uniform`].
pub fn set_backend(b: Backend) {
    BACKEND.store(b as u8, Ordering::Relaxed);
}

#[must_use]
pub fn backend() -> Backend {
    BACKEND.load(Ordering::Relaxed).into()
}

/// Sample into `r` from `buf` with the process-wide backend.
///
/// Returns the number of coefficients written, at most `r.len()`.
#[inline]
pub fn rej_uniform(r: &mut [i32], buf: &[u8]) -> usize {
    backend().sample(r, buf)
}
