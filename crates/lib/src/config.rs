//! Environment-driven runtime configuration.
//!
//! | Variable                  | Values                                    |
//! |---------------------------|-------------------------------------------|
//! | `MLDSA_REJ_BACKEND`       | `scalar`, `fixed-width`, `variable-length` |
//! | `MLDSA_REJ_VECTOR_LENGTH` | `256`, `512`, `1024`, `2048` (bits)        |
//! | `MLDSA_REJ_LOG`           | `error` .. `trace`                        |
//!
//! Unset variables fall back to the compile-time capability probes.

use rej_math::{VectorLength, set_vector_length};
use tracing::{Level, info};

use crate::{Backend, Error, backend::set_backend};

pub const BACKEND_VAR: &str = "MLDSA_REJ_BACKEND";
pub const VECTOR_LENGTH_VAR: &str = "MLDSA_REJ_VECTOR_LENGTH";
pub const LOG_VAR: &str = "MLDSA_REJ_LOG";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub backend: Backend,
    pub vector_length: VectorLength,
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::detect(),
            vector_length: VectorLength::preferred(),
            log_level: Level::INFO,
        }
    }
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();
        if let Some(value) = lookup(BACKEND_VAR) {
            config.backend = value.parse()?;
        }
        if let Some(value) = lookup(VECTOR_LENGTH_VAR) {
            config.vector_length = parse_vector_length(&value)?;
        }
        if let Some(value) = lookup(LOG_VAR) {
            config.log_level = value
                .trim()
                .parse()
                .map_err(|_| Error::InvalidLogLevel(value.clone()))?;
        }
        Ok(config)
    }

    /// Install the backend and vector length process-wide.
    pub fn apply(&self) {
        set_backend(self.backend);
        set_vector_length(self.vector_length);
        info!(backend = %self.backend, vector_length = %self.vector_length, "sampler configured");
    }
}

/// Parse a vector length given in bits, with an optional `-bit` suffix.
pub fn parse_vector_length(value: &str) -> Result<VectorLength, Error> {
    let digits = value.trim().trim_end_matches("-bit");
    digits
        .parse::<usize>()
        .ok()
        .filter(|bits| bits % 32 == 0)
        .and_then(|bits| VectorLength::from_lanes(bits / 32))
        .ok_or_else(|| Error::InvalidVectorLength(value.to_owned()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_probes() {
        assert_eq!(Config::from_lookup(lookup(&[])), Ok(Config::default()));
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            (BACKEND_VAR, "fixed-width"),
            (VECTOR_LENGTH_VAR, "1024"),
            (LOG_VAR, "debug"),
        ]))
        .unwrap();
        assert_eq!(config.backend, Backend::FixedWidth);
        assert_eq!(config.vector_length, VectorLength::L32);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn vector_length_accepts_display_form() {
        for vl in VectorLength::ALL {
            assert_eq!(parse_vector_length(&vl.to_string()), Ok(vl));
        }
        assert_eq!(parse_vector_length(" 2048 "), Ok(VectorLength::L64));
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            parse_vector_length("128"),
            Err(Error::InvalidVectorLength("128".to_owned()))
        );
        assert_eq!(
            parse_vector_length("300"),
            Err(Error::InvalidVectorLength("300".to_owned()))
        );
        assert_eq!(
            Config::from_lookup(lookup(&[(BACKEND_VAR, "gpu")])),
            Err(Error::UnknownBackend("gpu".to_owned()))
        );
        assert_eq!(
            Config::from_lookup(lookup(&[(LOG_VAR, "loud")])),
            Err(Error::InvalidLogLevel("loud".to_owned()))
        );
    }
}
