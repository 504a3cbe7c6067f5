// SPDX-License-Identifier: MIT
//
// Formatter configuration.
//
// There is exactly one knob: how many (stream, category) entries the state
// cache may hold. It is meant to be decided once at startup, either in code
// or through the environment.

use std::env;
use std::num::NonZeroUsize;

use crate::error::ConfigError;

/// Environment variable read by [`FormatConfig::from_env`].
pub const CAPACITY_ENV_VAR: &str = "N_FMT_CACHE_CAPACITY";

/// Default cache capacity.
///
/// Nine categories are cacheable per stream, so one busy stream fits whole
/// with room for a second one.
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(16) {
    Some(n) => n,
    None => unreachable!(),
};

/// Settings for a formatting [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Maximum number of live cache entries across all streams.
    pub cache_capacity: NonZeroUsize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl FormatConfig {
    /// A config with an explicit capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(capacity)
            .map(|cache_capacity| Self { cache_capacity })
            .ok_or(ConfigError::ZeroCapacity)
    }

    /// Read [`CAPACITY_ENV_VAR`]; unset means the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is set but is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is present but is not a positive
    /// integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let Some(raw) = lookup(CAPACITY_ENV_VAR) else {
            return Ok(Self::default());
        };
        let capacity = raw
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: CAPACITY_ENV_VAR,
                value: raw.clone(),
            })?;
        Self::with_capacity(capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(value: Option<&str>) -> impl Fn(&str) -> Option<String> {
        let value = value.map(str::to_owned);
        move |key| {
            assert_eq!(key, CAPACITY_ENV_VAR);
            value.clone()
        }
    }

    #[test]
    fn default_capacity() {
        assert_eq!(FormatConfig::default().cache_capacity.get(), 16);
    }

    #[test]
    fn unset_variable_gives_default() {
        assert_eq!(
            FormatConfig::from_lookup(vars(None)),
            Ok(FormatConfig::default())
        );
    }

    #[test]
    fn variable_sets_capacity() {
        let config = FormatConfig::from_lookup(vars(Some(" 5 "))).unwrap();
        assert_eq!(config.cache_capacity.get(), 5);
    }

    #[test]
    fn zero_is_rejected() {
        assert_eq!(
            FormatConfig::from_lookup(vars(Some("0"))),
            Err(ConfigError::ZeroCapacity)
        );
        assert_eq!(FormatConfig::with_capacity(0), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(
            FormatConfig::from_lookup(vars(Some("lots"))),
            Err(ConfigError::InvalidNumber {
                var: CAPACITY_ENV_VAR,
                value: "lots".into(),
            })
        );
    }
}
