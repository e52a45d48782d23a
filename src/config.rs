//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls the dialect passed to the analyzer, the
//! capacity of the session-scoped caches, and the default page size used
//! by the convenience entry points.

use crate::error::SearchError;
use crate::types::Dialect;

/// Configuration for a search coordinator.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Dialect passed to the reverse-conjugation analyzer.
    pub dialect: Dialect,
    /// Maximum number of entries per session cache (root ids, verbs-of-root).
    pub cache_capacity: u64,
    /// Page size used when the caller does not supply an explicit limit.
    pub default_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Msa,
            cache_capacity: 1024,
            default_limit: 25,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `cache_capacity` must be greater than 0
    /// - `default_limit` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.cache_capacity == 0 {
            return Err(SearchError::Config(
                "cache_capacity must be greater than 0".into(),
            ));
        }
        if self.default_limit == 0 {
            return Err(SearchError::Config(
                "default_limit must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
