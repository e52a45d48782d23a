//! Error types for the mujam-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Query text never appears in error messages
//! above trace level.

/// Errors that can occur during a dictionary search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// More than one root record matches the same canonical form.
    ///
    /// The backing data guarantees canonical root forms are unique, so
    /// this is an invariant violation rather than a recoverable state.
    /// It is fatal to the single lookup that hit it, not to the whole
    /// search.
    #[error("ambiguous root: more than one record matches \"{root}\"")]
    AmbiguousRoot {
        /// The canonical root form that matched multiple records.
        root: String,
    },

    /// A backing-store query failed (network or storage layer).
    #[error("store error: {0}")]
    Store(String),

    /// Every launched search source failed.
    #[error("all search sources failed: {0}")]
    AllSourcesFailed(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for mujam-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
