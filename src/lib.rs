//! # mujam-search
//!
//! Client-side search aggregation engine for an Arabic dictionary.
//!
//! Given one free-text query, the engine concurrently probes several
//! independent, heterogeneous sources — the lexical index by spelling,
//! the lexical index by translation, the verb index by translation, and
//! a morphological reverse-analyzer that maps a conjugated surface form
//! back to candidate root + grammatical-parameter tuples — then merges
//! the differently-shaped results into one ranked, deduplicated list and
//! streams that list to the caller as each source completes.
//!
//! ## Design
//!
//! - Sources race as independently-pending futures; one slow or failing
//!   source never blocks or corrupts the others
//! - Scores are normalized across incomparable candidate kinds into
//!   `[0, 1]`; reverse-conjugation candidates are discounted by how much
//!   of them the backing store could confirm
//! - Deduplication is identity-based across the multiple reference paths
//!   that can reach the same logical entry
//! - Fuzzy spelling lookups retry with the feminine marker or the
//!   definite article stripped before giving up
//! - Session-scoped memoization caches for root resolution
//!
//! The backing data store and the morphological analyzer are external
//! collaborators, consumed through the [`LexiconStore`] and
//! [`ConjugationAnalyzer`] traits. This crate is an in-process
//! orchestration layer only: no wire format, no network listeners, and
//! search queries are logged only at trace level.
//!
//! ## Example
//!
//! ```no_run
//! # use mujam_search::{ConjugationAnalyzer, LexiconStore, SearchConfig, SearchCoordinator};
//! # async fn example<S: LexiconStore, A: ConjugationAnalyzer>(
//! #     store: S,
//! #     analyzer: A,
//! # ) -> mujam_search::Result<()> {
//! let coordinator = SearchCoordinator::new(store, analyzer, SearchConfig::default())?;
//! let final_snapshot = coordinator
//!     .perform_search("درس", 0, 25, |snapshot| {
//!         // Each delivery replaces the previous one wholesale.
//!         println!("{} results so far", snapshot.len());
//!     })
//!     .await?;
//! println!("{} results total", final_snapshot.len());
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod matcher;
pub mod script;
pub mod store;
pub mod types;

pub use aggregator::ResultAggregator;
pub use cache::{RootIdCache, VerbsOfRootCache};
pub use config::SearchConfig;
pub use coordinator::SearchCoordinator;
pub use error::{Result, SearchError};
pub use matcher::ReverseConjugationMatcher;
pub use store::{ConjugationAnalyzer, LexiconStore};
pub use types::{
    Dialect, MatchTier, ReverseConjugationCandidate, RootData, RootId, RootProjection,
    SearchCandidate, Stem1Context, StemParams, Tashkil, VerbAggregate, VerbId, VerbRecord,
    WordAggregate, WordId,
};
