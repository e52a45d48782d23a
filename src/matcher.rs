//! Reverse-conjugation candidate classification.
//!
//! The analyzer proposes root + stem tuples for a conjugated surface
//! form; this module checks each proposal against the backing store and
//! sorts proposals into confidence tiers. A proposal whose root resolves
//! *and* whose stem matches a stored verb keeps its full analyzer score;
//! weaker matches are discounted (see [`MatchTier::discount`]).

use crate::cache::{RootIdCache, VerbsOfRootCache};
use crate::error::SearchError;
use crate::script;
use crate::store::LexiconStore;
use crate::types::{
    MatchTier, ReverseConjugationCandidate, RootId, SearchCandidate, StemParams, VerbId,
    VerbRecord,
};

/// Classifies analyzer candidates into confidence tiers by resolving
/// them through the session caches.
pub struct ReverseConjugationMatcher<'a, S> {
    store: &'a S,
    roots: &'a RootIdCache,
    verbs: &'a VerbsOfRootCache,
}

impl<'a, S: LexiconStore> ReverseConjugationMatcher<'a, S> {
    /// Create a matcher borrowing the coordinator's store and caches.
    pub fn new(store: &'a S, roots: &'a RootIdCache, verbs: &'a VerbsOfRootCache) -> Self {
        Self { store, roots, verbs }
    }

    /// Classify `candidates` (pre-sorted by analyzer confidence) into
    /// tiered [`SearchCandidate::Conjugated`] entries.
    ///
    /// Returns the VerbFound bucket, then RootFound, then NotFound, each
    /// preserving the analyzer's relative ordering.
    ///
    /// If `query` ends in the feminine marker, returns no candidates:
    /// reverse conjugation from a feminine-marked surface form produces
    /// false-positive verb matches, so it is not attempted.
    ///
    /// # Errors
    ///
    /// Propagates store failures. An [`SearchError::AmbiguousRoot`] is
    /// fatal only to the candidate that hit it: the candidate is dropped
    /// with a warning and classification continues.
    pub async fn classify(
        &self,
        query: &str,
        candidates: Vec<ReverseConjugationCandidate>,
    ) -> Result<Vec<SearchCandidate>, SearchError> {
        if script::strip_feminine_marker(query).is_some() {
            tracing::trace!("feminine-marked query, skipping reverse conjugation");
            return Ok(Vec::new());
        }

        let mut verb_found: Vec<SearchCandidate> = Vec::new();
        let mut root_found: Vec<SearchCandidate> = Vec::new();
        let mut not_found: Vec<SearchCandidate> = Vec::new();

        for candidate in candidates {
            let root_id = match self.roots.resolve(self.store, &candidate.root.canonical).await {
                Ok(id) => id,
                Err(SearchError::AmbiguousRoot { root }) => {
                    tracing::warn!(%root, "ambiguous root, dropping conjugation candidate");
                    continue;
                }
                Err(err) => return Err(err),
            };

            let Some(root_id) = root_id else {
                not_found.push(tiered(candidate, MatchTier::NotFound, None, None));
                continue;
            };

            let verbs = self.verbs.verbs(self.store, root_id).await?;
            match verbs.iter().find(|verb| verb_matches(verb, &candidate.params)) {
                Some(verb) => {
                    let id = verb.id;
                    verb_found.push(tiered(candidate, MatchTier::VerbFound, Some(root_id), Some(id)));
                }
                None => {
                    root_found.push(tiered(candidate, MatchTier::RootFound, Some(root_id), None));
                }
            }
        }

        verb_found.extend(root_found);
        verb_found.extend(not_found);
        Ok(verb_found)
    }
}

/// Whether a stored verb satisfies the analyzer's proposed stem parameters.
///
/// Stem numbers must be equal. For stem 1 the proposed vocalization
/// context must additionally appear in the verb's persisted compatibility
/// set (any-of semantics); a stem-1 proposal without a context never
/// matches.
fn verb_matches(verb: &VerbRecord, params: &StemParams) -> bool {
    if verb.stem != params.stem {
        return false;
    }
    if params.stem != 1 {
        return true;
    }
    match params.stem1_context {
        Some(context) => verb.stem1_contexts.contains(&context),
        None => false,
    }
}

fn tiered(
    candidate: ReverseConjugationCandidate,
    tier: MatchTier,
    resolved_root_id: Option<RootId>,
    resolved_verb_id: Option<VerbId>,
) -> SearchCandidate {
    let score = (candidate.raw_score * tier.discount()).clamp(0.0, 1.0);
    SearchCandidate::Conjugated {
        root: candidate.root,
        params: candidate.params,
        raw_score: candidate.raw_score,
        tier,
        resolved_root_id,
        resolved_verb_id,
        by_translation: false,
        score,
    }
}
