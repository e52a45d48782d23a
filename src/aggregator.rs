//! Result aggregation: append-only working set, score normalization,
//! stable ranking, and identity-based deduplication.
//!
//! Each in-flight search owns exactly one [`ResultAggregator`]. Sources
//! push raw candidates with [`add`]; after every source completion the
//! coordinator calls [`recompute`], which normalizes scores, sorts, and
//! drops duplicates, then reads [`snapshot`] for delivery.
//!
//! [`add`]: ResultAggregator::add
//! [`recompute`]: ResultAggregator::recompute
//! [`snapshot`]: ResultAggregator::snapshot

use std::collections::HashSet;

use crate::script;
use crate::types::{SearchCandidate, VerbId, WordId};

/// Mutable working set of heterogeneous search candidates.
#[derive(Debug)]
pub struct ResultAggregator {
    /// Letter length of the query, for spelling-score normalization.
    filter_len: usize,
    items: Vec<SearchCandidate>,
}

impl ResultAggregator {
    /// Create an empty working set for a search with the given filter text.
    pub fn new(filter: &str) -> Self {
        Self {
            filter_len: script::surface_len(filter),
            items: Vec::new(),
        }
    }

    /// Append a candidate. No scoring happens here; scores are assigned
    /// wholesale by [`recompute`](ResultAggregator::recompute).
    pub fn add(&mut self, candidate: SearchCandidate) {
        self.items.push(candidate);
    }

    /// Number of retained candidates.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the working set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Recompute scores, sort, and deduplicate the working set.
    ///
    /// Idempotent: running it twice in succession on an unchanged set
    /// yields an identical snapshot.
    ///
    /// 1. **Normalize.** Translation matches score 0 unconditionally, so
    ///    they always sort after any positive-scoring spelling or
    ///    conjugation match. Spelling matches score by how close the
    ///    matched surface length is to the query length. Conjugation
    ///    matches keep their tier-discounted analyzer score. All scores
    ///    land in `[0, 1]`.
    /// 2. **Sort.** Stable, descending by score; ties keep insertion order.
    /// 3. **Deduplicate.** One left-to-right pass; the first (highest
    ///    scored) entry per identity key wins.
    pub fn recompute(&mut self) {
        self.normalize_scores();
        self.items.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.deduplicate();
    }

    /// The current deduplicated, sorted candidate list.
    ///
    /// Only meaningful after [`recompute`](ResultAggregator::recompute);
    /// callers wanting an immutable copy should clone before the next
    /// mutation.
    pub fn snapshot(&self) -> &[SearchCandidate] {
        &self.items
    }

    /// Assign every candidate its normalized score.
    ///
    /// Spelling-match normalization: with `L` the matched surface length
    /// in letters and `d_max = max(1, max_L - filter_len)` over all
    /// non-translation candidates, `score = 1 - (L - filter_len) / d_max`.
    /// Candidate kinds without an inherent surface length contribute
    /// `L = 0`.
    fn normalize_scores(&mut self) {
        let max_len = self
            .items
            .iter()
            .filter(|c| !c.by_translation())
            .map(surface_match_len)
            .max()
            .unwrap_or(0);
        let d_max = max_len.saturating_sub(self.filter_len).max(1) as f64;

        for candidate in &mut self.items {
            if candidate.by_translation() {
                candidate.set_score(0.0);
                continue;
            }
            let score = match candidate {
                SearchCandidate::Conjugated { raw_score, tier, .. } => *raw_score * tier.discount(),
                SearchCandidate::Word { .. } | SearchCandidate::Verb { .. } => {
                    let len = surface_match_len(candidate) as f64;
                    1.0 - (len - self.filter_len as f64) / d_max
                }
            };
            candidate.set_score(score.clamp(0.0, 1.0));
        }
    }

    /// Drop later duplicates, keeping the first occurrence per identity key.
    ///
    /// Three identity namespaces are tracked: verb ids, word ids, and
    /// root+stem composites. A conjugation match that resolved to a verb
    /// dedups against the verb-id set and registers its root+stem key
    /// too, pre-emptively suppressing a later root-only duplicate of the
    /// same root+stem. A root-only conjugation match dedups against the
    /// root+stem set alone.
    fn deduplicate(&mut self) {
        let mut seen_verbs: HashSet<VerbId> = HashSet::new();
        let mut seen_words: HashSet<WordId> = HashSet::new();
        let mut seen_stems: HashSet<(String, u8)> = HashSet::new();

        self.items.retain(|candidate| match candidate {
            SearchCandidate::Conjugated {
                resolved_verb_id: Some(verb_id),
                root,
                params,
                ..
            } => {
                if !seen_verbs.insert(*verb_id) {
                    return false;
                }
                seen_stems.insert((root.canonical.clone(), params.stem));
                true
            }
            SearchCandidate::Conjugated {
                resolved_verb_id: None,
                root,
                params,
                ..
            } => seen_stems.insert((root.canonical.clone(), params.stem)),
            SearchCandidate::Verb { verb_id, .. } => seen_verbs.insert(*verb_id),
            SearchCandidate::Word { word_id, .. } => seen_words.insert(*word_id),
        });
    }
}

/// Matched-surface length of a candidate in letters; 0 for candidate
/// kinds without an inherent surface (verb translation matches).
fn surface_match_len(candidate: &SearchCandidate) -> usize {
    match candidate {
        SearchCandidate::Word { surface, .. } => script::surface_len(surface),
        SearchCandidate::Conjugated { .. } | SearchCandidate::Verb { .. } => 0,
    }
}
