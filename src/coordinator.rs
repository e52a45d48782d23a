//! Search coordination: concurrent source fan-out, incremental delivery,
//! fan-in completion barrier.
//!
//! A [`SearchCoordinator`] owns the backing-store handle, the analyzer,
//! and the session caches. Each [`perform_search`] call races the
//! applicable sources on a [`FuturesUnordered`] polled from one task, so
//! aggregator mutation between await points is synchronous and needs no
//! lock. Every completed source triggers a recompute and one cumulative
//! snapshot delivery; sources complete in whatever order the backing
//! store answers, never a deterministic one.
//!
//! A new `perform_search` never cancels a previous in-flight one; each
//! call owns a fresh working set, so two overlapping searches cannot mix
//! state inside the engine. Whether a caller discards late snapshots
//! from a superseded search is the caller's decision to make.
//!
//! [`perform_search`]: SearchCoordinator::perform_search

use std::future::Future;
use std::pin::Pin;

use futures::stream::{FuturesUnordered, StreamExt};
use futures::Stream;

use crate::aggregator::ResultAggregator;
use crate::cache::{RootIdCache, VerbsOfRootCache};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::matcher::ReverseConjugationMatcher;
use crate::script;
use crate::store::{ConjugationAnalyzer, LexiconStore};
use crate::types::{SearchCandidate, VerbAggregate, WordAggregate};

/// The independent sources a search fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceKind {
    WordBySpelling,
    WordByTranslation,
    VerbByTranslation,
    ReverseConjugation,
}

impl SourceKind {
    fn name(self) -> &'static str {
        match self {
            Self::WordBySpelling => "word-by-spelling",
            Self::WordByTranslation => "word-by-translation",
            Self::VerbByTranslation => "verb-by-translation",
            Self::ReverseConjugation => "reverse-conjugation",
        }
    }
}

type SourceFuture<'a> =
    Pin<Box<dyn Future<Output = (SourceKind, Result<Vec<SearchCandidate>, SearchError>)> + Send + 'a>>;

/// Entry point of the search engine.
///
/// Generic over the backing store and analyzer so tests can inject
/// in-memory fakes. The session caches live and die with the coordinator.
pub struct SearchCoordinator<S, A> {
    store: S,
    analyzer: A,
    roots: RootIdCache,
    verbs: VerbsOfRootCache,
    config: SearchConfig,
}

impl<S: LexiconStore, A: ConjugationAnalyzer> SearchCoordinator<S, A> {
    /// Create a coordinator with fresh session caches.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` fails validation.
    pub fn new(store: S, analyzer: A, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let roots = RootIdCache::new(config.cache_capacity);
        let verbs = VerbsOfRootCache::new(config.cache_capacity);
        Ok(Self {
            store,
            analyzer,
            roots,
            verbs,
            config,
        })
    }

    /// Run a search, delivering cumulative snapshots as sources complete.
    ///
    /// Word-by-translation and verb-by-translation always run. If
    /// `filter` is script-native Arabic, word-by-spelling and the
    /// reverse-conjugation path run as well. `on_update` fires once per
    /// *successfully* completed source — up to four times — each time
    /// with the full re-ranked list so far; every invocation replaces
    /// prior state wholesale, it is not a diff.
    ///
    /// The returned future is the completion barrier: it resolves only
    /// after every launched source has settled, yielding the final
    /// snapshot. A slow or failing source never blocks delivery of the
    /// others' results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::AllSourcesFailed`] only if **every**
    /// launched source fails. Partial failures are logged and contribute
    /// zero candidates.
    pub async fn perform_search(
        &self,
        filter: &str,
        offset: usize,
        limit: usize,
        mut on_update: impl FnMut(&[SearchCandidate]),
    ) -> Result<Vec<SearchCandidate>, SearchError> {
        tracing::trace!(%filter, "starting search");
        let mut sources = self.launch_sources(filter, offset, limit);
        let launched = sources.len();
        let mut aggregator = ResultAggregator::new(filter);
        let mut failures: Vec<String> = Vec::new();

        while let Some((kind, outcome)) = sources.next().await {
            match outcome {
                Ok(candidates) => {
                    tracing::debug!(
                        source = kind.name(),
                        count = candidates.len(),
                        "source completed"
                    );
                    for candidate in candidates {
                        aggregator.add(candidate);
                    }
                    aggregator.recompute();
                    on_update(aggregator.snapshot());
                }
                Err(err) => {
                    tracing::warn!(source = kind.name(), error = %err, "source failed");
                    failures.push(format!("{}: {err}", kind.name()));
                }
            }
        }

        if !failures.is_empty() && failures.len() == launched {
            return Err(SearchError::AllSourcesFailed(failures.join("; ")));
        }
        Ok(aggregator.snapshot().to_vec())
    }

    /// [`perform_search`] with offset 0 and the configured default limit.
    ///
    /// # Errors
    ///
    /// Same as [`perform_search`].
    ///
    /// [`perform_search`]: SearchCoordinator::perform_search
    pub async fn search(
        &self,
        filter: &str,
        on_update: impl FnMut(&[SearchCandidate]),
    ) -> Result<Vec<SearchCandidate>, SearchError> {
        self.perform_search(filter, 0, self.config.default_limit, on_update)
            .await
    }

    /// Stream variant of [`perform_search`]: yields each cumulative
    /// snapshot as an owned list, then terminates when all sources have
    /// settled. Failed sources yield nothing.
    ///
    /// [`perform_search`]: SearchCoordinator::perform_search
    pub fn search_stream(
        &self,
        filter: &str,
        offset: usize,
        limit: usize,
    ) -> impl Stream<Item = Vec<SearchCandidate>> + '_ {
        let filter = filter.to_string();
        async_stream::stream! {
            let mut sources = self.launch_sources(&filter, offset, limit);
            let mut aggregator = ResultAggregator::new(&filter);
            while let Some((kind, outcome)) = sources.next().await {
                match outcome {
                    Ok(candidates) => {
                        tracing::debug!(
                            source = kind.name(),
                            count = candidates.len(),
                            "source completed"
                        );
                        for candidate in candidates {
                            aggregator.add(candidate);
                        }
                        aggregator.recompute();
                        yield aggregator.snapshot().to_vec();
                    }
                    Err(err) => {
                        tracing::warn!(source = kind.name(), error = %err, "source failed");
                    }
                }
            }
        }
    }

    /// Build the racing source futures for one search.
    fn launch_sources(
        &self,
        filter: &str,
        offset: usize,
        limit: usize,
    ) -> FuturesUnordered<SourceFuture<'_>> {
        let sources: FuturesUnordered<SourceFuture<'_>> = FuturesUnordered::new();

        {
            let filter = filter.to_string();
            sources.push(Box::pin(async move {
                (
                    SourceKind::WordByTranslation,
                    self.word_by_translation(&filter, offset, limit).await,
                )
            }) as SourceFuture<'_>);
        }
        {
            let filter = filter.to_string();
            sources.push(Box::pin(async move {
                (
                    SourceKind::VerbByTranslation,
                    self.verb_by_translation(&filter, offset, limit).await,
                )
            }) as SourceFuture<'_>);
        }

        if script::is_script_native(filter) {
            {
                let filter = filter.to_string();
                sources.push(Box::pin(async move {
                    (
                        SourceKind::WordBySpelling,
                        self.word_by_spelling(filter, offset, limit).await,
                    )
                }) as SourceFuture<'_>);
            }
            {
                let filter = filter.to_string();
                sources.push(Box::pin(async move {
                    (
                        SourceKind::ReverseConjugation,
                        self.reverse_conjugation(&filter).await,
                    )
                }) as SourceFuture<'_>);
            }
        }

        sources
    }

    async fn word_by_translation(
        &self,
        filter: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SearchCandidate>, SearchError> {
        let words = self
            .store
            .find_words_by_translation(filter, offset, limit)
            .await?;
        Ok(words.into_iter().map(|w| word_candidate(w, true)).collect())
    }

    async fn verb_by_translation(
        &self,
        filter: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SearchCandidate>, SearchError> {
        let verbs = self
            .store
            .find_verbs_by_translation(filter, offset, limit)
            .await?;
        Ok(verbs
            .into_iter()
            .map(|VerbAggregate { root, verb }| SearchCandidate::Verb {
                verb_id: verb.id,
                root,
                verb,
                by_translation: true,
                score: 0.0,
            })
            .collect())
    }

    async fn word_by_spelling(
        &self,
        filter: String,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SearchCandidate>, SearchError> {
        let words = self
            .spelling_with_fallback(filter, offset, limit, false, false)
            .await?;
        Ok(words.into_iter().map(|w| word_candidate(w, false)).collect())
    }

    /// Spelling lookup with the morphological fallback retry chain.
    ///
    /// On an empty result, retries once with the trailing feminine marker
    /// stripped; failing that, once with the leading definite article
    /// stripped. Each rule applies at most once per search, and a retry
    /// may trigger the other rule — so at most two retries total, after
    /// which an empty result is returned as-is.
    fn spelling_with_fallback(
        &self,
        filter: String,
        offset: usize,
        limit: usize,
        tried_feminine: bool,
        tried_article: bool,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<WordAggregate>, SearchError>> + Send + '_>> {
        Box::pin(async move {
            let words = self
                .store
                .find_words_by_spelling(&filter, offset, limit)
                .await?;
            if !words.is_empty() {
                return Ok(words);
            }
            if !tried_feminine {
                if let Some(stripped) = script::strip_feminine_marker(&filter) {
                    tracing::trace!("empty spelling result, retrying without feminine marker");
                    return self
                        .spelling_with_fallback(stripped, offset, limit, true, tried_article)
                        .await;
                }
            }
            if !tried_article {
                if let Some(stripped) = script::strip_definite_article(&filter) {
                    tracing::trace!("empty spelling result, retrying without definite article");
                    return self
                        .spelling_with_fallback(stripped, offset, limit, tried_feminine, true)
                        .await;
                }
            }
            Ok(words)
        })
    }

    async fn reverse_conjugation(
        &self,
        filter: &str,
    ) -> Result<Vec<SearchCandidate>, SearchError> {
        let proposals = self.analyzer.analyze(self.config.dialect, filter);
        let matcher = ReverseConjugationMatcher::new(&self.store, &self.roots, &self.verbs);
        matcher.classify(filter, proposals).await
    }
}

fn word_candidate(word: WordAggregate, by_translation: bool) -> SearchCandidate {
    SearchCandidate::Word {
        word_id: word.id,
        surface: word.surface,
        by_translation,
        score: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dialect, ReverseConjugationCandidate, RootId, VerbRecord, WordId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store fake with per-endpoint canned answers and failure switches.
    #[derive(Default)]
    struct ScriptedStore {
        spelling: Vec<(String, Vec<WordAggregate>)>,
        spelling_calls: AtomicUsize,
        words_by_translation: Vec<WordAggregate>,
        verbs_by_translation: Vec<VerbAggregate>,
        fail_words_by_translation: bool,
        fail_verbs_by_translation: bool,
        fail_spelling: bool,
    }

    impl LexiconStore for ScriptedStore {
        async fn find_words_by_spelling(
            &self,
            filter: &str,
            _offset: usize,
            _limit: usize,
        ) -> Result<Vec<WordAggregate>, SearchError> {
            self.spelling_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_spelling {
                return Err(SearchError::Store("spelling index down".into()));
            }
            Ok(self
                .spelling
                .iter()
                .find(|(form, _)| form == filter)
                .map(|(_, words)| words.clone())
                .unwrap_or_default())
        }

        async fn find_words_by_translation(
            &self,
            _filter: &str,
            _offset: usize,
            _limit: usize,
        ) -> Result<Vec<WordAggregate>, SearchError> {
            if self.fail_words_by_translation {
                return Err(SearchError::Store("word index down".into()));
            }
            Ok(self.words_by_translation.clone())
        }

        async fn find_verbs_by_translation(
            &self,
            _filter: &str,
            _offset: usize,
            _limit: usize,
        ) -> Result<Vec<VerbAggregate>, SearchError> {
            if self.fail_verbs_by_translation {
                return Err(SearchError::Store("verb index down".into()));
            }
            Ok(self.verbs_by_translation.clone())
        }

        async fn try_find_root_id(
            &self,
            _canonical_root: &str,
        ) -> Result<Option<RootId>, SearchError> {
            Ok(None)
        }

        async fn verbs_of_root(&self, _root_id: RootId) -> Result<Vec<VerbRecord>, SearchError> {
            Ok(vec![])
        }
    }

    /// Analyzer fake returning no proposals.
    struct SilentAnalyzer;

    impl ConjugationAnalyzer for SilentAnalyzer {
        fn analyze(&self, _dialect: Dialect, _surface: &str) -> Vec<ReverseConjugationCandidate> {
            vec![]
        }
    }

    fn word(id: u32, surface: &str) -> WordAggregate {
        WordAggregate {
            id: WordId(id),
            surface: surface.to_string(),
            translation: "lesson".into(),
        }
    }

    fn coordinator(store: ScriptedStore) -> SearchCoordinator<ScriptedStore, SilentAnalyzer> {
        SearchCoordinator::new(store, SilentAnalyzer, SearchConfig::default())
            .expect("valid config")
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let config = SearchConfig {
            cache_capacity: 0,
            ..Default::default()
        };
        let result = SearchCoordinator::new(ScriptedStore::default(), SilentAnalyzer, config);
        assert!(matches!(result, Err(SearchError::Config(_))));
    }

    #[tokio::test]
    async fn non_arabic_query_launches_two_sources() {
        let store = ScriptedStore {
            words_by_translation: vec![word(1, "درس")],
            ..Default::default()
        };
        let coordinator = coordinator(store);

        let mut updates = 0;
        coordinator
            .perform_search("lesson", 0, 10, |_| updates += 1)
            .await
            .expect("search succeeds");

        assert_eq!(updates, 2);
        assert_eq!(coordinator.store.spelling_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn arabic_query_launches_four_sources() {
        let store = ScriptedStore {
            spelling: vec![("درس".to_string(), vec![word(1, "درس")])],
            ..Default::default()
        };
        let coordinator = coordinator(store);

        let mut updates = 0;
        coordinator
            .perform_search("درس", 0, 10, |_| updates += 1)
            .await
            .expect("search succeeds");

        assert_eq!(updates, 4);
        assert!(coordinator.store.spelling_calls.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn one_failing_source_does_not_block_others() {
        let store = ScriptedStore {
            words_by_translation: vec![word(1, "درس")],
            fail_verbs_by_translation: true,
            ..Default::default()
        };
        let coordinator = coordinator(store);

        let mut updates = 0;
        let results = coordinator
            .perform_search("lesson", 0, 10, |_| updates += 1)
            .await
            .expect("partial results still delivered");

        assert_eq!(updates, 1);
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn all_sources_failing_is_an_error() {
        let store = ScriptedStore {
            fail_words_by_translation: true,
            fail_verbs_by_translation: true,
            ..Default::default()
        };
        let coordinator = coordinator(store);

        let err = coordinator
            .perform_search("lesson", 0, 10, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, SearchError::AllSourcesFailed(_)));
    }

    #[tokio::test]
    async fn empty_sources_are_completions_not_failures() {
        let coordinator = coordinator(ScriptedStore::default());

        let mut updates = 0;
        let results = coordinator
            .perform_search("lesson", 0, 10, |_| updates += 1)
            .await
            .expect("empty search succeeds");

        assert_eq!(updates, 2);
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn spelling_fallback_strips_feminine_marker() {
        let store = ScriptedStore {
            // No entry for مدرسة, one for مدرس.
            spelling: vec![("مدرس".to_string(), vec![word(1, "مدرس")])],
            ..Default::default()
        };
        let coordinator = coordinator(store);

        let words = coordinator
            .spelling_with_fallback("مدرسة".to_string(), 0, 10, false, false)
            .await
            .expect("fallback succeeds");

        assert_eq!(words.len(), 1);
        assert_eq!(words[0].id, WordId(1));
        assert_eq!(coordinator.store.spelling_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn spelling_fallback_strips_definite_article() {
        let store = ScriptedStore {
            spelling: vec![("درس".to_string(), vec![word(1, "درس")])],
            ..Default::default()
        };
        let coordinator = coordinator(store);

        let words = coordinator
            .spelling_with_fallback("الدرس".to_string(), 0, 10, false, false)
            .await
            .expect("fallback succeeds");

        assert_eq!(words.len(), 1);
        assert_eq!(coordinator.store.spelling_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn spelling_fallback_chains_both_rules_once() {
        let store = ScriptedStore {
            spelling: vec![("مدرس".to_string(), vec![word(1, "مدرس")])],
            ..Default::default()
        };
        let coordinator = coordinator(store);

        // المدرسة → (feminine rule) المدرس → (article rule) مدرس.
        let words = coordinator
            .spelling_with_fallback("المدرسة".to_string(), 0, 10, false, false)
            .await
            .expect("fallback succeeds");

        assert_eq!(words.len(), 1);
        assert_eq!(coordinator.store.spelling_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn spelling_fallback_exhausted_returns_empty() {
        let coordinator = coordinator(ScriptedStore::default());

        let words = coordinator
            .spelling_with_fallback("المدرسة".to_string(), 0, 10, false, false)
            .await
            .expect("empty is not an error");

        assert!(words.is_empty());
        // Original, feminine-stripped, article-stripped: three attempts.
        assert_eq!(coordinator.store.spelling_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn search_uses_configured_default_limit() {
        let store = ScriptedStore {
            words_by_translation: vec![word(1, "درس")],
            ..Default::default()
        };
        let coordinator = coordinator(store);

        let results = coordinator
            .search("lesson", |_| {})
            .await
            .expect("search succeeds");
        assert_eq!(results.len(), 1);
    }
}
