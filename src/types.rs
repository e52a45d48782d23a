//! Core types for dictionary search candidates and backing-store records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backing-store identifier of a root record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RootId(pub u32);

/// Backing-store identifier of a verb record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VerbId(pub u32);

/// Backing-store identifier of a word record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordId(pub u32);

/// A named variety of Arabic with its own grammatical feature set
/// (e.g. presence or absence of dual number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// Modern Standard Arabic — the full classical feature set.
    Msa,
    /// Egyptian Arabic.
    Egyptian,
    /// Levantine Arabic.
    Levantine,
    /// Gulf Arabic.
    Gulf,
}

impl Dialect {
    /// Returns the human-readable name of this dialect.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Msa => "Modern Standard Arabic",
            Self::Egyptian => "Egyptian",
            Self::Levantine => "Levantine",
            Self::Gulf => "Gulf",
        }
    }

    /// Returns all supported dialect variants.
    pub fn all() -> &'static [Dialect] {
        &[Self::Msa, Self::Egyptian, Self::Levantine, Self::Gulf]
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A short-vowel mark (harakah) used to disambiguate stem-1 verb classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tashkil {
    /// Fatha (a-vowel).
    Fatha,
    /// Damma (u-vowel).
    Damma,
    /// Kasra (i-vowel).
    Kasra,
}

/// The vocalization variant disambiguating stem-1 forms of a root:
/// the middle-radical vowel in the past and non-past tenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stem1Context {
    /// Middle-radical vowel in the past tense.
    pub past: Tashkil,
    /// Middle-radical vowel in the non-past tense.
    pub nonpast: Tashkil,
}

/// Grammatical parameters identifying a derived verb form within a root family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StemParams {
    /// Derivational stem number (1-based; stem 1 is the base pattern).
    pub stem: u8,
    /// Stem-1 vocalization variant. Only meaningful when `stem == 1`.
    pub stem1_context: Option<Stem1Context>,
}

/// The analyzer's view of a root: its canonical (radical-only) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RootProjection {
    /// Canonical radical sequence, e.g. `"د-ر-س"` written without separators.
    pub canonical: String,
}

/// One candidate produced by reverse-conjugation analysis: a possible
/// root + grammatical-parameter tuple explaining a conjugated surface form.
///
/// Candidates arrive pre-sorted by the analyzer's own confidence; this
/// crate never reorders them relative to each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReverseConjugationCandidate {
    /// The proposed root.
    pub root: RootProjection,
    /// The proposed stem and stem-1 context.
    pub params: StemParams,
    /// The analyzer's intrinsic confidence score, in `[0, 1]`.
    pub raw_score: f64,
}

/// A verb row from the backing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerbRecord {
    /// Backing-store identifier.
    pub id: VerbId,
    /// Derivational stem number.
    pub stem: u8,
    /// Persisted stem-1 context compatibility set. A stored verb may be
    /// compatible with more than one analyzer-proposed context, so
    /// matching is any-of over this list. Empty for stems other than 1.
    pub stem1_contexts: Vec<Stem1Context>,
    /// English translation of the verb.
    pub translation: String,
}

/// A root row carried alongside verb query results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootData {
    /// Backing-store identifier.
    pub id: RootId,
    /// Canonical radical sequence.
    pub canonical: String,
}

/// A word record returned by the lexical indexes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordAggregate {
    /// Backing-store identifier.
    pub id: WordId,
    /// The vocalized surface form as stored.
    pub surface: String,
    /// English translation of the word.
    pub translation: String,
}

/// A verb record (with its root) returned by the verb translation index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerbAggregate {
    /// The root this verb derives from.
    pub root: RootData,
    /// The verb record itself.
    pub verb: VerbRecord,
}

/// Confidence classification of a reverse-conjugation candidate, based on
/// how much of it could be matched against the backing store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchTier {
    /// A stored verb matches the candidate's root, stem, and (for stem 1)
    /// context. Full confidence.
    VerbFound,
    /// The root exists but no stored verb matches the requested stem.
    RootFound,
    /// The root could not be resolved at all.
    NotFound,
}

impl MatchTier {
    /// Discount factor applied to the analyzer's raw score for this tier.
    pub fn discount(&self) -> f64 {
        match self {
            Self::VerbFound => 1.0,
            Self::RootFound => 1.0 / 2.0,
            Self::NotFound => 1.0 / 3.0,
        }
    }
}

/// A single entry in the aggregated search result list.
///
/// Three differently-shaped kinds of match flow into one ranked list.
/// Every variant carries `by_translation` (whether the match was made
/// against the English translation rather than the Arabic surface) and a
/// mutable `score` recomputed by the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SearchCandidate {
    /// A reverse-conjugation match: the query parsed as a conjugated form
    /// of some root + stem.
    Conjugated {
        /// The analyzer's proposed root.
        root: RootProjection,
        /// The analyzer's proposed stem parameters.
        params: StemParams,
        /// The analyzer's intrinsic confidence.
        raw_score: f64,
        /// Backing-store confidence tier.
        tier: MatchTier,
        /// Root id, if the root resolved in the backing store.
        resolved_root_id: Option<RootId>,
        /// Verb id, if a stored verb matched stem (and context).
        resolved_verb_id: Option<VerbId>,
        /// Always `false`: conjugation matches are made against the surface.
        by_translation: bool,
        /// Aggregator-assigned relevance score in `[0, 1]`.
        score: f64,
    },
    /// A verb matched through its translation.
    Verb {
        /// Backing-store verb identifier (identity key).
        verb_id: VerbId,
        /// The verb's root.
        root: RootData,
        /// The verb record.
        verb: VerbRecord,
        /// Whether the match was made against the translation.
        by_translation: bool,
        /// Aggregator-assigned relevance score in `[0, 1]`.
        score: f64,
    },
    /// A word matched by spelling or by translation.
    Word {
        /// Backing-store word identifier (identity key).
        word_id: WordId,
        /// The matched vocalized surface form.
        surface: String,
        /// Whether the match was made against the translation.
        by_translation: bool,
        /// Aggregator-assigned relevance score in `[0, 1]`.
        score: f64,
    },
}

impl SearchCandidate {
    /// Current relevance score.
    pub fn score(&self) -> f64 {
        match self {
            Self::Conjugated { score, .. } | Self::Verb { score, .. } | Self::Word { score, .. } => {
                *score
            }
        }
    }

    /// Whether this candidate matched against the translation text.
    pub fn by_translation(&self) -> bool {
        match self {
            Self::Conjugated { by_translation, .. }
            | Self::Verb { by_translation, .. }
            | Self::Word { by_translation, .. } => *by_translation,
        }
    }

    pub(crate) fn set_score(&mut self, value: f64) {
        match self {
            Self::Conjugated { score, .. } | Self::Verb { score, .. } | Self::Word { score, .. } => {
                *score = value;
            }
        }
    }
}
