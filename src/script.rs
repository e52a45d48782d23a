//! Arabic script helpers for query classification and fallback stripping.
//!
//! Canonicalises how the engine looks at query text: whether it is
//! script-native Arabic (and therefore eligible for the spelling and
//! reverse-conjugation sources), how long a surface form is in letters
//! (diacritics excluded), and the two morphological fallback rules used
//! when a spelling lookup comes back empty.

/// The feminine-marker grapheme (ta marbuta).
pub const FEMININE_MARKER: char = '\u{0629}';

/// The definite-article digraph (alif + lam).
pub const DEFINITE_ARTICLE: &str = "\u{0627}\u{0644}";

/// Returns `true` for letters of the Arabic alphabet, hamza forms included.
pub fn is_arabic_letter(c: char) -> bool {
    matches!(c, '\u{0621}'..='\u{063A}' | '\u{0641}'..='\u{064A}')
}

/// Returns `true` for combining diacritics: the harakat, tanwin, shadda,
/// sukun, and the superscript alif.
pub fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{0652}' | '\u{0670}')
}

/// Returns `true` if `text` is script-native Arabic: every character is an
/// Arabic letter, a diacritic, tatweel, or whitespace, and at least one
/// Arabic letter is present.
///
/// Script-native queries are additionally routed to the spelling index and
/// the reverse-conjugation analyzer; everything else only queries the
/// translation indexes.
pub fn is_script_native(text: &str) -> bool {
    let mut saw_letter = false;
    for c in text.chars() {
        if is_arabic_letter(c) {
            saw_letter = true;
        } else if !(is_diacritic(c) || c == '\u{0640}' || c.is_whitespace()) {
            return false;
        }
    }
    saw_letter
}

/// Length of a surface form in letters, ignoring combining diacritics.
///
/// A fully vocalized form and its unvocalized spelling have the same
/// length, which is what the aggregator's score normalization compares.
pub fn surface_len(text: &str) -> usize {
    text.chars().filter(|c| !is_diacritic(*c)).count()
}

/// If `text` ends in the feminine marker, returns it with the marker
/// (and any diacritic sitting on it) removed.
pub fn strip_feminine_marker(text: &str) -> Option<String> {
    let trimmed = text.trim_end_matches(is_diacritic);
    let stripped = trimmed.strip_suffix(FEMININE_MARKER)?;
    Some(stripped.to_string())
}

/// If `text` begins with the definite-article digraph, returns it with
/// the article removed.
pub fn strip_definite_article(text: &str) -> Option<String> {
    let stripped = text.strip_prefix(DEFINITE_ARTICLE)?;
    Some(stripped.to_string())
}
