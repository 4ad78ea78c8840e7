/// Case-insensitive loose match: equal, or either side contains the other
///
/// Both arguments must already be lowercase.
#[inline]
pub fn fuzzy_matches(term: &str, candidate: &str) -> bool {
    term == candidate || candidate.contains(term) || term.contains(candidate)
}

/// True when any entry of `vocabulary` loosely matches the lowercase `term`
#[inline]
pub fn matches_any(term: &str, vocabulary: &[String]) -> bool {
    vocabulary
        .iter()
        .any(|entry| fuzzy_matches(term, &entry.to_lowercase()))
}

/// True when `text` contains any of `needles` (all lowercase)
#[inline]
pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}
