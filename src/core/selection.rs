use std::cmp::Ordering;
use crate::models::{ScoredCandidate, SelectionPolicy};

/// Number of results to return given how many candidates are high quality
///
/// Tiers: 8+ strong matches show up to `max_results`, 6-7 show six,
/// 4-5 show five, anything less falls back to `default_results`.
/// The count is finally clamped to the number of available candidates.
pub fn result_count(high_quality: usize, available: usize, policy: &SelectionPolicy) -> usize {
    let count = if high_quality >= 8 {
        policy.max_results.min(high_quality)
    } else if high_quality >= 6 {
        6
    } else if high_quality >= 4 {
        5
    } else {
        policy.default_results
    };

    count.min(available)
}

/// Sort candidates by score (descending, stable) and keep the adaptive top slice
///
/// No minimum score is enforced: a non-empty catalog always yields results.
pub fn select_results<'a>(
    mut candidates: Vec<ScoredCandidate<'a>>,
    policy: &SelectionPolicy,
) -> Vec<ScoredCandidate<'a>> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let high_quality = candidates
        .iter()
        .filter(|c| c.score > policy.high_quality_threshold)
        .count();

    let count = result_count(high_quality, candidates.len(), policy);

    tracing::debug!(
        "Selecting {} of {} candidates ({} high-quality)",
        count,
        candidates.len(),
        high_quality
    );

    candidates.truncate(count);
    candidates
}
