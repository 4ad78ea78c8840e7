use rand::Rng;
use crate::models::{IdeaRecord, ScoredCandidate, ScoringWeights, SelectionPolicy, StartupIdea, UserProfile};
use crate::core::{
    enhance::enhance_description,
    scoring::calculate_match_score,
    selection::select_results,
};

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub ideas: Vec<StartupIdea>,
    pub total_candidates: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Score every catalog idea against the profile
/// 2. Sort by score and pick an adaptive number of results
/// 3. Annotate the survivors and enhance their descriptions
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    policy: SelectionPolicy,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, policy: SelectionPolicy) -> Self {
        Self { weights, policy }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            policy: SelectionPolicy::default(),
        }
    }

    /// Find the best ideas for a profile using the thread-local RNG for jitter
    pub fn find_matches(&self, ideas: &[IdeaRecord], profile: &UserProfile) -> MatchResult {
        self.find_matches_with_rng(ideas, profile, &mut rand::thread_rng())
    }

    /// Find the best ideas for a profile
    ///
    /// # Arguments
    /// * `ideas` - Catalog snapshot
    /// * `profile` - The user's skills, interests and experience
    /// * `rng` - Source of tie-breaking jitter
    ///
    /// # Returns
    /// MatchResult with between 4 and 8 ideas (fewer only if the catalog is smaller)
    pub fn find_matches_with_rng<R: Rng + ?Sized>(
        &self,
        ideas: &[IdeaRecord],
        profile: &UserProfile,
        rng: &mut R,
    ) -> MatchResult {
        let selected = self.rank(ideas, profile, rng);

        let ideas_out = selected
            .into_iter()
            .map(|candidate| to_startup_idea(candidate, profile))
            .collect();

        MatchResult {
            ideas: ideas_out,
            total_candidates: ideas.len(),
        }
    }

    /// Score and select without converting, keeping scores for inspection
    pub fn rank<'a, R: Rng + ?Sized>(
        &self,
        ideas: &'a [IdeaRecord],
        profile: &UserProfile,
        rng: &mut R,
    ) -> Vec<ScoredCandidate<'a>> {
        let scored: Vec<ScoredCandidate<'a>> = ideas
            .iter()
            .map(|idea| calculate_match_score(idea, profile, &self.weights, rng))
            .collect();

        tracing::debug!(
            "{} of {} ideas matched a skill or interest",
            scored.iter().filter(|c| c.has_matches()).count(),
            scored.len()
        );

        select_results(scored, &self.policy)
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

fn to_startup_idea(candidate: ScoredCandidate<'_>, profile: &UserProfile) -> StartupIdea {
    let record = candidate.idea;
    StartupIdea {
        description: enhance_description(&record.description, profile.experience_level),
        matching_skills: candidate.matching_skills,
        matching_interests: candidate.matching_interests,
        ..StartupIdea::unannotated(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Difficulty, ExperienceLevel};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_idea(id: &str, skills: &[&str], interests: &[&str], difficulty: Difficulty) -> IdeaRecord {
        IdeaRecord {
            id: id.to_string(),
            title: format!("Idea {}", id),
            description: "A new venture.".to_string(),
            market_size: "$500M".to_string(),
            difficulty,
            time_to_market: "6 months".to_string(),
            revenue_model: "Subscription".to_string(),
            target_audience: "Small businesses".to_string(),
            key_features: vec!["Dashboard".to_string()],
            competitive_advantage: "Price".to_string(),
            required_skills: skills.iter().map(|s| s.to_string()).collect(),
            target_interests: interests.iter().map(|s| s.to_string()).collect(),
            keywords: vec![],
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn test_find_matches_basic() {
        let matcher = Matcher::with_default_weights();
        let profile = UserProfile::new(["Design"], ["Fashion"], ExperienceLevel::Intermediate);

        let ideas = vec![
            create_idea("1", &["Design"], &["Fashion"], Difficulty::Medium),
            create_idea("2", &["Finance"], &["Travel"], Difficulty::Hard),
            create_idea("3", &["Sales"], &["Music"], Difficulty::Easy),
        ];

        let mut rng = StdRng::seed_from_u64(42);
        let result = matcher.find_matches_with_rng(&ideas, &profile, &mut rng);

        assert_eq!(result.ideas.len(), 3);
        assert_eq!(result.total_candidates, 3);
        assert_eq!(result.ideas[0].id, "1");
        assert_eq!(result.ideas[0].matching_skills, vec!["Design"]);
        assert_eq!(result.ideas[0].matching_interests, vec!["Fashion"]);
    }

    #[test]
    fn test_descriptions_are_enhanced() {
        let matcher = Matcher::with_default_weights();
        let profile = UserProfile::new(["Design"], ["Fashion"], ExperienceLevel::Advanced);
        let ideas = vec![create_idea("1", &["Design"], &[], Difficulty::Hard)];

        let result = matcher.find_matches(&ideas, &profile);

        assert!(result.ideas[0].description.starts_with("A new venture. "));
        assert!(result.ideas[0].description.ends_with("significant business."));
    }

    #[test]
    fn test_empty_catalog() {
        let matcher = Matcher::with_default_weights();
        let profile = UserProfile::new(["Design"], ["Fashion"], ExperienceLevel::Beginner);

        let result = matcher.find_matches(&[], &profile);

        assert!(result.ideas.is_empty());
        assert_eq!(result.total_candidates, 0);
    }

    #[test]
    fn test_rank_scores_sorted() {
        let matcher = Matcher::with_default_weights();
        let profile = UserProfile::new(["Design"], ["Fashion"], ExperienceLevel::Beginner);
        let ideas: Vec<IdeaRecord> = (0..12)
            .map(|i| create_idea(&i.to_string(), &["Design"], &[], Difficulty::Easy))
            .collect();

        let mut rng = StdRng::seed_from_u64(3);
        let ranked = matcher.rank(&ideas, &profile, &mut rng);

        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
