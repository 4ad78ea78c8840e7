// Unit tests for Idea Matcher

use idea_matcher::core::{
    enhance::{enhance_description, experience_note},
    progress::{roadmap_steps, toggle_step, ProgressError},
    scoring::{calculate_base_score, calculate_match_score, difficulty_bonus, is_fast_to_market, is_student_oriented},
    selection::{result_count, select_results},
    text::fuzzy_matches,
};
use idea_matcher::models::{
    Difficulty, ExperienceLevel, IdeaRecord, ScoredCandidate, ScoringWeights, SelectionPolicy, UserProfile,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn create_idea(id: &str) -> IdeaRecord {
    IdeaRecord {
        id: id.to_string(),
        title: "Meal Kit Delivery".to_string(),
        description: "Meal kits for busy families".to_string(),
        market_size: "$1B".to_string(),
        difficulty: Difficulty::Easy,
        time_to_market: "6 months".to_string(),
        revenue_model: "Subscription".to_string(),
        target_audience: "Families".to_string(),
        key_features: vec!["Recipes".to_string()],
        competitive_advantage: "Local farms".to_string(),
        required_skills: vec!["Cooking".to_string()],
        target_interests: vec!["Food".to_string()],
        keywords: vec![],
        is_active: true,
        created_at: None,
    }
}

fn beginner(skills: &[&str], interests: &[&str]) -> UserProfile {
    UserProfile::new(skills.iter().copied(), interests.iter().copied(), ExperienceLevel::Beginner)
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_required_skill_and_target_interest() {
    let idea = create_idea("1");
    let profile = beginner(&["Cooking"], &["Food"]);

    let (score, skills, interests) = calculate_base_score(&idea, &profile, &ScoringWeights::default());

    // 15 (required skill) + 12 (target interest) + 10 (beginner on easy)
    assert!(approx_eq(score, 37.0));
    assert_eq!(skills, vec!["Cooking"]);
    assert_eq!(interests, vec!["Food"]);
}

#[test]
fn test_exact_required_skill_adds_fifteen() {
    let mut idea = create_idea("1");
    idea.required_skills = vec!["Web Development".to_string()];
    let profile = beginner(&["Web Development"], &["Travel"]);

    let (score, skills, interests) = calculate_base_score(&idea, &profile, &ScoringWeights::default());

    // 15 (required skill) + 10 (beginner on easy)
    assert!(score >= 15.0);
    assert!(approx_eq(score, 25.0));
    assert_eq!(skills, vec!["Web Development"]);
    assert!(interests.is_empty());
}

#[test]
fn test_matched_entries_keep_profile_spelling() {
    let idea = create_idea("1");
    let profile = beginner(&["COOKING"], &["fOoD"]);

    let (_, skills, interests) = calculate_base_score(&idea, &profile, &ScoringWeights::default());

    assert_eq!(skills, vec!["COOKING"]);
    assert_eq!(interests, vec!["fOoD"]);
}

#[test]
fn test_skill_matching_is_bidirectional_substring() {
    let mut idea = create_idea("1");
    idea.required_skills = vec!["Web Development".to_string()];

    let profile = beginner(&["development"], &[]);
    let (_, skills, _) = calculate_base_score(&idea, &profile, &ScoringWeights::default());
    assert_eq!(skills, vec!["development"]);

    let profile = beginner(&["Frontend Web Development"], &[]);
    let (_, skills, _) = calculate_base_score(&idea, &profile, &ScoringWeights::default());
    assert_eq!(skills, vec!["Frontend Web Development"]);
}

#[test]
fn test_skill_counted_once_in_matches_but_scored_twice() {
    let mut idea = create_idea("1");
    idea.description = "Cooking classes for families".to_string();
    let profile = beginner(&["Cooking"], &["Travel"]);

    let (score, skills, interests) = calculate_base_score(&idea, &profile, &ScoringWeights::default());

    // 15 (required) + 5 (mentioned) + 10 (difficulty)
    assert!(approx_eq(score, 30.0));
    assert_eq!(skills, vec!["Cooking"]);
    assert!(interests.is_empty());
}

#[test]
fn test_interest_mention_alone_is_not_a_match() {
    let mut idea = create_idea("1");
    idea.required_skills = vec!["Logistics".to_string()];
    idea.target_interests = vec!["Travel".to_string()];
    idea.description = "Food trucks at festivals".to_string();

    let profile = beginner(&["Painting"], &["Food"]);
    let (score, skills, interests) = calculate_base_score(&idea, &profile, &ScoringWeights::default());

    assert!(skills.is_empty());
    assert!(interests.is_empty());
    // (3 mention + 10 difficulty) * 0.3
    assert!(approx_eq(score, 13.0 * 0.3));
}

#[test]
fn test_keyword_interest() {
    let mut idea = create_idea("1");
    idea.target_interests = vec![];
    idea.keywords = vec!["nutrition".to_string()];

    let profile = beginner(&["Accounting"], &["Nutrition"]);
    let (score, _, interests) = calculate_base_score(&idea, &profile, &ScoringWeights::default());

    assert_eq!(interests, vec!["Nutrition"]);
    // 6 keyword + 10 difficulty
    assert!(approx_eq(score, 16.0));
}

#[test]
fn test_empty_profile_gets_only_penalized_bonuses() {
    let mut idea = create_idea("1");
    idea.target_audience = "University students".to_string();
    idea.time_to_market = "2-3 months".to_string();

    let profile = beginner(&[], &[]);
    let (score, skills, interests) = calculate_base_score(&idea, &profile, &ScoringWeights::default());

    assert!(skills.is_empty() && interests.is_empty());
    // (10 difficulty + 8 student + 5 fast) * 0.3
    assert!(approx_eq(score, 23.0 * 0.3));
}

#[test]
fn test_hard_idea_without_matches_can_score_negative() {
    let mut idea = create_idea("1");
    idea.difficulty = Difficulty::Hard;

    let profile = beginner(&["Painting"], &["Music"]);
    let (score, _, _) = calculate_base_score(&idea, &profile, &ScoringWeights::default());

    assert!(approx_eq(score, -8.0 * 0.3));
}

#[test]
fn test_adding_matching_skill_never_lowers_score() {
    let idea = create_idea("1");
    let weights = ScoringWeights::default();

    let (without, _, _) = calculate_base_score(&idea, &beginner(&["Design"], &["Food"]), &weights);
    let (with, _, _) = calculate_base_score(&idea, &beginner(&["Design", "Cooking"], &["Food"]), &weights);

    assert!(with >= without);
}

#[test]
fn test_difficulty_table() {
    use Difficulty::*;
    use ExperienceLevel::*;

    let expected = [
        (Beginner, Easy, 10.0),
        (Beginner, Medium, 2.0),
        (Beginner, Hard, -8.0),
        (Intermediate, Easy, 5.0),
        (Intermediate, Medium, 10.0),
        (Intermediate, Hard, 0.0),
        (Advanced, Easy, 2.0),
        (Advanced, Medium, 8.0),
        (Advanced, Hard, 10.0),
    ];

    for (level, difficulty, bonus) in expected {
        assert_eq!(difficulty_bonus(level, difficulty), bonus, "{} on {}", level, difficulty);
    }
}

#[test]
fn test_student_orientation_markers() {
    let mut idea = create_idea("1");
    assert!(!is_student_oriented(&idea));

    idea.title = "Campus Laundry Pickup".to_string();
    assert!(is_student_oriented(&idea));

    let mut idea = create_idea("2");
    idea.description = "Built for STUDENTS on a budget".to_string();
    assert!(is_student_oriented(&idea));
}

#[test]
fn test_fast_to_market_markers() {
    assert!(is_fast_to_market("2-3 months"));
    assert!(is_fast_to_market("2-4 months"));
    assert!(is_fast_to_market("2\u{2013}3 months"));
    assert!(!is_fast_to_market("3-6 months"));
    assert!(!is_fast_to_market("12 months"));
}

#[test]
fn test_jitter_stays_in_range() {
    let idea = create_idea("1");
    let profile = beginner(&["Cooking"], &["Food"]);
    let weights = ScoringWeights::default();

    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let scored = calculate_match_score(&idea, &profile, &weights, &mut rng);
        assert!(scored.score >= 37.0 && scored.score < 41.0, "seed {} gave {}", seed, scored.score);
    }
}

#[test]
fn test_jitter_disabled() {
    let idea = create_idea("1");
    let profile = beginner(&["Cooking"], &["Food"]);
    let weights = ScoringWeights { jitter: 0.0, ..ScoringWeights::default() };

    let mut rng = StdRng::seed_from_u64(7);
    let scored = calculate_match_score(&idea, &profile, &weights, &mut rng);
    assert_eq!(scored.score, 37.0);
}

#[test]
fn test_fuzzy_matching() {
    assert!(fuzzy_matches("design", "ui design"));
    assert!(fuzzy_matches("graphic design", "design"));
    assert!(!fuzzy_matches("design", "marketing"));
}

#[test]
fn test_result_count_tiers() {
    let policy = SelectionPolicy::default();

    assert_eq!(result_count(10, 20, &policy), 8);
    assert_eq!(result_count(8, 20, &policy), 8);
    assert_eq!(result_count(7, 20, &policy), 6);
    assert_eq!(result_count(6, 20, &policy), 6);
    assert_eq!(result_count(5, 20, &policy), 5);
    assert_eq!(result_count(4, 20, &policy), 5);
    assert_eq!(result_count(3, 20, &policy), 4);
    assert_eq!(result_count(0, 20, &policy), 4);
    assert_eq!(result_count(0, 2, &policy), 2);
}

#[test]
fn test_select_results_sorted_descending() {
    let ideas: Vec<IdeaRecord> = (0..6).map(|i| create_idea(&i.to_string())).collect();
    let scores = [3.0, 25.0, -1.0, 12.0, 30.0, 8.0];

    let candidates: Vec<ScoredCandidate> = ideas
        .iter()
        .zip(scores)
        .map(|(idea, score)| ScoredCandidate {
            idea,
            score,
            matching_skills: vec![],
            matching_interests: vec![],
        })
        .collect();

    let selected = select_results(candidates, &SelectionPolicy::default());

    assert_eq!(selected.len(), 4);
    let ids: Vec<&str> = selected.iter().map(|c| c.idea.id.as_str()).collect();
    assert_eq!(ids, vec!["4", "1", "3", "5"]);
}

#[test]
fn test_enhanced_description_appends_note() {
    let text = enhance_description("Meal kits.", ExperienceLevel::Advanced);
    assert!(text.starts_with("Meal kits. "));
    assert!(text.ends_with(experience_note(ExperienceLevel::Advanced)));
}

#[test]
fn test_roadmap_toggle_sequence() {
    let flags = toggle_step(&[], "validate").unwrap();
    let flags = toggle_step(&flags, "research").unwrap();
    assert_eq!(toggle_step(&flags, "launch"), Err(ProgressError::Locked("launch".to_string())));

    let flags = toggle_step(&flags, "validate").unwrap();
    assert!(roadmap_steps(&flags).iter().all(|step| !step.completed));
}
