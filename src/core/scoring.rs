use rand::Rng;
use crate::models::{Difficulty, ExperienceLevel, IdeaRecord, ScoredCandidate, ScoringWeights, UserProfile};
use crate::core::text::{contains_any, matches_any};

const STUDENT_MARKERS: &[&str] = &["student"];
const CAMPUS_MARKER: &str = "campus";
const FAST_TO_MARKET_MARKERS: &[&str] = &["2-3", "2-4", "2\u{2013}3", "2\u{2013}4"];

/// Score an idea for a profile, jitter included
///
/// Scoring formula (default weights):
/// score = (
///     15 per skill matching a required skill +
///      5 per skill mentioned in description/features +
///     12 per interest matching a target interest +
///      6 per interest matching a keyword +
///      3 per interest mentioned in description/audience/features +
///     difficulty bonus (experience table) +
///      8 if student-oriented +
///      5 if 2-3 or 2-4 time to market
/// ) * (0.3 if nothing matched, else 1.0)
///   + jitter in [0, 4)
pub fn calculate_match_score<'a, R: Rng + ?Sized>(
    idea: &'a IdeaRecord,
    profile: &UserProfile,
    weights: &ScoringWeights,
    rng: &mut R,
) -> ScoredCandidate<'a> {
    let (base, matching_skills, matching_interests) = calculate_base_score(idea, profile, weights);

    ScoredCandidate {
        idea,
        score: base + jitter(weights.jitter, rng),
        matching_skills,
        matching_interests,
    }
}

/// Deterministic part of the score with the matched skills and interests
///
/// Matched entries are always the profile's own spelling.
pub fn calculate_base_score(
    idea: &IdeaRecord,
    profile: &UserProfile,
    weights: &ScoringWeights,
) -> (f64, Vec<String>, Vec<String>) {
    let mut score = 0.0;
    let mut matching_skills: Vec<String> = Vec::new();
    let mut matching_interests: Vec<String> = Vec::new();

    let skill_text = idea.skill_text();
    for skill in &profile.skills {
        let skill_lower = skill.to_lowercase();

        if matches_any(&skill_lower, &idea.required_skills) {
            score += weights.required_skill;
            push_unique(&mut matching_skills, skill);
        }

        if skill_text.contains(&skill_lower) {
            score += weights.skill_mention;
            push_unique(&mut matching_skills, skill);
        }
    }

    let interest_text = idea.interest_text();
    for interest in &profile.interests {
        let interest_lower = interest.to_lowercase();

        if matches_any(&interest_lower, &idea.target_interests) {
            score += weights.target_interest;
            push_unique(&mut matching_interests, interest);
        }

        if matches_any(&interest_lower, &idea.keywords) {
            score += weights.keyword_interest;
            push_unique(&mut matching_interests, interest);
        }

        // Mentions boost the score but do not count as a match
        if interest_text.contains(&interest_lower) {
            score += weights.interest_mention;
        }
    }

    score += difficulty_bonus(profile.experience_level, idea.difficulty);

    if is_student_oriented(idea) {
        score += weights.student_bonus;
    }

    if is_fast_to_market(&idea.time_to_market) {
        score += weights.fast_to_market_bonus;
    }

    if matching_skills.is_empty() && matching_interests.is_empty() {
        score *= weights.no_match_factor;
    }

    (score, matching_skills, matching_interests)
}

/// Fit between the user's experience and the idea's difficulty
#[inline]
pub fn difficulty_bonus(level: ExperienceLevel, difficulty: Difficulty) -> f64 {
    match (level, difficulty) {
        (ExperienceLevel::Beginner, Difficulty::Easy) => 10.0,
        (ExperienceLevel::Beginner, Difficulty::Medium) => 2.0,
        (ExperienceLevel::Beginner, Difficulty::Hard) => -8.0,
        (ExperienceLevel::Intermediate, Difficulty::Easy) => 5.0,
        (ExperienceLevel::Intermediate, Difficulty::Medium) => 10.0,
        (ExperienceLevel::Intermediate, Difficulty::Hard) => 0.0,
        (ExperienceLevel::Advanced, Difficulty::Easy) => 2.0,
        (ExperienceLevel::Advanced, Difficulty::Medium) => 8.0,
        (ExperienceLevel::Advanced, Difficulty::Hard) => 10.0,
    }
}

/// Audience, description or title mention students, or the title mentions a campus
#[inline]
pub fn is_student_oriented(idea: &IdeaRecord) -> bool {
    let title = idea.title.to_lowercase();
    contains_any(&idea.target_audience.to_lowercase(), STUDENT_MARKERS)
        || contains_any(&idea.description.to_lowercase(), STUDENT_MARKERS)
        || contains_any(&title, STUDENT_MARKERS)
        || title.contains(CAMPUS_MARKER)
}

#[inline]
pub fn is_fast_to_market(time_to_market: &str) -> bool {
    contains_any(time_to_market, FAST_TO_MARKET_MARKERS)
}

#[inline]
fn jitter<R: Rng + ?Sized>(max: f64, rng: &mut R) -> f64 {
    if max > 0.0 {
        rng.gen::<f64>() * max
    } else {
        0.0
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
