use serde::{Deserialize, Serialize};
use std::fmt;

/// Implementation difficulty of a catalog idea
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-declared experience of the user asking for ideas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExperienceLevel::Beginner => "Beginner",
            ExperienceLevel::Intermediate => "Intermediate",
            ExperienceLevel::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

/// Catalog entry as stored in the `startup_ideas` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub market_size: String,
    pub difficulty: Difficulty,
    pub time_to_market: String,
    pub revenue_model: String,
    pub target_audience: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    pub competitive_advantage: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub target_interests: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl IdeaRecord {
    /// Description and key features, the text searched for skill mentions
    pub fn skill_text(&self) -> String {
        format!("{} {}", self.description, self.key_features.join(" ")).to_lowercase()
    }

    /// Description, audience and key features, the text searched for interest mentions
    pub fn interest_text(&self) -> String {
        format!(
            "{} {} {}",
            self.description,
            self.target_audience,
            self.key_features.join(" ")
        )
        .to_lowercase()
    }
}

fn default_true() -> bool { true }

/// Catalog entry without the server-assigned fields, used for inserts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIdea {
    pub title: String,
    pub description: String,
    pub market_size: String,
    pub difficulty: Difficulty,
    pub time_to_market: String,
    pub revenue_model: String,
    pub target_audience: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    pub competitive_advantage: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub target_interests: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Partial update of a catalog entry; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdeaPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_to_market: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitive_advantage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_interests: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// What a single user is looking for, built per request
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub experience_level: ExperienceLevel,
}

impl UserProfile {
    /// Build a profile, trimming entries and dropping blanks and
    /// case-insensitive repeats (first spelling wins)
    pub fn new<S, I>(skills: S, interests: I, experience_level: ExperienceLevel) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            skills: normalize_entries(skills),
            interests: normalize_entries(interests),
            experience_level,
        }
    }
}

fn normalize_entries<T>(entries: T) -> Vec<String>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for entry in entries {
        let trimmed = entry.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        let lowered = trimmed.to_lowercase();
        if seen.contains(&lowered) {
            continue;
        }
        seen.push(lowered);
        out.push(trimmed.to_string());
    }
    out
}

/// An idea paired with its score for one profile
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub idea: &'a IdeaRecord,
    pub score: f64,
    pub matching_skills: Vec<String>,
    pub matching_interests: Vec<String>,
}

impl ScoredCandidate<'_> {
    pub fn has_matches(&self) -> bool {
        !self.matching_skills.is_empty() || !self.matching_interests.is_empty()
    }
}

/// Idea as returned to clients, annotated for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupIdea {
    pub id: String,
    pub title: String,
    pub description: String,
    pub market_size: String,
    pub difficulty: Difficulty,
    pub time_to_market: String,
    pub revenue_model: String,
    pub target_audience: String,
    pub key_features: Vec<String>,
    pub competitive_advantage: String,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub matching_interests: Vec<String>,
}

impl StartupIdea {
    /// Plain view of a catalog entry with no per-user annotations
    pub fn unannotated(record: &IdeaRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            market_size: record.market_size.clone(),
            difficulty: record.difficulty,
            time_to_market: record.time_to_market.clone(),
            revenue_model: record.revenue_model.clone(),
            target_audience: record.target_audience.clone(),
            key_features: record.key_features.clone(),
            competitive_advantage: record.competitive_advantage.clone(),
            matching_skills: Vec::new(),
            matching_interests: Vec::new(),
        }
    }
}

/// Outcome of one idea generation request
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub ideas: Vec<StartupIdea>,
    pub catalog_size: usize,
    pub data_available: bool,
}

impl ResultSet {
    pub fn unavailable() -> Self {
        Self {
            ideas: Vec::new(),
            catalog_size: 0,
            data_available: false,
        }
    }
}

/// Scoring weights; defaults are the production ranking constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub required_skill: f64,
    pub skill_mention: f64,
    pub target_interest: f64,
    pub keyword_interest: f64,
    pub interest_mention: f64,
    pub student_bonus: f64,
    pub fast_to_market_bonus: f64,
    pub no_match_factor: f64,
    pub jitter: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            required_skill: 15.0,
            skill_mention: 5.0,
            target_interest: 12.0,
            keyword_interest: 6.0,
            interest_mention: 3.0,
            student_bonus: 8.0,
            fast_to_market_bonus: 5.0,
            no_match_factor: 0.3,
            jitter: 4.0,
        }
    }
}

/// How many results to return for a given match quality
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPolicy {
    pub high_quality_threshold: f64,
    pub default_results: usize,
    pub max_results: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            high_quality_threshold: 20.0,
            default_results: 4,
            max_results: 8,
        }
    }
}
