use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{ExperienceLevel, StartupIdea, UserProfile};

/// Request to generate matching ideas
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateIdeasRequest {
    #[validate(length(min = 1, max = 50))]
    pub skills: Vec<String>,
    #[validate(length(min = 1, max = 50))]
    pub interests: Vec<String>,
    #[serde(alias = "experience_level", rename = "experienceLevel")]
    pub experience_level: ExperienceLevel,
}

impl GenerateIdeasRequest {
    pub fn to_profile(&self) -> UserProfile {
        UserProfile::new(&self.skills, &self.interests, self.experience_level)
    }
}

/// Catalog search query
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, max = 200))]
    pub q: String,
}

/// Request to store an idea among the caller's favorites
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddFavoriteRequest {
    pub idea: StartupIdea,
}

/// Full replacement of the roadmap completion flags for one idea
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProgressRequest {
    #[serde(alias = "completed_steps", rename = "completedSteps")]
    pub completed_steps: Vec<bool>,
}

/// Request to flip one roadmap step
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ToggleStepRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "step_id", rename = "stepId")]
    pub step_id: String,
}

/// Request to narrate an idea card
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NarrationRequest {
    #[validate(length(min = 1, max = 128))]
    #[serde(alias = "session_id", rename = "sessionId")]
    pub session_id: String,
    pub idea: StartupIdea,
    #[serde(default)]
    pub expanded: bool,
}
