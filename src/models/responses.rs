use serde::{Deserialize, Serialize};
use crate::core::progress::RoadmapStep;
use crate::models::domain::StartupIdea;

/// Response for the generate ideas endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateIdeasResponse {
    pub ideas: Vec<StartupIdea>,
    pub total_candidates: usize,
    pub data_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub catalog: String,
    pub cache: Option<CacheStats>,
    pub active_narrations: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Catalog cache statistics reported by the health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub redis_enabled: bool,
    pub ttl_secs: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Favorite status of one idea
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatusResponse {
    pub idea_id: String,
    pub favorited: bool,
}

/// Roadmap state of one idea
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub idea_id: String,
    pub steps: Vec<RoadmapStep>,
    pub completed: usize,
    pub total: usize,
}

/// Active narration for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrationStatusResponse {
    pub session_id: String,
    pub idea_id: Option<String>,
}
