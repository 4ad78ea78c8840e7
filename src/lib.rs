//! Idea Matcher - startup idea recommendation service
//!
//! Ranks a curated catalog of startup ideas against a user's skills,
//! interests and experience level, and backs the per-user favorites,
//! roadmap progress and narration features of the app.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchResult, PlaybackContext};
pub use models::{
    ExperienceLevel, GenerateIdeasRequest, GenerateIdeasResponse, IdeaRecord, ResultSet,
    ScoringWeights, SelectionPolicy, StartupIdea, UserProfile,
};
pub use services::{IdeaCatalog, IdeaService, StaticCatalog};
