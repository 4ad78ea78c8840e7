// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Difficulty, ExperienceLevel, IdeaPatch, IdeaRecord, NewIdea, ResultSet, ScoredCandidate,
    ScoringWeights, SelectionPolicy, StartupIdea, UserProfile,
};
pub use requests::{
    AddFavoriteRequest, GenerateIdeasRequest, NarrationRequest, SaveProgressRequest, SearchQuery,
    ToggleStepRequest,
};
pub use responses::{
    CacheStats, ErrorResponse, FavoriteStatusResponse, GenerateIdeasResponse, HealthResponse,
    NarrationStatusResponse, ProgressResponse,
};
