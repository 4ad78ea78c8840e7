// Core algorithm exports
pub mod enhance;
pub mod matcher;
pub mod playback;
pub mod progress;
pub mod scoring;
pub mod selection;
pub mod text;

pub use enhance::{enhance_description, experience_note};
pub use matcher::{Matcher, MatchResult};
pub use playback::{PlaybackContext, PlaybackHandle};
pub use progress::{roadmap_steps, toggle_step, ProgressError, RoadmapStep};
pub use scoring::{calculate_base_score, calculate_match_score, difficulty_bonus};
pub use selection::{result_count, select_results};
pub use text::{fuzzy_matches, matches_any};
