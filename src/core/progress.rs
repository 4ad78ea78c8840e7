use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed launch roadmap every idea follows
pub const ROADMAP: &[(&str, &str)] = &[
    ("validate", "Validate Idea"),
    ("research", "Market Research"),
    ("mvp", "Build MVP"),
    ("launch", "Launch"),
    ("monetize", "Monetize"),
    ("scale", "Scale"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("Unknown roadmap step: {0}")]
    UnknownStep(String),

    #[error("Step {0} is locked until the previous step is completed")]
    Locked(String),
}

/// One roadmap step with its completion flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub id: String,
    pub title: String,
    pub completed: bool,
}

/// Pad or cut stored completion flags to the roadmap length
pub fn normalize_completion(stored: &[bool]) -> Vec<bool> {
    (0..ROADMAP.len())
        .map(|i| stored.get(i).copied().unwrap_or(false))
        .collect()
}

pub fn roadmap_steps(completed: &[bool]) -> Vec<RoadmapStep> {
    let flags = normalize_completion(completed);
    ROADMAP
        .iter()
        .zip(flags)
        .map(|((id, title), completed)| RoadmapStep {
            id: id.to_string(),
            title: title.to_string(),
            completed,
        })
        .collect()
}

/// Flip one step
///
/// A step can be completed once its predecessor is; un-completing a step
/// also clears every step after it.
pub fn toggle_step(completed: &[bool], step_id: &str) -> Result<Vec<bool>, ProgressError> {
    let index = ROADMAP
        .iter()
        .position(|(id, _)| *id == step_id)
        .ok_or_else(|| ProgressError::UnknownStep(step_id.to_string()))?;

    let mut flags = normalize_completion(completed);

    if flags[index] {
        for flag in flags.iter_mut().skip(index) {
            *flag = false;
        }
        return Ok(flags);
    }

    if index > 0 && !flags[index - 1] {
        return Err(ProgressError::Locked(step_id.to_string()));
    }

    flags[index] = true;
    Ok(flags)
}
