use crate::models::ExperienceLevel;

/// Closing sentence appended to descriptions, by experience level
pub fn experience_note(level: ExperienceLevel) -> &'static str {
    match level {
        ExperienceLevel::Beginner => {
            "Perfect for getting started with entrepreneurship while building valuable experience."
        }
        ExperienceLevel::Intermediate => {
            "A great opportunity to leverage your growing skills and create meaningful impact."
        }
        ExperienceLevel::Advanced => {
            "An excellent chance to apply your expertise and potentially scale into a significant business."
        }
    }
}

/// Append the experience-level note to an idea description
pub fn enhance_description(description: &str, level: ExperienceLevel) -> String {
    format!("{} {}", description, experience_note(level))
}
