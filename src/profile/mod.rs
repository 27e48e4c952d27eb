use serde::{Deserialize, Serialize};

use crate::errors::CoachError;

/// The single user record that personalizes the data-driven modes.
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub age: u32,
    pub gender: String,
    pub conversation_history: String,
    pub emotional_state: String,
    pub preferred_support_style: String,
    pub topics_of_interest: String,
    pub previous_advice_feedback: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            age: 29,
            gender: "male".into(),
            conversation_history: "I've been experiencing work-related stress lately.".into(),
            emotional_state: "anxious".into(),
            preferred_support_style: "insightful and data-driven".into(),
            topics_of_interest: "work-life balance, productivity, mental well-being".into(),
            previous_advice_feedback: "Finds value in data-backed insights and prefers actionable steps".into(),
        }
    }
}

impl UserProfile {
    /// Reject records that would interpolate blanks into a prompt.
    pub fn ensure_complete(&self) -> Result<(), CoachError> {
        if self.age == 0 {
            return Err(CoachError::ProfileUnavailable("age is not set".into()));
        }
        let fields = [
            ("gender", &self.gender),
            ("conversation_history", &self.conversation_history),
            ("emotional_state", &self.emotional_state),
            ("preferred_support_style", &self.preferred_support_style),
            ("topics_of_interest", &self.topics_of_interest),
            ("previous_advice_feedback", &self.previous_advice_feedback),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CoachError::ProfileUnavailable(format!("{name} is empty")));
            }
        }
        Ok(())
    }

    /// The personalization sentence prepended to data-driven prompts.
    pub fn customization(&self) -> String {
        format!(
            "User is a {age}-year-old {gender} who is currently feeling {state}. \
They previously mentioned: '{history}' and prefer '{style}'. \
They are interested in topics like '{topics}' and have given feedback that they '{feedback}'.",
            age = self.age,
            gender = self.gender,
            state = self.emotional_state,
            history = self.conversation_history,
            style = self.preferred_support_style,
            topics = self.topics_of_interest,
            feedback = self.previous_advice_feedback,
        )
    }
}
