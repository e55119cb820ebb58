//! Reader-facing value types: preferences, progress, personalized output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Section id → progress fraction. Values are stored as given, without range checks.
pub type ProgressSnapshot = BTreeMap<String, f64>;

/// What a reader told us about themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Interest tags, in the order supplied.
    pub interests: Vec<String>,

    /// Free-form reading level ("beginner", "intermediate", ...).
    #[serde(default = "default_reading_level")]
    pub reading_level: String,

    /// Parts of the document the reader wants to concentrate on.
    #[serde(default)]
    pub focus_areas: Vec<String>,
}

fn default_reading_level() -> String {
    "intermediate".into()
}

impl UserPreferences {
    pub fn with_interests(interests: Vec<String>) -> Self {
        Self {
            interests,
            reading_level: default_reading_level(),
            focus_areas: Vec::new(),
        }
    }
}

/// Personalization context prepended to a prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingContext {
    pub user_interests: Vec<String>,
    pub reading_progress: ProgressSnapshot,
}

impl ReadingContext {
    /// Serialize to the JSON text embedded in prompts.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Result of a personalized request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedResponse {
    pub content: String,
    pub suggestions: Vec<String>,
}
