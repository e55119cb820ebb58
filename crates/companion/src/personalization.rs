//! Personalized agent calls: store preferences, attach the reader's context
//! to the prompt, and filter section suggestions.

use std::sync::Arc;

use readpal_core::agent::ResponderAgent;
use readpal_core::error::AgentError;
use readpal_core::reading::{PersonalizedResponse, ReadingContext};
use tracing::{debug, info};

use crate::preferences::PreferenceStore;
use crate::progress::ProgressTracker;
use crate::suggestions::SectionCatalog;

/// Prefix `query` with a serialized reading context.
pub fn contextual_prompt(context_json: &str, query: &str) -> String {
    format!("Context: {context_json}\nQuery: {query}")
}

pub struct PersonalizationOrchestrator {
    preferences: Arc<PreferenceStore>,
    progress: Arc<ProgressTracker>,
    sections: Arc<SectionCatalog>,
}

impl PersonalizationOrchestrator {
    pub fn new(
        preferences: Arc<PreferenceStore>,
        progress: Arc<ProgressTracker>,
        sections: Arc<SectionCatalog>,
    ) -> Self {
        Self {
            preferences,
            progress,
            sections,
        }
    }

    /// The reader's stored interests and the current progress snapshot.
    pub fn context_for(&self, user_id: &str) -> ReadingContext {
        ReadingContext {
            user_interests: self.preferences.get(user_id),
            reading_progress: self.progress.snapshot(),
        }
    }

    /// Run `query` through `agent` with the reader's context attached.
    ///
    /// Non-empty `interests` replace the stored ones first; `None` or an
    /// empty list leaves them as they are.
    pub async fn run(
        &self,
        agent: &dyn ResponderAgent,
        user_id: &str,
        query: &str,
        interests: Option<&[String]>,
    ) -> Result<PersonalizedResponse, AgentError> {
        if let Some(interests) = interests.filter(|i| !i.is_empty()) {
            self.preferences.set(user_id, interests.to_vec());
        }

        let context = self.context_for(user_id);
        let context_json = context.to_json().map_err(|e| AgentError::InvocationFailed {
            cause: format!("failed to serialize reading context: {e}"),
        })?;
        debug!(user_id, role = %agent.role(), context = %context_json, "Personalized prompt assembled");

        let response = agent
            .run(&contextual_prompt(&context_json, query))
            .await
            .map_err(|e| match e {
                AgentError::InvocationFailed { .. } => e,
                other => AgentError::InvocationFailed {
                    cause: other.to_string(),
                },
            })?;

        // Interests may have changed while the agent ran.
        let suggestions = self.sections.suggest_for(&self.preferences.get(user_id));
        info!(user_id, suggestions = suggestions.len(), "Personalized response ready");

        Ok(PersonalizedResponse {
            content: response.content,
            suggestions,
        })
    }
}
