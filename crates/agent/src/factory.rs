//! `AgentFactory` that builds [`RagResponder`]s over one shared provider.

use std::sync::Arc;

use readpal_config::AppConfig;
use readpal_core::agent::{AgentFactory, AgentRole, ResponderAgent};
use readpal_core::error::AgentError;
use readpal_core::knowledge::KnowledgeHandle;
use readpal_core::provider::Provider;
use tracing::debug;

use crate::rag::{GenerationSettings, RagResponder};

pub struct ProviderAgentFactory {
    provider: Arc<dyn Provider>,
    settings: GenerationSettings,
}

impl ProviderAgentFactory {
    pub fn new(provider: Arc<dyn Provider>, settings: GenerationSettings) -> Self {
        Self { provider, settings }
    }

    /// Model, temperature and token limit from the top-level config; top-k
    /// from the knowledge section.
    pub fn from_config(config: &AppConfig, provider: Arc<dyn Provider>) -> Self {
        Self::new(
            provider,
            GenerationSettings {
                model: config.default_model.clone(),
                temperature: config.default_temperature,
                max_tokens: Some(config.default_max_tokens),
                top_k: config.knowledge.top_k,
            },
        )
    }
}

impl AgentFactory for ProviderAgentFactory {
    fn create(
        &self,
        role: AgentRole,
        knowledge: KnowledgeHandle,
        instructions: &[&str],
    ) -> Result<Arc<dyn ResponderAgent>, AgentError> {
        if self.settings.model.trim().is_empty() {
            return Err(AgentError::SetupFailed {
                role,
                cause: "no model configured".into(),
            });
        }
        if self.settings.top_k == 0 {
            return Err(AgentError::SetupFailed {
                role,
                cause: "retrieval top_k must be greater than zero".into(),
            });
        }

        debug!(
            role = %role,
            provider = self.provider.name(),
            model = %self.settings.model,
            url = %knowledge.document_url(),
            "Creating agent"
        );

        Ok(Arc::new(RagResponder::new(
            self.provider.clone(),
            self.settings.clone(),
            role,
            knowledge,
            instructions,
        )))
    }
}
