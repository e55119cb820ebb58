//! One `AgentSet` per document URL, built lazily on first access.

use std::sync::Arc;

use readpal_core::agent::{AgentFactory, AgentRole, AgentSet, ResponderAgent};
use readpal_core::error::{AgentError, Error};
use readpal_core::knowledge::{DocumentUrl, KnowledgeHandle};
use tracing::{debug, info};

use crate::cache::EvictionPolicy;
use crate::knowledge_cache::KnowledgeCache;
use crate::single_flight::SingleFlight;

pub struct AgentRegistry {
    knowledge: KnowledgeCache,
    factory: Arc<dyn AgentFactory>,
    agents: SingleFlight<AgentSet, Error>,
}

impl AgentRegistry {
    pub fn new(
        knowledge: KnowledgeCache,
        factory: Arc<dyn AgentFactory>,
        policy: Box<dyn EvictionPolicy>,
    ) -> Self {
        Self {
            knowledge,
            factory,
            agents: SingleFlight::new(policy),
        }
    }

    /// The agents for `url`, creating the knowledge base and all four agents
    /// on first access. Knowledge errors pass through unchanged.
    pub async fn resolve(&self, url: &DocumentUrl) -> Result<AgentSet, Error> {
        let resolved = self
            .agents
            .get_or_try_init(url.as_str(), move || async move {
                let handle = self.knowledge.resolve(url).await?;
                Ok::<_, Error>(self.build_set(url, handle)?)
            })
            .await?;

        if !resolved.built {
            debug!(url = %url, "Agent cache hit");
        }
        Ok(resolved.value)
    }

    fn build_set(&self, url: &DocumentUrl, handle: KnowledgeHandle) -> Result<AgentSet, AgentError> {
        info!(url = %url, "Creating agents");
        let agents = AgentSet {
            qa: self.create(AgentRole::Qa, &handle)?,
            summary: self.create(AgentRole::Summary, &handle)?,
            insight: self.create(AgentRole::Insight, &handle)?,
            personalization: self.create(AgentRole::Personalization, &handle)?,
        };
        info!(url = %url, "Agents ready");
        Ok(agents)
    }

    fn create(&self, role: AgentRole, handle: &KnowledgeHandle) -> Result<Arc<dyn ResponderAgent>, AgentError> {
        self.factory
            .create(role, handle.clone(), role.profile().instructions)
            .map_err(|e| match e {
                AgentError::SetupFailed { .. } => e,
                other => AgentError::SetupFailed {
                    role,
                    cause: other.to_string(),
                },
            })
    }

    pub fn knowledge(&self) -> &KnowledgeCache {
        &self.knowledge
    }

    /// Documents with a live agent set (or one being built).
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn evictions(&self) -> u64 {
        self.agents.evictions()
    }

    /// Drop every cached agent set and knowledge handle.
    pub fn clear(&self) {
        self.agents.clear();
        self.knowledge.clear();
    }
}
