//! `ReadingCompanion`: the context object every entry point shares.
//!
//! Owns the document caches, the progress tracker, the preference store and
//! the section catalog, and exposes the reading operations on top of them.
//! Construct one per process and hand it around in an `Arc`.

use std::sync::Arc;

use readpal_config::CacheConfig;
use readpal_core::agent::{AgentFactory, AgentResponse, AgentRole, AgentSet};
use readpal_core::error::Result;
use readpal_core::knowledge::{DocumentUrl, KnowledgeSource};
use readpal_core::reading::{PersonalizedResponse, ProgressSnapshot, ReadingContext, UserPreferences};
use serde::Serialize;
use tracing::info;

use crate::cache::policy_for_limit;
use crate::knowledge_cache::KnowledgeCache;
use crate::personalization::PersonalizationOrchestrator;
use crate::preferences::PreferenceStore;
use crate::progress::ProgressTracker;
use crate::prompts::{BRIEF_OVERVIEW_PROMPT, SUMMARY_PROMPT, insight_prompt, personalized_insight_prompt};
use crate::registry::AgentRegistry;
use crate::suggestions::SectionCatalog;

/// Point-in-time counters, reported by `/health` and at shutdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompanionStats {
    /// Knowledge bases currently cached.
    pub documents: usize,
    /// Agent sets currently cached.
    pub agent_sets: usize,
    /// Ingestions started since startup.
    pub knowledge_builds: u64,
    /// Cache entries dropped by eviction (documents, agents and users).
    pub evictions: u64,
    pub users: usize,
    pub tracked_sections: usize,
    pub known_sections: usize,
}

pub struct ReadingCompanion {
    registry: AgentRegistry,
    preferences: Arc<PreferenceStore>,
    progress: Arc<ProgressTracker>,
    sections: Arc<SectionCatalog>,
    orchestrator: PersonalizationOrchestrator,
}

impl ReadingCompanion {
    pub fn new(
        source: Arc<dyn KnowledgeSource>,
        factory: Arc<dyn AgentFactory>,
        cache: &CacheConfig,
    ) -> Self {
        let knowledge = KnowledgeCache::new(source, policy_for_limit(cache.max_documents));
        let registry = AgentRegistry::new(knowledge, factory, policy_for_limit(cache.max_documents));
        let preferences = Arc::new(PreferenceStore::new(policy_for_limit(cache.max_users)));
        let progress = Arc::new(ProgressTracker::new());
        let sections = Arc::new(SectionCatalog::default());
        let orchestrator =
            PersonalizationOrchestrator::new(preferences.clone(), progress.clone(), sections.clone());

        info!(
            max_documents = cache.max_documents,
            max_users = cache.max_users,
            "Reading companion ready"
        );

        Self {
            registry,
            preferences,
            progress,
            sections,
            orchestrator,
        }
    }

    /// The four agents for `url`, ingesting the document on first use.
    pub async fn resolve_agents(&self, url: &DocumentUrl) -> Result<AgentSet> {
        self.registry.resolve(url).await
    }

    async fn run(&self, url: &DocumentUrl, role: AgentRole, prompt: &str) -> Result<AgentResponse> {
        let agents = self.resolve_agents(url).await?;
        info!(url = %url, role = %role, "Running agent");
        Ok(agents.get(role).run(prompt).await?)
    }

    pub async fn ask_question(&self, url: &DocumentUrl, question: &str) -> Result<AgentResponse> {
        self.run(url, AgentRole::Qa, question).await
    }

    pub async fn summarize(&self, url: &DocumentUrl) -> Result<AgentResponse> {
        self.run(url, AgentRole::Summary, SUMMARY_PROMPT).await
    }

    /// A brief overview from the summary agent, then insights built on it.
    pub async fn get_insights(&self, url: &DocumentUrl) -> Result<AgentResponse> {
        let overview = self.run(url, AgentRole::Summary, BRIEF_OVERVIEW_PROMPT).await?;
        self.run(url, AgentRole::Insight, &insight_prompt(&overview.content))
            .await
    }

    /// Like [`get_insights`](Self::get_insights), tailored to `user_id`.
    ///
    /// Supplied preferences replace the user's stored interests; the reading
    /// context travels with the prompt and suggestions come back with it.
    pub async fn get_personalized_insights(
        &self,
        url: &DocumentUrl,
        user_id: &str,
        preferences: Option<&UserPreferences>,
    ) -> Result<PersonalizedResponse> {
        let agents = self.resolve_agents(url).await?;
        let overview = agents.summary.run(BRIEF_OVERVIEW_PROMPT).await?;
        let prompt = personalized_insight_prompt(&overview.content, preferences);

        info!(url = %url, user_id, "Running personalized insights");
        let response = self
            .orchestrator
            .run(
                agents.insight.as_ref(),
                user_id,
                &prompt,
                preferences.map(|p| p.interests.as_slice()),
            )
            .await?;
        Ok(response)
    }

    /// Record progress for `section`. Progress is shared by all readers;
    /// `user_id` is only logged.
    pub fn update_progress(&self, user_id: &str, section: &str, progress: f64) -> ProgressSnapshot {
        info!(user_id, section, progress, "Updating reading progress");
        self.progress.update(section, progress)
    }

    /// Known sections matching the user's stored interests.
    pub fn get_suggestions(&self, user_id: &str) -> Vec<String> {
        self.sections.suggest_for(&self.preferences.get(user_id))
    }

    /// Add section ids suggestions can be drawn from.
    pub fn register_sections<I, S>(&self, sections: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sections.register(sections);
    }

    pub fn reading_context(&self, user_id: &str) -> ReadingContext {
        self.orchestrator.context_for(user_id)
    }

    pub fn stats(&self) -> CompanionStats {
        let knowledge = self.registry.knowledge();
        CompanionStats {
            documents: knowledge.len(),
            agent_sets: self.registry.len(),
            knowledge_builds: knowledge.builds(),
            evictions: knowledge.evictions() + self.registry.evictions() + self.preferences.evictions(),
            users: self.preferences.len(),
            tracked_sections: self.progress.len(),
            known_sections: self.sections.len(),
        }
    }

    /// Drop all cached state and return the final counters.
    pub fn shutdown(&self) -> CompanionStats {
        let stats = self.stats();
        self.registry.clear();
        self.preferences.clear();
        self.progress.clear();
        self.sections.clear();
        info!(
            documents = stats.documents,
            knowledge_builds = stats.knowledge_builds,
            evictions = stats.evictions,
            users = stats.users,
            tracked_sections = stats.tracked_sections,
            "Reading companion shut down"
        );
        stats
    }
}
