//! # ReadPal Companion
//!
//! Per-document knowledge/agent lifecycle, reading progress, and
//! interest-based personalization. Everything here talks to the
//! collaborator traits in `readpal-core`, never to a concrete provider.
//!
//! Both document caches coalesce concurrent first access: one ingestion and
//! one agent build per URL no matter how many requests arrive together.

pub mod cache;
pub mod companion;
pub mod knowledge_cache;
pub mod personalization;
pub mod preferences;
pub mod progress;
pub mod prompts;
pub mod registry;
pub mod single_flight;
pub mod suggestions;

pub use cache::{Cache, EvictionPolicy, LeastRecentlyUsed, NeverEvict};
pub use companion::{CompanionStats, ReadingCompanion};
pub use knowledge_cache::KnowledgeCache;
pub use personalization::PersonalizationOrchestrator;
pub use preferences::PreferenceStore;
pub use progress::ProgressTracker;
pub use registry::AgentRegistry;
pub use single_flight::SingleFlight;
pub use suggestions::{SectionCatalog, suggest};

#[cfg(test)]
pub(crate) mod test_support;
