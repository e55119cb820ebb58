//! # ReadPal Core
//!
//! Domain types, traits, and error definitions for the ReadPal reading
//! companion. This crate has **no framework dependencies**: it defines the
//! model every other crate implements against.
//!
//! ## Seams
//!
//! The expensive collaborators are traits here, implemented elsewhere:
//! - [`Provider`]: an LLM backend (chat completions, embeddings)
//! - [`KnowledgeSource`]: turns a document URL into a queryable [`KnowledgeBase`]
//! - [`AgentFactory`] / [`ResponderAgent`]: role-specialised agents bound to a knowledge base
//!
//! The caching and personalization layer (`readpal-companion`) only ever
//! talks to these traits, which keeps it testable with in-process mocks.

pub mod agent;
pub mod error;
pub mod knowledge;
pub mod message;
pub mod provider;
pub mod reading;

// Re-export key types at crate root for ergonomics
pub use agent::{AgentFactory, AgentResponse, AgentRole, AgentSet, ResponderAgent, RoleProfile};
pub use error::{AgentError, Error, KnowledgeError, ProviderError, Result};
pub use knowledge::{DocumentUrl, KnowledgeBase, KnowledgeChunk, KnowledgeHandle, KnowledgeSource};
pub use message::{Message, Role};
pub use provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse, Usage,
};
pub use reading::{PersonalizedResponse, ProgressSnapshot, ReadingContext, UserPreferences};
