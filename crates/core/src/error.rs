//! Error types for the ReadPal domain.
//!
//! One enum per bounded context; [`Error`] wraps them for callers that
//! span several (the companion, the gateway).

use thiserror::Error;

use crate::agent::AgentRole;

/// The top-level error type for all ReadPal operations.
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures while turning a document into a knowledge base, or querying it.
#[derive(Debug, Clone, Error)]
pub enum KnowledgeError {
    /// Ingestion finished but produced no content. Not retried.
    #[error("No content could be ingested from {url}")]
    EmptyDocument { url: String },

    /// The ingestion pipeline failed (fetch, extraction, embedding).
    #[error("Ingestion failed for {url}: {cause}")]
    IngestionFailed { url: String, cause: String },

    #[error("Knowledge search failed: {0}")]
    SearchFailed(String),
}

/// Failures while building or running a role agent.
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    #[error("Failed to set up {role} agent: {cause}")]
    SetupFailed { role: AgentRole, cause: String },

    #[error("Agent invocation failed: {cause}")]
    InvocationFailed { cause: String },
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError {
        status_code: u16,
        message: String,
    },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl From<ProviderError> for AgentError {
    fn from(err: ProviderError) -> Self {
        AgentError::InvocationFailed {
            cause: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_names_the_url() {
        let err = Error::Knowledge(KnowledgeError::EmptyDocument {
            url: "https://example.com/book.pdf".into(),
        });
        assert!(err.to_string().contains("example.com/book.pdf"));
    }

    #[test]
    fn setup_failure_names_the_role() {
        let err = AgentError::SetupFailed {
            role: AgentRole::Insight,
            cause: "no model configured".into(),
        };
        assert!(err.to_string().contains("insight"));
        assert!(err.to_string().contains("no model configured"));
    }

    #[test]
    fn provider_error_becomes_invocation_failure() {
        let err: AgentError = ProviderError::ApiError {
            status_code: 500,
            message: "upstream exploded".into(),
        }
        .into();
        match err {
            AgentError::InvocationFailed { cause } => {
                assert!(cause.contains("500"));
                assert!(cause.contains("upstream exploded"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
