//! Knowledge traits. A document becomes queryable retrieval context.
//!
//! A [`KnowledgeSource`] ingests a document and hands back a
//! [`KnowledgeHandle`]. Agents query the handle for passages relevant to a
//! prompt. How the source fetches, chunks or embeds is its own business.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::KnowledgeError;

/// Identifier of a source document.
///
/// Compared byte-for-byte: no normalization of trailing slashes, case or
/// query-parameter order is performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentUrl(String);

impl DocumentUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DocumentUrl {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DocumentUrl {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for DocumentUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A retrieved passage of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    /// Position of the chunk within its document.
    pub chunk_index: usize,
    /// The passage text.
    pub content: String,
    /// Where the passage came from (document URL).
    pub source: String,
    /// Relevance to the query that retrieved it.
    pub similarity: f32,
}

/// A queryable, read-only knowledge base built from one document.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    /// The document this knowledge base was built from.
    fn document_url(&self) -> &DocumentUrl;

    /// Number of chunks ingested. Zero means the document produced no content.
    fn chunk_count(&self) -> usize;

    /// Return up to `top_k` chunks most relevant to `query`, best first.
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<KnowledgeChunk>, KnowledgeError>;
}

/// Shared handle to a built knowledge base.
pub type KnowledgeHandle = Arc<dyn KnowledgeBase>;

/// Builds knowledge bases from document URLs.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// A human-readable name for this source (e.g., "pdf").
    fn name(&self) -> &str;

    /// Ingest the document at `url`. Potentially slow and network-bound.
    async fn build(&self, url: &DocumentUrl) -> Result<KnowledgeHandle, KnowledgeError>;
}
