//! `KnowledgeSource` over fetched PDF (or plain-text) documents.
//!
//! # Pipeline
//!
//! 1. Fetch the URL (size-capped)
//! 2. Extract text on a blocking thread
//! 3. Chunk with overlap
//! 4. Embed chunks in batches when an embedding model is configured
//! 5. Hand back a [`DocumentIndex`]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use readpal_config::KnowledgeConfig;
use readpal_core::error::KnowledgeError;
use readpal_core::knowledge::{DocumentUrl, KnowledgeHandle, KnowledgeSource};
use readpal_core::provider::{EmbeddingRequest, Provider};
use tracing::{debug, info};

use crate::chunker::{chunk_text, TextChunk};
use crate::extract::extract_text;
use crate::fetch::DocumentFetcher;
use crate::index::{DocumentIndex, Retrieval};

pub struct PdfKnowledgeSource {
    fetcher: DocumentFetcher,
    provider: Arc<dyn Provider>,
    embedding_model: Option<String>,
    chunk_size: usize,
    chunk_overlap: usize,
    embedding_batch_size: usize,
}

impl PdfKnowledgeSource {
    pub fn new(provider: Arc<dyn Provider>, config: &KnowledgeConfig) -> Self {
        Self {
            fetcher: DocumentFetcher::new(
                Duration::from_secs(config.fetch_timeout_secs),
                config.max_document_bytes,
            ),
            provider,
            embedding_model: config.active_embedding_model().map(String::from),
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            embedding_batch_size: config.embedding_batch_size.max(1),
        }
    }

    /// Chunk `text` and index it. Split from `build` so ingestion can be
    /// exercised without a network fetch.
    pub async fn index_text(&self, url: &DocumentUrl, text: &str) -> Result<DocumentIndex, KnowledgeError> {
        let chunks = chunk_text(text, self.chunk_size, self.chunk_overlap);
        if chunks.is_empty() {
            return Err(KnowledgeError::EmptyDocument { url: url.to_string() });
        }

        let retrieval = match &self.embedding_model {
            Some(model) => Retrieval::Embedding {
                provider: self.provider.clone(),
                model: model.clone(),
                vectors: self.embed_chunks(url, model, &chunks).await?,
            },
            None => Retrieval::Keyword,
        };

        Ok(DocumentIndex::new(url.clone(), chunks, retrieval))
    }

    async fn embed_chunks(
        &self,
        url: &DocumentUrl,
        model: &str,
        chunks: &[TextChunk],
    ) -> Result<Vec<Vec<f32>>, KnowledgeError> {
        let mut vectors = Vec::with_capacity(chunks.len());

        for batch in chunks.chunks(self.embedding_batch_size) {
            let response = self
                .provider
                .embed(EmbeddingRequest::new(
                    model,
                    batch.iter().map(|c| c.content.clone()).collect(),
                ))
                .await
                .map_err(|e| ingestion_failed(url, format!("embedding failed: {e}")))?;

            if response.embeddings.len() != batch.len() {
                return Err(ingestion_failed(
                    url,
                    format!(
                        "embedding count mismatch: sent {}, got {}",
                        batch.len(),
                        response.embeddings.len()
                    ),
                ));
            }
            vectors.extend(response.embeddings);
        }

        debug!(url = %url, vectors = vectors.len(), "Chunks embedded");
        Ok(vectors)
    }
}

fn ingestion_failed(url: &DocumentUrl, cause: impl Into<String>) -> KnowledgeError {
    KnowledgeError::IngestionFailed {
        url: url.to_string(),
        cause: cause.into(),
    }
}

#[async_trait]
impl KnowledgeSource for PdfKnowledgeSource {
    fn name(&self) -> &str {
        "pdf"
    }

    async fn build(&self, url: &DocumentUrl) -> Result<KnowledgeHandle, KnowledgeError> {
        info!(url = %url, "Starting knowledge base creation");

        let bytes = self
            .fetcher
            .fetch(url.as_str())
            .await
            .map_err(|e| ingestion_failed(url, e.to_string()))?;

        let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
            .await
            .map_err(|e| ingestion_failed(url, format!("extraction task failed: {e}")))?
            .map_err(|e| ingestion_failed(url, e.to_string()))?;

        let index = self.index_text(url, &text).await?;

        info!(
            url = %url,
            chunks = index.chunks().len(),
            embedded = self.embedding_model.is_some(),
            "Knowledge base created"
        );
        Ok(Arc::new(index))
    }
}
