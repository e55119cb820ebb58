//! In-memory retrieval index over one document's chunks.
//!
//! Scoring is cosine similarity when chunk embeddings exist, otherwise a
//! plain keyword-coverage score.

use std::sync::Arc;

use async_trait::async_trait;
use readpal_core::error::KnowledgeError;
use readpal_core::knowledge::{DocumentUrl, KnowledgeBase, KnowledgeChunk};
use readpal_core::provider::{EmbeddingRequest, Provider};
use tracing::debug;

use crate::chunker::TextChunk;

/// How queries are turned into scores.
pub enum Retrieval {
    /// Embed the query with `model` and compare against stored chunk vectors.
    Embedding {
        provider: Arc<dyn Provider>,
        model: String,
        vectors: Vec<Vec<f32>>,
    },
    /// Term-overlap scoring; no external calls.
    Keyword,
}

/// The knowledge base for a single ingested document.
pub struct DocumentIndex {
    url: DocumentUrl,
    chunks: Vec<TextChunk>,
    retrieval: Retrieval,
}

impl DocumentIndex {
    pub fn new(url: DocumentUrl, chunks: Vec<TextChunk>, retrieval: Retrieval) -> Self {
        Self {
            url,
            chunks,
            retrieval,
        }
    }

    pub fn chunks(&self) -> &[TextChunk] {
        &self.chunks
    }

    fn ranked(&self, scores: Vec<f32>, top_k: usize) -> Vec<KnowledgeChunk> {
        let mut scored: Vec<(f32, &TextChunk)> = scores.into_iter().zip(self.chunks.iter()).collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(top_k)
            .map(|(similarity, chunk)| KnowledgeChunk {
                chunk_index: chunk.index,
                content: chunk.content.clone(),
                source: self.url.to_string(),
                similarity,
            })
            .collect()
    }
}

#[async_trait]
impl KnowledgeBase for DocumentIndex {
    fn document_url(&self) -> &DocumentUrl {
        &self.url
    }

    fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<KnowledgeChunk>, KnowledgeError> {
        if self.chunks.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let scores = match &self.retrieval {
            Retrieval::Embedding {
                provider,
                model,
                vectors,
            } => {
                let response = provider
                    .embed(EmbeddingRequest::new(model.clone(), vec![query.to_string()]))
                    .await
                    .map_err(|e| KnowledgeError::SearchFailed(e.to_string()))?;
                let query_vec = response.embeddings.into_iter().next().ok_or_else(|| {
                    KnowledgeError::SearchFailed("Provider returned no query embedding".into())
                })?;
                vectors
                    .iter()
                    .map(|v| cosine_similarity(v, &query_vec))
                    .collect()
            }
            Retrieval::Keyword => self
                .chunks
                .iter()
                .map(|c| keyword_score(query, &c.content))
                .collect(),
        };

        let hits = self.ranked(scores, top_k);
        debug!(url = %self.url, hits = hits.len(), "Knowledge search");
        Ok(hits)
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if either vector is zero-length or empty.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Fraction of query terms (3+ chars) present in `chunk`, with a small bonus
/// for repeated hits.
pub fn keyword_score(query: &str, chunk: &str) -> f32 {
    let query_lower = query.to_lowercase();
    let terms: Vec<&str> = query_lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 3)
        .collect();
    if terms.is_empty() {
        return 0.0;
    }

    let chunk_lower = chunk.to_lowercase();
    let mut matched = 0usize;
    let mut freq = 0usize;
    for term in &terms {
        let hits = chunk_lower.matches(term).count();
        if hits > 0 {
            matched += 1;
        }
        freq += hits;
    }

    let coverage = matched as f32 / terms.len() as f32;
    coverage + (freq as f32).ln_1p() * 0.05
}

#[cfg(test)]
mod tests {
    use super::*;
    use readpal_core::error::ProviderError;
    use readpal_core::provider::{EmbeddingResponse, ProviderRequest, ProviderResponse};

    fn chunk(index: usize, content: &str) -> TextChunk {
        TextChunk {
            index,
            offset: 0,
            content: content.into(),
        }
    }

    /// Embeds "ocean" queries as [1, 0] and everything else as [0, 1].
    struct AxisEmbedder;

    #[async_trait]
    impl Provider for AxisEmbedder {
        fn name(&self) -> &str {
            "axis"
        }

        async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::NotConfigured("completion".into()))
        }

        async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
            let embeddings = request
                .inputs
                .iter()
                .map(|t| if t.contains("ocean") { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
                .collect();
            Ok(EmbeddingResponse {
                embeddings,
                model: request.model,
            })
        }
    }

    #[test]
    fn cosine_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_and_degenerate() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn keyword_score_prefers_coverage() {
        let q = "tidal currents of the ocean";
        let both = keyword_score(q, "Ocean currents shift with tidal forces");
        let one = keyword_score(q, "Currents in a river");
        let none = keyword_score(q, "Desert flora survives drought");
        assert!(both > one);
        assert!(one > none);
        assert_eq!(none, 0.0);
    }

    #[test]
    fn keyword_score_ignores_short_terms() {
        assert_eq!(keyword_score("a of to", "a of to"), 0.0);
    }

    #[tokio::test]
    async fn keyword_search_ranks_and_limits() {
        let index = DocumentIndex::new(
            "https://example.com/book.pdf".into(),
            vec![
                chunk(0, "Desert flora adapts to heat"),
                chunk(1, "Ocean life thrives near reefs"),
                chunk(2, "Ocean currents and ocean tides"),
            ],
            Retrieval::Keyword,
        );

        let hits = index.search("ocean", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk_index, 2);
        assert_eq!(hits[1].chunk_index, 1);
        assert_eq!(hits[0].source, "https://example.com/book.pdf");
    }

    #[tokio::test]
    async fn embedding_search_uses_query_vector() {
        let index = DocumentIndex::new(
            "doc".into(),
            vec![chunk(0, "sand"), chunk(1, "waves")],
            Retrieval::Embedding {
                provider: Arc::new(AxisEmbedder),
                model: "test-embed".into(),
                vectors: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
            },
        );

        let hits = index.search("ocean please", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "waves");
        assert!((hits[0].similarity - 1.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn empty_index_returns_nothing() {
        let index = DocumentIndex::new("doc".into(), vec![], Retrieval::Keyword);
        assert_eq!(index.chunk_count(), 0);
        assert!(index.search("anything", 5).await.unwrap().is_empty());
    }
}
