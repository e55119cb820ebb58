//! Shared test helpers for agent tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use readpal_core::error::{KnowledgeError, ProviderError};
use readpal_core::knowledge::{DocumentUrl, KnowledgeBase, KnowledgeChunk};
use readpal_core::message::Message;
use readpal_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};

/// A mock provider that returns scripted responses in order and records
/// every request it receives.
///
/// Panics if more calls are made than responses provided.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a provider that returns a single text response.
    pub fn single_text(text: &str) -> Self {
        Self::new(vec![Ok(make_text_response(text))])
    }

    pub fn failing(error: ProviderError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let call = requests.len();

        if call >= responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                call,
                responses.len()
            );
        }

        requests.push(request);
        responses[call].clone()
    }
}

/// Create a simple text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// A knowledge base with fixed passages; returns them all (up to `top_k`)
/// regardless of the query.
pub struct StaticKnowledge {
    url: DocumentUrl,
    passages: Vec<String>,
    pub fail: bool,
}

impl StaticKnowledge {
    pub fn new(passages: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            url: "https://example.com/book.pdf".into(),
            passages: passages.iter().map(|p| p.to_string()).collect(),
            fail: false,
        })
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            url: "https://example.com/book.pdf".into(),
            passages: vec!["unused".into()],
            fail: true,
        })
    }
}

#[async_trait]
impl KnowledgeBase for StaticKnowledge {
    fn document_url(&self) -> &DocumentUrl {
        &self.url
    }

    fn chunk_count(&self) -> usize {
        self.passages.len()
    }

    async fn search(&self, _query: &str, top_k: usize) -> Result<Vec<KnowledgeChunk>, KnowledgeError> {
        if self.fail {
            return Err(KnowledgeError::SearchFailed("index unavailable".into()));
        }
        Ok(self
            .passages
            .iter()
            .take(top_k)
            .enumerate()
            .map(|(i, p)| KnowledgeChunk {
                chunk_index: i,
                content: p.clone(),
                source: self.url.to_string(),
                similarity: 1.0 - i as f32 * 0.1,
            })
            .collect())
    }
}
