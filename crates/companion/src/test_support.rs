//! In-process doubles for the knowledge source and the agent factory.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use readpal_core::agent::{AgentFactory, AgentResponse, AgentRole, ResponderAgent};
use readpal_core::error::{AgentError, KnowledgeError};
use readpal_core::knowledge::{
    DocumentUrl, KnowledgeBase, KnowledgeChunk, KnowledgeHandle, KnowledgeSource,
};

pub struct FixedKnowledge {
    url: DocumentUrl,
    chunks: usize,
}

impl FixedKnowledge {
    pub fn new(url: &str, chunks: usize) -> Self {
        Self {
            url: url.into(),
            chunks,
        }
    }
}

#[async_trait]
impl KnowledgeBase for FixedKnowledge {
    fn document_url(&self) -> &DocumentUrl {
        &self.url
    }

    fn chunk_count(&self) -> usize {
        self.chunks
    }

    async fn search(&self, _query: &str, _top_k: usize) -> Result<Vec<KnowledgeChunk>, KnowledgeError> {
        Ok(Vec::new())
    }
}

/// Counts `build` calls; every build yields a handle with a fixed chunk
/// count, or the configured error.
pub struct CountingSource {
    builds: AtomicUsize,
    chunks: usize,
    error: Option<KnowledgeError>,
    delay: Duration,
}

impl CountingSource {
    pub fn with_chunks(chunks: usize) -> Self {
        Self {
            builds: AtomicUsize::new(0),
            chunks,
            error: None,
            delay: Duration::ZERO,
        }
    }

    pub fn failing(error: KnowledgeError) -> Self {
        Self {
            error: Some(error),
            ..Self::with_chunks(1)
        }
    }

    pub fn delayed(mut self, millis: u64) -> Self {
        self.delay = Duration::from_millis(millis);
        self
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KnowledgeSource for CountingSource {
    fn name(&self) -> &str {
        "counting"
    }

    async fn build(&self, url: &DocumentUrl) -> Result<KnowledgeHandle, KnowledgeError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        Ok(Arc::new(FixedKnowledge::new(url.as_str(), self.chunks)))
    }
}

/// Every prompt an agent received, with the role that received it.
pub type PromptLog = Arc<Mutex<Vec<(AgentRole, String)>>>;

/// Answers `"<role> says: <prompt>"`, or fails when told to.
pub struct EchoAgent {
    role: AgentRole,
    log: PromptLog,
    fail: bool,
}

#[async_trait]
impl ResponderAgent for EchoAgent {
    fn role(&self) -> AgentRole {
        self.role
    }

    async fn run(&self, prompt: &str) -> Result<AgentResponse, AgentError> {
        self.log.lock().unwrap().push((self.role, prompt.to_string()));
        if self.fail {
            return Err(AgentError::InvocationFailed {
                cause: "model unavailable".into(),
            });
        }
        Ok(AgentResponse {
            content: format!("{} says: {prompt}", self.role),
            role: self.role,
            model: Some("echo".into()),
            usage: None,
        })
    }
}

/// Builds [`EchoAgent`]s and counts how many it made.
#[derive(Default)]
pub struct CountingFactory {
    pub created: AtomicUsize,
    pub log: PromptLog,
    /// Role whose creation fails.
    pub fail_setup: Option<AgentRole>,
    /// Make every built agent fail at `run`.
    pub fail_run: bool,
}

impl CountingFactory {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<(AgentRole, String)> {
        self.log.lock().unwrap().clone()
    }
}

impl AgentFactory for CountingFactory {
    fn create(
        &self,
        role: AgentRole,
        _knowledge: KnowledgeHandle,
        instructions: &[&str],
    ) -> Result<Arc<dyn ResponderAgent>, AgentError> {
        assert_eq!(instructions, role.profile().instructions);
        if self.fail_setup == Some(role) {
            return Err(AgentError::SetupFailed {
                role,
                cause: "model refused".into(),
            });
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(EchoAgent {
            role,
            log: self.log.clone(),
            fail: self.fail_run,
        }))
    }
}
