//! Retrieval-augmented responder for one role.
//!
//! # Flow
//!
//! 1. Receive a prompt
//! 2. Search the document's knowledge base for the top-k passages
//! 3. Build a system message from the role profile and the passages
//! 4. Generate a response grounded in the retrieved text

use std::sync::Arc;

use async_trait::async_trait;
use readpal_core::agent::{AgentResponse, AgentRole, ResponderAgent};
use readpal_core::error::AgentError;
use readpal_core::knowledge::{KnowledgeChunk, KnowledgeHandle};
use readpal_core::message::Message;
use readpal_core::provider::{Provider, ProviderRequest};
use tracing::{debug, info};

/// Generation settings shared by every agent a factory builds.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Passages retrieved per prompt.
    pub top_k: usize,
}

/// A role agent bound to one document's knowledge base.
pub struct RagResponder {
    provider: Arc<dyn Provider>,
    settings: GenerationSettings,
    role: AgentRole,
    knowledge: KnowledgeHandle,
    instructions: Vec<String>,
}

impl RagResponder {
    pub fn new(
        provider: Arc<dyn Provider>,
        settings: GenerationSettings,
        role: AgentRole,
        knowledge: KnowledgeHandle,
        instructions: &[&str],
    ) -> Self {
        Self {
            provider,
            settings,
            role,
            knowledge,
            instructions: instructions.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// System message: who the agent is, how it should behave, and what it
    /// found in the document.
    fn system_message(&self, passages: &[KnowledgeChunk]) -> String {
        let profile = self.role.profile();
        let mut out = format!("You are {}. Your role: {}.\n", profile.name, profile.description);

        if !self.instructions.is_empty() {
            out.push_str("\n## Instructions\n");
            for instruction in &self.instructions {
                out.push_str("- ");
                out.push_str(instruction);
                out.push('\n');
            }
        }
        out.push_str("- Use markdown to format your answers.\n");

        out.push_str("\n## Relevant passages from the document\n");
        if passages.is_empty() {
            out.push_str("(no matching passages were found)\n");
        }
        for passage in passages {
            out.push_str(&format!("\n[passage {}]\n{}\n", passage.chunk_index, passage.content));
        }

        out
    }
}

#[async_trait]
impl ResponderAgent for RagResponder {
    fn role(&self) -> AgentRole {
        self.role
    }

    async fn run(&self, prompt: &str) -> Result<AgentResponse, AgentError> {
        let url = self.knowledge.document_url();
        info!(role = %self.role, url = %url, model = %self.settings.model, "RAG: starting retrieval");

        let passages = self
            .knowledge
            .search(prompt, self.settings.top_k)
            .await
            .map_err(|e| AgentError::InvocationFailed { cause: e.to_string() })?;
        debug!(role = %self.role, passages = passages.len(), "RAG: passages retrieved");

        let request = ProviderRequest::new(
            self.settings.model.clone(),
            vec![
                Message::system(self.system_message(&passages)),
                Message::user(prompt),
            ],
        )
        .with_temperature(self.settings.temperature)
        .with_max_tokens(self.settings.max_tokens);

        let response = self.provider.complete(request).await?;

        info!(
            role = %self.role,
            passages = passages.len(),
            answer_len = response.message.content.len(),
            "RAG: response generated"
        );

        Ok(AgentResponse {
            content: response.message.content,
            role: self.role,
            model: Some(response.model),
            usage: response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use readpal_core::error::ProviderError;
    use readpal_core::message::Role;

    fn settings() -> GenerationSettings {
        GenerationSettings {
            model: "mock-model".into(),
            temperature: 0.3,
            max_tokens: Some(512),
            top_k: 2,
        }
    }

    fn responder(provider: Arc<SequentialMockProvider>, knowledge: KnowledgeHandle) -> RagResponder {
        let role = AgentRole::Qa;
        RagResponder::new(provider, settings(), role, knowledge, role.profile().instructions)
    }

    #[tokio::test]
    async fn answers_from_retrieved_passages() {
        let provider = Arc::new(SequentialMockProvider::single_text("Ahab hunts the whale."));
        let knowledge = StaticKnowledge::new(&["Ahab lost his leg.", "The Pequod sails.", "Unused third"]);
        let agent = responder(provider.clone(), knowledge);

        let out = agent.run("Who is Ahab?").await.unwrap();
        assert_eq!(out.content, "Ahab hunts the whale.");
        assert_eq!(out.role, AgentRole::Qa);
        assert_eq!(out.model.as_deref(), Some("mock-model"));
        assert_eq!(out.usage.map(|u| u.total_tokens), Some(15));

        let request = provider.last_request().unwrap();
        assert_eq!(request.model, "mock-model");
        assert_eq!(request.max_tokens, Some(512));
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[1].content, "Who is Ahab?");

        let system = &request.messages[0].content;
        assert!(system.contains("QA Assistant"));
        assert!(system.contains("Ahab lost his leg."));
        assert!(system.contains("The Pequod sails."));
        assert!(!system.contains("Unused third"), "top_k must cap retrieval");
    }

    #[tokio::test]
    async fn system_message_lists_instructions() {
        let provider = Arc::new(SequentialMockProvider::single_text("ok"));
        let agent = RagResponder::new(
            provider.clone(),
            settings(),
            AgentRole::Summary,
            StaticKnowledge::new(&[]),
            &["Be brief", "Use bullets"],
        );

        agent.run("Summarize").await.unwrap();
        let system = provider.last_request().unwrap().messages[0].content.clone();
        assert!(system.contains("Summarization Assistant"));
        assert!(system.contains("- Be brief\n- Use bullets\n"));
        assert!(system.contains("no matching passages"));
    }

    #[tokio::test]
    async fn provider_failure_is_invocation_failure() {
        let provider = Arc::new(SequentialMockProvider::failing(ProviderError::RateLimited {
            retry_after_secs: 3,
        }));
        let agent = responder(provider, StaticKnowledge::new(&["text"]));

        let err = agent.run("anything").await.unwrap_err();
        match err {
            AgentError::InvocationFailed { cause } => assert!(cause.contains("Rate limited")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn search_failure_skips_the_model() {
        let provider = Arc::new(SequentialMockProvider::single_text("never"));
        let agent = responder(provider.clone(), StaticKnowledge::broken());

        let err = agent.run("anything").await.unwrap_err();
        assert!(matches!(err, AgentError::InvocationFailed { .. }));
        assert_eq!(provider.call_count(), 0);
    }
}
