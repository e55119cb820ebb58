//! Role agents: prompt in, generated text out.
//!
//! Every document gets the same four agents, differing only in the static
//! instruction profile of their [`AgentRole`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::knowledge::KnowledgeHandle;
use crate::provider::Usage;

/// The four fixed agent roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Answers specific questions about the document.
    Qa,
    /// Produces structured summaries.
    Summary,
    /// Extracts themes, patterns and implications.
    Insight,
    /// Tailors suggestions to a reader's interests and progress.
    Personalization,
}

impl AgentRole {
    /// All roles, in the order an [`AgentSet`] is built.
    pub const ALL: [AgentRole; 4] = [
        AgentRole::Qa,
        AgentRole::Summary,
        AgentRole::Insight,
        AgentRole::Personalization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::Qa => "qa",
            AgentRole::Summary => "summary",
            AgentRole::Insight => "insight",
            AgentRole::Personalization => "personalization",
        }
    }

    /// The static instruction profile for this role.
    pub fn profile(&self) -> &'static RoleProfile {
        match self {
            AgentRole::Qa => &QA_PROFILE,
            AgentRole::Summary => &SUMMARY_PROFILE,
            AgentRole::Insight => &INSIGHT_PROFILE,
            AgentRole::Personalization => &PERSONALIZATION_PROFILE,
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static configuration shaping an agent's behaviour.
#[derive(Debug)]
pub struct RoleProfile {
    /// Display name of the agent.
    pub name: &'static str,
    /// One-line description of the agent's job.
    pub description: &'static str,
    /// Ordered instruction list placed in the system message.
    pub instructions: &'static [&'static str],
}

static QA_PROFILE: RoleProfile = RoleProfile {
    name: "QA Assistant",
    description: "Answer specific questions about the book content",
    instructions: &[
        "You are a knowledgeable reading companion who has thoroughly read this book.",
        "Always base your answers on the specific content from the book.",
        "Include direct quotes or references when possible to support your answers.",
        "If information isn't explicitly mentioned in the text, say so clearly.",
        "Keep responses focused and relevant to the question asked.",
        "If the question is unclear, ask for clarification.",
    ],
};

static SUMMARY_PROFILE: RoleProfile = RoleProfile {
    name: "Summarization Assistant",
    description: "Generate concise summaries of book sections",
    instructions: &[
        "Create clear, structured summaries based on the actual content of the book.",
        "Include major plot points, key events, and significant character developments.",
        "Organize summaries with clear sections or bullet points for readability.",
        "Maintain chronological order of events when summarizing.",
        "Highlight important themes or recurring elements.",
        "Keep summaries objective and based strictly on the text.",
        "Include chapter or section references when relevant.",
    ],
};

static INSIGHT_PROFILE: RoleProfile = RoleProfile {
    name: "Insight Generator",
    description: "Generate deeper insights and discussion points",
    instructions: &[
        "Analyze the document thoroughly to extract meaningful insights",
        "Identify and explain key themes, patterns, and concepts",
        "Support all insights with specific examples from the text",
        "Consider the historical or cultural context when relevant",
        "Highlight important relationships between different ideas",
        "Discuss significant implications of the main points",
        "Focus on both explicit and implicit meanings in the text",
        "Maintain objectivity while providing analytical depth",
        "Structure insights in a clear, organized manner",
    ],
};

static PERSONALIZATION_PROFILE: RoleProfile = RoleProfile {
    name: "Personalization Assistant",
    description: "Provide personalized reading suggestions and track progress",
    instructions: &[
        "Track user's reading progress and interests",
        "Suggest relevant sections based on user's preferences",
        "Identify connections between different parts of the text",
        "Provide personalized reading paths",
        "Highlight sections that align with user's interests",
        "Adapt suggestions based on user's comprehension level",
        "When updating progress, respond with a confirmation message",
    ],
};

/// The text an agent produced for one prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Generated text.
    pub content: String,
    /// Which role produced it.
    pub role: AgentRole,
    /// Model that answered, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Token usage, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

/// A role-bound agent: a knowledge handle plus instructions, callable with a prompt.
#[async_trait]
pub trait ResponderAgent: Send + Sync {
    /// The role this agent was built for.
    fn role(&self) -> AgentRole;

    /// Turn a prompt into generated text. Blocks until the model answers.
    async fn run(&self, prompt: &str) -> Result<AgentResponse, AgentError>;
}

/// Builds role agents bound to a knowledge handle.
pub trait AgentFactory: Send + Sync {
    fn create(
        &self,
        role: AgentRole,
        knowledge: KnowledgeHandle,
        instructions: &[&str],
    ) -> Result<Arc<dyn ResponderAgent>, AgentError>;
}

/// The four agents built for one document.
#[derive(Clone)]
pub struct AgentSet {
    pub qa: Arc<dyn ResponderAgent>,
    pub summary: Arc<dyn ResponderAgent>,
    pub insight: Arc<dyn ResponderAgent>,
    pub personalization: Arc<dyn ResponderAgent>,
}

impl AgentSet {
    /// The agent for `role`.
    pub fn get(&self, role: AgentRole) -> &Arc<dyn ResponderAgent> {
        match role {
            AgentRole::Qa => &self.qa,
            AgentRole::Summary => &self.summary,
            AgentRole::Insight => &self.insight,
            AgentRole::Personalization => &self.personalization,
        }
    }

    /// True when both sets hold the very same four agent instances.
    pub fn same_agents(&self, other: &AgentSet) -> bool {
        AgentRole::ALL
            .iter()
            .all(|role| Arc::ptr_eq(self.get(*role), other.get(*role)))
    }
}

impl std::fmt::Debug for AgentSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSet")
            .field("qa", &self.qa.role())
            .field("summary", &self.summary.role())
            .field("insight", &self.insight.role())
            .field("personalization", &self.personalization.role())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(AgentRole);

    #[async_trait]
    impl ResponderAgent for Fixed {
        fn role(&self) -> AgentRole {
            self.0
        }

        async fn run(&self, prompt: &str) -> Result<AgentResponse, AgentError> {
            Ok(AgentResponse {
                content: prompt.to_uppercase(),
                role: self.0,
                model: None,
                usage: None,
            })
        }
    }

    fn set() -> AgentSet {
        AgentSet {
            qa: Arc::new(Fixed(AgentRole::Qa)),
            summary: Arc::new(Fixed(AgentRole::Summary)),
            insight: Arc::new(Fixed(AgentRole::Insight)),
            personalization: Arc::new(Fixed(AgentRole::Personalization)),
        }
    }

    #[test]
    fn every_role_has_instructions() {
        for role in AgentRole::ALL {
            let profile = role.profile();
            assert!(!profile.name.is_empty());
            assert!(!profile.instructions.is_empty(), "{role} has no instructions");
        }
    }

    #[test]
    fn role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&AgentRole::Qa).unwrap(), r#""qa""#);
        assert_eq!(
            serde_json::to_string(&AgentRole::Personalization).unwrap(),
            r#""personalization""#
        );
    }

    #[test]
    fn agent_set_dispatches_by_role() {
        let agents = set();
        for role in AgentRole::ALL {
            assert_eq!(agents.get(role).role(), role);
        }
    }

    #[test]
    fn clones_share_agent_identity() {
        let a = set();
        let b = a.clone();
        assert!(a.same_agents(&b));
        assert!(!a.same_agents(&set()));
    }

    #[tokio::test]
    async fn agents_run_prompts() {
        let out = set().qa.run("hello").await.unwrap();
        assert_eq!(out.content, "HELLO");
        assert_eq!(out.role, AgentRole::Qa);
    }
}
