//! Role agents for ReadPal.
//!
//! Every agent is the same retrieval-augmented loop:
//!
//! 1. **Retrieve** the passages of the document most relevant to the prompt
//! 2. **Build context** (role profile + instructions + passages)
//! 3. **Send to LLM** via the configured provider
//!
//! Roles differ only in the instructions they are created with.

pub mod factory;
pub mod rag;

pub use factory::ProviderAgentFactory;
pub use rag::{GenerationSettings, RagResponder};

#[cfg(test)]
pub(crate) mod test_helpers;
