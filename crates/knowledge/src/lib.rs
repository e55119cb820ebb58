//! Document ingestion and retrieval for ReadPal.
//!
//! A document URL goes in, a searchable [`DocumentIndex`] comes out.
//! [`PdfKnowledgeSource`] is the production [`KnowledgeSource`](readpal_core::KnowledgeSource).

pub mod chunker;
pub mod extract;
pub mod fetch;
pub mod index;
pub mod source;

pub use chunker::{TextChunk, chunk_text};
pub use index::{DocumentIndex, Retrieval, cosine_similarity};
pub use source::PdfKnowledgeSource;
