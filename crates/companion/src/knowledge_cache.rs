//! Knowledge handles memoized by document URL.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use readpal_core::error::KnowledgeError;
use readpal_core::knowledge::{DocumentUrl, KnowledgeHandle, KnowledgeSource};
use tracing::{debug, info, warn};

use crate::cache::EvictionPolicy;
use crate::single_flight::SingleFlight;

pub struct KnowledgeCache {
    source: Arc<dyn KnowledgeSource>,
    handles: SingleFlight<KnowledgeHandle, KnowledgeError>,
    builds: AtomicU64,
}

impl KnowledgeCache {
    pub fn new(source: Arc<dyn KnowledgeSource>, policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            source,
            handles: SingleFlight::new(policy),
            builds: AtomicU64::new(0),
        }
    }

    /// The cached handle for `url`, ingesting the document on first access.
    ///
    /// A handle with zero chunks is `EmptyDocument`. Source errors other than
    /// `EmptyDocument` and `IngestionFailed` are reported as `IngestionFailed`.
    /// Concurrent callers share one ingestion and its outcome; a failure is
    /// forgotten once every caller has it.
    pub async fn resolve(&self, url: &DocumentUrl) -> Result<KnowledgeHandle, KnowledgeError> {
        let resolved = self
            .handles
            .get_or_try_init(url.as_str(), move || self.build(url))
            .await?;

        if !resolved.built {
            debug!(url = %url, "Knowledge base cache hit");
        }
        Ok(resolved.value)
    }

    async fn build(&self, url: &DocumentUrl) -> Result<KnowledgeHandle, KnowledgeError> {
        info!(url = %url, source = self.source.name(), "Creating new knowledge base");
        self.builds.fetch_add(1, Ordering::Relaxed);

        let handle = self.source.build(url).await.map_err(|e| match e {
            KnowledgeError::EmptyDocument { .. } | KnowledgeError::IngestionFailed { .. } => e,
            other => KnowledgeError::IngestionFailed {
                url: url.to_string(),
                cause: other.to_string(),
            },
        });

        let handle = match handle {
            Ok(handle) if handle.chunk_count() == 0 => Err(KnowledgeError::EmptyDocument {
                url: url.to_string(),
            }),
            other => other,
        };

        if let Err(e) = &handle {
            warn!(url = %url, error = %e, "Knowledge base creation failed");
        }
        handle
    }

    /// The handle for `url` if already built.
    pub fn get(&self, url: &DocumentUrl) -> Option<KnowledgeHandle> {
        self.handles.get(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Ingestions started since creation, failed ones included.
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.handles.evictions()
    }

    pub fn clear(&self) {
        self.handles.clear();
    }
}
