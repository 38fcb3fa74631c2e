//! Knowledge Base
//!
//! Retrieval over a single source document: load it page by page, split
//! each page into chunks, embed, and answer queries with the nearest chunks.
//!
//! The index is built on first use and kept while the document's
//! modification time is unchanged; editing the document triggers a rebuild
//! on the next query.

mod index;
mod loader;
mod splitter;

pub use index::{Chunk, VectorIndex};
pub use loader::load_pages;
pub use splitter::TextSplitter;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use agent_core::EmbeddingProvider;
use tokio::sync::Mutex;

use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};

struct CachedIndex {
    modified: SystemTime,
    index: Arc<VectorIndex>,
}

/// Document-backed semantic search
pub struct KnowledgeBase {
    path: PathBuf,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    splitter: TextSplitter,
    top_k: usize,
    cache: Mutex<Option<CachedIndex>>,
}

impl KnowledgeBase {
    pub fn new(
        path: impl Into<PathBuf>,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
        splitter: TextSplitter,
        top_k: usize,
    ) -> Self {
        Self {
            path: path.into(),
            embedder,
            splitter,
            top_k,
            cache: Mutex::new(None),
        }
    }

    pub fn from_config(
        config: &AssistantConfig,
        embedder: Option<Arc<dyn EmbeddingProvider>>,
    ) -> Self {
        Self::new(
            config.knowledge_base_path.clone(),
            embedder,
            TextSplitter::new(config.chunk_size, config.chunk_overlap),
            config.top_k,
        )
    }

    /// File name of the source document, for messages
    pub fn document_name(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }

    /// Texts of the chunks nearest to `query`, nearest first.
    ///
    /// Checks, in order, that an embedder is configured and that the
    /// document exists, before any embedding work.
    pub async fn search(&self, query: &str) -> Result<Vec<String>> {
        let embedder = self
            .embedder
            .as_ref()
            .ok_or(AssistantError::MissingCredential("OPENAI_API_KEY"))?;

        let modified = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.modified().ok(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AssistantError::DocumentNotFound(self.document_name()));
            }
            Err(e) => return Err(e.into()),
        };

        let index = self.index(embedder.as_ref(), modified).await?;
        if index.is_empty() {
            return Ok(Vec::new());
        }

        let query_vector = embedder.embed_query(query).await?;
        Ok(index
            .search(&query_vector, self.top_k)
            .into_iter()
            .map(|chunk| chunk.text.clone())
            .collect())
    }

    async fn index(
        &self,
        embedder: &dyn EmbeddingProvider,
        modified: Option<SystemTime>,
    ) -> Result<Arc<VectorIndex>> {
        let mut cache = self.cache.lock().await;

        if let (Some(cached), Some(modified)) = (cache.as_ref(), modified) {
            if cached.modified == modified {
                return Ok(cached.index.clone());
            }
        }

        let index = Arc::new(self.build_index(embedder).await?);

        // Without a modification time there is nothing to validate a cache against
        *cache = modified.map(|modified| CachedIndex {
            modified,
            index: index.clone(),
        });

        Ok(index)
    }

    async fn build_index(&self, embedder: &dyn EmbeddingProvider) -> Result<VectorIndex> {
        let pages = load_pages(&self.path).await?;
        let chunks = self.splitter.split_pages(&pages);

        if chunks.is_empty() {
            tracing::warn!(path = %self.path.display(), "Knowledge base document has no text");
            return Ok(VectorIndex::default());
        }

        let embeddings = embedder.embed(&chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(AssistantError::DocumentLoad(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        tracing::info!(path = %self.path.display(), chunks = chunks.len(), "Built knowledge base index");
        Ok(VectorIndex::build(chunks, embeddings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::AgentError;
    use async_trait::async_trait;
    use std::io::Write;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Embeds text as keyword counts over a tiny vocabulary
    #[derive(Default)]
    struct KeywordEmbedder {
        calls: AtomicUsize,
    }

    const VOCAB: [&str; 4] = ["visa", "train", "hotel", "food"];

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        async fn embed(&self, texts: &[String]) -> agent_core::Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            #[allow(clippy::cast_precision_loss)]
            Ok(texts
                .iter()
                .map(|t| {
                    let lower = t.to_lowercase();
                    VOCAB.iter().map(|w| lower.matches(w).count() as f32).collect()
                })
                .collect())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn embed(&self, _texts: &[String]) -> agent_core::Result<Vec<Vec<f32>>> {
            Err(AgentError::RateLimited("slow down".into()))
        }
    }

    fn guide() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(
            file,
            "Apply for your visa early. Visa offices close on holidays.\n\n\
             The high-speed train is the fastest way between cities.\n\n\
             Book the hotel near a metro station.\n\n\
             Try the local food markets in the evening."
        )
        .unwrap();
        file
    }

    fn knowledge_base(path: &Path, embedder: Option<Arc<dyn EmbeddingProvider>>) -> KnowledgeBase {
        KnowledgeBase::new(path, embedder, TextSplitter::new(70, 0), 3)
    }

    #[tokio::test]
    async fn test_returns_nearest_chunks() {
        let file = guide();
        let kb = knowledge_base(file.path(), Some(Arc::new(KeywordEmbedder::default())));

        let hits = kb.search("train tickets").await.unwrap();
        assert_eq!(hits.len(), 3);
        assert!(hits[0].contains("high-speed train"));
    }

    #[tokio::test]
    async fn test_missing_embedder_checked_first() {
        let kb = knowledge_base(Path::new("/no/such/guide.pdf"), None);
        let err = kb.search("visa").await.unwrap_err();
        assert!(matches!(err, AssistantError::MissingCredential(_)));
    }

    #[tokio::test]
    async fn test_missing_document_skips_embedding() {
        let embedder = Arc::new(KeywordEmbedder::default());
        let kb = knowledge_base(Path::new("/no/such/guide.pdf"), Some(embedder.clone()));

        let err = kb.search("visa").await.unwrap_err();
        assert!(matches!(err, AssistantError::DocumentNotFound(name) if name == "guide.pdf"));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_index_is_reused_between_queries() {
        let file = guide();
        let embedder = Arc::new(KeywordEmbedder::default());
        let kb = knowledge_base(file.path(), Some(embedder.clone()));

        kb.search("visa").await.unwrap();
        kb.search("hotel").await.unwrap();

        // One document embedding plus one per query
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_empty_document_yields_no_hits() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let embedder = Arc::new(KeywordEmbedder::default());
        let kb = knowledge_base(file.path(), Some(embedder.clone()));

        assert!(kb.search("visa").await.unwrap().is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_is_reported() {
        let file = guide();
        let kb = knowledge_base(file.path(), Some(Arc::new(FailingEmbedder)));

        let err = kb.search("visa").await.unwrap_err();
        assert!(matches!(err, AssistantError::Embedding(AgentError::RateLimited(_))));
    }
}
