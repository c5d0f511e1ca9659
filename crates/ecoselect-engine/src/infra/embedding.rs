//! Embedding Service
//!
//! Text → dense vector capability consumed by the selection pipeline. A
//! selection run issues a single batch request for all of its candidates.

use std::collections::HashMap;

use async_trait::async_trait;
use ecoselect_common::EmbeddingError;
use parking_lot::RwLock;

/// Trait for embedding services
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Generate embedding for text
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Generate embeddings for multiple texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Get embedding dimension
    fn dimension(&self) -> usize;
}

/// Deterministic local embedding from hashed character trigrams
///
/// Needs no model and no network; similar strings share trigrams and so
/// land close together. Vectors are L2-normalised.
#[derive(Debug, Clone)]
pub struct LocalEmbedding {
    dimension: usize,
}

impl LocalEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// FNV-1a over the trigram's characters
    fn bucket(trigram: &[char], dimension: usize) -> usize {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for c in trigram {
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).bytes() {
                hash ^= u64::from(b);
                hash = hash.wrapping_mul(0x0100_0000_01b3);
            }
        }
        (hash % dimension as u64) as usize
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimension];

        let chars: Vec<char> = text.to_lowercase().chars().collect();
        if chars.is_empty() {
            return embedding;
        }

        if chars.len() < 3 {
            embedding[Self::bucket(&chars, self.dimension)] += 1.0;
        } else {
            for trigram in chars.windows(3) {
                embedding[Self::bucket(trigram, self.dimension)] += 1.0;
            }
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }
        embedding
    }
}

impl Default for LocalEmbedding {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EmbeddingService for LocalEmbedding {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.generate(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|t| self.generate(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Precomputed lookup table; unknown text is an error
#[derive(Debug, Clone, Default)]
pub struct StaticEmbedding {
    dimension: usize,
    table: HashMap<String, Vec<f32>>,
}

impl StaticEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            table: HashMap::new(),
        }
    }

    /// Register a vector for `text`
    pub fn insert(&mut self, text: impl Into<String>, vector: Vec<f32>) -> Result<(), EmbeddingError> {
        if vector.len() != self.dimension {
            return Err(EmbeddingError::InvalidInput(format!(
                "vector has dimension {}, expected {}",
                vector.len(),
                self.dimension
            )));
        }
        self.table.insert(text.into(), vector);
        Ok(())
    }

    /// Builder-style insert
    pub fn with(mut self, text: impl Into<String>, vector: Vec<f32>) -> Result<Self, EmbeddingError> {
        self.insert(text, vector)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    fn lookup(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.table
            .get(text)
            .cloned()
            .ok_or_else(|| EmbeddingError::InvalidInput(format!("no embedding for {:?}", text)))
    }
}

#[async_trait]
impl EmbeddingService for StaticEmbedding {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.lookup(text)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|t| self.lookup(t)).collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Cached wrapper for any embedding service
pub struct CachedEmbedding<E: EmbeddingService> {
    inner: E,
    cache: RwLock<HashMap<String, Vec<f32>>>,
    cache_size_limit: usize,
}

impl<E: EmbeddingService> CachedEmbedding<E> {
    pub fn new(inner: E, cache_size_limit: usize) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
            cache_size_limit,
        }
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    /// (entries, limit)
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.cache.read().len(), self.cache_size_limit)
    }

    fn remember(&self, text: &str, embedding: &[f32]) {
        let mut cache = self.cache.write();
        if cache.len() < self.cache_size_limit {
            cache.insert(text.to_string(), embedding.to_vec());
        }
    }
}

#[async_trait]
impl<E: EmbeddingService> EmbeddingService for CachedEmbedding<E> {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let cached = self.cache.read().get(text).cloned();
        if let Some(hit) = cached {
            return Ok(hit);
        }

        let embedding = self.inner.embed_text(text).await?;
        self.remember(text, &embedding);
        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut results: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
        let mut misses = Vec::new();
        let mut miss_indices = Vec::new();

        {
            let cache = self.cache.read();
            for (i, text) in texts.iter().enumerate() {
                match cache.get(text) {
                    Some(hit) => results.push(Some(hit.clone())),
                    None => {
                        results.push(None);
                        misses.push(text.clone());
                        miss_indices.push(i);
                    }
                }
            }
        }

        if !misses.is_empty() {
            let fetched = self.inner.embed_batch(&misses).await?;
            if fetched.len() != misses.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: misses.len(),
                    actual: fetched.len(),
                });
            }
            for ((idx, text), embedding) in miss_indices.into_iter().zip(&misses).zip(fetched) {
                self.remember(text, &embedding);
                results[idx] = Some(embedding);
            }
        }

        results
            .into_iter()
            .enumerate()
            .map(|(i, r)| {
                r.ok_or_else(|| EmbeddingError::ApiError(format!("missing embedding for text {}", i)))
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }
}

/// Check a batch response against the request
pub fn validate_batch(
    embeddings: &[Vec<f32>],
    expected_count: usize,
) -> Result<(), EmbeddingError> {
    if embeddings.len() != expected_count {
        return Err(EmbeddingError::CountMismatch {
            expected: expected_count,
            actual: embeddings.len(),
        });
    }

    let Some(first) = embeddings.first() else {
        return Ok(());
    };
    let dimension = first.len();
    for (index, e) in embeddings.iter().enumerate() {
        if e.len() != dimension {
            return Err(EmbeddingError::DimensionMismatch {
                index,
                expected: dimension,
                actual: e.len(),
            });
        }
        if e.iter().any(|x| !x.is_finite()) {
            return Err(EmbeddingError::NonFinite(index));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecoselect_common::similarity::cosine_similarity;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_local_embedding() {
        let service = LocalEmbedding::new(256);
        let embedding = service.embed_text("hello world").await.unwrap();

        assert_eq!(embedding.len(), 256);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.01);
    }

    #[tokio::test]
    async fn test_similar_texts_similar_embeddings() {
        let service = LocalEmbedding::new(256);

        let emb1 = service.embed_text("hello world").await.unwrap();
        let emb2 = service.embed_text("hello world!").await.unwrap();
        let emb3 = service.embed_text("goodbye universe").await.unwrap();

        assert!(cosine_similarity(&emb1, &emb2) > cosine_similarity(&emb1, &emb3));
    }

    #[tokio::test]
    async fn test_local_embedding_deterministic() {
        let a = LocalEmbedding::new(64).embed_text("same input").await.unwrap();
        let b = LocalEmbedding::new(64).embed_text("same input").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let e = LocalEmbedding::new(16).embed_text("").await.unwrap();
        assert!(e.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_static_embedding() {
        let service = StaticEmbedding::new(2)
            .with("a", vec![1.0, 0.0])
            .unwrap()
            .with("b", vec![0.0, 1.0])
            .unwrap();

        let batch = service
            .embed_batch(&["b".to_string(), "a".to_string()])
            .await
            .unwrap();
        assert_eq!(batch, vec![vec![0.0, 1.0], vec![1.0, 0.0]]);

        assert!(service.embed_text("c").await.is_err());
        assert!(StaticEmbedding::new(2).with("x", vec![1.0]).is_err());
    }

    struct CountingEmbedding {
        calls: Arc<AtomicUsize>,
        inner: LocalEmbedding,
    }

    #[async_trait]
    impl EmbeddingService for CountingEmbedding {
        async fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed_text(text).await
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(texts.len(), Ordering::SeqCst);
            self.inner.embed_batch(texts).await
        }

        fn dimension(&self) -> usize {
            self.inner.dimension()
        }
    }

    #[tokio::test]
    async fn test_cached_batch_only_fetches_misses() {
        let calls = Arc::new(AtomicUsize::new(0));
        let service = CachedEmbedding::new(
            CountingEmbedding {
                calls: calls.clone(),
                inner: LocalEmbedding::new(32),
            },
            100,
        );

        service.embed_text("hello").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let texts = vec!["hello".to_string(), "world".to_string()];
        let batch = service.embed_batch(&texts).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(service.cache_stats(), (2, 100));

        service.clear_cache();
        assert_eq!(service.cache_stats().0, 0);
    }

    #[test]
    fn test_validate_batch() {
        assert!(validate_batch(&[], 0).is_ok());
        assert!(matches!(
            validate_batch(&[vec![1.0]], 2),
            Err(EmbeddingError::CountMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            validate_batch(&[vec![1.0, 0.0], vec![1.0]], 2),
            Err(EmbeddingError::DimensionMismatch { index: 1, .. })
        ));
        assert!(matches!(
            validate_batch(&[vec![f32::NAN]], 1),
            Err(EmbeddingError::NonFinite(0))
        ));
    }
}
