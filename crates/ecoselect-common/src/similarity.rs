//! Embedding similarity helpers

use crate::types::candidate::Candidate;

/// Cosine similarity between two embedding vectors, in [-1, 1].
///
/// Mismatched lengths, empty vectors and zero vectors compare as 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Symmetric pairwise cosine similarities (row-major, N×N, unit diagonal)
pub fn pairwise_similarities(embeddings: &[Vec<f32>]) -> Vec<f64> {
    let n = embeddings.len();
    let mut sims = vec![0.0; n * n];
    for i in 0..n {
        sims[i * n + i] = 1.0;
        for j in (i + 1)..n {
            let s = cosine_similarity(&embeddings[i], &embeddings[j]);
            sims[i * n + j] = s;
            sims[j * n + i] = s;
        }
    }
    sims
}

/// Pairwise similarities between candidates.
///
/// Candidates with the same content hash are identical and compare as 1.0
/// whatever their embeddings say; a zero vector would otherwise make an exact
/// duplicate look unrelated.
pub fn candidate_similarities(candidates: &[Candidate], embeddings: &[Vec<f32>]) -> Vec<f64> {
    let mut sims = pairwise_similarities(embeddings);
    let n = embeddings.len();
    for i in 0..n.min(candidates.len()) {
        for j in (i + 1)..n.min(candidates.len()) {
            if candidates[i].content_hash() == candidates[j].content_hash() {
                sims[i * n + j] = 1.0;
                sims[j * n + i] = 1.0;
            }
        }
    }
    sims
}

/// Mean cosine similarity over all unordered pairs; `None` for fewer than two
pub fn mean_pairwise_similarity(embeddings: &[&[f32]]) -> Option<f64> {
    let n = embeddings.len();
    if n < 2 {
        return None;
    }
    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            total += cosine_similarity(embeddings[i], embeddings[j]);
        }
    }
    Some(total / (n * (n - 1) / 2) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-9);

        let c = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &c).abs() < 1e-9);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_vectors() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_pairwise_is_symmetric() {
        let embeddings = vec![vec![1.0, 0.2], vec![0.3, 0.9], vec![-0.5, 0.5]];
        let sims = pairwise_similarities(&embeddings);
        for i in 0..3 {
            assert_eq!(sims[i * 3 + i], 1.0);
            for j in 0..3 {
                assert_eq!(sims[i * 3 + j].to_bits(), sims[j * 3 + i].to_bits());
            }
        }
    }

    #[test]
    fn test_identical_candidates_fully_similar() {
        let candidates = vec![Candidate::new(""), Candidate::new(""), Candidate::new("Paris")];
        let embeddings = vec![vec![0.0, 0.0], vec![0.0, 0.0], vec![1.0, 0.0]];

        let sims = candidate_similarities(&candidates, &embeddings);
        assert_eq!(sims[1], 1.0);
        assert_eq!(sims[3], 1.0);
        assert_eq!(sims[2], 0.0);
        assert_eq!(sims[5], 0.0);
        assert_eq!(pairwise_similarities(&embeddings)[1], 0.0);
    }

    #[test]
    fn test_mean_pairwise() {
        let a = [1.0f32, 0.0];
        let b = [0.0f32, 1.0];
        assert_eq!(mean_pairwise_similarity(&[&a]), None);
        assert!(mean_pairwise_similarity(&[&a, &b]).unwrap().abs() < 1e-9);
        assert!((mean_pairwise_similarity(&[&a, &a]).unwrap() - 1.0).abs() < 1e-9);
    }
}
