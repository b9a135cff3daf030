use tracing::warn;

use crate::search::SearchHit;

/// Host-supplied query embedder. The catalog's dense vectors arrive
/// precomputed; only query text needs encoding at search time, and which
/// model does that is the host's decision, not this crate's.
pub trait QueryEncoder: Send + Sync {
    /// Encodes a query into the same space as the indexed vectors.
    fn encode(&self, text: &str) -> Vec<f32>;
}

/// Flat inner-product index: every query scores against every item. With a
/// few thousand catalog entries brute force beats any index structure.
pub struct DenseIndex {
    ids: Vec<String>,
    vectors: Vec<Vec<f32>>,
}

impl DenseIndex {
    pub fn build(items: Vec<(String, Vec<f32>)>) -> Self {
        let (ids, vectors) = items.into_iter().unzip();
        Self { ids, vectors }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Top-k items by inner product with the encoded query. Ranks are
    /// 0-based and ties keep insertion order (stable sort).
    pub fn search(&self, query_vector: &[f32], top_k: usize) -> Vec<SearchHit> {
        if query_vector.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<SearchHit> = self
            .ids
            .iter()
            .zip(&self.vectors)
            .filter_map(|(id, vector)| {
                if vector.len() != query_vector.len() {
                    warn!(id = %id, "dense vector length differs from query, skipping");
                    return None;
                }
                Some(SearchHit {
                    id: id.clone(),
                    score: crate::embed::math::dot(query_vector, vector),
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        scored
    }
}
