use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::embed::math::{dot, l2_normalize};
use crate::error::{EngineError, Result};
use crate::search::SearchHit;

/// Blended similarity space: `alpha * semantic + (1 - alpha) * structural`,
/// componentwise, L2-normalized, for courses present in BOTH sources.
/// Courses missing from either side are excluded outright rather than
/// zero-filled, so missing data cannot masquerade as dissimilarity.
///
/// Rows keep the semantic source's insertion order, which also breaks
/// similarity ties.
#[derive(Debug)]
pub struct HybridSpace {
    ids: Vec<String>,
    index: HashMap<String, usize>,
    vectors: Vec<Vec<f32>>,
}

impl HybridSpace {
    pub fn build(
        semantic: &[(String, Vec<f32>)],
        structural: &HashMap<String, Vec<f32>>,
        config: &EngineConfig,
    ) -> Result<Self> {
        config.validate()?;
        let alpha = config.alpha as f32;

        let mut ids = Vec::new();
        let mut index = HashMap::new();
        let mut vectors = Vec::new();
        let mut skipped = 0usize;

        for (id, semantic_vec) in semantic {
            let Some(structural_vec) = structural.get(id) else {
                skipped += 1;
                continue;
            };
            if semantic_vec.len() != config.dimensions {
                return Err(EngineError::DimensionMismatch {
                    actual: semantic_vec.len(),
                    expected: config.dimensions,
                });
            }
            // The blend below zips the two vectors; a short structural
            // vector would silently truncate it, so reject it here.
            if structural_vec.len() != config.dimensions {
                return Err(EngineError::DimensionMismatch {
                    actual: structural_vec.len(),
                    expected: config.dimensions,
                });
            }

            let mut blended: Vec<f32> = semantic_vec
                .iter()
                .zip(structural_vec)
                .map(|(s, g)| alpha * s + (1.0 - alpha) * g)
                .collect();
            l2_normalize(&mut blended);

            index.insert(id.clone(), ids.len());
            ids.push(id.clone());
            vectors.push(blended);
        }

        info!(
            courses = ids.len(),
            skipped, "built hybrid embedding table"
        );
        Ok(Self {
            ids,
            index,
            vectors,
        })
    }

    pub fn contains(&self, course_id: &str) -> bool {
        self.index.contains_key(course_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Nearest courses by cosine similarity (dot product over unit vectors).
    /// The course itself is dropped from its own result list. Unknown ids
    /// degrade to an empty list; recommendation is best-effort.
    pub fn similar(&self, course_id: &str, top_k: usize) -> Vec<SearchHit> {
        let Some(&row) = self.index.get(course_id) else {
            warn!(course_id, "course absent from hybrid table");
            return Vec::new();
        };
        let query = &self.vectors[row];

        let mut scored: Vec<SearchHit> = self
            .ids
            .iter()
            .zip(&self.vectors)
            .filter(|(id, _)| id.as_str() != course_id)
            .map(|(id, vector)| SearchHit {
                id: id.clone(),
                score: dot(query, vector),
            })
            .collect();

        // Stable sort keeps table order among equal scores.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dim: usize, alpha: f64) -> EngineConfig {
        let mut config = EngineConfig::new(dim);
        config.alpha = alpha;
        config
    }

    fn semantic() -> Vec<(String, Vec<f32>)> {
        vec![
            ("A".to_string(), vec![1.0, 0.0]),
            ("B".to_string(), vec![0.9, 0.1]),
            ("C".to_string(), vec![0.0, 1.0]),
        ]
    }

    fn structural() -> HashMap<String, Vec<f32>> {
        [
            ("A".to_string(), vec![1.0, 0.0]),
            ("B".to_string(), vec![1.0, 0.0]),
            ("C".to_string(), vec![0.0, 1.0]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_intersection_only() {
        let mut semantic = semantic();
        semantic.push(("D".to_string(), vec![0.5, 0.5]));
        let space = HybridSpace::build(&semantic, &structural(), &config(2, 0.9)).unwrap();
        assert_eq!(space.len(), 3);
        assert!(!space.contains("D"));
    }

    #[test]
    fn test_vectors_unit_norm() {
        let space = HybridSpace::build(&semantic(), &structural(), &config(2, 0.5)).unwrap();
        for hit in space.similar("A", 10) {
            assert!(hit.score <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_similar_excludes_self_and_ranks() {
        let space = HybridSpace::build(&semantic(), &structural(), &config(2, 0.9)).unwrap();
        let hits = space.similar("A", 2);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.id != "A"));
        assert_eq!(hits[0].id, "B");
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn test_unknown_course_empty() {
        let space = HybridSpace::build(&semantic(), &structural(), &config(2, 0.9)).unwrap();
        assert!(space.similar("Z", 5).is_empty());
    }

    #[test]
    fn test_dimension_mismatch_fatal() {
        let semantic = vec![("A".to_string(), vec![1.0, 0.0, 0.0])];
        let err = HybridSpace::build(&semantic, &structural(), &config(2, 0.9)).unwrap_err();
        assert!(matches!(err, EngineError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_structural_dimension_mismatch_fatal() {
        // A short structural vector must abort the build, not silently
        // truncate the blend.
        let structural: HashMap<String, Vec<f32>> =
            [("A".to_string(), vec![1.0])].into_iter().collect();
        let semantic = vec![("A".to_string(), vec![1.0, 0.0])];
        let err = HybridSpace::build(&semantic, &structural, &config(2, 0.9)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::DimensionMismatch {
                actual: 1,
                expected: 2
            }
        ));
    }

    #[test]
    fn test_invalid_alpha_fatal() {
        let err = HybridSpace::build(&semantic(), &structural(), &config(2, 1.5)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidAlpha(_)));
    }

    #[test]
    fn test_top_k_bounds_results() {
        let space = HybridSpace::build(&semantic(), &structural(), &config(2, 0.9)).unwrap();
        assert_eq!(space.similar("A", 1).len(), 1);
        assert_eq!(space.similar("A", 50).len(), 2);
    }
}
