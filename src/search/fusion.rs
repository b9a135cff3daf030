use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info};

use crate::graph::COURSE_CODE;
use crate::search::dense::{DenseIndex, QueryEncoder};
use crate::search::sparse::TfidfIndex;
use crate::search::SearchHit;

/// RRF dampening constant, the conventional value.
const RRF_K: f32 = 60.0;
/// Fused lists are always cut to this many hits.
const RESULT_CAP: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum FusionStrategy {
    ReciprocalRank,
    WeightedScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    pub top_k_dense: usize,
    pub top_k_sparse: usize,
    pub weight_dense: f32,
    pub weight_sparse: f32,
    pub strategy: FusionStrategy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k_dense: 20,
            top_k_sparse: 20,
            weight_dense: 0.6,
            weight_sparse: 0.4,
            strategy: FusionStrategy::ReciprocalRank,
        }
    }
}

/// Dense + lexical retrieval over one catalog, fused into a single ranked
/// list. The two branches run independently; an item found by only one
/// branch keeps that branch's weighted contribution and is not penalized
/// for missing the other.
pub struct HybridSearcher {
    dense: DenseIndex,
    sparse: TfidfIndex,
    encoder: Box<dyn QueryEncoder>,
    catalog_ids: Vec<String>,
}

impl HybridSearcher {
    pub fn build(
        items: Vec<(String, Vec<f32>)>,
        titles: &[(String, String)],
        encoder: Box<dyn QueryEncoder>,
    ) -> Self {
        let catalog_ids = items.iter().map(|(id, _)| id.clone()).collect();
        let searcher = Self {
            dense: DenseIndex::build(items),
            sparse: TfidfIndex::build(titles),
            encoder,
            catalog_ids,
        };
        info!(items = searcher.dense.len(), "built hybrid searcher");
        searcher
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        // Exact catalog identity beats fuzzy ranking: a bare course code
        // embedded in a catalog id answers the query by itself.
        if let Some(hit) = self.exact_match(query) {
            debug!(query, "exact course-code match short-circuits retrieval");
            return vec![hit];
        }

        let dense_hits = self
            .dense
            .search(&self.encoder.encode(query), options.top_k_dense);
        let sparse_hits = self.sparse.search(query, options.top_k_sparse);
        debug!(
            dense = dense_hits.len(),
            sparse = sparse_hits.len(),
            "branch retrieval complete"
        );

        fuse(&dense_hits, &sparse_hits, options)
    }

    fn exact_match(&self, query: &str) -> Option<SearchHit> {
        let upper = query.to_uppercase();
        let m = COURSE_CODE.find(&upper)?;
        if m.start() != 0 || m.end() != upper.len() {
            return None;
        }
        let code = m.as_str();
        self.catalog_ids
            .iter()
            .find(|id| id.contains(code))
            .map(|id| SearchHit {
                id: id.clone(),
                score: 1.0,
            })
    }
}

/// Rank or score fusion of the two branch result lists. Union of ids,
/// descending fused score, capped at [`RESULT_CAP`].
pub fn fuse(dense: &[SearchHit], sparse: &[SearchHit], options: &SearchOptions) -> Vec<SearchHit> {
    let dense_by_id: HashMap<&str, (usize, f32)> = dense
        .iter()
        .enumerate()
        .map(|(rank, h)| (h.id.as_str(), (rank, h.score)))
        .collect();
    let sparse_by_id: HashMap<&str, (usize, f32)> = sparse
        .iter()
        .enumerate()
        .map(|(rank, h)| (h.id.as_str(), (rank, h.score)))
        .collect();

    // Dense order first, then sparse-only ids, so ties resolve predictably.
    let mut ids: Vec<&str> = dense.iter().map(|h| h.id.as_str()).collect();
    for hit in sparse {
        if !dense_by_id.contains_key(hit.id.as_str()) {
            ids.push(hit.id.as_str());
        }
    }

    let rrf = |rank: usize| 1.0 / (RRF_K + rank as f32);

    let mut fused: Vec<SearchHit> = ids
        .into_iter()
        .map(|id| {
            let score = match options.strategy {
                FusionStrategy::ReciprocalRank => {
                    let d = dense_by_id
                        .get(id)
                        .map(|(rank, _)| rrf(*rank) * options.weight_dense)
                        .unwrap_or(0.0);
                    let s = sparse_by_id
                        .get(id)
                        .map(|(rank, _)| rrf(*rank) * options.weight_sparse)
                        .unwrap_or(0.0);
                    d + s
                }
                FusionStrategy::WeightedScore => {
                    let d = dense_by_id.get(id).map(|(_, score)| *score).unwrap_or(0.0);
                    let s = sparse_by_id.get(id).map(|(_, score)| *score).unwrap_or(0.0);
                    options.weight_dense * d + options.weight_sparse * s
                }
            };
            SearchHit {
                id: id.to_string(),
                score,
            }
        })
        .collect();

    fused.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    fused.truncate(RESULT_CAP);
    fused
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, score: f32) -> SearchHit {
        SearchHit {
            id: id.to_string(),
            score,
        }
    }

    struct KeywordEncoder;

    impl QueryEncoder for KeywordEncoder {
        // Toy two-axis space: [programming-ness, statistics-ness].
        fn encode(&self, text: &str) -> Vec<f32> {
            let text = text.to_lowercase();
            let programming = text.contains("programming") as u8 as f32;
            let statistics = text.contains("statistics") as u8 as f32;
            vec![programming, statistics]
        }
    }

    fn searcher() -> HybridSearcher {
        HybridSearcher::build(
            vec![
                ("CSC108H5".to_string(), vec![1.0, 0.0]),
                ("STA256H5".to_string(), vec![0.0, 1.0]),
                ("CSC263H5".to_string(), vec![0.8, 0.2]),
            ],
            &[
                ("CSC108H5".to_string(), "Introduction to Programming".to_string()),
                ("STA256H5".to_string(), "Probability and Statistics".to_string()),
                ("CSC263H5".to_string(), "Data Structures".to_string()),
            ],
            Box::new(KeywordEncoder),
        )
    }

    #[test]
    fn test_rrf_both_branches_beats_single_branch() {
        let dense = vec![hit("X", 0.9), hit("Y", 0.8)];
        let sparse = vec![hit("X", 0.5), hit("Z", 0.4)];
        let options = SearchOptions::default();
        let fused = fuse(&dense, &sparse, &options);

        let score = |id: &str| fused.iter().find(|h| h.id == id).unwrap().score;
        // X is rank 0 in both; each standalone term alone must be smaller.
        let dense_alone = (1.0 / 60.0) * options.weight_dense;
        let sparse_alone = (1.0 / 60.0) * options.weight_sparse;
        assert!(score("X") > dense_alone);
        assert!(score("X") > sparse_alone);
        assert_eq!(fused[0].id, "X");
    }

    #[test]
    fn test_single_branch_item_not_penalized() {
        let dense = vec![hit("A", 0.9)];
        let sparse = vec![hit("B", 0.7)];
        let options = SearchOptions::default();
        let fused = fuse(&dense, &sparse, &options);
        let score = |id: &str| fused.iter().find(|h| h.id == id).unwrap().score;
        assert!((score("A") - (1.0 / 60.0) * 0.6).abs() < 1e-6);
        assert!((score("B") - (1.0 / 60.0) * 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_weighted_score_fusion() {
        let dense = vec![hit("A", 1.0)];
        let sparse = vec![hit("A", 0.5), hit("B", 1.0)];
        let mut options = SearchOptions::default();
        options.strategy = FusionStrategy::WeightedScore;
        let fused = fuse(&dense, &sparse, &options);
        let score = |id: &str| fused.iter().find(|h| h.id == id).unwrap().score;
        assert!((score("A") - (0.6 + 0.2)).abs() < 1e-6);
        assert!((score("B") - 0.4).abs() < 1e-6);
        assert_eq!(fused[0].id, "A");
    }

    #[test]
    fn test_result_cap() {
        let dense: Vec<SearchHit> = (0..15).map(|i| hit(&format!("D{i}"), 1.0)).collect();
        let fused = fuse(&dense, &[], &SearchOptions::default());
        assert_eq!(fused.len(), RESULT_CAP);
    }

    #[test]
    fn test_empty_query_no_hits() {
        assert!(searcher().search("   ", &SearchOptions::default()).is_empty());
    }

    #[test]
    fn test_exact_code_short_circuits() {
        let hits = searcher().search("csc108h5", &SearchOptions::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "CSC108H5");
        assert_eq!(hits[0].score, 1.0);
    }

    #[test]
    fn test_code_not_in_catalog_falls_through() {
        let hits = searcher().search("ZZZ999H5", &SearchOptions::default());
        assert!(hits.iter().all(|h| h.id != "ZZZ999H5"));
    }

    #[test]
    fn test_both_branches_agree_on_best() {
        let hits = searcher().search("programming", &SearchOptions::default());
        assert!(!hits.is_empty());
        assert_eq!(hits[0].id, "CSC108H5");
    }

    #[test]
    fn test_strategy_display_roundtrip() {
        use std::str::FromStr;
        assert_eq!(FusionStrategy::ReciprocalRank.to_string(), "reciprocal_rank");
        assert_eq!(
            FusionStrategy::from_str("weighted_score").unwrap(),
            FusionStrategy::WeightedScore
        );
    }
}
