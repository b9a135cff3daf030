pub mod cache;
pub mod dense;
pub mod fusion;
pub mod sparse;
pub mod trie;

use serde::{Deserialize, Serialize};

pub use cache::{CacheStats, QueryCache};
pub use dense::{DenseIndex, QueryEncoder};
pub use fusion::{fuse, FusionStrategy, HybridSearcher, SearchOptions};
pub use sparse::TfidfIndex;
pub use trie::Trie;

/// One ranked result. Dense, sparse, fused and recommendation lists all
/// share this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
}
