use std::collections::HashSet;

use tracing::info;

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::embed::{generate_walks, train_structural_embeddings, HybridSpace};
use crate::error::Result;
use crate::graph::{self, DependencyGraph, SubgraphPayload};
use crate::search::{
    HybridSearcher, QueryCache, QueryEncoder, SearchHit, SearchOptions, Trie,
};

/// The owned handle over the whole intelligence core. Everything is built
/// once here and immutable afterwards; query methods take `&self` and are
/// safe to call concurrently. Rebuilding for a new catalog means building a
/// fresh engine and swapping handles in the host.
pub struct CourseEngine {
    catalog: Catalog,
    graph: DependencyGraph,
    hybrid: HybridSpace,
    trie: Trie,
    searcher: HybridSearcher,
    similar_cache: QueryCache<Vec<SearchHit>>,
}

impl CourseEngine {
    /// Runs every build phase: prerequisite graph, random-walk structural
    /// embedding, hybrid blend, autocomplete trie, and the two search
    /// indices. `semantic` maps course titles to precomputed vectors and
    /// its order fixes the hybrid table order. The walk/training phase is
    /// the only CPU-heavy step and runs exactly once per catalog version.
    pub fn build(
        catalog: Catalog,
        semantic: Vec<(String, Vec<f32>)>,
        encoder: Box<dyn QueryEncoder>,
        config: EngineConfig,
    ) -> Result<Self> {
        config.validate()?;

        let graph = DependencyGraph::build(&catalog);
        let corpus = generate_walks(&graph, &config);
        let structural = train_structural_embeddings(&corpus, &config);
        let hybrid = HybridSpace::build(&semantic, &structural, &config)?;

        let mut keys: Vec<&str> = Vec::new();
        for course in catalog.iter() {
            if !course.code.is_empty() {
                keys.push(&course.code);
            }
            keys.push(&course.title);
        }
        let trie = Trie::build(keys);

        let titles: Vec<(String, String)> = catalog
            .iter()
            .map(|c| (c.title.clone(), c.title.clone()))
            .collect();
        let searcher = HybridSearcher::build(semantic, &titles, encoder);

        info!(
            courses = catalog.len(),
            hybrid = hybrid.len(),
            "course engine ready"
        );
        Ok(Self {
            catalog,
            graph,
            hybrid,
            trie,
            searcher,
            similar_cache: QueryCache::new(config.cache_capacity, config.cache_ttl_secs),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Transitive prerequisite closure of a course.
    pub fn ancestors(&self, course_id: &str) -> HashSet<String> {
        graph::ancestors(&self.graph, course_id)
    }

    /// Visualization payload: ancestor subgraph plus one hop forward.
    pub fn prereq_subgraph(&self, course_id: &str) -> SubgraphPayload {
        graph::subgraph(&self.graph, course_id)
    }

    /// Visualization payload: only edges touching the course.
    pub fn prereq_neighbors(&self, course_id: &str) -> SubgraphPayload {
        graph::neighbors(&self.graph, course_id)
    }

    /// Up to `k` autocomplete suggestions for a code/title prefix.
    pub fn suggest(&self, prefix: &str, k: usize) -> Vec<String> {
        let mut suggestions = self.trie.query(prefix);
        suggestions.truncate(k);
        suggestions
    }

    /// Top-k most similar courses in the hybrid embedding space.
    pub fn similar(&self, course_id: &str, top_k: usize) -> Vec<SearchHit> {
        let key = QueryCache::<Vec<SearchHit>>::make_key(course_id, top_k);
        if let Some(cached) = self.similar_cache.get(&key) {
            return cached;
        }
        let hits = self.hybrid.similar(course_id, top_k);
        self.similar_cache.put(key, hits.clone());
        hits
    }

    /// Fused dense + lexical catalog search.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchHit> {
        self.searcher.search(query, options)
    }
}
