use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::info;

use crate::config::EngineConfig;
use crate::graph::DependencyGraph;

/// Walk corpus over a dependency graph: node ids in a stable order plus
/// walks expressed as indices into that order.
pub struct WalkCorpus {
    pub ids: Vec<String>,
    pub walks: Vec<Vec<usize>>,
}

/// Second-order biased random walks in the node2vec style. From node `v`,
/// having arrived from `t`, the unnormalized probability of stepping to `x`
/// is 1/p when x == t, 1 when x neighbors t, and 1/q otherwise. Walks follow
/// forward edges; a node with no outgoing edge ends its walk early.
///
/// Generation is parallel across start nodes; each (node, walk) pair gets
/// its own seeded RNG so the corpus is reproducible.
pub fn generate_walks(graph: &DependencyGraph, config: &EngineConfig) -> WalkCorpus {
    let ids: Vec<String> = graph.node_ids().map(str::to_string).collect();
    let index: std::collections::HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.as_str(), i))
        .collect();

    let successors: Vec<Vec<usize>> = ids
        .iter()
        .map(|id| {
            graph
                .dependents(id)
                .into_iter()
                .map(|n| index[n])
                .collect()
        })
        .collect();
    let successor_sets: Vec<HashSet<usize>> = successors
        .iter()
        .map(|s| s.iter().copied().collect())
        .collect();

    let walks: Vec<Vec<usize>> = (0..ids.len())
        .into_par_iter()
        .flat_map_iter(|start| {
            let successors = &successors;
            let successor_sets = &successor_sets;
            (0..config.num_walks).map(move |walk_idx| {
                let seed = config
                    .seed
                    .wrapping_mul(0x9e3779b97f4a7c15)
                    .wrapping_add((start as u64) << 20)
                    .wrapping_add(walk_idx as u64);
                let mut rng = StdRng::seed_from_u64(seed);
                single_walk(
                    start,
                    successors,
                    successor_sets,
                    config.walk_length,
                    config.p,
                    config.q,
                    &mut rng,
                )
            })
        })
        .collect();

    info!(
        nodes = ids.len(),
        walks = walks.len(),
        "generated random-walk corpus"
    );
    WalkCorpus { ids, walks }
}

fn single_walk(
    start: usize,
    successors: &[Vec<usize>],
    successor_sets: &[HashSet<usize>],
    walk_length: usize,
    p: f64,
    q: f64,
    rng: &mut StdRng,
) -> Vec<usize> {
    let mut walk = Vec::with_capacity(walk_length);
    walk.push(start);

    while walk.len() < walk_length {
        let current = *walk.last().unwrap();
        let candidates = &successors[current];
        if candidates.is_empty() {
            break;
        }

        let next = if walk.len() == 1 {
            candidates[rng.gen_range(0..candidates.len())]
        } else {
            let previous = walk[walk.len() - 2];
            biased_step(candidates, previous, &successor_sets[previous], p, q, rng)
        };
        walk.push(next);
    }
    walk
}

fn biased_step(
    candidates: &[usize],
    previous: usize,
    previous_neighbors: &HashSet<usize>,
    p: f64,
    q: f64,
    rng: &mut StdRng,
) -> usize {
    let weights: Vec<f64> = candidates
        .iter()
        .map(|&x| {
            if x == previous {
                1.0 / p
            } else if previous_neighbors.contains(&x) {
                1.0
            } else {
                1.0 / q
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    let mut draw = rng.gen::<f64>() * total;
    for (candidate, weight) in candidates.iter().zip(&weights) {
        draw -= weight;
        if draw <= 0.0 {
            return *candidate;
        }
    }
    *candidates.last().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Course};

    fn course(title: &str, prereqs: &str) -> Course {
        Course {
            code: String::new(),
            title: title.to_string(),
            description: String::new(),
            prerequisites: prereqs.to_string(),
        }
    }

    fn chain_graph() -> DependencyGraph {
        DependencyGraph::build(&Catalog::from_courses(vec![
            course("CSC108H5", "None"),
            course("CSC148H5", "CSC108H5"),
            course("CSC207H5", "CSC148H5"),
        ]))
    }

    fn small_config() -> EngineConfig {
        let mut config = EngineConfig::new(8);
        config.num_walks = 5;
        config.walk_length = 4;
        config
    }

    #[test]
    fn test_every_node_starts_walks() {
        let corpus = generate_walks(&chain_graph(), &small_config());
        assert_eq!(corpus.walks.len(), 3 * 5);
        for (i, _) in corpus.ids.iter().enumerate() {
            assert!(corpus.walks.iter().any(|w| w[0] == i));
        }
    }

    #[test]
    fn test_walks_respect_length_bound() {
        let corpus = generate_walks(&chain_graph(), &small_config());
        assert!(corpus
            .walks
            .iter()
            .all(|w| !w.is_empty() && w.len() <= 4));
    }

    #[test]
    fn test_walks_follow_forward_edges() {
        // Chain 108 -> 148 -> 207: a walk from 108 can only be a prefix of it.
        let corpus = generate_walks(&chain_graph(), &small_config());
        let pos = |id: &str| corpus.ids.iter().position(|x| x == id).unwrap();
        let chain = [pos("CSC108H5"), pos("CSC148H5"), pos("CSC207H5")];
        for walk in corpus.walks.iter().filter(|w| w[0] == chain[0]) {
            assert_eq!(walk.as_slice(), &chain[..walk.len()]);
        }
    }

    #[test]
    fn test_deterministic_for_fixed_seed() {
        let graph = chain_graph();
        let config = small_config();
        let a = generate_walks(&graph, &config);
        let b = generate_walks(&graph, &config);
        assert_eq!(a.walks, b.walks);
    }
}
