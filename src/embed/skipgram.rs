use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::config::EngineConfig;
use crate::embed::walks::WalkCorpus;

/// Skip-gram with negative sampling over a random-walk corpus. This is the
/// word2vec step of the structural embedding: nodes that co-occur inside a
/// walk window end up close in the vector space. Training is sequential so
/// a fixed seed reproduces the exact vectors.
///
/// Returns a vector per node that appears in at least one walk.
pub fn train_structural_embeddings(
    corpus: &WalkCorpus,
    config: &EngineConfig,
) -> HashMap<String, Vec<f32>> {
    let n = corpus.ids.len();
    let dim = config.dimensions;
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));

    let mut in_vectors: Vec<Vec<f32>> = (0..n)
        .map(|_| {
            (0..dim)
                .map(|_| (rng.gen::<f32>() - 0.5) / dim as f32)
                .collect()
        })
        .collect();
    let mut out_vectors: Vec<Vec<f32>> = vec![vec![0.0; dim]; n];

    let negative_table = build_negative_table(corpus, n);
    let lr = config.learning_rate as f32;

    let mut pairs = 0usize;
    for _ in 0..config.epochs {
        for walk in &corpus.walks {
            for (i, &center) in walk.iter().enumerate() {
                let lo = i.saturating_sub(config.window);
                let hi = (i + config.window + 1).min(walk.len());
                for j in lo..hi {
                    if j == i {
                        continue;
                    }
                    train_pair(
                        center,
                        walk[j],
                        &mut in_vectors,
                        &mut out_vectors,
                        &negative_table,
                        config.negative_samples,
                        lr,
                        &mut rng,
                    );
                    pairs += 1;
                }
            }
        }
    }

    let seen: HashSet<usize> = corpus.walks.iter().flatten().copied().collect();
    let embeddings: HashMap<String, Vec<f32>> = seen
        .into_iter()
        .map(|idx| (corpus.ids[idx].clone(), in_vectors[idx].clone()))
        .collect();

    info!(
        nodes = embeddings.len(),
        pairs, "trained structural embeddings"
    );
    embeddings
}

/// Unigram distribution raised to 3/4, the word2vec negative-sampling shape.
fn build_negative_table(corpus: &WalkCorpus, n: usize) -> Vec<f64> {
    let mut counts = vec![0usize; n];
    for walk in &corpus.walks {
        for &node in walk {
            counts[node] += 1;
        }
    }
    let mut cumulative = Vec::with_capacity(n);
    let mut total = 0.0;
    for count in counts {
        total += (count as f64).powf(0.75);
        cumulative.push(total);
    }
    cumulative
}

fn sample_negative(table: &[f64], rng: &mut StdRng) -> usize {
    let total = *table.last().unwrap_or(&0.0);
    if total <= 0.0 {
        return 0;
    }
    let draw = rng.gen::<f64>() * total;
    table.partition_point(|&c| c < draw).min(table.len() - 1)
}

#[allow(clippy::too_many_arguments)]
fn train_pair(
    center: usize,
    context: usize,
    in_vectors: &mut [Vec<f32>],
    out_vectors: &mut [Vec<f32>],
    negative_table: &[f64],
    negative_samples: usize,
    lr: f32,
    rng: &mut StdRng,
) {
    let dim = in_vectors[center].len();
    let mut gradient = vec![0.0f32; dim];

    for k in 0..=negative_samples {
        let (target, label) = if k == 0 {
            (context, 1.0f32)
        } else {
            let negative = sample_negative(negative_table, rng);
            if negative == context {
                continue;
            }
            (negative, 0.0f32)
        };

        let score: f32 = in_vectors[center]
            .iter()
            .zip(&out_vectors[target])
            .map(|(a, b)| a * b)
            .sum();
        let g = (label - sigmoid(score)) * lr;

        for d in 0..dim {
            gradient[d] += g * out_vectors[target][d];
            out_vectors[target][d] += g * in_vectors[center][d];
        }
    }

    for d in 0..dim {
        in_vectors[center][d] += gradient[d];
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x.clamp(-6.0, 6.0)).exp())
}
