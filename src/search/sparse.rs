use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::search::SearchHit;

lazy_static! {
    // Word tokens of two or more characters, the sklearn default shape.
    static ref TOKEN: Regex = Regex::new(r"\w\w+").unwrap();
}

/// TF-IDF weighted term index over catalog titles. Smoothed idf
/// (`ln((1+n)/(1+df)) + 1`) and L2-normalized document rows, so query/doc
/// dot products behave like cosine scores.
pub struct TfidfIndex {
    ids: Vec<String>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    rows: Vec<Vec<(usize, f32)>>,
}

impl TfidfIndex {
    pub fn build(documents: &[(String, String)]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|(_, text)| tokenize(text))
            .collect();

        for tokens in &tokenized {
            for token in tokens {
                let next = vocabulary.len();
                vocabulary.entry(token.clone()).or_insert(next);
            }
        }

        let n_docs = documents.len();
        let mut df = vec![0usize; vocabulary.len()];
        for tokens in &tokenized {
            let mut seen = vec![false; vocabulary.len()];
            for token in tokens {
                let term = vocabulary[token];
                if !seen[term] {
                    seen[term] = true;
                    df[term] += 1;
                }
            }
        }

        let idf: Vec<f32> = df
            .iter()
            .map(|&d| ((1.0 + n_docs as f32) / (1.0 + d as f32)).ln() + 1.0)
            .collect();

        let rows: Vec<Vec<(usize, f32)>> = tokenized
            .iter()
            .map(|tokens| weigh(tokens, &vocabulary, &idf))
            .collect();

        Self {
            ids: documents.iter().map(|(id, _)| id.clone()).collect(),
            vocabulary,
            idf,
            rows,
        }
    }

    /// Scores every document against the query and keeps the `top_k`
    /// highest. No zero-score filter: rank position in this branch is what
    /// fusion consumes, mirroring a plain argsort cut.
    pub fn search(&self, query: &str, top_k: usize) -> Vec<SearchHit> {
        let query_vec = weigh(&tokenize(query), &self.vocabulary, &self.idf);
        if query_vec.is_empty() {
            return Vec::new();
        }
        let query_dense: HashMap<usize, f32> = query_vec.into_iter().collect();

        let mut scored: Vec<SearchHit> = self
            .ids
            .iter()
            .zip(&self.rows)
            .map(|(id, row)| {
                let score = row
                    .iter()
                    .map(|(term, w)| query_dense.get(term).copied().unwrap_or(0.0) * w)
                    .sum();
                SearchHit {
                    id: id.clone(),
                    score,
                }
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

fn tokenize(text: &str) -> Vec<String> {
    TOKEN
        .find_iter(&text.to_lowercase())
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Raw term counts weighted by idf, L2-normalized, as a sparse row.
fn weigh(
    tokens: &[String],
    vocabulary: &HashMap<String, usize>,
    idf: &[f32],
) -> Vec<(usize, f32)> {
    let mut counts: HashMap<usize, f32> = HashMap::new();
    for token in tokens {
        if let Some(&term) = vocabulary.get(token) {
            *counts.entry(term).or_insert(0.0) += 1.0;
        }
    }

    let mut row: Vec<(usize, f32)> = counts
        .into_iter()
        .map(|(term, tf)| (term, tf * idf[term]))
        .collect();
    row.sort_unstable_by_key(|(term, _)| *term);

    let norm: f32 = row.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in row.iter_mut() {
            *w /= norm;
        }
    }
    row
}
