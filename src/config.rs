use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Build-time parameters for the whole engine. Everything here is fixed at
/// construction; the built structures are immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Dimensionality shared by the structural, semantic and hybrid spaces.
    pub dimensions: usize,
    pub walk_length: usize,
    pub num_walks: usize,
    /// Return bias: higher p discourages revisiting the previous node.
    pub p: f64,
    /// In-out bias: higher q keeps walks close to the start node.
    pub q: f64,
    /// Skip-gram context window over each walk.
    pub window: usize,
    /// Negative samples per positive pair.
    pub negative_samples: usize,
    pub learning_rate: f64,
    pub epochs: usize,
    /// RNG seed for walks and skip-gram init.
    pub seed: u64,

    /// Semantic share of the hybrid blend.
    pub alpha: f64,

    pub cache_capacity: usize,
    pub cache_ttl_secs: u64,
}

impl EngineConfig {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            walk_length: 10,
            num_walks: 100,
            p: 1.0,
            q: 4.0,
            window: 5,
            negative_samples: 5,
            learning_rate: 0.025,
            epochs: 1,
            seed: 42,
            alpha: crate::DEFAULT_ALPHA,
            cache_capacity: 1000,
            cache_ttl_secs: 300,
        }
    }

    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("COURSEGRAPH_DIMENSIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(crate::DEFAULT_DIMENSIONS),
        );

        if let Some(n) = std::env::var("COURSEGRAPH_WALK_LENGTH")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.walk_length = n;
        }
        if let Some(n) = std::env::var("COURSEGRAPH_NUM_WALKS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.num_walks = n;
        }
        if let Some(a) = std::env::var("COURSEGRAPH_ALPHA")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.alpha = a;
        }
        if let Some(s) = std::env::var("COURSEGRAPH_SEED")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.seed = s;
        }

        config
    }

    /// The only fatal class of input problems: an invalid blend makes the
    /// whole similarity space meaningless, so the build must not proceed.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(EngineError::InvalidAlpha(self.alpha));
        }
        if self.dimensions == 0 {
            return Err(EngineError::Configuration(
                "embedding dimensions must be positive".to_string(),
            ));
        }
        if self.walk_length == 0 || self.num_walks == 0 {
            return Err(EngineError::Configuration(
                "walk_length and num_walks must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(crate::DEFAULT_DIMENSIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        let mut config = EngineConfig::new(16);
        config.alpha = 1.5;
        assert!(matches!(
            config.validate(),
            Err(EngineError::InvalidAlpha(_))
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let config = EngineConfig::new(0);
        assert!(config.validate().is_err());
    }
}
