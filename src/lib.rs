pub mod catalog;
pub mod config;
pub mod embed;
pub mod engine;
pub mod error;
pub mod graph;
pub mod search;

pub use catalog::{Catalog, Course};
pub use config::EngineConfig;
pub use engine::CourseEngine;
pub use error::{EngineError, Result};
pub use graph::{DependencyGraph, GraphLink, GraphNode, PrereqClause, SubgraphPayload};
pub use search::{FusionStrategy, QueryEncoder, SearchHit, SearchOptions};

/// Default hybrid-blend weight toward the semantic side.
pub const DEFAULT_ALPHA: f64 = 0.9348;

/// Default embedding dimensionality, matching the semantic vectors the
/// catalog pipeline produces.
pub const DEFAULT_DIMENSIONS: usize = 1536;
