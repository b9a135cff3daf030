pub mod hybrid;
pub mod math;
pub mod skipgram;
pub mod walks;

pub use hybrid::HybridSpace;
pub use skipgram::train_structural_embeddings;
pub use walks::{generate_walks, WalkCorpus};
