pub mod cosine;
pub mod fusion;
pub mod location;
pub mod numeric;
pub mod query;
pub mod tfidf;

pub use fusion::{FusionEngine, SimilarityModel};
pub use query::SimilarityHit;
