pub mod outcome;
pub mod results;
pub mod service;

pub use outcome::{QueryOutcome, Unresolved};
pub use service::RecommendationService;
