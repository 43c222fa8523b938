pub mod catalog;
pub mod models;
pub mod raw;

pub use catalog::Catalog;
pub use models::{Restaurant, Review, ReviewStats, Sentiment, SentimentCounts};
pub use raw::{RawDataset, RawRestaurant, RawReview};
