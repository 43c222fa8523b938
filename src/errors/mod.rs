use thiserror::Error;

/// Failures that abort a model build, reject a malformed query, or indicate a
/// programming error.
///
/// Query-time resolution failures (unknown restaurant, user or address) are not
/// errors; they are reported through [`crate::ranking::QueryOutcome`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Missing required columns in {table}: {missing:?}")]
    Schema {
        table: &'static str,
        missing: Vec<String>,
    },

    #[error("Model not built: {0}")]
    ModelNotBuilt(&'static str),

    #[error("Invalid fusion weights: {0}")]
    InvalidWeights(String),

    /// A query whose parameters contradict each other
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl EngineError {
    pub fn schema(table: &'static str, missing: Vec<String>) -> Self {
        EngineError::Schema { table, missing }
    }
}

/// Context message for dataset loading failures
pub fn dataset_context(source: &str) -> String {
    format!("Failed to load dataset from: {}", source)
}

/// Context message for model persistence failures
pub fn model_context(operation: &str, path: &str) -> String {
    format!("Failed to {} model at: {}", operation, path)
}
