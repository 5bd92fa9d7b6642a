use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The graph backend could not be reached, or a query timed out.
    /// Fatal to the enclosing recommend/adjust call; never retried here.
    #[error("Graph backend unavailable: {0}")]
    GraphUnavailable(String),

    /// The weight persistence backend could not be reached or timed out.
    #[error("Weight store unavailable: {0}")]
    WeightStoreUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<neo4rs::Error> for EngineError {
    fn from(err: neo4rs::Error) -> Self {
        EngineError::GraphUnavailable(err.to_string())
    }
}

impl From<redis::RedisError> for EngineError {
    fn from(err: redis::RedisError) -> Self {
        EngineError::WeightStoreUnavailable(err.to_string())
    }
}

impl From<redis_utils::OpError> for EngineError {
    fn from(err: redis_utils::OpError) -> Self {
        EngineError::WeightStoreUnavailable(err.to_string())
    }
}
