use crate::error::{EngineError, Result};
use crate::models::{WeightVector, RESULT_LIMIT};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub neo4j: Neo4jConfig,
    pub redis: RedisConfig,
    pub engine: EngineConfig,
}

#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    /// Neo4j bolt URI, e.g. bolt://neo4j:7687
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Upper bound for one Cypher query (execute + stream drain).
    pub query_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    /// Upper bound for one weight store operation.
    pub op_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Final ranking cap.
    pub top_n: usize,
    /// Default multiplier used to build the global weight vector when the
    /// store has none persisted.
    pub default_weight: f64,
    /// Optional cap on adapted weights. Disabled by default; without it
    /// repeated events compound multiplicatively without bound.
    pub weight_ceiling: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_n: RESULT_LIMIT,
            default_weight: 1.0,
            weight_ceiling: None,
        }
    }
}

impl EngineConfig {
    /// The injected global default vector. Passed into the weight store at
    /// construction instead of living as ambient process state.
    pub fn default_weights(&self) -> WeightVector {
        WeightVector::uniform(self.default_weight)
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        // NEO4J_PASSWORD is deliberately required; a default credential here
        // would only hide a deployment mistake until the first query.
        let password = env::var("NEO4J_PASSWORD")
            .map_err(|_| EngineError::Configuration("NEO4J_PASSWORD is not set".to_string()))?;

        Ok(Config {
            neo4j: Neo4jConfig {
                uri: env::var("NEO4J_URI")
                    .unwrap_or_else(|_| "bolt://localhost:7687".to_string()),
                user: env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string()),
                password,
                query_timeout: Duration::from_millis(parse_var("NEO4J_QUERY_TIMEOUT_MS", 3000)?),
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
                op_timeout: Duration::from_millis(parse_var("REDIS_OP_TIMEOUT_MS", 5000)?),
            },
            engine: EngineConfig {
                top_n: parse_var("ENGINE_TOP_N", RESULT_LIMIT)?,
                default_weight: parse_var("ENGINE_DEFAULT_WEIGHT", 1.0)?,
                weight_ceiling: parse_optional_var("ENGINE_WEIGHT_CEILING")?,
            },
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
{
    match env::var(name) {
        Ok(raw) => raw.parse::<T>().map_err(|_| {
            EngineError::Configuration(format!("{} has an invalid value: {}", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

fn parse_optional_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
{
    match env::var(name) {
        Ok(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            EngineError::Configuration(format!("{} has an invalid value: {}", name, raw))
        }),
        Err(_) => Ok(None),
    }
}
