pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{EngineError, Result};
pub use graph::GraphClient;
pub use models::{EventKind, Recommendation, ScoredProduct, StrategyKind, WeightVector};
pub use services::{
    Blender, InMemoryWeightStore, RecommendationEngine, RedisWeightStore, ScoringStrategy,
    StrategySet, WeightAdapter, WeightStore,
};
