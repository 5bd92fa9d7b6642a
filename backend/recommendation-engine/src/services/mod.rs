pub mod adapter;
pub mod blender;
pub mod strategy;
pub mod weights;

pub use adapter::WeightAdapter;
pub use blender::Blender;
pub use strategy::{ScoringStrategy, StrategySet};
pub use weights::{InMemoryWeightStore, RedisWeightStore, WeightStore};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{EventKind, Recommendation, WeightVector};
use std::sync::Arc;

/// The engine facade the API layer talks to: blended recommendations on one
/// side, event-driven weight adaptation on the other.
pub struct RecommendationEngine {
    blender: Blender,
    adapter: WeightAdapter,
    weights: Arc<dyn WeightStore>,
}

impl RecommendationEngine {
    pub fn new(
        strategies: StrategySet,
        weights: Arc<dyn WeightStore>,
        config: &EngineConfig,
    ) -> Self {
        let strategies = Arc::new(strategies);
        Self {
            blender: Blender::new(strategies.clone(), weights.clone(), config.top_n),
            adapter: WeightAdapter::new(strategies, weights.clone(), config.weight_ceiling),
            weights,
        }
    }

    /// Personalized ranked list for a user, at most top-N entries.
    pub async fn recommend(&self, user_id: i64) -> Result<Vec<Recommendation>> {
        self.blender.recommend(user_id, None).await
    }

    /// Like [`recommend`](Self::recommend) but with a caller-supplied
    /// vector; the weight store is not consulted.
    pub async fn recommend_with_weights(
        &self,
        user_id: i64,
        weights: WeightVector,
    ) -> Result<Vec<Recommendation>> {
        self.blender.recommend(user_id, Some(weights)).await
    }

    /// Record a behavioral event and return the user's updated full weight
    /// vector.
    pub async fn record_event(
        &self,
        user_id: i64,
        product_id: i64,
        event: EventKind,
    ) -> Result<WeightVector> {
        self.adapter.adjust(user_id, product_id, event).await
    }

    // Administrative surface, off the hot path.

    pub async fn get_user_weights(&self, user_id: i64) -> Result<WeightVector> {
        self.weights.get_user_weights(user_id).await
    }

    pub async fn set_user_weights(&self, user_id: i64, weights: &WeightVector) -> Result<()> {
        self.weights.set_user_weights(user_id, weights).await
    }

    pub async fn get_global_weights(&self) -> Result<WeightVector> {
        self.weights.get_global_weights().await
    }

    pub async fn set_global_weights(&self, weights: &WeightVector) -> Result<()> {
        self.weights.set_global_weights(weights).await
    }
}
