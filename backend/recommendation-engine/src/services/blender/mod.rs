use super::strategy::StrategySet;
use super::weights::WeightStore;
use crate::error::Result;
use crate::models::{Recommendation, WeightVector};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Weighted aggregation of all strategy outputs into one ranked list.
///
/// Relevance values are raw per-strategy path counts and are deliberately
/// not normalized against each other before weighting: a strategy that
/// returns larger raw counts dominates the blend unless its weight is tuned
/// to compensate.
pub struct Blender {
    strategies: Arc<StrategySet>,
    weights: Arc<dyn WeightStore>,
    top_n: usize,
}

impl Blender {
    pub fn new(strategies: Arc<StrategySet>, weights: Arc<dyn WeightStore>, top_n: usize) -> Self {
        Self {
            strategies,
            weights,
            top_n,
        }
    }

    /// Blend all strategies for one user. When `weights` is `None` the
    /// effective vector comes from the weight store (seeding it if absent).
    /// Any strategy failure aborts the whole blend; there is no
    /// partial-result fallback.
    pub async fn recommend(
        &self,
        user_id: i64,
        weights: Option<WeightVector>,
    ) -> Result<Vec<Recommendation>> {
        let weights = match weights {
            Some(vector) => vector,
            None => self.weights.get_user_weights(user_id).await?,
        };

        // Strategies are read-only and independent, so they fan out in
        // parallel; results are merged strictly in declared order to keep
        // tie-breaking deterministic.
        let results = join_all(
            self.strategies
                .strategies()
                .iter()
                .map(|strategy| strategy.score(user_id)),
        )
        .await;

        let mut first_seen: Vec<i64> = Vec::new();
        let mut scores: HashMap<i64, f64> = HashMap::new();

        for (strategy, result) in self.strategies.strategies().iter().zip(results) {
            let candidates = result?;
            let weight = weights.get(strategy.kind());

            for candidate in candidates {
                let score = scores.entry(candidate.product_id).or_insert_with(|| {
                    first_seen.push(candidate.product_id);
                    0.0
                });
                *score += candidate.relevance * weight;
            }
        }

        let mut ranked: Vec<Recommendation> = first_seen
            .into_iter()
            .map(|product_id| Recommendation {
                product_id,
                score: scores.get(&product_id).copied().unwrap_or(0.0),
            })
            .collect();

        // Stable sort: equal scores keep first-seen order, which is the
        // declared strategy order.
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(self.top_n);

        info!(user_id, count = ranked.len(), "Blend completed");
        Ok(ranked)
    }
}
