use super::strategy::StrategySet;
use super::weights::WeightStore;
use crate::error::Result;
use crate::models::{EventKind, WeightVector};
use dashmap::DashMap;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Adapts a user's weight vector from behavioral events.
///
/// Every strategy that claims the event's product gets its weight
/// multiplied by the event factor. Growth compounds across events; the
/// optional ceiling is the only bound.
pub struct WeightAdapter {
    strategies: Arc<StrategySet>,
    weights: Arc<dyn WeightStore>,
    ceiling: Option<f64>,
    user_locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl WeightAdapter {
    pub fn new(
        strategies: Arc<StrategySet>,
        weights: Arc<dyn WeightStore>,
        ceiling: Option<f64>,
    ) -> Self {
        Self {
            strategies,
            weights,
            ceiling,
            user_locks: DashMap::new(),
        }
    }

    /// Apply one event and return the updated full vector.
    ///
    /// The load-mutate-persist sequence for a user is serialized behind a
    /// per-user mutex so concurrent events for the same user cannot lose
    /// updates; adjustments for different users proceed independently.
    pub async fn adjust(
        &self,
        user_id: i64,
        product_id: i64,
        event: EventKind,
    ) -> Result<WeightVector> {
        let lock = {
            let entry = self.user_locks.entry(user_id).or_default();
            entry.clone()
        };
        let guard = lock.lock().await;
        let result = self.apply(user_id, product_id, event).await;
        drop(guard);
        drop(lock);

        // Waiters hold their own clones; evict the entry only once the map
        // is the last holder, so the lock table tracks in-flight users
        // instead of every user id ever seen.
        self.user_locks
            .remove_if(&user_id, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    async fn apply(&self, user_id: i64, product_id: i64, event: EventKind) -> Result<WeightVector> {
        let mut vector = self.weights.get_user_weights(user_id).await?;
        let factor = event.factor();

        let results = join_all(
            self.strategies
                .strategies()
                .iter()
                .map(|strategy| strategy.score(user_id)),
        )
        .await;

        for (strategy, result) in self.strategies.strategies().iter().zip(results) {
            let candidates = result?;
            if candidates.iter().any(|c| c.product_id == product_id) {
                vector.scale(strategy.kind(), factor, self.ceiling);
                debug!(
                    user_id,
                    product_id,
                    strategy = strategy.kind().as_str(),
                    factor,
                    "Amplified strategy weight"
                );
            }
        }

        self.weights.set_user_weights(user_id, &vector).await?;
        Ok(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{ScoredProduct, StrategyKind};
    use crate::services::strategy::ScoringStrategy;
    use crate::services::weights::InMemoryWeightStore;
    use async_trait::async_trait;

    struct StubStrategy {
        kind: StrategyKind,
        products: Vec<i64>,
    }

    impl StubStrategy {
        fn boxed(kind: StrategyKind, products: &[i64]) -> Box<dyn ScoringStrategy> {
            Box::new(Self {
                kind,
                products: products.to_vec(),
            })
        }
    }

    #[async_trait]
    impl ScoringStrategy for StubStrategy {
        fn kind(&self) -> StrategyKind {
            self.kind
        }

        async fn score(&self, _user_id: i64) -> Result<Vec<ScoredProduct>> {
            Ok(self
                .products
                .iter()
                .map(|product_id| ScoredProduct {
                    product_id: *product_id,
                    relevance: 1.0,
                })
                .collect())
        }
    }

    struct FailingStrategy;

    #[async_trait]
    impl ScoringStrategy for FailingStrategy {
        fn kind(&self) -> StrategyKind {
            StrategyKind::HighRatings
        }

        async fn score(&self, _user_id: i64) -> Result<Vec<ScoredProduct>> {
            Err(EngineError::GraphUnavailable("connection refused".to_string()))
        }
    }

    /// All nine strategies, each claiming the listed products for `kind`.
    fn full_set(claims: &[(StrategyKind, &[i64])]) -> Arc<StrategySet> {
        let strategies = StrategyKind::ALL
            .iter()
            .map(|kind| {
                let products = claims
                    .iter()
                    .find(|(k, _)| k == kind)
                    .map(|(_, p)| *p)
                    .unwrap_or(&[]);
                StubStrategy::boxed(*kind, products)
            })
            .collect();
        Arc::new(StrategySet::new(strategies))
    }

    #[tokio::test]
    async fn purchase_amplifies_matching_strategy_by_exactly_one_point_five() {
        let store = Arc::new(InMemoryWeightStore::default());
        let adapter = WeightAdapter::new(
            full_set(&[(StrategyKind::History, &[7])]),
            store.clone(),
            None,
        );

        let updated = adapter.adjust(1, 7, EventKind::Purchase).await.unwrap();
        assert_eq!(updated.get(StrategyKind::History), 1.5);
        for kind in StrategyKind::ALL.iter().filter(|k| **k != StrategyKind::History) {
            assert_eq!(updated.get(*kind), 1.0);
        }

        // Persisted, not just returned.
        let stored = store.get_user_weights(1).await.unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn view_amplifies_every_claiming_strategy() {
        let adapter = WeightAdapter::new(
            full_set(&[
                (StrategyKind::SimilarCategories, &[2]),
                (StrategyKind::Wishlist, &[2, 5]),
            ]),
            Arc::new(InMemoryWeightStore::default()),
            None,
        );

        let updated = adapter.adjust(4, 2, EventKind::View).await.unwrap();
        assert!((updated.get(StrategyKind::SimilarCategories) - 1.1).abs() < 1e-12);
        assert!((updated.get(StrategyKind::Wishlist) - 1.1).abs() < 1e-12);

        let untouched = [
            StrategyKind::History,
            StrategyKind::PriceSensitivity,
            StrategyKind::PurchaseTime,
            StrategyKind::SimilarInterest,
            StrategyKind::OftenBoughtTogether,
            StrategyKind::HighRatings,
            StrategyKind::RegionalTrends,
        ];
        for kind in untouched {
            assert_eq!(updated.get(kind), 1.0);
        }
    }

    #[tokio::test]
    async fn unclaimed_product_leaves_the_vector_unchanged() {
        let adapter = WeightAdapter::new(
            full_set(&[(StrategyKind::History, &[7])]),
            Arc::new(InMemoryWeightStore::default()),
            None,
        );

        let first = adapter.adjust(1, 999, EventKind::Purchase).await.unwrap();
        let second = adapter.adjust(1, 999, EventKind::Purchase).await.unwrap();
        assert_eq!(first, WeightVector::default());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn ceiling_caps_compounding_growth() {
        let adapter = WeightAdapter::new(
            full_set(&[(StrategyKind::History, &[7])]),
            Arc::new(InMemoryWeightStore::default()),
            Some(2.0),
        );

        for _ in 0..5 {
            adapter.adjust(1, 7, EventKind::Purchase).await.unwrap();
        }

        let stored = adapter.adjust(1, 7, EventKind::Purchase).await.unwrap();
        assert_eq!(stored.get(StrategyKind::History), 2.0);
    }

    #[tokio::test]
    async fn concurrent_events_for_one_user_do_not_lose_updates() {
        let store = Arc::new(InMemoryWeightStore::default());
        let adapter = Arc::new(WeightAdapter::new(
            full_set(&[(StrategyKind::History, &[7])]),
            store.clone(),
            None,
        ));

        let a = tokio::spawn({
            let adapter = adapter.clone();
            async move { adapter.adjust(1, 7, EventKind::View).await }
        });
        let b = tokio::spawn({
            let adapter = adapter.clone();
            async move { adapter.adjust(1, 7, EventKind::View).await }
        });

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        // Both events must have compounded: 1.0 * 1.1 * 1.1.
        let stored = store.get_user_weights(1).await.unwrap();
        assert!((stored.get(StrategyKind::History) - 1.21).abs() < 1e-9);
    }

    #[tokio::test]
    async fn strategy_failure_aborts_without_persisting_changes() {
        let store = Arc::new(InMemoryWeightStore::default());
        let mut strategies: Vec<Box<dyn ScoringStrategy>> =
            vec![StubStrategy::boxed(StrategyKind::History, &[7])];
        strategies.push(Box::new(FailingStrategy));

        let adapter = WeightAdapter::new(
            Arc::new(StrategySet::new(strategies)),
            store.clone(),
            None,
        );

        let result = adapter.adjust(1, 7, EventKind::Purchase).await;
        assert!(matches!(result, Err(EngineError::GraphUnavailable(_))));

        let stored = store.get_user_weights(1).await.unwrap();
        assert_eq!(stored.get(StrategyKind::History), 1.0);

        // The failed adjustment must not leave its lock entry behind either.
        assert!(adapter.user_locks.is_empty());
    }

    #[tokio::test]
    async fn lock_table_does_not_retain_finished_users() {
        let adapter = Arc::new(WeightAdapter::new(
            full_set(&[(StrategyKind::History, &[7])]),
            Arc::new(InMemoryWeightStore::default()),
            None,
        ));

        for user_id in 1..=20 {
            adapter.adjust(user_id, 7, EventKind::View).await.unwrap();
        }
        assert!(adapter.user_locks.is_empty());

        let racing: Vec<_> = (0..4)
            .map(|_| {
                let adapter = adapter.clone();
                tokio::spawn(async move { adapter.adjust(1, 7, EventKind::View).await })
            })
            .collect();
        for handle in racing {
            handle.await.unwrap().unwrap();
        }
        assert!(adapter.user_locks.is_empty());
    }
}
