use crate::error::Result;
use crate::models::WeightVector;
use async_trait::async_trait;
use redis::AsyncCommands;
use redis_utils::{with_timeout, SharedConnectionManager};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Hash key holding the process-wide default weight vector.
pub const GLOBAL_WEIGHTS_KEY: &str = "user:global:weights";

fn user_weights_key(user_id: i64) -> String {
    format!("user:{}:weights", user_id)
}

/// Persistent per-user and global strategy weights.
///
/// Writes are durable and immediately visible to subsequent reads; there is
/// no caching layer in front. Store unavailability fails the enclosing
/// recommend/adjust call instead of silently falling back to defaults.
#[async_trait]
pub trait WeightStore: Send + Sync {
    /// Stored vector if present; otherwise a copy of the global vector is
    /// persisted under the user's key and returned (fallback-and-seed).
    /// Idempotent: an immediate second call returns the persisted copy.
    async fn get_user_weights(&self, user_id: i64) -> Result<WeightVector>;

    /// Key-by-key merge into the stored per-user vector.
    async fn set_user_weights(&self, user_id: i64, weights: &WeightVector) -> Result<()>;

    /// Stored global vector, or the injected defaults when nothing is
    /// persisted yet. Reading never writes the global key; only
    /// [`set_global_weights`](Self::set_global_weights) does.
    async fn get_global_weights(&self) -> Result<WeightVector>;

    async fn set_global_weights(&self, weights: &WeightVector) -> Result<()>;
}

/// Redis-backed store: one hash per user (`user:{id}:weights`) plus the
/// global hash, fields keyed by strategy name.
pub struct RedisWeightStore {
    manager: SharedConnectionManager,
    defaults: WeightVector,
    op_timeout: Duration,
}

impl RedisWeightStore {
    /// `defaults` is the configured global vector, injected here instead of
    /// being read from ambient process state.
    pub fn new(
        manager: SharedConnectionManager,
        defaults: WeightVector,
        op_timeout: Duration,
    ) -> Self {
        Self {
            manager,
            defaults,
            op_timeout,
        }
    }

    async fn read_hash(&self, key: &str) -> Result<HashMap<String, f64>> {
        let mut conn = self.manager.lock().await;
        let fields: HashMap<String, f64> = with_timeout(self.op_timeout, conn.hgetall(key)).await?;
        Ok(fields)
    }

    async fn write_hash(&self, key: &str, weights: &WeightVector) -> Result<()> {
        if weights.is_empty() {
            return Ok(());
        }

        let items: Vec<(&str, f64)> = weights
            .entries()
            .into_iter()
            .map(|(kind, value)| (kind.as_str(), value))
            .collect();

        let mut conn = self.manager.lock().await;
        let _: () = with_timeout(self.op_timeout, conn.hset_multiple(key, &items)).await?;
        Ok(())
    }
}

#[async_trait]
impl WeightStore for RedisWeightStore {
    async fn get_user_weights(&self, user_id: i64) -> Result<WeightVector> {
        let key = user_weights_key(user_id);
        let fields = self.read_hash(&key).await?;

        if !fields.is_empty() {
            return Ok(WeightVector::from_fields(fields));
        }

        let global = self.get_global_weights().await?;
        self.write_hash(&key, &global).await?;
        debug!(user_id, "Seeded user weights from global vector");
        Ok(global)
    }

    async fn set_user_weights(&self, user_id: i64, weights: &WeightVector) -> Result<()> {
        self.write_hash(&user_weights_key(user_id), weights).await
    }

    async fn get_global_weights(&self) -> Result<WeightVector> {
        let fields = self.read_hash(GLOBAL_WEIGHTS_KEY).await?;
        if fields.is_empty() {
            return Ok(self.defaults.clone());
        }
        Ok(WeightVector::from_fields(fields))
    }

    async fn set_global_weights(&self, weights: &WeightVector) -> Result<()> {
        self.write_hash(GLOBAL_WEIGHTS_KEY, weights).await
    }
}

/// In-memory store with the same semantics, for tests and local development.
pub struct InMemoryWeightStore {
    defaults: WeightVector,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<i64, WeightVector>,
    global: Option<WeightVector>,
}

impl InMemoryWeightStore {
    pub fn new(defaults: WeightVector) -> Self {
        Self {
            defaults,
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl Default for InMemoryWeightStore {
    fn default() -> Self {
        Self::new(WeightVector::default())
    }
}

#[async_trait]
impl WeightStore for InMemoryWeightStore {
    async fn get_user_weights(&self, user_id: i64) -> Result<WeightVector> {
        let mut inner = self.inner.lock().await;
        if let Some(existing) = inner.users.get(&user_id) {
            return Ok(existing.clone());
        }

        let global = inner
            .global
            .clone()
            .unwrap_or_else(|| self.defaults.clone());
        inner.users.insert(user_id, global.clone());
        Ok(global)
    }

    async fn set_user_weights(&self, user_id: i64, weights: &WeightVector) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner
            .users
            .entry(user_id)
            .and_modify(|stored| stored.merge(weights))
            .or_insert_with(|| weights.clone());
        Ok(())
    }

    async fn get_global_weights(&self) -> Result<WeightVector> {
        let inner = self.inner.lock().await;
        Ok(inner
            .global
            .clone()
            .unwrap_or_else(|| self.defaults.clone()))
    }

    async fn set_global_weights(&self, weights: &WeightVector) -> Result<()> {
        let mut inner = self.inner.lock().await;
        match inner.global.as_mut() {
            Some(stored) => stored.merge(weights),
            None => inner.global = Some(weights.clone()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StrategyKind;

    #[test]
    fn user_key_format_matches_backend_layout() {
        assert_eq!(user_weights_key(5), "user:5:weights");
        assert_eq!(GLOBAL_WEIGHTS_KEY, "user:global:weights");
    }

    #[tokio::test]
    async fn first_read_seeds_from_global_and_is_idempotent() {
        let store = InMemoryWeightStore::default();
        let mut global = WeightVector::default();
        global.set(StrategyKind::History, 2.0);
        store.set_global_weights(&global).await.unwrap();

        let first = store.get_user_weights(7).await.unwrap();
        let second = store.get_user_weights(7).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.get(StrategyKind::History), 2.0);

        // Later global changes must not leak into the seeded copy.
        let mut updated = WeightVector::default();
        updated.set(StrategyKind::History, 9.0);
        store.set_global_weights(&updated).await.unwrap();
        let third = store.get_user_weights(7).await.unwrap();
        assert_eq!(third.get(StrategyKind::History), 2.0);
    }

    #[tokio::test]
    async fn global_read_falls_back_to_injected_defaults() {
        let store = InMemoryWeightStore::new(WeightVector::uniform(0.5));
        let global = store.get_global_weights().await.unwrap();
        for kind in StrategyKind::ALL {
            assert_eq!(global.get(kind), 0.5);
        }
    }

    #[tokio::test]
    async fn set_user_weights_merges_key_by_key() {
        let store = InMemoryWeightStore::default();
        store.get_user_weights(3).await.unwrap();

        let update = WeightVector::from_fields(vec![("wishlist".to_string(), 1.3)]);
        store.set_user_weights(3, &update).await.unwrap();

        let stored = store.get_user_weights(3).await.unwrap();
        assert_eq!(stored.get(StrategyKind::Wishlist), 1.3);
        assert_eq!(stored.get(StrategyKind::History), 1.0);
        assert!(stored.is_complete());
    }
}
