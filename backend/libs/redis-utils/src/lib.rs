use anyhow::{Context, Result};
use redis::aio::ConnectionManager;
use redis::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::info;

/// Shared Redis connection manager guarded by a Tokio mutex.
pub type SharedConnectionManager = Arc<Mutex<ConnectionManager>>;

/// Default bound for a single Redis operation.
pub const DEFAULT_OP_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection pool built on redis-rs ConnectionManager (auto-reconnecting).
pub struct RedisPool {
    manager: SharedConnectionManager,
}

impl RedisPool {
    /// Connect to Redis and initialize the connection manager eagerly so
    /// misconfiguration surfaces at startup rather than on first use.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = Client::open(redis_url).context("failed to construct Redis client")?;
        let connection_manager = ConnectionManager::new(client)
            .await
            .context("failed to initialize Redis connection manager")?;

        info!("Redis connection manager initialized");

        Ok(Self {
            manager: Arc::new(Mutex::new(connection_manager)),
        })
    }

    pub fn manager(&self) -> SharedConnectionManager {
        self.manager.clone()
    }
}

/// Error type for timed Redis operations.
#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error("Redis operation timed out after {0:?}")]
    Elapsed(Duration),
    #[error("Redis operation failed: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Run a single fallible Redis operation with an upper time bound.
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> Result<T, OpError>
where
    F: Future<Output = Result<T, redis::RedisError>>,
{
    match timeout(duration, future).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(OpError::Redis(e)),
        Err(_) => Err(OpError::Elapsed(duration)),
    }
}
