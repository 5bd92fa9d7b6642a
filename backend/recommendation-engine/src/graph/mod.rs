use crate::config::Neo4jConfig;
use crate::error::{EngineError, Result};
use crate::models::ScoredProduct;
use neo4rs::{query, Graph};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Thin read-only client for the property graph backend.
///
/// Every strategy issues exactly one pattern query through this layer. Rows
/// are validated into typed [`ScoredProduct`] records at this boundary;
/// connection failures and timeouts surface as
/// [`EngineError::GraphUnavailable`] and are never retried here.
#[derive(Clone)]
pub struct GraphClient {
    graph: Arc<Graph>,
    query_timeout: Duration,
}

impl GraphClient {
    /// Build a client. The driver connects lazily; a bad URI still fails
    /// here, a dead backend fails on first query.
    pub fn connect(config: &Neo4jConfig) -> Result<Self> {
        let graph = Graph::new(&config.uri, &config.user, &config.password)
            .map_err(|e| EngineError::GraphUnavailable(format!("Failed to connect: {}", e)))?;

        Ok(Self {
            graph: Arc::new(graph),
            query_timeout: config.query_timeout,
        })
    }

    /// Run one read-only query parameterized by `$userId` and collect rows
    /// of `product_id` / `relevance` columns. The whole call (execute plus
    /// stream drain) is bounded by the configured query timeout.
    pub async fn scored_products(&self, cypher: &str, user_id: i64) -> Result<Vec<ScoredProduct>> {
        let run = async {
            let mut rows = self
                .graph
                .execute(query(cypher).param("userId", user_id))
                .await?;

            let mut products = Vec::new();
            while let Some(row) = rows.next().await? {
                let product_id: i64 = row.get("product_id").map_err(|e| {
                    EngineError::Validation(format!("Malformed graph record: {}", e))
                })?;
                let relevance: i64 = row.get("relevance").map_err(|e| {
                    EngineError::Validation(format!("Malformed graph record: {}", e))
                })?;

                products.push(ScoredProduct {
                    product_id,
                    relevance: relevance as f64,
                });
            }

            debug!(user_id, count = products.len(), "Graph query returned candidates");
            Ok(products)
        };

        match timeout(self.query_timeout, run).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::GraphUnavailable(format!(
                "Query timed out after {:?}",
                self.query_timeout
            ))),
        }
    }
}
