use super::ScoringStrategy;
use crate::error::Result;
use crate::graph::GraphClient;
use crate::models::{ScoredProduct, StrategyKind};
use async_trait::async_trait;

/// Products from orders the user placed in the current calendar month.
/// Time-windowed rather than exclusion-based; the month boundary is
/// evaluated on the graph backend's clock.
pub struct PurchaseTimeStrategy {
    graph: GraphClient,
}

const CYPHER: &str = r#"
    MATCH (u:User {id: $userId})-[:PLACED]->(o:Order)
    WHERE date(o.created_at).month = date(datetime()).month
    MATCH (o)-[:INCLUDES]->(od:OrderDetail)-[:OF_PRODUCT]->(rec:Product)
    RETURN rec.id AS product_id, COUNT(*) AS relevance
    ORDER BY relevance DESC
    LIMIT 10
"#;

impl PurchaseTimeStrategy {
    pub fn new(graph: GraphClient) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl ScoringStrategy for PurchaseTimeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PurchaseTime
    }

    async fn score(&self, user_id: i64) -> Result<Vec<ScoredProduct>> {
        self.graph.scored_products(CYPHER, user_id).await
    }
}
