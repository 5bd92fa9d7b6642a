use super::ScoringStrategy;
use crate::error::Result;
use crate::graph::GraphClient;
use crate::models::{ScoredProduct, StrategyKind};
use async_trait::async_trait;

/// Products priced within a fixed band (±100) of the user's average
/// purchase price. Already-purchased products are not excluded.
pub struct PriceSensitivityStrategy {
    graph: GraphClient,
}

const CYPHER: &str = r#"
    MATCH (u:User {id: $userId})-[:PLACED]->(o:Order)-[:INCLUDES]->(od:OrderDetail)-[:OF_PRODUCT]->(p:Product)
    WITH u, AVG(p.price) AS avgPrice
    MATCH (rec:Product)
    WHERE abs(rec.price - avgPrice) < 100
    RETURN rec.id AS product_id, COUNT(*) AS relevance
    ORDER BY relevance DESC
    LIMIT 10
"#;

impl PriceSensitivityStrategy {
    pub fn new(graph: GraphClient) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl ScoringStrategy for PriceSensitivityStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PriceSensitivity
    }

    async fn score(&self, user_id: i64) -> Result<Vec<ScoredProduct>> {
        self.graph.scored_products(CYPHER, user_id).await
    }
}
