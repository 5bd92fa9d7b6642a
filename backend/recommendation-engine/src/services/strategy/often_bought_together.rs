use super::ScoringStrategy;
use crate::error::Result;
use crate::graph::GraphClient;
use crate::models::{ScoredProduct, StrategyKind};
use async_trait::async_trait;

/// Co-purchase affinity via the precomputed OFTEN_BOUGHT_WITH relation over
/// the user's purchased products.
pub struct OftenBoughtTogetherStrategy {
    graph: GraphClient,
}

const CYPHER: &str = r#"
    MATCH (u:User {id: $userId})-[:PLACED]->(:Order)-[:INCLUDES]->(:OrderDetail)-[:OF_PRODUCT]->(p:Product)
    MATCH (p)-[:OFTEN_BOUGHT_WITH]->(rec:Product)
    RETURN rec.id AS product_id, COUNT(*) AS relevance
    ORDER BY relevance DESC
    LIMIT 10
"#;

impl OftenBoughtTogetherStrategy {
    pub fn new(graph: GraphClient) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl ScoringStrategy for OftenBoughtTogetherStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::OftenBoughtTogether
    }

    async fn score(&self, user_id: i64) -> Result<Vec<ScoredProduct>> {
        self.graph.scored_products(CYPHER, user_id).await
    }
}
