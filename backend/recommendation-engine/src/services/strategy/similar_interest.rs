use super::ScoringStrategy;
use crate::error::Result;
use crate::graph::GraphClient;
use crate::models::{ScoredProduct, StrategyKind};
use async_trait::async_trait;

/// Products purchased or wished by users linked through the precomputed
/// SIMILAR_INTEREST relation.
pub struct SimilarInterestStrategy {
    graph: GraphClient,
}

const CYPHER: &str = r#"
    MATCH (u:User {id: $userId})-[:SIMILAR_INTEREST]->(other:User)
    MATCH (other)-[:PLACED|:WISHED]->(:Order)-[:INCLUDES]->(:OrderDetail)-[:OF_PRODUCT]->(rec:Product)
    RETURN rec.id AS product_id, COUNT(*) AS relevance
    ORDER BY relevance DESC
    LIMIT 10
"#;

impl SimilarInterestStrategy {
    pub fn new(graph: GraphClient) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl ScoringStrategy for SimilarInterestStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SimilarInterest
    }

    async fn score(&self, user_id: i64) -> Result<Vec<ScoredProduct>> {
        self.graph.scored_products(CYPHER, user_id).await
    }
}
