use super::ScoringStrategy;
use crate::error::Result;
use crate::graph::GraphClient;
use crate::models::{ScoredProduct, StrategyKind};
use async_trait::async_trait;

/// Products trending in the user's region via HOT_IN edges to the address
/// the user lives at.
pub struct RegionalTrendsStrategy {
    graph: GraphClient,
}

const CYPHER: &str = r#"
    MATCH (u:User {id: $userId})-[:LIVES_AT]->(a:Address)
    MATCH (rec:Product)-[:HOT_IN]->(a)
    RETURN rec.id AS product_id, COUNT(*) AS relevance
    ORDER BY relevance DESC
    LIMIT 10
"#;

impl RegionalTrendsStrategy {
    pub fn new(graph: GraphClient) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl ScoringStrategy for RegionalTrendsStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::RegionalTrends
    }

    async fn score(&self, user_id: i64) -> Result<Vec<ScoredProduct>> {
        self.graph.scored_products(CYPHER, user_id).await
    }
}
