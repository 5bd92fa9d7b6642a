use super::ScoringStrategy;
use crate::error::Result;
use crate::graph::GraphClient;
use crate::models::{ScoredProduct, StrategyKind};
use async_trait::async_trait;

/// Products carrying HIGHLY_RATED_BY edges. The only strategy with no
/// per-user pattern; the user id parameter is accepted for interface
/// uniformity and ignored by the query.
pub struct HighRatingsStrategy {
    graph: GraphClient,
}

const CYPHER: &str = r#"
    MATCH (rec:Product)-[:HIGHLY_RATED_BY]->(:User)
    RETURN rec.id AS product_id, COUNT(*) AS relevance
    ORDER BY relevance DESC
    LIMIT 10
"#;

impl HighRatingsStrategy {
    pub fn new(graph: GraphClient) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl ScoringStrategy for HighRatingsStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::HighRatings
    }

    async fn score(&self, user_id: i64) -> Result<Vec<ScoredProduct>> {
        self.graph.scored_products(CYPHER, user_id).await
    }
}
