use super::ScoringStrategy;
use crate::error::Result;
use crate::graph::GraphClient;
use crate::models::{ScoredProduct, StrategyKind};
use async_trait::async_trait;

/// Products tagged with the categories of past purchases, excluding
/// products the user already bought.
pub struct SimilarCategoriesStrategy {
    graph: GraphClient,
}

const CYPHER: &str = r#"
    MATCH (u:User {id: $userId})-[:PLACED]->(o:Order)-[:INCLUDES]->(od:OrderDetail)-[:OF_PRODUCT]->(p:Product)-[:TAGGED_AS]->(c:Category)
    MATCH (rec:Product)-[:TAGGED_AS]->(c)
    WHERE NOT (u)-[:PLACED]->(:Order)-[:INCLUDES]->(:OrderDetail)-[:OF_PRODUCT]->(rec)
    RETURN rec.id AS product_id, COUNT(*) AS relevance
    ORDER BY relevance DESC
    LIMIT 10
"#;

impl SimilarCategoriesStrategy {
    pub fn new(graph: GraphClient) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl ScoringStrategy for SimilarCategoriesStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SimilarCategories
    }

    async fn score(&self, user_id: i64) -> Result<Vec<ScoredProduct>> {
        self.graph.scored_products(CYPHER, user_id).await
    }
}
