use super::ScoringStrategy;
use crate::error::Result;
use crate::graph::GraphClient;
use crate::models::{ScoredProduct, StrategyKind};
use async_trait::async_trait;

/// Products sharing a category with wishlisted products, excluding anything
/// the user already bought or wished.
pub struct WishlistStrategy {
    graph: GraphClient,
}

const CYPHER: &str = r#"
    MATCH (u:User {id: $userId})-[:WISHED]->(wished:Product)
    MATCH (wished)-[:TAGGED_AS]->(c:Category)<-[:TAGGED_AS]-(rec:Product)
    WHERE NOT (u)-[:PLACED|:WISHED]->(rec)
    RETURN rec.id AS product_id, COUNT(*) AS relevance
    ORDER BY relevance DESC
    LIMIT 10
"#;

impl WishlistStrategy {
    pub fn new(graph: GraphClient) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl ScoringStrategy for WishlistStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Wishlist
    }

    async fn score(&self, user_id: i64) -> Result<Vec<ScoredProduct>> {
        self.graph.scored_products(CYPHER, user_id).await
    }
}
