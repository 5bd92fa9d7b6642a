mod high_ratings;
mod history;
mod often_bought_together;
mod price_sensitivity;
mod purchase_time;
mod regional_trends;
mod similar_categories;
mod similar_interest;
mod wishlist;

use crate::error::Result;
use crate::graph::GraphClient;
use crate::models::{ScoredProduct, StrategyKind};
use async_trait::async_trait;

pub use high_ratings::HighRatingsStrategy;
pub use history::HistoryStrategy;
pub use often_bought_together::OftenBoughtTogetherStrategy;
pub use price_sensitivity::PriceSensitivityStrategy;
pub use purchase_time::PurchaseTimeStrategy;
pub use regional_trends::RegionalTrendsStrategy;
pub use similar_categories::SimilarCategoriesStrategy;
pub use similar_interest::SimilarInterestStrategy;
pub use wishlist::WishlistStrategy;

/// One independently computable relevance signal.
#[async_trait]
pub trait ScoringStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Produce scored product candidates for a user, at most 10, ordered by
    /// relevance descending. No graph matches is an empty result, not an
    /// error. Results reflect live graph state; nothing is cached.
    async fn score(&self, user_id: i64) -> Result<Vec<ScoredProduct>>;
}

/// The strategy collection a blend runs over, held in declared order.
pub struct StrategySet {
    strategies: Vec<Box<dyn ScoringStrategy>>,
}

impl StrategySet {
    pub fn new(strategies: Vec<Box<dyn ScoringStrategy>>) -> Self {
        Self { strategies }
    }

    /// The nine production strategies in declared blend order.
    pub fn standard(graph: GraphClient) -> Self {
        Self::new(vec![
            Box::new(HistoryStrategy::new(graph.clone())),
            Box::new(PriceSensitivityStrategy::new(graph.clone())),
            Box::new(SimilarCategoriesStrategy::new(graph.clone())),
            Box::new(PurchaseTimeStrategy::new(graph.clone())),
            Box::new(SimilarInterestStrategy::new(graph.clone())),
            Box::new(WishlistStrategy::new(graph.clone())),
            Box::new(OftenBoughtTogetherStrategy::new(graph.clone())),
            Box::new(HighRatingsStrategy::new(graph.clone())),
            Box::new(RegionalTrendsStrategy::new(graph)),
        ])
    }

    pub fn strategies(&self) -> &[Box<dyn ScoringStrategy>] {
        &self.strategies
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
