use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Cap shared by every strategy result and the final blended ranking.
pub const RESULT_LIMIT: usize = 10;

/// The nine relevance-scoring strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    History,
    PriceSensitivity,
    SimilarCategories,
    PurchaseTime,
    SimilarInterest,
    Wishlist,
    OftenBoughtTogether,
    HighRatings,
    RegionalTrends,
}

impl StrategyKind {
    /// Declared blend order. Tie-breaking in the final ranking depends on
    /// this order, so it must not be reshuffled.
    pub const ALL: [StrategyKind; 9] = [
        StrategyKind::History,
        StrategyKind::PriceSensitivity,
        StrategyKind::SimilarCategories,
        StrategyKind::PurchaseTime,
        StrategyKind::SimilarInterest,
        StrategyKind::Wishlist,
        StrategyKind::OftenBoughtTogether,
        StrategyKind::HighRatings,
        StrategyKind::RegionalTrends,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::History => "history",
            StrategyKind::PriceSensitivity => "price_sensitivity",
            StrategyKind::SimilarCategories => "similar_categories",
            StrategyKind::PurchaseTime => "purchase_time",
            StrategyKind::SimilarInterest => "similar_interest",
            StrategyKind::Wishlist => "wishlist",
            StrategyKind::OftenBoughtTogether => "often_bought_together",
            StrategyKind::HighRatings => "high_ratings",
            StrategyKind::RegionalTrends => "regional_trends",
        }
    }

    /// Inverse of [`as_str`](Self::as_str). Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<StrategyKind> {
        StrategyKind::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

/// Behavioral event used to adapt a user's weight vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    View,
    AddToCart,
    Purchase,
}

impl EventKind {
    /// Multiplicative amplification applied to every strategy that claims
    /// the event's product.
    pub fn factor(&self) -> f64 {
        match self {
            EventKind::View => 1.1,
            EventKind::AddToCart => 1.3,
            EventKind::Purchase => 1.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::View => "view",
            EventKind::AddToCart => "add_to_cart",
            EventKind::Purchase => "purchase",
        }
    }

    /// Parse a wire-level event name. Unknown kinds are rejected here so a
    /// typo at the integration boundary cannot silently become a no-op.
    pub fn parse(name: &str) -> Option<EventKind> {
        match name {
            "view" => Some(EventKind::View),
            "add_to_cart" => Some(EventKind::AddToCart),
            "purchase" => Some(EventKind::Purchase),
            _ => None,
        }
    }
}

/// One scored candidate out of a single strategy. `relevance` is the raw
/// graph-path match count for that strategy; counts are not calibrated
/// across strategies, so they are meaningful only relative to the same
/// strategy's other candidates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredProduct {
    pub product_id: i64,
    pub relevance: f64,
}

/// One entry of the final blended ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub product_id: i64,
    pub score: f64,
}

/// Per-strategy multiplier set, either global defaults or per-user state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector {
    weights: HashMap<StrategyKind, f64>,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

impl WeightVector {
    /// All nine strategies at the same multiplier.
    pub fn uniform(value: f64) -> Self {
        Self {
            weights: StrategyKind::ALL.iter().map(|k| (*k, value)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Every strategy has an entry.
    pub fn is_complete(&self) -> bool {
        StrategyKind::ALL.iter().all(|k| self.weights.contains_key(k))
    }

    /// Missing entries read as the neutral multiplier 1.0.
    pub fn get(&self, kind: StrategyKind) -> f64 {
        self.weights.get(&kind).copied().unwrap_or(1.0)
    }

    pub fn set(&mut self, kind: StrategyKind, value: f64) {
        self.weights.insert(kind, value);
    }

    /// Multiply one strategy's weight, clamping to `ceiling` when supplied.
    /// Repeated events compound; the ceiling is the only growth bound.
    pub fn scale(&mut self, kind: StrategyKind, factor: f64, ceiling: Option<f64>) {
        let mut next = self.get(kind) * factor;
        if let Some(cap) = ceiling {
            next = next.min(cap);
        }
        self.weights.insert(kind, next);
    }

    /// Key-by-key overwrite with another vector's entries.
    pub fn merge(&mut self, other: &WeightVector) {
        for (kind, value) in &other.weights {
            self.weights.insert(*kind, *value);
        }
    }

    /// Build from raw name/value fields as stored in the persistence
    /// backend. Unknown strategy names are ignored, never a fault.
    pub fn from_fields<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let mut weights = HashMap::new();
        for (name, value) in fields {
            match StrategyKind::parse(&name) {
                Some(kind) => {
                    weights.insert(kind, value);
                }
                None => {
                    debug!(field = %name, "Ignoring unknown strategy weight field");
                }
            }
        }
        Self { weights }
    }

    /// Entries in declared strategy order.
    pub fn entries(&self) -> Vec<(StrategyKind, f64)> {
        StrategyKind::ALL
            .iter()
            .filter_map(|k| self.weights.get(k).map(|v| (*k, *v)))
            .collect()
    }
}
