pub mod profitability;
pub mod ranking;
pub mod virality;

pub use profitability::ProfitabilityScorer;
pub use ranking::RecommendationRanker;
pub use virality::{Prediction, ScriptFeatures, ViralityPredictor};
