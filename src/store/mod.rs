pub mod analytics;
pub mod trends;
pub mod videos;

pub use analytics::AnalyticsStore;
pub use trends::TrendStore;
pub use videos::VideoStore;
