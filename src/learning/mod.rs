pub mod insights;
pub mod weights;

use tokio::sync::Mutex;

use crate::config::LearningConfig;
use crate::model::{AnalyticsRecord, GeneratedVideo};

pub use insights::{build_insights, Insights};
pub use weights::{LearningWeight, WeightBook, WeightSnapshot};

/// Consumes analytics records and turns predicted-vs-actual performance into
/// bounded per-niche weighting factors. The weight book is the only piece of
/// cross-request mutable state outside the stores; every ingest runs its full
/// read-modify-write inside one critical section.
pub struct LearningFeedbackEngine {
    config: LearningConfig,
    book: Mutex<WeightBook>,
}

impl LearningFeedbackEngine {
    pub fn new(config: LearningConfig) -> Self {
        Self {
            config,
            book: Mutex::new(WeightBook::new()),
        }
    }

    /// Folds one analytics record into the per-niche and global EMAs and
    /// eagerly recomputes all multipliers. The caller has already resolved
    /// `video` from the record's `video_id`.
    pub async fn ingest(&self, record: &AnalyticsRecord, video: &GeneratedVideo) {
        // Floor keeps the calibration ratio finite for near-zero predictions.
        let ratio = record.revenue / video.virality_score.max(1.0);
        let mut book = self.book.lock().await;
        book.observe(&video.niche, ratio, &self.config);
    }

    pub async fn recompute_weights(&self) -> WeightSnapshot {
        let mut book = self.book.lock().await;
        book.recompute(&self.config)
    }

    pub async fn snapshot(&self) -> WeightBook {
        let book = self.book.lock().await;
        book.clone()
    }
}
