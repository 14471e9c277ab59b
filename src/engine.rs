use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::learning::{build_insights, Insights, LearningFeedbackEngine, WeightSnapshot};
use crate::model::{
    normalize_niche, AnalyticsRecord, GeneratedVideo, NicheReport, ScriptData, Trend,
};
use crate::scoring::{
    Prediction, ProfitabilityScorer, RecommendationRanker, ScriptFeatures, ViralityPredictor,
};
use crate::store::{AnalyticsStore, TrendStore, VideoStore};

#[derive(Debug, Clone)]
pub struct NewTrend {
    pub title: String,
    pub niche: String,
    pub views: u64,
    pub engagement: u64,
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAnalytics {
    pub video_id: String,
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoPerformance {
    pub video: GeneratedVideo,
    pub performance: AnalyticsRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_trends: usize,
    pub total_videos: usize,
    pub total_views: u64,
    pub total_revenue: f64,
    pub top_videos: Vec<VideoPerformance>,
}

/// Wires the stores, the scorers, and the learning loop together. All reads
/// recompute from current store contents; the only mutable state outside the
/// stores is the learning weight book.
pub struct Engine {
    config: EngineConfig,
    trends: TrendStore,
    videos: VideoStore,
    analytics: AnalyticsStore,
    learning: LearningFeedbackEngine,
    profitability: ProfitabilityScorer,
    virality: ViralityPredictor,
}

impl Engine {
    pub fn in_memory(config: EngineConfig) -> Self {
        let profitability = ProfitabilityScorer::new(config.scoring.clone());
        let virality = ViralityPredictor::new(config.virality.clone());
        let learning = LearningFeedbackEngine::new(config.learning.clone());
        Self {
            config,
            trends: TrendStore::in_memory(),
            videos: VideoStore::in_memory(),
            analytics: AnalyticsStore::in_memory(),
            learning,
            profitability,
            virality,
        }
    }

    /// Loads the stores from `data_dir` and rebuilds the weight book by
    /// replaying the analytics history in ingestion order, so the EMAs come
    /// back exactly as they were.
    pub async fn load(config: EngineConfig, data_dir: &Path) -> Result<Self> {
        let profitability = ProfitabilityScorer::new(config.scoring.clone());
        let virality = ViralityPredictor::new(config.virality.clone());
        let learning = LearningFeedbackEngine::new(config.learning.clone());

        let engine = Self {
            config,
            trends: TrendStore::load(data_dir.join("trends.json")).await?,
            videos: VideoStore::load(data_dir.join("videos.json")).await?,
            analytics: AnalyticsStore::load(data_dir.join("analytics.json")).await?,
            learning,
            profitability,
            virality,
        };

        let mut records = engine.analytics.all().await;
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        for record in &records {
            match engine.videos.get(&record.video_id).await {
                Some(video) => engine.learning.ingest(record, &video).await,
                None => tracing::warn!(
                    record_id = %record.id,
                    video_id = %record.video_id,
                    "skipping analytics record for unknown video during replay"
                ),
            }
        }

        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn add_trend(&self, input: NewTrend) -> Result<Trend> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(EngineError::validation("title is required"));
        }
        let niche = normalize_niche(&input.niche);
        if niche.is_empty() {
            return Err(EngineError::validation("niche is required"));
        }

        let trend = Trend::new(title, &niche, input.views, input.engagement, input.url);
        self.trends.add(trend).await
    }

    pub async fn trends(&self, niche: Option<&str>, limit: usize) -> Vec<Trend> {
        self.trends.list(niche, limit).await
    }

    pub async fn delete_trend(&self, trend_id: &str) -> Result<()> {
        if self.trends.delete(trend_id).await? {
            Ok(())
        } else {
            Err(EngineError::not_found(format!("trend {}", trend_id)))
        }
    }

    /// Validates the referenced video, appends the record, then feeds it to
    /// the learning loop. Orphaned records are rejected before the store is
    /// touched.
    pub async fn record_analytics(&self, input: NewAnalytics) -> Result<AnalyticsRecord> {
        if !input.revenue.is_finite() || input.revenue < 0.0 {
            return Err(EngineError::validation("revenue must be a non-negative number"));
        }
        let Some(video) = self.videos.get(&input.video_id).await else {
            return Err(EngineError::Consistency(format!(
                "analytics references unknown video {}",
                input.video_id
            )));
        };

        let record = AnalyticsRecord::new(
            input.video_id,
            input.views,
            input.likes,
            input.shares,
            input.comments,
            input.revenue,
        );
        let record = self.analytics.add(record).await?;
        self.learning.ingest(&record, &video).await;
        Ok(record)
    }

    pub async fn analytics(&self, video_id: Option<&str>) -> Vec<AnalyticsRecord> {
        self.analytics.list(video_id).await
    }

    /// Recomputes every niche's report from the current store contents.
    pub async fn niche_reports(&self) -> BTreeMap<String, NicheReport> {
        let trends = self.trends.all().await;
        let videos = self.videos.all().await;
        let analytics = self.analytics.all().await;
        let weights = self.learning.snapshot().await;
        self.profitability
            .score_all(&trends, &videos, &analytics, &weights, Utc::now())
    }

    pub async fn recommended(&self, limit: usize) -> Vec<NicheReport> {
        let reports = self.niche_reports().await;
        RecommendationRanker::top(&reports, limit)
    }

    pub async fn all_niches(&self) -> Vec<NicheReport> {
        let reports = self.niche_reports().await;
        RecommendationRanker::top(&reports, reports.len())
    }

    /// Scores a finished script against its niche and persists the video
    /// with the prediction attached.
    pub async fn admit_video(
        &self,
        niche: &str,
        script: ScriptData,
        tone: &str,
        media_reference: Option<String>,
    ) -> Result<(GeneratedVideo, Prediction)> {
        let niche = normalize_niche(niche);
        if niche.is_empty() {
            return Err(EngineError::validation("niche is required"));
        }

        let prediction = self.predict(&niche, &script, tone).await;
        let video = GeneratedVideo::new(&niche, script, prediction.score, media_reference);
        let video = self.videos.add(video).await?;
        Ok((video, prediction))
    }

    pub async fn predict(&self, niche: &str, script: &ScriptData, tone: &str) -> Prediction {
        let niche = normalize_niche(niche);
        let reports = self.niche_reports().await;
        let profitability = reports
            .get(&niche)
            .map(|report| report.profitability_score)
            .unwrap_or(0.0);
        let features = ScriptFeatures::from_script(script, tone);
        self.virality.predict(profitability, &features)
    }

    pub async fn video(&self, video_id: &str) -> Result<GeneratedVideo> {
        self.videos
            .get(video_id)
            .await
            .ok_or_else(|| EngineError::not_found(format!("video {}", video_id)))
    }

    pub async fn videos(&self, niche: Option<&str>, limit: usize) -> Vec<GeneratedVideo> {
        self.videos.list(niche, limit).await
    }

    pub async fn delete_video(&self, video_id: &str) -> Result<GeneratedVideo> {
        self.videos
            .delete(video_id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("video {}", video_id)))
    }

    pub async fn insights(&self, niche: Option<&str>) -> Insights {
        let reports = self.niche_reports().await;
        let book = self.learning.snapshot().await;
        let videos = self.videos.all().await;
        let analytics = self.analytics.all().await;
        build_insights(
            niche,
            &book,
            &reports,
            &videos,
            &analytics,
            &self.config.learning,
        )
    }

    pub async fn weights(&self) -> WeightSnapshot {
        self.learning.snapshot().await.snapshot()
    }

    pub async fn recompute_weights(&self) -> WeightSnapshot {
        self.learning.recompute_weights().await
    }

    pub async fn dashboard_stats(&self) -> DashboardStats {
        let records = self.analytics.all().await;
        let total_views: u64 = records.iter().map(|record| record.views).sum();
        let total_revenue: f64 = records.iter().map(|record| record.revenue).sum();

        let mut by_views = records.clone();
        by_views.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.id.cmp(&b.id)));

        let mut top_videos = Vec::new();
        for record in by_views.into_iter().take(5) {
            if let Some(video) = self.videos.get(&record.video_id).await {
                top_videos.push(VideoPerformance {
                    video,
                    performance: record,
                });
            }
        }

        DashboardStats {
            total_trends: self.trends.count().await,
            total_videos: self.videos.count().await,
            total_views,
            total_revenue,
            top_videos,
        }
    }
}
