use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trend {
    pub id: String,
    pub title: String,
    pub niche: String,
    pub views: u64,
    pub engagement: u64,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Trend {
    pub fn new(
        title: String,
        niche: &str,
        views: u64,
        engagement: u64,
        url: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            niche: normalize_niche(niche),
            views,
            engagement,
            url,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptData {
    pub title: String,
    pub hook: String,
    pub script: String,
    pub hashtags: Vec<String>,
    pub description: String,
    pub duration_seconds: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedVideo {
    pub id: String,
    pub title: String,
    pub niche: String,
    pub script: ScriptData,
    pub virality_score: f64,
    pub created_at: DateTime<Utc>,
    pub media_reference: Option<String>,
}

impl GeneratedVideo {
    pub fn new(
        niche: &str,
        script: ScriptData,
        virality_score: f64,
        media_reference: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: script.title.clone(),
            niche: normalize_niche(niche),
            script,
            virality_score,
            created_at: Utc::now(),
            media_reference,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsRecord {
    pub id: String,
    pub video_id: String,
    pub views: u64,
    pub likes: u64,
    pub shares: u64,
    pub comments: u64,
    pub revenue: f64,
    pub created_at: DateTime<Utc>,
}

impl AnalyticsRecord {
    pub fn new(
        video_id: String,
        views: u64,
        likes: u64,
        shares: u64,
        comments: u64,
        revenue: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            video_id,
            views,
            likes,
            shares,
            comments,
            revenue,
            created_at: Utc::now(),
        }
    }
}

/// Derived per-niche view. Never persisted; recomputed from the stores and
/// the current learning weights on every query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NicheReport {
    pub name: String,
    pub profitability_score: f64,
    pub avg_views: f64,
    pub avg_engagement_rate: f64,
    pub avg_revenue: f64,
    pub trend_count: usize,
    pub recent_trend_count: usize,
    pub trending: bool,
}

/// Collapses `"Fitness"` and `" fitness "` into a single bucket.
pub fn normalize_niche(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
