use serde::{Deserialize, Serialize};

use nichecast::engine::{NewAnalytics, NewTrend};
use nichecast::generator::GenerationRequest;
use nichecast::model::{AnalyticsRecord, GeneratedVideo, NicheReport, ScriptData, Trend};

#[derive(Debug, Deserialize)]
pub struct TrendRequest {
    pub title: Option<String>,
    pub niche: Option<String>,
    pub views: Option<u64>,
    pub engagement: Option<u64>,
    pub url: Option<String>,
}

impl TrendRequest {
    pub fn into_input(self) -> Result<NewTrend, String> {
        let title = self.title.unwrap_or_default().trim().to_string();
        if title.is_empty() {
            return Err("title is required".to_string());
        }
        let niche = self.niche.unwrap_or_default().trim().to_string();
        if niche.is_empty() {
            return Err("niche is required".to_string());
        }
        let views = self.views.ok_or_else(|| "views is required".to_string())?;
        let engagement = self
            .engagement
            .ok_or_else(|| "engagement is required".to_string())?;

        Ok(NewTrend {
            title,
            niche,
            views,
            engagement,
            url: self.url.filter(|url| !url.trim().is_empty()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsRequest {
    pub video_id: Option<String>,
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub shares: Option<u64>,
    pub comments: Option<u64>,
    pub revenue: Option<f64>,
}

impl AnalyticsRequest {
    pub fn into_input(self) -> Result<NewAnalytics, String> {
        let video_id = self.video_id.unwrap_or_default().trim().to_string();
        if video_id.is_empty() {
            return Err("video_id is required".to_string());
        }

        Ok(NewAnalytics {
            video_id,
            views: self.views.ok_or_else(|| "views is required".to_string())?,
            likes: self.likes.ok_or_else(|| "likes is required".to_string())?,
            shares: self.shares.ok_or_else(|| "shares is required".to_string())?,
            comments: self
                .comments
                .ok_or_else(|| "comments is required".to_string())?,
            revenue: self.revenue.ok_or_else(|| "revenue is required".to_string())?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateVideoRequest {
    pub niche: Option<String>,
    pub inspiration_url: Option<String>,
    pub tone: Option<String>,
    pub voice: Option<String>,
}

impl GenerateVideoRequest {
    pub fn into_input(self) -> Result<GenerationRequest, String> {
        let niche = self.niche.unwrap_or_default().trim().to_string();
        if niche.is_empty() {
            return Err("niche is required".to_string());
        }

        Ok(GenerationRequest {
            niche,
            inspiration_url: self.inspiration_url.filter(|url| !url.trim().is_empty()),
            tone: self
                .tone
                .filter(|tone| !tone.trim().is_empty())
                .unwrap_or_else(|| "engageant".to_string()),
            voice: self
                .voice
                .filter(|voice| !voice.trim().is_empty())
                .unwrap_or_else(|| "nova".to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    pub niche: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct VideosQuery {
    pub niche: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    pub niche: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub trends: Vec<Trend>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub analytics: Vec<AnalyticsRecord>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct NichesResponse {
    pub niches: Vec<NicheReport>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct NicheTrendsResponse {
    pub niche: String,
    pub trends: Vec<Trend>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct VideosResponse {
    pub videos: Vec<GeneratedVideo>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ScriptSummary {
    pub title: String,
    pub hook: String,
    pub script: String,
    pub hashtags: Vec<String>,
    pub description: String,
}

impl From<&ScriptData> for ScriptSummary {
    fn from(script: &ScriptData) -> Self {
        Self {
            title: script.title.clone(),
            hook: script.hook.clone(),
            script: script.script.clone(),
            hashtags: script.hashtags.clone(),
            description: script.description.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateVideoResponse {
    pub message: String,
    pub virality_score: f64,
    pub script: ScriptSummary,
    pub suggestions: Vec<String>,
    pub video_url: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
