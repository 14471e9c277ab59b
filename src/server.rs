use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::api::{
    AnalyticsQuery, AnalyticsRequest, AnalyticsResponse, GenerateVideoRequest,
    GenerateVideoResponse, InsightsQuery, LimitQuery, MessageResponse, NicheTrendsResponse,
    NichesResponse, ScriptSummary, TrendRequest, TrendsQuery, TrendsResponse, VideosQuery,
    VideosResponse,
};
use nichecast::config::EngineConfig;
use nichecast::engine::{DashboardStats, Engine};
use nichecast::error::EngineError;
use nichecast::generator::GeneratorClient;
use nichecast::learning::Insights;
use nichecast::model::{normalize_niche, AnalyticsRecord, GeneratedVideo, Trend};

const DEFAULT_TREND_LIMIT: usize = 50;
const DEFAULT_NICHE_LIMIT: usize = 5;
const DEFAULT_NICHE_TRENDS_LIMIT: usize = 10;
const DEFAULT_VIDEO_LIMIT: usize = 20;

#[derive(Clone)]
struct AppState {
    engine: Arc<Engine>,
    generator: GeneratorClient,
    media_dir: PathBuf,
}

pub struct ApiError(EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EngineError::Validation(_) => StatusCode::BAD_REQUEST,
            EngineError::NotFound(_) => StatusCode::NOT_FOUND,
            EngineError::Dependency(_) => StatusCode::BAD_GATEWAY,
            EngineError::Consistency(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub async fn serve(args: crate::ServeArgs) -> Result<(), String> {
    let (config, config_path) =
        EngineConfig::load(args.config.clone()).map_err(|err| err.to_string())?;
    if let Some(path) = config_path {
        info!(path = %path.display(), "loaded engine config");
    }

    let generator =
        GeneratorClient::from_config(&config.generator).map_err(|err| err.to_string())?;
    let engine = Engine::load(config, &args.data_dir)
        .await
        .map_err(|err| err.to_string())?;

    tokio::fs::create_dir_all(&args.media_dir)
        .await
        .map_err(|err| format!("failed to create media dir: {}", err))?;

    let state = AppState {
        engine: Arc::new(engine),
        generator,
        media_dir: args.media_dir.clone(),
    };

    let app = router(state, &args.media_dir);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    info!(%addr, "nichecast listening");
    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|err| format!("failed to bind server: {}", err))?,
        app,
    )
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

fn router(state: AppState, media_dir: &PathBuf) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/trends", post(add_trend).get(list_trends))
        .route("/trends/:id", delete(delete_trend))
        .route("/analytics", post(add_analytics).get(list_analytics))
        .route("/niches/recommended", get(recommended_niches))
        .route("/niches/all", get(all_niches))
        .route("/niches/:name/trends", get(niche_trends))
        .route("/videos/generate", post(generate_video))
        .route("/videos", get(list_videos))
        .route("/videos/:id", get(get_video).delete(delete_video))
        .route("/videos/:id/download", get(download_video))
        .route("/learning/feedback", post(learning_feedback))
        .route("/learning/insights", get(learning_insights))
        .route("/dashboard/stats", get(dashboard_stats))
        .nest_service("/media", ServeDir::new(media_dir))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "service": "nichecast" }))
}

async fn add_trend(
    State(state): State<AppState>,
    Json(request): Json<TrendRequest>,
) -> Result<Json<Trend>, ApiError> {
    let input = request.into_input().map_err(EngineError::validation)?;
    let trend = state.engine.add_trend(input).await?;
    info!(trend_id = %trend.id, niche = %trend.niche, "trend added");
    Ok(Json(trend))
}

async fn list_trends(
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> Json<TrendsResponse> {
    let trends = state
        .engine
        .trends(
            query.niche.as_deref(),
            query.limit.unwrap_or(DEFAULT_TREND_LIMIT),
        )
        .await;
    let count = trends.len();
    Json(TrendsResponse { trends, count })
}

async fn delete_trend(
    State(state): State<AppState>,
    Path(trend_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.engine.delete_trend(&trend_id).await?;
    info!(%trend_id, "trend deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn add_analytics(
    State(state): State<AppState>,
    Json(request): Json<AnalyticsRequest>,
) -> Result<Json<AnalyticsRecord>, ApiError> {
    let input = request.into_input().map_err(EngineError::validation)?;
    let record = state.engine.record_analytics(input).await.map_err(|err| {
        warn!(error = %err, "analytics record rejected");
        err
    })?;
    Ok(Json(record))
}

async fn list_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Json<AnalyticsResponse> {
    let analytics = state.engine.analytics(query.video_id.as_deref()).await;
    let count = analytics.len();
    Json(AnalyticsResponse { analytics, count })
}

async fn recommended_niches(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<NichesResponse> {
    let niches = state
        .engine
        .recommended(query.limit.unwrap_or(DEFAULT_NICHE_LIMIT))
        .await;
    let count = niches.len();
    Json(NichesResponse { niches, count })
}

async fn all_niches(State(state): State<AppState>) -> Json<NichesResponse> {
    let niches = state.engine.all_niches().await;
    let count = niches.len();
    Json(NichesResponse { niches, count })
}

async fn niche_trends(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Json<NicheTrendsResponse> {
    let niche = normalize_niche(&name);
    let trends = state
        .engine
        .trends(
            Some(&niche),
            query.limit.unwrap_or(DEFAULT_NICHE_TRENDS_LIMIT),
        )
        .await;
    let count = trends.len();
    Json(NicheTrendsResponse {
        niche,
        trends,
        count,
    })
}

async fn generate_video(
    State(state): State<AppState>,
    Json(request): Json<GenerateVideoRequest>,
) -> Result<Json<GenerateVideoResponse>, ApiError> {
    let input = request.into_input().map_err(EngineError::validation)?;

    // The pipeline call is long-running; it happens before any store write
    // and outside any lock, so a failure persists nothing.
    let generated = state.generator.generate(&input).await.map_err(|err| {
        warn!(niche = %input.niche, error = %err, "generation pipeline failed");
        err
    })?;

    let media_reference = generated.media_url.clone();
    let script = generated.into_script();
    let (video, prediction) = state
        .engine
        .admit_video(&input.niche, script, &input.tone, media_reference)
        .await?;

    info!(
        video_id = %video.id,
        niche = %video.niche,
        score = prediction.score,
        "video generated"
    );

    Ok(Json(GenerateVideoResponse {
        message: "Video generated successfully".to_string(),
        virality_score: prediction.score,
        script: ScriptSummary::from(&video.script),
        suggestions: prediction.suggestions,
        video_url: format!("/videos/{}/download", video.id),
    }))
}

async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<VideosQuery>,
) -> Json<VideosResponse> {
    let videos = state
        .engine
        .videos(
            query.niche.as_deref(),
            query.limit.unwrap_or(DEFAULT_VIDEO_LIMIT),
        )
        .await;
    let count = videos.len();
    Json(VideosResponse { videos, count })
}

async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Json<GeneratedVideo>, ApiError> {
    let video = state.engine.video(&video_id).await?;
    Ok(Json(video))
}

async fn delete_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let video = state.engine.delete_video(&video_id).await?;
    if let Some(path) = local_media_path(&state, video.media_reference.as_deref()) {
        if let Err(err) = tokio::fs::remove_file(&path).await {
            warn!(video_id = %video.id, error = %err, "failed to remove media file");
        }
    }
    info!(%video_id, "video deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn download_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<Response, ApiError> {
    let video = state.engine.video(&video_id).await?;
    let Some(reference) = video.media_reference.as_deref() else {
        return Err(EngineError::not_found(format!("media for video {}", video_id)).into());
    };

    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Ok(Redirect::temporary(reference).into_response());
    }

    let path = state.media_dir.join(reference);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| EngineError::not_found(format!("media file for video {}", video_id)))?;

    let headers = [
        (header::CONTENT_TYPE, "video/mp4".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.mp4\"", video.title),
        ),
    ];
    Ok((headers, bytes).into_response())
}

async fn learning_feedback(
    State(state): State<AppState>,
    Json(request): Json<AnalyticsRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let input = request.into_input().map_err(EngineError::validation)?;
    state.engine.record_analytics(input).await?;
    Ok(Json(MessageResponse {
        message: "Feedback recorded for learning".to_string(),
    }))
}

async fn learning_insights(
    State(state): State<AppState>,
    Query(query): Query<InsightsQuery>,
) -> Json<Insights> {
    Json(state.engine.insights(query.niche.as_deref()).await)
}

async fn dashboard_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(state.engine.dashboard_stats().await)
}

fn local_media_path(state: &AppState, reference: Option<&str>) -> Option<PathBuf> {
    let reference = reference?;
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return None;
    }
    Some(state.media_dir.join(reference))
}
