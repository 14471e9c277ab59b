use nichecast::config::{EngineConfig, LearningConfig};
use nichecast::engine::{Engine, NewAnalytics, NewTrend};
use nichecast::error::EngineError;
use nichecast::learning::WeightBook;
use nichecast::model::ScriptData;

fn observe_n(book: &mut WeightBook, niche: &str, ratio: f64, times: usize, config: &LearningConfig) {
    for _ in 0..times {
        book.observe(niche, ratio, config);
    }
}

#[test]
fn multiplier_is_neutral_below_the_confidence_gate() {
    let config = LearningConfig::default();
    let mut book = WeightBook::new();

    observe_n(&mut book, "fitness", 4.0, 2, &config);
    let weight = book.get("fitness").unwrap();
    assert_eq!(weight.sample_count, 2);
    assert!((weight.multiplier - 1.0).abs() < 1e-9);
}

#[test]
fn under_performing_niche_moves_below_one() {
    let config = LearningConfig::default();
    let mut book = WeightBook::new();

    // Establish a global EMA around 1.0, then feed a niche whose videos earn
    // half of what their predicted score of 80 promised (revenue 40).
    observe_n(&mut book, "baseline", 1.0, 3, &config);
    assert!((book.global_ema() - 1.0).abs() < 1e-9);

    observe_n(&mut book, "fitness", 40.0 / 80.0, 2, &config);
    assert!((book.get("fitness").unwrap().multiplier - 1.0).abs() < 1e-9);

    book.observe("fitness", 40.0 / 80.0, &config);
    let weight = book.get("fitness").unwrap();
    assert_eq!(weight.sample_count, 3);
    assert!(weight.multiplier < 1.0);
    assert!(weight.multiplier >= config.multiplier_floor);
}

#[test]
fn multiplier_stays_bounded_under_adversarial_sequences() {
    let config = LearningConfig::default();
    let mut book = WeightBook::new();

    observe_n(&mut book, "moonshot", 100.0, 8, &config);
    observe_n(&mut book, "flop", 0.001, 8, &config);
    observe_n(&mut book, "moonshot", 1_000_000.0, 4, &config);

    for niche in ["moonshot", "flop"] {
        let weight = book.get(niche).unwrap();
        assert!(weight.multiplier >= config.multiplier_floor);
        assert!(weight.multiplier <= config.multiplier_ceiling);
    }
}

#[test]
fn zero_revenue_everywhere_keeps_multipliers_neutral() {
    let config = LearningConfig::default();
    let mut book = WeightBook::new();

    observe_n(&mut book, "fitness", 0.0, 10, &config);

    // Global EMA collapses to zero; the ratio is undefined so the niche is
    // left untouched rather than pinned to the floor.
    let weight = book.get("fitness").unwrap();
    assert_eq!(weight.sample_count, 10);
    assert!((weight.multiplier - 1.0).abs() < 1e-9);
}

#[test]
fn recompute_bumps_the_version() {
    let config = LearningConfig::default();
    let mut book = WeightBook::new();

    book.observe("fitness", 1.0, &config);
    let first = book.version();
    book.recompute(&config);
    assert!(book.version() > first);
}

fn sample_script() -> ScriptData {
    ScriptData {
        title: "Morning routine".to_string(),
        hook: "Why does this routine work so well?".to_string(),
        script: "full script".to_string(),
        hashtags: vec!["#fit".to_string(), "#morning".to_string(), "#health".to_string()],
        description: "description".to_string(),
        duration_seconds: 40,
    }
}

fn analytics_for(video_id: &str, views: u64, revenue: f64) -> NewAnalytics {
    NewAnalytics {
        video_id: video_id.to_string(),
        views,
        likes: views / 10,
        shares: views / 50,
        comments: views / 100,
        revenue,
    }
}

#[tokio::test]
async fn orphaned_analytics_are_rejected_and_store_unchanged() {
    let engine = Engine::in_memory(EngineConfig::default());

    let result = engine
        .record_analytics(analytics_for("no-such-video", 5_000, 12.0))
        .await;

    assert!(matches!(result, Err(EngineError::Consistency(_))));
    assert!(engine.analytics(None).await.is_empty());
}

#[tokio::test]
async fn ingestion_updates_the_niche_weight() {
    let engine = Engine::in_memory(EngineConfig::default());
    let (video, _) = engine
        .admit_video("fitness", sample_script(), "motivant", None)
        .await
        .unwrap();

    for _ in 0..3 {
        engine
            .record_analytics(analytics_for(&video.id, 20_000, 3.0))
            .await
            .unwrap();
    }

    let weights = engine.weights().await;
    let weight = weights.get("fitness").unwrap();
    assert_eq!(weight.sample_count, 3);
    assert_eq!(engine.analytics(Some(&video.id)).await.len(), 3);
}

#[tokio::test]
async fn negative_revenue_is_a_validation_error() {
    let engine = Engine::in_memory(EngineConfig::default());
    let (video, _) = engine
        .admit_video("fitness", sample_script(), "motivant", None)
        .await
        .unwrap();

    let result = engine
        .record_analytics(analytics_for(&video.id, 100, -5.0))
        .await;
    assert!(matches!(result, Err(EngineError::Validation(_))));
    assert!(engine.analytics(None).await.is_empty());
}

#[tokio::test]
async fn insights_flag_sparse_calibration_data() {
    let engine = Engine::in_memory(EngineConfig::default());
    engine
        .add_trend(NewTrend {
            title: "morning stretch".to_string(),
            niche: "fitness".to_string(),
            views: 10_000,
            engagement: 800,
            url: None,
        })
        .await
        .unwrap();

    let insights = engine.insights(Some("fitness")).await;
    assert!(!insights.recommendations.is_empty());
    assert!(insights.recommendations[0].contains("calibration multiplier"));
}

#[tokio::test]
async fn global_insights_need_analytics_first() {
    let engine = Engine::in_memory(EngineConfig::default());
    let insights = engine.insights(None).await;
    assert_eq!(insights.recommendations.len(), 1);
    assert!(insights.recommendations[0].contains("publish"));
}

#[tokio::test]
async fn global_insights_summarize_high_performers() {
    let engine = Engine::in_memory(EngineConfig::default());
    let (video, _) = engine
        .admit_video("fitness", sample_script(), "motivant", None)
        .await
        .unwrap();

    engine
        .record_analytics(analytics_for(&video.id, 50_000, 25.0))
        .await
        .unwrap();

    let insights = engine.insights(None).await;
    assert!(insights
        .recommendations
        .iter()
        .any(|text| text.contains("40 seconds")));
}
