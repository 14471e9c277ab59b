use chrono::{Duration, Utc};
use std::collections::BTreeMap;

use nichecast::config::{ScoringConfig, ViralityConfig};
use nichecast::learning::WeightBook;
use nichecast::model::{NicheReport, ScriptData, Trend};
use nichecast::scoring::{ProfitabilityScorer, RecommendationRanker, ScriptFeatures, ViralityPredictor};

fn trend(niche: &str, views: u64, engagement: u64, created_at: chrono::DateTime<Utc>) -> Trend {
    Trend {
        id: format!("trend-{}-{}-{}", niche, views, engagement),
        title: format!("{} trend", niche),
        niche: niche.to_string(),
        views,
        engagement,
        url: None,
        created_at,
    }
}

#[test]
fn fitness_scenario_scores_reproducibly() {
    let now = Utc::now();
    let trends = vec![
        trend("fitness", 1000, 100, now),
        trend("fitness", 2000, 150, now),
        trend("fitness", 3000, 200, now),
    ];

    let scorer = ProfitabilityScorer::new(ScoringConfig::default());
    let reports = scorer.score_all(&trends, &[], &[], &WeightBook::new(), now);

    let fitness = &reports["fitness"];
    assert_eq!(fitness.trend_count, 3);
    assert!((fitness.avg_views - 2000.0).abs() < 1e-6);

    // Single-niche universe: every normalized metric sits at the midpoint 50,
    // the fresh trends earn the full recency boost.
    let expected = 0.35 * 50.0 + 0.25 * 50.0 + 0.25 * 50.0 + 0.15 * 100.0;
    assert!((fitness.profitability_score - expected).abs() < 1e-6);
}

#[test]
fn score_all_is_idempotent_between_writes() {
    let now = Utc::now();
    let trends = vec![
        trend("fitness", 50_000, 4_000, now),
        trend("cooking", 20_000, 1_500, now - Duration::days(2)),
        trend("gaming", 90_000, 2_000, now - Duration::days(6)),
    ];

    let scorer = ProfitabilityScorer::new(ScoringConfig::default());
    let weights = WeightBook::new();
    let first = scorer.score_all(&trends, &[], &[], &weights, now);
    let second = scorer.score_all(&trends, &[], &[], &weights, now);

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn scores_stay_clamped_under_extreme_inputs() {
    let now = Utc::now();
    let trends = vec![
        trend("massive", 1_000_000_000, 900_000_000, now),
        trend("massive", 1_000_000_000, 800_000_000, now),
        trend("tiny", 1, 0, now - Duration::days(30)),
    ];

    let scorer = ProfitabilityScorer::new(ScoringConfig::default());
    let reports = scorer.score_all(&trends, &[], &[], &WeightBook::new(), now);

    for report in reports.values() {
        assert!(report.profitability_score >= 0.0);
        assert!(report.profitability_score <= 100.0);
    }
}

#[test]
fn trending_requires_score_and_two_recent_trends() {
    let now = Utc::now();
    let trends = vec![
        trend("fitness", 1_000_000, 100_000, now),
        trend("fitness", 900_000, 90_000, now),
        trend("knitting", 10, 0, now - Duration::days(30)),
    ];

    let scorer = ProfitabilityScorer::new(ScoringConfig::default());
    let reports = scorer.score_all(&trends, &[], &[], &WeightBook::new(), now);

    let fitness = &reports["fitness"];
    assert!(fitness.profitability_score >= 70.0);
    assert_eq!(fitness.recent_trend_count, 2);
    assert!(fitness.trending);
    assert!(!reports["knitting"].trending);
}

#[test]
fn single_viral_trend_does_not_flag_trending() {
    let now = Utc::now();
    let trends = vec![
        trend("solo", 1_000_000, 100_000, now),
        trend("background", 10, 0, now - Duration::days(30)),
    ];

    let scorer = ProfitabilityScorer::new(ScoringConfig::default());
    let reports = scorer.score_all(&trends, &[], &[], &WeightBook::new(), now);

    let solo = &reports["solo"];
    assert!(solo.profitability_score >= 70.0);
    assert_eq!(solo.recent_trend_count, 1);
    assert!(!solo.trending);
}

#[test]
fn views_zero_trends_count_but_skip_the_rate_average() {
    let now = Utc::now();
    let trends = vec![
        trend("fitness", 0, 500, now),
        trend("fitness", 1000, 100, now),
    ];

    let scorer = ProfitabilityScorer::new(ScoringConfig::default());
    let reports = scorer.score_all(&trends, &[], &[], &WeightBook::new(), now);

    let fitness = &reports["fitness"];
    assert_eq!(fitness.trend_count, 2);
    assert!((fitness.avg_engagement_rate - 0.1).abs() < 1e-6);
}

fn report(name: &str, score: f64, trend_count: usize, trending: bool) -> NicheReport {
    NicheReport {
        name: name.to_string(),
        profitability_score: score,
        avg_views: 0.0,
        avg_engagement_rate: 0.0,
        avg_revenue: 0.0,
        trend_count,
        recent_trend_count: 0,
        trending,
    }
}

#[test]
fn ranker_breaks_ties_by_trend_count_then_name() {
    let mut reports = BTreeMap::new();
    reports.insert("alpha".to_string(), report("alpha", 60.0, 2, false));
    reports.insert("beta".to_string(), report("beta", 60.0, 5, false));
    reports.insert("gamma".to_string(), report("gamma", 60.0, 2, false));
    reports.insert("delta".to_string(), report("delta", 80.0, 1, false));

    let ranked = RecommendationRanker::top(&reports, 10);
    let names: Vec<&str> = ranked.iter().map(|niche| niche.name.as_str()).collect();
    assert_eq!(names, vec!["delta", "beta", "alpha", "gamma"]);
}

#[test]
fn ranker_boosts_trending_at_equal_score() {
    let mut reports = BTreeMap::new();
    reports.insert("calm".to_string(), report("calm", 75.0, 9, false));
    reports.insert("hot".to_string(), report("hot", 75.0, 3, true));

    let ranked = RecommendationRanker::top(&reports, 10);
    assert_eq!(ranked[0].name, "hot");
}

#[test]
fn ranker_respects_limit() {
    let mut reports = BTreeMap::new();
    for (index, name) in ["a", "b", "c", "d"].iter().enumerate() {
        reports.insert(name.to_string(), report(name, index as f64, 1, false));
    }

    let ranked = RecommendationRanker::top(&reports, 2);
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].name, "d");
}

fn script(hook: &str, hashtags: usize) -> ScriptData {
    ScriptData {
        title: "title".to_string(),
        hook: hook.to_string(),
        script: "full script".to_string(),
        hashtags: (0..hashtags).map(|index| format!("#tag{}", index)).collect(),
        description: "description".to_string(),
        duration_seconds: 45,
    }
}

#[test]
fn virality_awards_every_bonus() {
    let predictor = ViralityPredictor::new(ViralityConfig::default());
    let features = ScriptFeatures::from_script(
        &script("Why does nobody talk about this simple trick?", 4),
        "motivant",
    );

    let prediction = predictor.predict(50.0, &features);
    // base 30 + question 10 + hook length 5 + hashtags 5 + tone 5
    assert!((prediction.score - 55.0).abs() < 1e-6);
    assert!(prediction.suggestions.is_empty());
}

#[test]
fn virality_suggestions_order_by_forfeited_bonus() {
    let predictor = ViralityPredictor::new(ViralityConfig::default());
    let features = ScriptFeatures {
        hook_length: 30,
        hashtag_count: 0,
        has_question_hook: false,
        tone: "serious".to_string(),
    };

    let prediction = predictor.predict(50.0, &features);
    assert!((prediction.score - 30.0).abs() < 1e-6);
    // Four forfeits, capped at three; the 10-point question hook leads, then
    // the 5-point forfeits in declaration order.
    assert_eq!(prediction.suggestions.len(), 3);
    assert!(prediction.suggestions[0].contains("question"));
    assert!(prediction.suggestions[1].contains("hook is too long"));
    assert!(prediction.suggestions[2].contains("hashtag"));
}

#[test]
fn virality_score_stays_clamped() {
    let predictor = ViralityPredictor::new(ViralityConfig::default());
    let features = ScriptFeatures::from_script(
        &script("Why does nobody talk about this simple trick?", 4),
        "motivant",
    );

    let prediction = predictor.predict(100.0, &features);
    assert!(prediction.score <= 100.0);

    let floor = predictor.predict(0.0, &ScriptFeatures {
        hook_length: 0,
        hashtag_count: 0,
        has_question_hook: false,
        tone: "flat".to_string(),
    });
    assert!(floor.score >= 0.0);
}

#[test]
fn question_hook_is_detected_from_script() {
    let features = ScriptFeatures::from_script(&script("Why is this happening?", 3), "Drôle");
    assert!(features.has_question_hook);
    assert_eq!(features.hook_length, 4);
    assert_eq!(features.hashtag_count, 3);
    assert_eq!(features.tone, "drôle");
}
