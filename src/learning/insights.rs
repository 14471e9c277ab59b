use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::LearningConfig;
use crate::learning::weights::WeightBook;
use crate::model::{normalize_niche, AnalyticsRecord, GeneratedVideo, NicheReport};

#[derive(Debug, Clone, Serialize)]
pub struct Insights {
    pub recommendations: Vec<String>,
}

/// Natural-language recommendations from a fixed decision table. For a
/// specific niche the table is keyed by whichever metric (calibration
/// multiplier, engagement rate) deviates most from the global mean; without
/// a niche it summarizes what the high performers have in common.
pub fn build_insights(
    niche: Option<&str>,
    book: &WeightBook,
    reports: &BTreeMap<String, NicheReport>,
    videos: &[GeneratedVideo],
    analytics: &[AnalyticsRecord],
    config: &LearningConfig,
) -> Insights {
    match niche {
        Some(name) => niche_insights(&normalize_niche(name), book, reports, config),
        None => global_insights(videos, analytics, config),
    }
}

fn niche_insights(
    niche: &str,
    book: &WeightBook,
    reports: &BTreeMap<String, NicheReport>,
    config: &LearningConfig,
) -> Insights {
    let Some(report) = reports.get(niche) else {
        return Insights {
            recommendations: vec![format!(
                "No data recorded for \"{}\" yet; add trends or publish a video to start calibration.",
                niche
            )],
        };
    };

    let global_rate = mean(
        &reports
            .values()
            .filter(|r| r.trend_count > 0)
            .map(|r| r.avg_engagement_rate)
            .collect::<Vec<_>>(),
    );

    let mut ranked: Vec<(f64, String)> = Vec::new();

    let weight = book.get(niche);
    let sample_count = weight.map(|w| w.sample_count).unwrap_or(0);
    if sample_count < config.min_samples {
        ranked.push((
            0.2,
            format!(
                "Only {} published video(s) with analytics; the calibration multiplier stays neutral until {} samples.",
                sample_count, config.min_samples
            ),
        ));
    } else if let Some(weight) = weight {
        let deviation = (weight.multiplier - 1.0).abs();
        if weight.multiplier < 0.95 {
            ranked.push((
                deviation,
                "This niche under-performs revenue expectations relative to its virality scores; tighten hooks and calls to action.".to_string(),
            ));
        } else if weight.multiplier > 1.05 {
            ranked.push((
                deviation,
                "This niche converts better than predicted; allocate more production slots to it.".to_string(),
            ));
        }
    }

    if global_rate > 0.0 {
        let relative = (report.avg_engagement_rate - global_rate) / global_rate;
        if relative < -0.1 {
            ranked.push((
                relative.abs(),
                "Engagement per view trails the global average; open with a question hook to invite comments.".to_string(),
            ));
        } else if relative > 0.1 {
            ranked.push((
                relative,
                "Engagement per view beats the global average; lean into the formats already driving shares.".to_string(),
            ));
        }
    }

    ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let recommendations = if ranked.is_empty() {
        vec!["Performing in line with global averages; keep the current format.".to_string()]
    } else {
        ranked.into_iter().map(|(_, text)| text).take(3).collect()
    };

    Insights { recommendations }
}

fn global_insights(
    videos: &[GeneratedVideo],
    analytics: &[AnalyticsRecord],
    config: &LearningConfig,
) -> Insights {
    if analytics.is_empty() {
        return Insights {
            recommendations: vec![
                "Not enough analytics to draw insights; publish videos and report their performance first.".to_string(),
            ],
        };
    }

    let high_videos: Vec<&GeneratedVideo> = analytics
        .iter()
        .filter(|record| record.views > config.high_performer_views)
        .filter_map(|record| videos.iter().find(|video| video.id == record.video_id))
        .collect();

    let mut recommendations = Vec::new();

    if high_videos.is_empty() {
        recommendations.push(format!(
            "No video has crossed {} views yet; raise predicted virality before publishing.",
            config.high_performer_views
        ));
    } else {
        let durations: Vec<f64> = high_videos
            .iter()
            .map(|video| video.script.duration_seconds as f64)
            .collect();
        recommendations.push(format!(
            "Top performers average around {} seconds; aim close to that duration.",
            mean(&durations).round() as u64
        ));

        let scores: Vec<f64> = high_videos.iter().map(|video| video.virality_score).collect();
        recommendations.push(format!(
            "Target a predicted virality score above {} before publishing.",
            mean(&scores).round() as u64
        ));

        let hashtags: Vec<f64> = high_videos
            .iter()
            .map(|video| video.script.hashtags.len() as f64)
            .collect();
        let optimal_tags = mean(&hashtags).round() as u64;
        if optimal_tags > 0 {
            recommendations.push(format!("Use about {} hashtags.", optimal_tags));
        }
    }

    Insights { recommendations }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
