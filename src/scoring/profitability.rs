use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use crate::clamp_score;
use crate::config::ScoringConfig;
use crate::learning::WeightBook;
use crate::model::{AnalyticsRecord, GeneratedVideo, NicheReport, Trend};

#[derive(Debug, Default)]
struct NicheAccumulator {
    trend_count: usize,
    total_views: u64,
    rate_sum: f64,
    rate_count: usize,
    recent_trend_count: usize,
    recency_boost: f64,
    video_count: usize,
    total_revenue: f64,
}

/// Derives a 0-100 profitability score and trending flag per niche from the
/// current store contents. Pure over its inputs; called fresh on every query
/// so reports never go stale.
#[derive(Debug, Clone)]
pub struct ProfitabilityScorer {
    config: ScoringConfig,
}

impl ProfitabilityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score_all(
        &self,
        trends: &[Trend],
        videos: &[GeneratedVideo],
        analytics: &[AnalyticsRecord],
        weights: &WeightBook,
        now: DateTime<Utc>,
    ) -> BTreeMap<String, NicheReport> {
        let window_seconds = self.config.recency_window_days * 86_400.0;
        let mut accumulators: BTreeMap<String, NicheAccumulator> = BTreeMap::new();

        for trend in trends {
            let entry = accumulators.entry(trend.niche.clone()).or_default();
            entry.trend_count += 1;
            entry.total_views += trend.views;
            if trend.views > 0 {
                entry.rate_sum += trend.engagement as f64 / trend.views as f64;
                entry.rate_count += 1;
            }

            let age_seconds = (now - trend.created_at).num_seconds() as f64;
            if age_seconds >= 0.0 && age_seconds < window_seconds && window_seconds > 0.0 {
                entry.recent_trend_count += 1;
                let boost = 100.0 * (1.0 - age_seconds / window_seconds);
                if boost > entry.recency_boost {
                    entry.recency_boost = boost;
                }
            }
        }

        // Latest record per video; videos with no analytics contribute zero
        // revenue but stay in the denominator.
        let latest = latest_record_per_video(analytics);
        for video in videos {
            let entry = accumulators.entry(video.niche.clone()).or_default();
            entry.video_count += 1;
            if let Some(record) = latest.get(video.id.as_str()) {
                entry.total_revenue += record.revenue;
            }
        }

        let metrics: BTreeMap<&str, (f64, f64, f64)> = accumulators
            .iter()
            .map(|(name, acc)| {
                let avg_views = if acc.trend_count > 0 {
                    acc.total_views as f64 / acc.trend_count as f64
                } else {
                    0.0
                };
                let avg_rate = if acc.rate_count > 0 {
                    acc.rate_sum / acc.rate_count as f64
                } else {
                    0.0
                };
                let avg_revenue = if acc.video_count > 0 {
                    acc.total_revenue / acc.video_count as f64
                } else {
                    0.0
                };
                (name.as_str(), (avg_views, avg_rate, avg_revenue))
            })
            .collect();

        let views_scale = LogScale::fit(metrics.values().map(|m| m.0));
        let rate_scale = LogScale::fit(metrics.values().map(|m| m.1));
        let revenue_scale = LogScale::fit(metrics.values().map(|m| m.2));

        let weights_config = &self.config.weights;
        accumulators
            .iter()
            .map(|(name, acc)| {
                let (avg_views, avg_rate, avg_revenue) = metrics[name.as_str()];
                let raw = weights_config.views * views_scale.normalize(avg_views)
                    + weights_config.engagement_rate * rate_scale.normalize(avg_rate)
                    + weights_config.revenue * revenue_scale.normalize(avg_revenue)
                    + weights_config.recency * acc.recency_boost;
                let score = clamp_score(raw * weights.multiplier(name));

                // Both conditions required: one viral-looking trend must not
                // flag a niche trending.
                let trending = score >= self.config.trending_score_threshold
                    && acc.recent_trend_count >= self.config.trending_min_recent_trends;

                let report = NicheReport {
                    name: name.clone(),
                    profitability_score: score,
                    avg_views,
                    avg_engagement_rate: avg_rate,
                    avg_revenue,
                    trend_count: acc.trend_count,
                    recent_trend_count: acc.recent_trend_count,
                    trending,
                };
                (name.clone(), report)
            })
            .collect()
    }
}

fn latest_record_per_video(analytics: &[AnalyticsRecord]) -> HashMap<&str, &AnalyticsRecord> {
    let mut latest: HashMap<&str, &AnalyticsRecord> = HashMap::new();
    for record in analytics {
        match latest.get(record.video_id.as_str()) {
            // Equal timestamps resolve to the later-appended record.
            Some(current) if current.created_at > record.created_at => {}
            _ => {
                latest.insert(record.video_id.as_str(), record);
            }
        }
    }
    latest
}

/// Log-scaled min-max normalization onto [0, 100] across the active niche
/// universe, so one outlier niche cannot collapse all others near zero.
struct LogScale {
    min: f64,
    max: f64,
}

impl LogScale {
    fn fit(values: impl Iterator<Item = f64>) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            let log = (1.0 + value.max(0.0)).ln();
            if log < min {
                min = log;
            }
            if log > max {
                max = log;
            }
        }
        Self { min, max }
    }

    fn normalize(&self, value: f64) -> f64 {
        if !self.min.is_finite() || !self.max.is_finite() {
            return 0.0;
        }
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            // Degenerate universe (single niche or identical metrics): keep
            // the midpoint so a lone niche scores stably between calls.
            return 50.0;
        }
        let log = (1.0 + value.max(0.0)).ln();
        100.0 * (log - self.min) / span
    }
}
