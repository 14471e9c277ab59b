use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::model::NicheReport;

/// Orders niches for the dashboard. Pure function over scorer output;
/// stateless, fully deterministic.
pub struct RecommendationRanker;

impl RecommendationRanker {
    /// Descending profitability with a secondary trending boost; remaining
    /// ties break by higher trend count, then niche name.
    pub fn top(reports: &BTreeMap<String, NicheReport>, limit: usize) -> Vec<NicheReport> {
        let mut ranked: Vec<NicheReport> = reports.values().cloned().collect();
        ranked.sort_by(|a, b| {
            b.profitability_score
                .partial_cmp(&a.profitability_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.trending.cmp(&a.trending))
                .then_with(|| b.trend_count.cmp(&a.trend_count))
                .then_with(|| a.name.cmp(&b.name))
        });
        ranked.truncate(limit);
        ranked
    }
}
