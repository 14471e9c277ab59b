use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::LearningConfig;

pub type WeightSnapshot = BTreeMap<String, LearningWeight>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningWeight {
    pub niche: String,
    pub multiplier: f64,
    pub ema_ratio: f64,
    pub sample_count: u64,
    pub version: u64,
}

impl LearningWeight {
    fn seed(niche: &str) -> Self {
        Self {
            niche: niche.to_string(),
            multiplier: 1.0,
            ema_ratio: 0.0,
            sample_count: 0,
            version: 0,
        }
    }
}

/// Versioned record of every niche's calibration state plus the global EMA
/// the multipliers are measured against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightBook {
    weights: BTreeMap<String, LearningWeight>,
    global_ema: f64,
    global_samples: u64,
    version: u64,
}

impl WeightBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Multiplier applied to a niche's raw profitability score. Unknown
    /// niches are neutral.
    pub fn multiplier(&self, niche: &str) -> f64 {
        self.weights
            .get(niche)
            .map(|weight| weight.multiplier)
            .unwrap_or(1.0)
    }

    pub fn get(&self, niche: &str) -> Option<&LearningWeight> {
        self.weights.get(niche)
    }

    pub fn global_ema(&self) -> f64 {
        self.global_ema
    }

    pub fn global_samples(&self) -> u64 {
        self.global_samples
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn snapshot(&self) -> WeightSnapshot {
        self.weights.clone()
    }

    /// Folds one calibration ratio into the niche and global EMAs, then
    /// recomputes all multipliers so readers never see a half-applied update.
    pub fn observe(&mut self, niche: &str, ratio: f64, config: &LearningConfig) {
        let alpha = config.ema_alpha;

        self.global_ema = if self.global_samples == 0 {
            ratio
        } else {
            alpha * ratio + (1.0 - alpha) * self.global_ema
        };
        self.global_samples += 1;

        let entry = self
            .weights
            .entry(niche.to_string())
            .or_insert_with(|| LearningWeight::seed(niche));
        entry.ema_ratio = if entry.sample_count == 0 {
            ratio
        } else {
            alpha * ratio + (1.0 - alpha) * entry.ema_ratio
        };
        entry.sample_count += 1;

        self.recompute(config);
    }

    /// Rederives every multiplier from the current EMAs. Niches below the
    /// confidence gate stay at 1.0; everything else is bounded to the
    /// configured floor/ceiling so one outlier video cannot swing a niche by
    /// more than the clamp allows.
    pub fn recompute(&mut self, config: &LearningConfig) -> WeightSnapshot {
        self.version += 1;
        let global_ema = self.global_ema;
        for weight in self.weights.values_mut() {
            weight.multiplier = if weight.sample_count < config.min_samples || global_ema <= 0.0 {
                1.0
            } else {
                (weight.ema_ratio / global_ema)
                    .clamp(config.multiplier_floor, config.multiplier_ceiling)
            };
            weight.version = self.version;
        }
        self.weights.clone()
    }
}
