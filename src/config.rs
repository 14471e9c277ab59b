use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricWeights {
    pub views: f64,
    pub engagement_rate: f64,
    pub revenue: f64,
    pub recency: f64,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            views: 0.35,
            engagement_rate: 0.25,
            revenue: 0.25,
            recency: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: MetricWeights,
    pub recency_window_days: f64,
    pub trending_score_threshold: f64,
    pub trending_min_recent_trends: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: MetricWeights::default(),
            recency_window_days: 7.0,
            trending_score_threshold: 70.0,
            trending_min_recent_trends: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViralityConfig {
    pub base_scale: f64,
    pub question_hook_bonus: f64,
    pub hook_length_bonus: f64,
    pub hook_length_min: usize,
    pub hook_length_max: usize,
    pub hashtag_bonus: f64,
    pub hashtag_min: usize,
    pub hashtag_max: usize,
    pub tone_bonus: f64,
    pub preferred_tones: Vec<String>,
    pub max_suggestions: usize,
}

impl Default for ViralityConfig {
    fn default() -> Self {
        Self {
            base_scale: 0.6,
            question_hook_bonus: 10.0,
            hook_length_bonus: 5.0,
            hook_length_min: 5,
            hook_length_max: 15,
            hashtag_bonus: 5.0,
            hashtag_min: 3,
            hashtag_max: 8,
            tone_bonus: 5.0,
            preferred_tones: vec!["motivant".to_string(), "drôle".to_string()],
            max_suggestions: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    pub ema_alpha: f64,
    pub multiplier_floor: f64,
    pub multiplier_ceiling: f64,
    pub min_samples: u64,
    pub high_performer_views: u64,
    pub low_performer_views: u64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            ema_alpha: 0.3,
            multiplier_floor: 0.5,
            multiplier_ceiling: 1.5,
            min_samples: 3,
            high_performer_views: 10_000,
            low_performer_views: 1_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8100".to_string(),
            timeout_ms: 120_000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scoring: ScoringConfig,
    pub virality: ViralityConfig,
    pub learning: LearningConfig,
    pub generator: GeneratorConfig,
}

impl EngineConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>)> {
        let config_path = path.or_else(default_config_path);
        let mut config = if let Some(path) = config_path.as_ref() {
            if path.exists() {
                let contents = std::fs::read_to_string(path)?;
                toml::from_str(&contents).map_err(|err| {
                    EngineError::Storage(format!("failed to parse config: {}", err))
                })?
            } else {
                EngineConfig::default()
            }
        } else {
            EngineConfig::default()
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| EngineError::Storage(format!("failed to serialize config: {}", err)))?;
        std::fs::write(path, payload)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = env::var("GENERATOR_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.generator.endpoint = endpoint;
            }
        }
        if let Ok(timeout) = env::var("GENERATOR_TIMEOUT_MS") {
            if let Ok(value) = timeout.parse::<u64>() {
                self.generator.timeout_ms = value;
            }
        }
        if let Ok(window) = env::var("RECENCY_WINDOW_DAYS") {
            if let Ok(value) = window.parse::<f64>() {
                self.scoring.recency_window_days = value;
            }
        }
        if let Ok(alpha) = env::var("LEARNING_EMA_ALPHA") {
            if let Ok(value) = alpha.parse::<f64>() {
                self.learning.ema_alpha = value;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("NICHECAST_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/engine.toml")))
}
