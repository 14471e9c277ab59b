use serde::{Deserialize, Serialize};

use crate::clamp_score;
use crate::config::ViralityConfig;
use crate::model::ScriptData;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptFeatures {
    /// Hook length in words.
    pub hook_length: usize,
    pub hashtag_count: usize,
    pub has_question_hook: bool,
    pub tone: String,
}

impl ScriptFeatures {
    pub fn from_script(script: &ScriptData, tone: &str) -> Self {
        Self {
            hook_length: script.hook.split_whitespace().count(),
            hashtag_count: script.hashtags.len(),
            has_question_hook: script.hook.contains('?'),
            tone: tone.trim().to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub score: f64,
    pub suggestions: Vec<String>,
}

/// Predicts a 0-100 virality score for a candidate script. A script in a hot
/// niche starts favored; script-level features add bounded bonuses on top.
#[derive(Debug, Clone)]
pub struct ViralityPredictor {
    config: ViralityConfig,
}

impl ViralityPredictor {
    pub fn new(config: ViralityConfig) -> Self {
        Self { config }
    }

    pub fn predict(&self, profitability_score: f64, features: &ScriptFeatures) -> Prediction {
        let config = &self.config;
        let mut score = profitability_score * config.base_scale;
        let mut forfeited: Vec<(f64, String)> = Vec::new();

        if features.has_question_hook {
            score += config.question_hook_bonus;
        } else {
            forfeited.push((
                config.question_hook_bonus,
                "Open the hook with a direct question to pull viewers into the first seconds.".to_string(),
            ));
        }

        if features.hook_length >= config.hook_length_min
            && features.hook_length <= config.hook_length_max
        {
            score += config.hook_length_bonus;
        } else if features.hook_length < config.hook_length_min {
            forfeited.push((
                config.hook_length_bonus,
                format!(
                    "The hook is too short; aim for {}-{} words.",
                    config.hook_length_min, config.hook_length_max
                ),
            ));
        } else {
            forfeited.push((
                config.hook_length_bonus,
                format!(
                    "The hook is too long; trim it to {}-{} words.",
                    config.hook_length_min, config.hook_length_max
                ),
            ));
        }

        if features.hashtag_count >= config.hashtag_min
            && features.hashtag_count <= config.hashtag_max
        {
            score += config.hashtag_bonus;
        } else {
            forfeited.push((
                config.hashtag_bonus,
                format!(
                    "Adjust the hashtag count to {}-{}.",
                    config.hashtag_min, config.hashtag_max
                ),
            ));
        }

        if config
            .preferred_tones
            .iter()
            .any(|tone| tone == &features.tone)
        {
            score += config.tone_bonus;
        } else {
            forfeited.push((
                config.tone_bonus,
                format!(
                    "Tones like {} historically drive higher engagement; consider reframing.",
                    config.preferred_tones.join(" or ")
                ),
            ));
        }

        // Stable sort: equal-size forfeits keep declaration order (hook
        // length, hashtags, tone).
        forfeited.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        let suggestions = forfeited
            .into_iter()
            .map(|(_, text)| text)
            .take(config.max_suggestions)
            .collect();

        Prediction {
            score: clamp_score(score),
            suggestions,
        }
    }
}
