use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::model::{normalize_niche, Trend};

pub struct TrendStore {
    path: Option<PathBuf>,
    trends: RwLock<Vec<Trend>>,
}

impl TrendStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            trends: RwLock::new(Vec::new()),
        }
    }

    pub async fn load(path: PathBuf) -> Result<Self> {
        let trends = if path.exists() {
            let data = tokio::fs::read_to_string(&path).await?;
            if data.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&data)?
            }
        } else {
            Vec::new()
        };

        Ok(Self {
            path: Some(path),
            trends: RwLock::new(trends),
        })
    }

    pub async fn add(&self, trend: Trend) -> Result<Trend> {
        let mut guard = self.trends.write().await;
        guard.push(trend.clone());
        self.persist(&guard).await?;
        Ok(trend)
    }

    /// Trends filtered by niche, most viewed first.
    pub async fn list(&self, niche: Option<&str>, limit: usize) -> Vec<Trend> {
        let guard = self.trends.read().await;
        let niche = niche.map(normalize_niche);
        let mut matched: Vec<Trend> = guard
            .iter()
            .filter(|trend| match niche.as_deref() {
                Some(wanted) => trend.niche == wanted,
                None => true,
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.views.cmp(&a.views).then_with(|| a.id.cmp(&b.id)));
        matched.truncate(limit);
        matched
    }

    pub async fn delete(&self, trend_id: &str) -> Result<bool> {
        let mut guard = self.trends.write().await;
        let before = guard.len();
        guard.retain(|trend| trend.id != trend_id);
        let deleted = guard.len() != before;
        if deleted {
            self.persist(&guard).await?;
        }
        Ok(deleted)
    }

    pub async fn all(&self) -> Vec<Trend> {
        let guard = self.trends.read().await;
        guard.clone()
    }

    pub async fn count(&self) -> usize {
        let guard = self.trends.read().await;
        guard.len()
    }

    async fn persist(&self, trends: &[Trend]) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_string_pretty(trends)?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }
}
