use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::model::AnalyticsRecord;

/// Append-only; one video may accumulate a time series of records.
pub struct AnalyticsStore {
    path: Option<PathBuf>,
    records: RwLock<Vec<AnalyticsRecord>>,
}

impl AnalyticsStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: RwLock::new(Vec::new()),
        }
    }

    pub async fn load(path: PathBuf) -> Result<Self> {
        let records = if path.exists() {
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
            records: RwLock::new(records),
        })
    }

    pub async fn add(&self, record: AnalyticsRecord) -> Result<AnalyticsRecord> {
        let mut guard = self.records.write().await;
        guard.push(record.clone());
        self.persist(&guard).await?;
        Ok(record)
    }

    /// Records filtered by video, newest first.
    pub async fn list(&self, video_id: Option<&str>) -> Vec<AnalyticsRecord> {
        let guard = self.records.read().await;
        let mut matched: Vec<AnalyticsRecord> = guard
            .iter()
            .filter(|record| match video_id {
                Some(wanted) => record.video_id == wanted,
                None => true,
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        matched
    }

    pub async fn all(&self) -> Vec<AnalyticsRecord> {
        let guard = self.records.read().await;
        guard.clone()
    }

    pub async fn count(&self) -> usize {
        let guard = self.records.read().await;
        guard.len()
    }

    async fn persist(&self, records: &[AnalyticsRecord]) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_string_pretty(records)?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }
}
