use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::model::{normalize_niche, GeneratedVideo};

pub struct VideoStore {
    path: Option<PathBuf>,
    videos: RwLock<Vec<GeneratedVideo>>,
}

impl VideoStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            videos: RwLock::new(Vec::new()),
        }
    }

    pub async fn load(path: PathBuf) -> Result<Self> {
        let videos = if path.exists() {
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
            videos: RwLock::new(videos),
        })
    }

    pub async fn add(&self, video: GeneratedVideo) -> Result<GeneratedVideo> {
        let mut guard = self.videos.write().await;
        guard.push(video.clone());
        self.persist(&guard).await?;
        Ok(video)
    }

    pub async fn get(&self, video_id: &str) -> Option<GeneratedVideo> {
        let guard = self.videos.read().await;
        guard.iter().find(|video| video.id == video_id).cloned()
    }

    pub async fn exists(&self, video_id: &str) -> bool {
        let guard = self.videos.read().await;
        guard.iter().any(|video| video.id == video_id)
    }

    /// Videos filtered by niche, newest first.
    pub async fn list(&self, niche: Option<&str>, limit: usize) -> Vec<GeneratedVideo> {
        let guard = self.videos.read().await;
        let niche = niche.map(normalize_niche);
        let mut matched: Vec<GeneratedVideo> = guard
            .iter()
            .filter(|video| match niche.as_deref() {
                Some(wanted) => video.niche == wanted,
                None => true,
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        matched.truncate(limit);
        matched
    }

    pub async fn delete(&self, video_id: &str) -> Result<Option<GeneratedVideo>> {
        let mut guard = self.videos.write().await;
        let position = guard.iter().position(|video| video.id == video_id);
        let removed = position.map(|index| guard.remove(index));
        if removed.is_some() {
            self.persist(&guard).await?;
        }
        Ok(removed)
    }

    pub async fn all(&self) -> Vec<GeneratedVideo> {
        let guard = self.videos.read().await;
        guard.clone()
    }

    pub async fn count(&self) -> usize {
        let guard = self.videos.read().await;
        guard.len()
    }

    async fn persist(&self, videos: &[GeneratedVideo]) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_string_pretty(videos)?;
        tokio::fs::write(path, data).await?;
        Ok(())
    }
}
