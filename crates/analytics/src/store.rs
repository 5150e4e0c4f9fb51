use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::event::SessionEvent;
use crate::history::AnalyticsLog;

/// JSON-file backed analytics log
#[derive(Debug, Clone)]
pub struct AnalyticsStore {
    path: PathBuf,
}

impl AnalyticsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the log. A missing file is an empty log; a corrupt one is an error.
    pub async fn load(&self) -> Result<AnalyticsLog> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No analytics log at {}", self.path.display());
                Ok(AnalyticsLog::new())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn save(&self, log: &AnalyticsLog) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(log)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Load, append one event, and write back
    pub async fn record_query(&self, event: SessionEvent) -> Result<AnalyticsLog> {
        let mut log = self.load().await?;
        log::debug!(
            "Recording query from {} ({} symptoms)",
            event.user,
            event.symptoms_selected
        );
        log.record(event);
        self.save(&log).await?;
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let temp = TempDir::new().unwrap();
        let store = AnalyticsStore::new(temp.path().join("analytics.json"));
        let log = store.load().await.unwrap();
        assert_eq!(log.session_count(), 0);
    }

    #[tokio::test]
    async fn save_creates_parent_dirs_and_leaves_no_tmp() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("analytics.json");
        let store = AnalyticsStore::new(&path);

        store
            .record_query(SessionEvent::new("a", 1, vec![1], None))
            .await
            .unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("analytics.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();

        let err = AnalyticsStore::new(&path).load().await.unwrap_err();
        assert!(matches!(err, crate::AnalyticsError::JsonError(_)));
    }
}
