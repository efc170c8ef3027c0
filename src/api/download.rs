//! Download queue and history endpoints

use serde::Deserialize;

use super::client::{ApiClient, ApiError};
use crate::models::{DownloadHistoryItem, DownloadTask};

impl ApiClient {
    /// Queue a download for a torrent resource (POST /download/search)
    pub async fn download_torrent(&self, resource_id: i64) -> Result<(), ApiError> {
        let params = [("id", resource_id.to_string())];
        self.post_empty("/download/search", &params).await
    }

    /// Resume a paused download (POST /download/start)
    pub async fn start_download(&self, id: &str) -> Result<(), ApiError> {
        let params = [("id", id.to_string())];
        self.post_empty("/download/start", &params).await
    }

    /// Pause an active download (POST /download/stop)
    pub async fn stop_download(&self, id: &str) -> Result<(), ApiError> {
        let params = [("id", id.to_string())];
        self.post_empty("/download/stop", &params).await
    }

    /// Remove a download from the queue (POST /download/remove)
    pub async fn remove_download(&self, id: &str) -> Result<(), ApiError> {
        let params = [("id", id.to_string())];
        self.post_empty("/download/remove", &params).await
    }

    /// Fetch the current active download queue (POST /download/now)
    pub async fn active_downloads(&self) -> Result<Vec<DownloadTask>, ApiError> {
        let data: TaskList = self.post_form("/download/now", &[]).await?;
        Ok(data.into_tasks())
    }

    /// Fetch a page of download history (POST /download/history)
    pub async fn download_history(
        &self,
        page: u32,
    ) -> Result<Vec<DownloadHistoryItem>, ApiError> {
        let params = [("page", page.to_string())];
        let data: HistoryData = self.post_form("/download/history", &params).await?;
        Ok(data.items)
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

/// Active-queue payload; some backend versions wrap the list in "Items",
/// others return it bare
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TaskList {
    Wrapped {
        #[serde(rename = "Items", default)]
        items: Vec<DownloadTask>,
    },
    Bare(Vec<DownloadTask>),
}

impl TaskList {
    fn into_tasks(self) -> Vec<DownloadTask> {
        match self {
            TaskList::Wrapped { items } => items,
            TaskList::Bare(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryData {
    #[serde(rename = "Items", default)]
    items: Vec<DownloadHistoryItem>,
}
