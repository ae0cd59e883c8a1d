use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Payload shared by the status, patch and unpatch commands.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchRequest {
    pub resources_path: Option<String>,
    #[serde(default)]
    pub enable_devtools: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatchStatus {
    pub resources_path: String,
    pub patched: bool,
    pub backup_exists: bool,
}

/// The fixed command surface the front-end dispatches against. Implementors
/// own everything behind it; the shell only forwards and renders.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Best-effort installation lookup; `None` means nothing was found.
    async fn detect_resources_path(&self) -> Result<Option<String>, BackendError>;

    /// Folder picker; `None` means the user cancelled.
    async fn browse_resources_path(&self) -> Result<Option<String>, BackendError>;

    async fn get_status(&self, request: &PatchRequest) -> Result<PatchStatus, BackendError>;

    /// Returns a completion message on success.
    async fn patch(&self, request: &PatchRequest) -> Result<String, BackendError>;

    async fn unpatch(&self, request: &PatchRequest) -> Result<String, BackendError>;

    async fn minimize_window(&self) -> Result<(), BackendError>;

    async fn close_window(&self) -> Result<(), BackendError>;

    async fn open_url(&self, url: &str) -> Result<(), BackendError>;
}

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("resources path not found, set it manually")]
    ResourcesNotFound,
    #[error("application script not found at {}", .0.display())]
    MissingEntryScript(PathBuf),
    #[error("application script structure not recognized")]
    UnrecognizedEntryScript,
    #[error("backup not found, nothing to restore")]
    MissingBackup,
    #[error("script download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("script download failed: HTTP {0}")]
    DownloadStatus(reqwest::StatusCode),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("window control is not available")]
    WindowUnavailable,
    #[error("could not open url: {0}")]
    OpenUrl(String),
}
