use crate::domain::Settings;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};

/// The single persisted settings record, written as one JSON blob.
#[derive(Clone, Debug)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SettingsFile { path: path.into() }
    }

    /// An absent file is first run: defaults apply. Persisted values override
    /// matching fields only, and numeric fields are clamped into range.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load(&self) -> Result<Settings, SettingsFileError> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let settings: Settings = serde_json::from_str(&raw)?;
                Ok(settings.normalized())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No persisted settings yet, using defaults");
                Ok(Settings::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, settings: &Settings) -> Result<(), SettingsFileError> {
        let raw = serde_json::to_string(settings)?;
        fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum SettingsFileError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed settings blob: {0}")]
    Malformed(#[from] serde_json::Error),
}
