use crate::patcher::backend::{Backend, PatchRequest};
use chrono::{DateTime, Local};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Ready,
    Detecting,
    Patching,
    Patched,
    Restoring,
    Error,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Ready => "Ready",
            Status::Detecting => "Detecting",
            Status::Patching => "Patching",
            Status::Patched => "Patched",
            Status::Restoring => "Restoring",
            Status::Error => "Error",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Status::Patched => Tone::Success,
            Status::Error => Tone::Danger,
            _ => Tone::Neutral,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Neutral,
    Danger,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "OK",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        write!(f, "{label}")
    }
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub time: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {:>5}  {}", self.time.format("%H:%M:%S"), self.level, self.message)
    }
}

/// Stateless command/response front-end over a backend. Each operation is one
/// backend call whose outcome lands in the log and the status indicator; no
/// retries, and `&mut self` keeps operations serial by construction.
pub struct Shell<B: Backend> {
    backend: B,
    status: Status,
    log: Vec<LogEntry>,
    resources_path: Option<String>,
    enable_devtools: bool,
    patched: bool,
}

impl<B: Backend> Shell<B> {
    pub fn new(backend: B) -> Self {
        Shell {
            backend,
            status: Status::Ready,
            log: Vec::new(),
            resources_path: None,
            enable_devtools: false,
            patched: false,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn resources_path(&self) -> Option<&str> {
        self.resources_path.as_deref()
    }

    pub fn set_resources_path(&mut self, path: Option<String>) {
        self.resources_path = path;
    }

    pub fn set_enable_devtools(&mut self, on: bool) {
        self.enable_devtools = on;
    }

    /// Only the action matching the reported patch state is offered.
    pub fn can_patch(&self) -> bool {
        !self.patched
    }

    pub fn can_unpatch(&self) -> bool {
        self.patched
    }

    /// Drains the entries appended since the last call.
    pub fn take_log(&mut self) -> Vec<LogEntry> {
        std::mem::take(&mut self.log)
    }

    pub async fn auto_detect(&mut self) {
        self.status = Status::Detecting;
        match self.backend.detect_resources_path().await {
            Ok(Some(path)) => {
                self.log(LogLevel::Success, format!("Detected resources path: {path}"));
                self.resources_path = Some(path);
                self.refresh_status().await;
            }
            Ok(None) => {
                self.log(LogLevel::Warn, "Could not auto-detect the resources path.");
                self.status = Status::Error;
            }
            Err(e) => {
                self.log(LogLevel::Error, format!("Detect failed: {e}"));
                self.status = Status::Error;
            }
        }
    }

    pub async fn refresh_status(&mut self) {
        match self.backend.get_status(&self.request()).await {
            Ok(status) => {
                if self.resources_path.is_none() && !status.resources_path.is_empty() {
                    self.resources_path = Some(status.resources_path);
                }
                self.patched = status.patched;
                if self.patched {
                    self.status = Status::Patched;
                    self.log(LogLevel::Warn, "Already patched. Unpatch to restore the original files.");
                } else {
                    self.status = Status::Ready;
                }
            }
            Err(e) => {
                // A failed probe is not a patch failure; stay usable.
                self.log(LogLevel::Error, format!("Status check failed: {e}"));
                self.status = Status::Ready;
            }
        }
    }

    pub async fn patch(&mut self) {
        self.status = Status::Patching;
        self.log(LogLevel::Info, "Starting patch...");
        match self.backend.patch(&self.request()).await {
            Ok(message) => {
                self.log(LogLevel::Success, message);
                self.refresh_status().await;
            }
            Err(e) => {
                self.log(LogLevel::Error, format!("Patch failed: {e}"));
                self.status = Status::Error;
            }
        }
    }

    pub async fn unpatch(&mut self) {
        self.status = Status::Restoring;
        self.log(LogLevel::Info, "Starting restore...");
        match self.backend.unpatch(&self.request()).await {
            Ok(message) => {
                self.log(LogLevel::Success, message);
                self.refresh_status().await;
            }
            Err(e) => {
                self.log(LogLevel::Error, format!("Restore failed: {e}"));
                self.status = Status::Error;
            }
        }
    }

    pub async fn browse(&mut self) {
        match self.backend.browse_resources_path().await {
            Ok(Some(path)) => {
                self.log(LogLevel::Success, format!("Selected resources path: {path}"));
                self.resources_path = Some(path);
                self.refresh_status().await;
            }
            Ok(None) => {}
            Err(e) => self.log(LogLevel::Error, format!("Dialog failed: {e}")),
        }
    }

    pub async fn open_url(&mut self, url: &str) {
        if let Err(e) = self.backend.open_url(url).await {
            self.log(LogLevel::Error, format!("Could not open {url}: {e}"));
        }
    }

    pub async fn minimize(&mut self) {
        if let Err(e) = self.backend.minimize_window().await {
            self.log(LogLevel::Error, format!("Minimize failed: {e}"));
        }
    }

    pub async fn close(&mut self) {
        if let Err(e) = self.backend.close_window().await {
            self.log(LogLevel::Error, format!("Close failed: {e}"));
        }
    }

    fn request(&self) -> PatchRequest {
        PatchRequest {
            resources_path: self.resources_path.clone(),
            enable_devtools: self.enable_devtools,
        }
    }

    fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log.push(LogEntry {
            time: Local::now(),
            level,
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patcher::backend::{BackendError, PatchStatus};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeBackend {
        detect: Option<String>,
        patched: bool,
        status_error: bool,
        patch_error: Option<&'static str>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl FakeBackend {
        fn called(&self, name: &'static str) {
            self.calls.lock().unwrap().push(name);
        }
    }

    #[async_trait]
    impl Backend for FakeBackend {
        async fn detect_resources_path(&self) -> Result<Option<String>, BackendError> {
            self.called("detect");
            Ok(self.detect.clone())
        }

        async fn browse_resources_path(&self) -> Result<Option<String>, BackendError> {
            self.called("browse");
            Ok(None)
        }

        async fn get_status(&self, _request: &PatchRequest) -> Result<PatchStatus, BackendError> {
            self.called("status");
            if self.status_error {
                return Err(BackendError::ResourcesNotFound);
            }
            Ok(PatchStatus {
                resources_path: "/games/duels".to_string(),
                patched: self.patched,
                backup_exists: self.patched,
            })
        }

        async fn patch(&self, _request: &PatchRequest) -> Result<String, BackendError> {
            self.called("patch");
            match self.patch_error {
                Some(message) => Err(BackendError::OpenUrl(message.to_string())),
                None => Ok("Patched successfully. Backup: /games/duels/resources/app/main.js.bak".to_string()),
            }
        }

        async fn unpatch(&self, _request: &PatchRequest) -> Result<String, BackendError> {
            self.called("unpatch");
            Ok("Backup restored and removed. The application script has been unpatched.".to_string())
        }

        async fn minimize_window(&self) -> Result<(), BackendError> {
            Err(BackendError::WindowUnavailable)
        }

        async fn close_window(&self) -> Result<(), BackendError> {
            Ok(())
        }

        async fn open_url(&self, _url: &str) -> Result<(), BackendError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn detection_fills_the_path_and_refreshes_the_status() {
        let mut shell = Shell::new(FakeBackend {
            detect: Some("/games/duels".to_string()),
            ..FakeBackend::default()
        });

        shell.auto_detect().await;

        assert_eq!(shell.resources_path(), Some("/games/duels"));
        assert_eq!(shell.status(), Status::Ready);
        assert_eq!(shell.backend.calls.lock().unwrap().as_slice(), &["detect", "status"]);
    }

    #[tokio::test]
    async fn a_missed_detection_turns_the_status_to_error() {
        let mut shell = Shell::new(FakeBackend::default());

        shell.auto_detect().await;

        assert_eq!(shell.status(), Status::Error);
        assert_eq!(shell.status().tone(), Tone::Danger);
        assert_eq!(shell.resources_path(), None);
    }

    #[tokio::test]
    async fn a_patched_installation_offers_only_the_unpatch_action() {
        let mut shell = Shell::new(FakeBackend {
            patched: true,
            ..FakeBackend::default()
        });

        shell.refresh_status().await;

        assert_eq!(shell.status(), Status::Patched);
        assert_eq!(shell.status().tone(), Tone::Success);
        assert!(!shell.can_patch());
        assert!(shell.can_unpatch());
    }

    #[tokio::test]
    async fn a_backend_failure_lands_verbatim_in_the_log() {
        let mut shell = Shell::new(FakeBackend {
            patch_error: Some("disk full"),
            ..FakeBackend::default()
        });

        shell.patch().await;

        assert_eq!(shell.status(), Status::Error);
        let log = shell.take_log();
        assert_eq!(log.last().unwrap().message, "Patch failed: could not open url: disk full");
        assert_eq!(log.last().unwrap().level, LogLevel::Error);
    }

    #[tokio::test]
    async fn a_failed_status_probe_falls_back_to_ready() {
        let mut shell = Shell::new(FakeBackend {
            status_error: true,
            ..FakeBackend::default()
        });

        shell.refresh_status().await;

        assert_eq!(shell.status(), Status::Ready);
        assert!(shell.take_log().last().unwrap().message.starts_with("Status check failed:"));
    }

    #[tokio::test]
    async fn a_successful_patch_reports_the_new_state() {
        let mut shell = Shell::new(FakeBackend::default());

        shell.patch().await;

        let log = shell.take_log();
        assert!(log.iter().any(|entry| entry.message.starts_with("Patched successfully.")));
        assert_eq!(shell.backend.calls.lock().unwrap().as_slice(), &["patch", "status"]);
    }

    #[tokio::test]
    async fn a_cancelled_browse_changes_nothing() {
        let mut shell = Shell::new(FakeBackend::default());

        shell.browse().await;

        assert_eq!(shell.resources_path(), None);
        assert!(shell.take_log().is_empty());
        assert_eq!(shell.backend.calls.lock().unwrap().as_slice(), &["browse"]);
    }
}
