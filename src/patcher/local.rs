use crate::app_config::Patcher;
use crate::patcher::backend::{Backend, BackendError, PatchRequest, PatchStatus};
use crate::patcher::steam;
use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

const ENTRY_SCRIPT: &str = "main.js";
const BACKUP_SCRIPT: &str = "main.js.bak";
const OVERLAY_SCRIPT: &str = "overlay.user.js";

const REQUIRE_ANCHOR: &str = "const { app, BrowserWindow, shell, session } = require(\"electron\");";
const BASE_URL_ANCHOR: &str = "const baseUrl = environments[environment];";
const LOAD_ANCHOR: &str = "  mainWindow.loadFile(\"index.html\");";

/// Drives a local, unpacked game installation: the resources directory holds
/// an `app/` folder whose entry script boots the embedded browser shell.
pub struct LocalBackend {
    script_url: String,
    game_directory: String,
    default_resources_path: Option<PathBuf>,
    steam_root: Option<PathBuf>,
    client: Client,
}

impl LocalBackend {
    pub fn new(config: &Patcher) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(config.download_timeout()).build()?;

        Ok(LocalBackend {
            script_url: config.script_url().to_string(),
            game_directory: config.game_directory().to_string(),
            default_resources_path: config.resources_path().map(PathBuf::from),
            steam_root: config.steam_root().map(PathBuf::from),
            client,
        })
    }

    /// Accepts either the resources directory itself or the game root above
    /// it, then falls back to the configured default and the Steam libraries.
    async fn resources_dir(&self, input: Option<&str>) -> Result<PathBuf, BackendError> {
        if let Some(path) = input {
            let candidate = PathBuf::from(path);
            if is_resources_dir(&candidate).await {
                return Ok(candidate);
            }
            let nested = candidate.join("resources");
            if is_resources_dir(&nested).await {
                return Ok(nested);
            }
        }

        for candidate in self.candidates().await {
            if is_resources_dir(&candidate).await {
                return Ok(candidate);
            }
        }

        Err(BackendError::ResourcesNotFound)
    }

    async fn candidates(&self) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(path) = &self.default_resources_path {
            candidates.push(path.clone());
        }

        if let Some(root) = self.steam_root.clone().or_else(steam::default_steam_root) {
            for library in steam::libraries(&root).await {
                candidates.push(
                    library
                        .join("steamapps")
                        .join("common")
                        .join(&self.game_directory)
                        .join("resources"),
                );
            }
        }

        candidates
    }

    async fn fetch_overlay_script(&self) -> Result<String, BackendError> {
        let response = self.client.get(&self.script_url).send().await?;
        if !response.status().is_success() {
            return Err(BackendError::DownloadStatus(response.status()));
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl Backend for LocalBackend {
    #[instrument(skip(self))]
    async fn detect_resources_path(&self) -> Result<Option<String>, BackendError> {
        match self.resources_dir(None).await {
            Ok(resources) => Ok(Some(game_root(&resources).to_string_lossy().into_owned())),
            Err(BackendError::ResourcesNotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn browse_resources_path(&self) -> Result<Option<String>, BackendError> {
        let picked = rfd::AsyncFileDialog::new()
            .set_title("Select the game folder")
            .pick_folder()
            .await;
        Ok(picked.map(|folder| folder.path().to_string_lossy().into_owned()))
    }

    #[instrument(skip_all)]
    async fn get_status(&self, request: &PatchRequest) -> Result<PatchStatus, BackendError> {
        let resources = self.resources_dir(request.resources_path.as_deref()).await?;
        let app_dir = resources.join("app");
        let entry = app_dir.join(ENTRY_SCRIPT);
        if !fs::try_exists(&entry).await? {
            return Err(BackendError::MissingEntryScript(entry));
        }

        Ok(PatchStatus {
            resources_path: game_root(&resources).to_string_lossy().into_owned(),
            patched: fs::try_exists(app_dir.join(OVERLAY_SCRIPT)).await?,
            backup_exists: fs::try_exists(app_dir.join(BACKUP_SCRIPT)).await?,
        })
    }

    #[instrument(skip_all)]
    async fn patch(&self, request: &PatchRequest) -> Result<String, BackendError> {
        let resources = self.resources_dir(request.resources_path.as_deref()).await?;
        let app_dir = resources.join("app");
        let entry = app_dir.join(ENTRY_SCRIPT);
        let backup = app_dir.join(BACKUP_SCRIPT);

        if !fs::try_exists(&entry).await? {
            return Err(BackendError::MissingEntryScript(entry));
        }

        // The backup is created once and kept until unpatch.
        if !fs::try_exists(&backup).await? {
            fs::copy(&entry, &backup).await?;
        }

        info!("Downloading overlay script from {}...", self.script_url);
        let script = self.fetch_overlay_script().await?;
        info!("Downloading overlay script from {}... OK", self.script_url);
        fs::write(app_dir.join(OVERLAY_SCRIPT), script).await?;

        let source = fs::read_to_string(&entry).await?;
        let patched = inject_loader(&source, request.enable_devtools)?;
        if patched != source {
            fs::write(&entry, patched).await?;
        }

        Ok(format!("Patched successfully. Backup: {}", backup.display()))
    }

    #[instrument(skip_all)]
    async fn unpatch(&self, request: &PatchRequest) -> Result<String, BackendError> {
        let resources = self.resources_dir(request.resources_path.as_deref()).await?;
        let app_dir = resources.join("app");
        let entry = app_dir.join(ENTRY_SCRIPT);
        let backup = app_dir.join(BACKUP_SCRIPT);
        let overlay = app_dir.join(OVERLAY_SCRIPT);

        if !fs::try_exists(&backup).await? {
            return Err(BackendError::MissingBackup);
        }

        fs::copy(&backup, &entry).await?;
        fs::remove_file(&backup).await?;
        if fs::try_exists(&overlay).await? {
            fs::remove_file(&overlay).await?;
        }

        Ok("Backup restored and removed. The application script has been unpatched.".to_string())
    }

    async fn minimize_window(&self) -> Result<(), BackendError> {
        Err(BackendError::WindowUnavailable)
    }

    async fn close_window(&self) -> Result<(), BackendError> {
        // The front-end owns the process; closing is its shutdown signal.
        Ok(())
    }

    async fn open_url(&self, url: &str) -> Result<(), BackendError> {
        open::that(url).map_err(|e| BackendError::OpenUrl(e.to_string()))
    }
}

fn game_root(resources: &Path) -> PathBuf {
    resources.parent().map(Path::to_path_buf).unwrap_or_else(|| resources.to_path_buf())
}

async fn is_resources_dir(path: &Path) -> bool {
    fs::try_exists(path.join("app").join(ENTRY_SCRIPT)).await.unwrap_or(false)
}

/// Rewrites the application entry script so it loads the overlay script into
/// the embedded game frame. Anchor-based and idempotent: an already-patched
/// script is left alone, an unrecognized one is refused.
fn inject_loader(source: &str, enable_devtools: bool) -> Result<String, BackendError> {
    let mut updated = source.to_string();

    if !updated.contains(OVERLAY_SCRIPT) {
        if !updated.contains(REQUIRE_ANCHOR) || !updated.contains(BASE_URL_ANCHOR) || !updated.contains(LOAD_ANCHOR) {
            return Err(BackendError::UnrecognizedEntryScript);
        }

        let requires = format!(
            "{REQUIRE_ANCHOR}\nconst fs = require(\"fs\");\nconst path = require(\"path\");"
        );
        updated = updated.replace(REQUIRE_ANCHOR, &requires);

        let loader = format!(
            r#"{BASE_URL_ANCHOR}

const buildOverlayInject = (raw) => {{
  const prefix = `(() => {{
  if (window.__overlayInjected) return;
  window.__overlayInjected = true;
`;
  const suffix = `\n}})();`;
  return `${{prefix}}\n${{raw}}\n${{suffix}}`;
}};

const overlayScriptPath = path.join(__dirname, "{OVERLAY_SCRIPT}");
let overlayInject = "";
try {{
  overlayInject = buildOverlayInject(fs.readFileSync(overlayScriptPath, "utf8"));
}} catch (error) {{
  log.error("Failed to load overlay script:", error);
}}"#
        );
        updated = updated.replace(BASE_URL_ANCHOR, &loader);

        let hook = format!(
            r#"{LOAD_ANCHOR}

  mainWindow.webContents.on(
    "did-frame-finish-load",
    (event, isMainFrame, frameProcessId, frameRoutingId) => {{
      if (isMainFrame || !overlayInject) {{
        return;
      }}
      const mainFrame = mainWindow.webContents.mainFrame;
      if (!mainFrame || !mainFrame.frames) {{
        return;
      }}
      const frame = mainFrame.frames.find(
        (child) =>
          child.processId === frameProcessId &&
          child.routingId === frameRoutingId,
      );
      if (!frame || !frame.url.startsWith(baseUrl)) {{
        return;
      }}
      frame.executeJavaScript(overlayInject).catch((error) => {{
        log.error("Failed to inject overlay script:", error);
      }});
    }},
  );"#
        );
        updated = updated.replace(LOAD_ANCHOR, &hook);
    }

    if enable_devtools {
        if updated.contains("devTools: !isProd,") {
            updated = updated.replace("devTools: !isProd,", "devTools: true,");
        }

        if !updated.contains("openDevTools") && updated.contains(LOAD_ANCHOR) {
            updated = updated.replace(
                LOAD_ANCHOR,
                &format!("{LOAD_ANCHOR}\n\n  mainWindow.webContents.openDevTools({{ mode: \"detach\" }});"),
            );
        }
    }

    Ok(updated)
}
