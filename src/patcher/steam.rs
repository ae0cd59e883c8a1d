use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Steam library roots listed in the root's `steamapps/libraryfolders.vdf`.
pub async fn libraries(steam_root: &Path) -> Vec<PathBuf> {
    let manifest = steam_root.join("steamapps").join("libraryfolders.vdf");
    match fs::read_to_string(&manifest).await {
        Ok(raw) => parse_library_folders(&raw),
        Err(e) => {
            debug!("No library manifest at {}: {}", manifest.display(), e);
            Vec::new()
        }
    }
}

/// Extracts every `"path"` entry from the manifest. The VDF format is not
/// fully parsed; Steam writes one `"path"` line per library block.
pub fn parse_library_folders(raw: &str) -> Vec<PathBuf> {
    raw.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            if !trimmed.starts_with("\"path\"") {
                return None;
            }
            let value = trimmed.split('"').nth(3)?;
            Some(PathBuf::from(value.replace("\\\\", "\\")))
        })
        .collect()
}

/// Conventional per-user Steam root.
pub fn default_steam_root() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".steam").join("steam"))
}
