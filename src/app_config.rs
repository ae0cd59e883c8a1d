use config::Config;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    core: Core,
    observer: Observer,
    ui: Ui,
    settings: SettingsLocation,
    patcher: Patcher,
}

impl AppConfig {
    pub fn load() -> Self {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn ui(&self) -> &Ui {
        &self.ui
    }

    pub fn settings(&self) -> &SettingsLocation {
        &self.settings
    }

    pub fn patcher(&self) -> &Patcher {
        &self.patcher
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    store_buffer_size: usize,
}

impl Core {
    pub fn store_buffer_size(&self) -> usize {
        self.store_buffer_size
    }
}

#[derive(Debug, Deserialize)]
pub struct Observer {
    endpoint_fragments: Vec<String>,
}

impl Observer {
    pub fn endpoint_fragments(&self) -> &[String] {
        &self.endpoint_fragments
    }
}

#[derive(Debug, Deserialize)]
pub struct Ui {
    #[serde(with = "humantime_serde")]
    debounce: Duration,
}

impl Ui {
    pub fn debounce(&self) -> Duration {
        self.debounce
    }
}

#[derive(Debug, Deserialize)]
pub struct SettingsLocation {
    file: String,
}

impl SettingsLocation {
    pub fn file(&self) -> &str {
        &self.file
    }
}

#[derive(Debug, Deserialize)]
pub struct Patcher {
    script_url: String,
    game_directory: String,
    resources_path: Option<String>,
    steam_root: Option<String>,
    download_timeout_ms: u64,
}

impl Patcher {
    pub fn script_url(&self) -> &str {
        &self.script_url
    }

    pub fn game_directory(&self) -> &str {
        &self.game_directory
    }

    pub fn resources_path(&self) -> Option<&str> {
        self.resources_path.as_deref()
    }

    pub fn steam_root(&self) -> Option<&str> {
        self.steam_root.as_deref()
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_millis(self.download_timeout_ms)
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core { store_buffer_size: 8 },
                observer: Observer {
                    endpoint_fragments: vec!["GetMetadata".to_string(), "SingleImageSearch".to_string()],
                },
                ui: Ui {
                    debounce: Duration::from_millis(10),
                },
                settings: SettingsLocation {
                    file: "waymark_settings.json".to_string(),
                },
                patcher: Patcher {
                    script_url: "https://scripts.url/overlay.user.js".to_string(),
                    game_directory: "GeoGuessr Duels".to_string(),
                    resources_path: None,
                    steam_root: None,
                    download_timeout_ms: 1_000,
                },
            },
        }
    }

    pub fn settings_file(mut self, file: String) -> Self {
        self.config.settings.file = file;
        self
    }

    pub fn script_url(mut self, url: String) -> Self {
        self.config.patcher.script_url = url;
        self
    }

    pub fn patcher_resources_path(mut self, path: String) -> Self {
        self.config.patcher.resources_path = Some(path);
        self
    }

    pub fn steam_root(mut self, path: String) -> Self {
        self.config.patcher.steam_root = Some(path);
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
