use crate::sys::haptics::ShellCommand;
use crate::sys::icon::IconName;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use smartmenu::ItemId;
use std::collections::HashMap;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

/// Which layer-shell layer the kiosk surface lives on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, DeserializeFromStr, EnumString, StrumDisplay,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SurfaceLayer {
    Background,
    Bottom,
    #[default]
    Top,
    Overlay,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KioskConfig {
    /// Use a wlr layer-shell surface covering the whole output.
    pub layer_shell: bool,
    pub layer: SurfaceLayer,
    /// Fallback when layer shell is unavailable or disabled.
    pub fullscreen: bool,
    pub show_hint: bool,
    pub hint: String,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            layer_shell: true,
            layer: SurfaceLayer::Top,
            fullscreen: true,
            show_hint: true,
            hint: "TAP TO INTERACT \u{2022} HOLD 1.5S FOR MENU".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HapticsConfig {
    pub enabled: bool,
    /// Run with `sh -c`; the pulse length is in `SMART_TABLE_PULSE_MS`.
    pub command: Option<ShellCommand>,
}

impl Default for HapticsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemConfig {
    pub id: ItemId,
    pub label: Option<String>,
    pub icon: Option<IconName>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub kiosk: KioskConfig,
    #[serde(default)]
    pub haptics: HapticsConfig,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

impl Config {
    /// Per-item overrides; later entries win.
    pub fn item_overrides(&self) -> HashMap<ItemId, &ItemConfig> {
        self.items.iter().map(|item| (item.id, item)).collect()
    }

    pub fn label_for(&self, id: ItemId) -> String {
        self.items
            .iter()
            .rev()
            .find(|item| item.id == id)
            .and_then(|item| item.label.clone())
            .unwrap_or_else(|| smartmenu::catalog::item(id).label.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "smarttable", "smart-table")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("SMART_TABLE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads the user config, falling back to the built-in defaults.
pub fn load_or_default() -> Config {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use crate::events::AppEvent;
use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let Some(config_dir) = config_path.parent().map(|p| p.to_path_buf()) else {
        return;
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }
    log::debug!("Watching {} for changes", config_dir.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let touches_config = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) && event.paths.iter().any(|p| p == &config_path);

                if touches_config && tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
