//! Application settings stored as JSON in the platform config directory
//!
//! Every field has a default, so a partial or older file still loads.
//! Command line flags override the storage and export directories.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::{board, export};
use crate::export::{ExportOptions, default_export_dir};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory holding the persisted store; platform data dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    /// Where exported boards are written; downloads dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    #[serde(default = "default_board_width")]
    pub board_width: u32,
    #[serde(default = "default_board_height")]
    pub board_height: u32,
    #[serde(default = "default_font_family")]
    pub text_font_family: String,
    #[serde(default = "default_window_width")]
    pub window_width: u16,
    #[serde(default = "default_window_height")]
    pub window_height: u16,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_board_width() -> u32 {
    board::SURFACE_WIDTH
}

fn default_board_height() -> u32 {
    board::SURFACE_HEIGHT
}

fn default_font_family() -> String {
    export::DEFAULT_FONT_FAMILY.to_string()
}

fn default_window_width() -> u16 {
    1100
}

fn default_window_height() -> u16 {
    760
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            storage_dir: None,
            export_dir: None,
            board_width: default_board_width(),
            board_height: default_board_height(),
            text_font_family: default_font_family(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl AppConfig {
    pub fn path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(crate::constants::config::APP_DIR);
        path.push(crate::constants::config::FILENAME);
        path
    }

    /// Load from the default location, writing defaults when the file is missing
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Never fails: an unreadable, unwritable or invalid file yields defaults
    pub fn load_from(config_path: &Path) -> Self {
        if !config_path.exists() {
            info!(path = %config_path.display(), "Config file not found, creating default config");
            let config = AppConfig::default();
            if let Err(e) = config.save_to(config_path) {
                warn!(path = %config_path.display(), error = ?e, "Could not write default config");
            }
            return config;
        }

        let contents = match fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {:?}", config_path))
        {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = ?e, "Unreadable config file, using defaults");
                return AppConfig::default();
            }
        };

        match serde_json::from_str::<AppConfig>(&contents) {
            Ok(config) => {
                info!(path = %config_path.display(), "Loaded config");
                config
            }
            Err(e) => {
                // Keep the broken file for the user to fix, run on defaults
                warn!(path = %config_path.display(), error = %e, "Invalid config file, using defaults");
                AppConfig::default()
            }
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        fs::write(config_path, json)
            .with_context(|| format!("Failed to write config to {:?}", config_path))?;

        info!(path = %config_path.display(), "Saved config");
        Ok(())
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            width: self.board_width,
            height: self.board_height,
            dir: self.export_dir.clone().unwrap_or_else(default_export_dir),
            font_family: self.text_font_family.clone(),
        }
    }
}
