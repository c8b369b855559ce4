// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings come from a YAML or JSON file named on the command line or in
//! `MOODJAR_CONFIG`. Every field has a default, so a partial file (or none
//! at all) is fine. The API key from `MOODJAR_API_KEY` is applied when the
//! backend connects and never stored here.

use crate::cli::Cli;
use crate::drawing::jar::BrushSettings;
use crate::io::serialization;
use crate::storage::DEFAULT_URL_EXPIRY_SECS;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "MOODJAR_CONFIG";

/// Environment variable holding the remote API key when the file leaves it out.
pub const API_KEY_ENV: &str = "MOODJAR_API_KEY";

/// Where drawings and entries are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    Local {
        root: PathBuf,
    },
    Remote {
        base_url: String,
        #[serde(default)]
        api_key: String,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Local {
            root: PathBuf::from("moodjar-data"),
        }
    }
}

/// Complete application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window_size: [f32; 2],
    pub canvas_size: [u32; 2],
    pub brush: BrushSettings,
    pub owner_id: String,
    pub storage: StorageConfig,
    pub bucket: String,
    pub url_expiry_secs: u64,
    pub url_refresh_margin_secs: u64,
    pub placeholder_image: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: [900.0, 760.0],
            canvas_size: [480, 560],
            brush: BrushSettings::default(),
            owner_id: "guest".to_string(),
            storage: StorageConfig::default(),
            bucket: "activities".to_string(),
            url_expiry_secs: DEFAULT_URL_EXPIRY_SECS,
            url_refresh_margin_secs: 60,
            placeholder_image: "assets/jar-placeholder.png".to_string(),
        }
    }
}

impl AppConfig {
    /// Load settings from `path`; a missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let config = serialization::import(path)?;
            log::info!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            log::warn!("Config file {} not found, using defaults", path.display());
            Ok(AppConfig::default())
        }
    }

    /// Settings for the parsed command line.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        match &cli.config {
            Some(path) => Self::load(path),
            None => Ok(AppConfig::default()),
        }
    }

    /// Write these settings out, format chosen by extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        serialization::export(self, path)
    }

    /// Canvas size, with zero dimensions bumped to one pixel.
    pub fn canvas_dimensions(&self) -> (u32, u32) {
        (self.canvas_size[0].max(1), self.canvas_size[1].max(1))
    }

    /// How long before expiry a signed URL is replaced.
    pub fn refresh_margin(&self) -> chrono::Duration {
        i64::try_from(self.url_refresh_margin_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::zero())
    }
}
