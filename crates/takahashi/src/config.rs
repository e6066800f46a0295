use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::parser::Metadata;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "takahashi";

pub const THEMES: &[&str] = &["dark", "light"];
pub const FONTS: &[&str] = &["sans-serif", "serif", "monospace"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animations: Option<bool>,
}

/// The settings a presentation actually runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub theme: String,
    pub font: String,
    pub animations: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            font: "sans-serif".to_string(),
            animations: false,
        }
    }
}

impl Settings {
    /// Stored defaults first, then the deck's own `theme`/`font` metadata.
    pub fn resolve(config: &Config, metadata: &Metadata) -> Self {
        Self::from_config(config).with_metadata(metadata)
    }

    /// Built-in defaults overlaid with the stored config only.
    pub fn from_config(config: &Config) -> Self {
        let mut settings = Self::default();
        if let Some(defaults) = &config.defaults {
            if let Some(theme) = &defaults.theme {
                settings.theme = theme.clone();
            }
            if let Some(font) = &defaults.font {
                settings.font = font.clone();
            }
            if let Some(animations) = defaults.animations {
                settings.animations = animations;
            }
        }
        settings
    }

    pub fn with_metadata(mut self, metadata: &Metadata) -> Self {
        if let Some(theme) = metadata.get("theme").filter(|t| !t.is_empty()) {
            self.theme = theme.clone();
        }
        if let Some(font) = metadata.get("font").filter(|f| !f.is_empty()) {
            self.font = font.clone();
        }
        self
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `takahashi config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            log::debug!("Using default settings: {e}");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# Takahashi configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                if !THEMES.contains(&value) {
                    anyhow::bail!("Invalid theme: {value}. Must be 'dark' or 'light'.");
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.font" => {
                if !FONTS.contains(&value) {
                    anyhow::bail!(
                        "Invalid font: {value}. Must be 'sans-serif', 'serif', or 'monospace'."
                    );
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .font = Some(value.to_string());
            }
            "defaults.animations" => {
                let enabled = match value {
                    "true" | "on" | "yes" => true,
                    "false" | "off" | "no" => false,
                    _ => anyhow::bail!("Invalid animations value: {value}. Must be 'true' or 'false'."),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .animations = Some(enabled);
            }
            _ => anyhow::bail!(
                "Unknown config key: {key}. Valid keys: defaults.theme, defaults.font, defaults.animations"
            ),
        }
        Ok(())
    }
}
