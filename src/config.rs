//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/notefield/config.yaml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::expansion::{load_shortcut_file, ShortcutTable};
use crate::tracking::{ChangeTrackingConfig, TrackingStyle};

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Advisory font size in pixels; only affects overlay placement
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default)]
    pub change_tracking: ChangeTrackingSettings,
    /// Shortcut list (YAML); the built-in list is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autotexts: Option<PathBuf>,
    /// Extra keymap layered over the defaults
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keymap: Option<PathBuf>,
}

/// Change tracking preference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeTrackingSettings {
    pub enabled: bool,
    pub style: TrackingStyle,
}

impl ChangeTrackingSettings {
    /// The tracking config handed to an editor, None when switched off
    pub fn to_config(&self) -> Option<ChangeTrackingConfig> {
        self.enabled
            .then(|| ChangeTrackingConfig::from_style(self.style.clone()))
    }
}

fn default_font_size() -> f32 {
    14.0
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            change_tracking: ChangeTrackingSettings::default(),
            autotexts: None,
            keymap: None,
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults on any failure
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Shortcut table named by the config, then the user's autotexts.yaml,
    /// then the built-in list
    pub fn shortcut_table(&self) -> ShortcutTable {
        let path = self
            .autotexts
            .clone()
            .or_else(|| crate::config_paths::autotexts_file().filter(|p| p.exists()));

        let Some(path) = path else {
            return ShortcutTable::with_defaults();
        };

        match load_shortcut_file(&path) {
            Ok(table) => {
                tracing::info!(
                    "Loaded {} shortcuts from {}",
                    table.len(),
                    path.display()
                );
                table
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load shortcuts from {}: {}, using built-in list",
                    path.display(),
                    e
                );
                ShortcutTable::with_defaults()
            }
        }
    }

    /// Toggle change tracking and save
    pub fn set_change_tracking(&mut self, enabled: bool) -> Result<(), String> {
        self.change_tracking.enabled = enabled;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config: EditorConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert!(config.change_tracking.to_config().is_none());
    }

    #[test]
    fn test_partial_tracking_style() {
        let yaml = "font_size: 18\nchange_tracking:\n  enabled: true\n  style:\n    italic: true\n";
        let config: EditorConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.font_size, 18.0);
        assert!(config.change_tracking.style.italic);
        assert_eq!(
            config.change_tracking.style.text_color,
            TrackingStyle::default().text_color
        );

        let tracking = config.change_tracking.to_config().unwrap();
        assert!(tracking.enabled);
        assert!(tracking.wrap("x").contains("font-style: italic"));
    }
}
