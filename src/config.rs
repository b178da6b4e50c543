use anyhow::Result;
use postboard_board::{ApiConfig, LayoutConfig};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/postboard.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoardConfig {
    pub api: ApiConfig,
    pub layout: LayoutConfig,
}

impl BoardConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        let config = match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<BoardConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    BoardConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Board config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                BoardConfig::default()
            }
        };
        config.sanitized()
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Replace values the layout math cannot use with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = LayoutConfig::default();
        if !(self.layout.canvas_resolution > 0.0) {
            warn!(
                value = self.layout.canvas_resolution,
                "canvas_resolution must be positive; using default"
            );
            self.layout.canvas_resolution = defaults.canvas_resolution;
        }
        if !(self.layout.text_scale > 0.0) {
            warn!(value = self.layout.text_scale, "text_scale must be positive; using default");
            self.layout.text_scale = defaults.text_scale;
        }
        if self.layout.canvas_size.iter().any(|v| !(*v > 0.0)) {
            warn!(size = ?self.layout.canvas_size, "canvas_size must be positive; using default");
            self.layout.canvas_size = defaults.canvas_size;
        }
        if self.api.timeout_ms == 0 {
            warn!("timeout_ms must be non-zero; using default");
            self.api.timeout_ms = ApiConfig::default().timeout_ms;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = BoardConfig::load_from_path(&dir.path().join("absent.toml"));
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("postboard.toml");
        fs::write(
            &path,
            "[api]\nsection = \"lobby\"\n\n[layout]\ntext_scale = 0.2\n",
        )
        .expect("write config");

        let config = BoardConfig::load_from_path(&path);
        assert_eq!(config.api.section, "lobby");
        assert_eq!(config.api.base_url, ApiConfig::default().base_url);
        assert_eq!(config.layout.text_scale, 0.2);
        assert_eq!(config.layout.canvas_resolution, 1000.0);
    }

    #[test]
    fn unparsable_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("postboard.toml");
        fs::write(&path, "[api\nsection = ").expect("write config");
        assert_eq!(BoardConfig::load_from_path(&path), BoardConfig::default());
    }

    #[test]
    fn unusable_layout_values_are_reset() {
        let mut config = BoardConfig::default();
        config.layout.canvas_resolution = 0.0;
        config.layout.text_scale = -1.0;
        config.layout.canvas_size = [1500.0, f32::NAN];
        config.api.timeout_ms = 0;

        let config = config.sanitized();
        assert_eq!(config, BoardConfig::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("postboard.toml");
        let mut config = BoardConfig::default();
        config.api.base_url = "http://board.test/api".into();
        config.layout.default_color = "#123456".into();

        config.save_to_path(&path).expect("save config");
        assert_eq!(BoardConfig::load_from_path(&path), config);
    }
}
