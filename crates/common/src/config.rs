//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the base image catalog.
    pub assets_dir: PathBuf,

    /// Directory where committed memes are saved.
    pub output_dir: PathBuf,

    /// Composition pipeline parameters.
    #[serde(default)]
    pub composition: CompositionDefaults,

    /// Shared feed topics.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default composition parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionDefaults {
    /// Longest edge of the bounded raster, in pixels.
    pub max_edge: u32,

    /// Integer scale applied to the 8x8 caption glyphs.
    pub glyph_scale: u32,

    /// Baseline of the top caption, measured from the top edge.
    pub top_baseline_px: u32,

    /// Baseline of the bottom caption, measured from the bottom edge.
    pub bottom_margin_px: u32,

    /// Thickness of the dark outline drawn behind captions.
    pub outline_px: u32,
}

/// Feed topic names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Topic carrying chat messages and published memes.
    pub messages_topic: String,

    /// Topic carrying reactions.
    pub reactions_topic: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "makeitmeme=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_dir: data_dir().join("assets"),
            output_dir: pictures_dir(),
            composition: CompositionDefaults::default(),
            feed: FeedConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CompositionDefaults {
    fn default() -> Self {
        Self {
            max_edge: 1024,
            glyph_scale: 8,
            top_baseline_px: 100,
            bottom_margin_px: 50,
            outline_px: 4,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            messages_topic: "messages".to_string(),
            reactions_topic: "reactions".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Where [`AppConfig::load`] looks for the config file.
    pub fn path() -> PathBuf {
        config_file_path()
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("makeitmeme").join("config.json")
}

fn data_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("share"))
        .join("makeitmeme")
}

/// Default output directory for saved memes.
fn pictures_dir() -> PathBuf {
    std::env::var("XDG_PICTURES_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join("Pictures"))
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_defaults() {
        let defaults = CompositionDefaults::default();
        assert_eq!(defaults.max_edge, 1024);
        assert_eq!(defaults.glyph_scale * 8, 64);
    }

    #[test]
    fn test_partial_config_fills_sections_with_defaults() {
        let raw = r#"{ "assets_dir": "/srv/memes", "output_dir": "/tmp/out" }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.assets_dir, PathBuf::from("/srv/memes"));
        assert_eq!(config.feed.messages_topic, "messages");
        assert_eq!(config.composition, CompositionDefaults::default());
        assert_eq!(config.logging.level, "info");
    }
}
