use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "uxpilot.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Can't parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub paths: PathsConfig,
    pub options: Options,
}

/// Where generated HTML and JSON files land, relative to the working directory.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub html: String,
    pub json: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html: "output/htmls".to_string(),
            json: "output/json".to_string(),
        }
    }
}

/// Locations of the sibling repositories the tool needs to reach.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the computeHtmlStyles module (htmlToJsonUtils-dev.js).
    pub compute_html_styles: String,
    /// Figma plugin repository, target of the preview-html.json mirror.
    pub figma_plugin: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            compute_html_styles: "../".to_string(),
            figma_plugin: "../uxpilot-figma-plugin".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Options {
    pub device_type: DeviceType,
    /// Mirror the computed JSON into the Figma plugin repository after a fetch.
    pub auto_write_to_plugin: bool,
    pub headless_browser: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            device_type: DeviceType::Desktop,
            auto_write_to_plugin: true,
            headless_browser: true,
        }
    }
}

/// Viewport the style computation targets.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Mobile => "mobile",
        }
    }
}

impl Config {
    /// Loads the config from `path`; a missing file falls back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.output.html, "output/htmls");
        assert_eq!(config.output.json, "output/json");
        assert_eq!(config.paths.compute_html_styles, "../");
        assert_eq!(config.paths.figma_plugin, "../uxpilot-figma-plugin");
        assert_eq!(config.options.device_type, DeviceType::Desktop);
        assert!(config.options.auto_write_to_plugin);
        assert!(config.options.headless_browser);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let raw = r#"
            [output]
            html = "out/h"

            [options]
            device_type = "mobile"
            auto_write_to_plugin = false
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.output.html, "out/h");
        assert_eq!(config.output.json, "output/json");
        assert_eq!(config.options.device_type, DeviceType::Mobile);
        assert!(!config.options.auto_write_to_plugin);
        assert!(config.options.headless_browser);
    }

    #[test]
    fn unknown_device_type_is_rejected() {
        let raw = r#"
            [options]
            device_type = "tablet"
        "#;
        assert!(toml::from_str::<Config>(raw).is_err());
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("uxpilot.toml")).unwrap();
        assert_eq!(config.output.html, "output/htmls");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uxpilot.toml");
        std::fs::write(&path, "output = 3").unwrap();
        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::ParseError(_))
        ));
    }
}
