//! Tool configuration
//!
//! Service endpoints, request limits, and canvas dimensions stored in
//! TOML format. Defaults mirror the hosted gateway setup; everything is
//! overridable from the config file and the command line.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tool settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Service endpoints
    pub endpoints: EndpointConfig,
    /// Request limits
    pub limits: Limits,
    /// Canvas settings
    pub render: RenderConfig,
}

/// External collaborator endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Text recognition service URL
    pub recognition: String,
    /// Translation service URL
    pub translation: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            recognition: "https://cloudjourneygateway.azure-api.net/api/ReadText".to_string(),
            translation: "https://cloudjourneygateway.azure-api.net/api/Translate".to_string(),
        }
    }
}

/// Fixed bounds on candidates and service calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Maximum candidate and request/response body size in bytes
    pub max_body_bytes: u64,
    /// Upper bound on any single network call, in seconds
    pub request_timeout_secs: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_body_bytes: crate::validate::MAX_FILE_SIZE,
            request_timeout_secs: 30,
        }
    }
}

/// Canvas settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Canvas width in pixels
    pub canvas_width: u32,
    /// Canvas height in pixels
    pub canvas_height: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            canvas_width: 900,
            canvas_height: 900,
        }
    }
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "cashea", "lingolens")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.endpoints.recognition.contains("ReadText"));
        assert!(config.endpoints.translation.contains("Translate"));
        assert_eq!(config.limits.max_body_bytes, 5 * 1024 * 1024);
        assert_eq!(config.limits.request_timeout_secs, 30);
        assert_eq!(config.render.canvas_width, 900);
        assert_eq!(config.render.canvas_height, 900);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.endpoints.recognition, parsed.endpoints.recognition);
        assert_eq!(config.limits.max_body_bytes, parsed.limits.max_body_bytes);
        assert_eq!(config.render.canvas_width, parsed.render.canvas_width);
    }

    #[test]
    fn test_save_and_load_config() {
        let mut config = Config::default();
        config.endpoints.recognition = "https://ocr.example.com/read".to_string();
        config.render.canvas_height = 600;

        let temp_file = NamedTempFile::new().unwrap();
        save_config(&config, temp_file.path()).unwrap();

        let loaded = load_config(temp_file.path()).unwrap();
        assert_eq!(loaded.endpoints.recognition, "https://ocr.example.com/read");
        assert_eq!(loaded.render.canvas_height, 600);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
