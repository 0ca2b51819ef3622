//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.scilife/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::content::StudentLevel;
use crate::content::gemini;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ScilifeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_level: Option<StudentLevel>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub text_model: Option<String>,
    pub image_model: Option<String>,
    pub video_model: Option<String>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub level: StudentLevel,
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub video_model: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.scilife/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".scilife").join("config.toml"))
}

/// Load config from `~/.scilife/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ScilifeConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ScilifeConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ScilifeConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ScilifeConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: ScilifeConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# SciLife Museum Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_level = "middle"            # "primary", "middle", "high", "university"

# [gemini]
# api_key = "AIza..."                 # Or set GEMINI_API_KEY env var
# base_url = "https://generativelanguage.googleapis.com"
# text_model = "gemini-2.5-flash"
# image_model = "gemini-2.5-flash-image"
# video_model = "veo-3.1-fast-generate-preview"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_level` comes from the `--level` flag (None = not specified).
pub fn resolve(config: &ScilifeConfig, cli_level: Option<StudentLevel>) -> ResolvedConfig {
    // Level: CLI → config → default
    let level = cli_level
        .or(config.general.default_level)
        .unwrap_or_default();

    // API key: env → config
    let api_key = std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| config.gemini.api_key.clone());

    // Base URL: env → config → default
    let base_url = std::env::var("GEMINI_BASE_URL")
        .ok()
        .or_else(|| config.gemini.base_url.clone())
        .unwrap_or_else(|| gemini::DEFAULT_BASE_URL.to_string());

    ResolvedConfig {
        level,
        api_key,
        base_url,
        text_model: config
            .gemini
            .text_model
            .clone()
            .unwrap_or_else(|| gemini::DEFAULT_TEXT_MODEL.to_string()),
        image_model: config
            .gemini
            .image_model
            .clone()
            .unwrap_or_else(|| gemini::DEFAULT_IMAGE_MODEL.to_string()),
        video_model: config
            .gemini
            .video_model
            .clone()
            .unwrap_or_else(|| gemini::DEFAULT_VIDEO_MODEL.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = ScilifeConfig::default();
        assert!(config.general.default_level.is_none());
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = ScilifeConfig::default();
        let resolved = resolve(&config, None);
        assert_eq!(resolved.level, StudentLevel::Middle);
        assert_eq!(resolved.text_model, gemini::DEFAULT_TEXT_MODEL);
        assert_eq!(resolved.image_model, gemini::DEFAULT_IMAGE_MODEL);
        assert_eq!(resolved.video_model, gemini::DEFAULT_VIDEO_MODEL);
        assert_eq!(resolved.base_url, gemini::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = ScilifeConfig {
            general: GeneralConfig {
                default_level: Some(StudentLevel::University),
            },
            gemini: GeminiConfig {
                api_key: Some("AIza-test".to_string()),
                base_url: Some("http://localhost:9000".to_string()),
                text_model: Some("my-text-model".to_string()),
                image_model: None,
                video_model: None,
            },
        };
        let resolved = resolve(&config, None);
        assert_eq!(resolved.level, StudentLevel::University);
        assert_eq!(resolved.base_url, "http://localhost:9000");
        assert_eq!(resolved.text_model, "my-text-model");
        assert_eq!(resolved.image_model, gemini::DEFAULT_IMAGE_MODEL);
    }

    #[test]
    fn test_resolve_cli_level_wins() {
        let config = ScilifeConfig {
            general: GeneralConfig {
                default_level: Some(StudentLevel::Primary),
            },
            ..Default::default()
        };
        let resolved = resolve(&config, Some(StudentLevel::High));
        assert_eq!(resolved.level, StudentLevel::High);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
default_level = "high"

[gemini]
api_key = "AIza-test-123"
base_url = "http://192.168.1.100:9000"
text_model = "gemini-2.5-flash"
"#;
        let config: ScilifeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.default_level, Some(StudentLevel::High));
        assert_eq!(config.gemini.api_key.as_deref(), Some("AIza-test-123"));
        assert_eq!(
            config.gemini.base_url.as_deref(),
            Some("http://192.168.1.100:9000")
        );
        assert!(config.gemini.video_model.is_none());
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing — everything else stays default
        let toml_str = r#"
[gemini]
text_model = "my-model"
"#;
        let config: ScilifeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gemini.text_model.as_deref(), Some("my-model"));
        assert!(config.gemini.api_key.is_none());
        assert!(config.general.default_level.is_none());
    }
}
