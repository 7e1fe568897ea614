//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::client::{ClientConfig, DEFAULT_BASE_URL};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: None,
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.base_url);
        config.user_agent = self.user_agent.clone();
        config
    }
}

/// Client-side storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("studymind").to_string_lossy().to_string())
        .unwrap_or_else(|| "./studymind_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// `data_dir` with a leading `~/` expanded to the home directory
    pub fn data_dir(&self) -> PathBuf {
        match (self.data_dir.strip_prefix("~/"), dirs::home_dir()) {
            (Some(rest), Some(home)) => home.join(rest),
            _ => PathBuf::from(&self.data_dir),
        }
    }

    /// Local storage document
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir().join("storage.json")
    }

    /// Saved session cookies
    pub fn cookies_path(&self) -> PathBuf {
        self.data_dir().join("cookies.json")
    }
}

/// Form and banner timing
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_redirect_delay")]
    pub redirect_delay_ms: u64,

    #[serde(default = "default_error_banner")]
    pub error_banner_ms: u64,
}

fn default_redirect_delay() -> u64 {
    500
}

fn default_error_banner() -> u64 {
    5000 // 5 seconds
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: default_redirect_delay(),
            error_banner_ms: default_error_banner(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Nothing is logged here; the caller reports the returned
    /// [`ConfigLoad`] once logging is set up.
    pub fn load_default() -> ConfigLoad {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("studymind").join("config.toml")),
            Some(PathBuf::from("./studymind.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    fn load_first(config_paths: &[PathBuf]) -> ConfigLoad {
        let mut skipped = Vec::new();

        for path in config_paths {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        return ConfigLoad {
                            config,
                            source: Some(path.clone()),
                            skipped,
                        };
                    }
                    Err(e) => skipped.push(e),
                }
            }
        }

        // Fall back to environment-only config
        ConfigLoad {
            config: Self::from_env(),
            source: None,
            skipped,
        }
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("STUDYMIND_API_URL") {
            self.api.base_url = url;
        }

        if let Some(data_dir) = var("STUDYMIND_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Some(level) = var("STUDYMIND_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("STUDYMIND_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Result of searching the default config locations
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,

    /// File the config came from; `None` means defaults plus environment
    pub source: Option<PathBuf>,

    /// Files that exist but could not be loaded
    pub skipped: Vec<ConfigError>,
}

impl ConfigLoad {
    /// Log where the config came from and every file that was skipped
    pub fn report(&self) {
        for e in &self.skipped {
            tracing::warn!("Skipping config: {}", e);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::debug!("Using default config with environment overrides"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# StudyMind Configuration
#
# Environment variables override these settings:
# - STUDYMIND_API_URL
# - STUDYMIND_DATA_DIR
# - STUDYMIND_LOG_LEVEL
# - STUDYMIND_LOG_FORMAT

[api]
# Backend address; the /api prefix is added automatically
base_url = "http://localhost:5000"

# Optional User-Agent header
# user_agent = "studymind-cli"

[storage]
# Directory for the signed-in user and session cookies
data_dir = "~/.local/share/studymind"

[ui]
# Delay before redirecting after a successful sign-in (ms)
redirect_delay_ms = 500

# How long error banners stay visible (ms)
error_banner_ms = 5000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.ui.redirect_delay_ms, 500);
        assert_eq!(config.ui.error_banner_ms, 5000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(Path::new("studymind.toml"), &generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.user_agent, None);
        assert_eq!(config.storage.data_dir, "~/.local/share/studymind");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://study.example.com/\"\n\n[ui]\nredirect_delay_ms = 0\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://study.example.com/");
        assert_eq!(config.ui.redirect_delay_ms, 0);
        assert_eq!(config.ui.error_banner_ms, 5000);
        assert_eq!(
            config.api.client_config().api_root(),
            "https://study.example.com/api"
        );
    }

    #[test]
    fn test_load_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[api\nbase_url = 1").unwrap();
        assert!(matches!(Config::load(&broken), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_malformed_default_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("config.toml");
        std::fs::write(&broken, "[api\nbase_url = 1").unwrap();
        let fallback = dir.path().join("studymind.toml");
        let missing = dir.path().join("absent.toml");

        let loaded = Config::load_first(&[broken.clone(), missing.clone(), fallback.clone()]);
        assert_eq!(loaded.source, None);
        assert_eq!(loaded.skipped.len(), 1);
        assert!(matches!(
            &loaded.skipped[0],
            ConfigError::Parse { path, .. } if *path == broken
        ));

        std::fs::write(&fallback, "[ui]\nredirect_delay_ms = 0\n").unwrap();
        let loaded = Config::load_first(&[broken, missing, fallback.clone()]);
        assert_eq!(loaded.source, Some(fallback));
        assert_eq!(loaded.skipped.len(), 1);
        assert_eq!(loaded.config.ui.redirect_delay_ms, 0);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STUDYMIND_API_URL", "http://10.0.0.2:5000"),
            ("STUDYMIND_DATA_DIR", "/tmp/studymind"),
            ("STUDYMIND_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://10.0.0.2:5000");
        assert_eq!(
            config.storage.storage_path(),
            PathBuf::from("/tmp/studymind/storage.json")
        );
        assert_eq!(
            config.storage.cookies_path(),
            PathBuf::from("/tmp/studymind/cookies.json")
        );
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_data_dir_expands_home() {
        let storage = StorageConfig {
            data_dir: "~/.local/share/studymind".to_string(),
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(storage.data_dir(), home.join(".local/share/studymind"));
        }

        let storage = StorageConfig {
            data_dir: "./data".to_string(),
        };
        assert_eq!(storage.data_dir(), PathBuf::from("./data"));
    }
}
