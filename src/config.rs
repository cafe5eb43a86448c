//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::dataset::DataSources;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dataset locations
///
/// File names are resolved against `dir` unless they are absolute.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: String,

    #[serde(default = "default_schools_file")]
    pub schools: String,

    #[serde(default = "default_students_file")]
    pub students: String,

    #[serde(default = "default_activities_file")]
    pub activities: String,

    #[serde(default = "default_districts_file")]
    pub districts: String,
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_schools_file() -> String {
    "schulen_complete.csv".to_string()
}

fn default_students_file() -> String {
    "eckdaten_2019_20_allg_bildende_schulen_berlin.xlsx".to_string()
}

fn default_activities_file() -> String {
    "activity-schools-BE.csv".to_string()
}

fn default_districts_file() -> String {
    "districts.json".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            schools: default_schools_file(),
            students: default_students_file(),
            activities: default_activities_file(),
            districts: default_districts_file(),
        }
    }
}

impl DataConfig {
    /// Resolved paths of the four sources
    pub fn sources(&self) -> DataSources {
        let dir = PathBuf::from(&self.dir);
        DataSources {
            schools: dir.join(&self.schools),
            students: dir.join(&self.students),
            activities: dir.join(&self.activities),
            districts: dir.join(&self.districts),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum number of concurrent WebSocket sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

fn default_max_sessions() -> usize {
    1000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_sessions: default_max_sessions(),
        }
    }
}

impl ApiConfig {
    /// Socket address string to bind to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
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
            file: None,
        }
    }
}

impl LoggingConfig {
    /// Whether logs should be emitted as JSON lines
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
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

    /// Load from default locations or environment
    ///
    /// Runs before logging is set up, so nothing is logged here. Call
    /// [`DefaultConfig::report`] once the subscriber is installed.
    pub fn load_default() -> DefaultConfig {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("schooldash").join("config.toml")),
            Some(PathBuf::from("/etc/schooldash/config.toml")),
            Some(PathBuf::from("./schooldash.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// Load the first existing file of `paths` that parses
    fn load_first(paths: &[PathBuf]) -> DefaultConfig {
        let mut failures = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    return DefaultConfig {
                        config,
                        source: Some(path.clone()),
                        failures,
                    }
                }
                Err(e) => failures.push(e),
            }
        }

        DefaultConfig {
            config: Self::from_env(),
            source: None,
            failures,
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Data overrides
        if let Some(dir) = var("SCHOOLDASH_DATA_DIR") {
            self.data.dir = dir;
        }

        // API overrides
        if let Some(host) = var("SCHOOLDASH_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("SCHOOLDASH_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }
        if let Some(max) = var("SCHOOLDASH_MAX_SESSIONS") {
            if let Ok(m) = max.parse() {
                self.api.max_sessions = m;
            }
        }

        // Logging overrides
        if let Some(level) = var("SCHOOLDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("SCHOOLDASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Outcome of searching the default config locations
#[derive(Debug)]
pub struct DefaultConfig {
    pub config: Config,
    /// File the config was read from, `None` for defaults plus environment
    pub source: Option<PathBuf>,
    /// Files that exist but could not be loaded
    pub failures: Vec<ConfigError>,
}

impl DefaultConfig {
    /// Log where the config came from and every file that was skipped
    pub fn report(&self) {
        for failure in &self.failures {
            tracing::warn!("Skipped config file: {}", failure);
        }
        match &self.source {
            Some(path) => tracing::info!("Loaded config from {:?}", path),
            None => tracing::info!("Using default config with environment overrides"),
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
    r#"# Schooldash Configuration
#
# Environment variables override these settings:
# - SCHOOLDASH_DATA_DIR
# - SCHOOLDASH_API_HOST
# - SCHOOLDASH_API_PORT
# - SCHOOLDASH_MAX_SESSIONS
# - SCHOOLDASH_LOG_LEVEL
# - SCHOOLDASH_LOG_FORMAT

[data]
# Directory holding the datasets
dir = "./data"

# School list with coordinates and contact details (CSV)
schools = "schulen_complete.csv"

# Student counts per district, school type and operator (XLSX or CSV)
students = "eckdaten_2019_20_allg_bildende_schulen_berlin.xlsx"

# Extracurricular activities per school (CSV)
activities = "activity-schools-BE.csv"

# District boundaries (GeoJSON FeatureCollection)
districts = "districts.json"

[api]
# Server host
host = "0.0.0.0"

# Server port
port = 8050

# Maximum concurrent WebSocket sessions
max_sessions = 1000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/schooldash/schooldash.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config_file_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.api.port, defaults.api.port);
        assert_eq!(config.data.students, defaults.data.students);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::parse("[api]\nport = 9000\n").unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.data.dir, "./data");
    }

    #[test]
    fn test_sources_join_data_dir() {
        let data = DataConfig {
            dir: "/srv/berlin".to_string(),
            ..Default::default()
        };
        let sources = data.sources();
        assert_eq!(sources.schools, PathBuf::from("/srv/berlin/schulen_complete.csv"));
        assert_eq!(sources.districts, PathBuf::from("/srv/berlin/districts.json"));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SCHOOLDASH_DATA_DIR", "/tmp/data"),
            ("SCHOOLDASH_API_PORT", "8123"),
            ("SCHOOLDASH_MAX_SESSIONS", "not-a-number"),
            ("SCHOOLDASH_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.data.dir, "/tmp/data");
        assert_eq!(config.api.port, 8123);
        assert_eq!(config.api.max_sessions, 1000);
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[api\nport = ").unwrap();
        assert!(matches!(Config::load(&broken), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_broken_default_location_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[api\nport = ").unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[api]\nport = 9100\n").unwrap();
        let missing = dir.path().join("missing.toml");

        let loaded = Config::load_first(&[missing, broken.clone(), good.clone()]);
        assert_eq!(loaded.source, Some(good));
        assert_eq!(loaded.failures.len(), 1);
        assert!(matches!(
            &loaded.failures[0],
            ConfigError::Parse { path, .. } if *path == broken
        ));
    }

    #[test]
    fn test_no_default_location_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "not = [toml").unwrap();

        let loaded = Config::load_first(&[broken]);
        assert!(loaded.source.is_none());
        assert_eq!(loaded.failures.len(), 1);
        assert_eq!(loaded.config.data.dir, Config::from_env().data.dir);
    }
}
