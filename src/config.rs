//! Configuration system for the persona launcher
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (LAUNCHER_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};
use crate::logging;
use crate::persona::PersonaKey;
use crate::preview::formatter::{DEFAULT_CURRENCY_CODE, DEFAULT_LOCALE};

/// Main launcher configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Initial persona selection
    pub persona: PersonaSettings,

    /// Currency and locale for monetary fields
    pub display: DisplaySettings,

    /// Simulator destination
    pub navigation: NavigationSettings,

    /// Logging configuration
    pub logging: LoggingSettings,

    /// Data storage paths
    pub storage: StorageSettings,
}

/// Persona selection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaSettings {
    /// Persona selected at startup (SaaS when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Monetary display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Currency code shown before monetary values. No digits or spaces.
    pub currency_code: String,

    /// Locale used for digit grouping (e.g. en-KE). en-IN and hi group
    /// lakhs; locales without a `.` decimal point print the plain value.
    pub locale: String,
}

/// Simulator navigation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationSettings {
    /// Absolute base URL of the simulator web app
    pub base_url: String,

    /// Path of the simulator page, joined onto base_url
    pub simulator_path: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// How often the log file rolls over: minutely, hourly, daily, never
    pub rotation: String,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

/// Storage path settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Base data directory (onboarding marker lives here)
    pub data_dir: String,
}

// Default implementations

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_code: DEFAULT_CURRENCY_CODE.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            simulator_path: "/simulator".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            rotation: "daily".to_string(),
            max_files: 5,
            json_format: false,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.startup-sim/launcher".to_string(),
        }
    }
}

impl LauncherConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            config = Self::from_file(&path)?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::config_parse(format!("{}: {}", path.display(), e.message()), e)
        })
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        // Search in standard locations
        let search_paths = [
            // Current directory
            Some(PathBuf::from("persona-launcher.toml")),
            // User config directory
            dirs::config_dir().map(|p| p.join("startup-sim").join("launcher.toml")),
            // Home directory
            dirs::home_dir().map(|p| p.join(".startup-sim").join("launcher.toml")),
        ];

        for path in search_paths.iter().flatten() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LAUNCHER_DEFAULT_PERSONA") {
            self.persona.default = Some(val);
        }

        // Display settings
        if let Ok(val) = std::env::var("LAUNCHER_CURRENCY_CODE") {
            self.display.currency_code = val;
        }
        if let Ok(val) = std::env::var("LAUNCHER_LOCALE") {
            self.display.locale = val;
        }

        // Navigation settings
        if let Ok(val) = std::env::var("LAUNCHER_BASE_URL") {
            self.navigation.base_url = val;
        }
        if let Ok(val) = std::env::var("LAUNCHER_SIMULATOR_PATH") {
            self.navigation.simulator_path = val;
        }

        // Logging settings
        if let Ok(val) = std::env::var("LAUNCHER_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("LAUNCHER_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("LAUNCHER_LOG_JSON") {
            self.logging.json_format = val.to_lowercase() == "true" || val == "1";
        }

        // Storage settings
        if let Ok(val) = std::env::var("LAUNCHER_DATA_DIR") {
            self.storage.data_dir = val;
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.storage.data_dir = expand_path(&self.storage.data_dir);

        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let code = &self.display.currency_code;
        if code.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "display.currency_code",
                "Currency code cannot be empty",
            ));
        }
        // Digits in the prefix would be read back as part of the amount.
        if code.chars().any(|c| c.is_ascii_digit() || c.is_whitespace()) {
            return Err(Error::config_field_invalid(
                "display.currency_code",
                format!("'{}' must not contain digits or spaces", code),
            ));
        }

        let base = Url::parse(&self.navigation.base_url).map_err(|e| {
            Error::config_field_invalid(
                "navigation.base_url",
                format!("'{}' is not an absolute URL: {}", self.navigation.base_url, e),
            )
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::config_field_invalid(
                "navigation.base_url",
                format!("'{}' cannot be used as a base URL", self.navigation.base_url),
            ));
        }

        if !self.navigation.simulator_path.starts_with('/') {
            return Err(Error::config_field_invalid(
                "navigation.simulator_path",
                "Simulator path must start with '/'",
            ));
        }

        if let Some(ref persona) = self.persona.default {
            persona
                .parse::<PersonaKey>()
                .map_err(|e| Error::config_field_invalid("persona.default", e))?;
        }

        if logging::parse_rotation(&self.logging.rotation).is_none() {
            return Err(Error::config_field_invalid(
                "logging.rotation",
                format!(
                    "Invalid rotation '{}'. Must be one of: minutely, hourly, daily, never",
                    self.logging.rotation
                ),
            ));
        }

        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Get the data directory as a PathBuf
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Initialize a new configuration file
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".startup-sim")
                .join("launcher.toml")
        });

    // Check if file exists
    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    // Create parent directories
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    fs::write(&config_path, generate_default_config()).map_err(|e| Error::IoWrite {
        path: config_path.clone(),
        source: e,
    })?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# Persona Launcher Configuration

[persona]
# Persona selected at startup: saas, freemium, ecommerce, marketplace,
# consulting, hardware (SaaS when unset)
# default = "saas"

[display]
# Currency code shown before monetary values
currency_code = "KES"

# Locale used for thousands separators
locale = "en-KE"

[navigation]
# Simulator web app
base_url = "http://localhost:5000"
simulator_path = "/simulator"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (comment out to disable file logging)
# file = "~/.startup-sim/logs/launcher"

# How often the log file rolls over: minutely, hourly, daily, never
rotation = "daily"

# Number of rotated log files to keep
max_files = 5

# Use JSON format for logs
json_format = false

[storage]
# Base data directory
data_dir = "~/.startup-sim/launcher"
"#
    .to_string()
}
