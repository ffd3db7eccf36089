//! Error types for the persona launcher
//!
//! The preview pipeline itself never fails: bad input degrades to zero and
//! unknown personas fall back to SaaS. What can fail is everything around
//! it, so this module covers:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for launcher operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Navigation errors (3xx)
    InvalidUrl = 300,
    NavigationFailed = 301,

    // Parameter errors (4xx)
    UnknownParameter = 400,
    InvalidParameterValue = 401,
    MissingParameter = 402,
    InvalidEdit = 403,

    // Session errors (5xx)
    SessionScript = 500,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Navigation errors
            400..=499 => 40, // Parameter errors
            500..=599 => 50, // Session errors
            900..=999 => 90, // Internal errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for the launcher
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Navigation Errors
    // ─────────────────────────────────────────────────────────────

    /// Simulator URL could not be built
    #[error("Invalid simulator URL: {0}")]
    Url(#[from] url::ParseError),

    /// Handing the target to the host failed
    #[error("Navigation to {target} failed: {message}")]
    NavigationFailed { target: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // Parameter Errors
    // ─────────────────────────────────────────────────────────────

    /// Name is not one of the six recognized parameters
    #[error("Unknown parameter: {name}")]
    UnknownParameter { name: String },

    /// Query value is not a number
    #[error("Invalid value for {field}: '{value}'")]
    InvalidParameterValue { field: String, value: String },

    /// Query is missing one of the six parameters
    #[error("Missing parameter: {field}")]
    MissingParameter { field: String },

    /// A --set edit isn't of the form field=value
    #[error("Invalid edit '{input}': {reason}")]
    InvalidEdit { input: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // Session Errors
    // ─────────────────────────────────────────────────────────────

    /// Session script line could not be interpreted
    #[error("Session script line {line}: {message}")]
    SessionScript { line: usize, message: String },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            Error::Config(_) => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::Json(_) => ErrorCode::InternalError,

            Error::Url(_) => ErrorCode::InvalidUrl,
            Error::NavigationFailed { .. } => ErrorCode::NavigationFailed,

            Error::UnknownParameter { .. } => ErrorCode::UnknownParameter,
            Error::InvalidParameterValue { .. } => ErrorCode::InvalidParameterValue,
            Error::MissingParameter { .. } => ErrorCode::MissingParameter,
            Error::InvalidEdit { .. } => ErrorCode::InvalidEdit,

            Error::SessionScript { .. } => ErrorCode::SessionScript,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Check if the error is fatal (launcher cannot start)
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ConfigNotFound { .. }
                | Error::ConfigParse { .. }
                | Error::ConfigValidation { .. }
                | Error::Config(_)
                | Error::Url(_)
                | Error::Internal(_)
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'persona-launcher config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'persona-launcher config validate' to see details."
            ),
            Error::ConfigValidation { .. } | Error::Config(_) => Some(
                "Review the configuration file and fix the invalid values."
            ),
            Error::Url(_) => Some(
                "Check [navigation] base_url (absolute, e.g. http://localhost:5000) and simulator_path (starts with '/')."
            ),
            Error::UnknownParameter { .. } => Some(
                "Valid parameters: fixed_costs, price, variable_cost, initial_sales, monthly_growth, months."
            ),
            Error::InvalidEdit { .. } => Some(
                "Edits look like --set price=7000 or --set fixed_costs=\"KES 12,500\"."
            ),
            Error::MissingParameter { .. } | Error::InvalidParameterValue { .. } => Some(
                "A simulator link carries all six parameters as plain numbers."
            ),
            Error::SessionScript { .. } => Some(
                "Session commands: select, focus, blur, input, edit, remove, show, start, demo."
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();
        let suggestion = self.suggestion();

        let mut output = format!(
            "\x1b[31mError [{}]\x1b[0m: {}\n",
            code.as_str(),
            self
        );

        if let Some(hint) = suggestion {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        format!("[{}] {}", self.code().as_str(), self)
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors (for ergonomic error creation)
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound { path: path.into() }
    }

    /// Create a config parse error
    pub fn config_parse(message: impl Into<String>, source: toml::de::Error) -> Self {
        Error::ConfigParse {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field: String = field.into();
        let message: String = message.into();
        Error::ConfigValidation {
            message: format!("{}: {}", field, message),
            field: Some(field),
        }
    }

    /// Create an unknown parameter error
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Error::UnknownParameter { name: name.into() }
    }

    /// Create an invalid parameter value error
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Error::InvalidParameterValue {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a missing parameter error
    pub fn missing_parameter(field: impl Into<String>) -> Self {
        Error::MissingParameter {
            field: field.into(),
        }
    }

    /// Create an invalid edit error
    pub fn invalid_edit(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidEdit {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a session script error
    pub fn session(line: usize, message: impl Into<String>) -> Self {
        Error::SessionScript {
            line,
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
