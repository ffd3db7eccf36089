//! Log setup.
//!
//! Everything goes to stderr: stdout is reserved for command output (URLs,
//! JSON, previews) so it can be piped. An optional rolling file receives the
//! same events without colors.

use std::io::IsTerminal;
use std::path::Path;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Flushes the file writer on drop. Hold it until `main` returns.
pub struct LogGuard {
    _file: Option<WorkerGuard>,
}

pub fn init_logging(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Result<LogGuard> {
    let level = effective_level(settings, verbose, quiet);
    let filter = env_filter(level)?;

    let (file, guard) = match settings.file.as_deref() {
        Some(path) => {
            let (layer, guard) = file_layer(Path::new(path), settings)?;
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer(settings.json_format))
        .with(file)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))?;

    tracing::debug!(
        level = %level,
        file = ?settings.file,
        rotation = %settings.rotation,
        "Logging initialized"
    );

    Ok(LogGuard { _file: guard })
}

/// Minimal stderr logging for commands that run before the config loads.
pub fn init_simple(level: Level) -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .with(console_layer(false))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

/// `-q` beats `-v`, and `-v` beats the configured level.
fn effective_level(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => settings.level.parse().unwrap_or(Level::INFO),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// `RUST_LOG` may tune other targets; the launcher's own target always
/// follows the effective level.
fn env_filter(level: Level) -> Result<EnvFilter> {
    let own: Directive = format!("persona_launcher={}", level.as_str().to_lowercase())
        .parse()
        .map_err(|e| Error::Config(format!("Invalid log directive: {}", e)))?;

    Ok(EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()))
        .add_directive(own))
}

fn console_layer<S>(json: bool) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    if json {
        return fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed();
    }

    let ansi = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .compact()
        .boxed()
}

/// Rotation policy named in `logging.rotation`.
pub fn parse_rotation(name: &str) -> Option<Rotation> {
    match name.trim().to_lowercase().as_str() {
        "minutely" => Some(Rotation::MINUTELY),
        "hourly" => Some(Rotation::HOURLY),
        "daily" => Some(Rotation::DAILY),
        "never" => Some(Rotation::NEVER),
        _ => None,
    }
}

fn file_layer<S>(path: &Path, settings: &LoggingSettings) -> Result<(BoxedLayer<S>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let rotation = parse_rotation(&settings.rotation).ok_or_else(|| {
        Error::config_field_invalid(
            "logging.rotation",
            format!("unknown rotation '{}'", settings.rotation),
        )
    })?;

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let prefix = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("launcher");

    std::fs::create_dir_all(directory).map_err(|e| Error::IoWrite {
        path: directory.to_path_buf(),
        source: e,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(settings.max_files.max(1) as usize)
        .build(directory)
        .map_err(|e| Error::Config(format!("Failed to open log file: {}", e)))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = if settings.json_format {
        fmt::layer().json().with_writer(writer).boxed()
    } else {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    Ok((layer, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_effective_level() {
        let mut settings = LoggingSettings::default();
        assert_eq!(effective_level(&settings, 0, false), Level::INFO);
        assert_eq!(effective_level(&settings, 1, false), Level::DEBUG);
        assert_eq!(effective_level(&settings, 3, false), Level::TRACE);
        assert_eq!(effective_level(&settings, 2, true), Level::ERROR);

        settings.level = "WARN".to_string();
        assert_eq!(effective_level(&settings, 0, false), Level::WARN);
    }

    #[test]
    fn test_env_filter_accepts_every_level() {
        for level in [Level::TRACE, Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR] {
            assert!(env_filter(level).is_ok(), "{level}");
        }
    }

    #[test]
    fn test_parse_rotation() {
        assert_eq!(parse_rotation("daily"), Some(Rotation::DAILY));
        assert_eq!(parse_rotation(" Hourly "), Some(Rotation::HOURLY));
        assert_eq!(parse_rotation("never"), Some(Rotation::NEVER));
        assert_eq!(parse_rotation("weekly"), None);
    }

    #[test]
    fn test_file_layer_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs").join("launcher");

        let result = file_layer::<tracing_subscriber::Registry>(&path, &LoggingSettings::default());

        assert!(result.is_ok());
        assert!(temp_dir.path().join("logs").is_dir());
    }

    #[test]
    fn test_file_layer_rejects_unknown_rotation() {
        let temp_dir = TempDir::new().unwrap();
        let settings = LoggingSettings {
            rotation: "weekly".to_string(),
            ..Default::default()
        };

        let result =
            file_layer::<tracing_subscriber::Registry>(&temp_dir.path().join("launcher"), &settings);
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }
}
