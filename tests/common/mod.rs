//! Common test utilities and fixtures
//!
//! This module provides shared test infrastructure

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;

/// Query string of the SaaS defaults, in declared field order
pub const SAAS_QUERY: &str =
    "fixed_costs=10000&price=20&variable_cost=5&initial_sales=100&monthly_growth=0.06&months=24";

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Get the valid config fixture path
pub fn valid_config_fixture() -> PathBuf {
    fixture_path("valid_config.toml")
}

/// Get the invalid config fixture path
pub fn invalid_config_fixture() -> PathBuf {
    fixture_path("invalid_config.toml")
}

/// Launcher command isolated from the user's environment.
///
/// Config search paths and the data directory all point inside `home`, and
/// every `LAUNCHER_*` override is cleared.
pub fn launcher_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("persona-launcher").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("LAUNCHER_DATA_DIR", home.join("data"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");

    for var in [
        "LAUNCHER_CONFIG",
        "LAUNCHER_PERSONA",
        "LAUNCHER_DEFAULT_PERSONA",
        "LAUNCHER_CURRENCY_CODE",
        "LAUNCHER_LOCALE",
        "LAUNCHER_BASE_URL",
        "LAUNCHER_SIMULATOR_PATH",
        "LAUNCHER_LOG_LEVEL",
        "LAUNCHER_LOG_FILE",
        "LAUNCHER_LOG_JSON",
    ] {
        cmd.env_remove(var);
    }

    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_dir_exists() {
        assert!(fixtures_dir().exists(), "Fixtures directory should exist");
    }

    #[test]
    fn test_valid_config_exists() {
        assert!(
            valid_config_fixture().exists(),
            "Valid config fixture should exist"
        );
    }

    #[test]
    fn test_invalid_config_exists() {
        assert!(
            invalid_config_fixture().exists(),
            "Invalid config fixture should exist"
        );
    }
}
