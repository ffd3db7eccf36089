//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for the persona launcher.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::transfer::OutputFormat;

/// Persona launcher for the startup simulator
///
/// Pick a business persona, preview and adjust its financial assumptions,
/// and hand them to the simulator as URL parameters.
#[derive(Parser, Debug)]
#[command(name = "persona-launcher")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, env = "LAUNCHER_CONFIG", global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the launcher
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available personas with their descriptions
    Personas,

    /// Show the editable preview for a persona
    Preview {
        /// Persona to preview (saas, freemium, ecommerce, marketplace, consulting, hardware)
        #[arg(short, long, env = "LAUNCHER_PERSONA")]
        persona: Option<String>,
    },

    /// Build the simulator link from a persona and optional edits
    Start {
        /// Persona to start from
        #[arg(short, long, env = "LAUNCHER_PERSONA")]
        persona: Option<String>,

        /// Override a preview value, e.g. --set price=25 (repeatable)
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// Output format: url, path, json
        #[arg(short, long, default_value = "url")]
        format: OutputFormat,
    },

    /// Build the simulator link for the SaaS example
    Demo {
        /// Output format: url, path, json
        #[arg(short, long, default_value = "url")]
        format: OutputFormat,
    },

    /// Decode a simulator link or query string into parameters
    Decode {
        /// Simulator URL or query string
        input: String,
    },

    /// Drive the launcher from a script of events (stdin when no file)
    Session {
        /// Script file, one event per line
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Initially selected persona
        #[arg(short, long, env = "LAUNCHER_PERSONA")]
        persona: Option<String>,

        /// Output format for start/demo events: url, path, json
        #[arg(short, long, default_value = "url")]
        format: OutputFormat,
    },

    /// First-use walkthrough
    Onboarding {
        #[command(subcommand)]
        subcommand: OnboardingSubcommand,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Onboarding subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum OnboardingSubcommand {
    /// Print the walkthrough unless it was dismissed for good
    Show,

    /// Close the walkthrough
    Dismiss {
        /// Never show the walkthrough again
        #[arg(long)]
        dont_show_again: bool,
    },

    /// Show the walkthrough again on next use
    Reset,

    /// Close the walkthrough and start the simulator with the preview values
    Start {
        /// Never show the walkthrough again
        #[arg(long)]
        dont_show_again: bool,

        /// Persona to start from
        #[arg(short, long, env = "LAUNCHER_PERSONA")]
        persona: Option<String>,

        /// Override a preview value, e.g. --set price=25 (repeatable)
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// Output format: url, path, json
        #[arg(short, long, default_value = "url")]
        format: OutputFormat,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verifies that the CLI definition is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_start_defaults() {
        let cli = Cli::try_parse_from(["persona-launcher", "start"]).unwrap();
        match cli.command {
            Commands::Start { set, format, .. } => {
                assert!(set.is_empty());
                assert_eq!(format, OutputFormat::Url);
            }
            _ => panic!("Expected Start command"),
        }
    }

    #[test]
    fn test_start_with_edits() {
        let cli = Cli::try_parse_from([
            "persona-launcher",
            "start",
            "--persona",
            "hardware",
            "--set",
            "price=350",
            "--set",
            "months=36",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Start {
                persona,
                set,
                format,
            } => {
                assert_eq!(persona, Some("hardware".to_string()));
                assert_eq!(set, vec!["price=350".to_string(), "months=36".to_string()]);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("Expected Start command"),
        }
    }

    #[test]
    fn test_invalid_format_rejected() {
        assert!(Cli::try_parse_from(["persona-launcher", "demo", "--format", "html"]).is_err());
    }

    #[test]
    fn test_decode() {
        let cli = Cli::try_parse_from(["persona-launcher", "decode", "price=5"]).unwrap();
        match cli.command {
            Commands::Decode { input } => assert_eq!(input, "price=5"),
            _ => panic!("Expected Decode command"),
        }
    }

    #[test]
    fn test_session_script() {
        let cli =
            Cli::try_parse_from(["persona-launcher", "session", "--script", "events.txt"]).unwrap();
        match cli.command {
            Commands::Session { script, .. } => {
                assert_eq!(script, Some(PathBuf::from("events.txt")));
            }
            _ => panic!("Expected Session command"),
        }
    }

    #[test]
    fn test_onboarding_dismiss() {
        let cli = Cli::try_parse_from([
            "persona-launcher",
            "onboarding",
            "dismiss",
            "--dont-show-again",
        ])
        .unwrap();
        match cli.command {
            Commands::Onboarding {
                subcommand: OnboardingSubcommand::Dismiss { dont_show_again },
            } => assert!(dont_show_again),
            _ => panic!("Expected Onboarding Dismiss command"),
        }
    }

    #[test]
    fn test_verbose_flags() {
        let cli = Cli::try_parse_from(["persona-launcher", "-vv", "personas"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_quiet_flag() {
        let cli = Cli::try_parse_from(["persona-launcher", "personas", "--quiet"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::try_parse_from([
            "persona-launcher",
            "config",
            "show",
            "--config",
            "/path/to/launcher.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some("/path/to/launcher.toml".to_string()));
        assert!(matches!(
            cli.command,
            Commands::Config {
                subcommand: ConfigSubcommand::Show
            }
        ));
    }

    #[test]
    fn test_config_init() {
        let cli = Cli::try_parse_from(["persona-launcher", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config {
                subcommand: ConfigSubcommand::Init { path, force },
            } => {
                assert!(path.is_none());
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }
}
