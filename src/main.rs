//! Persona Launcher - entry point for the startup simulator
//!
//! Lets the user pick a business persona, preview and edit its financial
//! assumptions, and prints the simulator link that carries them.

mod cli;
mod config;
mod controller;
mod error;
mod logging;
mod onboarding;
mod persona;
mod preview;
mod session;
mod transfer;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use clap::Parser;
use tracing::{debug, error, info, warn};

use crate::cli::{Cli, Commands, ConfigSubcommand, OnboardingSubcommand};
use crate::config::LauncherConfig;
use crate::controller::{PersonaController, PersonaEvents};
use crate::error::{Error, Result};
use crate::onboarding::{OnboardingStore, WALKTHROUGH};
use crate::persona::{ParamField, PresetRegistry};
use crate::preview::ValueFormatter;
use crate::session::Session;
use crate::transfer::{OutputFormat, ParameterTransfer, SubmitAction, WriterNavigator};

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        if e.is_fatal() {
            error!(error = %e.format_for_log(), "Launcher failed");
        } else {
            warn!(error = %e.format_for_log(), "Command failed");
        }
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // Config commands use minimal logging
    if let Commands::Config { subcommand } = &cli.command {
        logging::init_simple(if cli.quiet {
            tracing::Level::ERROR
        } else {
            tracing::Level::WARN
        })?;
        return handle_config_command(cli.config.as_deref(), subcommand.clone());
    }

    let config = LauncherConfig::load(cli.config.as_deref())?;

    // The guards must be kept alive for the lifetime of the program
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    debug!(version = env!("CARGO_PKG_VERSION"), "Starting persona launcher");

    match cli.command {
        Commands::Personas => list_personas(&config),
        Commands::Preview { persona } => {
            let store = OnboardingStore::new(&config.data_dir());
            if !store.is_seen() && !cli.quiet {
                eprintln!("{}", WALKTHROUGH);
            }
            show_preview(&config, persona.as_deref())
        }
        Commands::Start {
            persona,
            set,
            format,
        } => start(&config, persona.as_deref(), &set, format),
        Commands::Demo { format } => {
            let mut controller = build_controller(&config, None, format)?;
            controller.on_submit(SubmitAction::Demo)?;
            Ok(())
        }
        Commands::Decode { input } => {
            let parameters = transfer::from_query(&input)?;
            println!("{}", serde_json::to_string_pretty(&parameters)?);
            Ok(())
        }
        Commands::Session {
            script,
            persona,
            format,
        } => run_session(&config, script.as_deref(), persona.as_deref(), format),
        Commands::Onboarding { subcommand } => handle_onboarding_command(&config, subcommand),
        Commands::Config { .. } => Err(Error::Internal(
            "config commands are handled before configuration loads".to_string(),
        )),
    }
}

/// Controller that prints navigation targets to stdout.
fn build_controller(
    config: &LauncherConfig,
    persona: Option<&str>,
    format: OutputFormat,
) -> Result<PersonaController<WriterNavigator<io::Stdout>>> {
    let transfer = ParameterTransfer::from_settings(&config.navigation)?;
    debug!(destination = %transfer.destination(), "Simulator destination");
    let initial = persona.or(config.persona.default.as_deref());

    Ok(PersonaController::new(
        PresetRegistry::new(),
        ValueFormatter::from_settings(&config.display),
        transfer,
        WriterNavigator::new(io::stdout(), format),
        initial,
    ))
}

fn list_personas(config: &LauncherConfig) -> Result<()> {
    let formatter = ValueFormatter::from_settings(&config.display);

    for listing in PresetRegistry::new().list_available() {
        println!("{:<12} {}", listing.key.slug(), listing.key.display_name());
        println!("             {}", listing.description);

        let defaults: Vec<String> = listing
            .defaults
            .iter()
            .map(|(field, value)| {
                let shown = if field.is_monetary() {
                    formatter.to_display(value)
                } else {
                    ValueFormatter::plain(value)
                };
                format!("{}={}", field.name(), shown)
            })
            .collect();
        println!("             {}", defaults.join(", "));
        println!();
    }

    Ok(())
}

fn show_preview(config: &LauncherConfig, persona: Option<&str>) -> Result<()> {
    let controller = build_controller(config, persona, OutputFormat::default())?;

    println!("{}", controller.description());
    if let Some(panel) = controller.panel() {
        print!("{}", panel);
    }
    Ok(())
}

fn start(
    config: &LauncherConfig,
    persona: Option<&str>,
    edits: &[String],
    format: OutputFormat,
) -> Result<()> {
    let formatter = ValueFormatter::from_settings(&config.display);
    let edits = edits
        .iter()
        .map(|edit| parse_edit(&formatter, edit))
        .collect::<Result<Vec<_>>>()?;

    let mut controller = build_controller(config, persona, format)?;
    for (field, value) in &edits {
        controller.on_edit_field(field.name(), value);
        debug!(field = %field, value = %value, "Applied edit");
    }

    controller.on_submit(SubmitAction::Start)?;
    Ok(())
}

/// Parse a `field=value` edit. The value may carry a currency code and
/// grouping separators but must contain a number.
fn parse_edit(formatter: &ValueFormatter, edit: &str) -> Result<(ParamField, String)> {
    let (name, value) = edit
        .split_once('=')
        .ok_or_else(|| Error::invalid_edit(edit, "expected FIELD=VALUE"))?;

    let field: ParamField = name
        .parse()
        .map_err(|_| Error::unknown_parameter(name.trim()))?;

    let value = value.trim();
    let raw = formatter.unmask(value);
    if raw.is_empty() || ValueFormatter::try_parse_number(&raw, field).is_none() {
        return Err(Error::invalid_value(field.name(), value));
    }

    Ok((field, value.to_string()))
}

fn run_session(
    config: &LauncherConfig,
    script: Option<&Path>,
    persona: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let mut controller = build_controller(config, persona, format)?;
    let mut session = Session::new(&mut controller, io::stdout());

    let targets = match script {
        Some(path) => {
            let file = File::open(path).map_err(|e| Error::IoRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            info!(script = %path.display(), "Running session script");
            session.run(BufReader::new(file))?
        }
        None => {
            info!("Reading session events from stdin");
            session.run(io::stdin().lock())?
        }
    };

    debug!(navigations = targets.len(), "Session finished");
    Ok(())
}

fn handle_onboarding_command(
    config: &LauncherConfig,
    subcommand: OnboardingSubcommand,
) -> Result<()> {
    let store = OnboardingStore::new(&config.data_dir());

    match subcommand {
        OnboardingSubcommand::Show => {
            if store.is_seen() {
                match store.seen_at() {
                    Some(at) => println!("Walkthrough dismissed on {}.", at.to_rfc3339()),
                    None => println!("Walkthrough dismissed."),
                }
                println!("Run 'persona-launcher onboarding reset' to see it again.");
            } else {
                print!("{}", WALKTHROUGH);
            }
        }
        OnboardingSubcommand::Dismiss { dont_show_again } => {
            if dont_show_again {
                store.mark_seen()?;
                println!("Walkthrough dismissed. It will not be shown again.");
            } else {
                println!("Walkthrough closed.");
            }
        }
        OnboardingSubcommand::Reset => {
            store.reset()?;
            println!("Walkthrough will be shown again.");
        }
        OnboardingSubcommand::Start {
            dont_show_again,
            persona,
            set,
            format,
        } => {
            if dont_show_again {
                store.mark_seen()?;
            }
            start(config, persona.as_deref(), &set, format)?;
        }
    }

    Ok(())
}

fn handle_config_command(config_path: Option<&str>, subcommand: ConfigSubcommand) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            let cfg = LauncherConfig::load(config_path)?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let created = config::init_config(path.as_deref(), force)?;
            println!("Created configuration file: {}", created.display());
        }
        ConfigSubcommand::Validate => {
            LauncherConfig::load(config_path)?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}
