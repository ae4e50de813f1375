#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the incident presentation.
//!
//! ```text
//! crime_tour serve [--config FILE] [--bind ADDR] [--port PORT]
//! crime_tour summary [--config FILE]
//! crime_tour present [--config FILE]
//! ```
//!
//! Running `crime_tour` with no subcommand enters interactive mode.
//!
//! Uses `indicatif-log-bridge` (via [`crime_tour_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the loading spinner never fight for the terminal.

mod present;
mod summary;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use crime_tour_cli_utils::{MultiProgress, Spinner};
use crime_tour_config::{PresentationConfig, load_config};
use crime_tour_presentation::Presenter;
use crime_tour_geography::OverlayCache;
use crime_tour_loader::IncidentCache;
use crime_tour_server::{bind_from_env, build_presenter_with, today};
use dialoguer::Select;

use crate::summary::Summary;

#[derive(Parser)]
#[command(name = "crime_tour", about = "Step through incidents on a map")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the data and start the API server
    Serve {
        /// Presentation config file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Bind address (defaults to `BIND_ADDR` or 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
        /// Port (defaults to `PORT` or 8080)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print counts for the loaded incidents
    Summary {
        /// Presentation config file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Walk through the presentation in the terminal
    Present {
        /// Presentation config file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Top-level tool selection for interactive mode.
enum Tool {
    Present,
    Summary,
    Server,
    Quit,
}

impl Tool {
    const ALL: &[Self] = &[Self::Present, Self::Summary, Self::Server, Self::Quit];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Present => "Walk through the presentation",
            Self::Summary => "Summarize the incidents",
            Self::Server => "Start server",
            Self::Quit => "Quit",
        }
    }
}

/// Files already loaded during this run.
#[derive(Default)]
struct Loaded {
    incidents: IncidentCache,
    overlays: OverlayCache,
}

impl Loaded {
    /// Loads the config and incidents behind a spinner.
    fn load(
        &mut self,
        multi: &MultiProgress,
        config_path: Option<&Path>,
    ) -> Result<(PresentationConfig, Presenter), Box<dyn std::error::Error>> {
        let config = load_config(config_path)?;

        let message = format!("Loading {}", config.incidents_path.display());
        let presenter = Spinner::run(
            multi,
            &message,
            || build_presenter_with(&config, &mut self.incidents, &mut self.overlays),
            |p| format!("Loaded {} incidents", p.table().len()),
        )
        .inspect_err(|e| log::error!("Failed to load incidents: {e}"))?;

        Ok((config, presenter))
    }
}

fn serve(
    presenter: Presenter,
    config: &PresentationConfig,
    bind: Option<String>,
    port: Option<u16>,
) -> std::io::Result<()> {
    let (env_bind, env_port) = bind_from_env();
    let bind_addr = bind.unwrap_or(env_bind);
    let port = port.unwrap_or(env_port);

    actix_web::rt::System::new().block_on(crime_tour_server::run_server(
        presenter, config, bind_addr, port,
    ))
}

/// Menu loop. The config named by `CRIME_TOUR_CONFIG` is re-read on every
/// pass; the incidents file is loaded once.
fn interactive(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    println!("Crime Tour");
    println!();

    let config_path = std::env::var_os("CRIME_TOUR_CONFIG").map(PathBuf::from);
    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
    let mut loaded = Loaded::default();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        if matches!(Tool::ALL[idx], Tool::Quit) {
            return Ok(());
        }

        let (config, presenter) = loaded.load(multi, config_path.as_deref())?;

        match Tool::ALL[idx] {
            Tool::Present => present::run(&presenter, today())?,
            Tool::Summary => print!("{}", Summary::from_table(presenter.table())),
            Tool::Server => {
                actix_web::rt::System::new()
                    .block_on(crime_tour_server::interactive::run(presenter, &config))?;
                return Ok(());
            }
            Tool::Quit => return Ok(()),
        }
        println!();
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = crime_tour_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return interactive(&multi);
    };

    match command {
        Commands::Serve { config, bind, port } => {
            let (config, presenter) = Loaded::default().load(&multi, config.as_deref())?;
            serve(presenter, &config, bind, port)?;
        }
        Commands::Summary { config } => {
            let (_, presenter) = Loaded::default().load(&multi, config.as_deref())?;
            print!("{}", Summary::from_table(presenter.table()));
        }
        Commands::Present { config } => {
            let (_, presenter) = Loaded::default().load(&multi, config.as_deref())?;
            present::run(&presenter, today())?;
        }
    }

    Ok(())
}
