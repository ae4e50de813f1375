#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone binary for the presentation API server.
//!
//! Reads the config file named by `CRIME_TOUR_CONFIG` (defaults otherwise)
//! and binds to `BIND_ADDR`/`PORT`.

use std::path::PathBuf;

use crime_tour_config::load_config;
use crime_tour_server::{bind_from_env, build_presenter, run_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config_path = std::env::var_os("CRIME_TOUR_CONFIG").map(PathBuf::from);
    let config = load_config(config_path.as_deref()).map_err(std::io::Error::other)?;

    log::info!("Loading incidents from {}...", config.incidents_path.display());
    let presenter = build_presenter(&config).map_err(|e| {
        log::error!("Failed to load incidents: {e}");
        std::io::Error::other(e)
    })?;

    let (bind_addr, port) = bind_from_env();
    run_server(presenter, &config, bind_addr, port).await
}
