//! Interactive mode for the server.
//!
//! Prompts the user for bind address and port before starting the server.

use crime_tour_config::PresentationConfig;
use crime_tour_presentation::Presenter;
use dialoguer::{Confirm, Input};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks the user for a bind address and port, sets the corresponding
/// environment variables (`BIND_ADDR`, `PORT`), and delegates to
/// [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(presenter: Presenter, config: &PresentationConfig) -> std::io::Result<()> {
    println!("{}", config.title);
    println!(
        "{} incidents loaded from {}",
        presenter.table().len(),
        config.incidents_path.display()
    );
    println!();

    let (default_addr, default_port) = super::bind_from_env();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(default_addr.clone())
        .interact_text()
        .unwrap_or(default_addr);

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(default_port)
        .interact_text()
        .unwrap_or(default_port);

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(presenter, config, bind_addr, port).await
}
