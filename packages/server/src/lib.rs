#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the incident presentation.
//!
//! Hosts a single presentation session. The rendering surface fetches the
//! current [`Frame`](crime_tour_presentation_models::Frame) from
//! `/api/frame` and posts button presses, marker clicks, key presses and
//! sidebar changes back; every mutation responds with the re-rendered
//! frame. Static frontend files are served from the configured directory.

mod handlers;
pub mod interactive;

use std::sync::Mutex;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, middleware, web};
use crime_tour_config::PresentationConfig;
use crime_tour_geography::OverlayCache;
use crime_tour_loader::{IncidentCache, LoadError};
use crime_tour_navigation::NavError;
use crime_tour_presentation::{Presenter, PresenterSettings, SessionState};
use crime_tour_presentation_models::ApiError;

/// Errors returned by the API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A navigation event was rejected.
    #[error(transparent)]
    Navigation(#[from] NavError),

    /// The `{action}` path segment is not a known action.
    #[error("Unknown navigation action: {action}")]
    UnknownAction {
        /// The segment that was received.
        action: String,
    },

    /// A previous handler panicked while holding the session lock.
    #[error("Session state is unavailable")]
    SessionPoisoned,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Navigation(NavError::AtBoundary { .. } | NavError::MapHidden { .. }) => {
                StatusCode::CONFLICT
            }
            Self::Navigation(NavError::OutOfRange { .. }) => StatusCode::BAD_REQUEST,
            Self::UnknownAction { .. } => StatusCode::NOT_FOUND,
            Self::SessionPoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiError {
            error: self.to_string(),
        })
    }
}

/// Shared application state.
pub struct AppState {
    /// Loaded data and presentation settings (read-only).
    pub presenter: Presenter,
    /// The one presentation session.
    pub session: Mutex<SessionState>,
}

impl AppState {
    /// Wraps `presenter` with a fresh session starting `today`.
    #[must_use]
    pub fn new(presenter: Presenter, today: chrono::NaiveDate) -> Self {
        let session = presenter.new_session(today);
        Self {
            presenter,
            session: Mutex::new(session),
        }
    }
}

/// Today's date in local time, the anchor for rolling period presets.
#[must_use]
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Loads the incidents and overlay named by `config`.
///
/// # Errors
///
/// Returns [`LoadError`] if the incidents file is missing required columns,
/// cannot be read, or has nothing left after the recency window. A broken
/// or missing overlay is never an error.
pub fn build_presenter(config: &PresentationConfig) -> Result<Presenter, LoadError> {
    build_presenter_with(config, &mut IncidentCache::new(), &mut OverlayCache::new())
}

/// Like [`build_presenter`], reusing tables and overlays already loaded
/// into `incidents` and `overlays`.
///
/// # Errors
///
/// Same as [`build_presenter`].
pub fn build_presenter_with(
    config: &PresentationConfig,
    incidents: &mut IncidentCache,
    overlays: &mut OverlayCache,
) -> Result<Presenter, LoadError> {
    let table = incidents.get_or_load(&config.incidents_path, &config.load_options())?;
    let overlay = overlays.get_or_load(config.boundaries_path.as_deref());
    Ok(Presenter::new(table, overlay, PresenterSettings::from(config)))
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/frame", web::get().to(handlers::frame))
            .route("/filters", web::put().to(handlers::update_filters))
            .route("/navigate/{action}", web::post().to(handlers::navigate))
            .route("/marker", web::post().to(handlers::marker))
            .route("/key", web::post().to(handlers::key)),
    );
}

/// Reads the bind address and port from `BIND_ADDR` and `PORT`, defaulting
/// to `127.0.0.1:8080`.
#[must_use]
pub fn bind_from_env() -> (String, u16) {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    (bind_addr, port)
}

/// Starts the presentation API server.
///
/// The caller is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`) and for loading the presenter beforehand, so a
/// load failure never reaches this point.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(
    presenter: Presenter,
    config: &PresentationConfig,
    bind_addr: String,
    port: u16,
) -> std::io::Result<()> {
    let state = web::Data::new(AppState::new(presenter, today()));
    let static_dir = config.static_dir.clone();

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure);

        match &static_dir {
            // Serve frontend static files (production)
            Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
