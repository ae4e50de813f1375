//! HTTP handler functions for the presentation API.
//!
//! Every mutating endpoint applies one event to the session and responds
//! with the frame rendered from the resulting state.

use std::sync::MutexGuard;

use actix_web::{HttpResponse, web};
use crime_tour_filter::FilterSelection;
use crime_tour_navigation::NavAction;
use crime_tour_presentation::{Event, SessionState};
use crime_tour_presentation_models::{ApiHealth, KeyPress, MarkerClick};

use crate::{AppState, ServerError, today};

fn session(state: &AppState) -> Result<MutexGuard<'_, SessionState>, ServerError> {
    state.session.lock().map_err(|_| ServerError::SessionPoisoned)
}

/// Applies `event` and renders the new frame.
fn apply(state: &AppState, event: Event) -> Result<HttpResponse, ServerError> {
    let today = today();
    let mut session = session(state)?;
    let transition = state.presenter.handle(&mut session, event, today)?;
    log::debug!("Event applied: {transition:?}");
    Ok(HttpResponse::Ok().json(state.presenter.frame(&mut session, today)))
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/frame`
///
/// Renders the current session state.
pub async fn frame(state: web::Data<AppState>) -> Result<HttpResponse, ServerError> {
    let mut session = session(&state)?;
    Ok(HttpResponse::Ok().json(state.presenter.frame(&mut session, today())))
}

/// `PUT /api/filters`
///
/// Replaces the sidebar selection.
pub async fn update_filters(
    state: web::Data<AppState>,
    body: web::Json<FilterSelection>,
) -> Result<HttpResponse, ServerError> {
    apply(&state, Event::Filters(body.into_inner()))
}

/// `POST /api/navigate/{action}`
///
/// One of `next-incident`, `previous-incident`, `next-panel` or
/// `previous-panel`. Pressing a button at its boundary is a `409`.
pub async fn navigate(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServerError> {
    let action = path.into_inner();
    let Ok(action) = action.parse::<NavAction>() else {
        return Err(ServerError::UnknownAction { action });
    };
    apply(&state, Event::Navigate(action))
}

/// `POST /api/marker`
///
/// Jumps to the clicked marker. Ids that are not markers leave the state
/// unchanged; a marker outside the view is a `400`.
pub async fn marker(
    state: web::Data<AppState>,
    body: web::Json<MarkerClick>,
) -> Result<HttpResponse, ServerError> {
    apply(&state, Event::MarkerClicked(body.into_inner().id))
}

/// `POST /api/key`
///
/// Arrow keys switch panels. Anything else, including an empty report, is
/// ignored.
pub async fn key(
    state: web::Data<AppState>,
    body: web::Json<KeyPress>,
) -> Result<HttpResponse, ServerError> {
    let key = body.into_inner().key.unwrap_or_default();
    apply(&state, Event::Key(key))
}
