#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Session state and frame assembly for the incident presentation.
//!
//! The presentation follows a re-render-on-event model: every event is
//! applied to a [`SessionState`] against a freshly filtered view, and every
//! render recomputes the view, reconciles the incident cursor and builds a
//! complete [`Frame`]. Nothing is cached between renders except the loaded
//! table and overlay held by the [`Presenter`].

pub mod detail;
pub mod scene;

use std::sync::Arc;

use chrono::NaiveDate;
use crime_tour_config::PresentationConfig;
use crime_tour_filter::{FilterOutcome, FilterSelection, SidebarOptions};
use crime_tour_geography::BoundaryOverlay;
use crime_tour_loader::IncidentTable;
use crime_tour_navigation::{CursorKind, NavAction, NavError, Navigator, Transition};
use crime_tour_presentation_models::{
    Frame, FrameWarning, Header, MarkerId, NavigationButtons, Panel,
};

/// Warning shown when the filters leave nothing to display.
pub const EMPTY_VIEW_MESSAGE: &str = "Nenhum dado encontrado com os filtros selecionados.";

/// Static presentation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenterSettings {
    pub title: String,
    pub subtitle: String,
    pub first_incident_label: String,
    pub base_zoom: u8,
    pub panels: Vec<Panel>,
}

impl From<&PresentationConfig> for PresenterSettings {
    fn from(config: &PresentationConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            first_incident_label: config.first_incident_label.clone(),
            base_zoom: config.base_zoom,
            panels: config.panels.clone(),
        }
    }
}

/// Per-session mutable state, passed by reference into every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub navigator: Navigator,
    pub selection: FilterSelection,
    pub zoom: u8,
}

/// An input from the rendering surface, sidebar or keyboard bridge.
#[derive(Debug, Clone)]
pub enum Event {
    /// One of the four navigation buttons.
    Navigate(NavAction),
    /// A map object was clicked. Non-marker ids are ignored.
    MarkerClicked(String),
    /// A key reported by the keyboard bridge.
    Key(String),
    /// The sidebar selection changed.
    Filters(FilterSelection),
}

/// Owns the loaded data and turns session state into frames.
#[derive(Debug, Clone)]
pub struct Presenter {
    table: IncidentTable,
    overlay: Option<Arc<BoundaryOverlay>>,
    sidebar: SidebarOptions,
    settings: PresenterSettings,
}

impl Presenter {
    #[must_use]
    pub fn new(
        table: IncidentTable,
        overlay: Option<Arc<BoundaryOverlay>>,
        mut settings: PresenterSettings,
    ) -> Self {
        if settings.panels.is_empty() {
            settings.panels.push(Panel::Map);
        }
        let sidebar = SidebarOptions::from_table(&table);
        Self {
            table,
            overlay,
            sidebar,
            settings,
        }
    }

    #[must_use]
    pub fn table(&self) -> &IncidentTable {
        &self.table
    }

    #[must_use]
    pub const fn sidebar(&self) -> &SidebarOptions {
        &self.sidebar
    }

    /// Creates the initial session state: cursors at `(0, 0)` and every
    /// category and municipality selected.
    #[must_use]
    pub fn new_session(&self, today: NaiveDate) -> SessionState {
        SessionState {
            navigator: Navigator::new(self.settings.panels.len()),
            selection: self.sidebar.default_selection(today),
            zoom: self.settings.base_zoom,
        }
    }

    fn filter(&self, session: &SessionState, today: NaiveDate) -> FilterOutcome {
        session.selection.apply(&self.table, today)
    }

    fn require_map(&self, session: &SessionState) -> Result<(), NavError> {
        let panel = session.navigator.panel();
        match self.settings.panels.get(panel) {
            Some(Panel::Map) => Ok(()),
            _ => Err(NavError::MapHidden { panel }),
        }
    }

    /// Applies one event to `session` against the current filtered view.
    ///
    /// # Errors
    ///
    /// Returns [`NavError`] for a button pressed at its boundary, a marker
    /// index outside the view, or an incident action while the current
    /// panel is not the map.
    pub fn handle(
        &self,
        session: &mut SessionState,
        event: Event,
        today: NaiveDate,
    ) -> Result<Transition, NavError> {
        match event {
            Event::Filters(selection) => {
                if selection == session.selection {
                    return Ok(Transition::Unchanged);
                }
                session.selection = selection;
                let view_len = self.filter(session, today).view.len();
                session.navigator.reconcile(view_len);
                Ok(Transition::Rerender)
            }
            Event::Key(key) => Ok(session.navigator.handle_key(&key)),
            Event::Navigate(action) => {
                if action.cursor() == CursorKind::Incident {
                    self.require_map(session)?;
                }
                let view_len = self.filter(session, today).view.len();
                session.navigator.reconcile(view_len);
                session.navigator.apply(action, view_len)
            }
            Event::MarkerClicked(id) => {
                let Ok(MarkerId(index)) = id.parse::<MarkerId>() else {
                    log::debug!("Ignoring click on non-marker object '{id}'");
                    return Ok(Transition::Unchanged);
                };
                self.require_map(session)?;
                let view_len = self.filter(session, today).view.len();
                session.navigator.reconcile(view_len);
                session.navigator.select_marker(index, view_len)
            }
        }
    }

    /// Renders the current state of `session`.
    ///
    /// Recomputes the filtered view and resets the incident cursor first if
    /// the view shrank below it.
    #[must_use]
    pub fn frame(&self, session: &mut SessionState, today: NaiveDate) -> Frame {
        let FilterOutcome {
            view,
            range,
            warning,
        } = self.filter(session, today);

        session.navigator.reconcile(view.len());
        let navigator = &session.navigator;
        let current = navigator.incident();

        let mut warnings = Vec::new();
        if let Some(warning) = warning {
            warnings.push(FrameWarning::RangeTooLong {
                message: warning.to_string(),
            });
        }

        let panel = self
            .settings
            .panels
            .get(navigator.panel())
            .cloned()
            .unwrap_or(Panel::Map);

        let mut map = None;
        let mut detail = None;
        if panel == Panel::Map {
            if view.is_empty() {
                warnings.push(FrameWarning::EmptyView {
                    message: EMPTY_VIEW_MESSAGE.to_string(),
                });
            } else {
                let (scene, row_warnings) =
                    scene::build_scene(&view, current, session.zoom, self.overlay.clone());
                warnings.extend(row_warnings);
                map = Some(scene);
                detail = detail::detail_panel(&view, current, &self.settings.first_incident_label);
            }
        }

        let on_map = map.is_some();
        let buttons = NavigationButtons {
            previous_incident: on_map && navigator.can_retreat_incident(),
            next_incident: on_map && navigator.can_advance_incident(view.len()),
            previous_panel: navigator.can_retreat_panel(),
            next_panel: navigator.can_advance_panel(),
        };

        Frame {
            header: Header {
                title: self.settings.title.clone(),
                subtitle: self.settings.subtitle.clone(),
            },
            panel_index: navigator.panel(),
            panel_count: navigator.panel_count(),
            panel,
            sidebar: self.sidebar.clone(),
            selection: session.selection.clone(),
            range,
            view_len: view.len(),
            incident_index: current,
            map,
            detail,
            buttons,
            warnings,
        }
    }
}
