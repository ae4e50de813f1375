#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cursor state machine for the incident presentation.
//!
//! A [`Navigator`] holds two bounded cursors: the panel cursor over the
//! top-level content panels and the incident cursor over the current
//! filtered view. Both move one step at a time through explicit actions,
//! except that a marker click jumps the incident cursor straight to the
//! clicked index. Actions at a boundary are rejected rather than clamped;
//! callers are expected to consult the `can_*` methods first, the same way
//! a UI disables its buttons.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which of the two cursors an action moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CursorKind {
    Panel,
    Incident,
}

/// Direction of a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Backward,
    Forward,
}

/// The four button actions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NavAction {
    /// "Avançar": next incident in the view.
    NextIncident,
    /// "Voltar": previous incident in the view.
    PreviousIncident,
    /// "Próximo": next top-level panel.
    NextPanel,
    /// "Anterior": previous top-level panel.
    PreviousPanel,
}

impl NavAction {
    #[must_use]
    pub const fn cursor(self) -> CursorKind {
        match self {
            Self::NextIncident | Self::PreviousIncident => CursorKind::Incident,
            Self::NextPanel | Self::PreviousPanel => CursorKind::Panel,
        }
    }

    #[must_use]
    pub const fn direction(self) -> Direction {
        match self {
            Self::NextIncident | Self::NextPanel => Direction::Forward,
            Self::PreviousIncident | Self::PreviousPanel => Direction::Backward,
        }
    }
}

/// Arrow keys captured by the keyboard bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum ArrowKey {
    ArrowLeft,
    ArrowRight,
}

impl ArrowKey {
    /// Panel action bound to this key.
    #[must_use]
    pub const fn action(self) -> NavAction {
        match self {
            Self::ArrowLeft => NavAction::PreviousPanel,
            Self::ArrowRight => NavAction::NextPanel,
        }
    }
}

/// Outcome of an accepted event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// State changed and the frame must be re-rendered.
    Rerender,
    /// Nothing changed.
    Unchanged,
}

/// Rejected navigation events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// The cursor is already at the boundary in the requested direction.
    #[error("Cannot move the {cursor} cursor {direction}: at position {index} of {len}")]
    AtBoundary {
        cursor: CursorKind,
        direction: Direction,
        index: usize,
        len: usize,
    },

    /// A marker index outside the current view.
    #[error("Marker {index} is outside the current view of {len} incidents")]
    OutOfRange { index: usize, len: usize },

    /// An incident action while the current panel does not show the map.
    #[error("Panel {panel} does not show the map; incident navigation is disabled")]
    MapHidden { panel: usize },
}

/// The (panel, incident) cursor pair. Initial state is `(0, 0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    panel: usize,
    incident: usize,
    panel_count: usize,
}

impl Navigator {
    /// Creates a navigator over `panel_count` panels (at least one).
    #[must_use]
    pub fn new(panel_count: usize) -> Self {
        Self {
            panel: 0,
            incident: 0,
            panel_count: panel_count.max(1),
        }
    }

    #[must_use]
    pub const fn panel(&self) -> usize {
        self.panel
    }

    #[must_use]
    pub const fn incident(&self) -> usize {
        self.incident
    }

    #[must_use]
    pub const fn panel_count(&self) -> usize {
        self.panel_count
    }

    #[must_use]
    pub const fn can_retreat_panel(&self) -> bool {
        self.panel > 0
    }

    #[must_use]
    pub const fn can_advance_panel(&self) -> bool {
        self.panel + 1 < self.panel_count
    }

    #[must_use]
    pub const fn can_retreat_incident(&self) -> bool {
        self.incident > 0
    }

    #[must_use]
    pub const fn can_advance_incident(&self, view_len: usize) -> bool {
        self.incident + 1 < view_len
    }

    /// Whether `action` is currently enabled.
    #[must_use]
    pub const fn can(&self, action: NavAction, view_len: usize) -> bool {
        match action {
            NavAction::NextIncident => self.can_advance_incident(view_len),
            NavAction::PreviousIncident => self.can_retreat_incident(),
            NavAction::NextPanel => self.can_advance_panel(),
            NavAction::PreviousPanel => self.can_retreat_panel(),
        }
    }

    /// Applies a button action against a view of `view_len` incidents.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::AtBoundary`] if the action is disabled.
    pub fn apply(&mut self, action: NavAction, view_len: usize) -> Result<Transition, NavError> {
        if !self.can(action, view_len) {
            let (index, len) = match action.cursor() {
                CursorKind::Panel => (self.panel, self.panel_count),
                CursorKind::Incident => (self.incident, view_len),
            };
            return Err(NavError::AtBoundary {
                cursor: action.cursor(),
                direction: action.direction(),
                index,
                len,
            });
        }

        match action {
            NavAction::NextIncident => self.incident += 1,
            NavAction::PreviousIncident => self.incident -= 1,
            NavAction::NextPanel => self.panel += 1,
            NavAction::PreviousPanel => self.panel -= 1,
        }

        log::debug!(
            "{action}: panel={} incident={}",
            self.panel,
            self.incident
        );

        Ok(Transition::Rerender)
    }

    /// Jumps the incident cursor to a clicked marker.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::OutOfRange`] if `index >= view_len`.
    pub fn select_marker(&mut self, index: usize, view_len: usize) -> Result<Transition, NavError> {
        if index >= view_len {
            return Err(NavError::OutOfRange {
                index,
                len: view_len,
            });
        }
        if index == self.incident {
            return Ok(Transition::Unchanged);
        }

        log::debug!("Marker click: incident {} -> {index}", self.incident);
        self.incident = index;
        Ok(Transition::Rerender)
    }

    /// Handles a key name from the keyboard bridge.
    ///
    /// Arrow keys move the panel cursor. Key capture is best-effort, so
    /// unknown keys and keys pressed at a boundary are ignored.
    pub fn handle_key(&mut self, key: &str) -> Transition {
        let Ok(arrow) = key.parse::<ArrowKey>() else {
            return Transition::Unchanged;
        };
        let action = arrow.action();
        if self.can(action, 0) {
            self.apply(action, 0).unwrap_or(Transition::Unchanged)
        } else {
            Transition::Unchanged
        }
    }

    /// Resets the incident cursor to 0 if the view shrank below it.
    ///
    /// Returns `true` when the cursor was reset. Must run before every
    /// render so the cursor always indexes the current view.
    pub fn reconcile(&mut self, view_len: usize) -> bool {
        if self.incident >= view_len && self.incident != 0 {
            log::debug!(
                "View shrank to {view_len}, resetting incident cursor from {}",
                self.incident
            );
            self.incident = 0;
            return true;
        }
        false
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_origin_with_backward_moves_disabled() {
        let nav = Navigator::new(3);
        assert_eq!((nav.panel(), nav.incident()), (0, 0));
        assert!(!nav.can_retreat_panel());
        assert!(!nav.can_retreat_incident());
        assert!(nav.can_advance_panel());
        assert!(nav.can_advance_incident(5));
    }

    #[test]
    fn steps_incident_cursor_one_at_a_time() {
        let mut nav = Navigator::default();
        assert_eq!(nav.apply(NavAction::NextIncident, 3), Ok(Transition::Rerender));
        assert_eq!(nav.apply(NavAction::NextIncident, 3), Ok(Transition::Rerender));
        assert_eq!(nav.incident(), 2);
        assert!(!nav.can_advance_incident(3));
        assert_eq!(nav.apply(NavAction::PreviousIncident, 3), Ok(Transition::Rerender));
        assert_eq!(nav.incident(), 1);
    }

    #[test]
    fn rejects_moves_past_boundaries() {
        let mut nav = Navigator::default();
        assert_eq!(
            nav.apply(NavAction::PreviousIncident, 3),
            Err(NavError::AtBoundary {
                cursor: CursorKind::Incident,
                direction: Direction::Backward,
                index: 0,
                len: 3,
            })
        );
        assert!(matches!(
            nav.apply(NavAction::NextPanel, 3),
            Err(NavError::AtBoundary {
                cursor: CursorKind::Panel,
                ..
            })
        ));
        assert!(nav.apply(NavAction::NextIncident, 1).is_err());
        assert!(nav.apply(NavAction::NextIncident, 0).is_err());
        assert_eq!((nav.panel(), nav.incident()), (0, 0));
    }

    #[test]
    fn marker_click_jumps_directly() {
        let mut nav = Navigator::default();
        assert_eq!(nav.select_marker(7, 10), Ok(Transition::Rerender));
        assert_eq!(nav.incident(), 7);
        assert_eq!(nav.select_marker(2, 10), Ok(Transition::Rerender));
        assert_eq!(nav.incident(), 2);
    }

    #[test]
    fn clicking_current_marker_changes_nothing() {
        let mut nav = Navigator::default();
        nav.select_marker(4, 10).unwrap();
        assert_eq!(nav.select_marker(4, 10), Ok(Transition::Unchanged));
        assert_eq!(nav.incident(), 4);
    }

    #[test]
    fn marker_outside_view_is_rejected() {
        let mut nav = Navigator::default();
        assert_eq!(
            nav.select_marker(5, 5),
            Err(NavError::OutOfRange { index: 5, len: 5 })
        );
        assert_eq!(nav.incident(), 0);
    }

    #[test]
    fn arrow_keys_move_only_the_panel_cursor() {
        let mut nav = Navigator::new(2);
        nav.select_marker(3, 10).unwrap();

        assert_eq!(nav.handle_key("ArrowRight"), Transition::Rerender);
        assert_eq!((nav.panel(), nav.incident()), (1, 3));

        assert_eq!(nav.handle_key("ArrowRight"), Transition::Unchanged);
        assert_eq!(nav.panel(), 1);

        assert_eq!(nav.handle_key("ArrowLeft"), Transition::Rerender);
        assert_eq!(nav.handle_key("ArrowLeft"), Transition::Unchanged);
        assert_eq!((nav.panel(), nav.incident()), (0, 3));
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut nav = Navigator::new(2);
        assert_eq!(nav.handle_key("Enter"), Transition::Unchanged);
        assert_eq!(nav.handle_key(""), Transition::Unchanged);
        assert_eq!(nav.panel(), 0);
    }

    #[test]
    fn shrinking_view_resets_cursor() {
        let mut nav = Navigator::default();
        nav.select_marker(3, 10).unwrap();

        assert!(nav.reconcile(2));
        assert_eq!(nav.incident(), 0);
        assert!(nav.incident() < 2);
    }

    #[test]
    fn reconcile_keeps_cursor_still_in_range() {
        let mut nav = Navigator::default();
        nav.select_marker(3, 10).unwrap();
        assert!(!nav.reconcile(4));
        assert_eq!(nav.incident(), 3);
    }

    #[test]
    fn reconcile_on_empty_view_leaves_zero() {
        let mut nav = Navigator::default();
        assert!(!nav.reconcile(0));
        assert_eq!(nav.incident(), 0);
    }

    #[test]
    fn actions_parse_from_route_segments() {
        assert_eq!(
            "next-incident".parse::<NavAction>().unwrap(),
            NavAction::NextIncident
        );
        assert_eq!(NavAction::PreviousPanel.to_string(), "previous-panel");
        assert!("sideways".parse::<NavAction>().is_err());
    }

    #[test]
    fn boundary_error_message_is_descriptive() {
        let err = NavError::AtBoundary {
            cursor: CursorKind::Panel,
            direction: Direction::Forward,
            index: 0,
            len: 1,
        };
        assert_eq!(
            err.to_string(),
            "Cannot move the panel cursor forward: at position 0 of 1"
        );
    }
}
