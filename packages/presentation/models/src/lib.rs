#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Render frame and API types for the incident presentation.
//!
//! A [`Frame`] is everything the rendering surface needs to paint one state
//! of the session: header, current panel, sidebar state, map scene, detail
//! panel, button states and warnings. These types are serialized to JSON
//! for the HTTP API and are kept separate from the domain types so the
//! contract can evolve on its own.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crime_tour_filter::{DateRange, FilterSelection, SidebarOptions};
use crime_tour_geography::BoundaryOverlay;
use serde::{Deserialize, Serialize};

/// Prefix of every marker id emitted to the map.
pub const MARKER_ID_PREFIX: &str = "marker_";

/// A top-level content panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    /// The interactive incident map with its detail panel.
    Map,
    /// A still slide shown full width.
    Image {
        /// Path or URL of the image, passed through to the renderer.
        path: String,
    },
}

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Id of a numbered marker, rendered as `marker_{index}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarkerId(pub usize);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MARKER_ID_PREFIX}{}", self.0)
    }
}

/// Error returned when a clicked object id is not a marker id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMarkerIdError {
    /// The id that was received.
    pub id: String,
}

impl fmt::Display for InvalidMarkerIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid marker id '{}'", self.id)
    }
}

impl std::error::Error for InvalidMarkerIdError {}

impl FromStr for MarkerId {
    type Err = InvalidMarkerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(MARKER_ID_PREFIX)
            .and_then(|index| index.parse().ok())
            .map(Self)
            .ok_or_else(|| InvalidMarkerIdError { id: s.to_string() })
    }
}

/// A numbered circular marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// `marker_{index}`, echoed back on click.
    pub id: String,
    /// 1-based label drawn inside the circle.
    pub number: usize,
    pub position: LatLng,
    /// Whether this is the current incident.
    pub highlighted: bool,
    pub fill_color: String,
    pub text_color: String,
    /// Diameter in pixels.
    pub size: u32,
    pub popup: String,
}

/// The trail through previously visited incidents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Polyline {
    pub path: Vec<LatLng>,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
}

/// Animated dashed segment from the previous to the current incident.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimatedSegment {
    pub from: LatLng,
    pub to: LatLng,
    pub color: String,
    pub weight: f64,
    pub delay_ms: u32,
    pub dash_array: [u32; 2],
}

/// Everything drawn on the map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapScene {
    pub center: LatLng,
    pub zoom: u8,
    pub markers: Vec<Marker>,
    pub visited_path: Option<Polyline>,
    pub animated_segment: Option<AnimatedSegment>,
    pub overlay: Option<Arc<BoundaryOverlay>>,
}

/// Text shown beside the map for the current incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPanel {
    /// 1-based position within the view.
    pub number: usize,
    pub category: String,
    pub municipality: String,
    /// `dd/mm/yyyy` or `N/A`.
    pub date: String,
    /// Days since the previous incident, or the first-incident label.
    pub interval: String,
    pub presumed_cause: String,
    pub location: String,
    pub synopsis: String,
}

/// Enabled state of the four navigation buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationButtons {
    pub previous_incident: bool,
    pub next_incident: bool,
    pub previous_panel: bool,
    pub next_panel: bool,
}

/// Page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub title: String,
    pub subtitle: String,
}

/// Non-fatal problems surfaced alongside a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FrameWarning {
    /// The manual date range is longer than allowed; it was still applied.
    RangeTooLong { message: String },
    /// No incident matches the current filters; the map is omitted.
    EmptyView { message: String },
    /// A single incident could not be drawn and was skipped.
    RowSkipped {
        /// 1-based position of the row within the view.
        row: usize,
        message: String,
    },
}

impl FrameWarning {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::RangeTooLong { message }
            | Self::EmptyView { message }
            | Self::RowSkipped { message, .. } => message,
        }
    }
}

/// One complete render of the session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub header: Header,
    /// Index of the current panel.
    pub panel_index: usize,
    pub panel_count: usize,
    pub panel: Panel,
    /// Values offered by the sidebar widgets.
    pub sidebar: SidebarOptions,
    /// Current sidebar selection.
    pub selection: FilterSelection,
    /// Concrete date range applied by the selection.
    pub range: DateRange,
    /// Number of incidents in the filtered view.
    pub view_len: usize,
    /// Current incident cursor.
    pub incident_index: usize,
    /// Present only for the map panel with a non-empty view.
    pub map: Option<MapScene>,
    /// Present only for the map panel with a non-empty view.
    pub detail: Option<DetailPanel>,
    pub buttons: NavigationButtons,
    pub warnings: Vec<FrameWarning>,
}

/// Body of `POST /api/marker`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerClick {
    /// Id of the clicked map object.
    pub id: String,
}

/// Body of `POST /api/key`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPress {
    /// Key name as reported by the browser, absent when nothing was pressed.
    pub key: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned by the API.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error: String,
}
