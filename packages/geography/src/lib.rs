#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Municipal boundary overlay for the incident map.
//!
//! The overlay is decorative: [`load_overlay`] never fails, it returns
//! `None` when the file is absent or unreadable. [`read_overlay`] keeps the
//! distinction between "no file" (`Ok(None)`) and "broken file" (`Err`) for
//! callers that care.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use geo::BoundingRect;
use geojson::GeoJson;
use serde::Serialize;

/// Layer name shown by the map for the boundary overlay.
pub const OVERLAY_NAME: &str = "Limites Municipais";

/// Errors that can occur while reading a boundary file.
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    /// The file exists but could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    Parse(#[from] geojson::Error),
}

/// Fill and stroke styling applied to every boundary polygon.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayStyle {
    pub fill_color: String,
    pub color: String,
    pub weight: f64,
    pub fill_opacity: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            fill_color: "green".to_string(),
            color: "black".to_string(),
            weight: 1.0,
            fill_opacity: 0.5,
        }
    }
}

/// Bounding box of the overlay in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

/// A parsed boundary file ready to be drawn on the map.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryOverlay {
    /// Layer name.
    pub name: String,
    /// Polygon styling.
    pub style: OverlayStyle,
    /// Bounding box of all geometries, `None` for an empty collection.
    pub bounds: Option<Bounds>,
    /// The boundary geometries as `GeoJSON`.
    pub geojson: GeoJson,
}

impl BoundaryOverlay {
    /// Builds an overlay from parsed `GeoJSON`.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Parse`] if the geometries cannot be converted
    /// for bounds computation.
    pub fn from_geojson(geojson: GeoJson) -> Result<Self, OverlayError> {
        let collection: geo::GeometryCollection<f64> = geojson::quick_collection(&geojson)?;
        let bounds = collection.bounding_rect().map(|rect| Bounds {
            west: rect.min().x,
            south: rect.min().y,
            east: rect.max().x,
            north: rect.max().y,
        });

        Ok(Self {
            name: OVERLAY_NAME.to_string(),
            style: OverlayStyle::default(),
            bounds,
            geojson,
        })
    }
}

/// Reads the boundary file at `path`.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns [`OverlayError`] if the file cannot be read or parsed.
pub fn read_overlay(path: &Path) -> Result<Option<BoundaryOverlay>, OverlayError> {
    if !path.exists() {
        return Ok(None);
    }

    let text = std::fs::read_to_string(path)?;
    let geojson: GeoJson = text.parse()?;
    BoundaryOverlay::from_geojson(geojson).map(Some)
}

/// Best-effort overlay loading: any failure is logged and yields `None`.
#[must_use]
pub fn load_overlay(path: Option<&Path>) -> Option<BoundaryOverlay> {
    let path = path?;
    match read_overlay(path) {
        Ok(Some(overlay)) => {
            log::info!("Loaded boundary overlay from {}", path.display());
            Some(overlay)
        }
        Ok(None) => {
            log::debug!("No boundary file at {}", path.display());
            None
        }
        Err(e) => {
            log::warn!("Ignoring boundary file {}: {e}", path.display());
            None
        }
    }
}

/// Caches successfully loaded overlays by path.
#[derive(Debug, Default)]
pub struct OverlayCache {
    overlays: BTreeMap<PathBuf, Arc<BoundaryOverlay>>,
}

impl OverlayCache {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            overlays: BTreeMap::new(),
        }
    }

    /// Returns the cached overlay for `path`, loading it on first use.
    /// Absent or broken files are retried on the next call.
    pub fn get_or_load(&mut self, path: Option<&Path>) -> Option<Arc<BoundaryOverlay>> {
        let path = path?;
        if let Some(overlay) = self.overlays.get(path) {
            return Some(overlay.clone());
        }

        let overlay = Arc::new(load_overlay(Some(path))?);
        self.overlays.insert(path.to_path_buf(), overlay.clone());
        Some(overlay)
    }
}
