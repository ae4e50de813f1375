#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Presentation configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working presentation over `relatorio_estatisticas_reds.csv` in the
//! current directory. Relative paths in a config file are resolved against
//! the directory containing that file.

use std::path::{Path, PathBuf};

use crime_tour_loader::{DEFAULT_RECENCY_MONTHS, LoadOptions, UndatedPolicy};
use crime_tour_presentation_models::Panel;
use serde::Deserialize;

/// Default incidents export file name.
pub const DEFAULT_INCIDENTS_PATH: &str = "relatorio_estatisticas_reds.csv";

/// Default boundary file name.
pub const DEFAULT_BOUNDARIES_PATH: &str = "limites_municipais.geojson";

/// Default map zoom level.
pub const DEFAULT_BASE_ZOOM: u8 = 10;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`PresentationConfig`].
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is syntactically valid but unusable.
    #[error("Invalid configuration: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// Settings for one presentation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Incidents export to load.
    pub incidents_path: PathBuf,
    /// Optional `GeoJSON` boundary file drawn under the markers.
    pub boundaries_path: Option<PathBuf>,
    /// Field delimiter, a single ASCII character.
    pub delimiter: char,
    /// Length of the trailing recency window.
    pub recency_months: u32,
    /// Treatment of undated rows by the recency window.
    pub undated_policy: UndatedPolicy,
    /// Initial map zoom.
    pub base_zoom: u8,
    /// Page title.
    pub title: String,
    /// Page subtitle.
    pub subtitle: String,
    /// Interval text shown for the first incident of the view.
    pub first_incident_label: String,
    /// Top-level panels in presentation order.
    pub panels: Vec<Panel>,
    /// Directory of static frontend files served at `/`.
    pub static_dir: Option<PathBuf>,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            incidents_path: PathBuf::from(DEFAULT_INCIDENTS_PATH),
            boundaries_path: Some(PathBuf::from(DEFAULT_BOUNDARIES_PATH)),
            delimiter: ';',
            recency_months: DEFAULT_RECENCY_MONTHS,
            undated_policy: UndatedPolicy::default(),
            base_zoom: DEFAULT_BASE_ZOOM,
            title: "GDO - 1º SEMESTRE 2025".to_string(),
            subtitle: "Análise do indíce de Morte Violenta - 43º BPM".to_string(),
            first_incident_label: "Primeira MV 2025".to_string(),
            panels: vec![Panel::Map],
            static_dir: None,
        }
    }
}

impl PresentationConfig {
    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a non-ASCII delimiter, an empty
    /// panel list or a zero-month window.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.delimiter.is_ascii() {
            return Err(ConfigError::Invalid {
                message: format!("delimiter '{}' is not a single ASCII byte", self.delimiter),
            });
        }
        if self.panels.is_empty() {
            return Err(ConfigError::Invalid {
                message: "at least one panel is required".to_string(),
            });
        }
        if self.recency_months == 0 {
            return Err(ConfigError::Invalid {
                message: "recency_months must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Delimiter as a byte. Only meaningful after [`Self::validate`].
    #[must_use]
    pub fn delimiter_byte(&self) -> u8 {
        u8::try_from(self.delimiter).unwrap_or(b';')
    }

    /// Loader settings derived from this config.
    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::new()
            .with_delimiter(self.delimiter_byte())
            .with_recency_months(self.recency_months)
            .with_undated_policy(self.undated_policy)
    }

    /// Resolves relative file paths against `base`.
    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &Path| {
            if p.is_relative() {
                base.join(p)
            } else {
                p.to_path_buf()
            }
        };
        self.incidents_path = resolve(&self.incidents_path);
        self.boundaries_path = self.boundaries_path.as_deref().map(resolve);
        self.static_dir = self.static_dir.as_deref().map(resolve);
    }
}

/// Parses and validates a [`PresentationConfig`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or a value is invalid.
pub fn parse_config(toml_str: &str) -> Result<PresentationConfig, ConfigError> {
    let config: PresentationConfig = toml::from_str(toml_str)?;
    config.validate()?;
    Ok(config)
}

/// Loads the config at `path`, or the defaults when `path` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
pub fn load_config(path: Option<&Path>) -> Result<PresentationConfig, ConfigError> {
    let Some(path) = path else {
        log::debug!("No config file given, using defaults");
        return Ok(PresentationConfig::default());
    };

    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config = parse_config(&text)?;

    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }

    log::info!("Loaded config from {}", path.display());
    Ok(config)
}
