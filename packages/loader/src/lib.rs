#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incidents file loader.
//!
//! Reads a delimited text file, checks that every required column is
//! present, coerces dates and coordinates, drops rows without usable
//! coordinates, restricts the table to a trailing recency window and returns
//! it sorted chronologically with undated rows last.
//!
//! [`IncidentCache`] memoizes loads by path so repeated renders never touch
//! the file again.

pub mod cache;
pub mod parsing;
pub mod recency;

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crime_tour_incident_models::{Incident, IncidentColumn, chronological, renumber};

pub use cache::IncidentCache;
pub use recency::{DEFAULT_RECENCY_MONTHS, UndatedPolicy};

use crate::parsing::{parse_day_first, parse_decimal};
use crate::recency::apply_recency_window;

/// A loaded, immutable incident table shared between consumers.
pub type IncidentTable = Arc<[Incident]>;

/// Default field delimiter of the incidents export.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Errors that can occur while loading an incidents file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The delimited text is malformed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// One or more required columns are absent from the header row.
    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        /// Every absent column, sorted by name.
        columns: Vec<String>,
    },

    /// No incident survived validation and the recency window.
    #[error("No valid incidents left after filtering the last {months} months")]
    Empty {
        /// Window length that was applied.
        months: u32,
    },
}

/// Settings for a single load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Field delimiter byte.
    delimiter: u8,
    /// Length of the trailing recency window in months.
    recency_months: u32,
    /// Treatment of undated rows once the window applies.
    undated_policy: UndatedPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadOptions {
    /// Semicolon-delimited, six-month window, undated rows dropped.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            recency_months: DEFAULT_RECENCY_MONTHS,
            undated_policy: UndatedPolicy::DropWhenWindowed,
        }
    }

    /// Sets the field delimiter (e.g. `b','` for comma-separated files).
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the recency window length in months.
    #[must_use]
    pub const fn with_recency_months(mut self, months: u32) -> Self {
        self.recency_months = months;
        self
    }

    /// Sets how undated rows are treated by the recency window.
    #[must_use]
    pub const fn with_undated_policy(mut self, policy: UndatedPolicy) -> Self {
        self.undated_policy = policy;
        self
    }

    #[must_use]
    pub const fn delimiter(&self) -> u8 {
        self.delimiter
    }

    #[must_use]
    pub const fn recency_months(&self) -> u32 {
        self.recency_months
    }

    #[must_use]
    pub const fn undated_policy(&self) -> UndatedPolicy {
        self.undated_policy
    }
}

/// Header positions of the required columns.
struct ColumnIndex {
    positions: BTreeMap<IncidentColumn, usize>,
}

impl ColumnIndex {
    /// Locates every required column in `headers` (already trimmed).
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let mut positions = BTreeMap::new();
        let mut missing = Vec::new();

        for column in IncidentColumn::all() {
            match headers.iter().position(|h| h == column.as_ref()) {
                Some(pos) => {
                    positions.insert(*column, pos);
                }
                None => missing.push(column.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(Self { positions })
        } else {
            missing.sort();
            Err(LoadError::MissingColumns { columns: missing })
        }
    }

    fn field<'a>(&self, record: &'a csv::StringRecord, column: IncidentColumn) -> &'a str {
        self.positions
            .get(&column)
            .and_then(|&pos| record.get(pos))
            .unwrap_or("")
    }

    fn text(&self, record: &csv::StringRecord, column: IncidentColumn) -> String {
        self.field(record, column).trim().to_owned()
    }
}

/// Loads and validates the incidents file at `path`.
///
/// # Errors
///
/// * [`LoadError::Io`] if the file cannot be opened
/// * [`LoadError::MissingColumns`] naming every absent required column
/// * [`LoadError::Csv`] if the text is malformed
/// * [`LoadError::Empty`] if nothing survives validation and the window
pub fn load_incidents(path: &Path, options: &LoadOptions) -> Result<Vec<Incident>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    log::debug!("Loading incidents from {}", path.display());
    let incidents = load_from_reader(file, options)?;
    log::info!(
        "Loaded {} incidents from {}",
        incidents.len(),
        path.display()
    );

    Ok(incidents)
}

/// Loads and validates incidents from any reader.
///
/// # Errors
///
/// Same as [`load_incidents`], minus the open failure.
pub fn load_from_reader<R: Read>(
    reader: R,
    options: &LoadOptions,
) -> Result<Vec<Incident>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let columns = ColumnIndex::resolve(&headers)?;

    let mut incidents = Vec::new();
    let mut dropped = 0_usize;
    let mut undated = 0_usize;

    for result in reader.records() {
        let record = result?;

        let latitude = parse_decimal(columns.field(&record, IncidentColumn::Latitude));
        let longitude = parse_decimal(columns.field(&record, IncidentColumn::Longitude));
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            dropped += 1;
            continue;
        };

        let occurred_at = parse_day_first(columns.field(&record, IncidentColumn::DataFato));
        if occurred_at.is_none() {
            undated += 1;
        }

        incidents.push(Incident {
            id: incidents.len(),
            latitude,
            longitude,
            occurred_at,
            category: columns.text(&record, IncidentColumn::DescrNaturezaPrincipal),
            municipality: columns.text(&record, IncidentColumn::Municipio),
            presumed_cause: columns.text(&record, IncidentColumn::CausaPresumida),
            location: columns.text(&record, IncidentColumn::DescricaoLocalImediato),
            synopsis: columns.text(&record, IncidentColumn::Sintese),
        });
    }

    if dropped > 0 {
        log::warn!("Dropped {dropped} rows without valid coordinates");
    }
    if undated > 0 {
        log::debug!("{undated} rows have an unparseable DATA_FATO");
    }

    let mut incidents =
        apply_recency_window(incidents, options.recency_months, options.undated_policy);

    if incidents.is_empty() {
        return Err(LoadError::Empty {
            months: options.recency_months,
        });
    }

    incidents.sort_by(chronological);
    renumber(&mut incidents);

    Ok(incidents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "LATITUDE;LONGITUDE;DATA_FATO;DESCR_NATUREZA_PRINCIPAL;MUNICIPIO;\
                          CAUSA_PRESUMIDA;DESCRICAO_LOCAL_IMEDIATO;SINTESE";

    fn load(body: &str) -> Result<Vec<Incident>, LoadError> {
        let text = format!("{HEADER}\n{body}");
        load_from_reader(text.as_bytes(), &LoadOptions::default())
    }

    #[test]
    fn loads_and_sorts_rows() {
        let rows = load(
            "-19,95;-44,19;20/06/2025 22:10;HOMICIDIO;BETIM;ARMA DE FOGO;VIA PUBLICA;Vitima alvejada\n\
             -19,93;-44,05;02/06/2025;ROUBO;CONTAGEM;DESCONHECIDA;RESIDENCIA;Assalto\n",
        )
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].category, "ROUBO");
        assert_eq!(rows[0].id, 0);
        assert_eq!(rows[1].category, "HOMICIDIO");
        assert_eq!(rows[1].id, 1);
        assert!((rows[1].latitude - -19.95).abs() < f64::EPSILON);
        assert_eq!(rows[1].display_date(), "20/06/2025");
    }

    #[test]
    fn trims_header_whitespace() {
        let text = " LATITUDE ; LONGITUDE ;DATA_FATO;DESCR_NATUREZA_PRINCIPAL;MUNICIPIO ;\
                    CAUSA_PRESUMIDA;DESCRICAO_LOCAL_IMEDIATO;SINTESE \n\
                    -19.9;-43.9;01/05/2025;FURTO;BETIM;;;\n";
        let rows = load_from_reader(text.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].municipality, "BETIM");
    }

    #[test]
    fn reports_every_missing_column() {
        let text = "LATITUDE;LONGITUDE;DATA_FATO;MUNICIPIO;CAUSA_PRESUMIDA\n";
        let err = load_from_reader(text.as_bytes(), &LoadOptions::default()).unwrap_err();

        match err {
            LoadError::MissingColumns { columns } => assert_eq!(
                columns,
                vec![
                    "DESCRICAO_LOCAL_IMEDIATO",
                    "DESCR_NATUREZA_PRINCIPAL",
                    "SINTESE",
                ]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_columns_message_names_fields() {
        let err = LoadError::MissingColumns {
            columns: vec!["MUNICIPIO".to_string(), "SINTESE".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required columns: MUNICIPIO, SINTESE"
        );
    }

    #[test]
    fn drops_rows_without_coordinates() {
        let rows = load(
            ";-44,19;20/06/2025;HOMICIDIO;BETIM;;;\n\
             abc;-44,19;20/06/2025;HOMICIDIO;BETIM;;;\n\
             -19,93;-44,05;02/06/2025;ROUBO;CONTAGEM;;;\n",
        )
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert!(
            rows.iter()
                .all(|r| r.latitude.is_finite() && r.longitude.is_finite())
        );
    }

    #[test]
    fn unparseable_dates_become_null_then_fall_outside_window() {
        let rows = load(
            "-19,93;-44,05;quando?;ROUBO;CONTAGEM;;;\n\
             -19,95;-44,19;20/06/2025;HOMICIDIO;BETIM;;;\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "HOMICIDIO");
    }

    #[test]
    fn keeps_undated_rows_without_any_dates() {
        let rows = load(
            "-19,93;-44,05;;ROUBO;CONTAGEM;;;\n\
             -19,95;-44,19;n/d;HOMICIDIO;BETIM;;;\n",
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.occurred_at.is_none()));
        assert_eq!(rows[0].category, "ROUBO");
    }

    #[test]
    fn keep_policy_sorts_undated_last() {
        let text = format!(
            "{HEADER}\n-19,93;-44,05;;ROUBO;CONTAGEM;;;\n-19,95;-44,19;20/06/2025;HOMICIDIO;BETIM;;;\n"
        );
        let options = LoadOptions::default().with_undated_policy(UndatedPolicy::Keep);
        let rows = load_from_reader(text.as_bytes(), &options).unwrap();

        assert_eq!(rows.len(), 2);
        assert!(rows[0].occurred_at.is_some());
        assert!(rows[1].occurred_at.is_none());
    }

    #[test]
    fn applies_six_month_window() {
        let rows = load(
            "-19,9;-44,0;30/06/2025;A;BETIM;;;\n\
             -19,9;-44,0;31/12/2024;B;BETIM;;;\n\
             -19,9;-44,0;29/12/2024;C;BETIM;;;\n\
             -19,9;-44,0;15/10/2024;D;BETIM;;;\n",
        )
        .unwrap();

        let categories: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["B", "A"]);
    }

    #[test]
    fn empty_after_validation_is_an_error() {
        let err = load(";;20/06/2025;HOMICIDIO;BETIM;;;\n").unwrap_err();
        assert!(matches!(err, LoadError::Empty { months: 6 }));
    }

    #[test]
    fn honours_custom_delimiter() {
        let text = "LATITUDE,LONGITUDE,DATA_FATO,DESCR_NATUREZA_PRINCIPAL,MUNICIPIO,\
                    CAUSA_PRESUMIDA,DESCRICAO_LOCAL_IMEDIATO,SINTESE,EXTRA\n\
                    -19.9,-43.9,01/05/2025,FURTO,BETIM,,,,ignored\n";
        let options = LoadOptions::default().with_delimiter(b',');
        let rows = load_from_reader(text.as_bytes(), &options).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category, "FURTO");
    }

    #[test]
    fn tolerates_short_rows() {
        let rows = load("-19,9;-43,9;01/05/2025;FURTO\n").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].municipality, "");
        assert_eq!(rows[0].synopsis, "");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_incidents(
            Path::new("/nonexistent/relatorio.csv"),
            &LoadOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
