#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime incident record and source column definitions.
//!
//! This crate defines the canonical incident row shared by the loader, the
//! filter engine and the presentation layer. Records are built once at load
//! time and never mutated afterwards; filtered views are fresh copies.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Placeholder shown wherever a value is missing.
pub const NOT_AVAILABLE: &str = "N/A";

/// Display format for occurrence dates (`dd/mm/yyyy`).
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

/// Columns that every incidents file must provide.
///
/// The string form of each variant is the exact header name expected in the
/// source file (e.g. `DESCR_NATUREZA_PRINCIPAL`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentColumn {
    /// Latitude, possibly with a comma decimal separator
    Latitude,
    /// Longitude, possibly with a comma decimal separator
    Longitude,
    /// Occurrence date, day-first
    DataFato,
    /// Primary nature of the crime
    DescrNaturezaPrincipal,
    /// Municipality where the incident happened
    Municipio,
    /// Presumed cause
    CausaPresumida,
    /// Description of the immediate location
    DescricaoLocalImediato,
    /// Free-text synopsis of the incident
    Sintese,
}

impl IncidentColumn {
    /// Returns all required columns.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Latitude,
            Self::Longitude,
            Self::DataFato,
            Self::DescrNaturezaPrincipal,
            Self::Municipio,
            Self::CausaPresumida,
            Self::DescricaoLocalImediato,
            Self::Sintese,
        ]
    }
}

/// A single validated crime incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Dense row position within the table or view holding this record.
    pub id: usize,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// When the incident occurred, if the source value could be parsed.
    pub occurred_at: Option<NaiveDateTime>,
    /// Primary nature category (`DESCR_NATUREZA_PRINCIPAL`).
    pub category: String,
    /// Municipality (`MUNICIPIO`).
    pub municipality: String,
    /// Presumed cause (`CAUSA_PRESUMIDA`).
    pub presumed_cause: String,
    /// Immediate location description (`DESCRICAO_LOCAL_IMEDIATO`).
    pub location: String,
    /// Free-text synopsis (`SINTESE`).
    pub synopsis: String,
}

impl Incident {
    /// Calendar day of the occurrence.
    #[must_use]
    pub fn occurred_on(&self) -> Option<NaiveDate> {
        self.occurred_at.map(|dt| dt.date())
    }

    /// Occurrence date formatted as `dd/mm/yyyy`, or [`NOT_AVAILABLE`].
    #[must_use]
    pub fn display_date(&self) -> String {
        format_date(self.occurred_at)
    }

    /// Whether both coordinates are finite numbers.
    #[must_use]
    pub const fn has_finite_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Formats an optional timestamp as `dd/mm/yyyy`, or [`NOT_AVAILABLE`].
#[must_use]
pub fn format_date(value: Option<NaiveDateTime>) -> String {
    value.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |dt| dt.format(DISPLAY_DATE_FORMAT).to_string(),
    )
}

/// Orders incidents by occurrence time ascending, undated incidents last.
#[must_use]
pub fn chronological(a: &Incident, b: &Incident) -> Ordering {
    match (a.occurred_at, b.occurred_at) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Renumbers `id` densely from zero following the current order.
pub fn renumber(incidents: &mut [Incident]) {
    for (i, incident) in incidents.iter_mut().enumerate() {
        incident.id = i;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(id: usize, ts: Option<&str>) -> Incident {
        Incident {
            id,
            latitude: -19.9,
            longitude: -43.9,
            occurred_at: ts.map(|s| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
            }),
            category: "HOMICIDIO".to_string(),
            municipality: "BETIM".to_string(),
            presumed_cause: String::new(),
            location: String::new(),
            synopsis: String::new(),
        }
    }

    #[test]
    fn column_names_match_source_headers() {
        let names: Vec<String> = IncidentColumn::all()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            names,
            vec![
                "LATITUDE",
                "LONGITUDE",
                "DATA_FATO",
                "DESCR_NATUREZA_PRINCIPAL",
                "MUNICIPIO",
                "CAUSA_PRESUMIDA",
                "DESCRICAO_LOCAL_IMEDIATO",
                "SINTESE",
            ]
        );
        assert_eq!(
            "CAUSA_PRESUMIDA".parse::<IncidentColumn>().unwrap(),
            IncidentColumn::CausaPresumida
        );
    }

    #[test]
    fn chronological_puts_undated_last() {
        let mut rows = vec![
            incident(0, None),
            incident(1, Some("2025-03-01 10:00:00")),
            incident(2, Some("2025-01-15 08:30:00")),
        ];
        rows.sort_by(chronological);
        renumber(&mut rows);

        assert_eq!(rows[0].display_date(), "15/01/2025");
        assert_eq!(rows[1].display_date(), "01/03/2025");
        assert_eq!(rows[2].display_date(), NOT_AVAILABLE);
        assert_eq!(
            rows.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn detects_non_finite_coordinates() {
        let mut row = incident(0, None);
        assert!(row.has_finite_coordinates());
        row.longitude = f64::NAN;
        assert!(!row.has_finite_coordinates());
    }
}
