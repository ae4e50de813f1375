#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Sidebar filtering of the incident table.
//!
//! [`apply_filters`] is a pure function from the base table and the current
//! selections to a fresh filtered view. Category and municipality filters
//! are set membership tests (an empty set selects nothing) and the date
//! filter is inclusive on both ends at day granularity.

pub mod period;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use crime_tour_incident_models::{Incident, chronological, renumber};
use serde::{Deserialize, Serialize};

pub use period::{DateRange, MAX_MANUAL_SPAN_DAYS, PeriodPreset, PeriodSelection, RangeWarning};

/// Narrows `table` to incidents in the selected categories and
/// municipalities whose occurrence day falls within `range`.
///
/// Undated incidents never match a date range. The result is sorted by
/// occurrence time whatever the order of `table`, and its ids are
/// renumbered from zero.
#[must_use]
pub fn apply_filters(
    table: &[Incident],
    categories: &BTreeSet<String>,
    municipalities: &BTreeSet<String>,
    range: DateRange,
) -> Vec<Incident> {
    let mut view: Vec<Incident> = table
        .iter()
        .filter(|i| categories.contains(&i.category))
        .filter(|i| municipalities.contains(&i.municipality))
        .filter(|i| i.occurred_on().is_some_and(|day| range.contains(day)))
        .cloned()
        .collect();

    view.sort_by(chronological);
    renumber(&mut view);
    view
}

/// Everything the sidebar currently has selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    pub categories: BTreeSet<String>,
    pub municipalities: BTreeSet<String>,
    pub period: PeriodSelection,
}

/// Result of applying a [`FilterSelection`].
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    /// The filtered view.
    pub view: Vec<Incident>,
    /// The concrete range that was applied.
    pub range: DateRange,
    /// Validation warning for the range, if any.
    pub warning: Option<RangeWarning>,
}

impl FilterSelection {
    /// Resolves the period against `today` and filters `table`.
    #[must_use]
    pub fn apply(&self, table: &[Incident], today: NaiveDate) -> FilterOutcome {
        let (range, warning) = self.period.resolve(today);
        let view = apply_filters(table, &self.categories, &self.municipalities, range);

        log::debug!(
            "Filtered {} of {} incidents for {} ..= {}",
            view.len(),
            table.len(),
            range.start,
            range.end
        );

        FilterOutcome {
            view,
            range,
            warning,
        }
    }
}

/// Values offered by the sidebar widgets for a given table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarOptions {
    /// Distinct categories, sorted.
    pub categories: Vec<String>,
    /// Distinct municipalities, sorted.
    pub municipalities: Vec<String>,
    /// Earliest occurrence day in the table.
    pub min_date: Option<NaiveDate>,
    /// Latest occurrence day in the table.
    pub max_date: Option<NaiveDate>,
}

impl SidebarOptions {
    #[must_use]
    pub fn from_table(table: &[Incident]) -> Self {
        let categories: BTreeSet<&str> = table.iter().map(|i| i.category.as_str()).collect();
        let municipalities: BTreeSet<&str> =
            table.iter().map(|i| i.municipality.as_str()).collect();
        let days = || table.iter().filter_map(Incident::occurred_on);

        Self {
            categories: categories.into_iter().map(str::to_owned).collect(),
            municipalities: municipalities.into_iter().map(str::to_owned).collect(),
            min_date: days().min(),
            max_date: days().max(),
        }
    }

    /// The initial selection: everything selected, the first preset, and
    /// manual pickers spanning the table (or `today` when it has no dates).
    #[must_use]
    pub fn default_selection(&self, today: NaiveDate) -> FilterSelection {
        FilterSelection {
            categories: self.categories.iter().cloned().collect(),
            municipalities: self.municipalities.iter().cloned().collect(),
            period: PeriodSelection {
                preset: PeriodPreset::default(),
                manual_start: self.min_date.unwrap_or(today),
                manual_end: self.max_date.unwrap_or(today),
            },
        }
    }
}
