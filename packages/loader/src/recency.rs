//! Trailing recency window anchored at the newest incident.

use chrono::{Months, NaiveDateTime};
use crime_tour_incident_models::Incident;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default window length in calendar months.
pub const DEFAULT_RECENCY_MONTHS: u32 = 6;

/// What happens to undated incidents once the recency window is active.
///
/// The window only activates when at least one incident carries a
/// timestamp. Without any timestamps every row is kept regardless of
/// policy.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UndatedPolicy {
    /// Undated rows fail the `timestamp >= cutoff` test and are removed.
    #[default]
    DropWhenWindowed,
    /// Undated rows survive the window and sort last.
    Keep,
}

/// Earliest timestamp retained for a dataset whose newest incident is
/// `newest`.
#[must_use]
pub fn window_cutoff(newest: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    newest.checked_sub_months(Months::new(months))
}

/// Keeps only incidents inside the trailing `months` window ending at the
/// newest timestamp in `incidents`.
#[must_use]
pub fn apply_recency_window(
    incidents: Vec<Incident>,
    months: u32,
    policy: UndatedPolicy,
) -> Vec<Incident> {
    let Some(newest) = incidents.iter().filter_map(|i| i.occurred_at).max() else {
        log::debug!("No dated incidents, recency window skipped");
        return incidents;
    };
    let Some(cutoff) = window_cutoff(newest, months) else {
        return incidents;
    };

    let before = incidents.len();
    let kept: Vec<Incident> = incidents
        .into_iter()
        .filter(|incident| match incident.occurred_at {
            Some(ts) => ts >= cutoff,
            None => policy == UndatedPolicy::Keep,
        })
        .collect();

    log::debug!(
        "Recency window {cutoff} ..= {newest} kept {} of {before} incidents",
        kept.len()
    );

    kept
}
