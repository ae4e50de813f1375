//! Analysis period presets and date-range resolution.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Longest manual range accepted without a warning, in days.
pub const MAX_MANUAL_SPAN_DAYS: i64 = 31;

/// Period choices offered by the sidebar.
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
pub enum PeriodPreset {
    #[default]
    #[serde(rename = "last_7_days")]
    #[strum(serialize = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_14_days")]
    #[strum(serialize = "last_14_days")]
    Last14Days,
    #[serde(rename = "last_31_days")]
    #[strum(serialize = "last_31_days")]
    Last31Days,
    #[serde(rename = "manual")]
    #[strum(serialize = "manual")]
    Manual,
}

impl PeriodPreset {
    /// Returns all presets in sidebar order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Last7Days,
            Self::Last14Days,
            Self::Last31Days,
            Self::Manual,
        ]
    }

    /// Sidebar label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Last7Days => "Últimos 7 dias",
            Self::Last14Days => "Últimos 14 dias",
            Self::Last31Days => "Últimos 31 dias",
            Self::Manual => "Selecionar intervalo manual",
        }
    }

    /// Look-back length for the rolling presets, `None` for manual.
    #[must_use]
    pub const fn days(self) -> Option<i64> {
        match self {
            Self::Last7Days => Some(7),
            Self::Last14Days => Some(14),
            Self::Last31Days => Some(31),
            Self::Manual => None,
        }
    }
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `day` falls within the range, both ends included.
    #[must_use]
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Days between start and end.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Non-fatal problems with a selected range. The range is still applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum RangeWarning {
    /// A manual range longer than [`MAX_MANUAL_SPAN_DAYS`].
    SpanTooLong {
        /// Actual span in days.
        days: i64,
    },
}

impl std::fmt::Display for RangeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SpanTooLong { .. } => write!(
                f,
                "Selecione um intervalo de no máximo {MAX_MANUAL_SPAN_DAYS} dias."
            ),
        }
    }
}

/// The period chosen in the sidebar, including the manual date pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSelection {
    pub preset: PeriodPreset,
    /// Start date picker value, used only by [`PeriodPreset::Manual`].
    pub manual_start: NaiveDate,
    /// End date picker value, used only by [`PeriodPreset::Manual`].
    pub manual_end: NaiveDate,
}

impl PeriodSelection {
    /// Resolves the selection into a concrete range relative to `today`.
    ///
    /// Rolling presets span `today - N days ..= today`. Manual ranges are
    /// taken as-is, with a warning when they exceed
    /// [`MAX_MANUAL_SPAN_DAYS`].
    #[must_use]
    pub fn resolve(&self, today: NaiveDate) -> (DateRange, Option<RangeWarning>) {
        if let Some(days) = self.preset.days() {
            return (DateRange::new(today - Duration::days(days), today), None);
        }

        let range = DateRange::new(self.manual_start, self.manual_end);
        let span = range.span_days();
        let warning = (span > MAX_MANUAL_SPAN_DAYS).then(|| {
            log::debug!("Manual range {span} days exceeds {MAX_MANUAL_SPAN_DAYS}");
            RangeWarning::SpanTooLong { days: span }
        });

        (range, warning)
    }
}
