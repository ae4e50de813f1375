//! Detail panel for the current incident.

use crime_tour_incident_models::{Incident, NOT_AVAILABLE};
use crime_tour_presentation_models::DetailPanel;

/// Interval text for `view[current]`: `first_label` for the first incident,
/// `"{n} DIAS"` since the previous one, or `N/A` when either date is missing.
#[must_use]
pub fn interval_label(view: &[Incident], current: usize, first_label: &str) -> String {
    let Some(previous) = current.checked_sub(1) else {
        return first_label.to_string();
    };

    let this = view.get(current).and_then(|i| i.occurred_at);
    let before = view.get(previous).and_then(|i| i.occurred_at);

    match (this, before) {
        (Some(this), Some(before)) => format!("{} DIAS", (this - before).num_days()),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub(crate) fn or_not_available(value: &str) -> String {
    if value.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

/// Builds the detail panel, `None` if `current` is outside `view`.
#[must_use]
pub fn detail_panel(view: &[Incident], current: usize, first_label: &str) -> Option<DetailPanel> {
    let incident = view.get(current)?;

    Some(DetailPanel {
        number: current + 1,
        category: or_not_available(&incident.category),
        municipality: or_not_available(&incident.municipality),
        date: incident.display_date(),
        interval: interval_label(view, current, first_label),
        presumed_cause: or_not_available(&incident.presumed_cause),
        location: or_not_available(&incident.location),
        synopsis: or_not_available(&incident.synopsis),
    })
}
