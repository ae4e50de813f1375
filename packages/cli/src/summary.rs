//! `crime_tour summary`: a quick look at what the loaded table contains.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use crime_tour_incident_models::{DISPLAY_DATE_FORMAT, Incident, NOT_AVAILABLE};

/// Counts over a loaded incident table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub rows: usize,
    pub undated: usize,
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
    pub by_category: BTreeMap<String, usize>,
    pub by_municipality: BTreeMap<String, usize>,
}

impl Summary {
    #[must_use]
    pub fn from_table(table: &[Incident]) -> Self {
        let mut by_category = BTreeMap::new();
        let mut by_municipality = BTreeMap::new();
        for incident in table {
            *by_category.entry(incident.category.clone()).or_insert(0) += 1;
            *by_municipality
                .entry(incident.municipality.clone())
                .or_insert(0) += 1;
        }

        let dates = || table.iter().filter_map(Incident::occurred_on);

        Self {
            rows: table.len(),
            undated: table.len() - dates().count(),
            first: dates().min(),
            last: dates().max(),
            by_category,
            by_municipality,
        }
    }
}

fn date(value: Option<NaiveDate>) -> String {
    value.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |d| d.format(DISPLAY_DATE_FORMAT).to_string(),
    )
}

fn counts(f: &mut fmt::Formatter<'_>, title: &str, counts: &BTreeMap<String, usize>) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{title}:")?;
    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (name, count) in sorted {
        let name = if name.is_empty() { NOT_AVAILABLE } else { name };
        writeln!(f, "  {count:>6}  {name}")?;
    }
    Ok(())
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Incidents: {}", self.rows)?;
        if self.undated > 0 {
            writeln!(f, "Undated:   {}", self.undated)?;
        }
        writeln!(f, "Period:    {} - {}", date(self.first), date(self.last))?;
        counts(f, "By category", &self.by_category)?;
        counts(f, "By municipality", &self.by_municipality)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;

    fn incident(ts: Option<&str>, category: &str, municipality: &str) -> Incident {
        Incident {
            id: 0,
            latitude: -19.9,
            longitude: -44.0,
            occurred_at: ts.map(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()),
            category: category.to_string(),
            municipality: municipality.to_string(),
            presumed_cause: String::new(),
            location: String::new(),
            synopsis: String::new(),
        }
    }

    fn table() -> Vec<Incident> {
        vec![
            incident(Some("2025-01-10 08:00"), "HOMICIDIO", "BETIM"),
            incident(Some("2025-03-02 21:30"), "ROUBO", "BETIM"),
            incident(Some("2025-06-30 23:59"), "HOMICIDIO", "CONTAGEM"),
            incident(None, "HOMICIDIO", ""),
        ]
    }

    #[test]
    fn counts_rows_and_dates() {
        let summary = Summary::from_table(&table());

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.undated, 1);
        assert_eq!(summary.first, NaiveDate::from_ymd_opt(2025, 1, 10));
        assert_eq!(summary.last, NaiveDate::from_ymd_opt(2025, 6, 30));
        assert_eq!(summary.by_category["HOMICIDIO"], 3);
        assert_eq!(summary.by_municipality["BETIM"], 2);
    }

    #[test]
    fn renders_largest_groups_first() {
        let text = Summary::from_table(&table()).to_string();

        assert!(text.contains("Period:    10/01/2025 - 30/06/2025"));
        let homicidio = text.find("HOMICIDIO").unwrap();
        let roubo = text.find("ROUBO").unwrap();
        assert!(homicidio < roubo);
        assert!(text.contains("N/A"));
    }

    #[test]
    fn empty_table_has_no_period() {
        let summary = Summary::from_table(&[]);
        assert_eq!(summary.rows, 0);
        assert!(summary.to_string().contains("Period:    N/A - N/A"));
    }
}
