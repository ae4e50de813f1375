//! Map scene assembly: numbered markers, the visited trail and the animated
//! hop to the current incident.

use std::sync::Arc;

use crime_tour_geography::BoundaryOverlay;
use crime_tour_incident_models::Incident;
use crime_tour_presentation_models::{
    AnimatedSegment, FrameWarning, LatLng, MapScene, Marker, MarkerId, Polyline,
};

use crate::detail::or_not_available;

const CURRENT_FILL: &str = "red";
const PAST_FILL: &str = "blue";
const MARKER_TEXT: &str = "white";
const CURRENT_SIZE: u32 = 30;
const PAST_SIZE: u32 = 20;

const TRAIL_COLOR: &str = "blue";
const TRAIL_WEIGHT: f64 = 2.5;
const TRAIL_OPACITY: f64 = 0.8;

const HOP_COLOR: &str = "red";
const HOP_WEIGHT: f64 = 3.0;
const HOP_DELAY_MS: u32 = 800;
const HOP_DASH: [u32; 2] = [10, 20];

fn position(incident: &Incident) -> Option<LatLng> {
    incident.has_finite_coordinates().then_some(LatLng {
        lat: incident.latitude,
        lng: incident.longitude,
    })
}

/// Mean position of all drawable incidents, `(0, 0)` if there are none.
#[allow(clippy::cast_precision_loss)]
fn center(view: &[Incident]) -> LatLng {
    let points: Vec<LatLng> = view.iter().filter_map(position).collect();
    if points.is_empty() {
        return LatLng { lat: 0.0, lng: 0.0 };
    }
    let n = points.len() as f64;
    LatLng {
        lat: points.iter().map(|p| p.lat).sum::<f64>() / n,
        lng: points.iter().map(|p| p.lng).sum::<f64>() / n,
    }
}

fn marker(index: usize, incident: &Incident, at: LatLng, current: usize) -> Marker {
    let highlighted = index == current;
    let date = incident.display_date();
    let category = or_not_available(&incident.category);
    let popup = if highlighted {
        format!("Ponto atual: {category} ({date})")
    } else {
        format!("Incidente passado: {category} ({date})")
    };

    Marker {
        id: MarkerId(index).to_string(),
        number: index + 1,
        position: at,
        highlighted,
        fill_color: if highlighted { CURRENT_FILL } else { PAST_FILL }.to_string(),
        text_color: MARKER_TEXT.to_string(),
        size: if highlighted { CURRENT_SIZE } else { PAST_SIZE },
        popup,
    }
}

/// Trail through incidents `0..current`, only when it has two or more points.
fn visited_path(view: &[Incident], current: usize) -> Option<Polyline> {
    let path: Vec<LatLng> = view
        .iter()
        .take(current)
        .filter_map(position)
        .collect();

    (path.len() > 1).then(|| Polyline {
        path,
        color: TRAIL_COLOR.to_string(),
        weight: TRAIL_WEIGHT,
        opacity: TRAIL_OPACITY,
    })
}

/// Segment from incident `current - 1` to `current`.
fn animated_segment(view: &[Incident], current: usize) -> Option<AnimatedSegment> {
    let previous = current.checked_sub(1)?;
    let from = position(view.get(previous)?)?;
    let to = position(view.get(current)?)?;

    Some(AnimatedSegment {
        from,
        to,
        color: HOP_COLOR.to_string(),
        weight: HOP_WEIGHT,
        delay_ms: HOP_DELAY_MS,
        dash_array: HOP_DASH,
    })
}

/// Builds the map scene for `view` with `current` highlighted.
///
/// Incidents that cannot be drawn are skipped and reported as
/// [`FrameWarning::RowSkipped`]; the rest of the scene still renders.
#[must_use]
pub fn build_scene(
    view: &[Incident],
    current: usize,
    zoom: u8,
    overlay: Option<Arc<BoundaryOverlay>>,
) -> (MapScene, Vec<FrameWarning>) {
    let mut markers = Vec::with_capacity(view.len());
    let mut warnings = Vec::new();

    for (index, incident) in view.iter().enumerate() {
        if let Some(at) = position(incident) {
            markers.push(marker(index, incident, at, current));
        } else {
            log::warn!("Skipping incident {} with invalid coordinates", index + 1);
            warnings.push(FrameWarning::RowSkipped {
                row: index + 1,
                message: format!(
                    "Erro ao renderizar o incidente no índice {}: coordenadas inválidas. O ponto será pulado.",
                    index + 1
                ),
            });
        }
    }

    let scene = MapScene {
        center: center(view),
        zoom,
        markers,
        visited_path: visited_path(view, current),
        animated_segment: animated_segment(view, current),
        overlay,
    };

    (scene, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident(lat: f64, lng: f64) -> Incident {
        Incident {
            id: 0,
            latitude: lat,
            longitude: lng,
            occurred_at: None,
            category: "HOMICIDIO".to_string(),
            municipality: "BETIM".to_string(),
            presumed_cause: String::new(),
            location: String::new(),
            synopsis: String::new(),
        }
    }

    fn view() -> Vec<Incident> {
        vec![
            incident(-19.0, -44.0),
            incident(-20.0, -43.0),
            incident(-21.0, -42.0),
            incident(-22.0, -41.0),
        ]
    }

    #[test]
    fn numbers_and_highlights_markers() {
        let (scene, warnings) = build_scene(&view(), 2, 10, None);

        assert!(warnings.is_empty());
        assert_eq!(scene.markers.len(), 4);
        assert_eq!(scene.markers[0].id, "marker_0");
        assert_eq!(scene.markers[0].number, 1);
        assert!(scene.markers[2].highlighted);
        assert_eq!(scene.markers[2].fill_color, "red");
        assert_eq!(scene.markers[2].size, 30);
        assert!(scene.markers[2].popup.starts_with("Ponto atual: HOMICIDIO (N/A)"));
        assert!(!scene.markers[1].highlighted);
        assert_eq!(scene.markers[1].size, 20);
        assert!(scene.markers[1].popup.starts_with("Incidente passado:"));
    }

    #[test]
    fn popup_falls_back_when_category_is_blank() {
        let mut view = view();
        view[0].category.clear();
        view[1].category.clear();

        let (scene, _) = build_scene(&view, 1, 10, None);

        assert!(scene.markers[0].popup.starts_with("Incidente passado: N/A (N/A)"));
        assert!(scene.markers[1].popup.starts_with("Ponto atual: N/A (N/A)"));
    }

    #[test]
    fn centers_on_mean_position() {
        let (scene, _) = build_scene(&view(), 0, 10, None);
        assert!((scene.center.lat - -20.5).abs() < 1e-9);
        assert!((scene.center.lng - -42.5).abs() < 1e-9);
        assert_eq!(scene.zoom, 10);
    }

    #[test]
    fn first_incident_has_no_trail_or_hop() {
        let (scene, _) = build_scene(&view(), 0, 10, None);
        assert!(scene.visited_path.is_none());
        assert!(scene.animated_segment.is_none());
    }

    #[test]
    fn second_incident_has_hop_but_no_trail() {
        let (scene, _) = build_scene(&view(), 1, 10, None);
        assert!(scene.visited_path.is_none());
        let hop = scene.animated_segment.unwrap();
        assert!((hop.from.lat - -19.0).abs() < f64::EPSILON);
        assert!((hop.to.lat - -20.0).abs() < f64::EPSILON);
        assert_eq!(hop.delay_ms, 800);
        assert_eq!(hop.dash_array, [10, 20]);
    }

    #[test]
    fn trail_covers_incidents_before_current() {
        let (scene, _) = build_scene(&view(), 3, 10, None);
        let trail = scene.visited_path.unwrap();
        assert_eq!(trail.path.len(), 3);
        assert!((trail.path[2].lat - -21.0).abs() < f64::EPSILON);
    }

    #[test]
    fn skips_undrawable_rows_with_warning() {
        let mut rows = view();
        rows[1].latitude = f64::NAN;

        let (scene, warnings) = build_scene(&rows, 0, 10, None);

        assert_eq!(scene.markers.len(), 3);
        assert!(scene.markers.iter().all(|m| m.id != "marker_1"));
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], FrameWarning::RowSkipped { row: 2, .. }));
        assert!(warnings[0].message().contains("índice 2"));
    }
}
