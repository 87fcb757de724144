//! Map canvas placement and the severity-weighted heatmap.
//!
//! Positions are percentages of the canvas so any renderer can scale
//! them. Points outside [`MapBounds`] are pinned to the edge instead of
//! being dropped.

use crisis_response_analytics_models::{Heatmap, MapBounds, MapPoint};
use crisis_response_incident_models::Incident;

use crate::AnalyticsError;

/// Cells per side of the default heatmap.
pub const DEFAULT_GRID_SIZE: usize = 5;

/// Closest a marker may sit to the canvas edge, in percent.
const EDGE_MARGIN: f64 = 5.0;

/// Projects a coordinate onto the canvas. `y` grows southwards.
#[must_use]
pub fn project(bounds: &MapBounds, latitude: f64, longitude: f64) -> (f64, f64) {
    let x = (longitude - bounds.min_lng) / (bounds.max_lng - bounds.min_lng) * 100.0;
    let y = (bounds.max_lat - latitude) / (bounds.max_lat - bounds.min_lat) * 100.0;
    (
        x.clamp(EDGE_MARGIN, 100.0 - EDGE_MARGIN),
        y.clamp(EDGE_MARGIN, 100.0 - EDGE_MARGIN),
    )
}

/// Places every incident on the canvas, in report order.
#[must_use]
pub fn map_points(bounds: &MapBounds, incidents: &[Incident]) -> Vec<MapPoint> {
    incidents
        .iter()
        .map(|i| {
            let (x, y) = project(bounds, i.latitude, i.longitude);
            MapPoint {
                incident_id: i.id.clone(),
                incident_type: i.incident_type,
                severity: i.severity,
                status: i.status,
                x,
                y,
            }
        })
        .collect()
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn cell(fraction: f64, grid_size: usize) -> usize {
    let idx = (fraction * grid_size as f64).floor();
    if idx.is_nan() || idx < 0.0 {
        0
    } else {
        (idx as usize).min(grid_size - 1)
    }
}

/// Accumulates severity cost per grid cell. Every incident counts,
/// whatever its status.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyGrid`] if `grid_size` is 0.
pub fn heatmap(
    bounds: &MapBounds,
    incidents: &[Incident],
    grid_size: usize,
) -> Result<Heatmap, AnalyticsError> {
    if grid_size == 0 {
        return Err(AnalyticsError::EmptyGrid);
    }

    let mut cells = vec![vec![0_u32; grid_size]; grid_size];

    for incident in incidents {
        let col = cell(
            (incident.longitude - bounds.min_lng) / (bounds.max_lng - bounds.min_lng),
            grid_size,
        );
        let row = cell(
            (bounds.max_lat - incident.latitude) / (bounds.max_lat - bounds.min_lat),
            grid_size,
        );
        cells[row][col] += incident.resource_requirement();
    }

    let max_density = cells.iter().flatten().copied().max().unwrap_or(0).max(1);

    Ok(Heatmap {
        grid_size,
        cells,
        max_density,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::incident;
    use crisis_response_incident_models::{IncidentStatus, Severity};

    fn at(id: &str, severity: Severity, lat: f64, lng: f64) -> Incident {
        let mut i = incident(id, "W", severity, IncidentStatus::New);
        i.latitude = lat;
        i.longitude = lng;
        i
    }

    #[test]
    fn projects_center_to_middle() {
        let (x, y) = project(&MapBounds::default(), 28.6, 77.2);
        assert!((x - 50.0).abs() < 1e-6);
        assert!((y - 50.0).abs() < 1e-6);
    }

    #[test]
    fn projection_clamps_to_margin() {
        let bounds = MapBounds::default();
        assert_eq!(project(&bounds, 0.0, 0.0), (5.0, 95.0));
        assert_eq!(project(&bounds, 89.0, 179.0), (95.0, 5.0));
    }

    #[test]
    fn north_is_up() {
        let bounds = MapBounds::default();
        let (_, north) = project(&bounds, 28.68, 77.2);
        let (_, south) = project(&bounds, 28.52, 77.2);
        assert!(north < south);
    }

    #[test]
    fn heatmap_weights_by_severity() {
        let incidents = vec![
            at("a", Severity::High, 28.69, 77.11),
            at("b", Severity::Low, 28.69, 77.11),
            at("c", Severity::Medium, 28.51, 77.29),
        ];
        let map = heatmap(&MapBounds::default(), &incidents, DEFAULT_GRID_SIZE).unwrap();
        assert_eq!(map.cells[0][0], 4);
        assert_eq!(map.cells[4][4], 2);
        assert_eq!(map.max_density, 4);
        assert_eq!(map.cells.iter().flatten().sum::<u32>(), 6);
    }

    #[test]
    fn out_of_bounds_points_land_in_edge_cells() {
        let incidents = vec![at("far", Severity::Low, -40.0, 200.0)];
        let map = heatmap(&MapBounds::default(), &incidents, 3).unwrap();
        assert_eq!(map.cells[2][2], 1);
    }

    #[test]
    fn empty_heatmap_has_unit_max() {
        let map = heatmap(&MapBounds::default(), &[], DEFAULT_GRID_SIZE).unwrap();
        assert_eq!(map.max_density, 1);
        assert!(heatmap(&MapBounds::default(), &[], 0).is_err());
    }

    #[test]
    fn map_points_follow_report_order() {
        let incidents = vec![at("a", Severity::Low, 28.6, 77.2), at("b", Severity::High, 28.55, 77.15)];
        let points = map_points(&MapBounds::default(), &incidents);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].incident_id, "b");
        assert_eq!(points[1].severity, Severity::High);
    }
}
