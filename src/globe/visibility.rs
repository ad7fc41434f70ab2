//! Near-hemisphere culling.

use crate::globe::marker::MarkerPoint;
use crate::globe::projection::{GeoPoint, Rotation, angular_distance};
use std::f64::consts::FRAC_PI_2;

/// Whether `point` is on the hemisphere facing the viewer. The horizon itself counts as visible.
pub fn is_visible(point: GeoPoint, rotation: Rotation) -> bool {
    angular_distance(point, rotation.center()) <= FRAC_PI_2
}

/// Keeps the markers on the near hemisphere, preserving input order.
pub fn select_visible(points: &[MarkerPoint], rotation: Rotation) -> Vec<MarkerPoint> {
    points
        .iter()
        .filter(|point| is_visible(point.geo, rotation))
        .cloned()
        .collect()
}
