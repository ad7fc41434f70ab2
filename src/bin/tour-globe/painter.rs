//! Drawing the globe layers and markers.

use crate::colors;
use eframe::egui;
use tour_globe::globe::GlobeView;
use tour_globe::globe::marker::MarkerPoint;

/// Draws the sphere, graticule, land outlines and markers, back to front.
pub fn draw_globe(painter: &egui::Painter, globe: &GlobeView) {
    let projection = globe.projection();
    let center = projection.translate();
    let radius = projection.scale() as f32;

    painter.circle_filled(center, radius, colors::SPHERE_FILL);

    for line in &globe.paths().graticule {
        painter.line(line.clone(), egui::Stroke::new(0.5, colors::GRATICULE));
    }

    for ring in &globe.paths().land {
        painter.line(ring.clone(), egui::Stroke::new(0.8, colors::LAND_STROKE));
    }

    painter.circle_stroke(center, radius, egui::Stroke::new(1.0, colors::SPHERE_STROKE));

    let active = globe.active_tooltip().map(|marker| marker.id.as_str());
    let marker_radius = globe.marker_radius();

    // Pinned markers go on top.
    let (pinned, unpinned): (Vec<&MarkerPoint>, Vec<&MarkerPoint>) =
        globe.markers().iter().partition(|marker| marker.pinned);

    for marker in unpinned.into_iter().chain(pinned) {
        draw_marker(painter, marker, marker_radius, active == Some(marker.id.as_str()));
    }
}

fn draw_marker(painter: &egui::Painter, marker: &MarkerPoint, radius: f32, active: bool) {
    if marker.anchored.distance(marker.rendered) > 1.0 {
        painter.line_segment(
            [marker.anchored, marker.rendered],
            egui::Stroke::new(1.0, colors::LEADER_LINE),
        );
        painter.circle_filled(marker.anchored, 1.5, colors::LEADER_LINE);
    }

    if marker.pinned {
        painter.circle_stroke(
            marker.rendered,
            radius + 4.0,
            egui::Stroke::new(2.0, colors::PIN_ACCENT),
        );
    }

    let stroke_width = if active { 2.5 } else { 1.0 };
    painter.circle(
        marker.rendered,
        radius,
        colors::tier(marker.category),
        egui::Stroke::new(stroke_width, colors::MARKER_STROKE),
    );
}
