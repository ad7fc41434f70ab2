//! Screen-space geometry for the globe's background layers.

use crate::globe::projection::{GeoPoint, OrthoProjection};
use crate::landmass::Landmass;
use eframe::egui::Pos2;
use glam::DVec3;

/// Spacing of graticule lines in degrees.
const GRATICULE_STEP: i32 = 10;

/// Sample spacing along graticule lines in degrees.
const GRATICULE_PRECISION: f64 = 2.5;

/// Minor meridians stop this far from the poles so they don't bunch up.
const GRATICULE_EXTENT: i32 = 80;

/// The latitude/longitude grid as geographic polylines.
pub fn graticule() -> Vec<Vec<GeoPoint>> {
    let mut lines = Vec::new();

    for lon in (-180..180).step_by(GRATICULE_STEP as usize) {
        let extent = if lon % 90 == 0 { 90 } else { GRATICULE_EXTENT };
        lines.push(sample(-extent, extent, |lat| GeoPoint::new(lat, f64::from(lon))));
    }

    for lat in (-GRATICULE_EXTENT..=GRATICULE_EXTENT).step_by(GRATICULE_STEP as usize) {
        lines.push(sample(-180, 180, |lon| GeoPoint::new(f64::from(lat), lon)));
    }

    lines
}

fn sample(from: i32, to: i32, point: impl Fn(f64) -> GeoPoint) -> Vec<GeoPoint> {
    let steps = (f64::from(to - from) / GRATICULE_PRECISION).round() as usize;
    (0..=steps)
        .map(|i| point(f64::from(from) + i as f64 * GRATICULE_PRECISION))
        .collect()
}

/// Projects a polyline, splitting it where it passes behind the globe. Each piece that touches
/// the horizon ends exactly on the silhouette.
pub fn project_line(projection: &OrthoProjection, points: &[GeoPoint]) -> Vec<Vec<Pos2>> {
    let mut runs = Vec::new();
    let mut run = Vec::new();
    let mut previous: Option<DVec3> = None;

    for point in points {
        let v = projection.view_vector(*point);
        let visible = v.x >= 0.0;

        if let Some(prev) = previous {
            let was_visible = prev.x >= 0.0;
            if was_visible != visible {
                run.push(projection.view_to_screen(horizon_crossing(prev, v)));
                if was_visible {
                    flush(&mut runs, &mut run);
                }
            }
        }

        if visible {
            run.push(projection.view_to_screen(v));
        }
        previous = Some(v);
    }

    flush(&mut runs, &mut run);
    runs
}

fn flush(runs: &mut Vec<Vec<Pos2>>, run: &mut Vec<Pos2>) {
    let finished = std::mem::take(run);
    if finished.len() >= 2 {
        runs.push(finished);
    }
}

/// Where the great-circle arc between two view vectors meets the horizon plane.
fn horizon_crossing(a: DVec3, b: DVec3) -> DVec3 {
    let t = a.x / (a.x - b.x);
    let chord = a + (b - a) * t;
    DVec3::new(0.0, chord.y, chord.z).normalize_or_zero()
}

/// Cached screen paths for the background layers, rebuilt on redraw.
#[derive(Debug, Clone, Default)]
pub struct SurfacePaths {
    pub graticule: Vec<Vec<Pos2>>,
    pub land: Vec<Vec<Pos2>>,
}

impl SurfacePaths {
    pub fn build(
        projection: &OrthoProjection,
        graticule: &[Vec<GeoPoint>],
        landmass: Option<&Landmass>,
    ) -> Self {
        let project_all = |lines: &[Vec<GeoPoint>]| {
            lines
                .iter()
                .flat_map(|line| project_line(projection, line))
                .collect::<Vec<_>>()
        };
        Self {
            graticule: project_all(graticule),
            land: landmass.map(|landmass| project_all(&landmass.rings)).unwrap_or_default(),
        }
    }
}
