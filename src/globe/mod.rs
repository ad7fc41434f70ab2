//! The interactive globe: projection, gestures, flights and marker layout.
//!
//! [`GlobeView`] is the one place that owns the camera and the current marker set. Input and
//! selection changes only mark the view dirty; the Filter → Project → Overlap pipeline runs once
//! per frame in [`GlobeView::tick`], before anything is painted.

pub mod flight;
pub mod interaction;
pub mod marker;
pub mod overlap;
pub mod projection;
pub mod selection;
pub mod surface;
pub mod visibility;

use crate::Tournament;
use crate::landmass::Landmass;
use eframe::egui::{Pos2, Rect};
use flight::{FlightAnimator, FlightStatus};
use interaction::{DRAG_SENSITIVITY, InteractionController};
use marker::MarkerPoint;
use overlap::OverlapResolver;
use projection::{GeoPoint, OrthoProjection, Rotation};
use selection::{GlobeEvent, PinChange, SelectionBridge};
use std::time::Duration;
use surface::SurfacePaths;

/// Extra hit radius around marker glyphs, in points.
const MARKER_HIT_SLOP: f32 = 3.0;

/// Tunables for a [`GlobeView`].
#[derive(Debug, Clone, PartialEq)]
pub struct GlobeConfig {
    pub flight_duration: Duration,
    /// Drag rotation in degrees per point at scale 1
    pub drag_sensitivity: f64,
    pub overlap: OverlapResolver,
    pub initial_rotation: Rotation,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            flight_duration: Duration::from_millis(1250),
            drag_sensitivity: DRAG_SENSITIVITY,
            overlap: OverlapResolver::default(),
            initial_rotation: Rotation::default(),
        }
    }
}

pub struct GlobeView {
    config: GlobeConfig,
    projection: OrthoProjection,
    controller: InteractionController,
    flight: FlightAnimator,
    selection: SelectionBridge,
    /// Markers that qualify for display, before hemisphere culling
    candidates: Vec<MarkerPoint>,
    /// Markers laid out by the last pipeline run
    markers: Vec<MarkerPoint>,
    active_tooltip: Option<String>,
    graticule: Vec<Vec<GeoPoint>>,
    landmass: Option<Landmass>,
    paths: SurfacePaths,
    viewport: Rect,
    redraw_requested: bool,
}

impl Default for GlobeView {
    fn default() -> Self {
        Self::new(GlobeConfig::default())
    }
}

impl GlobeView {
    pub fn new(config: GlobeConfig) -> Self {
        Self {
            projection: OrthoProjection::new(config.initial_rotation),
            controller: InteractionController::new(config.drag_sensitivity),
            flight: FlightAnimator::default(),
            selection: SelectionBridge::default(),
            candidates: Vec::new(),
            markers: Vec::new(),
            active_tooltip: None,
            graticule: surface::graticule(),
            landmass: None,
            paths: SurfacePaths::default(),
            viewport: Rect::NOTHING,
            redraw_requested: true,
            config,
        }
    }

    /// Marks the layout stale; it is rebuilt on the next [`GlobeView::tick`].
    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Fits the globe to a new viewport. Apply before any gesture in the same frame.
    pub fn resize(&mut self, viewport: Rect) {
        if viewport == self.viewport {
            return;
        }
        log::debug!("Globe viewport resized to {:?}", viewport.size());
        self.viewport = viewport;
        self.projection.resize(viewport);
        self.request_redraw();
    }

    /// Takes the application's selection. A newly selected tournament starts a flight to it;
    /// clearing the pin stops any flight where it is.
    pub fn select(
        &mut self,
        tournament: Option<&str>,
        month: Option<u32>,
        catalog: &[Tournament],
        now: f64,
    ) {
        match self.selection.sync(tournament, month, catalog) {
            PinChange::FlyTo(target) => {
                self.flight
                    .fly_to(self.projection.rotation(), target, self.config.flight_duration, now);
                self.request_redraw();
            }
            PinChange::Unpinned => {
                self.flight.cancel();
            }
            PinChange::Unchanged => {}
        }

        let candidates = self.selection.candidates(catalog);
        if candidates != self.candidates {
            self.candidates = candidates;
            if let Some(id) = &self.active_tooltip
                && !self.candidates.iter().any(|marker| &marker.id == id)
            {
                self.active_tooltip = None;
            }
            self.request_redraw();
        }
    }

    pub fn pointer_down(&mut self, at: Pos2) {
        self.controller.pointer_down(at, &mut self.flight);
    }

    pub fn pointer_move(&mut self, at: Pos2) {
        if self.controller.pointer_move(at, &mut self.projection) {
            self.request_redraw();
        }
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.controller.pointer_leave();
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    /// Zooms by `multiplier` about the cursor. Takes the camera over from any flight.
    pub fn wheel(&mut self, cursor: Pos2, multiplier: f64) {
        self.flight.cancel();
        if self.controller.wheel(cursor, multiplier, &mut self.projection) {
            self.request_redraw();
        }
    }

    /// Sets the zoom factor about the view centre.
    pub fn set_zoom(&mut self, zoom: f64) {
        if self.controller.set_zoom(zoom, &mut self.projection) {
            self.request_redraw();
        }
    }

    pub fn zoom(&self) -> f64 {
        self.projection.zoom()
    }

    /// Back to the starting orientation at zoom 1. Cancels any flight.
    pub fn reset_view(&mut self) {
        self.flight.cancel();
        self.projection.set_rotation(self.config.initial_rotation);
        self.controller.set_zoom(projection::ZOOM_MIN, &mut self.projection);
        self.request_redraw();
    }

    /// Handles a click on the globe surface. Hitting a marker opens its tooltip and selects it;
    /// anywhere else inside the viewport closes the tooltip and deselects.
    pub fn click(&mut self, at: Pos2) -> GlobeEvent {
        if let Some(id) = self.marker_at(at).map(|marker| marker.id.clone()) {
            self.active_tooltip = Some(id.clone());
            self.request_redraw();
            return GlobeEvent::Select(id);
        }
        if !self.viewport.contains(at) {
            return GlobeEvent::Ignored;
        }
        if self.active_tooltip.take().is_some() {
            self.request_redraw();
        }
        GlobeEvent::Deselect
    }

    /// Closes the tooltip without touching the application's selection.
    pub fn close_tooltip(&mut self) {
        if self.active_tooltip.take().is_some() {
            self.request_redraw();
        }
    }

    /// Advances any flight to `now` (seconds) and rebuilds the layout if it is stale.
    /// Returns whether the layout was rebuilt.
    pub fn tick(&mut self, now: f64) -> bool {
        match self.flight.tick(now) {
            FlightStatus::Moving(rotation) => {
                self.projection.set_rotation(rotation);
                self.request_redraw();
            }
            FlightStatus::Arrived(rotation) => {
                log::debug!("Flight arrived at {rotation:?}");
                self.projection.set_rotation(rotation);
                self.request_redraw();
            }
            FlightStatus::Idle => {}
        }

        if !self.redraw_requested {
            return false;
        }
        self.layout();
        true
    }

    pub fn is_flying(&self) -> bool {
        self.flight.is_active()
    }

    pub fn set_landmass(&mut self, landmass: Landmass) {
        log::info!("Landmass layer ready ({} rings)", landmass.rings.len());
        self.landmass = Some(landmass);
        self.request_redraw();
    }

    pub fn has_landmass(&self) -> bool {
        self.landmass.is_some()
    }

    /// Top-most marker under `at`, using rendered positions.
    pub fn marker_at(&self, at: Pos2) -> Option<&MarkerPoint> {
        let reach = self.config.overlap.radius + MARKER_HIT_SLOP;
        self.markers
            .iter()
            .rev()
            .filter(|marker| marker.rendered.distance(at) <= reach)
            .min_by(|a, b| a.rendered.distance(at).total_cmp(&b.rendered.distance(at)))
    }

    pub fn projection(&self) -> &OrthoProjection {
        &self.projection
    }

    pub fn rotation(&self) -> Rotation {
        self.projection.rotation()
    }

    pub fn markers(&self) -> &[MarkerPoint] {
        &self.markers
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn paths(&self) -> &SurfacePaths {
        &self.paths
    }

    pub fn marker_radius(&self) -> f32 {
        self.config.overlap.radius
    }

    /// The marker whose tooltip is open, if it is on screen.
    pub fn active_tooltip(&self) -> Option<&MarkerPoint> {
        let id = self.active_tooltip.as_deref()?;
        self.markers.iter().find(|marker| marker.id == id)
    }

    /// Filter, project, then de-clutter. Each stage only reads the previous one.
    fn layout(&mut self) {
        let rotation = self.projection.rotation();
        let visible = visibility::select_visible(&self.candidates, rotation);

        let mut projected: Vec<MarkerPoint> = visible
            .into_iter()
            .filter_map(|mut marker| {
                marker.anchored = self.projection.project(marker.geo)?;
                Some(marker)
            })
            .collect();

        let anchors: Vec<Pos2> = projected.iter().map(|marker| marker.anchored).collect();
        let resolved = self.config.overlap.resolve(&anchors);
        for (marker, rendered) in projected.iter_mut().zip(resolved) {
            marker.rendered = rendered;
        }

        self.markers = projected;
        self.paths = SurfacePaths::build(&self.projection, &self.graticule, self.landmass.as_ref());
        self.redraw_requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::catalog;
    use approx::assert_abs_diff_eq;
    use eframe::egui::{pos2, vec2};

    fn view() -> GlobeView {
        let mut view = GlobeView::default();
        view.resize(Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0)));
        view
    }

    #[test]
    fn fly_to_paris_centres_it() {
        let catalog = catalog();
        let mut view = view();
        assert_eq!(view.rotation(), Rotation::new(0.0, -10.0));

        view.select(Some("rg"), None, &catalog, 0.0);
        assert!(view.is_flying());
        assert!(view.tick(0.5));
        assert!(view.is_flying());

        view.tick(1.25);
        assert!(!view.is_flying());
        assert_abs_diff_eq!(view.rotation().lambda, -2.24, epsilon = 1e-6);
        assert_abs_diff_eq!(view.rotation().phi, -48.84, epsilon = 1e-6);

        let paris = view.projection().project(GeoPoint::new(48.84, 2.24)).unwrap();
        assert!(paris.distance(pos2(400.0, 300.0)) < 2.0);
        assert_eq!(view.markers().len(), 1);
        assert!(view.markers()[0].pinned);
    }

    #[test]
    fn drag_mid_flight_stops_the_animator() {
        let catalog = catalog();
        let mut view = view();
        view.select(Some("usopen"), None, &catalog, 0.0);
        view.tick(0.4);

        view.pointer_down(pos2(400.0, 300.0));
        assert!(!view.is_flying());
        let held = view.rotation();
        view.tick(0.8);
        assert_eq!(view.rotation(), held);

        view.pointer_move(pos2(410.0, 300.0));
        let step = DRAG_SENSITIVITY / view.projection().scale();
        assert_abs_diff_eq!(view.rotation().lambda, held.lambda + 10.0 * step, epsilon = 1e-9);
        assert_abs_diff_eq!(view.rotation().phi, held.phi, epsilon = 1e-9);
    }

    #[test]
    fn clearing_the_pin_stops_the_flight() {
        let catalog = catalog();
        let mut view = view();
        view.select(Some("ao"), None, &catalog, 0.0);
        view.tick(0.3);
        let held = view.rotation();

        view.select(None, Some(5), &catalog, 0.3);
        assert!(!view.is_flying());
        view.tick(0.9);
        assert_eq!(view.rotation(), held);

        view.select(Some("halle"), None, &catalog, 1.0);
        view.select(None, None, &catalog, 1.1);
        assert!(!view.is_flying());
    }

    #[test]
    fn wheel_mid_flight_keeps_the_anchor() {
        let catalog = catalog();
        let mut view = view();
        view.select(Some("usopen"), None, &catalog, 0.0);
        view.tick(0.4);

        let cursor = pos2(460.0, 260.0);
        let anchor = view.projection().invert(cursor).unwrap();
        view.wheel(cursor, 2.0);
        assert!(!view.is_flying());
        view.tick(0.8);

        let placed = view.projection().project(anchor).unwrap();
        assert!(placed.distance(cursor) < 1.0);
    }

    #[test]
    fn month_filter_culls_far_side() {
        let catalog = catalog();
        let mut view = view();

        view.select(None, Some(0), &catalog, 0.0);
        view.tick(0.0);
        assert_eq!(view.candidate_count(), 2);
        assert!(view.markers().is_empty());

        view.select(None, Some(5), &catalog, 0.0);
        view.tick(0.0);
        let ids: Vec<_> = view.markers().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["halle", "queens", "wimbledon", "mallorca"]);
        assert!(!view.is_flying());
    }

    #[test]
    fn clustered_markers_do_not_overlap() {
        let catalog = catalog();
        let mut view = view();
        view.select(None, Some(5), &catalog, 0.0);
        view.tick(0.0);

        let queens = view.markers().iter().find(|m| m.id == "queens").unwrap();
        let wimbledon = view.markers().iter().find(|m| m.id == "wimbledon").unwrap();
        assert!(queens.anchored.distance(wimbledon.anchored) < 1.0);
        assert!(queens.rendered.distance(wimbledon.rendered) > 2.0 * view.marker_radius());
    }

    #[test]
    fn clicks_select_and_deselect() {
        let catalog = catalog();
        let mut view = view();
        view.select(None, Some(5), &catalog, 0.0);
        view.tick(0.0);

        let halle = view.markers().iter().find(|m| m.id == "halle").unwrap().rendered;
        assert_eq!(view.click(halle), GlobeEvent::Select("halle".to_string()));
        assert_eq!(view.active_tooltip().map(|m| m.id.as_str()), Some("halle"));

        view.close_tooltip();
        assert!(view.active_tooltip().is_none());

        view.click(halle);
        assert_eq!(view.click(pos2(400.0, 560.0)), GlobeEvent::Deselect);
        assert!(view.active_tooltip().is_none());
        assert_eq!(view.click(pos2(900.0, 50.0)), GlobeEvent::Ignored);
    }

    #[test]
    fn tooltip_closes_when_marker_leaves_selection() {
        let catalog = catalog();
        let mut view = view();
        view.select(None, Some(5), &catalog, 0.0);
        view.tick(0.0);
        let halle = view.markers().iter().find(|m| m.id == "halle").unwrap().rendered;
        view.click(halle);

        view.select(None, Some(7), &catalog, 0.0);
        view.tick(0.0);
        assert!(view.active_tooltip().is_none());
    }

    #[test]
    fn resize_applies_before_drag() {
        let mut view = view();
        view.set_zoom(3.0);
        view.resize(Rect::from_min_size(Pos2::ZERO, vec2(400.0, 300.0)));
        assert_abs_diff_eq!(view.projection().scale(), 420.0, epsilon = 1e-9);

        let start = view.rotation();
        view.pointer_down(pos2(200.0, 150.0));
        view.pointer_move(pos2(242.0, 150.0));
        assert_abs_diff_eq!(
            view.rotation().lambda,
            start.lambda + 42.0 * DRAG_SENSITIVITY / 420.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn reset_view_restores_camera() {
        let catalog = catalog();
        let mut view = view();
        view.select(Some("ao"), None, &catalog, 0.0);
        view.set_zoom(4.0);
        view.reset_view();
        assert!(!view.is_flying());
        assert_eq!(view.zoom(), 1.0);
        assert_eq!(view.rotation(), Rotation::default());
    }

    #[test]
    fn tick_only_lays_out_when_dirty() {
        let mut view = view();
        assert!(view.tick(0.0));
        assert!(!view.tick(0.1));
        view.set_landmass(Landmass::default());
        assert!(view.tick(0.2));
        assert!(view.has_landmass());
    }
}
