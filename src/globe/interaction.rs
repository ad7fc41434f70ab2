//! Drag-to-rotate and wheel-to-zoom.

use crate::globe::flight::FlightAnimator;
use crate::globe::projection::{OrthoProjection, Rotation};
use eframe::egui::{Pos2, Vec2};

/// Degrees of rotation per screen point at scale 1.
pub const DRAG_SENSITIVITY: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging {
        last: Pos2,
    },
    /// Only observable while a wheel delta is being applied
    Zooming,
}

/// Turns pointer and wheel input into rotation and zoom changes on the projection.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: GestureState,
    sensitivity: f64,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(DRAG_SENSITIVITY)
    }
}

impl InteractionController {
    pub fn new(sensitivity: f64) -> Self {
        Self {
            state: GestureState::Idle,
            sensitivity,
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Starts a drag. Any flight in progress stops where it is.
    pub fn pointer_down(&mut self, at: Pos2, flight: &mut FlightAnimator) {
        if flight.cancel() {
            log::debug!("Drag interrupted a flight");
        }
        self.state = GestureState::Dragging { last: at };
    }

    /// Rotates by the movement since the last event. Returns whether the rotation changed.
    pub fn pointer_move(&mut self, at: Pos2, projection: &mut OrthoProjection) -> bool {
        let GestureState::Dragging { last } = self.state else {
            return false;
        };
        self.state = GestureState::Dragging { last: at };
        let delta = at - last;
        if delta == Vec2::ZERO {
            return false;
        }
        self.drag_by(delta, projection);
        true
    }

    pub fn pointer_up(&mut self) {
        self.state = GestureState::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.state = GestureState::Idle;
    }

    /// Applies a screen-space drag delta. The angular step shrinks as the globe grows, so the
    /// surface tracks the pointer at any zoom.
    pub fn drag_by(&self, delta: Vec2, projection: &mut OrthoProjection) {
        let step = self.sensitivity / projection.scale();
        let rotation = projection.rotation();
        projection.set_rotation(Rotation::new(
            rotation.lambda + f64::from(delta.x) * step,
            rotation.phi - f64::from(delta.y) * step,
        ));
    }

    /// Multiplies the zoom factor by `multiplier`, keeping the globe point under `cursor` fixed
    /// on screen. Returns whether anything changed.
    pub fn wheel(&mut self, cursor: Pos2, multiplier: f64, projection: &mut OrthoProjection) -> bool {
        let resume = self.state;
        self.state = GestureState::Zooming;
        let changed = self.zoom_at(cursor, multiplier, projection);
        self.state = match resume {
            GestureState::Dragging { .. } => resume,
            _ => GestureState::Idle,
        };
        changed
    }

    /// Sets an absolute zoom factor about the view centre.
    pub fn set_zoom(&mut self, zoom: f64, projection: &mut OrthoProjection) -> bool {
        let before = projection.zoom();
        projection.set_zoom(zoom);
        projection.zoom() != before
    }

    fn zoom_at(&self, cursor: Pos2, multiplier: f64, projection: &mut OrthoProjection) -> bool {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return false;
        }

        let anchor = projection.invert(cursor);
        let before = projection.zoom();
        projection.set_zoom(before * multiplier);
        if projection.zoom() == before {
            return false;
        }

        let Some(anchor) = anchor else {
            return true;
        };

        if let Some(rotation) = projection.rotation_placing(anchor, cursor) {
            projection.set_rotation(rotation);
        } else if let Some(drifted) = projection.project(anchor) {
            self.drag_by(cursor - drifted, projection);
        }
        true
    }
}
