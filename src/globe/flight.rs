//! "Fly to" transitions.
//!
//! A flight moves the view centre along the great circle between where the camera looks now and
//! the target, then converts every intermediate centre back into a rotation. Interpolating the
//! centre rather than (lambda, phi) independently keeps the path straight near the poles.

use crate::globe::projection::{GeoPoint, Rotation};
use glam::DVec3;
use std::time::Duration;

/// Below this angle (radians) the two ends are treated as the same point.
const SAME_POINT: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
struct Flight {
    from: DVec3,
    to: DVec3,
    target: Rotation,
    started_at: f64,
    duration: f64,
}

/// Result of advancing the animator to a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightStatus {
    /// No flight in progress
    Idle,
    /// Mid-flight; the caller should commit this rotation and redraw
    Moving(Rotation),
    /// The flight finished on this tick; the rotation is exactly the target
    Arrived(Rotation),
}

/// Holds at most one flight. Starting a new one replaces the old one without completing it.
#[derive(Debug, Clone, Default)]
pub struct FlightAnimator {
    active: Option<Flight>,
}

impl FlightAnimator {
    /// Begins a flight from `from` to the rotation that centres `target`. `now` is in seconds.
    pub fn fly_to(&mut self, from: Rotation, target: GeoPoint, duration: Duration, now: f64) {
        let target = target.clamped();
        if self.active.take().is_some() {
            log::debug!("Flight to {target:?} replaces the one in progress");
        }
        self.active = Some(Flight {
            from: from.center().to_unit_vector(),
            to: target.to_unit_vector(),
            target: Rotation::centering(target),
            started_at: now,
            duration: duration.as_secs_f64(),
        });
    }

    /// Drops the active flight, if any. Returns whether one was running.
    pub fn cancel(&mut self) -> bool {
        self.active.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Rotation the active flight will end on.
    pub fn target(&self) -> Option<Rotation> {
        self.active.as_ref().map(|flight| flight.target)
    }

    pub fn tick(&mut self, now: f64) -> FlightStatus {
        let Some(flight) = &self.active else {
            return FlightStatus::Idle;
        };

        let progress = if flight.duration > 0.0 {
            ((now - flight.started_at) / flight.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };

        if progress >= 1.0 {
            let target = flight.target;
            self.active = None;
            return FlightStatus::Arrived(target);
        }

        let center = slerp(flight.from, flight.to, ease_cubic_in_out(progress));
        FlightStatus::Moving(Rotation::centering(GeoPoint::from_unit_vector(center)))
    }
}

/// Cubic ease-in-out on [0, 1].
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Spherical interpolation between two unit vectors.
pub fn slerp(a: DVec3, b: DVec3, t: f64) -> DVec3 {
    let omega = a.angle_between(b);
    if omega < SAME_POINT {
        return a;
    }

    // Antipodal ends have no unique great circle; any one through both will do.
    let sin_omega = omega.sin();
    if sin_omega < SAME_POINT {
        let side = a.any_orthonormal_vector();
        let angle = t * omega;
        return a * angle.cos() + side * angle.sin();
    }

    let fa = ((1.0 - t) * omega).sin() / sin_omega;
    let fb = (t * omega).sin() / sin_omega;
    a * fa + b * fb
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const PARIS: GeoPoint = GeoPoint { lat: 48.84, lon: 2.24 };

    fn flight_secs() -> Duration {
        Duration::from_millis(1250)
    }

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert_abs_diff_eq!(ease_cubic_in_out(0.5), 0.5, epsilon = 1e-12);
        assert!(ease_cubic_in_out(0.25) < 0.25);
    }

    #[test]
    fn slerp_stays_on_the_sphere() {
        let a = GeoPoint::new(10.0, 0.0).to_unit_vector();
        let b = PARIS.to_unit_vector();
        for step in 0..=10 {
            let v = slerp(a, b, step as f64 / 10.0);
            assert_abs_diff_eq!(v.length(), 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(slerp(a, b, 1.0).distance(b), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn flight_lands_exactly_on_target() {
        let mut animator = FlightAnimator::default();
        animator.fly_to(Rotation::new(0.0, -10.0), PARIS, flight_secs(), 0.0);
        assert!(animator.is_active());

        let FlightStatus::Moving(mid) = animator.tick(0.6) else {
            panic!("expected to be mid-flight");
        };
        assert!(mid.phi < -10.0 && mid.phi > -48.84);

        let FlightStatus::Arrived(end) = animator.tick(1.25) else {
            panic!("expected arrival");
        };
        assert_abs_diff_eq!(end.lambda, -2.24, epsilon = 1e-9);
        assert_abs_diff_eq!(end.phi, -48.84, epsilon = 1e-9);
        assert!(!animator.is_active());
        assert_eq!(animator.tick(2.0), FlightStatus::Idle);
    }

    #[test]
    fn new_flight_replaces_old_one() {
        let mut animator = FlightAnimator::default();
        animator.fly_to(Rotation::default(), PARIS, flight_secs(), 0.0);
        animator.fly_to(Rotation::default(), GeoPoint::new(40.75, -73.84), flight_secs(), 0.5);
        let target = animator.target().unwrap();
        assert_abs_diff_eq!(target.lambda, 73.84, epsilon = 1e-9);
        assert!(matches!(animator.tick(1.0), FlightStatus::Moving(_)));
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut animator = FlightAnimator::default();
        assert!(!animator.cancel());
        animator.fly_to(Rotation::default(), PARIS, flight_secs(), 0.0);
        assert!(animator.cancel());
        assert!(!animator.cancel());
        assert_eq!(animator.tick(0.5), FlightStatus::Idle);
    }

    #[test]
    fn antipodal_flight_does_not_produce_nan() {
        let mut animator = FlightAnimator::default();
        let start = Rotation::centering(GeoPoint::new(0.0, 0.0));
        animator.fly_to(start, GeoPoint::new(0.0, 180.0), flight_secs(), 0.0);
        for step in 1..10 {
            if let FlightStatus::Moving(rotation) = animator.tick(step as f64 * 0.1) {
                assert!(rotation.lambda.is_finite() && rotation.phi.is_finite());
            }
        }
    }

    #[test]
    fn zero_duration_arrives_on_first_tick() {
        let mut animator = FlightAnimator::default();
        animator.fly_to(Rotation::default(), PARIS, Duration::ZERO, 3.0);
        assert!(matches!(animator.tick(3.0), FlightStatus::Arrived(_)));
    }
}
