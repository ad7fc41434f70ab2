//! Orthographic projection of the globe onto the screen.
//!
//! The projection rotates the sphere by `lambda` around the polar axis, then by `phi` around the
//! east-west axis, and looks at the result from infinitely far away along +x. Screen y grows
//! downwards, so north maps to smaller y.

use eframe::egui::{Pos2, Rect, pos2};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Zoom factor bounds. `scale == initial_scale * zoom` always holds.
pub const ZOOM_MIN: f64 = 1.0;
pub const ZOOM_MAX: f64 = 10.0;

/// Margin between the sphere silhouette and the viewport edge at zoom 1.0.
const VIEWPORT_MARGIN: f64 = 10.0;

/// Slack for points that sit on the horizon up to floating noise.
const HORIZON_EPSILON: f64 = 1e-9;

/// A position on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Builds a point, clamping latitude into [-90, 90] and wrapping longitude into [-180, 180).
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }.clamped()
    }

    pub fn clamped(self) -> Self {
        let lat = if self.lat.is_finite() { self.lat.clamp(-90.0, 90.0) } else { 0.0 };
        let lon = if self.lon.is_finite() { normalize_degrees(self.lon) } else { 0.0 };
        Self { lat, lon }
    }

    /// The diametrically opposite point.
    pub fn antipode(self) -> Self {
        let p = self.clamped();
        Self::new(-p.lat, p.lon + 180.0)
    }

    /// Unit vector with +z through the north pole and +x through (0, 0).
    pub fn to_unit_vector(self) -> DVec3 {
        let p = self.clamped();
        let (sin_lat, cos_lat) = p.lat.to_radians().sin_cos();
        let (sin_lon, cos_lon) = p.lon.to_radians().sin_cos();
        DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat)
    }

    pub fn from_unit_vector(v: DVec3) -> Self {
        let v = v.normalize_or_zero();
        Self::new(v.z.clamp(-1.0, 1.0).asin().to_degrees(), v.y.atan2(v.x).to_degrees())
    }
}

/// Wraps an angle in degrees into [-180, 180).
pub fn normalize_degrees(degrees: f64) -> f64 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}

/// Great-circle distance between two points, in radians.
pub fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let (a, b) = (a.clamped(), b.clamped());
    let (sin_lat_a, cos_lat_a) = a.lat.to_radians().sin_cos();
    let (sin_lat_b, cos_lat_b) = b.lat.to_radians().sin_cos();
    let (sin_dlon, cos_dlon) = (b.lon - a.lon).to_radians().sin_cos();

    let cross_x = cos_lat_b * sin_dlon;
    let cross_y = cos_lat_a * sin_lat_b - sin_lat_a * cos_lat_b * cos_dlon;
    let dot = sin_lat_a * sin_lat_b + cos_lat_a * cos_lat_b * cos_dlon;

    cross_x.hypot(cross_y).atan2(dot)
}

/// Globe orientation in degrees: `lambda` spins around the poles, `phi` tilts north/south.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub lambda: f64,
    pub phi: f64,
}

impl Rotation {
    /// Wraps `lambda` into [-180, 180) and clamps `phi` into [-90, 90].
    pub fn new(lambda: f64, phi: f64) -> Self {
        let lambda = if lambda.is_finite() { normalize_degrees(lambda) } else { 0.0 };
        let phi = if phi.is_finite() { phi.clamp(-90.0, 90.0) } else { 0.0 };
        Self { lambda, phi }
    }

    /// The rotation that puts `point` in the middle of the view.
    pub fn centering(point: GeoPoint) -> Self {
        let p = point.clamped();
        Self::new(-p.lon, -p.lat)
    }

    /// The geographic point this rotation puts in the middle of the view.
    pub fn center(self) -> GeoPoint {
        GeoPoint::new(-self.phi, -self.lambda)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::new(0.0, -10.0)
    }
}

/// Screen placement of the sphere: `scale` is the silhouette radius in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    initial_scale: f64,
    zoom: f64,
    translate: Pos2,
}

impl ViewTransform {
    pub fn scale(&self) -> f64 {
        self.initial_scale * self.zoom
    }

    pub fn initial_scale(&self) -> f64 {
        self.initial_scale
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn translate(&self) -> Pos2 {
        self.translate
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            initial_scale: 1.0,
            zoom: ZOOM_MIN,
            translate: Pos2::ZERO,
        }
    }
}

/// Owns the rotation and view transform; every other component reads them through here.
#[derive(Debug, Clone, Default)]
pub struct OrthoProjection {
    rotation: Rotation,
    transform: ViewTransform,
}

impl OrthoProjection {
    pub fn new(rotation: Rotation) -> Self {
        Self {
            rotation: Rotation::new(rotation.lambda, rotation.phi),
            transform: ViewTransform::default(),
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = Rotation::new(rotation.lambda, rotation.phi);
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn scale(&self) -> f64 {
        self.transform.scale()
    }

    /// Sets the absolute scale by adjusting the zoom factor, so the zoom bounds still apply.
    pub fn set_scale(&mut self, scale: f64) {
        self.set_zoom(scale / self.transform.initial_scale);
    }

    pub fn zoom(&self) -> f64 {
        self.transform.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.transform.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        }
    }

    pub fn translate(&self) -> Pos2 {
        self.transform.translate
    }

    pub fn set_translate(&mut self, translate: Pos2) {
        self.transform.translate = translate;
    }

    /// Fits the sphere to a viewport. The zoom factor survives; the absolute scale does not.
    pub fn resize(&mut self, viewport: Rect) {
        let fit = f64::from(viewport.width().min(viewport.height())) / 2.0 - VIEWPORT_MARGIN;
        self.transform.initial_scale = fit.max(1.0);
        self.transform.translate = viewport.center();
    }

    /// Projects a point to the screen, or `None` when it lies on the far hemisphere.
    pub fn project(&self, point: GeoPoint) -> Option<Pos2> {
        let v = self.rotate(point.to_unit_vector());
        if v.x < -HORIZON_EPSILON {
            return None;
        }
        Some(self.to_screen(v))
    }

    /// Maps a screen position back onto the globe, or `None` outside the silhouette.
    pub fn invert(&self, screen: Pos2) -> Option<GeoPoint> {
        let (u, v) = self.from_screen(screen);
        let r2 = u * u + v * v;
        if r2 > 1.0 + HORIZON_EPSILON {
            return None;
        }
        let depth = (1.0 - r2).max(0.0).sqrt();
        Some(GeoPoint::from_unit_vector(self.unrotate(DVec3::new(depth, u, v))))
    }

    /// Whether a screen position lies on the sphere's disk.
    pub fn contains(&self, screen: Pos2) -> bool {
        let (u, v) = self.from_screen(screen);
        u * u + v * v <= 1.0
    }

    /// Solves for the rotation that projects `point` exactly onto `screen` at the current
    /// scale, choosing the solution closest to the current rotation. `None` when no rotation
    /// with `phi` inside [-90, 90] does it.
    pub fn rotation_placing(&self, point: GeoPoint, screen: Pos2) -> Option<Rotation> {
        let (b, c) = self.from_screen(screen);
        let r2 = b * b + c * c;
        if r2 > 1.0 {
            return None;
        }
        let a = (1.0 - r2).sqrt();
        let g = point.to_unit_vector();

        // After the lambda spin the point keeps its z and must end with y == b.
        let wx_sq = 1.0 - b * b - g.z * g.z;
        if wx_sq < -HORIZON_EPSILON || g.x.hypot(g.y) < HORIZON_EPSILON {
            return None;
        }
        let wx_abs = wx_sq.max(0.0).sqrt();

        [wx_abs, -wx_abs]
            .into_iter()
            .filter_map(|wx| {
                let lambda = (b.atan2(wx) - g.y.atan2(g.x)).to_degrees();
                let phi = normalize_degrees((c.atan2(a) - g.z.atan2(wx)).to_degrees());
                (-90.0..=90.0)
                    .contains(&phi)
                    .then(|| Rotation::new(lambda, phi))
            })
            .min_by(|lhs, rhs| {
                self.rotation_gap(*lhs)
                    .total_cmp(&self.rotation_gap(*rhs))
            })
    }

    fn rotation_gap(&self, other: Rotation) -> f64 {
        normalize_degrees(other.lambda - self.rotation.lambda).abs()
            + (other.phi - self.rotation.phi).abs()
    }

    fn rotate(&self, v: DVec3) -> DVec3 {
        let (sin_l, cos_l) = self.rotation.lambda.to_radians().sin_cos();
        let (sin_p, cos_p) = self.rotation.phi.to_radians().sin_cos();
        let wx = v.x * cos_l - v.y * sin_l;
        let wy = v.x * sin_l + v.y * cos_l;
        DVec3::new(wx * cos_p - v.z * sin_p, wy, v.z * cos_p + wx * sin_p)
    }

    fn unrotate(&self, v: DVec3) -> DVec3 {
        let (sin_l, cos_l) = self.rotation.lambda.to_radians().sin_cos();
        let (sin_p, cos_p) = self.rotation.phi.to_radians().sin_cos();
        let wx = v.x * cos_p + v.z * sin_p;
        let wz = v.z * cos_p - v.x * sin_p;
        DVec3::new(wx * cos_l + v.y * sin_l, -wx * sin_l + v.y * cos_l, wz)
    }

    fn to_screen(&self, v: DVec3) -> Pos2 {
        let k = self.scale();
        let t = self.translate();
        pos2(
            (f64::from(t.x) + v.y * k) as f32,
            (f64::from(t.y) - v.z * k) as f32,
        )
    }

    fn from_screen(&self, screen: Pos2) -> (f64, f64) {
        let k = self.scale();
        let t = self.translate();
        (
            f64::from(screen.x - t.x) / k,
            f64::from(t.y - screen.y) / k,
        )
    }

    /// Rotated-frame vector for a point; used by horizon clipping.
    pub(crate) fn view_vector(&self, point: GeoPoint) -> DVec3 {
        self.rotate(point.to_unit_vector())
    }

    /// Screen position of a rotated-frame vector, ignoring visibility.
    pub(crate) fn view_to_screen(&self, v: DVec3) -> Pos2 {
        self.to_screen(v)
    }
}
