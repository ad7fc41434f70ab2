use std::time::Duration;

/// Width of the sidebar panel in pixels.
pub const SIDEBAR_WIDTH: f32 = 300.0;

/// Zoom multiplier per scroll notch or keypress.
pub const ZOOM_SPEED: f64 = 1.2;

/// How long a "fly to" transition takes.
pub const FLIGHT_DURATION: Duration = Duration::from_millis(1250);

/// Marker glyph radius in pixels.
pub const MARKER_RADIUS: f32 = 6.0;

/// Gap kept between neighbouring markers in pixels.
pub const MARKER_CLEARANCE: f32 = 2.0;

/// Relaxation steps for marker de-cluttering.
pub const OVERLAP_ITERATIONS: usize = 120;

/// World boundaries in TopoJSON, fetched once at startup.
pub const LANDMASS_URL: &str = "https://unpkg.com/world-atlas@2/countries-110m.json";

pub const USER_AGENT: &str = "tour-globe";
