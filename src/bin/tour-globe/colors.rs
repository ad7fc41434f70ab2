//! Color constants for the globe and UI elements.

use eframe::egui::Color32;
use tour_globe::Category;

// Sphere
pub const SPHERE_FILL: Color32 = Color32::from_rgb(31, 41, 55);
pub const SPHERE_STROKE: Color32 = Color32::from_rgb(75, 85, 99);
pub const GRATICULE: Color32 = Color32::from_rgb(55, 65, 81);
pub const LAND_STROKE: Color32 = Color32::from_rgb(107, 114, 128);

// Ranking-points tiers
pub const GRAND_SLAM: Color32 = Color32::from_rgb(168, 85, 247);
pub const FINALS: Color32 = Color32::from_rgb(99, 102, 241);
pub const MASTERS: Color32 = Color32::from_rgb(59, 130, 246);
pub const ATP_500: Color32 = Color32::from_rgb(245, 158, 11);
pub const ATP_250: Color32 = Color32::from_rgb(34, 197, 94);

// Markers
pub const MARKER_STROKE: Color32 = Color32::from_rgba_premultiplied(255, 255, 255, 200);
pub const PIN_ACCENT: Color32 = Color32::from_rgb(52, 211, 153);
pub const LEADER_LINE: Color32 = Color32::from_rgba_premultiplied(120, 120, 120, 140);

pub fn tier(category: Category) -> Color32 {
    match category {
        Category::GrandSlam2000 => GRAND_SLAM,
        Category::Finals1500 => FINALS,
        Category::Masters1000 => MASTERS,
        Category::Atp500 => ATP_500,
        Category::Atp250 => ATP_250,
    }
}
