use crate::globe::projection::GeoPoint;
use crate::{Category, Tournament};
use eframe::egui::Pos2;

/// One tournament drawn as a pin. Built fresh for every layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPoint {
    /// Tournament id, used to match clicks and external selection
    pub id: String,
    pub geo: GeoPoint,
    pub category: Category,
    /// Undistorted projected position
    pub anchored: Pos2,
    /// Position after overlap resolution
    pub rendered: Pos2,
    /// Whether this is the explicitly selected tournament
    pub pinned: bool,
}

impl MarkerPoint {
    /// A marker that has not been projected yet.
    pub fn from_tournament(tournament: &Tournament, pinned: bool) -> Self {
        Self {
            id: tournament.id.clone(),
            geo: tournament.location,
            category: tournament.points,
            anchored: Pos2::ZERO,
            rendered: Pos2::ZERO,
            pinned,
        }
    }
}
