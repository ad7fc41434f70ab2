//! Mapping between the application's selection state and what the globe shows.

use crate::globe::marker::MarkerPoint;
use crate::globe::projection::GeoPoint;
use crate::{Tournament, find_tournament};

/// Raised by the globe when the user clicks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobeEvent {
    /// A marker was clicked
    Select(String),
    /// Empty sphere or background was clicked
    Deselect,
    /// The click landed outside the globe viewport
    Ignored,
}

/// What a selection change means for the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PinChange {
    /// A tournament was just selected
    FlyTo(GeoPoint),
    /// The pinned tournament was cleared
    Unpinned,
    Unchanged,
}

/// Remembers the last selection it was given so it can tell a new pin from a repeated one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionBridge {
    tournament: Option<String>,
    month: Option<u32>,
}

impl SelectionBridge {
    /// Takes the current application selection. Month changes never fly.
    pub fn sync(
        &mut self,
        tournament: Option<&str>,
        month: Option<u32>,
        catalog: &[Tournament],
    ) -> PinChange {
        let previous = self.tournament.take();
        self.tournament = tournament.map(str::to_owned);
        self.month = month;

        let Some(id) = tournament else {
            return if previous.is_some() {
                PinChange::Unpinned
            } else {
                PinChange::Unchanged
            };
        };
        if previous.as_deref() == Some(id) {
            return PinChange::Unchanged;
        }
        match find_tournament(catalog, id) {
            Some(found) => PinChange::FlyTo(found.location),
            None => {
                log::warn!("Selected tournament {id} is not in the catalog");
                PinChange::Unpinned
            }
        }
    }

    /// The markers that qualify for display before hemisphere culling, in catalog order.
    pub fn candidates(&self, catalog: &[Tournament]) -> Vec<MarkerPoint> {
        if let Some(id) = &self.tournament {
            return find_tournament(catalog, id)
                .map(|tournament| vec![MarkerPoint::from_tournament(tournament, true)])
                .unwrap_or_default();
        }

        let Some(month) = self.month else {
            return Vec::new();
        };
        catalog
            .iter()
            .filter(|tournament| tournament.start_month() == month)
            .map(|tournament| MarkerPoint::from_tournament(tournament, false))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::catalog;

    fn ids(markers: &[MarkerPoint]) -> Vec<&str> {
        markers.iter().map(|marker| marker.id.as_str()).collect()
    }

    #[test]
    fn nothing_selected_shows_nothing() {
        let bridge = SelectionBridge::default();
        assert!(bridge.candidates(&catalog()).is_empty());
    }

    #[test]
    fn month_swap_leaves_no_stale_pins() {
        let catalog = catalog();
        let mut bridge = SelectionBridge::default();

        assert_eq!(bridge.sync(None, Some(0), &catalog), PinChange::Unchanged);
        assert_eq!(ids(&bridge.candidates(&catalog)), ["ao", "adelaide"]);

        assert_eq!(bridge.sync(None, Some(5), &catalog), PinChange::Unchanged);
        let june = bridge.candidates(&catalog);
        assert_eq!(ids(&june), ["halle", "queens", "wimbledon", "mallorca"]);
        assert!(june.iter().all(|marker| !marker.pinned));
    }

    #[test]
    fn tournament_selection_flies_once() {
        let catalog = catalog();
        let mut bridge = SelectionBridge::default();

        let target = bridge.sync(Some("rg"), None, &catalog);
        assert_eq!(target, PinChange::FlyTo(GeoPoint::new(48.84, 2.24)));
        assert_eq!(bridge.sync(Some("rg"), None, &catalog), PinChange::Unchanged);

        let markers = bridge.candidates(&catalog);
        assert_eq!(ids(&markers), ["rg"]);
        assert!(markers[0].pinned);
    }

    #[test]
    fn tournament_takes_precedence_over_month() {
        let catalog = catalog();
        let mut bridge = SelectionBridge::default();
        bridge.sync(Some("usopen"), Some(0), &catalog);
        assert_eq!(ids(&bridge.candidates(&catalog)), ["usopen"]);
    }

    #[test]
    fn reselecting_after_clear_flies_again() {
        let catalog = catalog();
        let mut bridge = SelectionBridge::default();
        bridge.sync(Some("ao"), None, &catalog);
        assert_eq!(bridge.sync(None, None, &catalog), PinChange::Unpinned);
        assert!(matches!(
            bridge.sync(Some("ao"), None, &catalog),
            PinChange::FlyTo(_)
        ));
    }

    #[test]
    fn unknown_tournament_shows_nothing() {
        let catalog = catalog();
        let mut bridge = SelectionBridge::default();
        assert_eq!(bridge.sync(Some("nope"), Some(5), &catalog), PinChange::Unpinned);
        assert!(bridge.candidates(&catalog).is_empty());
    }

    #[test]
    fn picking_a_month_unpins_the_tournament() {
        let catalog = catalog();
        let mut bridge = SelectionBridge::default();
        bridge.sync(Some("wimbledon"), None, &catalog);
        assert_eq!(bridge.sync(None, Some(5), &catalog), PinChange::Unpinned);
        assert_eq!(bridge.sync(None, Some(6), &catalog), PinChange::Unchanged);
    }

    #[test]
    fn out_of_range_month_matches_nothing() {
        let catalog = catalog();
        let mut bridge = SelectionBridge::default();
        bridge.sync(None, Some(12), &catalog);
        assert!(bridge.candidates(&catalog).is_empty());
    }
}
