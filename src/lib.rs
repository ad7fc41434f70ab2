pub mod globe;
pub mod landmass;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

pub use globe::projection::GeoPoint;

/// English month names, indexed by 0-based month.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A single tournament on the tour calendar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tournament {
    /// Unique key for this tournament (e.g., "ao2025")
    pub id: String,
    /// Display name (e.g., "Australian Open")
    pub name: String,
    /// Human-readable venue (e.g., "Melbourne, Australia")
    pub location_name: String,
    /// First day of the main draw
    pub start_date: NaiveDate,
    /// Final day of the tournament
    pub end_date: NaiveDate,
    /// Ranking points awarded to the winner; drives marker color
    pub points: Category,
    /// Champion's name, once decided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    /// Venue coordinates
    pub location: GeoPoint,
}

impl Tournament {
    /// 0-based month the tournament starts in. The month filter keys on this.
    pub fn start_month(&self) -> u32 {
        self.start_date.month0()
    }

    /// Short date range label, e.g. "Jan 12 - 26" or "Apr 23 - May 4".
    pub fn date_range_label(&self) -> String {
        let start = self.start_date.format("%b %-d");
        if self.start_date.month() == self.end_date.month() {
            format!("{start} - {}", self.end_date.day())
        } else {
            format!("{start} - {}", self.end_date.format("%b %-d"))
        }
    }
}

/// Ranking-points tier of a tournament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Category {
    Atp250,
    Atp500,
    Masters1000,
    Finals1500,
    GrandSlam2000,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::GrandSlam2000,
        Category::Finals1500,
        Category::Masters1000,
        Category::Atp500,
        Category::Atp250,
    ];

    pub fn points(self) -> u32 {
        match self {
            Category::Atp250 => 250,
            Category::Atp500 => 500,
            Category::Masters1000 => 1000,
            Category::Finals1500 => 1500,
            Category::GrandSlam2000 => 2000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Atp250 => "ATP 250",
            Category::Atp500 => "ATP 500",
            Category::Masters1000 => "Masters 1000",
            Category::Finals1500 => "ATP Finals",
            Category::GrandSlam2000 => "Grand Slam",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.points())
    }
}

/// Points value that does not correspond to a tier.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown ranking-points tier: {0}")]
pub struct UnknownCategory(pub u32);

impl TryFrom<u32> for Category {
    type Error = UnknownCategory;

    fn try_from(points: u32) -> Result<Self, Self::Error> {
        match points {
            250 => Ok(Category::Atp250),
            500 => Ok(Category::Atp500),
            1000 => Ok(Category::Masters1000),
            1500 => Ok(Category::Finals1500),
            2000 => Ok(Category::GrandSlam2000),
            other => Err(UnknownCategory(other)),
        }
    }
}

impl From<Category> for u32 {
    fn from(category: Category) -> Self {
        category.points()
    }
}

/// Root type for the tournaments data file
pub type TourCatalog = Vec<Tournament>;

/// Errors found when checking a loaded catalog.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("duplicate tournament id: {0}")]
    DuplicateId(String),
}

/// Checks the invariants the globe relies on (currently: unique ids).
pub fn validate_catalog(catalog: &[Tournament]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for tournament in catalog {
        if !seen.insert(tournament.id.as_str()) {
            return Err(CatalogError::DuplicateId(tournament.id.clone()));
        }
    }
    Ok(())
}

pub fn find_tournament<'a>(catalog: &'a [Tournament], id: &str) -> Option<&'a Tournament> {
    catalog.iter().find(|tournament| tournament.id == id)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn category_round_trips_through_points() {
        for category in Category::ALL {
            assert_eq!(Category::try_from(category.points()), Ok(category));
        }
        assert_eq!(Category::try_from(750), Err(UnknownCategory(750)));
    }

    #[test]
    fn parses_ron_catalog_entry() {
        let ron_string = r#"[
            Tournament(
                id: "rg2025",
                name: "Roland-Garros",
                location_name: "Paris, France",
                start_date: "2025-05-25",
                end_date: "2025-06-08",
                points: 2000,
                winner: Some("Carlos Alcaraz"),
                location: (lat: 48.84, lon: 2.24),
            ),
        ]"#;
        let catalog: TourCatalog = ron::from_str(ron_string).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].points, Category::GrandSlam2000);
        assert_eq!(catalog[0].start_month(), 4);
        assert_eq!(catalog[0].date_range_label(), "May 25 - Jun 8");
    }

    #[test]
    fn rejects_unknown_points_tier() {
        let ron_string = r#"[Tournament(id: "x", name: "X", location_name: "Y",
            start_date: "2025-01-01", end_date: "2025-01-07", points: 300,
            winner: None, location: (lat: 0.0, lon: 0.0))]"#;
        assert!(ron::from_str::<TourCatalog>(ron_string).is_err());
    }

    #[test]
    fn same_month_range_label_omits_month() {
        let t = tournament("ao", "2025-01-12", 2000, -37.82, 144.97);
        assert_eq!(t.date_range_label(), "Jan 12 - 18");
    }

    #[test]
    fn validate_catalog_flags_duplicates() {
        let mut catalog = catalog();
        assert_eq!(validate_catalog(&catalog), Ok(()));
        catalog.push(tournament("rg", "2025-05-25", 2000, 48.84, 2.24));
        assert_eq!(
            validate_catalog(&catalog),
            Err(CatalogError::DuplicateId("rg".to_string()))
        );
    }

    #[test]
    fn find_tournament_by_id() {
        let catalog = catalog();
        assert_eq!(find_tournament(&catalog, "halle").map(|t| t.points.points()), Some(500));
        assert!(find_tournament(&catalog, "missing").is_none());
    }
}
