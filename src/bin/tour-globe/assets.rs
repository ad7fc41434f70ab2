//! Embedded catalog loading and the one-shot landmass download.

use crate::constants::USER_AGENT;
use eframe::egui;
use rust_embed::RustEmbed;
use std::sync::mpsc;
use thiserror::Error;
use tour_globe::landmass::{Landmass, TopologyError};
use tour_globe::{CatalogError, TourCatalog, validate_catalog};

/// Embeds all assets from the assets/ directory into the binary.
/// In debug mode, assets are loaded from the filesystem for faster iteration.
/// In release mode, assets are compressed and embedded in the binary.
#[derive(RustEmbed)]
#[folder = "assets/"]
pub struct Assets;

/// Errors that can occur when loading the tournament catalog.
#[derive(Error, Debug)]
pub enum CatalogLoadError {
    #[error("tournaments.ron not found in embedded assets")]
    CatalogNotFound,
    #[error("invalid UTF-8 in tournaments.ron: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("failed to parse tournaments.ron: {0}")]
    ParseError(#[from] ron::de::SpannedError),
    #[error("invalid tournament catalog: {0}")]
    Invalid(#[from] CatalogError),
}

/// Errors that can occur while fetching world boundaries.
#[derive(Error, Debug)]
pub enum LandmassLoadError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid topology: {0}")]
    Topology(#[from] TopologyError),
}

/// State of the landmass layer.
pub enum LandmassLoadState {
    /// Download running on the tokio runtime.
    Loading(mpsc::Receiver<Result<Landmass, LandmassLoadError>>),
    /// Handed to the globe.
    Ready,
    /// Disabled or failed; the globe draws without land for this session.
    Absent,
}

/// Loads the tournament catalog from embedded assets, sorted by start date.
pub fn load_catalog() -> Result<TourCatalog, CatalogLoadError> {
    let file = Assets::get("tournaments.ron").ok_or(CatalogLoadError::CatalogNotFound)?;
    let ron_string = std::str::from_utf8(&file.data)?;
    let mut catalog: TourCatalog = ron::from_str(ron_string)?;
    validate_catalog(&catalog)?;
    catalog.sort_by_key(|tournament| tournament.start_date);
    log::info!("Loaded {} tournaments", catalog.len());
    Ok(catalog)
}

/// Downloads and decodes the world boundaries topology.
pub async fn fetch_landmass(client: &reqwest::Client, url: &str) -> Result<Landmass, LandmassLoadError> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(LandmassLoadError::Status(response.status()));
    }

    let bytes = response.bytes().await?;
    Ok(Landmass::from_topojson(&bytes)?)
}

/// Starts the landmass download in the background and returns the pending state.
pub fn spawn_landmass_fetch(
    runtime: &tokio::runtime::Runtime,
    ctx: egui::Context,
    url: String,
) -> LandmassLoadState {
    let (tx, rx) = mpsc::channel();
    runtime.spawn(async move {
        log::info!("Fetching landmass from {url}");
        let client = reqwest::Client::new();
        let result = fetch_landmass(&client, &url).await;
        let _ = tx.send(result);
        ctx.request_repaint();
    });
    LandmassLoadState::Loading(rx)
}

/// Checks a pending download without blocking. Returns the landmass once it arrives; a failed or
/// abandoned download leaves the state `Absent` for the rest of the session.
pub fn poll_landmass(state: &mut LandmassLoadState) -> Option<Landmass> {
    let LandmassLoadState::Loading(rx) = state else {
        return None;
    };

    match rx.try_recv() {
        Ok(Ok(landmass)) => {
            *state = LandmassLoadState::Ready;
            Some(landmass)
        }
        Ok(Err(err)) => {
            log::warn!("Landmass unavailable, drawing without it: {err}");
            *state = LandmassLoadState::Absent;
            None
        }
        Err(mpsc::TryRecvError::Disconnected) => {
            log::warn!("Landmass download ended without a result");
            *state = LandmassLoadState::Absent;
            None
        }
        Err(mpsc::TryRecvError::Empty) => None,
    }
}
