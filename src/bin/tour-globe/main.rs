#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod assets;
mod colors;
mod constants;
mod painter;
mod ui;

use assets::{LandmassLoadState, load_catalog, poll_landmass, spawn_landmass_fetch};
use clap::Parser;
use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use tour_globe::globe::overlap::OverlapResolver;
use tour_globe::globe::{GlobeConfig, GlobeView};
use tour_globe::{TourCatalog, Tournament, find_tournament};

/// Interactive globe of the tennis tour calendar.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Where to fetch the world boundaries topology from
    #[arg(long, default_value = constants::LANDMASS_URL)]
    landmass_url: String,

    /// Skip the landmass download and draw only the sphere and graticule
    #[arg(long)]
    offline: bool,

    /// Month to show at startup (1-12)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
}

/// Main application state for the tour globe.
pub struct TourGlobeApp {
    catalog: TourCatalog,
    /// At most one of these is set at a time
    selected_tournament: Option<String>,
    selected_month: Option<u32>,
    globe: GlobeView,
    landmass: LandmassLoadState,
    toasts: Toasts,
    /// Keeps the background download alive
    _runtime: Option<tokio::runtime::Runtime>,
}

impl TourGlobeApp {
    fn new(cc: &eframe::CreationContext<'_>, args: Args) -> Self {
        let mut toasts = Toasts::new()
            .anchor(egui::Align2::RIGHT_TOP, (-10.0, 10.0))
            .direction(egui::Direction::TopDown);

        let catalog = match load_catalog() {
            Ok(catalog) => catalog,
            Err(err) => {
                log::error!("Failed to load tournaments: {err}");
                toasts.add(Toast {
                    kind: ToastKind::Error,
                    text: err.to_string().into(),
                    options: ToastOptions::default()
                        .duration_in_seconds(10.0)
                        .show_icon(true),
                    ..Default::default()
                });
                Vec::new()
            }
        };

        let (runtime, landmass) = if args.offline {
            log::info!("Offline mode - landmass layer disabled");
            (None, LandmassLoadState::Absent)
        } else {
            match tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
            {
                Ok(runtime) => {
                    let state =
                        spawn_landmass_fetch(&runtime, cc.egui_ctx.clone(), args.landmass_url);
                    (Some(runtime), state)
                }
                Err(err) => {
                    log::warn!("Could not start async runtime, landmass layer disabled: {err}");
                    (None, LandmassLoadState::Absent)
                }
            }
        };

        let globe = GlobeView::new(GlobeConfig {
            flight_duration: constants::FLIGHT_DURATION,
            overlap: OverlapResolver {
                radius: constants::MARKER_RADIUS,
                clearance: constants::MARKER_CLEARANCE,
                iterations: constants::OVERLAP_ITERATIONS,
                ..Default::default()
            },
            ..Default::default()
        });

        Self {
            catalog,
            selected_tournament: None,
            selected_month: args.month.map(|month| month - 1),
            globe,
            landmass,
            toasts,
            _runtime: runtime,
        }
    }

    fn selected_tournament(&self) -> Option<&Tournament> {
        find_tournament(&self.catalog, self.selected_tournament.as_deref()?)
    }

    fn select_tournament(&mut self, id: String) {
        log::debug!("Selected tournament {id}");
        self.selected_tournament = Some(id);
        self.selected_month = None;
    }

    fn select_month(&mut self, month: Option<u32>) {
        self.selected_month = month;
        if month.is_some() {
            self.selected_tournament = None;
        }
    }

    fn deselect(&mut self) {
        self.selected_tournament = None;
        self.globe.close_tooltip();
    }

    /// Hands the landmass to the globe once the download finishes.
    fn poll_landmass(&mut self) {
        if let Some(landmass) = poll_landmass(&mut self.landmass) {
            self.globe.set_landmass(landmass);
        }
    }
}

impl eframe::App for TourGlobeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_landmass();
        self.handle_keyboard_input(ctx);

        self.show_status_bar(ctx);
        self.show_sidebar(ctx);
        self.show_central_panel(ctx);

        // Show toasts
        self.toasts.show(ctx);
    }
}

fn main() -> eframe::Result {
    env_logger::init();
    let args = Args::parse();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title("Tour Globe"),
        ..Default::default()
    };

    eframe::run_native(
        "Tour Globe",
        options,
        Box::new(move |cc| Ok(Box::new(TourGlobeApp::new(cc, args)))),
    )
}
