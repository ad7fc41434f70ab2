//! UI rendering methods for the Tour Globe application.

use crate::TourGlobeApp;
use crate::assets::LandmassLoadState;
use crate::colors;
use crate::constants::{SIDEBAR_WIDTH, ZOOM_SPEED};
use crate::painter::draw_globe;
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use tour_globe::globe::projection::{ZOOM_MAX, ZOOM_MIN};
use tour_globe::globe::selection::GlobeEvent;
use tour_globe::{Category, MONTH_NAMES, Tournament};

impl TourGlobeApp {
    /// Handles keyboard shortcuts for zoom, reset and deselect.
    pub fn handle_keyboard_input(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (zoom_in, zoom_out, reset, escape) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals),
                i.key_pressed(egui::Key::Minus),
                i.key_pressed(egui::Key::Num0),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if zoom_in {
            self.globe.set_zoom(self.globe.zoom() * ZOOM_SPEED);
        }
        if zoom_out {
            self.globe.set_zoom(self.globe.zoom() / ZOOM_SPEED);
        }
        if reset {
            self.globe.reset_view();
        }
        if escape {
            self.deselect();
        }
    }

    /// Renders the bottom status bar with controls hint and the current selection.
    pub fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Drag: Rotate | Scroll: Zoom | +/-: Zoom | 0: Reset | Esc: Deselect");

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(tournament) = self.selected_tournament() {
                        ui.label(format!(
                            "{} - {} ({})",
                            tournament.name,
                            tournament.location_name,
                            tournament.date_range_label()
                        ));
                    } else if let Some(month) = self.selected_month {
                        let name = MONTH_NAMES.get(month as usize).copied().unwrap_or("?");
                        ui.label(format!(
                            "{name}: {} tournaments, {} on this side",
                            self.globe.candidate_count(),
                            self.globe.markers().len()
                        ));
                    } else {
                        ui.label("Pick a month or a tournament");
                    }

                    if matches!(self.landmass, LandmassLoadState::Loading(_)) {
                        ui.separator();
                        ui.label("Loading coastlines");
                        ui.spinner();
                    }
                });
            });
        });
    }

    /// Renders the left sidebar panel.
    pub fn show_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("sidebar")
            .exact_width(SIDEBAR_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                self.show_sidebar_content(ui);
            });
    }

    /// Renders the sidebar content: month picker, tier legend and tournament list.
    fn show_sidebar_content(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);

        ui.strong("Month");
        ui.separator();

        let mut month = self.selected_month;
        let selected_text = month
            .and_then(|month| MONTH_NAMES.get(month as usize))
            .copied()
            .unwrap_or("None");
        egui::ComboBox::from_id_salt("month_picker")
            .selected_text(selected_text)
            .width(SIDEBAR_WIDTH - 24.0)
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut month, None, "None");
                for (index, name) in (0u32..).zip(MONTH_NAMES) {
                    ui.selectable_value(&mut month, Some(index), name);
                }
            });
        if month != self.selected_month {
            self.select_month(month);
        }

        ui.add_space(12.0);

        ui.strong("Ranking points");
        ui.separator();
        for category in Category::ALL {
            Self::tier_legend_entry(ui, category);
        }

        ui.add_space(12.0);

        ui.strong("Tournaments");
        ui.separator();

        if self.catalog.is_empty() {
            ui.label("No tournaments loaded");
            return;
        }

        if let Some(id) = self.show_tournament_table(ui) {
            self.select_tournament(id);
        }
    }

    /// Renders a colored dot with the tier's label.
    fn tier_legend_entry(ui: &mut egui::Ui, category: Category) {
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
            let center = rect.center();
            ui.painter().circle_filled(center, 5.0, colors::tier(category));
            ui.painter()
                .circle_stroke(center, 5.0, egui::Stroke::new(1.0, egui::Color32::GRAY));
            ui.label(format!("{} ({})", category.label(), category));
        });
    }

    /// Renders the tournament list for the current month (or the whole calendar).
    /// Returns the id of a clicked row.
    fn show_tournament_table(&self, ui: &mut egui::Ui) -> Option<String> {
        let rows: Vec<&Tournament> = self
            .catalog
            .iter()
            .filter(|tournament| {
                self.selected_month
                    .is_none_or(|month| tournament.start_month() == month)
            })
            .collect();

        let selected = self.selected_tournament.as_deref();
        let mut clicked = None;
        let row_height = ui.text_style_height(&egui::TextStyle::Body) + 6.0;

        TableBuilder::new(ui)
            .striped(true)
            .resizable(false)
            .sense(egui::Sense::click())
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::exact(96.0))
            .column(Column::remainder().clip(true))
            .column(Column::exact(44.0))
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Dates");
                });
                header.col(|ui| {
                    ui.strong("Tournament");
                });
                header.col(|ui| {
                    ui.strong("Pts");
                });
            })
            .body(|body| {
                body.rows(row_height, rows.len(), |mut row| {
                    let tournament = rows[row.index()];
                    row.set_selected(selected == Some(tournament.id.as_str()));
                    row.col(|ui| {
                        ui.label(tournament.date_range_label());
                    });
                    row.col(|ui| {
                        ui.label(&tournament.name)
                            .on_hover_text(&tournament.location_name);
                    });
                    row.col(|ui| {
                        ui.colored_label(colors::tier(tournament.points), tournament.points.to_string());
                    });
                    if row.response().clicked() {
                        clicked = Some(tournament.id.clone());
                    }
                });
            });

        clicked
    }

    /// Renders the central panel containing the globe.
    pub fn show_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).inner_margin(0.0))
            .show(ctx, |ui| {
                let panel_rect = ui.max_rect();
                self.show_globe(ui, ctx);
                self.show_zoom_controls(ctx, panel_rect);
            });
    }

    /// Feeds input to the globe, advances it and paints it.
    fn show_globe(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let (viewport_rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        let now = ui.input(|i| i.time);

        // Resize lands before this frame's gestures.
        self.globe.resize(viewport_rect);
        self.handle_pointer(ui, &response);
        self.handle_scroll_zoom(ui, viewport_rect);

        self.globe.select(
            self.selected_tournament.as_deref(),
            self.selected_month,
            &self.catalog,
            now,
        );
        self.globe.tick(now);
        if self.globe.is_flying() {
            ctx.request_repaint();
        }

        let hovering_marker = response
            .hover_pos()
            .is_some_and(|pos| self.globe.marker_at(pos).is_some());
        if self.globe.is_dragging() {
            ctx.set_cursor_icon(egui::CursorIcon::Grabbing);
        } else if hovering_marker {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        draw_globe(&ui.painter_at(viewport_rect), &self.globe);
        self.show_tooltip(ctx);
    }

    /// Maps egui's pointer response onto the globe's gesture calls.
    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response) {
        if response.drag_started()
            && let Some(origin) = ui.input(|i| i.pointer.press_origin())
        {
            self.globe.pointer_down(origin);
        }
        if response.dragged()
            && let Some(pos) = response.interact_pointer_pos()
        {
            self.globe.pointer_move(pos);
        }
        if response.drag_stopped() {
            self.globe.pointer_up();
        }
        if self.globe.is_dragging() && ui.input(|i| i.pointer.hover_pos().is_none()) {
            self.globe.pointer_leave();
        }

        if response.clicked()
            && let Some(pos) = response.interact_pointer_pos()
        {
            match self.globe.click(pos) {
                GlobeEvent::Select(id) => self.select_tournament(id),
                GlobeEvent::Deselect => self.selected_tournament = None,
                GlobeEvent::Ignored => {}
            }
        }
    }

    /// Handles scroll wheel zoom, zooming towards the mouse position.
    fn handle_scroll_zoom(&mut self, ui: &egui::Ui, viewport_rect: egui::Rect) {
        let hover_pos = ui.input(|i| i.pointer.hover_pos());
        let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);

        let Some(cursor) = hover_pos.filter(|pos| viewport_rect.contains(*pos)) else {
            return;
        };
        if scroll_delta == 0.0 {
            return;
        }

        let multiplier = if scroll_delta > 0.0 {
            ZOOM_SPEED
        } else {
            1.0 / ZOOM_SPEED
        };
        self.globe.wheel(cursor, multiplier);
    }

    /// Renders the detail tooltip next to the active marker.
    fn show_tooltip(&mut self, ctx: &egui::Context) {
        let Some(marker) = self.globe.active_tooltip() else {
            return;
        };
        let anchor = marker.rendered + egui::vec2(12.0, -12.0);
        let Some(tournament) = tour_globe::find_tournament(&self.catalog, &marker.id) else {
            return;
        };

        let mut close = false;
        egui::Area::new(egui::Id::new("marker_tooltip"))
            .fixed_pos(anchor)
            .order(egui::Order::Foreground)
            .interactable(true)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(240.0);
                    ui.horizontal(|ui| {
                        ui.strong(&tournament.name);
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            close = ui.small_button("x").on_hover_text("Close").clicked();
                        });
                    });
                    ui.label(&tournament.location_name);
                    ui.label(tournament.date_range_label());
                    ui.colored_label(
                        colors::tier(tournament.points),
                        format!("{} ({} pts)", tournament.points.label(), tournament.points),
                    );
                    if let Some(winner) = &tournament.winner {
                        ui.label(format!("Champion: {winner}"));
                    }
                });
            });

        if close {
            self.globe.close_tooltip();
        }
    }

    /// Renders the floating zoom controls panel.
    fn show_zoom_controls(&mut self, ctx: &egui::Context, panel_rect: egui::Rect) {
        let margin = 12.0;
        let panel_width = 160.0;
        let panel_height = 36.0;

        let anchor_pos = egui::pos2(
            panel_rect.right() - panel_width - margin,
            panel_rect.bottom() - panel_height - margin,
        );

        egui::Area::new(egui::Id::new("zoom_controls"))
            .fixed_pos(anchor_pos)
            .interactable(true)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(ui.style().visuals.window_fill.gamma_multiply(0.95))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            let mut zoom = self.globe.zoom();
                            let slider = ui.add(
                                egui::Slider::new(&mut zoom, ZOOM_MIN..=ZOOM_MAX)
                                    .logarithmic(true)
                                    .show_value(false),
                            );
                            if slider.changed() {
                                self.globe.set_zoom(zoom);
                            }
                            if ui.button("Fit").on_hover_text("Reset view (0)").clicked() {
                                self.globe.reset_view();
                            }
                        });
                    });
            });
    }
}
