use crate::config::Config;
use crate::logic::{Poller, SharedState, lock_state};
use crate::model::ping_result::{format_timestamp_in, system_locale};
use crate::model::{AppState, Category, PingResult};
use chrono::{Local, Locale};
use eframe::egui;
use eframe::egui::{Color32, Margin, RichText, Stroke};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tr::tr;

/// One table row, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub name: String,
    /// Container IP, also the row identity.
    pub ip: String,
    pub status: String,
    pub status_category: Category,
    pub ping_time: String,
    pub ping_category: Category,
    pub last_success: String,
    pub created: String,
}

impl RowView {
    pub fn from_result(result: &PingResult, locale: Locale) -> Self {
        Self {
            name: result.display_name().to_string(),
            ip: result.ip.clone(),
            status: result.status.clone(),
            status_category: result.status_category(),
            ping_time: result.display_ping_time(),
            ping_category: result.ping_category(),
            last_success: format_timestamp_in(&result.last_success, &Local, locale),
            created: format_timestamp_in(&result.created, &Local, locale),
        }
    }
}

/// Maps the snapshot onto table rows, one per record, in the order received.
pub fn build_rows(snapshot: &[PingResult], locale: Locale) -> Vec<RowView> {
    snapshot
        .iter()
        .map(|result| RowView::from_result(result, locale))
        .collect()
}

pub struct PingDashboard {
    pub(crate) state: SharedState,
    pub(crate) locale: Locale,
    poller: Option<Poller>,
}

/// Helper for application-specific colors adapted for light/dark themes.
struct PingVisuals {
    pub is_dark: bool,
}

impl PingVisuals {
    fn from_ctx(ctx: &egui::Context) -> Self {
        Self {
            is_dark: ctx.style().visuals.dark_mode,
        }
    }

    fn category_color(&self, category: Category) -> Color32 {
        match category {
            Category::Positive => {
                if self.is_dark {
                    Color32::from_rgb(0, 190, 140) // Bluish green
                } else {
                    Color32::from_rgb(0, 130, 95)
                }
            }
            Category::Negative => Color32::from_rgb(213, 94, 0), // Vermilion
            Category::Neutral => {
                if self.is_dark {
                    Color32::from_rgb(240, 228, 66) // Yellow
                } else {
                    Color32::from_rgb(230, 159, 0) // Orange
                }
            }
        }
    }
}

/// Small framed label, colored by category.
fn tag(ui: &mut egui::Ui, text: &str, color: Color32) {
    egui::Frame::new()
        .fill(color.gamma_multiply(0.15))
        .stroke(Stroke::new(1.0, color))
        .inner_margin(Margin::symmetric(6, 1))
        .corner_radius(4.0)
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(color).monospace());
        });
}

impl PingDashboard {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let state = Arc::new(Mutex::new(AppState::starting()));

        let poller = match Poller::spawn(config, state.clone(), Some(cc.egui_ctx.clone())) {
            Ok(poller) => Some(poller),
            Err(e) => {
                tracing::error!("Failed to start poller: {}", e);
                lock_state(&state).stop();
                None
            }
        };

        Self {
            state,
            locale: system_locale(),
            poller,
        }
    }

    /// Dashboard over existing state with no poller attached.
    pub fn from_state(state: SharedState) -> Self {
        Self {
            state,
            locale: system_locale(),
            poller: None,
        }
    }

    /// Stops polling. The last snapshot stays on screen.
    pub fn shutdown(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
    }

    pub fn ui_layout(&mut self, ctx: &egui::Context) {
        // Copy what we need once, so the lock is not held while drawing.
        let (rows, loading, last_updated) = {
            let state = lock_state(&self.state);
            (
                build_rows(&state.snapshot, self.locale),
                state.is_loading(),
                state.last_updated,
            )
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(tr!("Docker container monitoring"));
                if loading {
                    ui.spinner();
                }

                // Theme switch (right)
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mut theme = ui.ctx().options(|o| o.theme_preference);
                    let old_theme = theme;
                    theme.radio_buttons(ui);
                    if theme != old_theme {
                        ui.ctx().options_mut(|o| o.theme_preference = theme);
                    }
                });
            });

            ui.horizontal(|ui| {
                ui.label(format!("{}: {}", tr!("Containers"), rows.len()));
                if let Some(updated) = last_updated {
                    ui.separator();
                    ui.label(format!(
                        "{}: {}",
                        tr!("Updated"),
                        updated.format_localized("%X", self.locale)
                    ));
                }
            });

            ui.separator();

            let visuals = PingVisuals::from_ctx(ctx);
            egui::ScrollArea::both().show(ui, |ui| {
                egui::Grid::new("ping_results")
                    .num_columns(6)
                    .striped(true)
                    .spacing([16.0, 6.0])
                    .min_col_width(60.0)
                    .show(ui, |ui| {
                        ui.strong(tr!("Container"));
                        ui.strong(tr!("IP address"));
                        ui.strong(tr!("Status"));
                        ui.strong(tr!("Ping time (ms)"));
                        ui.strong(tr!("Last successful ping"));
                        ui.strong(tr!("Created"));
                        ui.end_row();

                        for row in &rows {
                            ui.push_id(&row.ip, |ui| {
                                ui.label(&row.name);
                            });
                            ui.label(RichText::new(&row.ip).monospace());
                            tag(ui, &row.status, visuals.category_color(row.status_category));
                            tag(ui, &row.ping_time, visuals.category_color(row.ping_category));
                            ui.label(&row.last_success);
                            ui.label(&row.created);
                            ui.end_row();
                        }
                    });

                if rows.is_empty() && !loading {
                    ui.add_space(8.0);
                    ui.weak(tr!("No data"));
                }
            });
        });
    }
}

impl eframe::App for PingDashboard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_layout(ctx);
        ctx.request_repaint_after(Duration::from_millis(1000));
    }
}

impl Drop for PingDashboard {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(ip: &str, name: &str, status: &str, ping_time: f64) -> PingResult {
        PingResult {
            ip: ip.to_string(),
            name: name.to_string(),
            status: status.to_string(),
            ping_time,
            last_success: "2024-03-01T12:34:56Z".to_string(),
            created: String::new(),
        }
    }

    #[test]
    fn test_rows_match_snapshot() {
        let snapshot = vec![
            result("172.17.0.4", "/web", "Up 2 hours", 0.31),
            result("172.17.0.2", "/db", "Exited (1) 3 minutes ago", 1500.0),
            result("172.17.0.3", "cache", "Restarting (1) 1 second ago", 1000.0),
        ];
        let rows = build_rows(&snapshot, Locale::POSIX);

        assert_eq!(rows.len(), snapshot.len());
        for (row, result) in rows.iter().zip(&snapshot) {
            assert_eq!(row.ip, result.ip);
        }

        assert_eq!(rows[0].name, "web");
        assert_eq!(rows[0].status_category, Category::Positive);
        assert_eq!(rows[0].ping_time, "0.31");
        assert_eq!(rows[0].ping_category, Category::Positive);

        assert_eq!(rows[1].name, "db");
        assert_eq!(rows[1].status_category, Category::Negative);
        assert_eq!(rows[1].ping_category, Category::Negative);

        assert_eq!(rows[2].name, "cache");
        assert_eq!(rows[2].status_category, Category::Neutral);
        assert_eq!(rows[2].ping_time, "1000.00");
        assert_eq!(rows[2].ping_category, Category::Positive);
        assert_eq!(rows[2].created, "-");
    }

    #[test]
    fn test_rows_empty_snapshot() {
        assert!(build_rows(&[], Locale::POSIX).is_empty());
    }

    #[test]
    fn test_category_colors_differ() {
        for is_dark in [true, false] {
            let visuals = PingVisuals { is_dark };
            let positive = visuals.category_color(Category::Positive);
            let negative = visuals.category_color(Category::Negative);
            let neutral = visuals.category_color(Category::Neutral);
            assert_ne!(positive, negative);
            assert_ne!(positive, neutral);
            assert_ne!(negative, neutral);
        }
    }
}
