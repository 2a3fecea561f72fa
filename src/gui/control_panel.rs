//! Control Panel Widget
//! Left side panel with data sources, actions and progress.

use crate::config::DashboardConfig;
use crate::data::Location;
use egui::{Color32, RichText};
use std::path::PathBuf;

/// Input files chosen by the user.
#[derive(Default, Clone)]
pub struct UserSettings {
    pub central_csv: PathBuf,
    pub south_csv: PathBuf,
}

impl UserSettings {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            central_csv: config.central_csv.clone(),
            south_csv: config.south_csv.clone(),
        }
    }

    pub fn csv_for(&self, location: Location) -> &PathBuf {
        match location {
            Location::CentralJakarta => &self.central_csv,
            Location::SouthJakarta => &self.south_csv,
        }
    }

    pub fn set_csv(&mut self, location: Location, path: PathBuf) {
        match location {
            Location::CentralJakarta => self.central_csv = path,
            Location::SouthJakarta => self.south_csv = path,
        }
    }
}

/// Left side control panel with file selection and processing controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub progress: f32,
    pub status: String,
    pub busy: bool,
    failed: bool,
}

impl ControlPanel {
    pub fn new(settings: UserSettings) -> Self {
        Self {
            settings,
            progress: 0.0,
            status: "Ready".to_string(),
            busy: false,
            failed: false,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🌫 AQI Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(
                RichText::new("Central & South Jakarta")
                    .size(11.0)
                    .color(Color32::GRAY),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Sources Section =====
        ui.label(RichText::new("📁 Data Sources").size(14.0).strong());
        ui.add_space(5.0);

        for location in Location::ALL {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(5.0)
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(location.label()).size(12.0).strong());
                    ui.horizontal(|ui| {
                        let path = self.settings.csv_for(location);
                        let name = path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| "No file selected".to_string());
                        let color = if path.is_file() {
                            ui.visuals().text_color()
                        } else {
                            Color32::from_rgb(220, 53, 69)
                        };
                        ui.label(RichText::new(name).size(11.0).color(color))
                            .on_hover_text(path.display().to_string());

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("📂 Browse").clicked() {
                                action = ControlPanelAction::Browse(location);
                            }
                        });
                    });
                });
            ui.add_space(5.0);
        }

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(!self.busy, |ui| {
                let button = egui::Button::new(RichText::new("▶ Reload Data").size(16.0))
                    .min_size(egui::vec2(200.0, 35.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Reload;
                }

                ui.add_space(8.0);

                let export_button =
                    egui::Button::new(RichText::new("📄 Export Report").size(14.0))
                        .min_size(egui::vec2(150.0, 30.0));
                if ui.add(export_button).clicked() {
                    action = ControlPanelAction::ExportReport;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Progress Section =====
        ui.label(RichText::new("📊 Progress").size(14.0).strong());
        ui.add_space(5.0);

        ui.add(
            egui::ProgressBar::new(self.progress / 100.0)
                .show_percentage()
                .animate(self.busy),
        );

        ui.add_space(5.0);

        let status_color = if self.failed {
            Color32::from_rgb(220, 53, 69)
        } else if self.progress >= 100.0 {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set progress and status
    pub fn set_progress(&mut self, progress: f32, status: &str) {
        self.progress = progress;
        self.status = status.to_string();
        self.failed = false;
    }

    /// Reset progress and show `status` as an error.
    pub fn set_error(&mut self, status: &str) {
        self.set_progress(0.0, status);
        self.failed = true;
    }

    pub fn has_error(&self) -> bool {
        self.failed
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Browse(Location),
    Reload,
    ExportReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_state_follows_the_last_update() {
        let mut panel = ControlPanel::new(UserSettings::default());
        panel.set_error("Export error: permission denied");
        assert!(panel.has_error());
        assert_eq!(panel.progress, 0.0);

        panel.set_progress(10.0, "Reading CSV files...");
        assert!(!panel.has_error());
    }
}
