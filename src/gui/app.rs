//! AQI Dashboard Main Application
//! Main window with control panel and report viewer.

use crate::config::DashboardConfig;
use crate::data::{AggregationPipeline, Location};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, UserSettings};
use crate::report::{Dashboard, HtmlPresenter, PresentError, Presenter};
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;
use tracing::{error, info};

const APP_NAME: &str = "AQI Dashboard";

/// Pipeline result from background thread
enum LoadResult {
    Progress(f32, String),
    Complete(Box<Dashboard>),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async pipeline run
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: DashboardConfig,
        dashboard: Dashboard,
    ) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(UserSettings::from_config(&config)),
            config,
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        app.show_dashboard(dashboard);
        app
    }

    fn show_dashboard(&mut self, dashboard: Dashboard) {
        let readings = dashboard.output().readings.len();
        match self.chart_viewer.set_dashboard(dashboard) {
            Ok(()) => self
                .control_panel
                .set_progress(100.0, &format!("Complete! {readings} readings")),
            Err(e) => self.control_panel.set_error(&format!("Error: {e}")),
        }
    }

    /// Pick a new CSV for one location and reload.
    fn handle_browse(&mut self, location: Location) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .set_title(format!("{location} CSV"))
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.settings.set_csv(location, path);
            self.start_loading();
        }
    }

    /// Run the pipeline in a background thread
    fn start_loading(&mut self) {
        if self.is_loading {
            return;
        }

        let central = self.control_panel.settings.central_csv.clone();
        let south = self.control_panel.settings.south_csv.clone();

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.busy = true;
        self.control_panel.set_progress(5.0, "Reading CSV files...");

        thread::spawn(move || {
            Self::run_pipeline(tx, central, south);
        });
    }

    /// Called from background thread
    fn run_pipeline(tx: Sender<LoadResult>, central: PathBuf, south: PathBuf) {
        let _ = tx.send(LoadResult::Progress(10.0, "Aggregating readings...".to_string()));

        let output = match AggregationPipeline::run(&central, &south) {
            Ok(output) => output,
            Err(e) => {
                error!(error = %e, "reload failed");
                let _ = tx.send(LoadResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(LoadResult::Progress(
            70.0,
            "Computing box statistics...".to_string(),
        ));

        let dashboard = Dashboard::new(output);
        let _ = tx.send(LoadResult::Complete(Box::new(dashboard)));
    }

    /// Check for pipeline results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    LoadResult::Complete(dashboard) => {
                        self.show_dashboard(*dashboard);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.control_panel.set_error(&format!("Error: {error}"));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            } else {
                self.control_panel.busy = false;
            }
        }
    }

    /// Write the static report into a user-chosen folder and open it.
    fn handle_export(&mut self) {
        let Some(dashboard) = self.chart_viewer.dashboard() else {
            self.control_panel.set_error("No data to export");
            return;
        };

        let Some(folder) = rfd::FileDialog::new()
            .set_title("Export report to")
            .set_directory(&self.config.output_dir)
            .pick_folder()
        else {
            return;
        };

        self.control_panel.set_progress(50.0, "Writing report...");

        let config = DashboardConfig {
            output_dir: folder,
            open_report: true,
            ..self.config.clone()
        };
        let mut presenter = HtmlPresenter::from_config(&config);
        match presenter.present(dashboard) {
            Ok(()) => {
                info!(path = %presenter.index_path().display(), "report exported");
                self.control_panel.set_progress(
                    100.0,
                    &format!("Report exported: {}", presenter.index_path().display()),
                );
            }
            Err(e) => {
                self.control_panel.set_error(&format!("Export error: {e}"));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::Browse(location) => self.handle_browse(location),
                        ControlPanelAction::Reload => self.start_loading(),
                        ControlPanelAction::ExportReport => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Report
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

/// Interactive presentation: opens a native window over the dashboard.
pub struct GuiPresenter {
    config: DashboardConfig,
}

impl GuiPresenter {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }
}

impl Presenter for GuiPresenter {
    fn present(&mut self, dashboard: &Dashboard) -> Result<(), PresentError> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1400.0, 900.0])
                .with_min_inner_size([1000.0, 700.0])
                .with_title(APP_NAME),
            ..Default::default()
        };

        let config = self.config.clone();
        let dashboard = dashboard.clone();
        eframe::run_native(
            APP_NAME,
            options,
            Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, dashboard)))),
        )
        .map_err(|e| PresentError::Gui(e.to_string()))
    }
}
