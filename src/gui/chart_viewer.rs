//! Chart Viewer Widget
//! Central scrollable report: introduction, reference table, yearly and
//! monthly sections with interactive plots.

use crate::charts::ChartPlotter;
use crate::data::{AggregateRow, Location};
use crate::report::reference::{
    BOX_PLOT_LEAD, DATA_SOURCE, INTRODUCTION, MONTHLY_LEAD, TITLE, YEARLY_NARRATIVE,
};
use crate::report::{Dashboard, PresentError};
use egui::{RichText, ScrollArea};
use std::collections::BTreeMap;

const SECTION_SPACING: f32 = 15.0;

/// Scrollable report display area.
#[derive(Default)]
pub struct ChartViewer {
    dashboard: Option<Dashboard>,
    /// Per-location rows, extracted once per dashboard instead of per frame.
    yearly: BTreeMap<Location, Vec<AggregateRow>>,
    monthly: BTreeMap<Location, Vec<AggregateRow>>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_ref()
    }

    /// Replace the displayed report.
    pub fn set_dashboard(&mut self, dashboard: Dashboard) -> Result<(), PresentError> {
        let mut yearly = BTreeMap::new();
        let mut monthly = BTreeMap::new();
        for location in Location::ALL {
            yearly.insert(location, dashboard.yearly_rows(location)?);
            monthly.insert(location, dashboard.monthly_rows(location)?);
        }

        self.yearly = yearly;
        self.monthly = monthly;
        self.dashboard = Some(dashboard);
        Ok(())
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let Some(dashboard) = &self.dashboard else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading(RichText::new(TITLE).size(26.0).strong());
                ui.add_space(SECTION_SPACING);

                // Introduction
                ui.heading("Introduction");
                for paragraph in INTRODUCTION {
                    ui.label(paragraph);
                    ui.add_space(6.0);
                }
                ChartPlotter::draw_reference_table(ui);
                ui.add_space(6.0);
                ui.label(DATA_SOURCE);
                ui.add_space(SECTION_SPACING);

                // Historical data
                ui.heading("Historical Data");
                ui.label(RichText::new("Yearly Data").size(16.0).strong());
                ui.add_space(6.0);

                let scale_max = dashboard.max_aqi();
                ui.columns(2, |columns| {
                    for (ui, location) in columns.iter_mut().zip(Location::ALL) {
                        ui.label(RichText::new(location.label()).strong());
                        ui.hyperlink_to("🗺 Map", location.map_embed_url());
                        ui.add_space(4.0);
                        if let Some(rows) = self.yearly.get(&location) {
                            ChartPlotter::draw_yearly_table(ui, rows, location, scale_max);
                        }
                    }
                });

                ui.add_space(SECTION_SPACING);
                ui.label(YEARLY_NARRATIVE);
                ui.add_space(6.0);
                ui.label(BOX_PLOT_LEAD);
                ChartPlotter::draw_yearly_boxplot(ui, dashboard);

                ui.add_space(SECTION_SPACING);
                ui.label(MONTHLY_LEAD);
                ui.add_space(6.0);
                ui.label(RichText::new("Monthly Data").size(16.0).strong());

                for location in Location::ALL {
                    let Some(rows) = self.monthly.get(&location) else {
                        continue;
                    };
                    ui.add_space(SECTION_SPACING);
                    ui.label(RichText::new(location.label()).strong());
                    ChartPlotter::draw_monthly_area(ui, rows, location);
                    ui.add_space(6.0);
                    ChartPlotter::draw_monthly_table(ui, rows, location);
                }
            });
    }
}
