//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use super::{location_rgb, MONTHLY_SERIES};
use crate::data::{AggregateRow, Location};
use crate::report::reference::AQI_BANDS;
use crate::report::Dashboard;
use egui::{Color32, RichText, ScrollArea};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};

const PLOT_HEIGHT: f32 = 300.0;
/// Horizontal shift of each location's box within a year slot.
const BOX_SHIFT: f64 = 0.2;

/// Creates dashboard charts and tables using egui.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for a location.
    pub fn location_color(location: Location) -> Color32 {
        let (r, g, b) = location_rgb(location);
        Color32::from_rgb(r, g, b)
    }

    /// Draw the yearly box plot, one box per (year, location).
    /// X-axis: years, Y-axis: composite index
    pub fn draw_yearly_boxplot(ui: &mut egui::Ui, dashboard: &Dashboard) {
        let years = dashboard.years();
        let x_labels = years.clone();

        Plot::new("yearly_boxplot")
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Year")
            .y_axis_label("AQI")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                x_labels
                    .get(idx as usize)
                    .map(|y| y.to_string())
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for (loc_idx, location) in Location::ALL.into_iter().enumerate() {
                    let color = Self::location_color(location);
                    let shift = if loc_idx == 0 { -BOX_SHIFT } else { BOX_SHIFT };

                    let mut boxes = Vec::new();
                    let mut outliers: Vec<[f64; 2]> = Vec::new();

                    for (i, &year) in years.iter().enumerate() {
                        let Some(stats) = dashboard.box_stats_for(year, location) else {
                            continue;
                        };
                        let x = i as f64 + shift;

                        boxes.push(
                            BoxElem::new(
                                x,
                                BoxSpread::new(
                                    stats.whisker_low,
                                    stats.q1,
                                    stats.median,
                                    stats.q3,
                                    stats.whisker_high,
                                ),
                            )
                            .name(format!("{year} {location}"))
                            .box_width(0.35)
                            .fill(color.gamma_multiply(0.3))
                            .stroke(egui::Stroke::new(1.5, color)),
                        );
                        outliers.extend(stats.outliers.iter().map(|&v| [x, v]));
                    }

                    plot_ui.box_plot(BoxPlot::new(boxes).name(location.label()));
                    if !outliers.is_empty() {
                        plot_ui.points(
                            Points::new(PlotPoints::from(outliers))
                                .radius(2.0)
                                .color(color.gamma_multiply(0.7)),
                        );
                    }
                }
            });
    }

    /// Draw the monthly max/mean/min area chart of one location.
    pub fn draw_monthly_area(ui: &mut egui::Ui, rows: &[AggregateRow], location: Location) {
        let months: Vec<String> = rows.iter().map(|r| r.period.to_string()).collect();

        Plot::new(format!("monthly_{}", location.slug()))
            .height(PLOT_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Month")
            .y_axis_label("AQI")
            .include_y(0.0)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                months.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                for series in &MONTHLY_SERIES {
                    let (r, g, b) = series.rgb;
                    let color = Color32::from_rgb(r, g, b);
                    let value = series.value;
                    let points: PlotPoints = rows
                        .iter()
                        .enumerate()
                        .map(|(i, row)| [i as f64, value(row)])
                        .collect();

                    plot_ui.line(
                        Line::new(points)
                            .color(color)
                            .fill(0.0_f32)
                            .width(1.5)
                            .name(series.name),
                    );
                }
            });
    }

    /// Draw the AQI health concern lookup.
    pub fn draw_reference_table(ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("aqi_reference")
                    .striped(true)
                    .spacing([12.0, 6.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Health Concern").strong());
                        ui.label(RichText::new("AQI Value").strong());
                        ui.label(RichText::new("Remarks").strong());
                        ui.end_row();

                        for band in &AQI_BANDS {
                            ui.label(band.concern);
                            ui.label(band.range_label());
                            ui.add(egui::Label::new(band.remarks).wrap());
                            ui.end_row();
                        }
                    });
            });
    }

    /// Draw yearly min/mean/max with bars scaled to `scale_max`.
    pub fn draw_yearly_table(
        ui: &mut egui::Ui,
        rows: &[AggregateRow],
        location: Location,
        scale_max: f64,
    ) {
        let color = Self::location_color(location);
        let scale_max = scale_max.max(f64::EPSILON);

        egui::Grid::new(ui.make_persistent_id(format!("yearly_table_{}", location.slug())))
            .striped(true)
            .min_col_width(40.0)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label(RichText::new("Year").strong().size(11.0));
                ui.label(RichText::new("AQI min").strong().size(11.0));
                ui.label(RichText::new("AQI mean").strong().size(11.0));
                ui.label(RichText::new("AQI max").strong().size(11.0));
                ui.end_row();

                for row in rows {
                    ui.label(RichText::new(row.period.to_string()).size(11.0));
                    for value in [row.min, row.mean, row.max] {
                        ui.add(
                            egui::ProgressBar::new((value / scale_max) as f32)
                                .desired_width(90.0)
                                .fill(color.gamma_multiply(0.6))
                                .text(format!("{value:.2}")),
                        );
                    }
                    ui.end_row();
                }
            });
    }

    /// Draw monthly statistics transposed: one column per month.
    pub fn draw_monthly_table(ui: &mut egui::Ui, rows: &[AggregateRow], location: Location) {
        ScrollArea::horizontal()
            .id_salt(format!("monthly_scroll_{}", location.slug()))
            .show(ui, |ui| {
                egui::Grid::new(
                    ui.make_persistent_id(format!("monthly_table_{}", location.slug())),
                )
                .striped(true)
                .min_col_width(55.0)
                .spacing([8.0, 4.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Month").strong().size(11.0));
                    for row in rows {
                        ui.label(RichText::new(row.period.to_string()).strong().size(11.0));
                    }
                    ui.end_row();

                    let stats: [(&str, fn(&AggregateRow) -> f64); 3] = [
                        ("AQI mean", |r| r.mean),
                        ("AQI min", |r| r.min),
                        ("AQI max", |r| r.max),
                    ];
                    for (name, value) in stats {
                        ui.label(RichText::new(name).strong().size(11.0));
                        for row in rows {
                            ui.label(RichText::new(format!("{:.2}", value(row))).size(11.0));
                        }
                        ui.end_row();
                    }
                });
            });
    }
}
