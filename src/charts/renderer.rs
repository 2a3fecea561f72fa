//! Static Chart Renderer
//! Draws report charts with plotters into memory and encodes them as PNG.
//!
//! Charts:
//! 1. Yearly AQI: one box per (year, location), locations side by side,
//!    whiskers and outliers from the precomputed box statistics
//! 2. Monthly AQI: max/mean/min area chart for a single location

use super::{location_rgb, MONTHLY_SERIES};
use crate::data::{AggregateRow, Location};
use crate::report::{Dashboard, PresentError};
use crate::stats::BoxStats;
use image::RgbImage;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;
use tracing::debug;

type DrawResult = Result<(), Box<dyn Error>>;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);
/// Box geometry in year slots; each year spans one unit on the x axis.
const BOX_SHIFT: f64 = 0.2;
const BOX_HALF_WIDTH: f64 = 0.15;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the yearly box plot of every (year, location) group.
    pub fn render_yearly_boxplot(
        dashboard: &Dashboard,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), PresentError> {
        let mut buffer = vec![0u8; Self::buffer_len(width, height)];
        Self::draw_yearly_boxplot(dashboard, &mut buffer, width, height)
            .map_err(|e| PresentError::Chart(e.to_string()))?;
        Self::save_png(buffer, path, width, height)
    }

    /// Render the monthly area chart of one location.
    pub fn render_monthly_area(
        rows: &[AggregateRow],
        location: Location,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), PresentError> {
        let mut buffer = vec![0u8; Self::buffer_len(width, height)];
        Self::draw_monthly_area(rows, location, &mut buffer, width, height)
            .map_err(|e| PresentError::Chart(e.to_string()))?;
        Self::save_png(buffer, path, width, height)
    }

    /// RGB byte count of a `width` x `height` image.
    fn buffer_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    fn save_png(buffer: Vec<u8>, path: &Path, width: u32, height: u32) -> Result<(), PresentError> {
        let img = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| PresentError::Chart("pixel buffer size mismatch".to_string()))?;
        img.save(path)?;
        debug!(path = %path.display(), width, height, "saved chart");
        Ok(())
    }

    fn draw_yearly_boxplot(
        dashboard: &Dashboard,
        buffer: &mut [u8],
        width: u32,
        height: u32,
    ) -> DrawResult {
        let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let years = dashboard.years();
        if years.is_empty() {
            root.present()?;
            return Ok(());
        }
        let y_max = dashboard.max_aqi() * 1.05 + 1.0;

        let mut chart = ChartBuilder::on(&root)
            .caption("Yearly AQI", CAPTION_FONT)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(-0.5f64..(years.len() as f64 - 0.5), 0f64..y_max)?;

        let year_label = |x: &f64| {
            let idx = x.round();
            if (x - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            years
                .get(idx as usize)
                .map(|y| y.to_string())
                .unwrap_or_default()
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(years.len() + 1)
            .x_label_formatter(&year_label)
            .x_desc("Year")
            .y_desc("AQI")
            .draw()?;

        for (idx, location) in Location::ALL.into_iter().enumerate() {
            let (r, g, b) = location_rgb(location);
            let color = RGBColor(r, g, b);
            let shift = if idx == 0 { -BOX_SHIFT } else { BOX_SHIFT };

            let groups: Vec<(f64, &BoxStats)> = years
                .iter()
                .enumerate()
                .filter_map(|(i, &year)| {
                    dashboard
                        .box_stats_for(year, location)
                        .filter(|stats| stats.count > 0)
                        .map(|stats| (i as f64 + shift, stats))
                })
                .collect();

            chart
                .draw_series(groups.iter().map(|&(x, stats)| {
                    Rectangle::new(
                        [(x - BOX_HALF_WIDTH, stats.q1), (x + BOX_HALF_WIDTH, stats.q3)],
                        color.mix(0.3).filled(),
                    )
                }))?
                .label(location.label())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

            chart.draw_series(groups.iter().flat_map(|&(x, stats)| {
                Self::box_paths(x, stats)
                    .into_iter()
                    .map(move |points| PathElement::new(points, color.stroke_width(2)))
            }))?;

            chart.draw_series(groups.iter().flat_map(|&(x, stats)| {
                stats
                    .outliers
                    .iter()
                    .map(move |&v| Circle::new((x, v), 3, color.mix(0.7).filled()))
            }))?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    /// Outline, median and capped whiskers of one box centred at `x`.
    fn box_paths(x: f64, stats: &BoxStats) -> [Vec<(f64, f64)>; 6] {
        let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
        let cap = BOX_HALF_WIDTH / 2.0;
        [
            vec![
                (left, stats.q1),
                (right, stats.q1),
                (right, stats.q3),
                (left, stats.q3),
                (left, stats.q1),
            ],
            vec![(left, stats.median), (right, stats.median)],
            vec![(x, stats.q1), (x, stats.whisker_low)],
            vec![(x - cap, stats.whisker_low), (x + cap, stats.whisker_low)],
            vec![(x, stats.q3), (x, stats.whisker_high)],
            vec![(x - cap, stats.whisker_high), (x + cap, stats.whisker_high)],
        ]
    }

    fn draw_monthly_area(
        rows: &[AggregateRow],
        location: Location,
        buffer: &mut [u8],
        width: u32,
        height: u32,
    ) -> DrawResult {
        let root = BitMapBackend::with_buffer(buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;

        if rows.is_empty() {
            root.present()?;
            return Ok(());
        }

        let months: Vec<String> = rows.iter().map(|r| r.period.to_string()).collect();
        let last = (rows.len() as i32 - 1).max(1);
        let y_max = rows.iter().map(|r| r.max).fold(0.0, f64::max).max(1.0) * 1.05;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("Monthly AQI - {location}"), CAPTION_FONT)
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(50)
            .build_cartesian_2d(0..last, 0f64..y_max)?;

        let month_label = |x: &i32| months.get(*x as usize).cloned().unwrap_or_default();
        chart
            .configure_mesh()
            .x_labels(12)
            .x_label_formatter(&month_label)
            .x_desc("Month")
            .y_desc("AQI")
            .draw()?;

        for series in &MONTHLY_SERIES {
            let (r, g, b) = series.rgb;
            let color = RGBColor(r, g, b);
            let value = series.value;
            let points = rows
                .iter()
                .enumerate()
                .map(|(i, row)| (i as i32, value(row)));

            chart
                .draw_series(AreaSeries::new(points, 0.0, color.mix(0.35)).border_style(color))?
                .label(series.name)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::stats::StatsCalculator;

    #[test]
    fn whiskers_end_at_observed_values() {
        let stats = StatsCalculator::compute_box_stats(&[10.0, 12.0, 11.0, 13.0, 12.0, 100.0]);
        let paths = StaticChartRenderer::box_paths(1.0, &stats);

        let ys: Vec<f64> = paths.iter().flatten().map(|&(_, y)| y).collect();
        let lowest = ys.iter().copied().fold(f64::INFINITY, f64::min);
        let highest = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(lowest, 10.0);
        assert_eq!(highest, 13.0);
        // The outlier is drawn as a point, outside the whiskers.
        assert_eq!(stats.outliers, vec![100.0]);
    }

    #[test]
    fn buffer_len_does_not_overflow_u32() {
        assert_eq!(StaticChartRenderer::buffer_len(1000, 500), 1_500_000);
        assert_eq!(
            StaticChartRenderer::buffer_len(40_000, 40_000),
            4_800_000_000usize
        );
    }
}
