//! Report module - dashboard model and presentation strategies

mod export;
mod html;
pub mod reference;
mod text;

pub use export::{AggregatesDocument, TableExporter};
pub use html::{ChartFiles, HtmlPresenter};
pub use text::TextPresenter;

use crate::data::{AggregateRow, Location, PipelineOutput};
use crate::stats::{BoxStats, StatsCalculator, YearlyBoxStats};
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PresentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Chart rendering failed: {0}")]
    Chart(String),
    #[error("Image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("GUI error: {0}")]
    Gui(String),
}

/// A presentation layer consuming one pipeline run.
pub trait Presenter {
    fn present(&mut self, dashboard: &Dashboard) -> Result<(), PresentError>;
}

/// Pipeline output plus the statistics every presenter draws from.
#[derive(Debug, Clone)]
pub struct Dashboard {
    output: PipelineOutput,
    box_stats: YearlyBoxStats,
}

impl Dashboard {
    pub fn new(output: PipelineOutput) -> Self {
        let box_stats = StatsCalculator::compute_yearly_box_stats(&output);
        Self { output, box_stats }
    }

    pub fn output(&self) -> &PipelineOutput {
        &self.output
    }

    pub fn years(&self) -> Vec<i32> {
        self.output.years()
    }

    pub fn yearly_rows(&self, location: Location) -> Result<Vec<AggregateRow>, PresentError> {
        Ok(self.output.yearly.rows_for(location)?)
    }

    pub fn monthly_rows(&self, location: Location) -> Result<Vec<AggregateRow>, PresentError> {
        Ok(self.output.monthly.rows_for(location)?)
    }

    pub fn box_stats(&self) -> &YearlyBoxStats {
        &self.box_stats
    }

    pub fn box_stats_for(&self, year: i32, location: Location) -> Option<&BoxStats> {
        self.box_stats.get(&(year, location))
    }

    /// Upper bound for value axes shared by all charts.
    pub fn max_aqi(&self) -> f64 {
        self.output
            .readings
            .iter()
            .map(|r| r.aqi)
            .fold(0.0, f64::max)
    }
}

/// Shared fixture for presenter tests.
#[cfg(test)]
pub(crate) fn sample_dashboard() -> Dashboard {
    use crate::data::{AggregationPipeline, Reading};
    use chrono::NaiveDate;

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let readings = vec![
        Reading::new(date(2016, 1, 15), 40.0, 55.0, Location::CentralJakarta),
        Reading::new(date(2016, 1, 20), 30.0, 25.0, Location::CentralJakarta),
        Reading::new(date(2016, 2, 1), 80.0, 60.0, Location::CentralJakarta),
        Reading::new(date(2017, 3, 3), 20.0, 35.0, Location::CentralJakarta),
        Reading::new(date(2016, 1, 15), 70.0, 90.0, Location::SouthJakarta),
        Reading::new(date(2017, 3, 4), 110.0, 45.0, Location::SouthJakarta),
    ];
    Dashboard::new(AggregationPipeline::run_readings(readings).unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_stats_cover_every_populated_group() {
        let dashboard = sample_dashboard();
        assert_eq!(dashboard.years(), vec![2016, 2017]);
        assert_eq!(dashboard.box_stats().len(), 4);

        let central_2016 = dashboard
            .box_stats_for(2016, Location::CentralJakarta)
            .unwrap();
        assert_eq!(central_2016.count, 3);
        assert_eq!(central_2016.median, 55.0);
        assert_eq!(dashboard.max_aqi(), 110.0);
    }

    #[test]
    fn rows_are_split_by_location() {
        let dashboard = sample_dashboard();
        let central = dashboard.monthly_rows(Location::CentralJakarta).unwrap();
        let south = dashboard.monthly_rows(Location::SouthJakarta).unwrap();
        assert_eq!(central.len(), 3);
        assert_eq!(south.len(), 2);
        assert!(central
            .iter()
            .all(|r| r.location == Location::CentralJakarta));
    }
}
