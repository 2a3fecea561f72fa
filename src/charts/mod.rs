//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;

use crate::data::{AggregateRow, Location};

/// RGB used for a location in every chart.
pub fn location_rgb(location: Location) -> (u8, u8, u8) {
    match location {
        Location::CentralJakarta => (52, 152, 219),
        Location::SouthJakarta => (231, 76, 60),
    }
}

/// One statistic of the monthly area charts.
pub struct MonthlySeries {
    pub name: &'static str,
    pub rgb: (u8, u8, u8),
    pub value: fn(&AggregateRow) -> f64,
}

fn aqi_max(row: &AggregateRow) -> f64 {
    row.max
}

fn aqi_mean(row: &AggregateRow) -> f64 {
    row.mean
}

fn aqi_min(row: &AggregateRow) -> f64 {
    row.min
}

/// Drawn back to front so the smaller areas stay visible.
pub const MONTHLY_SERIES: [MonthlySeries; 3] = [
    MonthlySeries {
        name: "AQI max",
        rgb: (231, 76, 60),
        value: aqi_max,
    },
    MonthlySeries {
        name: "AQI mean",
        rgb: (243, 156, 18),
        value: aqi_mean,
    },
    MonthlySeries {
        name: "AQI min",
        rgb: (46, 204, 113),
        value: aqi_min,
    },
];
