//! Stats module - Box-plot statistics

mod calculator;

pub use calculator::{BoxStats, StatsCalculator, YearlyBoxStats, WHISKER_IQR};
