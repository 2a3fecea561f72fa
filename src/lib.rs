//! AQI Dashboard - air quality aggregation for Central and South Jakarta
//!
//! Loads the daily PM2.5/PM10 exports of two monitoring stations, derives a
//! composite AQI per reading and aggregates it by month and by year. The
//! result can be shown as a terminal summary, a static HTML report or an
//! interactive window.
//!
//! # Usage
//!
//! ```bash
//! # Interactive dashboard
//! aqi-dashboard gui
//!
//! # Static report into ./report and open it
//! aqi-dashboard export --out report --open
//!
//! # Yearly table on stdout
//! aqi-dashboard --central central.csv --south south.csv summary
//! ```

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod report;
pub mod stats;
