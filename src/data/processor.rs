//! Aggregation Pipeline
//! Merges both station exports, derives the composite index and aggregates it
//! by month and by year.

use super::tables::*;
use super::{DataLoader, Granularity, Location, LoaderError, Reading, UnifiedReading};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Everything a presenter needs from one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Post-filter unified readings, in merge order.
    pub readings: Vec<UnifiedReading>,
    /// Columns: ["Date", "Location", "AQI", "Year", "Month"].
    pub unified: DataFrame,
    pub monthly: AggregateTable,
    pub yearly: AggregateTable,
}

impl PipelineOutput {
    /// Composite index values of one (year, location) group.
    pub fn values_for(&self, year: i32, location: Location) -> Vec<f64> {
        self.readings
            .iter()
            .filter(|r| r.location == location && r.year() == year)
            .map(|r| r.aqi)
            .collect()
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.readings.iter().map(|r| r.year()).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

/// Stateless pipeline: every run is a pure function of its input.
pub struct AggregationPipeline;

impl AggregationPipeline {
    /// Load both station exports and aggregate them.
    pub fn run(central: &Path, south: &Path) -> Result<PipelineOutput, PipelineError> {
        let mut readings = DataLoader::load_csv(central, Location::CentralJakarta)?;
        readings.extend(DataLoader::load_csv(south, Location::SouthJakarta)?);
        Self::run_readings(readings)
    }

    /// Run every step after loading on already-tagged readings.
    pub fn run_readings(readings: Vec<Reading>) -> Result<PipelineOutput, PipelineError> {
        let total = readings.len();
        let unified: Vec<UnifiedReading> = readings
            .iter()
            .filter_map(Reading::unify)
            .filter(UnifiedReading::is_complete_year)
            .collect();

        info!(
            kept = unified.len(),
            dropped = total - unified.len(),
            "dropped blank readings and readings before {}",
            super::FIRST_COMPLETE_YEAR
        );

        let frame = Self::unified_frame(&unified)?;
        let monthly = Self::aggregate(&frame, Granularity::Monthly)?;
        let yearly = Self::aggregate(&frame, Granularity::Yearly)?;

        info!(
            monthly_groups = monthly.height(),
            yearly_groups = yearly.height(),
            "aggregated composite index"
        );

        Ok(PipelineOutput {
            readings: unified,
            unified: frame,
            monthly,
            yearly,
        })
    }

    /// Build the unified readings table with derived period keys.
    pub fn unified_frame(readings: &[UnifiedReading]) -> Result<DataFrame, PipelineError> {
        let mut dates: Vec<String> = Vec::with_capacity(readings.len());
        let mut locations: Vec<&str> = Vec::with_capacity(readings.len());
        let mut aqi: Vec<f64> = Vec::with_capacity(readings.len());
        let mut years: Vec<i32> = Vec::with_capacity(readings.len());
        let mut months: Vec<String> = Vec::with_capacity(readings.len());

        for r in readings {
            dates.push(r.date.format("%Y-%m-%d").to_string());
            locations.push(r.location.label());
            aqi.push(r.aqi);
            years.push(r.year());
            months.push(r.month());
        }

        let df = DataFrame::new(vec![
            Column::new(COL_DATE.into(), dates),
            Column::new(COL_LOCATION.into(), locations),
            Column::new(COL_AQI.into(), aqi),
            Column::new(COL_YEAR.into(), years),
            Column::new(COL_MONTH.into(), months),
        ])?;

        Ok(df)
    }

    /// Group by (period, location) and compute min/mean/max of the index.
    pub fn aggregate(
        unified: &DataFrame,
        granularity: Granularity,
    ) -> Result<AggregateTable, PipelineError> {
        let key = granularity.key_column();
        let df = unified
            .clone()
            .lazy()
            .group_by([col(key), col(COL_LOCATION)])
            .agg([
                col(COL_AQI).min().alias(COL_AQI_MIN),
                col(COL_AQI).mean().alias(COL_AQI_MEAN),
                col(COL_AQI).max().alias(COL_AQI_MAX),
            ])
            // Summation error can push the mean of equal values past its bounds.
            .with_column(
                when(col(COL_AQI_MEAN).gt(col(COL_AQI_MAX)))
                    .then(col(COL_AQI_MAX))
                    .when(col(COL_AQI_MEAN).lt(col(COL_AQI_MIN)))
                    .then(col(COL_AQI_MIN))
                    .otherwise(col(COL_AQI_MEAN))
                    .alias(COL_AQI_MEAN),
            )
            .sort([key, COL_LOCATION], SortMultipleOptions::default())
            .collect()?;

        Ok(AggregateTable::new(granularity, df))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn reading(y: i32, m: u32, d: u32, pm25: f64, pm10: f64, loc: Location) -> Reading {
        Reading::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), pm25, pm10, loc)
    }

    #[test]
    fn yearly_example_matches_hand_computation() {
        let out = AggregationPipeline::run_readings(vec![
            reading(2016, 1, 15, 40.0, 55.0, Location::CentralJakarta),
            reading(2016, 1, 20, 30.0, 25.0, Location::CentralJakarta),
        ])
        .unwrap();

        let rows = out.yearly.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].period, Period::Year(2016));
        assert_eq!(rows[0].location, Location::CentralJakarta);
        // Index values are max(40, 55) = 55 and max(30, 25) = 30.
        assert_eq!(rows[0].min, 30.0);
        assert_eq!(rows[0].mean, 42.5);
        assert_eq!(rows[0].max, 55.0);
    }

    #[test]
    fn mean_of_equal_fractional_values_stays_within_bounds() {
        for (value, count) in [(0.1, 3), (0.7, 3), (33.3, 6), (12.9, 10)] {
            let readings = (1..=count)
                .map(|day| reading(2018, 4, day, value, 0.0, Location::SouthJakarta))
                .collect();
            let out = AggregationPipeline::run_readings(readings).unwrap();

            for row in out.monthly.rows().unwrap().iter().chain(&out.yearly.rows().unwrap()) {
                assert!(row.min <= row.mean && row.mean <= row.max, "{row:?}");
                assert_eq!(row.mean, value);
            }
        }
    }

    #[test]
    fn readings_without_any_pollutant_are_skipped() {
        let date = NaiveDate::from_ymd_opt(2016, 3, 1).unwrap();
        let out = AggregationPipeline::run_readings(vec![
            Reading::with_gaps(date, Some(40.0), None, Location::CentralJakarta),
            Reading::with_gaps(date, None, None, Location::CentralJakarta),
        ])
        .unwrap();

        assert_eq!(out.readings.len(), 1);
        let rows = out.yearly.rows().unwrap();
        assert_eq!(rows[0].mean, 40.0);
    }

    #[test]
    fn readings_before_2016_are_dropped() {
        let out = AggregationPipeline::run_readings(vec![
            reading(2015, 12, 31, 500.0, 500.0, Location::SouthJakarta),
            reading(2016, 1, 1, 10.0, 20.0, Location::SouthJakarta),
        ])
        .unwrap();

        assert_eq!(out.readings.len(), 1);
        assert_eq!(out.unified.height(), 1);
        for row in out.monthly.rows().unwrap() {
            assert_eq!(row.period, Period::Month("2016-01".to_string()));
            assert_eq!(row.max, 20.0);
        }
        assert_eq!(out.yearly.rows().unwrap().len(), 1);
    }

    #[test]
    fn groups_are_sorted_by_period_then_location() {
        let out = AggregationPipeline::run_readings(vec![
            reading(2017, 2, 1, 1.0, 2.0, Location::SouthJakarta),
            reading(2016, 5, 1, 3.0, 4.0, Location::SouthJakarta),
            reading(2017, 2, 3, 5.0, 6.0, Location::CentralJakarta),
            reading(2016, 5, 9, 7.0, 8.0, Location::CentralJakarta),
        ])
        .unwrap();

        let keys: Vec<(String, Location)> = out
            .monthly
            .rows()
            .unwrap()
            .into_iter()
            .map(|r| (r.period.to_string(), r.location))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2016-05".to_string(), Location::CentralJakarta),
                ("2016-05".to_string(), Location::SouthJakarta),
                ("2017-02".to_string(), Location::CentralJakarta),
                ("2017-02".to_string(), Location::SouthJakarta),
            ]
        );
    }

    #[test]
    fn for_location_filters_rows() {
        let out = AggregationPipeline::run_readings(vec![
            reading(2018, 1, 1, 10.0, 12.0, Location::CentralJakarta),
            reading(2018, 1, 1, 30.0, 32.0, Location::SouthJakarta),
            reading(2019, 1, 1, 50.0, 52.0, Location::SouthJakarta),
        ])
        .unwrap();

        let south = out.yearly.for_location(Location::SouthJakarta).unwrap();
        assert_eq!(south.height(), 2);
        let central = out.yearly.rows_for(Location::CentralJakarta).unwrap();
        assert_eq!(central.len(), 1);
        assert_eq!(central[0].mean, 12.0);
    }

    #[test]
    fn empty_input_gives_empty_tables() {
        let out = AggregationPipeline::run_readings(Vec::new()).unwrap();
        assert_eq!(out.monthly.height(), 0);
        assert_eq!(out.yearly.height(), 0);
        assert!(out.years().is_empty());
    }
}
