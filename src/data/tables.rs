//! Aggregate tables produced by the pipeline.

use super::Location;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

pub const COL_DATE: &str = "Date";
pub const COL_LOCATION: &str = "Location";
pub const COL_AQI: &str = "AQI";
pub const COL_YEAR: &str = "Year";
pub const COL_MONTH: &str = "Month";
pub const COL_AQI_MIN: &str = "AQI min";
pub const COL_AQI_MEAN: &str = "AQI mean";
pub const COL_AQI_MAX: &str = "AQI max";

/// Temporal grouping of an aggregate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Granularity {
    Monthly,
    Yearly,
}

impl Granularity {
    /// Name of the period key column.
    pub fn key_column(self) -> &'static str {
        match self {
            Granularity::Monthly => COL_MONTH,
            Granularity::Yearly => COL_YEAR,
        }
    }
}

/// Period key of one aggregate row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Period {
    Year(i32),
    Month(String),
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Year(y) => write!(f, "{y}"),
            Period::Month(m) => f.write_str(m),
        }
    }
}

/// Min/mean/max of the composite index for one (period, location) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub period: Period,
    pub location: Location,
    #[serde(rename = "AQI min")]
    pub min: f64,
    #[serde(rename = "AQI mean")]
    pub mean: f64,
    #[serde(rename = "AQI max")]
    pub max: f64,
}

/// A materialized monthly or yearly aggregate.
///
/// Columns: [period key, "Location", "AQI min", "AQI mean", "AQI max"],
/// sorted by period then location.
#[derive(Debug, Clone)]
pub struct AggregateTable {
    granularity: Granularity,
    frame: DataFrame,
}

impl AggregateTable {
    pub fn new(granularity: Granularity, frame: DataFrame) -> Self {
        Self { granularity, frame }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Rows of a single location as a new frame.
    pub fn for_location(&self, location: Location) -> PolarsResult<DataFrame> {
        self.frame
            .clone()
            .lazy()
            .filter(col(COL_LOCATION).eq(lit(location.label())))
            .collect()
    }

    /// Typed view of every row.
    pub fn rows(&self) -> PolarsResult<Vec<AggregateRow>> {
        Self::rows_of(&self.frame, self.granularity)
    }

    /// Typed view of a single location's rows, in period order.
    pub fn rows_for(&self, location: Location) -> PolarsResult<Vec<AggregateRow>> {
        Self::rows_of(&self.for_location(location)?, self.granularity)
    }

    fn rows_of(df: &DataFrame, granularity: Granularity) -> PolarsResult<Vec<AggregateRow>> {
        let key = df.column(granularity.key_column())?;
        let locations = df.column(COL_LOCATION)?.str()?;
        let mins = df.column(COL_AQI_MIN)?.f64()?;
        let means = df.column(COL_AQI_MEAN)?.f64()?;
        let maxs = df.column(COL_AQI_MAX)?.f64()?;

        let periods: Vec<Option<Period>> = match granularity {
            Granularity::Yearly => key
                .i32()?
                .into_iter()
                .map(|v| v.map(Period::Year))
                .collect(),
            Granularity::Monthly => key
                .str()?
                .into_iter()
                .map(|v| v.map(|m| Period::Month(m.to_string())))
                .collect(),
        };

        let mut rows = Vec::with_capacity(df.height());
        for (i, period) in periods.into_iter().enumerate() {
            let (Some(period), Some(loc), Some(min), Some(mean), Some(max)) = (
                period,
                locations.get(i),
                mins.get(i),
                means.get(i),
                maxs.get(i),
            ) else {
                continue;
            };
            let location = loc
                .parse::<Location>()
                .map_err(|e| PolarsError::ComputeError(e.into()))?;
            rows.push(AggregateRow {
                period,
                location,
                min,
                mean,
                max,
            });
        }
        Ok(rows)
    }
}
