//! Data module - CSV loading and aggregation

mod loader;
mod location;
mod processor;
mod reading;
mod tables;

pub use loader::{parse_date, DataLoader, LoaderError};
pub use location::Location;
pub use processor::{AggregationPipeline, PipelineError, PipelineOutput};
pub use reading::{Reading, UnifiedReading, FIRST_COMPLETE_YEAR};
pub use tables::{
    AggregateRow, AggregateTable, Granularity, Period, COL_AQI, COL_AQI_MAX, COL_AQI_MEAN,
    COL_AQI_MIN, COL_DATE, COL_LOCATION, COL_MONTH, COL_YEAR,
};
