//! Aggregate table export (CSV and JSON).

use super::{Dashboard, PresentError};
use crate::data::{AggregateRow, AggregateTable};
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

/// JSON document written next to the HTML report.
#[derive(Debug, Serialize)]
pub struct AggregatesDocument {
    pub monthly: Vec<AggregateRow>,
    pub yearly: Vec<AggregateRow>,
}

impl AggregatesDocument {
    pub fn from_dashboard(dashboard: &Dashboard) -> Result<Self, PresentError> {
        let output = dashboard.output();
        Ok(Self {
            monthly: output.monthly.rows()?,
            yearly: output.yearly.rows()?,
        })
    }
}

/// Writes aggregate tables for consumption outside the dashboard.
pub struct TableExporter;

impl TableExporter {
    /// Write one aggregate table as CSV.
    pub fn write_csv(table: &AggregateTable, path: &Path) -> Result<(), PresentError> {
        let mut df = table.frame().clone();
        let file = File::create(path)?;
        CsvWriter::new(BufWriter::new(file))
            .include_header(true)
            .finish(&mut df)?;
        debug!(path = %path.display(), rows = df.height(), "wrote aggregate csv");
        Ok(())
    }

    pub fn write_json(dashboard: &Dashboard, path: &Path) -> Result<(), PresentError> {
        let doc = AggregatesDocument::from_dashboard(dashboard)?;
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), &doc)?;
        debug!(path = %path.display(), "wrote aggregate json");
        Ok(())
    }

    /// Write `monthly.csv`, `yearly.csv` and `aggregates.json` into `dir`.
    pub fn write_all(dashboard: &Dashboard, dir: &Path) -> Result<(), PresentError> {
        let output = dashboard.output();
        Self::write_csv(&output.monthly, &dir.join("monthly.csv"))?;
        Self::write_csv(&output.yearly, &dir.join("yearly.csv"))?;
        Self::write_json(dashboard, &dir.join("aggregates.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sample_dashboard;

    #[test]
    fn json_document_uses_flattened_column_names() {
        let doc = AggregatesDocument::from_dashboard(&sample_dashboard()).unwrap();
        let value = serde_json::to_value(&doc).unwrap();

        let first = &value["yearly"][0];
        assert_eq!(first["period"], 2016);
        assert_eq!(first["location"], "Central Jakarta");
        assert_eq!(first["AQI min"], 30.0);
        assert_eq!(first["AQI max"], 80.0);
        assert_eq!(value["monthly"][0]["period"], "2016-01");
    }
}
