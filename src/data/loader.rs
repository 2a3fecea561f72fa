//! CSV Data Loader Module
//! Reads station exports with Polars and parses them into typed readings.

use super::{Location, Reading};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Date layouts found in station exports (`2022/10/1`, `2022-10-01`).
const DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("{location} data not found: {}", path.display())]
    InputNotFound { location: Location, path: PathBuf },
    #[error("{}:{line}: {reason}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Loads one station export per call.
pub struct DataLoader;

impl DataLoader {
    /// Load a station CSV and tag every row with `location`.
    ///
    /// Columns are taken by position as (date, PM2.5, PM10); the header row is
    /// skipped but its names are not trusted.
    pub fn load_csv(path: &Path, location: Location) -> Result<Vec<Reading>, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::InputNotFound {
                location,
                path: path.to_path_buf(),
            });
        }

        // Schema inference disabled: every column comes back as a string so
        // parse failures are reported per row instead of nulled out.
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        debug!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "read station export"
        );

        let readings = Self::parse_frame(&df, path, location)?;
        info!(%location, rows = readings.len(), "loaded readings");
        Ok(readings)
    }

    /// Convert an all-string frame into readings.
    pub fn parse_frame(
        df: &DataFrame,
        path: &Path,
        location: Location,
    ) -> Result<Vec<Reading>, LoaderError> {
        let malformed = |line: usize, reason: String| LoaderError::MalformedRow {
            path: path.to_path_buf(),
            line,
            reason,
        };

        let columns = df.get_columns();
        if columns.len() < 3 {
            return Err(malformed(
                1,
                format!(
                    "expected 3 columns (date, PM25, PM10), found {}",
                    columns.len()
                ),
            ));
        }

        let dates = columns[0].as_materialized_series().str()?;
        let pm25 = columns[1].as_materialized_series().str()?;
        let pm10 = columns[2].as_materialized_series().str()?;

        let mut readings = Vec::with_capacity(df.height());
        let mut blank_lines = 0usize;
        for i in 0..df.height() {
            // Header occupies line 1.
            let line = i + 2;

            if [dates.get(i), pm25.get(i), pm10.get(i)]
                .into_iter()
                .all(is_blank)
            {
                blank_lines += 1;
                continue;
            }

            let date = dates
                .get(i)
                .ok_or_else(|| malformed(line, "missing date".to_string()))
                .and_then(|raw| parse_date(raw).map_err(|reason| malformed(line, reason)))?;
            let pm25 = parse_concentration(pm25.get(i), "PM25")
                .map_err(|reason| malformed(line, reason))?;
            let pm10 = parse_concentration(pm10.get(i), "PM10")
                .map_err(|reason| malformed(line, reason))?;

            readings.push(Reading::with_gaps(date, pm25, pm10, location));
        }

        if blank_lines > 0 {
            debug!(path = %path.display(), blank_lines, "skipped blank lines");
        }
        Ok(readings)
    }
}

/// Parse a calendar date in any of the accepted layouts.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| format!("invalid date {raw:?}"))
}

fn is_blank(cell: Option<&str>) -> bool {
    cell.map_or(true, |c| c.trim().is_empty())
}

/// Blank cells are gaps in the station record, not errors.
fn parse_concentration(raw: Option<&str>, column: &str) -> Result<Option<f64>, String> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(None);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(format!("non-numeric {column} value {raw:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_frame(dates: &[&str], pm25: &[&str], pm10: &[&str]) -> DataFrame {
        DataFrame::new(vec![
            Column::new("date".into(), dates.to_vec()),
            Column::new(" pm25".into(), pm25.to_vec()),
            Column::new(" pm10".into(), pm10.to_vec()),
        ])
        .unwrap()
    }

    #[test]
    fn parses_both_date_layouts() {
        assert_eq!(
            parse_date("2022/10/1").unwrap(),
            NaiveDate::from_ymd_opt(2022, 10, 1).unwrap()
        );
        assert_eq!(
            parse_date(" 2016-01-15 ").unwrap(),
            NaiveDate::from_ymd_opt(2016, 1, 15).unwrap()
        );
        assert!(parse_date("15/01/2016").is_err());
        assert!(parse_date("2016-13-01").is_err());
    }

    #[test]
    fn parse_frame_tags_location_and_trims_values() {
        let df = string_frame(&["2016/1/15", "2016/1/20"], &[" 40", " 30"], &[" 55", "25 "]);
        let readings =
            DataLoader::parse_frame(&df, Path::new("c.csv"), Location::CentralJakarta).unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].pm25, Some(40.0));
        assert_eq!(readings[0].pm10, Some(55.0));
        assert_eq!(readings[1].pm10, Some(25.0));
        assert!(readings
            .iter()
            .all(|r| r.location == Location::CentralJakarta));
    }

    #[test]
    fn bad_concentration_reports_file_line() {
        let df = string_frame(&["2016/1/15", "2016/1/16"], &["40", "n/a"], &["55", "20"]);
        let err = DataLoader::parse_frame(&df, Path::new("s.csv"), Location::SouthJakarta)
            .unwrap_err();

        match err {
            LoaderError::MalformedRow { line, reason, .. } => {
                assert_eq!(line, 3);
                assert!(reason.contains("PM25"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_concentration_is_a_gap() {
        let df = string_frame(&["2016/1/15", "2016/1/16"], &["40", " "], &[" ", "20"]);
        let readings =
            DataLoader::parse_frame(&df, Path::new("c.csv"), Location::CentralJakarta).unwrap();

        assert_eq!(readings[0].pm25, Some(40.0));
        assert_eq!(readings[0].pm10, None);
        assert_eq!(readings[1].pm25, None);
        assert_eq!(readings[1].pm10, Some(20.0));
    }

    #[test]
    fn null_cells_are_gaps_and_blank_rows_are_skipped() {
        let df = DataFrame::new(vec![
            Column::new("date".into(), vec![Some("2016/1/15"), None, Some("2016/1/17")]),
            Column::new("pm25".into(), vec![None, None, Some("12")]),
            Column::new("pm10".into(), vec![Some("30"), Some(" "), None]),
        ])
        .unwrap();
        let readings =
            DataLoader::parse_frame(&df, Path::new("c.csv"), Location::SouthJakarta).unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].pm10, Some(30.0));
        assert_eq!(readings[1].pm25, Some(12.0));
    }

    #[test]
    fn missing_date_with_values_is_malformed() {
        let df = string_frame(&[" "], &["40"], &["55"]);
        let err = DataLoader::parse_frame(&df, Path::new("c.csv"), Location::CentralJakarta)
            .unwrap_err();
        assert!(matches!(err, LoaderError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn too_few_columns_is_malformed() {
        let df = DataFrame::new(vec![
            Column::new("date".into(), vec!["2016/1/15"]),
            Column::new("pm25".into(), vec!["40"]),
        ])
        .unwrap();
        let err = DataLoader::parse_frame(&df, Path::new("c.csv"), Location::CentralJakarta)
            .unwrap_err();
        assert!(matches!(err, LoaderError::MalformedRow { line: 1, .. }));
    }

    #[test]
    fn missing_file_is_input_not_found() {
        let err = DataLoader::load_csv(
            Path::new("/nonexistent/aqi/central.csv"),
            Location::CentralJakarta,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LoaderError::InputNotFound {
                location: Location::CentralJakarta,
                ..
            }
        ));
    }
}
