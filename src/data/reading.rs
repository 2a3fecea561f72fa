//! Sensor reading records.

use super::Location;
use chrono::{Datelike, NaiveDate};

/// Earliest year with complete coverage at both stations.
pub const FIRST_COMPLETE_YEAR: i32 = 2016;

/// One raw row from a station export. Blank cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub date: NaiveDate,
    pub pm25: Option<f64>,
    pub pm10: Option<f64>,
    pub location: Location,
}

impl Reading {
    pub fn new(date: NaiveDate, pm25: f64, pm10: f64, location: Location) -> Self {
        Self::with_gaps(date, Some(pm25), Some(pm10), location)
    }

    pub fn with_gaps(
        date: NaiveDate,
        pm25: Option<f64>,
        pm10: Option<f64>,
        location: Location,
    ) -> Self {
        Self {
            date,
            pm25,
            pm10,
            location,
        }
    }

    /// Collapse the pollutant pair into the composite index: the worse of the
    /// two, or the only one present. `None` when both are blank.
    pub fn unify(&self) -> Option<UnifiedReading> {
        let aqi = match (self.pm25, self.pm10) {
            (Some(a), Some(b)) => a.max(b),
            (Some(v), None) | (None, Some(v)) => v,
            (None, None) => return None,
        };
        Some(UnifiedReading {
            date: self.date,
            location: self.location,
            aqi,
        })
    }
}

/// A reading after the composite index has been derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnifiedReading {
    pub date: NaiveDate,
    pub location: Location,
    pub aqi: f64,
}

impl UnifiedReading {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Year-month label, e.g. `2016-01`.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    pub fn is_complete_year(&self) -> bool {
        self.year() >= FIRST_COMPLETE_YEAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn unify_takes_the_worse_pollutant() {
        let r = Reading::new(date(2016, 1, 15), 40.0, 55.0, Location::CentralJakarta);
        assert_eq!(r.unify().unwrap().aqi, 55.0);

        let r = Reading::new(date(2016, 1, 20), 30.0, 25.0, Location::CentralJakarta);
        assert_eq!(r.unify().unwrap().aqi, 30.0);
    }

    #[test]
    fn unify_uses_the_pollutant_present() {
        let d = date(2016, 1, 15);
        let loc = Location::CentralJakarta;
        assert_eq!(Reading::with_gaps(d, Some(40.0), None, loc).unify().unwrap().aqi, 40.0);
        assert_eq!(Reading::with_gaps(d, None, Some(65.0), loc).unify().unwrap().aqi, 65.0);
        assert!(Reading::with_gaps(d, None, None, loc).unify().is_none());
    }

    #[test]
    fn period_keys() {
        let u = Reading::new(date(2019, 3, 7), 1.0, 2.0, Location::SouthJakarta)
            .unify()
            .unwrap();
        assert_eq!(u.year(), 2019);
        assert_eq!(u.month(), "2019-03");
        assert!(u.is_complete_year());

        let old = Reading::new(date(2015, 12, 31), 1.0, 2.0, Location::SouthJakarta)
            .unify()
            .unwrap();
        assert!(!old.is_complete_year());
    }
}
