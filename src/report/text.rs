//! Plain text summary for terminals and logs.

use super::reference::{classify, TITLE};
use super::{Dashboard, PresentError, Presenter};
use crate::data::Location;
use std::io::Write;

/// Writes the yearly tables and monthly coverage to any writer.
pub struct TextPresenter<W: Write> {
    out: W,
}

impl<W: Write> TextPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn present(&mut self, dashboard: &Dashboard) -> Result<(), PresentError> {
        writeln!(self.out, "{TITLE}")?;
        writeln!(self.out, "{}", "=".repeat(TITLE.len()))?;

        for location in Location::ALL {
            let yearly = dashboard.yearly_rows(location)?;
            let months = dashboard.monthly_rows(location)?.len();

            writeln!(self.out)?;
            writeln!(self.out, "{location} ({months} months)")?;
            writeln!(
                self.out,
                "{:<6} {:>9} {:>9} {:>9}  {}",
                "Year", "AQI min", "AQI mean", "AQI max", "Mean concern"
            )?;
            for row in yearly {
                writeln!(
                    self.out,
                    "{:<6} {:>9.2} {:>9.2} {:>9.2}  {}",
                    row.period.to_string(),
                    row.min,
                    row.mean,
                    row.max,
                    classify(row.mean).concern
                )?;
            }
        }

        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sample_dashboard;

    #[test]
    fn summary_lists_each_location_year() {
        let mut presenter = TextPresenter::new(Vec::new());
        presenter.present(&sample_dashboard()).unwrap();
        let text = String::from_utf8(presenter.into_inner()).unwrap();

        assert!(text.starts_with(TITLE));
        assert!(text.contains("Central Jakarta (3 months)"));
        assert!(text.contains("South Jakarta (2 months)"));
        // Central 2016: index values 55, 30, 80.
        assert!(text.contains("2016       30.00     55.00     80.00  Moderate"), "{text}");
    }
}
