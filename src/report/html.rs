//! HTML Report Generator Module
//! Writes a self-contained static report: one HTML page, PNG charts and the
//! aggregate tables as CSV/JSON.
//!
//! The page is generated directly from string templates; chart images are
//! referenced by relative path so the output directory can be moved as a whole.

use super::reference::{
    AQI_BANDS, BOX_PLOT_LEAD, DATA_SOURCE, INTRODUCTION, MONTHLY_LEAD, TITLE, YEARLY_NARRATIVE,
};
use super::{Dashboard, PresentError, Presenter, TableExporter};
use crate::charts::{location_rgb, StaticChartRenderer};
use crate::config::DashboardConfig;
use crate::data::{AggregateRow, Location};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const INDEX_FILE: &str = "index.html";
pub const BOXPLOT_FILE: &str = "yearly_boxplot.png";

const STYLE: &str = r#"
body { font-family: "Source Sans Pro", sans-serif; max-width: 1100px; margin: 2em auto; padding: 0 1em; color: #262730; }
h1 { font-size: 2.2em; }
table { border-collapse: collapse; margin: 1em 0; font-size: 0.9em; }
th, td { border: 1px solid #ddd; padding: 4px 8px; text-align: right; }
th { background: #f0f2f6; }
td.text { text-align: left; }
.columns { display: flex; gap: 2em; }
.columns > div { flex: 1; }
.scroll { overflow-x: auto; }
iframe { width: 100%; height: 300px; border: 0; }
img { max-width: 100%; }
"#;

/// Chart images available to the page, by file name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartFiles {
    pub boxplot: Option<String>,
    pub monthly: BTreeMap<Location, String>,
}

/// Static HTML report writer.
pub struct HtmlPresenter {
    output_dir: PathBuf,
    chart_width: u32,
    chart_height: u32,
    charts_enabled: bool,
    open_report: bool,
}

impl HtmlPresenter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let defaults = DashboardConfig::default();
        Self {
            output_dir: output_dir.into(),
            chart_width: defaults.chart_width,
            chart_height: defaults.chart_height,
            charts_enabled: true,
            open_report: false,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            chart_width: config.chart_width,
            chart_height: config.chart_height,
            charts_enabled: true,
            open_report: config.open_report,
        }
    }

    /// Skip PNG rendering; the page is written without images.
    pub fn without_charts(mut self) -> Self {
        self.charts_enabled = false;
        self
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(INDEX_FILE)
    }

    /// Render charts into the output directory. A chart that fails to render
    /// is left out of the page.
    fn render_charts(&self, dashboard: &Dashboard) -> Result<ChartFiles, PresentError> {
        let mut files = ChartFiles::default();
        if !self.charts_enabled {
            return Ok(files);
        }

        let path = self.output_dir.join(BOXPLOT_FILE);
        match StaticChartRenderer::render_yearly_boxplot(
            dashboard,
            &path,
            self.chart_width,
            self.chart_height,
        ) {
            Ok(()) => files.boxplot = Some(BOXPLOT_FILE.to_string()),
            Err(e) => warn!(error = %e, "yearly box plot skipped"),
        }

        for location in Location::ALL {
            let rows = dashboard.monthly_rows(location)?;
            let name = format!("monthly_{}.png", location.slug());
            let path = self.output_dir.join(&name);
            match StaticChartRenderer::render_monthly_area(
                &rows,
                location,
                &path,
                self.chart_width,
                self.chart_height,
            ) {
                Ok(()) => {
                    files.monthly.insert(location, name);
                }
                Err(e) => warn!(error = %e, %location, "monthly chart skipped"),
            }
        }

        Ok(files)
    }

    /// Build the full page.
    pub fn render_html(dashboard: &Dashboard, charts: &ChartFiles) -> Result<String, PresentError> {
        let mut html = String::new();
        html.push_str(&format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
            escape_html(TITLE),
            STYLE
        ));
        html.push_str(&format!("<h1>{}</h1>\n", escape_html(TITLE)));

        // Introduction
        html.push_str("<h2>Introduction</h2>\n");
        for paragraph in INTRODUCTION {
            html.push_str(&format!("<p>{}</p>\n", escape_html(paragraph)));
        }
        html.push_str(&Self::reference_table());
        html.push_str(&format!("<p>{}</p>\n", escape_html(DATA_SOURCE)));

        // Historical data
        html.push_str("<h2>Historical Data</h2>\n<h3>Yearly Data</h3>\n<div class=\"columns\">\n");
        let scale_max = dashboard.max_aqi();
        for location in Location::ALL {
            let rows = dashboard.yearly_rows(location)?;
            html.push_str(&format!(
                "<div>\n<p><strong>{}</strong></p>\n<iframe src=\"{}\" loading=\"lazy\"></iframe>\n",
                escape_html(location.label()),
                escape_html(location.map_embed_url())
            ));
            html.push_str(&Self::yearly_table(&rows, location, scale_max));
            html.push_str("</div>\n");
        }
        html.push_str("</div>\n");

        html.push_str(&format!("<p>{}</p>\n", escape_html(YEARLY_NARRATIVE)));
        html.push_str(&format!("<p>{}</p>\n", escape_html(BOX_PLOT_LEAD)));
        if let Some(boxplot) = &charts.boxplot {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"Yearly AQI\">\n",
                escape_html(boxplot)
            ));
        }

        // Monthly data
        html.push_str(&format!("<p>{}</p>\n", escape_html(MONTHLY_LEAD)));
        html.push_str("<h3>Monthly Data</h3>\n");
        for location in Location::ALL {
            let rows = dashboard.monthly_rows(location)?;
            html.push_str(&format!(
                "<p><strong>{}</strong></p>\n",
                escape_html(location.label())
            ));
            if let Some(chart) = charts.monthly.get(&location) {
                html.push_str(&format!(
                    "<img src=\"{}\" alt=\"Monthly AQI - {}\">\n",
                    escape_html(chart),
                    escape_html(location.label())
                ));
            }
            html.push_str(&Self::monthly_table(&rows));
        }

        html.push_str("</body>\n</html>\n");
        Ok(html)
    }

    fn reference_table() -> String {
        let mut table = String::from(
            "<table>\n<tr><th>Health Concern</th><th>AQI Value</th><th>Remarks</th></tr>\n",
        );
        for band in &AQI_BANDS {
            table.push_str(&format!(
                "<tr><td class=\"text\">{}</td><td class=\"text\">{}</td><td class=\"text\">{}</td></tr>\n",
                escape_html(band.concern),
                band.range_label(),
                escape_html(band.remarks)
            ));
        }
        table.push_str("</table>\n");
        table
    }

    /// Yearly statistics with inline bars, like a styled dataframe.
    fn yearly_table(rows: &[AggregateRow], location: Location, scale_max: f64) -> String {
        let (r, g, b) = location_rgb(location);
        let scale_max = scale_max.max(f64::EPSILON);

        let mut table = String::from(
            "<table>\n<tr><th>Year</th><th>AQI min</th><th>AQI mean</th><th>AQI max</th></tr>\n",
        );
        for row in rows {
            table.push_str(&format!("<tr><td>{}</td>", row.period));
            for value in [row.min, row.mean, row.max] {
                let pct = (value / scale_max * 100.0).clamp(0.0, 100.0);
                table.push_str(&format!(
                    "<td style=\"background: linear-gradient(90deg, rgba({r},{g},{b},0.45) {pct:.1}%, transparent {pct:.1}%)\">{value:.2}</td>"
                ));
            }
            table.push_str("</tr>\n");
        }
        table.push_str("</table>\n");
        table
    }

    /// Monthly statistics transposed: one column per month.
    fn monthly_table(rows: &[AggregateRow]) -> String {
        let mut table = String::from("<div class=\"scroll\">\n<table>\n<tr><th>Month</th>");
        for row in rows {
            table.push_str(&format!("<th>{}</th>", escape_html(&row.period.to_string())));
        }
        table.push_str("</tr>\n");

        let stats: [(&str, fn(&AggregateRow) -> f64); 3] = [
            ("AQI mean", |r| r.mean),
            ("AQI min", |r| r.min),
            ("AQI max", |r| r.max),
        ];
        for (name, value) in stats {
            table.push_str(&format!("<tr><th>{name}</th>"));
            for row in rows {
                table.push_str(&format!("<td>{:.2}</td>", value(row)));
            }
            table.push_str("</tr>\n");
        }
        table.push_str("</table>\n</div>\n");
        table
    }
}

impl Presenter for HtmlPresenter {
    fn present(&mut self, dashboard: &Dashboard) -> Result<(), PresentError> {
        fs::create_dir_all(&self.output_dir)?;

        TableExporter::write_all(dashboard, &self.output_dir)?;
        let charts = self.render_charts(dashboard)?;
        let html = Self::render_html(dashboard, &charts)?;

        let index = self.index_path();
        fs::write(&index, html)?;
        info!(path = %index.display(), "report written");

        if self.open_report {
            open_in_viewer(&index);
        }
        Ok(())
    }
}

fn open_in_viewer(path: &Path) {
    if let Err(e) = open::that(path) {
        warn!(error = %e, path = %path.display(), "could not open report");
    }
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::sample_dashboard;

    #[test]
    fn escape_html_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn page_has_every_section() {
        let html =
            HtmlPresenter::render_html(&sample_dashboard(), &ChartFiles::default()).unwrap();

        assert!(html.contains("<h1>Air Quality Index in Central and South Jakarta (2016-2022)</h1>"));
        assert!(html.contains("<h2>Introduction</h2>"));
        assert!(html.contains("Unhealthy for Sensitive Groups"));
        assert!(html.contains("301 to 500"));
        assert_eq!(html.matches("<iframe").count(), 2);
        assert!(html.contains("<h3>Monthly Data</h3>"));
        // No images without rendered charts.
        assert!(!html.contains("<img"));
    }

    #[test]
    fn tables_show_two_decimals() {
        let html =
            HtmlPresenter::render_html(&sample_dashboard(), &ChartFiles::default()).unwrap();
        // South 2017 mean is max(110, 45).
        assert!(html.contains(">110.00</td>"));
        assert!(html.contains("<th>2017-03</th>"));
    }

    #[test]
    fn chart_images_are_linked_when_present() {
        let mut charts = ChartFiles {
            boxplot: Some(BOXPLOT_FILE.to_string()),
            ..Default::default()
        };
        charts
            .monthly
            .insert(Location::SouthJakarta, "monthly_south_jakarta.png".to_string());

        let html = HtmlPresenter::render_html(&sample_dashboard(), &charts).unwrap();
        assert!(html.contains("<img src=\"yearly_boxplot.png\""));
        assert!(html.contains("<img src=\"monthly_south_jakarta.png\""));
        assert_eq!(html.matches("<img").count(), 2);
    }
}
