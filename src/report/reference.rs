//! Fixed report content: AQI reference bands and narrative text.

use serde::Serialize;

pub const TITLE: &str = "Air Quality Index in Central and South Jakarta (2016-2022)";

pub const INTRODUCTION: [&str; 2] = [
    "An air quality index (AQI) is used by government agencies to communicate to the public how polluted the air currently is or how polluted it is forecast to become. It is obtained by averaging readings from an air quality sensor, which can increase due to vehicle traffic, forest fires, or anything that can increase air pollution. Pollutants tested include ozone, nitrogen dioxide, sulphur dioxide, among others.",
    "Public health risks increase as the AQI rises, especially affecting children, the elderly, and individuals with respiratory or cardiovascular issues. During these times, governmental bodies generally encourage people to reduce physical activity outdoors, or even avoid going out altogether. The use of face masks such as cloth masks may also be recommended.",
];

pub const DATA_SOURCE: &str = "For this project, AQI data from US Embassy Jakarta is used. The data was collected from the embassy's air quality meters located in Central and South Jakarta from January 2016 to October 2022.";

pub const YEARLY_NARRATIVE: &str = "Looking at the yearly summary from the historical data, it is clearly visible that the AQI value was the highest during 2016. There was a significant decrease starting in 2017. The values dropped even more during the COVID lockdown in 2020 to 2021. However, we see an increase again in 2022 after the COVID lockdown was relaxed. The maximum value in 2022 is almost the same as it was before the COVID lockdown, with South Jakarta area seeing a very drastic increase.";

pub const BOX_PLOT_LEAD: &str = "The AQI value distribution for each year can be seen in the box plot below.";

pub const MONTHLY_LEAD: &str = "Here we can see how the monthly AQI value changes over time in more detail.";

/// One row of the AQI health concern lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AqiBand {
    pub concern: &'static str,
    pub low: u32,
    pub high: u32,
    pub remarks: &'static str,
}

impl AqiBand {
    /// Range label, e.g. `51 to 100`.
    pub fn range_label(&self) -> String {
        format!("{} to {}", self.low, self.high)
    }
}

pub const AQI_BANDS: [AqiBand; 6] = [
    AqiBand {
        concern: "Good",
        low: 0,
        high: 50,
        remarks: "Satisfactory, air pollution poses little or no risk",
    },
    AqiBand {
        concern: "Moderate",
        low: 51,
        high: 100,
        remarks: "Acceptable; however, for some pollutants there may be a moderate health concern for a very small number of people who are unusually sensitive to air pollution.",
    },
    AqiBand {
        concern: "Unhealthy for Sensitive Groups",
        low: 101,
        high: 150,
        remarks: "Members of sensitive groups may experience health effects. The general public is not likely to be affected.",
    },
    AqiBand {
        concern: "Unhealthy",
        low: 151,
        high: 200,
        remarks: "Everyone may begin to experience health effects; members of sensitive groups may experience more serious health effects.",
    },
    AqiBand {
        concern: "Very Unhealthy",
        low: 201,
        high: 300,
        remarks: "Health warnings of emergency conditions. The entire population is more likely to be affected.",
    },
    AqiBand {
        concern: "Hazardous",
        low: 301,
        high: 500,
        remarks: "Health alert: everyone may experience more serious health effects.",
    },
];

/// Band an index value falls in. Fractional values round up, anything past
/// the scale is Hazardous.
pub fn classify(aqi: f64) -> &'static AqiBand {
    let value = aqi.max(0.0).ceil();
    AQI_BANDS
        .iter()
        .find(|band| value <= f64::from(band.high))
        .unwrap_or(&AQI_BANDS[AQI_BANDS.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_are_contiguous() {
        for pair in AQI_BANDS.windows(2) {
            assert_eq!(pair[0].high + 1, pair[1].low);
        }
        assert_eq!(AQI_BANDS[2].range_label(), "101 to 150");
    }

    #[test]
    fn classify_band_edges() {
        assert_eq!(classify(0.0).concern, "Good");
        assert_eq!(classify(50.0).concern, "Good");
        assert_eq!(classify(50.5).concern, "Moderate");
        assert_eq!(classify(151.0).concern, "Unhealthy");
        assert_eq!(classify(300.0).concern, "Very Unhealthy");
        assert_eq!(classify(999.0).concern, "Hazardous");
        assert_eq!(classify(-3.0).concern, "Good");
    }
}
