//! Sensor locations.
//! The dashboard covers exactly two monitoring stations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monitoring station a reading was taken at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "Central Jakarta")]
    CentralJakarta,
    #[serde(rename = "South Jakarta")]
    SouthJakarta,
}

impl Location {
    /// All locations in display order.
    pub const ALL: [Location; 2] = [Location::CentralJakarta, Location::SouthJakarta];

    /// Label stored in the `Location` column.
    pub fn label(self) -> &'static str {
        match self {
            Location::CentralJakarta => "Central Jakarta",
            Location::SouthJakarta => "South Jakarta",
        }
    }

    /// File-name friendly identifier.
    pub fn slug(self) -> &'static str {
        match self {
            Location::CentralJakarta => "central_jakarta",
            Location::SouthJakarta => "south_jakarta",
        }
    }

    /// Default CSV export name from the embassy air quality monitor.
    pub fn default_csv(self) -> &'static str {
        match self {
            Location::CentralJakarta => "jakarta-central (us consulate), indonesia-air-quality.csv",
            Location::SouthJakarta => "jakarta-south (us consulate), indonesia-air-quality.csv",
        }
    }

    /// Embeddable map of the district.
    pub fn map_embed_url(self) -> &'static str {
        match self {
            Location::CentralJakarta => "https://www.google.com/maps/embed?pb=!1m18!1m12!1m3!1d63465.833488223354!2d106.76461943256236!3d-6.182308177244731!2m3!1f0!2f0!3f0!3m2!1i1024!2i768!4f13.1!3m3!1m2!1s0x2e69f436b8c94b07%3A0x6ea6d5398b7c82f6!2sCentral%20Jakarta%2C%20Central%20Jakarta%20City%2C%20Jakarta!5e0!3m2!1sen!2sid!4v1665699018349!5m2!1sen!2sid",
            Location::SouthJakarta => "https://www.google.com/maps/embed?pb=!1m18!1m12!1m3!1d126907.03875481836!2d106.73186763750911!3d-6.2841018694149255!2m3!1f0!2f0!3f0!3m2!1i1024!2i768!4f13.1!3m3!1m2!1s0x2e69f1ec2422b0b3%3A0x39a0d0fe47404d02!2sSouth%20Jakarta%2C%20South%20Jakarta%20City%2C%20Jakarta!5e0!3m2!1sen!2sid!4v1665699103708!5m2!1sen!2sid",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Location::ALL
            .into_iter()
            .find(|loc| loc.label() == s)
            .ok_or_else(|| format!("unknown location: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_round_trips_through_from_str() {
        for loc in Location::ALL {
            assert_eq!(loc.label().parse::<Location>(), Ok(loc));
        }
        assert!("North Jakarta".parse::<Location>().is_err());
    }
}
