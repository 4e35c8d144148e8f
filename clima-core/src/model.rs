use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position reported by a location capability, in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Place name derived from [`Coordinates`] by a geocoding provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub city: String,
    pub country: String,
}

impl fmt::Display for ResolvedLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

/// A city name that may be submitted to the weather provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery(String);

impl WeatherQuery {
    /// Shortest city name that can be submitted, in characters.
    pub const MIN_LEN: usize = 3;

    pub fn is_submittable(text: &str) -> bool {
        text.chars().count() >= Self::MIN_LEN
    }

    pub fn parse(text: &str) -> Option<Self> {
        Self::is_submittable(text).then(|| Self(text.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Successful weather lookup.
///
/// `raw` keeps the provider's body exactly as decoded. The other fields are
/// the parts the result card shows, each absent when the body lacks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub location_name: Option<String>,
    pub temperature_c: Option<f64>,
    pub temp_min_c: Option<f64>,
    pub temp_max_c: Option<f64>,
    pub condition: Option<String>,
    pub icon: Option<String>,
    pub observed_at: Option<DateTime<Utc>>,
    pub raw: serde_json::Value,
}

impl WeatherResult {
    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_deref()
            .map(|icon| format!("http://openweathermap.org/img/wn/{icon}@4x.png"))
    }
}
