//! Error taxonomies for the two request flows.
//!
//! [`GeoError`] and [`WeatherError`] are the user-visible conditions. Anything
//! else that goes wrong on the wire is a [`TransportError`]: it is logged for
//! diagnostics and never stored in application state.

use thiserror::Error;

/// Failure reported by the device location capability.
///
/// Discriminants match the platform's numeric failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum GeoError {
    #[error("Permission to find your location was not granted")]
    PermissionDenied = 1,
    #[error("Could not determine your location")]
    PositionUnavailable = 2,
    #[error("Timed out while determining your location")]
    Timeout = 3,
}

impl GeoError {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Application-level rejection carried in the weather provider's `cod` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum WeatherError {
    #[error("The API key provided is invalid.")]
    InvalidApiKey,
    #[error("The city provided does not exist.")]
    CityNotFound,
    #[error("Free API usage was exceeded (60 calls per minute).")]
    RateLimited,
}

impl WeatherError {
    /// Maps a normalized `cod` value to a rejection, if it is one.
    pub fn from_cod(cod: &str) -> Option<Self> {
        match cod {
            "401" => Some(Self::InvalidApiKey),
            "404" => Some(Self::CityNotFound),
            "409" => Some(Self::RateLimited),
            _ => None,
        }
    }
}

/// Unclassified failure: the provider could not be reached or did not answer
/// with something we can read.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider answered with HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response is missing `{0}`")]
    MissingField(&'static str),
}

/// Outcome of a weather fetch that did not produce a result.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Rejected(#[from] WeatherError),
    #[error("unclassified weather failure: {0}")]
    Unclassified(#[from] TransportError),
}

/// Outcome of a geolocation run that did not produce a city.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// No location capability on this platform. Not an error state.
    #[error("location capability is unavailable")]
    Unavailable,
    #[error(transparent)]
    Location(#[from] GeoError),
    #[error("unclassified geocoding failure: {0}")]
    Unclassified(#[from] TransportError),
}
