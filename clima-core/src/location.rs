//! Device location capability.
//!
//! A terminal has no GPS, so "the device's location" comes from one of the
//! sources below, picked by `[location]` in the config. Each reports the
//! same three failure codes a browser's geolocation does.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};
use tracing::{debug, warn};

use crate::{
    Config, Coordinates, GeoError,
    config::{LocationConfig, LocationSourceKind},
};

const IP_API_URL: &str = "http://ip-api.com/json";

/// Platform default for an IP lookup. Not configurable.
pub const IP_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    /// Whether this platform can locate the user at all.
    fn is_available(&self) -> bool {
        true
    }

    async fn current_position(&self) -> Result<Coordinates, GeoError>;
}

/// No location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

#[async_trait]
impl LocationSource for NoLocation {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        Err(GeoError::PositionUnavailable)
    }
}

/// The user refused location access.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedLocation;

#[async_trait]
impl LocationSource for DeniedLocation {
    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        Err(GeoError::PermissionDenied)
    }
}

/// Position taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    coordinates: Option<Coordinates>,
}

impl FixedLocation {
    pub fn new(coordinates: Option<Coordinates>) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        self.coordinates.ok_or(GeoError::PositionUnavailable)
    }
}

/// Approximate position from the public IP address, via ip-api.com.
#[derive(Debug, Clone)]
pub struct IpLocation {
    endpoint: String,
    timeout: Duration,
    http: Client,
}

impl IpLocation {
    pub fn new() -> Self {
        Self::with_endpoint(IP_API_URL, IP_LOOKUP_TIMEOUT)
    }

    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> Self {
        Self { endpoint: endpoint.to_string(), timeout, http: Client::new() }
    }

    async fn lookup(&self) -> Result<IpApiResponse, reqwest::Error> {
        self.http.get(&self.endpoint).send().await?.error_for_status()?.json().await
    }
}

impl Default for IpLocation {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

#[async_trait]
impl LocationSource for IpLocation {
    async fn current_position(&self) -> Result<Coordinates, GeoError> {
        let res = match tokio::time::timeout(self.timeout, self.lookup()).await {
            Ok(Ok(res)) => res,
            Ok(Err(e)) => {
                warn!("IP geolocation request failed: {e}");
                return Err(GeoError::PositionUnavailable);
            }
            Err(_) => return Err(GeoError::Timeout),
        };

        match (res.status.as_str(), res.lat, res.lon) {
            ("success", Some(latitude), Some(longitude)) => {
                debug!(latitude, longitude, "IP geolocation succeeded");
                Ok(Coordinates { latitude, longitude })
            }
            _ => {
                warn!(
                    status = %res.status,
                    message = res.message.as_deref().unwrap_or(""),
                    "IP geolocation gave no position"
                );
                Err(GeoError::PositionUnavailable)
            }
        }
    }
}

/// Construct the location source from config.
pub fn location_source_from_config(config: &Config) -> Box<dyn LocationSource> {
    let LocationConfig { source, allowed, latitude, longitude } = config.location;

    match source {
        LocationSourceKind::None => Box::new(NoLocation),
        _ if !allowed => Box::new(DeniedLocation),
        LocationSourceKind::Ip => Box::new(IpLocation::new()),
        LocationSourceKind::Fixed => {
            let coordinates = latitude.zip(longitude).map(|(latitude, longitude)| Coordinates {
                latitude,
                longitude,
            });
            if coordinates.is_none() {
                warn!("location source is `fixed` but latitude/longitude are not both set");
            }
            Box::new(FixedLocation::new(coordinates))
        }
    }
}
