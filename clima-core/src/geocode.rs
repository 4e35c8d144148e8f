//! Reverse geocoding: coordinates to a `"{city}, {country}"` place name.

use crate::{Config, Coordinates, ResolvedLocation, TransportError, geocode::opencage::OpenCageGeocoder};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod opencage;

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn reverse_geocode(&self, at: Coordinates) -> Result<ResolvedLocation, TransportError>;
}

/// Construct the geocoder from config.
pub fn geocoder_from_config(config: &Config) -> Box<dyn Geocoder> {
    let api_key = config.geocoding.api_key.clone();
    let geocoder = match config.geocoding.base_url.as_deref() {
        Some(base_url) => OpenCageGeocoder::with_base_url(api_key, base_url),
        None => OpenCageGeocoder::new(api_key),
    };
    Box::new(geocoder)
}
