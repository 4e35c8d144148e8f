//! Geolocation resolution
//!
//! Turns the device's position into a `"{city}, {country}"` search text by
//! chaining a [`LocationSource`] and a [`Geocoder`].

use tracing::debug;

use crate::{
    Config, ResolveError, ResolvedLocation,
    geocode::{Geocoder, geocoder_from_config},
    location::{LocationSource, location_source_from_config},
};

#[derive(Debug)]
pub struct GeolocationResolver {
    source: Box<dyn LocationSource>,
    geocoder: Box<dyn Geocoder>,
}

impl GeolocationResolver {
    pub fn new(source: Box<dyn LocationSource>, geocoder: Box<dyn Geocoder>) -> Self {
        Self { source, geocoder }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(location_source_from_config(config), geocoder_from_config(config))
    }

    /// Locate the device and name the city it is in.
    pub async fn resolve_current_city(&self) -> Result<ResolvedLocation, ResolveError> {
        if !self.source.is_available() {
            return Err(ResolveError::Unavailable);
        }

        let at = self.source.current_position().await?;
        debug!(latitude = at.latitude, longitude = at.longitude, "got device position");

        Ok(self.geocoder.reverse_geocode(at).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Coordinates, GeoError, TransportError,
        location::{FixedLocation, NoLocation},
    };
    use async_trait::async_trait;

    #[derive(Debug)]
    struct StubGeocoder;

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn reverse_geocode(&self, _at: Coordinates) -> Result<ResolvedLocation, TransportError> {
            Ok(ResolvedLocation { city: "Itu".into(), country: "Brasil".into() })
        }
    }

    #[tokio::test]
    async fn unavailable_source_skips_everything() {
        let resolver = GeolocationResolver::new(Box::new(NoLocation), Box::new(StubGeocoder));

        let err = resolver.resolve_current_city().await.unwrap_err();
        assert!(matches!(err, ResolveError::Unavailable));
    }

    #[tokio::test]
    async fn location_failure_is_reported_with_its_code() {
        let resolver =
            GeolocationResolver::new(Box::new(FixedLocation::new(None)), Box::new(StubGeocoder));

        let err = resolver.resolve_current_city().await.unwrap_err();
        assert!(matches!(err, ResolveError::Location(GeoError::PositionUnavailable)));
    }

    #[tokio::test]
    async fn position_is_geocoded() {
        let at = Coordinates { latitude: -23.26, longitude: -47.3 };
        let resolver =
            GeolocationResolver::new(Box::new(FixedLocation::new(Some(at))), Box::new(StubGeocoder));

        let loc = resolver.resolve_current_city().await.expect("resolved");
        assert_eq!(loc.to_string(), "Itu, Brasil");
    }
}
