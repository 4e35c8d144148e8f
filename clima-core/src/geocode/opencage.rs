use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{Coordinates, ResolvedLocation, TransportError};

use super::Geocoder;

const DEFAULT_BASE_URL: &str = "https://api.opencagedata.com";

/// Reverse geocoder backed by the OpenCage API.
#[derive(Debug, Clone)]
pub struct OpenCageGeocoder {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenCageGeocoder {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            endpoint: format!("{}/geocode/v1/json", base_url.trim_end_matches('/')),
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OcResponse {
    #[serde(default)]
    results: Vec<OcResult>,
}

#[derive(Debug, Deserialize)]
struct OcResult {
    components: OcComponents,
}

#[derive(Debug, Deserialize)]
struct OcComponents {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

fn first_place(res: OcResponse) -> Result<ResolvedLocation, TransportError> {
    let first = res
        .results
        .into_iter()
        .next()
        .ok_or(TransportError::MissingField("results[0]"))?;
    let c = first.components;

    // Smaller places carry `town` or `village` instead of `city`.
    let city = c
        .city
        .or(c.town)
        .or(c.village)
        .ok_or(TransportError::MissingField("results[0].components.city"))?;
    let country = c.country.ok_or(TransportError::MissingField("results[0].components.country"))?;

    Ok(ResolvedLocation { city, country })
}

#[async_trait]
impl Geocoder for OpenCageGeocoder {
    async fn reverse_geocode(&self, at: Coordinates) -> Result<ResolvedLocation, TransportError> {
        // OpenCage takes "lat lon" in a single `q` parameter.
        let q = format!("{} {}", at.latitude, at.longitude);

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("q", q.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        let body = res.text().await?;
        let parsed: OcResponse = serde_json::from_str(&body)?;
        debug!(results = parsed.results.len(), "OpenCage answered");

        first_place(parsed)
    }
}
