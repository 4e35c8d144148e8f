use crate::{Config, FetchError, WeatherResult, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A source of current weather for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Issues one lookup for `city`. Does not validate the query length.
    async fn current_weather(&self, city: &str) -> Result<WeatherResult, FetchError>;
}

/// Construct the weather provider from config.
pub fn provider_from_config(config: &Config) -> Box<dyn WeatherProvider> {
    let api_key = config.weather.api_key.clone();
    let provider = match config.weather.base_url.as_deref() {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key, base_url),
        None => OpenWeatherProvider::new(api_key),
    };
    Box::new(provider)
}
