//! Core library for the `clima` weather tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The geolocation flow (location capability + reverse geocoding)
//! - The weather flow and its response classification
//! - Application state shared with a presentation layer
//!
//! It is used by `clima-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod geocode;
pub mod location;
pub mod model;
pub mod provider;
pub mod resolver;
pub mod state;

pub use config::Config;
pub use error::{FetchError, GeoError, ResolveError, TransportError, WeatherError};
pub use model::{Coordinates, ResolvedLocation, WeatherQuery, WeatherResult};
pub use provider::WeatherProvider;
pub use resolver::GeolocationResolver;
pub use state::{AppState, WeatherApp};
