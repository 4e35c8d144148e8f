//! Application state shared with the presentation layer.
//!
//! [`WeatherApp`] owns the observable fields and is the only writer. Both
//! request flows take `&self`, so a UI can keep several fetches in flight;
//! whichever answer lands last decides what is shown.

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    Config, FetchError, GeoError, ResolveError, ResolvedLocation, WeatherError, WeatherQuery,
    WeatherResult,
    provider::{WeatherProvider, provider_from_config},
    resolver::GeolocationResolver,
};

/// What the presentation layer can observe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub search_text: String,
    pub result: Option<WeatherResult>,
    pub error: Option<WeatherError>,
    pub geo_error: Option<GeoError>,
    pub fetching: bool,
}

#[derive(Debug)]
pub struct WeatherApp {
    state: Mutex<AppState>,
    weather: Box<dyn WeatherProvider>,
    resolver: GeolocationResolver,
}

impl WeatherApp {
    pub fn new(weather: Box<dyn WeatherProvider>, resolver: GeolocationResolver) -> Self {
        Self { state: Mutex::new(AppState::default()), weather, resolver }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(provider_from_config(config), GeolocationResolver::from_config(config))
    }

    pub fn snapshot(&self) -> AppState {
        self.state.lock().clone()
    }

    pub fn search_text(&self) -> String {
        self.state.lock().search_text.clone()
    }

    /// User typing. Always replaces whatever geolocation put there.
    pub fn set_search_text(&self, text: impl Into<String>) {
        self.state.lock().search_text = text.into();
    }

    /// Whether the current search text may be submitted.
    pub fn can_request(&self) -> bool {
        WeatherQuery::is_submittable(&self.state.lock().search_text)
    }

    pub fn dismiss_error(&self) {
        self.state.lock().error = None;
    }

    pub fn dismiss_geo_error(&self) {
        self.state.lock().geo_error = None;
    }

    /// Run the geolocation flow once and fill the search text with the result.
    ///
    /// Never starts a weather fetch. Geocoding failures are logged and leave
    /// state alone; only location failures reach `geo_error`.
    pub async fn locate(&self) -> Result<ResolvedLocation, ResolveError> {
        let outcome = self.resolver.resolve_current_city().await;

        let mut state = self.state.lock();
        match &outcome {
            Ok(loc) => {
                info!(location = %loc, "resolved current city");
                state.search_text = loc.to_string();
            }
            Err(ResolveError::Unavailable) => debug!("no location capability, skipping"),
            Err(ResolveError::Location(e)) => {
                warn!(code = e.code(), "location request failed: {e}");
                state.geo_error = Some(*e);
            }
            Err(ResolveError::Unclassified(e)) => {
                error!("Could not resolve the city from latitude/longitude: {e}");
            }
        }

        outcome
    }

    /// The UI's "get weather" action: submits the current search text.
    ///
    /// Returns `None` without issuing a request when the text is too short.
    pub async fn request_weather(&self) -> Option<Result<(), FetchError>> {
        let query = WeatherQuery::parse(&self.search_text())?;
        Some(self.fetch_weather(query.as_str()).await)
    }

    /// Fetch weather for `city` and apply the outcome to state.
    ///
    /// `city` is not length-checked here.
    pub async fn fetch_weather(&self, city: &str) -> Result<(), FetchError> {
        let outcome = {
            let _in_flight = InFlight::start(&self.state);
            self.weather.current_weather(city).await
        };

        let mut state = self.state.lock();
        match outcome {
            Ok(result) => {
                debug!(city, location = ?result.location_name, "weather updated");
                state.result = Some(result);
                state.error = None;
                Ok(())
            }
            Err(FetchError::Rejected(rejection)) => {
                warn!(city, "weather request rejected: {rejection}");
                state.result = None;
                state.error = Some(rejection);
                if rejection == WeatherError::CityNotFound {
                    state.search_text.clear();
                }
                Err(rejection.into())
            }
            Err(err) => {
                error!(city, "Error fetching weather: {err}");
                Err(err)
            }
        }
    }
}

/// Holds `fetching` up for as long as a request is outstanding, including
/// when the request future is dropped.
struct InFlight<'a>(&'a Mutex<AppState>);

impl<'a> InFlight<'a> {
    fn start(state: &'a Mutex<AppState>) -> Self {
        state.lock().fetching = true;
        Self(state)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.lock().fetching = false;
    }
}
