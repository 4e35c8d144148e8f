use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::{FetchError, TransportError, WeatherError, WeatherResult};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org";
const LANG: &str = "pt";
const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            endpoint: format!("{}/data/2.5/weather", base_url.trim_end_matches('/')),
            // No timeout: the request runs until the provider answers.
            http: Client::new(),
        }
    }

    async fn fetch_body(&self, city: &str) -> Result<Value, TransportError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", city),
                ("lang", LANG),
                ("units", UNITS),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        // Rejections come back as non-2xx with a `cod` in the body, so the
        // status is not inspected here.
        debug!(status = %res.status(), city, "OpenWeather answered");

        let body = res.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherResult, FetchError> {
        let body = self.fetch_body(city).await?;
        Ok(classify(body)?)
    }
}

/// Sorts a decoded body into a rejection or a result.
///
/// Anything that is not a known rejection is a result, whatever else the
/// body holds.
pub fn classify(body: Value) -> Result<WeatherResult, WeatherError> {
    match cod(&body).as_deref().and_then(WeatherError::from_cod) {
        Some(rejection) => Err(rejection),
        None => Ok(into_result(body)),
    }
}

/// `cod` arrives as a string on some answers and a number on others.
/// Both forms are normalized to the decimal string.
fn cod(body: &Value) -> Option<String> {
    match body.get("cod")? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 => format!("{f:.0}"),
            _ => n.to_string(),
        }),
        _ => None,
    }
}

fn text(body: &Value, pointer: &str) -> Option<String> {
    body.pointer(pointer).and_then(Value::as_str).map(str::to_string)
}

fn number(body: &Value, pointer: &str) -> Option<f64> {
    body.pointer(pointer).and_then(Value::as_f64)
}

fn into_result(body: Value) -> WeatherResult {
    let observed_at = body
        .get("dt")
        .and_then(Value::as_i64)
        .and_then(|dt| DateTime::<Utc>::from_timestamp(dt, 0));

    WeatherResult {
        location_name: text(&body, "/name"),
        temperature_c: number(&body, "/main/temp"),
        temp_min_c: number(&body, "/main/temp_min"),
        temp_max_c: number(&body, "/main/temp_max"),
        condition: text(&body, "/weather/0/description"),
        icon: text(&body, "/weather/0/icon"),
        observed_at,
        raw: body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sorocaba(cod: Value) -> Value {
        json!({
            "cod": cod,
            "name": "Sorocaba",
            "dt": 1_700_000_000,
            "main": { "temp": 24.5, "feels_like": 25.0, "temp_min": 22.1, "temp_max": 26.3 },
            "weather": [{ "id": 803, "description": "nublado", "icon": "04d" }],
        })
    }

    #[test]
    fn string_and_numeric_cod_classify_the_same() {
        for cod in [json!("404"), json!(404), json!(404.0), json!(" 404 ")] {
            let err = classify(json!({ "cod": cod, "message": "city not found" })).unwrap_err();
            assert_eq!(err, WeatherError::CityNotFound);
        }
    }

    #[test]
    fn invalid_key_and_rate_limit_are_rejections() {
        let err = classify(json!({ "cod": 401, "message": "Invalid API key" })).unwrap_err();
        assert_eq!(err, WeatherError::InvalidApiKey);

        let err = classify(json!({ "cod": "409" })).unwrap_err();
        assert_eq!(err, WeatherError::RateLimited);

        let err = classify(json!({ "cod": 409.0 })).unwrap_err();
        assert_eq!(err, WeatherError::RateLimited);
    }

    #[test]
    fn fractional_cod_is_not_a_rejection() {
        let result = classify(json!({ "cod": 404.5 })).expect("success");
        assert_eq!(result.raw, json!({ "cod": 404.5 }));
    }

    #[test]
    fn other_cod_values_are_success() {
        for cod in [json!(200), json!("200"), json!(429), json!(null)] {
            let body = sorocaba(cod);
            let result = classify(body.clone()).expect("success");
            assert_eq!(result.raw, body);
        }
    }

    #[test]
    fn missing_cod_is_success_and_keeps_full_body() {
        let mut body = sorocaba(Value::Null);
        if let Some(obj) = body.as_object_mut() {
            obj.remove("cod");
        }

        let result = classify(body.clone()).expect("success");

        assert_eq!(result.location_name.as_deref(), Some("Sorocaba"));
        assert_eq!(result.temperature_c, Some(24.5));
        assert_eq!(result.temp_min_c, Some(22.1));
        assert_eq!(result.temp_max_c, Some(26.3));
        assert_eq!(result.condition.as_deref(), Some("nublado"));
        assert_eq!(result.icon.as_deref(), Some("04d"));
        assert_eq!(result.observed_at.map(|t| t.timestamp()), Some(1_700_000_000));
        assert_eq!(result.raw, body);
    }

    #[test]
    fn empty_weather_list_has_no_condition() {
        let mut body = sorocaba(json!(200));
        body["weather"] = json!([]);

        let result = classify(body).expect("success");
        assert_eq!(result.condition, None);
        assert_eq!(result.icon, None);
        assert_eq!(result.icon_url(), None);
    }

    #[test]
    fn blocked_account_body_is_a_result_without_readings() {
        let body = json!({ "cod": 429, "message": "Your account is temporary blocked" });

        let result = classify(body.clone()).expect("success");

        assert_eq!(result.raw, body);
        assert_eq!(result.location_name, None);
        assert_eq!(result.temperature_c, None);
        assert_eq!(result.observed_at, None);
    }

    #[test]
    fn wrongly_typed_fields_are_skipped() {
        let result = classify(json!({ "name": 12, "main": "hot", "dt": "yesterday" })).expect("success");

        assert_eq!(result.location_name, None);
        assert_eq!(result.temperature_c, None);
        assert_eq!(result.observed_at, None);
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let provider = OpenWeatherProvider::with_base_url("k".into(), "http://localhost:1234/");
        assert_eq!(provider.endpoint, "http://localhost:1234/data/2.5/weather");
    }
}
