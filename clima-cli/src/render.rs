//! Human-friendly output.

use chrono_tz::Tz;
use clima_core::{AppState, GeoError, WeatherError, WeatherResult};
use tracing::warn;

/// Parse an IANA zone name, falling back to UTC.
pub fn timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        warn!("Unknown timezone '{name}', showing times in UTC");
        Tz::UTC
    })
}

/// Renders whatever readings the result carries. A result with none of them
/// falls back to the provider's body.
pub fn weather_card(result: &WeatherResult, tz: Tz) -> String {
    let mut out = String::new();

    if let Some(name) = &result.location_name {
        out.push_str(&format!("{name}\n"));
    }
    if let Some(temp) = result.temperature_c {
        out.push_str(&format!("{temp}℃\n"));
    }
    if let (Some(min), Some(max)) = (result.temp_min_c, result.temp_max_c) {
        out.push_str(&format!("min: {min}℃ ↓ - max: {max}℃ ↑\n"));
    }
    if let Some(condition) = &result.condition {
        out.push_str(&format!("{condition}\n"));
    }
    if let Some(url) = result.icon_url() {
        out.push_str(&format!("{url}\n"));
    }
    if let Some(at) = result.observed_at {
        out.push_str(&format!(
            "Updated at: {}\n",
            at.with_timezone(&tz).format("%d/%m/%Y %H:%M:%S")
        ));
    }

    if out.is_empty() {
        out.push_str(&format!("{}\n", result.raw));
    }
    out
}

pub fn weather_toast(err: WeatherError) -> String {
    format!("{err} 😢\nPlease try a new search.")
}

pub fn geo_alert(err: GeoError) -> String {
    format!("Oops! Something went wrong while getting your location.\n{err}")
}

/// Everything the state currently asks to show, in display order.
pub fn state(state: &AppState, tz: Tz) -> String {
    let mut out = String::new();
    if let Some(err) = state.geo_error {
        out.push_str(&geo_alert(err));
        out.push('\n');
    }
    if let Some(err) = state.error {
        out.push_str(&weather_toast(err));
        out.push('\n');
    }
    if let Some(result) = &state.result {
        out.push_str(&weather_card(result, tz));
    }
    out
}
