use anyhow::{Context, bail};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use clima_core::{Config, WeatherApp, WeatherQuery, config::LocationSourceKind};
use inquire::{
    Confirm, CustomType, CustomUserError, InquireError, Select, Text, validator::Validation,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "clima", version, about = "Weather for any city in the world")]
pub struct Cli {
    /// Log request flow details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Without a subcommand, starts an interactive session.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure API keys and the location source.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name, at least three characters.
        city: String,
    },

    /// Resolve the city you are in from the device location.
    Locate,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city }) => {
                let (app, tz) = load_app()?;
                show(&app, city, tz).await
            }
            Some(Command::Locate) => {
                let (app, _) = load_app()?;
                locate(&app).await
            }
            None => {
                let (app, tz) = load_app()?;
                interactive(&app, tz).await
            }
        }
    }
}

/// Read configuration once and build the app from it.
fn load_app() -> anyhow::Result<(WeatherApp, Tz)> {
    let config = Config::load()?;
    for provider in missing_keys(&config) {
        tracing::warn!("No {provider} API key configured; run `clima configure`");
    }
    let tz = render::timezone(&config.display.timezone);
    Ok((WeatherApp::from_config(&config), tz))
}

/// Providers that will be called without a key. Geocoding only counts when
/// a location source is set.
fn missing_keys(config: &Config) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if !config.is_weather_configured() {
        missing.push("weather");
    }
    if config.location.source != LocationSourceKind::None && !config.is_geocoding_configured() {
        missing.push("geocoding");
    }
    missing
}

async fn show(app: &WeatherApp, city: String, tz: Tz) -> anyhow::Result<()> {
    app.set_search_text(city);
    if !app.can_request() {
        bail!("City name must have at least {} characters.", WeatherQuery::MIN_LEN);
    }
    let _ = app.request_weather().await;

    print!("{}", render::state(&app.snapshot(), tz));
    Ok(())
}

async fn locate(app: &WeatherApp) -> anyhow::Result<()> {
    let _ = app.locate().await;

    let state = app.snapshot();
    if let Some(err) = state.geo_error {
        eprintln!("{}", render::geo_alert(err));
    } else if !state.search_text.is_empty() {
        println!("{}", state.search_text);
    }
    Ok(())
}

/// Prompt loop: geolocate once, then look up whatever the user submits.
async fn interactive(app: &WeatherApp, tz: Tz) -> anyhow::Result<()> {
    let _ = app.locate().await;

    if let Some(err) = app.snapshot().geo_error {
        eprintln!("{}\n", render::geo_alert(err));
        app.dismiss_geo_error();
    }

    loop {
        let search_text = app.search_text();
        let answer = Text::new("City:")
            .with_initial_value(&search_text)
            .with_placeholder("Enter a city")
            .with_validator(|input: &str| -> Result<Validation, CustomUserError> {
                if WeatherQuery::is_submittable(input) {
                    Ok(Validation::Valid)
                } else {
                    Ok(Validation::Invalid(
                        format!("Enter at least {} characters", WeatherQuery::MIN_LEN).into(),
                    ))
                }
            })
            .with_help_message("Esc to quit")
            .prompt();

        let city = match answer {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read city"),
        };

        app.set_search_text(city);
        println!("Fetching weather...");
        let _ = app.request_weather().await;

        let state = app.snapshot();
        println!("{}", render::state(&state, tz));
        // The notification is shown once, then goes away on its own.
        if state.error.is_some() {
            app.dismiss_error();
        }
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    config.weather.api_key = Text::new("OpenWeather API key:")
        .with_initial_value(&config.weather.api_key)
        .prompt()?;
    config.geocoding.api_key = Text::new("OpenCage API key:")
        .with_initial_value(&config.geocoding.api_key)
        .prompt()?;

    let kinds = LocationSourceKind::all();
    let current = kinds.iter().position(|k| *k == config.location.source).unwrap_or(0);
    config.location.source = Select::new("Location source:", kinds.to_vec())
        .with_starting_cursor(current)
        .prompt()?;

    if config.location.source != LocationSourceKind::None {
        config.location.allowed = Confirm::new("Allow clima to use your location?")
            .with_default(config.location.allowed)
            .prompt()?;
    }

    if config.location.source == LocationSourceKind::Fixed {
        config.location.latitude = Some(CustomType::<f64>::new("Latitude:").prompt()?);
        config.location.longitude = Some(CustomType::<f64>::new("Longitude:").prompt()?);
    }

    config.save_to(&path)?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}
