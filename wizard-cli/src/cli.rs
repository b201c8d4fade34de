use std::io;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use tracing::{debug, error};
use wizard_core::{
    Config, CurrentReport, ForecastSettings, ForecastView, Location, LocationCatalog,
    MediaCatalog, SelectionPolicy, Units, WeatherError, forecast::local_today,
    provider::provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-wizard",
    version,
    about = "🧙 Weather Wizard: current conditions and a 5-day forecast"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred units.
    Configure,

    /// List selectable locations.
    Cities {
        /// Only show labels containing this text.
        filter: Option<String>,
    },

    /// Show current conditions.
    Now {
        /// "City, Country"; omit to pick interactively.
        location: Option<String>,

        /// metric or imperial; defaults to the configured units.
        #[arg(long, value_parser = parse_units)]
        units: Option<Units>,
    },

    /// Show today's weather and the next days.
    Forecast {
        /// "City, Country"; omit to pick interactively.
        location: Option<String>,

        #[arg(long, value_parser = parse_units)]
        units: Option<Units>,

        /// Number of upcoming days to show.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        days: Option<u8>,

        /// Skip days that have no sample at exactly the reference hour.
        #[arg(long)]
        exact_noon: bool,
    },
}

fn parse_units(s: &str) -> Result<Units, String> {
    Units::try_from(s).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config),
            Command::Cities { filter } => {
                let catalog = load_catalog(&config);
                let hits: Vec<&Location> = match filter.as_deref() {
                    Some(f) => catalog.search(f),
                    None => catalog.entries().iter().collect(),
                };
                for loc in hits {
                    println!("{}", loc.label);
                }
                Ok(())
            }
            Command::Now { location, units } => {
                let location = choose_location(&config, location)?;
                let units = units.unwrap_or(config.units);
                let media = MediaCatalog::default();

                let report =
                    fetch_current(&config, &location, units).await.map_err(report_failure)?;

                render::current(&mut io::stdout().lock(), &location, &report, units, &media)?;
                Ok(())
            }
            Command::Forecast { location, units, days, exact_noon } => {
                let location = choose_location(&config, location)?;
                let units = units.unwrap_or(config.units);
                let media = MediaCatalog::default();

                let mut settings = config.forecast_settings();
                if let Some(days) = days {
                    settings.max_days = usize::from(days);
                }
                if exact_noon {
                    settings.policy = SelectionPolicy::ExactHour;
                }

                let view = fetch_forecast(&config, &location, units, &settings)
                    .await
                    .map_err(report_failure)?;

                render::forecast(&mut io::stdout().lock(), &location, &view, units, &media)?;
                Ok(())
            }
        }
    }
}

async fn fetch_current(
    config: &Config,
    location: &Location,
    units: Units,
) -> Result<CurrentReport, WeatherError> {
    let provider = provider_from_config(config)?;
    provider.current(location, units).await
}

async fn fetch_forecast(
    config: &Config,
    location: &Location,
    units: Units,
    settings: &ForecastSettings,
) -> Result<ForecastView, WeatherError> {
    let provider = provider_from_config(config)?;
    let feed = provider.forecast(location, units).await?;
    let today = local_today(settings.policy.calendar_offset(feed.utc_offset));
    ForecastView::build(&feed, today, settings)
}

/// Log the detailed failure, surface only the generic message.
fn report_failure(err: WeatherError) -> anyhow::Error {
    error!(error = %err, "weather lookup failed");
    anyhow::anyhow!(err.user_message())
}

fn load_catalog(config: &Config) -> LocationCatalog {
    let catalog = LocationCatalog::load(&config.city_files, &config.localities);
    debug!(entries = catalog.len(), fallback = catalog.is_fallback(), "location catalog ready");
    catalog
}

fn choose_location(config: &Config, input: Option<String>) -> anyhow::Result<Location> {
    let catalog = load_catalog(config);

    if let Some(input) = input {
        return Ok(catalog.resolve(&input));
    }

    let labels = catalog.labels();
    let start = catalog.default_index(&config.default_location);
    let picked = Select::new("📍 Choose your location (City, Country)", labels)
        .with_starting_cursor(start)
        .prompt()
        .context("Location selection was cancelled")?;

    Ok(catalog.resolve(picked))
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to rely on OPENWEATHER_API_KEY instead")
        .prompt()?;
    config.set_api_key(key);

    let units = Units::all().to_vec();
    let start = units.iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Units:", units).with_starting_cursor(start).prompt()?;

    let default_location = Text::new("Preselected location:")
        .with_default(&config.default_location)
        .prompt()?;
    config.default_location = default_location;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
