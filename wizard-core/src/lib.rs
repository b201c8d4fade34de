//! Core library for the `weather-wizard` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The location catalog loaded from city CSV files
//! - The OpenWeather client and the typed errors it returns
//! - Forecast reduction (one representative sample per day)
//! - The condition to icon/video table
//!
//! It is used by `wizard-cli`, but can also be reused by other binaries or services.

pub mod catalog;
pub mod config;
pub mod error;
pub mod forecast;
pub mod media;
pub mod model;
pub mod provider;

pub use catalog::{LocalityGroup, LocationCatalog};
pub use config::Config;
pub use error::WeatherError;
pub use forecast::{ForecastSettings, ForecastView, SelectionPolicy};
pub use media::{MediaCatalog, MediaEntry};
pub use model::{
    Condition, CurrentReport, DailyForecast, ForecastFeed, Location, Units, WeatherSample,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
