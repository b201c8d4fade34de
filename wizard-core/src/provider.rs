use crate::{
    Config,
    error::WeatherError,
    model::{CurrentReport, ForecastFeed, Location, Units},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// One best-effort request per call: no retries, no backoff.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: &Location, units: Units)
    -> Result<CurrentReport, WeatherError>;

    async fn forecast(&self, location: &Location, units: Units)
    -> Result<ForecastFeed, WeatherError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    let api_key = config.api_key().ok_or(WeatherError::MissingApiKey)?;
    Ok(Box::new(OpenWeatherProvider::with_base_url(api_key, config.base_url.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config { api_key: None, ..Config::default() };
        // The environment may carry a key on a developer machine.
        if cfg.api_key().is_some() {
            return;
        }

        let err = provider_from_config(&cfg).unwrap_err();
        assert!(matches!(err, WeatherError::MissingApiKey));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
