use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::{
    error::WeatherError,
    model::{Condition, CurrentReport, ForecastFeed, Location, Units, WeatherSample},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// GET `{base_url}/{endpoint}` and return the body of a 2xx response.
    async fn get(
        &self,
        endpoint: &str,
        location: &Location,
        units: Units,
    ) -> Result<String, WeatherError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let query = location.query();

        let res = self
            .http
            .get(url)
            .query(&[
                ("q", query.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", units.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(%status, endpoint, q = %query, "OpenWeather request rejected");
            return Err(WeatherError::NonSuccessStatus { status, body: truncate_body(&body) });
        }

        debug!(%status, endpoint, bytes = body.len(), "OpenWeather response received");
        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
    /// Shift in seconds from UTC.
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

/// `None` when the entry carries no `weather[0]`.
fn to_sample(
    timestamp: DateTime<Utc>,
    main: &OwMain,
    weather: &[OwWeather],
    wind: &OwWind,
) -> Option<WeatherSample> {
    let w = weather.first()?;

    Some(WeatherSample {
        timestamp,
        condition: Condition::parse(&w.main),
        description: w.description.clone(),
        temperature: main.temp,
        feels_like: main.feels_like,
        humidity: main.humidity,
        wind_speed: wind.speed,
        icon_code: w.icon.clone(),
    })
}

pub(crate) fn parse_current(body: &str) -> Result<CurrentReport, WeatherError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    let observation_time = unix_to_utc(parsed.dt).unwrap_or_else(Utc::now);
    let sample = to_sample(observation_time, &parsed.main, &parsed.weather, &parsed.wind)
        .ok_or(WeatherError::MalformedSample { index: 0 })?;

    let location_name = match parsed.sys.country {
        Some(country) if !country.is_empty() => format!("{}, {country}", parsed.name),
        _ => parsed.name,
    };

    Ok(CurrentReport { location_name, sample })
}

pub(crate) fn parse_forecast(body: &str) -> Result<ForecastFeed, WeatherError> {
    let parsed: OwForecastResponse = serde_json::from_str(body)?;

    let samples = parsed
        .list
        .iter()
        .enumerate()
        .map(|(index, e)| {
            unix_to_utc(e.dt)
                .and_then(|ts| to_sample(ts, &e.main, &e.weather, &e.wind))
                .ok_or(WeatherError::MalformedSample { index })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let utc_offset = FixedOffset::east_opt(parsed.city.timezone).unwrap_or(Utc.fix());

    Ok(ForecastFeed {
        city_name: parsed.city.name,
        country_code: parsed.city.country,
        utc_offset,
        samples,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, location), fields(location = %location))]
    async fn current(
        &self,
        location: &Location,
        units: Units,
    ) -> Result<CurrentReport, WeatherError> {
        let body = self.get("weather", location, units).await?;
        parse_current(&body)
    }

    #[instrument(skip(self, location), fields(location = %location))]
    async fn forecast(
        &self,
        location: &Location,
        units: Units,
    ) -> Result<ForecastFeed, WeatherError> {
        let body = self.get("forecast", location, units).await?;
        let feed = parse_forecast(&body)?;
        debug!(samples = feed.samples.len(), city = %feed.city_name, "forecast parsed");
        Ok(feed)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(dt: i64, main: &str) -> serde_json::Value {
        json!({
            "dt": dt,
            "main": { "temp": 21.5, "feels_like": 20.9, "humidity": 64, "pressure": 1012 },
            "weather": [{ "id": 500, "main": main, "description": "light rain", "icon": "10d" }],
            "wind": { "speed": 4.1, "deg": 250 },
            "dt_txt": "ignored"
        })
    }

    #[test]
    fn parses_current_response() {
        let body = json!({
            "name": "Delhi",
            "dt": 1_900_000_000,
            "timezone": 19800,
            "main": { "temp": 31.0, "feels_like": 35.2, "humidity": 70 },
            "weather": [{ "main": "Haze", "description": "haze", "icon": "50d" }],
            "wind": { "speed": 2.6 },
            "sys": { "country": "IN" }
        })
        .to_string();

        let report = parse_current(&body).expect("valid payload");
        assert_eq!(report.location_name, "Delhi, IN");
        assert_eq!(report.sample.condition, Condition::Other("Haze".into()));
        assert_eq!(report.sample.humidity, 70);
        assert_eq!(report.sample.icon_code, "50d");
    }

    #[test]
    fn parses_forecast_with_city_offset() {
        let body = json!({
            "cod": "200",
            "city": { "name": "Delhi", "country": "IN", "timezone": 19800 },
            "list": [entry(1_900_000_000, "Rain"), entry(1_900_010_800, "Clear")]
        })
        .to_string();

        let feed = parse_forecast(&body).expect("valid payload");
        assert_eq!(feed.samples.len(), 2);
        assert_eq!(feed.utc_offset.local_minus_utc(), 19800);
        assert_eq!(feed.samples[1].condition, Condition::Clear);
    }

    #[test]
    fn missing_weather_entry_is_malformed_sample() {
        let mut bad = entry(1_900_010_800, "Rain");
        bad["weather"] = json!([]);
        let body = json!({
            "city": { "name": "Delhi", "country": "IN" },
            "list": [entry(1_900_000_000, "Rain"), bad]
        })
        .to_string();

        let err = parse_forecast(&body).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedSample { index: 1 }));
    }

    #[test]
    fn missing_keys_are_malformed_payload() {
        let err = parse_forecast(r#"{"city":{"name":"Delhi"}}"#).unwrap_err();
        assert!(matches!(err, WeatherError::MalformedPayload(_)));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
