use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit system passed to the provider as the `units` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial]
    }

    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn speed_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// A selectable place in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub city: String,
    pub country: String,
    pub label: String,
    /// City actually sent to the provider, when it differs from `city`.
    pub query_city: Option<String>,
}

impl Location {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        let city = city.into();
        let country = country.into();
        let label = format!("{city}, {country}");
        Self { city, country, label, query_city: None }
    }

    /// A neighbourhood shown under its own name but looked up through `parent`.
    pub fn locality(
        area: impl Into<String>,
        parent: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        let mut loc = Self::new(area, country);
        loc.query_city = Some(parent.into());
        loc
    }

    /// Value of the `q` query parameter.
    pub fn query(&self) -> String {
        let city = self.query_city.as_deref().unwrap_or(&self.city);
        if self.country.is_empty() {
            city.to_string()
        } else {
            format!("{city},{}", self.country)
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Coarse provider category, `weather[0].main` in OpenWeather payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Other(String),
}

impl Condition {
    pub fn parse(label: &str) -> Self {
        match label {
            "Clear" => Condition::Clear,
            "Clouds" => Condition::Clouds,
            "Rain" => Condition::Rain,
            "Drizzle" => Condition::Drizzle,
            "Thunderstorm" => Condition::Thunderstorm,
            "Snow" => Condition::Snow,
            "Mist" => Condition::Mist,
            other => Condition::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Condition::Clear => "Clear",
            Condition::Clouds => "Clouds",
            Condition::Rain => "Rain",
            Condition::Drizzle => "Drizzle",
            Condition::Thunderstorm => "Thunderstorm",
            Condition::Snow => "Snow",
            Condition::Mist => "Mist",
            Condition::Other(label) => label,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One reading, either the current observation or a 3-hour forecast step.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    pub timestamp: DateTime<Utc>,
    pub condition: Condition,
    pub description: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub icon_code: String,
}

/// Parsed current-weather response.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentReport {
    pub location_name: String,
    pub sample: WeatherSample,
}

/// Parsed forecast response.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastFeed {
    pub city_name: String,
    pub country_code: String,
    /// Shift of the forecast location from UTC; calendar dates are taken in this offset.
    pub utc_offset: FixedOffset,
    pub samples: Vec<WeatherSample>,
}

/// Representative sample for one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub sample: WeatherSample,
}
