use reqwest::StatusCode;
use thiserror::Error;

/// Message shown to the user whatever went wrong with a lookup.
pub const GENERIC_ERROR_MESSAGE: &str =
    "💥 Weather server dodged our request like a ninja! Try again or check your city name.";

/// Failures of a weather lookup, from the HTTP call down to forecast reduction.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("Network failure talking to the weather provider: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Weather provider answered with status {status}: {body}")]
    NonSuccessStatus { status: StatusCode, body: String },

    /// The body was not the JSON shape we expect.
    #[error("Malformed weather payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("Forecast sample #{index} has no weather condition")]
    MalformedSample { index: usize },

    /// No calendar date survived daily selection.
    #[error("Forecast contained no usable daily samples")]
    EmptyForecast,

    #[error(
        "No OpenWeather API key configured.\n\
         Hint: run `weather-wizard configure` or set OPENWEATHER_API_KEY."
    )]
    MissingApiKey,
}

impl WeatherError {
    /// Short, undifferentiated text suitable for the end user.
    ///
    /// A missing key is the one case the user can fix without retrying, so it keeps its
    /// own wording.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::MissingApiKey => self.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}
