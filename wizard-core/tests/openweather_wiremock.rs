//! OpenWeather client against a mock HTTP server.

use chrono::NaiveDate;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};
use wizard_core::{
    Condition, ForecastSettings, ForecastView, Location, OpenWeatherProvider, SelectionPolicy,
    Units, WeatherError, WeatherProvider,
};

fn provider(server: &MockServer) -> OpenWeatherProvider {
    OpenWeatherProvider::with_base_url("TEST_KEY".into(), server.uri())
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 77.2167, "lat": 28.6667 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "main": { "temp": 29.05, "feels_like": 28.1, "humidity": 32, "pressure": 1010 },
        "wind": { "speed": 3.09, "deg": 290 },
        "dt": 1_900_000_000,
        "sys": { "country": "IN", "sunrise": 1_899_980_000, "sunset": 1_900_020_000 },
        "timezone": 19800,
        "name": "Delhi",
        "cod": 200
    })
}

/// 2030-03-01 00:00 UTC.
const DAY_ONE: i64 = 1_898_553_600;

/// Seven days of 3-hourly samples starting at `DAY_ONE`, for a city at UTC+5:30.
fn forecast_body() -> serde_json::Value {
    let list: Vec<serde_json::Value> = (0..7 * 8)
        .map(|step| {
            let dt = DAY_ONE + step * 3 * 3600;
            serde_json::json!({
                "dt": dt,
                "main": { "temp": step as f64, "feels_like": step as f64, "humidity": 50 },
                "weather": [{ "id": 500, "main": "Rain", "description": "light rain", "icon": "10d" }],
                "wind": { "speed": 5.0 }
            })
        })
        .collect();

    serde_json::json!({
        "cod": "200",
        "cnt": list.len(),
        "list": list,
        "city": { "name": "Delhi", "country": "IN", "timezone": 19800 }
    })
}

#[tokio::test]
async fn current_weather_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Delhi,India"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;

    let report = provider(&server)
        .current(&Location::new("Delhi", "India"), Units::Metric)
        .await
        .expect("current weather");

    assert_eq!(report.location_name, "Delhi, IN");
    assert_eq!(report.sample.condition, Condition::Clear);
    assert_eq!(report.sample.description, "clear sky");
    assert_eq!(report.sample.humidity, 32);
}

#[tokio::test]
async fn locality_is_queried_through_parent_city() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Bangalore,India"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&server)
        .await;

    let loc = Location::locality("Koramangala", "Bangalore", "India");
    let result = provider(&server).current(&loc, Units::Imperial).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn unknown_city_is_non_success_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let err = provider(&server)
        .current(&Location::new("Atlantis", "Nowhere"), Units::Metric)
        .await
        .unwrap_err();

    match err {
        WeatherError::NonSuccessStatus { status, body } => {
            assert_eq!(status.as_u16(), 404);
            assert!(body.contains("city not found"));
        }
        other => panic!("expected NonSuccessStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn garbage_body_is_malformed_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .current(&Location::new("Delhi", "India"), Units::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::MalformedPayload(_)));
}

#[tokio::test]
async fn unreachable_host_is_network_failure() {
    // Port 1 on loopback is not listening.
    let provider = OpenWeatherProvider::with_base_url("TEST_KEY".into(), "http://127.0.0.1:1".into());

    let err = provider
        .current(&Location::new("Delhi", "India"), Units::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::NetworkFailure(_)));
}

#[tokio::test]
async fn forecast_reduces_to_today_and_next_five_days() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "Delhi,India"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let feed = provider(&server)
        .forecast(&Location::new("Delhi", "India"), Units::Metric)
        .await
        .expect("forecast");
    assert_eq!(feed.samples.len(), 56);
    assert_eq!(feed.utc_offset.local_minus_utc(), 19800);

    let day_one = NaiveDate::from_ymd_opt(2030, 3, 1).expect("valid date");
    let settings = ForecastSettings { policy: SelectionPolicy::ExactHour, ..Default::default() };
    let view = ForecastView::build(&feed, day_one, &settings).expect("view");

    let today = view.today.expect("today present");
    assert_eq!(today.date, day_one);
    // Exact-noon mode reads the UTC grid, so noon is the fifth 3-hour step of the day.
    assert_eq!(today.sample.temperature, 4.0);

    let dates: Vec<u32> = view.next_days.iter().map(|d| chrono::Datelike::day(&d.date)).collect();
    assert_eq!(dates, vec![2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn forecast_with_empty_list_is_empty_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cod": "200",
            "list": [],
            "city": { "name": "Delhi", "country": "IN", "timezone": 19800 }
        })))
        .mount(&server)
        .await;

    let feed = provider(&server)
        .forecast(&Location::new("Delhi", "India"), Units::Metric)
        .await
        .expect("feed parses");

    let err = ForecastView::build(&feed, NaiveDate::MIN, &ForecastSettings::default()).unwrap_err();
    assert!(matches!(err, WeatherError::EmptyForecast));
}
