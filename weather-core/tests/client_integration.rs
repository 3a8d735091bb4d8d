//! End-to-end tests for `WeatherClient` over the OpenWeather provider,
//! against a wiremock server.

use std::sync::Arc;

use weather_core::cache::DEFAULT_TTL;
use weather_core::client::ResponseCache;
use weather_core::provider::openweather::OpenWeatherProvider;
use weather_core::{TimeOfDay, WeatherClient, WeatherCondition, WeatherError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> WeatherClient {
    let provider = OpenWeatherProvider::with_base_url("TEST_KEY".into(), server.uri());
    WeatherClient::new(Box::new(provider), Arc::new(ResponseCache::new(DEFAULT_TTL)))
}

fn reykjavik_night() -> serde_json::Value {
    // 2024-01-15 02:00 UTC; sunrise 11:00, sunset 16:00 (offset 0).
    serde_json::json!({
        "name": "Reykjavik",
        "dt": 1_705_284_000,
        "timezone": 0,
        "main": {
            "temp": -3.5,
            "feels_like": -8.6,
            "temp_min": -4.2,
            "temp_max": -2.5,
            "humidity": 86,
            "pressure": 998
        },
        "wind": { "speed": 7.2, "deg": 200 },
        "weather": [{ "main": "Snow", "description": "light snow", "icon": "13n" }],
        "sys": { "country": "IS", "sunrise": 1_705_316_400, "sunset": 1_705_334_400 }
    })
}

#[tokio::test]
async fn repeated_city_lookup_hits_network_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Reykjavik"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reykjavik_night()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = client.weather_by_city("Reykjavik").await.unwrap();
    let second = client.weather_by_city("Reykjavik").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.temp_c, -3);
    assert_eq!(first.feels_like_c, -9);
    assert_eq!(first.temp_max_c, -2);
    assert_eq!(first.condition, WeatherCondition::Snow);
    assert_eq!(first.time_of_day(), TimeOfDay::Night);
    assert_eq!(first.local_time(), "02:00 AM");
}

#[tokio::test]
async fn unknown_city_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(serde_json::json!({"cod": "404", "message": "city not found"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for _ in 0..2 {
        let err = client.weather_by_city("Atlantis").await.unwrap_err();
        assert!(matches!(err, WeatherError::NotFound { .. }));
        assert_eq!(err.user_message(), "City not found. Please try another search.");
    }
}

#[tokio::test]
async fn short_search_never_reaches_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.search_cities("R").await.unwrap().is_empty());
}

#[tokio::test]
async fn search_failure_maps_to_search_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.search_cities("Reykjavik").await.unwrap_err();

    assert!(matches!(err, WeatherError::SearchFailed { .. }));
    assert!(err.to_string().contains("invalid api key"));
}

#[tokio::test]
async fn unreachable_provider_error_hides_api_key() {
    let provider =
        OpenWeatherProvider::with_base_url("TEST_KEY".into(), "http://127.0.0.1:1".into());
    let client = WeatherClient::new(Box::new(provider), Arc::new(ResponseCache::new(DEFAULT_TTL)));

    let search = client.search_cities("Paris").await.unwrap_err();
    let lookup = client.weather_by_city("Paris").await.unwrap_err();

    assert!(matches!(search, WeatherError::SearchFailed { .. }));
    assert!(matches!(lookup, WeatherError::NotFound { .. }));
    for err in [search, lookup] {
        assert!(!err.to_string().contains("TEST_KEY"), "api key leaked: {err}");
        assert!(!format!("{err:?}").contains("TEST_KEY"));
    }
}
