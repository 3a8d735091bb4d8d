use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    condition::WeatherCondition,
    model::{CitySearchResult, Coordinates, WeatherSnapshot},
    units::round_half_up,
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        what: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }

    async fn fetch_current(&self, params: &[(&str, String)]) -> Result<WeatherSnapshot> {
        let parsed: OwCurrentResponse =
            self.get_json("/data/2.5/weather", params, "current weather").await?;
        parsed.into_snapshot()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
    pressure: f64,
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
    #[serde(default)]
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    timezone: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot> {
        let weather = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("OpenWeather response contained no condition data"))?;

        let main = weather.main.to_lowercase();

        Ok(WeatherSnapshot {
            city: self.name,
            country: self.sys.country,
            temp_c: round_half_up(self.main.temp) as i32,
            feels_like_c: round_half_up(self.main.feels_like) as i32,
            temp_min_c: round_half_up(self.main.temp_min) as i32,
            temp_max_c: round_half_up(self.main.temp_max) as i32,
            humidity_pct: self.main.humidity,
            pressure_hpa: round_half_up(self.main.pressure).max(0) as u32,
            wind_speed_mps: self.wind.speed,
            wind_deg: self.wind.deg,
            description: weather.description,
            condition: WeatherCondition::classify(&main),
            main,
            icon: weather.icon,
            utc_offset_secs: self.timezone,
            sunrise: self.sys.sunrise,
            sunset: self.sys.sunset,
            observed_at: self.dt,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    name: String,
    #[serde(default)]
    country: String,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

impl From<OwGeoEntry> for CitySearchResult {
    fn from(entry: OwGeoEntry) -> Self {
        Self {
            name: entry.name,
            country: entry.country,
            state: entry.state,
            lat: entry.lat,
            lon: entry.lon,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_by_city(&self, city: &str) -> Result<WeatherSnapshot> {
        tracing::info!(city, "requesting current weather by city");
        self.fetch_current(&[("q", city.to_string()), ("units", "metric".to_string())])
            .await
    }

    async fn current_by_coords(&self, coords: Coordinates) -> Result<WeatherSnapshot> {
        tracing::info!(lat = coords.lat, lon = coords.lon, "requesting current weather by coordinates");
        self.fetch_current(&[
            ("lat", coords.lat.to_string()),
            ("lon", coords.lon.to_string()),
            ("units", "metric".to_string()),
        ])
        .await
    }

    async fn search_cities(&self, query: &str, limit: usize) -> Result<Vec<CitySearchResult>> {
        tracing::info!(query, limit, "searching cities");
        let entries: Vec<OwGeoEntry> = self
            .get_json(
                "/geo/1.0/direct",
                &[("q", query.to_string()), ("limit", limit.to_string())],
                "geocoding",
            )
            .await?;

        Ok(entries.into_iter().map(CitySearchResult::from).collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
