use crate::{
    Config,
    model::{CitySearchResult, Coordinates, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Upstream source of current conditions and geocoding matches.
///
/// Implementations return normalized values; caching and error
/// classification happen in [`crate::client::WeatherClient`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_by_city(&self, city: &str) -> anyhow::Result<WeatherSnapshot>;

    async fn current_by_coords(&self, coords: Coordinates) -> anyhow::Result<WeatherSnapshot>;

    async fn search_cities(&self, query: &str, limit: usize)
    -> anyhow::Result<Vec<CitySearchResult>>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    let provider = OpenWeatherProvider::with_base_url(api_key, config.base_url().to_owned());
    Ok(Box::new(provider))
}
