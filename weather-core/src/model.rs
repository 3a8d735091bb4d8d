use serde::{Deserialize, Serialize};

use crate::condition::{self, TimeOfDay, WeatherCondition};
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Normalized current conditions for one location. Temperatures are whole
/// degrees Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: String,
    pub temp_c: i32,
    pub feels_like_c: i32,
    pub temp_min_c: i32,
    pub temp_max_c: i32,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed_mps: f64,
    pub wind_deg: f64,
    pub description: String,
    /// Provider condition group, lowercased (e.g. `rain`, `haze`).
    pub main: String,
    pub condition: WeatherCondition,
    pub icon: String,
    pub utc_offset_secs: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub observed_at: i64,
}

impl WeatherSnapshot {
    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::classify(self.observed_at, self.utc_offset_secs, self.sunrise, self.sunset)
    }

    pub fn theme(&self) -> Theme {
        Theme::select(self.condition, self.time_of_day())
    }

    pub fn local_time(&self) -> String {
        condition::local_time(self.observed_at, self.utc_offset_secs)
    }

    pub fn local_date(&self) -> String {
        condition::local_date(self.observed_at, self.utc_offset_secs)
    }
}

/// A geocoding match. Lists keep the provider's relevance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySearchResult {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl CitySearchResult {
    /// `Springfield, Illinois` when a state is known, otherwise just the name.
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) if !state.is_empty() => format!("{}, {}", self.name, state),
            _ => self.name.clone(),
        }
    }
}

impl std::fmt::Display for CitySearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.label(), self.country)
    }
}
