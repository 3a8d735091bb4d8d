//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider and a cache-aware client on top of it
//! - Condition and time-of-day classification, and the card theme they select
//! - Unit conversion helpers
//! - A persisted favorites list
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod cache;
pub mod client;
pub mod condition;
pub mod config;
pub mod error;
pub mod favorites;
pub mod location;
pub mod model;
pub mod provider;
pub mod theme;
pub mod units;

pub use cache::TtlCache;
pub use client::WeatherClient;
pub use condition::{TimeOfDay, WeatherCondition};
pub use config::Config;
pub use error::{LookupTarget, WeatherError};
pub use favorites::{FavoritesStore, FileStore, KeyValueStore, MemoryStore};
pub use location::{ConfiguredLocation, LocationProvider};
pub use model::{CitySearchResult, Coordinates, WeatherSnapshot};
pub use provider::WeatherProvider;
pub use theme::Theme;
pub use units::TemperatureUnit;
