//! Error kinds surfaced by weather operations.

use thiserror::Error;

use crate::model::Coordinates;

/// What a failed weather lookup was asking for.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupTarget {
    City(String),
    Coordinates(Coordinates),
}

impl std::fmt::Display for LookupTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupTarget::City(city) => write!(f, "'{city}'"),
            LookupTarget::Coordinates(coords) => write!(f, "({coords})"),
        }
    }
}

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Weather not found for {target}: {reason}")]
    NotFound { target: LookupTarget, reason: String },

    #[error("City search failed for '{query}': {reason}")]
    SearchFailed { query: String, reason: String },

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Persisted favorites are corrupt: {0}")]
    PersistStateCorrupt(String),

    #[error("Failed to persist favorites: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    /// Single message shown to the user for a failed operation.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { target: LookupTarget::City(_), .. } => {
                "City not found. Please try another search.".to_string()
            }
            Self::NotFound { target: LookupTarget::Coordinates(_), .. } => {
                "Failed to fetch weather for your location".to_string()
            }
            Self::SearchFailed { .. } => "Failed to search cities".to_string(),
            Self::LocationUnavailable(_) => "Unable to retrieve your location".to_string(),
            Self::PersistStateCorrupt(_) => "Saved favorites were unreadable and have been reset".to_string(),
            Self::Storage(_) => "Failed to save favorites".to_string(),
            Self::Config(msg) => msg.clone(),
        }
    }
}
