use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::WeatherError, model::Coordinates};

/// Source of the user's current position.
#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, WeatherError>;
}

/// Reports a fixed home location from configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    home: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(home: Option<Coordinates>) -> Self {
        Self { home }
    }
}

#[async_trait]
impl LocationProvider for ConfiguredLocation {
    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        let home = self.home.ok_or_else(|| {
            WeatherError::LocationUnavailable(
                "no home location configured.\n\
                 Hint: run `weather configure` and enter a latitude and longitude."
                    .to_string(),
            )
        })?;

        if !home.is_valid() {
            return Err(WeatherError::LocationUnavailable(format!(
                "configured home location ({home}) is out of range"
            )));
        }

        Ok(home)
    }
}
