//! Visual theme for a weather card, picked from condition and time of day.

use serde::Serialize;

use crate::condition::{TimeOfDay, WeatherCondition};

pub const RAINDROP_COUNT: u16 = 50;
pub const SNOWFLAKE_COUNT: u16 = 40;
pub const STAR_COUNT: u16 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Background {
    Thunderstorm,
    Rain,
    Snow,
    Mist,
    CloudsDay,
    CloudsNight,
    ClearDay,
    ClearNight,
}

impl Background {
    pub fn as_str(&self) -> &'static str {
        match self {
            Background::Thunderstorm => "thunderstorm",
            Background::Rain => "rain",
            Background::Snow => "snow",
            Background::Mist => "mist",
            Background::CloudsDay => "clouds-day",
            Background::CloudsNight => "clouds-night",
            Background::ClearDay => "clear-day",
            Background::ClearNight => "clear-night",
        }
    }
}

/// One animated layer drawn on top of the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Layer {
    Stars { count: u16 },
    Moon,
    Sun,
    /// Drifting clouds; `opacity` in percent.
    Clouds { opacity: u8 },
    Rain { drops: u16 },
    Lightning,
    Snow { flakes: u16 },
    Mist,
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layer::Stars { count } => write!(f, "stars x{count}"),
            Layer::Moon => f.write_str("moon"),
            Layer::Sun => f.write_str("sun"),
            Layer::Clouds { opacity } if *opacity == 100 => f.write_str("clouds"),
            Layer::Clouds { opacity } => write!(f, "clouds {opacity}%"),
            Layer::Rain { drops } => write!(f, "rain x{drops}"),
            Layer::Lightning => f.write_str("lightning"),
            Layer::Snow { flakes } => write!(f, "snow x{flakes}"),
            Layer::Mist => f.write_str("mist"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub background: Background,
    pub layers: Vec<Layer>,
}

impl Theme {
    pub fn select(condition: WeatherCondition, time_of_day: TimeOfDay) -> Self {
        use WeatherCondition as C;

        let night = time_of_day == TimeOfDay::Night;

        let background = match condition {
            C::Thunderstorm => Background::Thunderstorm,
            C::Rain | C::Drizzle => Background::Rain,
            C::Snow => Background::Snow,
            C::Mist | C::Fog => Background::Mist,
            C::Clouds if night => Background::CloudsNight,
            C::Clouds => Background::CloudsDay,
            C::Clear if night => Background::ClearNight,
            C::Clear => Background::ClearDay,
        };

        let mut layers = Vec::new();

        if night {
            layers.push(Layer::Stars { count: STAR_COUNT });
            layers.push(Layer::Moon);
        }
        if condition == C::Clear && !night {
            layers.push(Layer::Sun);
        }
        if condition == C::Clouds || (condition == C::Clear && time_of_day == TimeOfDay::Day) {
            layers.push(Layer::Clouds { opacity: 100 });
        }

        match condition {
            C::Rain | C::Drizzle => {
                layers.push(Layer::Clouds { opacity: 80 });
                layers.push(Layer::Rain { drops: RAINDROP_COUNT });
            }
            C::Thunderstorm => {
                layers.push(Layer::Clouds { opacity: 90 });
                layers.push(Layer::Rain { drops: RAINDROP_COUNT });
                layers.push(Layer::Lightning);
            }
            C::Snow => {
                layers.push(Layer::Clouds { opacity: 70 });
                layers.push(Layer::Snow { flakes: SNOWFLAKE_COUNT });
            }
            C::Mist | C::Fog => {
                layers.push(Layer::Mist);
                layers.push(Layer::Clouds { opacity: 50 });
            }
            C::Clear | C::Clouds => {}
        }

        Self { background, layers }
    }
}
