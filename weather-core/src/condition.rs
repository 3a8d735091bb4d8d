//! Classification of provider observations into the small set of states
//! used to pick a visual theme.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;

/// Canonical weather condition, independent of provider vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    #[default]
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Drizzle,
    Mist,
    Fog,
}

impl WeatherCondition {
    /// Classify a raw provider condition (`weather[0].main`), case-insensitively.
    ///
    /// Unrecognized values fall back to [`WeatherCondition::Clear`].
    pub fn classify(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "snow" => Self::Snow,
            "thunderstorm" => Self::Thunderstorm,
            "drizzle" => Self::Drizzle,
            "mist" | "smoke" | "haze" | "dust" | "sand" | "ash" => Self::Mist,
            "fog" => Self::Fog,
            _ => Self::Clear,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Thunderstorm => "thunderstorm",
            Self::Drizzle => "drizzle",
            Self::Mist => "mist",
            Self::Fog => "fog",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day phase at the observed location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Day,
    Evening,
    Night,
}

impl TimeOfDay {
    /// Bucket an observation into a day phase using whole local hours.
    ///
    /// All timestamps are epoch seconds; `utc_offset_secs` is the location's
    /// offset from UTC. Branches are checked in order and `Night` is the
    /// catch-all, so degenerate sun events (polar day/night) still classify.
    pub fn classify(observed_at: i64, utc_offset_secs: i64, sunrise: i64, sunset: i64) -> Self {
        let hour = local_hour(observed_at, utc_offset_secs);
        let sunrise_hour = local_hour(sunrise, utc_offset_secs);
        let sunset_hour = local_hour(sunset, utc_offset_secs);

        if hour >= sunrise_hour - 1 && hour < sunrise_hour + 2 {
            Self::Morning
        } else if hour >= sunrise_hour + 2 && hour < sunset_hour - 2 {
            Self::Day
        } else if hour >= sunset_hour - 2 && hour < sunset_hour + 1 {
            Self::Evening
        } else {
            Self::Night
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Day => "day",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hour of day (0-23) of `timestamp` shifted by `utc_offset_secs`, read as UTC.
pub fn local_hour(timestamp: i64, utc_offset_secs: i64) -> i32 {
    ((timestamp + utc_offset_secs).rem_euclid(SECONDS_PER_DAY) / SECONDS_PER_HOUR) as i32
}

/// Local wall-clock time at the observed location, e.g. `07:05 PM`.
pub fn local_time(timestamp: i64, utc_offset_secs: i64) -> String {
    format_shifted(timestamp, utc_offset_secs, "%I:%M %p")
}

/// Local calendar date at the observed location, e.g. `Monday, January 5, 2026`.
pub fn local_date(timestamp: i64, utc_offset_secs: i64) -> String {
    format_shifted(timestamp, utc_offset_secs, "%A, %B %-d, %Y")
}

fn format_shifted(timestamp: i64, utc_offset_secs: i64, pattern: &str) -> String {
    DateTime::from_timestamp(timestamp + utc_offset_secs, 0)
        .map(|dt| dt.format(pattern).to_string())
        .unwrap_or_else(|| "--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-06-01T00:00:00Z
    const MIDNIGHT: i64 = 1_717_200_000;

    fn at(hour: i64) -> i64 {
        MIDNIGHT + hour * SECONDS_PER_HOUR
    }

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(WeatherCondition::classify("RAIN"), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::classify("Clouds"), WeatherCondition::Clouds);
        assert_eq!(WeatherCondition::classify("thunderStorm"), WeatherCondition::Thunderstorm);
    }

    #[test]
    fn classify_folds_particulates_into_mist() {
        for raw in ["Mist", "Smoke", "Haze", "Dust", "Sand", "Ash"] {
            assert_eq!(WeatherCondition::classify(raw), WeatherCondition::Mist, "{raw}");
        }
        assert_eq!(WeatherCondition::classify("Fog"), WeatherCondition::Fog);
    }

    #[test]
    fn classify_unknown_falls_back_to_clear() {
        assert_eq!(WeatherCondition::classify("unknown-code"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::classify("Squall"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::classify(""), WeatherCondition::Clear);
    }

    #[test]
    fn time_of_day_buckets() {
        let (sunrise, sunset) = (at(6), at(18));

        assert_eq!(TimeOfDay::classify(at(7), 0, sunrise, sunset), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::classify(at(12), 0, sunrise, sunset), TimeOfDay::Day);
        assert_eq!(TimeOfDay::classify(at(17), 0, sunrise, sunset), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::classify(at(2), 0, sunrise, sunset), TimeOfDay::Night);
    }

    #[test]
    fn time_of_day_boundaries_are_whole_hours() {
        let (sunrise, sunset) = (at(6), at(18));

        assert_eq!(TimeOfDay::classify(at(5), 0, sunrise, sunset), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::classify(at(4) + 3_599, 0, sunrise, sunset), TimeOfDay::Night);
        assert_eq!(TimeOfDay::classify(at(8), 0, sunrise, sunset), TimeOfDay::Day);
        assert_eq!(TimeOfDay::classify(at(16), 0, sunrise, sunset), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::classify(at(18) + 3_599, 0, sunrise, sunset), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::classify(at(19), 0, sunrise, sunset), TimeOfDay::Night);
    }

    #[test]
    fn time_of_day_applies_offset() {
        // Sunrise 21:00Z / sunset 09:00Z is 06:00 / 18:00 at UTC+9.
        let offset = 9 * SECONDS_PER_HOUR;
        let sunrise = at(21) - SECONDS_PER_DAY;
        let sunset = at(9);

        assert_eq!(TimeOfDay::classify(at(3), offset, sunrise, sunset), TimeOfDay::Day);
        assert_eq!(TimeOfDay::classify(at(13), offset, sunrise, sunset), TimeOfDay::Night);
    }

    #[test]
    fn degenerate_sun_events_take_first_branch() {
        // Sunrise and sunset in the same hour: morning wins over evening.
        let sun = at(12);
        assert_eq!(TimeOfDay::classify(at(12), 0, sun, sun), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::classify(at(14), 0, sun, sun), TimeOfDay::Night);
    }

    #[test]
    fn local_hour_handles_negative_offsets() {
        assert_eq!(local_hour(MIDNIGHT, -5 * SECONDS_PER_HOUR), 19);
        assert_eq!(local_hour(MIDNIGHT, 0), 0);
    }

    #[test]
    fn local_clock_formatting() {
        let ts = at(19) + 5 * 60;
        assert_eq!(local_time(ts, 0), "07:05 PM");
        assert_eq!(local_date(ts, 0), "Saturday, June 1, 2024");
        assert_eq!(local_date(ts, 6 * SECONDS_PER_HOUR), "Sunday, June 2, 2024");
    }
}
