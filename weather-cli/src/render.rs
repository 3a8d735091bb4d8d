//! Text and JSON renderings of a weather card.

use serde_json::json;
use weather_core::{CitySearchResult, TemperatureUnit, WeatherSnapshot, units::wind_direction};

const FAVORITE_MARK: &str = "♥";
const NOT_FAVORITE_MARK: &str = "♡";

pub fn card(snapshot: &WeatherSnapshot, unit: TemperatureUnit, favorite: bool) -> String {
    let time_of_day = snapshot.time_of_day();
    let theme = snapshot.theme();
    let layers = theme.layers.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
    let mark = if favorite { FAVORITE_MARK } else { NOT_FAVORITE_MARK };

    let mut out = String::new();
    out.push_str(&format!("{}, {} {}\n", snapshot.city, snapshot.country, mark));
    out.push_str(&format!("{} · {}\n", snapshot.local_date(), snapshot.local_time()));
    out.push_str(&format!("{}  {}\n", unit.format(snapshot.temp_c), snapshot.description));
    out.push_str(&format!(
        "Feels like {}   Min / Max {} / {}\n",
        unit.format(snapshot.feels_like_c),
        unit.convert(snapshot.temp_min_c),
        unit.format(snapshot.temp_max_c),
    ));
    out.push_str(&format!(
        "Humidity {}%   Wind {} m/s {}   Pressure {} hPa\n",
        snapshot.humidity_pct,
        snapshot.wind_speed_mps,
        wind_direction(snapshot.wind_deg),
        snapshot.pressure_hpa,
    ));
    out.push_str(&format!(
        "Condition {}   Theme {} ({}): {}",
        snapshot.main,
        theme.background.as_str(),
        time_of_day,
        if layers.is_empty() { "-".to_string() } else { layers },
    ));
    out
}

pub fn card_json(
    snapshot: &WeatherSnapshot,
    unit: TemperatureUnit,
    favorite: bool,
) -> serde_json::Value {
    json!({
        "snapshot": snapshot,
        "unit": unit,
        "favorite": favorite,
        "time_of_day": snapshot.time_of_day(),
        "theme": snapshot.theme(),
        "display": {
            "temp": unit.format(snapshot.temp_c),
            "feels_like": unit.format(snapshot.feels_like_c),
            "temp_min": unit.format(snapshot.temp_min_c),
            "temp_max": unit.format(snapshot.temp_max_c),
            "wind": format!("{} m/s {}", snapshot.wind_speed_mps, wind_direction(snapshot.wind_deg)),
            "local_date": snapshot.local_date(),
            "local_time": snapshot.local_time(),
        },
    })
}

pub fn search_results(results: &[CitySearchResult]) -> String {
    if results.is_empty() {
        return "No cities found. Try a different search term.".to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, city)| format!("{}. {}  ({:.2}, {:.2})", i + 1, city, city.lat, city.lon))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn favorites(cities: &[String]) -> String {
    if cities.is_empty() {
        return "No favorite cities yet.".to_string();
    }

    cities.iter().map(|c| format!("{FAVORITE_MARK} {c}")).collect::<Vec<_>>().join("\n")
}
