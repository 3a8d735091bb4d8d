use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Password, Select, Text};
use weather_core::{
    Config, ConfiguredLocation, Coordinates, FavoritesStore, FileStore, LocationProvider,
    TemperatureUnit, WeatherClient, WeatherError, WeatherSnapshot,
};

use crate::{render, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI with themed cards and favorite cities")]
pub struct Cli {
    /// Display unit, "celsius" or "fahrenheit". Defaults to the configured unit.
    #[arg(long, global = true)]
    pub unit: Option<String>,

    /// Print JSON instead of a text card.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the API key, default city, unit and home location.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "Tokyo" or "London,GB".
        city: String,
    },

    /// Show current weather at a latitude/longitude.
    Coords {
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(allow_negative_numbers = true)]
        lon: f64,
    },

    /// Show current weather at your configured home location.
    Here,

    /// Search for cities matching a query.
    Search {
        query: String,
    },

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },

    /// Browse interactively: search, open favorites, switch units.
    Session,
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// List favorites in the order they were added.
    List,
    Add { city: String },
    Remove { city: String },
    /// Add the city if absent, remove it if present.
    Toggle { city: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        let unit = match &self.unit {
            Some(raw) => raw.parse::<TemperatureUnit>()?,
            None => config.unit(),
        };
        tracing::debug!(command = ?self.command, %unit, "running command");

        match self.command {
            Command::Configure => configure(&mut config)?,
            Command::Show { city } => {
                let client = WeatherClient::from_config(&config)?;
                let snapshot = client.weather_by_city(&city).await.map_err(user_facing)?;
                print_snapshot(&snapshot, unit, self.json)?;
            }
            Command::Coords { lat, lon } => {
                let client = WeatherClient::from_config(&config)?;
                let snapshot = client
                    .weather_by_coords(Coordinates::new(lat, lon))
                    .await
                    .map_err(user_facing)?;
                print_snapshot(&snapshot, unit, self.json)?;
            }
            Command::Here => {
                let coords =
                    ConfiguredLocation::new(config.home).locate().await.map_err(user_facing)?;
                let client = WeatherClient::from_config(&config)?;
                let snapshot = client.weather_by_coords(coords).await.map_err(user_facing)?;
                print_snapshot(&snapshot, unit, self.json)?;
            }
            Command::Search { query } => {
                let client = WeatherClient::from_config(&config)?;
                let results = client.search_cities(&query).await.map_err(user_facing)?;
                if self.json {
                    println!("{}", serde_json::to_string_pretty(&results)?);
                } else {
                    println!("{}", render::search_results(&results));
                }
            }
            Command::Favorites { action } => {
                let mut favorites = open_favorites()?;
                match action {
                    FavoritesAction::List => {}
                    FavoritesAction::Add { city } => {
                        if !favorites.add(&city).map_err(user_facing)? {
                            println!("{city} is already a favorite.");
                        }
                    }
                    FavoritesAction::Remove { city } => {
                        if !favorites.remove(&city).map_err(user_facing)? {
                            println!("{city} was not a favorite.");
                        }
                    }
                    FavoritesAction::Toggle { city } => {
                        let now_favorite = favorites.toggle(&city).map_err(user_facing)?;
                        let verb = if now_favorite { "Added" } else { "Removed" };
                        println!("{verb} {city}.");
                    }
                }
                if self.json {
                    println!("{}", serde_json::to_string_pretty(favorites.list())?);
                } else {
                    println!("{}", render::favorites(favorites.list()));
                }
            }
            Command::Session => session::run(&config, unit).await?,
        }

        Ok(())
    }
}

pub fn open_favorites() -> anyhow::Result<FavoritesStore<FileStore>> {
    let dir = Config::favorites_dir()?;
    Ok(FavoritesStore::load(FileStore::new(dir)))
}

/// Lead with the user-facing message; keep the details as the cause.
pub fn user_facing(err: WeatherError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

fn print_snapshot(
    snapshot: &WeatherSnapshot,
    unit: TemperatureUnit,
    json: bool,
) -> anyhow::Result<()> {
    let favorite = open_favorites()?.is_favorite(&snapshot.city);

    if json {
        let value = render::card_json(snapshot, unit, favorite);
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", render::card(snapshot, unit, favorite));
    }
    Ok(())
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key);
    }

    let default_city = Text::new("Default city:").with_default(config.default_city()).prompt()?;
    config.default_city = Some(default_city.trim().to_string()).filter(|c| !c.is_empty());

    let unit = Select::new("Temperature unit:", TemperatureUnit::all().to_vec())
        .with_starting_cursor(if config.unit() == TemperatureUnit::Celsius { 0 } else { 1 })
        .prompt()?;
    config.unit = Some(unit);

    let set_home = Confirm::new("Set a home location for `weather here`?")
        .with_default(config.home.is_some())
        .prompt()?;
    if set_home {
        let lat = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a number")
            .prompt()?;
        let lon = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a number")
            .prompt()?;

        let home = Coordinates::new(lat, lon);
        if !home.is_valid() {
            anyhow::bail!("Home location ({home}) is out of range");
        }
        config.home = Some(home);
    }

    config.save()?;
    let path = Config::config_file_path()?;
    println!("Configuration saved to {}", path.display());

    config.api_key().context("Configuration saved, but lookups will fail")?;
    Ok(())
}
