//! Interactive browsing session.
//!
//! One client (and so one response cache) lives for the whole session, so
//! revisiting a city within the cache TTL does not hit the network.

use inquire::{InquireError, Select, Text};
use weather_core::{
    Config, ConfiguredLocation, FavoritesStore, FileStore, KeyValueStore, LocationProvider,
    TemperatureUnit, WeatherClient, WeatherError, WeatherSnapshot,
};

use crate::{cli::open_favorites, render};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Search,
    OpenFavorite(String),
    ToggleFavorite { city: String, favorite: bool },
    SwitchUnit(TemperatureUnit),
    UseLocation,
    Quit,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Search => f.write_str("Search for a city"),
            Action::OpenFavorite(city) => write!(f, "Open favorite: {city}"),
            Action::ToggleFavorite { city, favorite: true } => {
                write!(f, "Remove {city} from favorites")
            }
            Action::ToggleFavorite { city, favorite: false } => write!(f, "Add {city} to favorites"),
            Action::SwitchUnit(unit) => write!(f, "Switch to {}", unit.symbol()),
            Action::UseLocation => f.write_str("Use my location"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

#[derive(Debug)]
struct SessionState {
    unit: TemperatureUnit,
    current: Option<WeatherSnapshot>,
}

impl SessionState {
    /// Menu entries for the current state; favorites are listed in order.
    fn actions<S: KeyValueStore>(&self, favorites: &FavoritesStore<S>) -> Vec<Action> {
        let mut actions = vec![Action::Search];

        if let Some(snapshot) = &self.current {
            actions.push(Action::ToggleFavorite {
                city: snapshot.city.clone(),
                favorite: favorites.is_favorite(&snapshot.city),
            });
            actions.push(Action::SwitchUnit(self.unit.toggled()));
        }

        actions.extend(favorites.list().iter().cloned().map(Action::OpenFavorite));
        actions.push(Action::UseLocation);
        actions.push(Action::Quit);
        actions
    }

    /// Replace the current snapshot on success; keep it on failure.
    fn apply(&mut self, result: Result<WeatherSnapshot, WeatherError>) -> bool {
        match result {
            Ok(snapshot) => {
                self.current = Some(snapshot);
                true
            }
            Err(err) => {
                eprintln!("{}", err.user_message());
                false
            }
        }
    }
}

pub async fn run(config: &Config, unit: TemperatureUnit) -> anyhow::Result<()> {
    let client = WeatherClient::from_config(config)?;
    let location = ConfiguredLocation::new(config.home);
    let mut favorites = open_favorites()?;
    let mut state = SessionState { unit, current: None };

    if state.apply(client.weather_by_city(config.default_city()).await) {
        show(&state, &favorites);
    }

    loop {
        let action = match Select::new("What next?", state.actions(&favorites)).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        match action {
            Action::Search => search(&client, &mut state, &favorites).await?,
            Action::OpenFavorite(city) => {
                if state.apply(client.weather_by_city(&city).await) {
                    show(&state, &favorites);
                }
            }
            Action::ToggleFavorite { city, .. } => match favorites.toggle(&city) {
                Ok(_) => show(&state, &favorites),
                Err(err) => eprintln!("{}", err.user_message()),
            },
            Action::SwitchUnit(unit) => {
                state.unit = unit;
                show(&state, &favorites);
            }
            Action::UseLocation => {
                let located = match location.locate().await {
                    Ok(coords) => client.weather_by_coords(coords).await,
                    Err(err) => Err(err),
                };
                if state.apply(located) {
                    show(&state, &favorites);
                }
            }
            Action::Quit => break,
        }
    }

    Ok(())
}

async fn search(
    client: &WeatherClient,
    state: &mut SessionState,
    favorites: &FavoritesStore<FileStore>,
) -> anyhow::Result<()> {
    let query = match Text::new("Search for a city:").prompt_skippable()? {
        Some(query) => query,
        None => return Ok(()),
    };

    let results = match client.search_latest(&query).await {
        Ok(Some(results)) => results,
        Ok(None) => return Ok(()),
        Err(err) => {
            eprintln!("{}", err.user_message());
            return Ok(());
        }
    };

    if results.is_empty() {
        println!("{}", render::search_results(&results));
        return Ok(());
    }

    if let Some(choice) = Select::new("Select a city:", results).prompt_skippable()? {
        if state.apply(client.weather_by_city(&choice.name).await) {
            show(state, favorites);
        }
    }
    Ok(())
}

fn show<S: KeyValueStore>(state: &SessionState, favorites: &FavoritesStore<S>) {
    if let Some(snapshot) = &state.current {
        println!();
        println!("{}", render::card(snapshot, state.unit, favorites.is_favorite(&snapshot.city)));
        println!();
    }
}
