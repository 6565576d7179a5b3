//! Core library for the `meteo` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - The Open-Meteo forecast provider and place geocoding
//! - Shared location state, the search header logic and geolocation
//! - The three forecast screens and their chart series
//!
//! It is used by `meteo-cli`, but can also be reused by other front ends.

pub mod chart;
pub mod config;
pub mod error;
pub mod geocode;
pub mod locate;
pub mod model;
pub mod provider;
pub mod screen;
pub mod search;
pub mod state;
pub mod weather_code;

pub use config::{Config, ThemePreference};
pub use error::WeatherError;
pub use geocode::{Geocoder, GeocodingClient};
pub use locate::{FixedPosition, PositionSource, locate};
pub use model::{CurrentWeather, DailyWeather, HourlyWeather, Place};
pub use provider::{OpenMeteoProvider, WeatherProvider};
pub use screen::{Forecast, Tab, View};
pub use search::{Debounce, SearchBox};
pub use state::SearchState;
