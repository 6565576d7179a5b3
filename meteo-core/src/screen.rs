use std::fmt;

use crate::{
    model::{CurrentWeather, DailyWeather, HourlyWeather, Place},
    provider::WeatherProvider,
    state::SearchState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Currently,
    Today,
    Weekly,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Currently => "Currently",
            Tab::Today => "Today",
            Tab::Weekly => "Weekly",
        }
    }

    pub const fn all() -> &'static [Tab] {
        &[Tab::Currently, Tab::Today, Tab::Weekly]
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// What one screen displays after a successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Forecast {
    Current(CurrentWeather),
    Today(Vec<HourlyWeather>),
    Weekly(Vec<DailyWeather>),
}

impl Forecast {
    pub fn tab(&self) -> Tab {
        match self {
            Forecast::Current(_) => Tab::Currently,
            Forecast::Today(_) => Tab::Today,
            Forecast::Weekly(_) => Tab::Weekly,
        }
    }
}

/// Render branch of a screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Loading,
    /// Nothing selected yet.
    Empty,
    Error(&'static str),
    Data { place: &'a Place, forecast: &'a Forecast },
}

impl<'a> View<'a> {
    /// Errors win over data; data is only shown alongside a selected place.
    pub fn of(state: &'a SearchState, loading: bool, forecast: Option<&'a Forecast>) -> Self {
        if loading {
            return View::Loading;
        }
        if let Some(message) = state.error_message() {
            return View::Error(message);
        }
        match (state.location(), forecast) {
            (Some(place), Some(forecast)) => View::Data { place, forecast },
            _ => View::Empty,
        }
    }
}

/// Fetches the data for `tab` at the selected place.
///
/// Does nothing without a selection. The error is cleared before the request
/// and replaced by the generic message if it fails.
pub async fn load<P: WeatherProvider + ?Sized>(
    tab: Tab,
    provider: &P,
    state: &mut SearchState,
) -> Option<Forecast> {
    let place = state.location()?.clone();
    state.clear_error();

    let outcome = match tab {
        Tab::Currently => provider.current(&place).await.map(Forecast::Current),
        Tab::Today => provider.hourly(&place).await.map(Forecast::Today),
        Tab::Weekly => provider.daily(&place).await.map(Forecast::Weekly),
    };

    match outcome {
        Ok(forecast) => Some(forecast),
        Err(err) => {
            tracing::warn!(tab = %tab, place = %place.label(), error = %err, "forecast fetch failed");
            state.set_error(err.user_message());
            None
        }
    }
}
