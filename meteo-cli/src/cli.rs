use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use meteo_core::{
    Config, FixedPosition, GeocodingClient, SearchBox, SearchState, Tab, ThemePreference, View,
    WeatherProvider, locate, provider::provider_from_config, screen,
};

use crate::{configure, render, session, theme::Theme};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "Current, hourly and weekly weather for any place")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Colour scheme: auto, light or dark. Overrides the config file.
    #[arg(long, global = true, value_parser = parse_theme)]
    pub theme: Option<ThemePreference>,

    /// More log output on stderr (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive search with live suggestions (the default).
    Search,

    /// Show the forecast for the place named exactly QUERY.
    Show {
        /// Place name, e.g. "Lisbon".
        query: String,

        /// Only this screen: currently, today or weekly.
        #[arg(long, value_parser = parse_tab)]
        tab: Option<Tab>,
    },

    /// Show the forecast at your position.
    Here {
        /// Latitude; defaults to the configured position.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude; defaults to the configured position.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Only this screen: currently, today or weekly.
        #[arg(long, value_parser = parse_tab)]
        tab: Option<Tab>,
    },

    /// Set theme and geolocation preferences.
    Configure,
}

fn parse_theme(value: &str) -> Result<ThemePreference, String> {
    value.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn parse_tab(value: &str) -> Result<Tab, String> {
    Tab::all()
        .iter()
        .copied()
        .find(|tab| tab.title().eq_ignore_ascii_case(value))
        .ok_or_else(|| format!("Unknown tab '{value}'. Supported tabs: currently, today, weekly."))
}

/// Everything a command needs: settings, services and the shared location state.
#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub provider: Box<dyn WeatherProvider>,
    pub geocoder: GeocodingClient,
    pub state: SearchState,
}

impl App {
    pub fn new(config: Config, theme_override: Option<ThemePreference>) -> anyhow::Result<Self> {
        let theme = Theme::resolve(theme_override.unwrap_or(config.theme));
        let provider = provider_from_config(&config).context("Failed to set up forecast client")?;
        let geocoder =
            GeocodingClient::from_config(&config).context("Failed to set up geocoding client")?;

        Ok(Self {
            config,
            theme,
            provider,
            geocoder,
            state: SearchState::new(),
        })
    }

    /// Tab bar with `active` highlighted.
    pub fn tab_bar(&self, active: Tab) -> String {
        Tab::all()
            .iter()
            .map(|tab| {
                if *tab == active {
                    format!("{}", self.theme.accent(tab.title()))
                } else {
                    format!("{}", self.theme.muted(tab.title()))
                }
            })
            .collect::<Vec<_>>()
            .join("  |  ")
    }

    /// Fetches and prints one screen.
    pub async fn show_tab(&mut self, tab: Tab, loading: bool) {
        println!("{}\n", self.tab_bar(tab));
        if loading && self.state.location().is_some() {
            eprint!("{}", render::view(&self.theme, View::Loading));
        }
        let forecast = screen::load(tab, self.provider.as_ref(), &mut self.state).await;
        print!("{}", render::view(&self.theme, View::of(&self.state, false, forecast.as_ref())));
        println!();
    }

    pub async fn show_tabs(&mut self, only: Option<Tab>) {
        match only {
            Some(tab) => self.show_tab(tab, false).await,
            None => {
                for tab in Tab::all() {
                    self.show_tab(*tab, false).await;
                }
            }
        }
    }

    pub async fn locate(&mut self, position: &FixedPosition) -> bool {
        locate(position, &self.geocoder, &mut self.state).await.is_ok()
    }

    pub fn print_error(&self) {
        if let Some(message) = self.state.error_message() {
            eprint!("{}", render::view(&self.theme, View::Error(message)));
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        let mut app = App::new(config, self.theme)?;

        match self.command.unwrap_or(Command::Search) {
            Command::Configure => configure::run(&app.config, self.config.as_deref())?,
            Command::Search => session::run(&mut app).await?,
            Command::Show { query, tab } => {
                let mut search = SearchBox::new();
                let count = app.config.search.result_count;
                search.refresh(&query, &app.geocoder, count, &mut app.state).await;

                if app.state.error_message().is_none() && search.submit(&mut app.state).is_ok() {
                    app.show_tabs(tab).await;
                } else {
                    app.print_error();
                }
            }
            Command::Here { lat, lon, tab } => {
                let position = match (lat, lon) {
                    (Some(lat), Some(lon)) => FixedPosition::explicit(lat, lon),
                    _ => FixedPosition::from_settings(&app.config.geolocation),
                };

                if app.locate(&position).await {
                    app.show_tabs(tab).await;
                } else {
                    app.print_error();
                }
            }
        }

        Ok(())
    }
}
