use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

use crate::{
    Config,
    error::Result,
    model::{CurrentWeather, DailyWeather, HourlyWeather, Place},
};

pub mod open_meteo;

pub use open_meteo::OpenMeteoProvider;

pub const USER_AGENT: &str = concat!("meteo/", env!("CARGO_PKG_VERSION"));

/// One fetch per screen; every call is independent of the others.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, place: &Place) -> Result<CurrentWeather>;

    /// Today's samples, one per hour, in the place's local time.
    async fn hourly(&self, place: &Place) -> Result<Vec<HourlyWeather>>;

    /// The coming week, one sample per local day.
    async fn daily(&self, place: &Place) -> Result<Vec<DailyWeather>>;
}

/// Shared HTTP client; the reverse geocoder rejects requests without a user agent.
pub fn http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Construct the forecast provider from config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>> {
    let http = http_client(config.http_timeout())?;
    Ok(Box::new(OpenMeteoProvider::new(http, config.endpoints.forecast.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_default_config_builds() {
        let cfg = Config::default();
        assert!(provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn user_agent_names_the_tool() {
        assert!(USER_AGENT.starts_with("meteo/"));
    }
}
