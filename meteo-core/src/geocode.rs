//! Place lookup: name → candidates (Open-Meteo geocoding) and
//! coordinates → place (Nominatim reverse geocoding).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{
    config::Config,
    error::{Result, WeatherError, truncate_body},
    model::Place,
    provider::http_client,
};

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Up to `count` candidates whose name matches `query`. No match is an empty list.
    async fn search(&self, query: &str, count: u8) -> Result<Vec<Place>>;

    /// The place at the given coordinates, or `None` when the service knows no address there.
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<Place>>;
}

#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: Client,
    search_url: String,
    reverse_url: String,
}

impl GeocodingClient {
    pub fn new(http: Client, search_url: impl Into<String>, reverse_url: impl Into<String>) -> Self {
        Self {
            http,
            search_url: search_url.into(),
            reverse_url: reverse_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            http_client(config.http_timeout())?,
            config.endpoints.geocoding.clone(),
            config.endpoints.reverse_geocoding.clone(),
        ))
    }

    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct GcCandidate {
    name: Option<String>,
    admin1: Option<String>,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GcResponse {
    /// Absent when nothing matched.
    #[serde(default)]
    results: Vec<GcCandidate>,
}

#[derive(Debug, Deserialize)]
struct NmAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    municipality: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NmResponse {
    address: Option<NmAddress>,
}

impl GcCandidate {
    fn into_place(self) -> Place {
        Place {
            name: self.name,
            region: self.admin1,
            country: self.country,
            latitude: self.latitude,
            longitude: self.longitude,
            custom_label: None,
        }
        .with_label()
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    async fn search(&self, query: &str, count: u8) -> Result<Vec<Place>> {
        tracing::debug!(query, count, "geocoding search");

        let body = self
            .get_text(
                &self.search_url,
                &[("name", query.to_string()), ("count", count.to_string())],
            )
            .await?;

        let parsed: GcResponse = serde_json::from_str(&body)?;
        Ok(parsed.results.into_iter().map(GcCandidate::into_place).collect())
    }

    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<Place>> {
        tracing::debug!(latitude, longitude, "reverse geocoding");

        let body = self
            .get_text(
                &self.reverse_url,
                &[
                    ("lat", latitude.to_string()),
                    ("lon", longitude.to_string()),
                    ("format", "json".to_string()),
                    ("addressdetails", "1".to_string()),
                    ("zoom", "10".to_string()),
                ],
            )
            .await?;

        let parsed: NmResponse = serde_json::from_str(&body)?;
        let Some(addr) = parsed.address else {
            return Ok(None);
        };

        let name = addr.city.or(addr.town).or(addr.village).or(addr.municipality);

        Ok(Some(
            Place {
                name,
                region: addr.state,
                country: addr.country,
                latitude,
                longitude,
                custom_label: None,
            }
            .with_label(),
        ))
    }
}
