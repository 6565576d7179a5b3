use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WeatherError};

/// Rejects positions off the globe, NaN included.
pub fn check_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
        Ok(())
    } else {
        Err(WeatherError::InvalidCoordinates { latitude, longitude })
    }
}

/// A user-selected location with display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: Option<String>,
    /// First-level administrative area (state, region, province).
    pub region: Option<String>,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
}

impl Place {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            name: None,
            region: None,
            country: None,
            latitude,
            longitude,
            custom_label: None,
        }
    }

    /// `"{name} {region}, {country}"`, leaving out whatever is missing.
    pub fn label(&self) -> String {
        let head = [self.name.as_deref(), self.region.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        match self.country.as_deref().filter(|c| !c.is_empty()) {
            Some(country) if !head.is_empty() => format!("{head}, {country}"),
            Some(country) => country.to_string(),
            None if !head.is_empty() => head,
            None => self.coordinates(),
        }
    }

    /// Second header line: `"{region}, {country}"`.
    pub fn area(&self) -> String {
        [self.region.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    pub fn with_label(mut self) -> Self {
        self.custom_label = Some(self.label());
        self
    }

    pub fn name_matches(&self, query: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name.to_lowercase() == query.to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub weather_code: Option<i32>,
    /// °C
    pub temperature: Option<f64>,
    /// km/h
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyWeather {
    /// Local time at the place.
    pub time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub weather_code: Option<i32>,
}

impl HourlyWeather {
    pub fn label(&self) -> String {
        format_hour(&self.time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    /// Local calendar day at the place.
    pub date: NaiveDate,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub weather_code: Option<i32>,
}

impl DailyWeather {
    pub fn label(&self) -> String {
        format_date(&self.date)
    }
}

pub fn format_hour(time: &NaiveDateTime) -> String {
    time.format("%H:%M").to_string()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

pub fn format_temperature(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2} °C"),
        None => "-- °C".to_string(),
    }
}

pub fn format_wind(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2} km/h"),
        None => "-- km/h".to_string(),
    }
}
