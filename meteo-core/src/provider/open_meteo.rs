use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::{Result, WeatherError, truncate_body},
    model::{CurrentWeather, DailyWeather, HourlyWeather, Place},
};

use super::WeatherProvider;

const CURRENT_VARIABLES: &str = "weather_code,temperature_2m,wind_speed_10m";
const HOURLY_VARIABLES: &str = "weather_code,temperature_2m,wind_speed_10m";
const DAILY_VARIABLES: &str = "weather_code,temperature_2m_max,temperature_2m_min";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    base_url: String,
}

impl OpenMeteoProvider {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        place: &Place,
        what: &'static str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        tracing::debug!(
            latitude = place.latitude,
            longitude = place.longitude,
            what,
            "requesting forecast"
        );

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", place.latitude.to_string()),
                ("longitude", place.longitude.to_string()),
                ("timezone", "auto".to_string()),
                ("timeformat", "unixtime".to_string()),
            ])
            .query(params)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    weather_code: Option<i32>,
    temperature_2m: Option<f64>,
    wind_speed_10m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OmCurrentResponse {
    current: OmCurrent,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<i64>,
    weather_code: Vec<Option<i32>>,
    temperature_2m: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmHourlyResponse {
    #[serde(default)]
    utc_offset_seconds: i64,
    hourly: OmHourly,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<i64>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmDailyResponse {
    #[serde(default)]
    utc_offset_seconds: i64,
    daily: OmDaily,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn current(&self, place: &Place) -> Result<CurrentWeather> {
        let parsed: OmCurrentResponse = self
            .fetch(place, "current", &[("current", CURRENT_VARIABLES)])
            .await?;

        Ok(CurrentWeather {
            weather_code: parsed.current.weather_code,
            temperature: parsed.current.temperature_2m,
            wind_speed: parsed.current.wind_speed_10m,
        })
    }

    async fn hourly(&self, place: &Place) -> Result<Vec<HourlyWeather>> {
        let parsed: OmHourlyResponse = self
            .fetch(
                place,
                "hourly",
                &[("hourly", HOURLY_VARIABLES), ("forecast_days", "1")],
            )
            .await?;

        map_hourly(parsed.hourly, parsed.utc_offset_seconds)
    }

    async fn daily(&self, place: &Place) -> Result<Vec<DailyWeather>> {
        let parsed: OmDailyResponse = self
            .fetch(place, "daily", &[("daily", DAILY_VARIABLES)])
            .await?;

        map_daily(parsed.daily, parsed.utc_offset_seconds)
    }
}

fn map_hourly(hourly: OmHourly, utc_offset_seconds: i64) -> Result<Vec<HourlyWeather>> {
    let n = hourly.time.len();
    check_len("hourly", "weather_code", hourly.weather_code.len(), n)?;
    check_len("hourly", "temperature_2m", hourly.temperature_2m.len(), n)?;
    check_len("hourly", "wind_speed_10m", hourly.wind_speed_10m.len(), n)?;

    hourly
        .time
        .iter()
        .enumerate()
        .map(|(i, ts)| {
            Ok(HourlyWeather {
                time: local_time(*ts, utc_offset_seconds)?,
                temperature: hourly.temperature_2m[i],
                wind_speed: hourly.wind_speed_10m[i],
                weather_code: hourly.weather_code[i],
            })
        })
        .collect()
}

fn map_daily(daily: OmDaily, utc_offset_seconds: i64) -> Result<Vec<DailyWeather>> {
    let n = daily.time.len();
    check_len("daily", "weather_code", daily.weather_code.len(), n)?;
    check_len("daily", "temperature_2m_max", daily.temperature_2m_max.len(), n)?;
    check_len("daily", "temperature_2m_min", daily.temperature_2m_min.len(), n)?;

    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, ts)| {
            Ok(DailyWeather {
                date: local_time(*ts, utc_offset_seconds)?.date(),
                temperature_max: daily.temperature_2m_max[i],
                temperature_min: daily.temperature_2m_min[i],
                weather_code: daily.weather_code[i],
            })
        })
        .collect()
}

fn check_len(block: &str, column: &str, len: usize, expected: usize) -> Result<()> {
    if len != expected {
        return Err(WeatherError::Malformed(format!(
            "{block} column '{column}' has {len} values for {expected} timestamps"
        )));
    }
    Ok(())
}

/// Unix seconds shifted into the place's wall-clock time.
fn local_time(ts: i64, utc_offset_seconds: i64) -> Result<NaiveDateTime> {
    ts.checked_add(utc_offset_seconds)
        .and_then(|local| DateTime::from_timestamp(local, 0))
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| WeatherError::Malformed(format!("timestamp {ts} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn hourly_rows_are_shifted_to_local_time() {
        // 2024-01-01T00:00:00Z, Paris in winter is UTC+1
        let hourly = OmHourly {
            time: vec![1_704_067_200, 1_704_070_800],
            weather_code: vec![Some(0), Some(3)],
            temperature_2m: vec![Some(4.5), None],
            wind_speed_10m: vec![Some(10.0), Some(12.0)],
        };

        let rows = map_hourly(hourly, 3600).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label(), "01:00");
        assert_eq!(rows[1].label(), "02:00");
        assert_eq!(rows[0].temperature, Some(4.5));
        assert_eq!(rows[1].temperature, None);
        assert_eq!(rows[1].weather_code, Some(3));
    }

    #[test]
    fn daily_rows_use_local_dates() {
        // local midnight 2024-01-02 in UTC-5 is 05:00Z
        let daily = OmDaily {
            time: vec![1_704_171_600],
            weather_code: vec![Some(61)],
            temperature_2m_max: vec![Some(7.0)],
            temperature_2m_min: vec![Some(-1.0)],
        };

        let rows = map_daily(daily, -5 * 3600).unwrap();
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(rows[0].temperature_min, Some(-1.0));
    }

    #[test]
    fn short_column_is_malformed() {
        let hourly = OmHourly {
            time: vec![0, 3600],
            weather_code: vec![Some(0)],
            temperature_2m: vec![Some(1.0), Some(2.0)],
            wind_speed_10m: vec![Some(1.0), Some(2.0)],
        };

        let err = map_hourly(hourly, 0).unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
        assert!(err.to_string().contains("weather_code"));
    }

    #[test]
    fn overflowing_timestamp_is_malformed() {
        let hourly = OmHourly {
            time: vec![i64::MAX],
            weather_code: vec![None],
            temperature_2m: vec![None],
            wind_speed_10m: vec![None],
        };

        let err = map_hourly(hourly, 3600).unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));

        let daily = OmDaily {
            time: vec![i64::MIN],
            weather_code: vec![None],
            temperature_2m_max: vec![None],
            temperature_2m_min: vec![None],
        };
        assert!(matches!(map_daily(daily, -3600), Err(WeatherError::Malformed(_))));
    }

    #[test]
    fn null_readings_deserialize_as_absent() {
        let parsed: OmCurrentResponse = serde_json::from_str(
            r#"{"utc_offset_seconds":0,"current":{"time":0,"interval":900,
                "weather_code":null,"temperature_2m":3.2,"wind_speed_10m":null}}"#,
        )
        .unwrap();
        assert_eq!(parsed.current.weather_code, None);
        assert_eq!(parsed.current.temperature_2m, Some(3.2));
    }
}
