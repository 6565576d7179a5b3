//! Chart series built from forecast rows.

use crate::model::{DailyWeather, HourlyWeather, format_temperature};

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub value: f64,
    /// Axis label; only every other point carries one to keep the axis readable.
    pub label: Option<String>,
    pub data_point_text: String,
}

fn point(index: usize, value: Option<f64>, label: impl FnOnce() -> String) -> Option<ChartPoint> {
    let value = value?;
    Some(ChartPoint {
        value,
        label: (index % 2 == 0).then(label),
        data_point_text: format_temperature(Some(value)),
    })
}

pub fn hourly_temperatures(rows: &[HourlyWeather]) -> Vec<ChartPoint> {
    rows.iter()
        .enumerate()
        .filter_map(|(i, row)| point(i, row.temperature, || row.label()))
        .collect()
}

/// Daily maxima and minima, in that order.
pub fn weekly_temperatures(rows: &[DailyWeather]) -> (Vec<ChartPoint>, Vec<ChartPoint>) {
    let max = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| point(i, row.temperature_max, || row.label()))
        .collect();
    let min = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| point(i, row.temperature_min, || row.label()))
        .collect();
    (max, min)
}

/// Lowest and highest value across all series, `None` when every series is empty.
pub fn bounds<'a>(series: impl IntoIterator<Item = &'a [ChartPoint]>) -> Option<(f64, f64)> {
    series
        .into_iter()
        .flatten()
        .map(|p| p.value)
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hour(h: u32, temperature: Option<f64>) -> HourlyWeather {
        HourlyWeather {
            time: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(h, 0, 0).unwrap(),
            temperature,
            wind_speed: Some(5.0),
            weather_code: Some(1),
        }
    }

    #[test]
    fn every_other_point_is_labelled() {
        let rows: Vec<_> = (0..4).map(|h| hour(h, Some(10.0 + h as f64))).collect();
        let points = hourly_temperatures(&rows);

        let labels: Vec<_> = points.iter().map(|p| p.label.as_deref()).collect();
        assert_eq!(labels, [Some("00:00"), None, Some("02:00"), None]);
        assert_eq!(points[1].data_point_text, "11.00 °C");
    }

    #[test]
    fn absent_readings_are_skipped() {
        let rows = vec![hour(0, Some(1.0)), hour(1, None), hour(2, Some(3.0))];
        let points = hourly_temperatures(&rows);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].label.as_deref(), Some("02:00"));
    }

    #[test]
    fn weekly_series_split_max_and_min() {
        let day = |d, max, min| DailyWeather {
            date: NaiveDate::from_ymd_opt(2024, 6, d).unwrap(),
            temperature_max: Some(max),
            temperature_min: Some(min),
            weather_code: Some(0),
        };
        let rows = vec![day(1, 20.0, 11.0), day(2, 22.5, 12.0)];

        let (max, min) = weekly_temperatures(&rows);
        assert_eq!(max.iter().map(|p| p.value).collect::<Vec<_>>(), [20.0, 22.5]);
        assert_eq!(min[0].label.as_deref(), Some("01/06"));
        assert_eq!(min[1].label, None);
        assert_eq!(bounds([max.as_slice(), min.as_slice()]), Some((11.0, 22.5)));
        assert_eq!(bounds([&[][..]]), None);
    }
}
