//! Human-friendly output for the three screens.

use std::fmt::Write;
use crossterm::style::Stylize;

use meteo_core::{
    CurrentWeather, DailyWeather, Forecast, HourlyWeather, Place, View,
    chart::{self, ChartPoint},
    model::{format_temperature, format_wind},
    weather_code,
};

use crate::theme::Theme;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const CELL: usize = 3;

pub fn view(theme: &Theme, view: View<'_>) -> String {
    match view {
        View::Loading => format!("{}\n", theme.muted("Loading...")),
        View::Empty => format!(
            "{}\n",
            theme.muted("Search for a place or use your position to see the forecast.")
        ),
        View::Error(message) => format!("{}\n", theme.error(message)),
        View::Data { place, forecast } => match forecast {
            Forecast::Current(current) => currently(theme, place, current),
            Forecast::Today(rows) => today(theme, place, rows),
            Forecast::Weekly(rows) => weekly(theme, place, rows),
        },
    }
}

fn header(theme: &Theme, place: &Place) -> String {
    let name = place.name.clone().unwrap_or_else(|| place.coordinates());
    let mut out = format!("{}\n", theme.accent(&name).bold());
    let area = place.area();
    if !area.is_empty() {
        let _ = writeln!(out, "{}", theme.title(&area));
    }
    out
}

fn condition(code: Option<i32>) -> String {
    let glyph = weather_code::icon(code).map_or(" ", |icon| icon.glyph());
    format!("{glyph} {}", weather_code::description(code))
}

pub fn currently(theme: &Theme, place: &Place, current: &CurrentWeather) -> String {
    let mut out = header(theme, place);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", theme.title(&condition(current.weather_code)));
    let _ = writeln!(out, "  {}", theme.accent(&format_temperature(current.temperature)));
    let _ = writeln!(out, "  {}", theme.blue(&format_wind(current.wind_speed)));
    out
}

pub fn today(theme: &Theme, place: &Place, rows: &[HourlyWeather]) -> String {
    let mut out = header(theme, place);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", theme.plain("Today's temperatures"));

    let points = chart::hourly_temperatures(rows);
    if let Some((lo, hi)) = chart::bounds([points.as_slice()]) {
        let _ = writeln!(out, "{}", theme.muted(&range_line(lo, hi)));
        let _ = writeln!(out, "{}", theme.accent(&sparkline(&points, lo, hi)));
        let _ = writeln!(out, "{}", theme.muted(&axis(&points)));
    }
    let _ = writeln!(out);

    for row in rows {
        let _ = writeln!(
            out,
            "{}  {:<34}{}  {}",
            theme.plain(&row.label()),
            condition(row.weather_code),
            theme.accent(&format!("{:>10}", format_temperature(row.temperature))),
            theme.blue(&format!("{:>12}", format_wind(row.wind_speed))),
        );
    }
    out
}

pub fn weekly(theme: &Theme, place: &Place, rows: &[DailyWeather]) -> String {
    let mut out = header(theme, place);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", theme.plain("This week's temperatures"));

    let (max, min) = chart::weekly_temperatures(rows);
    if let Some((lo, hi)) = chart::bounds([max.as_slice(), min.as_slice()]) {
        let _ = writeln!(out, "{}", theme.muted(&range_line(lo, hi)));
        let _ = writeln!(out, "{}", theme.accent(&sparkline(&max, lo, hi)));
        let _ = writeln!(out, "{}", theme.blue(&sparkline(&min, lo, hi)));
        let _ = writeln!(out, "{}", theme.muted(&axis(&max)));
    }
    let _ = writeln!(out);

    for row in rows {
        let _ = writeln!(
            out,
            "{}  {:<34}{}  {}",
            theme.plain(&row.label()),
            condition(row.weather_code),
            theme.accent(&format!("{:>10}", format_temperature(row.temperature_max))),
            theme.blue(&format!("{:>10}", format_temperature(row.temperature_min))),
        );
    }
    out
}

fn range_line(lo: f64, hi: f64) -> String {
    format!(
        "min {}  max {}",
        format_temperature(Some(lo)),
        format_temperature(Some(hi))
    )
}

/// One bar per point, scaled between `lo` and `hi`.
pub fn sparkline(points: &[ChartPoint], lo: f64, hi: f64) -> String {
    let span = hi - lo;
    points
        .iter()
        .map(|p| {
            let level = if span > f64::EPSILON {
                (((p.value - lo) / span) * (BARS.len() - 1) as f64).round() as usize
            } else {
                BARS.len() / 2
            };
            let bar = BARS[level.min(BARS.len() - 1)];
            format!("{bar}{bar} ")
        })
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Axis labels aligned under their bars.
pub fn axis(points: &[ChartPoint]) -> String {
    let mut line = String::new();
    for (i, p) in points.iter().enumerate() {
        if let Some(label) = &p.label {
            let col = i * CELL;
            let width = line.chars().count();
            if width < col {
                line.push_str(&" ".repeat(col - width));
            } else if width > col && !line.is_empty() {
                continue;
            }
            line.push_str(label);
        }
    }
    line
}
