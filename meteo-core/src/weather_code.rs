//! WMO weather interpretation codes as reported by Open-Meteo.
//!
//! See <https://open-meteo.com/en/docs#weathervariables>.

/// Returned for any code outside the table.
pub const UNDEFINED: &str = "Undefined";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Fog,
    Rainy,
    Pouring,
    Snowy,
    Snowflake,
    Lightning,
}

impl Icon {
    /// Material Community icon name.
    pub fn name(self) -> &'static str {
        match self {
            Icon::Sunny => "weather-sunny",
            Icon::PartlyCloudy => "weather-partly-cloudy",
            Icon::Cloudy => "weather-cloudy",
            Icon::Fog => "weather-fog",
            Icon::Rainy => "weather-rainy",
            Icon::Pouring => "weather-pouring",
            Icon::Snowy => "weather-snowy",
            Icon::Snowflake => "snowflake",
            Icon::Lightning => "weather-lightning",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Icon::Sunny => "☀",
            Icon::PartlyCloudy => "⛅",
            Icon::Cloudy => "☁",
            Icon::Fog => "🌫",
            Icon::Rainy => "🌦",
            Icon::Pouring => "🌧",
            Icon::Snowy => "🌨",
            Icon::Snowflake => "❄",
            Icon::Lightning => "⛈",
        }
    }
}

const TABLE: &[(i32, &str, Icon)] = &[
    (0, "Clear sky", Icon::Sunny),
    (1, "Mainly clear", Icon::PartlyCloudy),
    (2, "Partly cloudy", Icon::PartlyCloudy),
    (3, "Overcast", Icon::Cloudy),
    (45, "Fog", Icon::Fog),
    (48, "Depositing rime fog", Icon::Fog),
    (51, "Light drizzle", Icon::Rainy),
    (53, "Moderate drizzle", Icon::Rainy),
    (55, "Dense drizzle", Icon::Rainy),
    (56, "Light freezing drizzle", Icon::Snowflake),
    (57, "Dense freezing drizzle", Icon::Snowflake),
    (61, "Slight rain", Icon::Rainy),
    (63, "Moderate rain", Icon::Rainy),
    (65, "Heavy rain", Icon::Pouring),
    (66, "Light freezing rain", Icon::Snowflake),
    (67, "Heavy freezing rain", Icon::Snowflake),
    (71, "Slight snow fall", Icon::Snowy),
    (73, "Moderate snow fall", Icon::Snowy),
    (75, "Heavy snow fall", Icon::Snowy),
    (77, "Snow grains", Icon::Snowy),
    (80, "Slight rain showers", Icon::Pouring),
    (81, "Moderate rain showers", Icon::Pouring),
    (82, "Violent rain showers", Icon::Pouring),
    (85, "Slight snow showers", Icon::Snowy),
    (86, "Heavy snow showers", Icon::Snowy),
    (95, "Thunderstorm", Icon::Lightning),
    (96, "Thunderstorm with slight hail", Icon::Lightning),
    (99, "Thunderstorm with heavy hail", Icon::Lightning),
];

fn lookup(code: Option<i32>) -> Option<&'static (i32, &'static str, Icon)> {
    let code = code?;
    TABLE.iter().find(|(c, _, _)| *c == code)
}

pub fn description(code: Option<i32>) -> &'static str {
    lookup(code).map_or(UNDEFINED, |(_, text, _)| *text)
}

pub fn icon(code: Option<i32>) -> Option<Icon> {
    lookup(code).map(|(_, _, icon)| *icon)
}

pub fn is_known(code: i32) -> bool {
    lookup(Some(code)).is_some()
}
