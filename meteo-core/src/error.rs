use thiserror::Error;

/// Shown for every failure that is not a permission or lookup problem.
pub const CONNECTION_LOST: &str =
    "Service connection is lost. Please check your internet connection or try again later";

/// Shown when the position source refuses or has nothing to offer.
pub const GEOLOCATION_UNAVAILABLE: &str =
    "Geolocation is not available. Please enable it in your settings.";

/// Shown when a submitted query matches none of the candidates.
pub const PLACE_NOT_FOUND: &str = "Could not find any address for the city name you entered.";

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("geolocation permission denied")]
    PermissionDenied,

    #[error("geolocation unavailable: {0}")]
    LocationUnavailable(String),

    #[error("coordinates {latitude}, {longitude} are not on the globe (-90..=90, -180..=180)")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("no place named '{0}'")]
    PlaceNotFound(String),
}

impl WeatherError {
    /// The one static line the user gets to see for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::PermissionDenied
            | WeatherError::LocationUnavailable(_)
            | WeatherError::InvalidCoordinates { .. } => GEOLOCATION_UNAVAILABLE,
            WeatherError::PlaceNotFound(_) => PLACE_NOT_FOUND,
            WeatherError::Network(_) | WeatherError::Status { .. } | WeatherError::Malformed(_) => {
                CONNECTION_LOST
            }
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        WeatherError::Malformed(e.to_string())
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_collapse_to_connection_message() {
        let errs = [
            WeatherError::Status { status: 429, body: "slow down".into() },
            WeatherError::Malformed("missing field".into()),
        ];
        for err in errs {
            assert_eq!(err.user_message(), CONNECTION_LOST);
        }
    }

    #[test]
    fn permission_and_not_found_have_their_own_messages() {
        assert_eq!(WeatherError::PermissionDenied.user_message(), GEOLOCATION_UNAVAILABLE);
        assert_eq!(
            WeatherError::LocationUnavailable("no coordinates".into()).user_message(),
            GEOLOCATION_UNAVAILABLE
        );
        assert_eq!(
            WeatherError::InvalidCoordinates { latitude: 91.0, longitude: 0.0 }.user_message(),
            GEOLOCATION_UNAVAILABLE
        );
        assert_eq!(WeatherError::PlaceNotFound("Atlantis".into()).user_message(), PLACE_NOT_FOUND);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
