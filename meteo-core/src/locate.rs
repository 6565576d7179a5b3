//! "Use my position": position source, then reverse geocoding.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    config::GeolocationSettings,
    error::{Result, WeatherError},
    geocode::Geocoder,
    model::{Place, check_coordinates},
    state::SearchState,
};

/// Host-provided position, in decimal degrees.
#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn position(&self) -> Result<(f64, f64)>;
}

/// Position fixed by configuration or command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedPosition {
    enabled: bool,
    coordinates: Option<(f64, f64)>,
}

impl FixedPosition {
    pub fn from_settings(settings: &GeolocationSettings) -> Self {
        Self {
            enabled: settings.enabled,
            coordinates: settings.coordinates(),
        }
    }

    /// Explicit coordinates always count as permission.
    pub fn explicit(latitude: f64, longitude: f64) -> Self {
        Self {
            enabled: true,
            coordinates: Some((latitude, longitude)),
        }
    }
}

#[async_trait]
impl PositionSource for FixedPosition {
    async fn position(&self) -> Result<(f64, f64)> {
        if !self.enabled {
            return Err(WeatherError::PermissionDenied);
        }
        let (latitude, longitude) = self.coordinates.ok_or_else(|| {
            WeatherError::LocationUnavailable("no coordinates configured".to_string())
        })?;
        check_coordinates(latitude, longitude)?;
        Ok((latitude, longitude))
    }
}

async fn resolve<G: Geocoder + ?Sized>(source: &dyn PositionSource, geocoder: &G) -> Result<Place> {
    let (latitude, longitude) = source.position().await?;

    match geocoder.reverse(latitude, longitude).await? {
        Some(place) => Ok(place),
        None => {
            tracing::warn!(latitude, longitude, "no address at position, using coordinates");
            Ok(Place::at(latitude, longitude))
        }
    }
}

/// Clears the selection, then selects the place at the current position.
/// On failure the selection stays empty and the state carries the error.
pub async fn locate<G: Geocoder + ?Sized>(
    source: &dyn PositionSource,
    geocoder: &G,
    state: &mut SearchState,
) -> Result<()> {
    state.clear_error();
    state.set_location(None);

    match resolve(source, geocoder).await {
        Ok(place) => {
            state.set_location(Some(place));
            Ok(())
        }
        Err(err) => {
            tracing::warn!(error = %err, "geolocation failed");
            state.set_error(err.user_message());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CONNECTION_LOST, GEOLOCATION_UNAVAILABLE};

    #[derive(Debug)]
    struct FakeGeocoder {
        reverse: Option<Place>,
        fail: bool,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn search(&self, _query: &str, _count: u8) -> Result<Vec<Place>> {
            Ok(Vec::new())
        }

        async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<Place>> {
            if self.fail {
                return Err(WeatherError::Malformed("bad json".into()));
            }
            Ok(self.reverse.clone().map(|mut p| {
                p.latitude = latitude;
                p.longitude = longitude;
                p
            }))
        }
    }

    fn oslo() -> Place {
        Place {
            name: Some("Oslo".into()),
            region: None,
            country: Some("Norway".into()),
            latitude: 0.0,
            longitude: 0.0,
            custom_label: None,
        }
    }

    #[tokio::test]
    async fn disabled_geolocation_is_denied_and_clears_selection() {
        let source = FixedPosition::from_settings(&GeolocationSettings::default());
        let geocoder = FakeGeocoder { reverse: Some(oslo()), fail: false };
        let mut state = SearchState::new();
        state.set_location(Some(oslo()));

        let err = locate(&source, &geocoder, &mut state).await.unwrap_err();

        assert!(matches!(err, WeatherError::PermissionDenied));
        assert!(state.location().is_none());
        assert_eq!(state.error_message(), Some(GEOLOCATION_UNAVAILABLE));
    }

    #[tokio::test]
    async fn enabled_without_coordinates_is_unavailable() {
        let settings = GeolocationSettings { enabled: true, ..Default::default() };
        let source = FixedPosition::from_settings(&settings);
        let geocoder = FakeGeocoder { reverse: None, fail: false };
        let mut state = SearchState::new();

        let err = locate(&source, &geocoder, &mut state).await.unwrap_err();
        assert!(matches!(err, WeatherError::LocationUnavailable(_)));
        assert_eq!(state.error_message(), Some(GEOLOCATION_UNAVAILABLE));
    }

    #[tokio::test]
    async fn reverse_geocoded_place_is_selected() {
        let source = FixedPosition::explicit(59.91, 10.75);
        let geocoder = FakeGeocoder { reverse: Some(oslo()), fail: false };
        let mut state = SearchState::new();
        state.set_error(CONNECTION_LOST);

        locate(&source, &geocoder, &mut state).await.unwrap();

        let place = state.location().unwrap();
        assert_eq!(place.name.as_deref(), Some("Oslo"));
        assert_eq!(place.latitude, 59.91);
        assert_eq!(state.error_message(), None);
    }

    #[tokio::test]
    async fn unknown_address_falls_back_to_coordinates() {
        let source = FixedPosition::explicit(0.5, -30.0);
        let geocoder = FakeGeocoder { reverse: None, fail: false };
        let mut state = SearchState::new();

        locate(&source, &geocoder, &mut state).await.unwrap();

        let place = state.location().unwrap();
        assert_eq!(place.name, None);
        assert_eq!(place.longitude, -30.0);
    }

    #[tokio::test]
    async fn off_globe_coordinates_are_rejected_before_lookup() {
        let geocoder = FakeGeocoder { reverse: Some(oslo()), fail: false };

        for (lat, lon) in [(91.0, 0.0), (0.0, -180.5), (f64::NAN, 10.0)] {
            let mut state = SearchState::new();
            let err = locate(&FixedPosition::explicit(lat, lon), &geocoder, &mut state)
                .await
                .unwrap_err();

            assert!(matches!(err, WeatherError::InvalidCoordinates { .. }));
            assert_eq!(state.error_message(), Some(GEOLOCATION_UNAVAILABLE));
            assert!(state.location().is_none());
        }
    }

    #[tokio::test]
    async fn reverse_failure_reports_connection_error() {
        let source = FixedPosition::explicit(1.0, 1.0);
        let geocoder = FakeGeocoder { reverse: None, fail: true };
        let mut state = SearchState::new();

        assert!(locate(&source, &geocoder, &mut state).await.is_err());
        assert_eq!(state.error_message(), Some(CONNECTION_LOST));
        assert!(state.location().is_none());
    }
}
