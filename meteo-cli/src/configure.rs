use std::path::Path;

use anyhow::Context;
use inquire::{Confirm, CustomType, Select};
use meteo_core::{Config, ThemePreference};

/// Interactive edit of theme and geolocation, written back to `path` (or the default location).
pub fn run(current: &Config, path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = current.clone();

    let themes = ThemePreference::all().to_vec();
    let start = themes.iter().position(|t| *t == config.theme).unwrap_or(0);
    config.theme = Select::new("Colour scheme:", themes)
        .with_starting_cursor(start)
        .prompt()
        .context("Theme selection aborted")?;

    let enable = Confirm::new("Allow geolocation (use a fixed home position)?")
        .with_default(config.geolocation.enabled)
        .prompt()
        .context("Geolocation prompt aborted")?;

    if enable {
        let (lat, lon) = config.geolocation.coordinates().unwrap_or((0.0, 0.0));

        let latitude = CustomType::<f64>::new("Latitude:")
            .with_default(lat)
            .with_error_message("Please type a decimal number, e.g. 48.8534")
            .prompt()
            .context("Latitude prompt aborted")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_default(lon)
            .with_error_message("Please type a decimal number, e.g. 2.3488")
            .prompt()
            .context("Longitude prompt aborted")?;

        config.set_home(latitude, longitude)?;
    } else {
        config.geolocation.enabled = false;
    }

    let saved_to = match path {
        Some(path) => {
            config.save_to(path)?;
            path.to_path_buf()
        }
        None => config.save()?,
    };

    tracing::info!(path = %saved_to.display(), "configuration saved");
    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}
