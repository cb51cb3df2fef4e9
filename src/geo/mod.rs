//! Geolocation failures and reverse geocoding of the user's position.

use anyhow::{Context, Result};
use async_trait::async_trait;
use derive_more::{Display, Error};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{config, models::Coordinates};

/// Reason the user's position could not be obtained
#[derive(Clone, Copy, Debug, Display, Error, PartialEq, Eq)]
pub enum GeolocationError {
    #[display("Location access was denied. Allow location access to sort by distance.")]
    PermissionDenied,

    #[display("Your location is currently unavailable.")]
    PositionUnavailable,

    #[display("Getting your location took too long. Please try again.")]
    Timeout,
}

/// Turns a coordinate into a human readable place name
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn place_name(&self, at: Coordinates) -> Result<String>;
}

/// [`ReverseGeocoder`] backed by a Nominatim-compatible `reverse` endpoint
pub struct NominatimGeocoder {
    client: Client,
    url: String,
}

#[derive(Deserialize)]
struct ReverseResponse {
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(config: &config::Geocoder, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create geocoder HTTP client")?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn place_name(&self, at: Coordinates) -> Result<String> {
        debug!("Reverse geocoding {}, {}", at.lat, at.lng);

        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", at.lat.to_string()),
                ("lon", at.lng.to_string()),
            ])
            .send()
            .await
            .context("Failed to reach geocoder")?
            .error_for_status()
            .context("Geocoder rejected the lookup")?;

        let body: ReverseResponse = response
            .json()
            .await
            .context("Failed to parse geocoder response")?;

        body.display_name
            .filter(|name| !name.trim().is_empty())
            .context("Geocoder returned no place name")
    }
}

/// Great-circle distance between two points in kilometres
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6_371.0;

    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}
