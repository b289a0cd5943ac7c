mod mapbox;
mod open_weather;
mod osrm;
mod rainviewer;
mod trip_review;

pub use mapbox::MapboxGeocoder;
pub use open_weather::OpenWeatherClient;
pub use osrm::OsrmRouter;
pub use rainviewer::RainviewerClient;
pub use trip_review::TripReviewClient;

use std::time::Duration;

use async_trait::async_trait;

use crate::entities::{Coordinates, Route};
use crate::error::Error;

/// Bounded wait for every collaborator call; a timeout is reported as an
/// unavailable service.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub fn http_client() -> Result<reqwest::Client, Error> {
    Ok(reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}

#[async_trait]
pub trait GeocodingService: Send + Sync {
    /// Resolves a free-text place name to coordinates. "No result" is a
    /// resolution failure, not a transport error.
    async fn geocode(&self, query: &str) -> Result<Coordinates, Error>;
}

#[async_trait]
pub trait RoutingService: Send + Sync {
    /// Computes a path visiting the coordinates in the given order. Routing
    /// services are order-sensitive; the sequence is never re-optimized.
    async fn route(&self, waypoints: &[Coordinates]) -> Result<Route, Error>;
}

#[derive(Clone, Debug)]
pub struct Conditions {
    pub temperature_c: f64,
    pub condition: String,
    pub location_name: Option<String>,
}

#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn current_conditions(&self, coordinates: Coordinates) -> Result<Conditions, Error>;
}

#[async_trait]
pub trait RadarService: Send + Sync {
    /// Discovery call: the timestamp of the latest available radar frame.
    async fn latest_frame(&self) -> Result<i64, Error>;

    /// Tile URL template for a fetched frame.
    fn tile_url(&self, frame_timestamp: i64, color_scheme: u8, z: u8, x: u32, y: u32) -> String;
}

#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Returns the review text verbatim; the content is never parsed.
    async fn trip_review(&self, start: Coordinates, end: Coordinates) -> Result<String, Error>;
}
