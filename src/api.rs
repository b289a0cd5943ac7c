use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{
    Coordinates, PlanRouteRequest, RadarStatus, Route, TripPlan, Waypoint, WeatherSample,
};
use crate::error::Error;

/// Waypoint lifecycle. All operations are synchronous mutations of the
/// session's waypoint set; readers only ever get cloned snapshots.
pub trait WaypointAPI {
    /// Silent no-op at capacity, observable as an unchanged count.
    fn add_pin(&self, coordinates: Coordinates) -> Option<Uuid>;

    fn add_text_entry(&self, text: &str) -> Result<Uuid, Error>;

    /// Inserts a blank midpoint slot between the fixed start and end slots.
    fn add_text_slot(&self) -> Option<Uuid>;

    fn remove_text_slot(&self) -> Option<Uuid>;

    fn set_waypoint_text(&self, id: Uuid, text: &str) -> Result<(), Error>;

    fn remove_waypoint(&self, id: Uuid) -> bool;

    /// Removes every waypoint and invalidates any in-flight planning cycle.
    fn clear_waypoints(&self);

    fn waypoints(&self) -> Vec<Waypoint>;
}

#[async_trait]
pub trait GeocodeAPI {
    /// Resolves every text-only waypoint concurrently and returns the
    /// resolved copy; the waypoint set itself is not mutated.
    async fn resolve_waypoints(&self, waypoints: Vec<Waypoint>) -> Result<Vec<Waypoint>, Error>;
}

#[async_trait]
pub trait RouteAPI {
    /// Single attempt, order-preserving. Fewer than two coordinates fails
    /// before any network call.
    async fn compute_route(&self, coordinates: Vec<Coordinates>) -> Result<Route, Error>;
}

#[async_trait]
pub trait WeatherAPI {
    /// One lookup per waypoint, all concurrent. The result always has the
    /// same length and order as the input; individual failures become
    /// `Failed` samples instead of discarding their siblings.
    async fn fetch_weather(&self, waypoints: &[Waypoint]) -> Vec<WeatherSample>;
}

#[async_trait]
pub trait PlanAPI {
    /// Runs one planning cycle: resolve, then route and weather concurrently,
    /// then an atomic last-request-wins commit.
    async fn plan_trip(&self, request: PlanRouteRequest) -> Result<TripPlan, Error>;

    fn current_plan(&self) -> Option<TripPlan>;
}

#[async_trait]
pub trait RadarAPI {
    async fn toggle_radar(&self, color_scheme: u8) -> Result<RadarStatus, Error>;

    fn radar_status(&self) -> RadarStatus;

    /// Tile URL for the cached frame; only valid while the overlay is
    /// visible.
    fn radar_tile_url(&self, z: u8, x: u32, y: u32) -> Result<String, Error>;
}

#[async_trait]
pub trait ReviewAPI {
    /// Posts the first and last placed coordinates to the review service and
    /// returns its text verbatim.
    async fn request_trip_review(&self) -> Result<String, Error>;
}

pub trait API:
    WaypointAPI + GeocodeAPI + RouteAPI + WeatherAPI + PlanAPI + RadarAPI + ReviewAPI
{
}

pub type DynAPI = Arc<dyn API + Send + Sync>;
