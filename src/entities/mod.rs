mod coordinates;
mod plan;
mod radar;
mod route;
mod waypoint;
mod weather;

pub use coordinates::Coordinates;
pub use plan::TripPlan;
pub use radar::{RadarOverlay, RadarStatus};
pub use route::{PlanRouteRequest, Route, RouteSource};
pub use waypoint::{Waypoint, WaypointOrigin, WaypointSet, MAX_WAYPOINTS};
pub use weather::{SampleStatus, WeatherSample};
