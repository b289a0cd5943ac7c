use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub path: Vec<Coordinates>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl Route {
    pub fn new(path: Vec<Coordinates>, distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            path,
            distance_meters,
            duration_seconds,
        }
    }
}

/// Which waypoints feed a planning cycle. Passed explicitly by the caller
/// instead of being inferred from which UI control fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    DirectPins,
    TypedLocations,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PlanRouteRequest {
    pub source: RouteSource,
}
