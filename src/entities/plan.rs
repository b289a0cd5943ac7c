use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Route, WeatherSample};

/// The atomic commit unit of one planning cycle: a fully resolved route plus
/// the complete weather list, tagged with the cycle's sequence number. Never
/// updated field by field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TripPlan {
    pub cycle: u64,
    pub route: Route,
    pub weather: Vec<WeatherSample>,
    pub committed_at: DateTime<Utc>,
}

impl TripPlan {
    pub fn new(cycle: u64, route: Route, weather: Vec<WeatherSample>) -> Self {
        Self {
            cycle,
            route,
            weather,
            committed_at: Utc::now(),
        }
    }
}
