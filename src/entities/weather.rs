use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleStatus {
    Ok,
    Failed,
}

/// One waypoint's current conditions for one correlation cycle. Never mutated
/// after creation; the whole list is replaced on the next cycle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeatherSample {
    pub waypoint_id: Uuid,
    pub location_name: Option<String>,
    pub temperature_c: Option<f64>,
    pub condition: Option<String>,
    pub fetched_at: DateTime<Utc>,
    pub status: SampleStatus,
}

impl WeatherSample {
    pub fn ok(
        waypoint_id: Uuid,
        location_name: Option<String>,
        temperature_c: f64,
        condition: String,
    ) -> Self {
        Self {
            waypoint_id,
            location_name,
            temperature_c: Some(temperature_c),
            condition: Some(condition),
            fetched_at: Utc::now(),
            status: SampleStatus::Ok,
        }
    }

    /// A failed lookup carries no readings, only its slot in the list.
    pub fn failed(waypoint_id: Uuid) -> Self {
        Self {
            waypoint_id,
            location_name: None,
            temperature_c: None,
            condition: None,
            fetched_at: Utc::now(),
            status: SampleStatus::Failed,
        }
    }
}
