use super::Engine;

use async_trait::async_trait;
use futures::future::join_all;

use crate::api::WeatherAPI;
use crate::entities::{Waypoint, WeatherSample};

#[async_trait]
impl WeatherAPI for Engine {
    #[tracing::instrument(skip(self, waypoints))]
    async fn fetch_weather(&self, waypoints: &[Waypoint]) -> Vec<WeatherSample> {
        // each lookup's outcome is captured on its own before the join; one
        // failed waypoint never discards its siblings
        let lookups = waypoints.iter().map(|waypoint| async move {
            let coordinates = match waypoint.coordinates {
                Some(coordinates) => coordinates,
                None => return WeatherSample::failed(waypoint.id),
            };

            match self.weather.current_conditions(coordinates).await {
                Ok(conditions) => WeatherSample::ok(
                    waypoint.id,
                    conditions.location_name,
                    conditions.temperature_c,
                    conditions.condition,
                ),
                Err(err) => {
                    tracing::warn!(waypoint_id = %waypoint.id, %err, "weather lookup failed");
                    WeatherSample::failed(waypoint.id)
                }
            }
        });

        join_all(lookups).await
    }
}
