use super::Engine;

use async_trait::async_trait;
use futures::future::join_all;

use crate::api::GeocodeAPI;
use crate::entities::Waypoint;
use crate::error::{invalid_input_error, Error};

#[async_trait]
impl GeocodeAPI for Engine {
    #[tracing::instrument(skip(self, waypoints))]
    async fn resolve_waypoints(&self, waypoints: Vec<Waypoint>) -> Result<Vec<Waypoint>, Error> {
        // blank slots are rejected before anything goes over the wire
        for waypoint in &waypoints {
            if waypoint.coordinates.is_none() {
                match &waypoint.source_text {
                    Some(text) if !text.trim().is_empty() => {}
                    _ => return Err(invalid_input_error()),
                }
            }
        }

        let lookups = waypoints.into_iter().map(|mut waypoint| async move {
            if waypoint.coordinates.is_some() {
                return Ok(waypoint);
            }

            // validated non-blank above
            let text = waypoint.source_text.clone().unwrap_or_default();
            let coordinates = self.geocoder.geocode(&text).await?;
            waypoint.coordinates = Some(coordinates);

            Ok(waypoint)
        });

        join_all(lookups).await.into_iter().collect()
    }
}
