use super::Engine;

use async_trait::async_trait;

use crate::api::ReviewAPI;
use crate::entities::Coordinates;
use crate::error::{insufficient_waypoints_error, Error};

#[async_trait]
impl ReviewAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn request_trip_review(&self) -> Result<String, Error> {
        let placed: Vec<Coordinates> = self
            .waypoint_set()
            .snapshot()
            .iter()
            .filter_map(|w| w.coordinates)
            .collect();

        if placed.len() < 2 {
            return Err(insufficient_waypoints_error());
        }

        let start = placed[0];
        let end = placed[placed.len() - 1];

        self.reviews.trip_review(start, end).await
    }
}
