use super::Engine;

use async_trait::async_trait;

use crate::api::RouteAPI;
use crate::entities::{Coordinates, Route};
use crate::error::{insufficient_waypoints_error, Error};

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn compute_route(&self, coordinates: Vec<Coordinates>) -> Result<Route, Error> {
        if coordinates.len() < 2 {
            return Err(insufficient_waypoints_error());
        }

        // one planning attempt is one request; retries are the caller's call
        self.router.route(&coordinates).await
    }
}
