use super::Engine;

use async_trait::async_trait;
use std::sync::atomic::Ordering;

use crate::api::{GeocodeAPI, PlanAPI, RouteAPI, WeatherAPI};
use crate::entities::{Coordinates, PlanRouteRequest, RouteSource, TripPlan, WaypointOrigin};
use crate::error::{insufficient_waypoints_error, superseded_cycle_error, Error};

#[async_trait]
impl PlanAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn plan_trip(&self, request: PlanRouteRequest) -> Result<TripPlan, Error> {
        let cycle = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;

        let origin = match request.source {
            RouteSource::DirectPins => WaypointOrigin::PinDrop,
            RouteSource::TypedLocations => WaypointOrigin::TextEntry,
        };
        let snapshot = self.waypoint_set().snapshot_by_origin(origin);

        let resolved = self.resolve_waypoints(snapshot).await?;

        let coordinates: Vec<Coordinates> =
            resolved.iter().filter_map(|w| w.coordinates).collect();
        if coordinates.len() < 2 {
            return Err(insufficient_waypoints_error());
        }

        // route and weather fan out together and are joined before anything
        // is committed
        let (route, weather) = tokio::join!(
            self.compute_route(coordinates),
            self.fetch_weather(&resolved),
        );

        self.commit_plan(TripPlan::new(cycle, route?, weather))
    }

    fn current_plan(&self) -> Option<TripPlan> {
        self.plan_state().plan.clone()
    }
}

impl Engine {
    /// Last request wins: a plan tagged at or below the committed cycle floor
    /// is dropped instead of overwriting fresher state.
    fn commit_plan(&self, plan: TripPlan) -> Result<TripPlan, Error> {
        let mut state = self.plan_state();

        if plan.cycle <= state.committed_cycle {
            tracing::info!(cycle = plan.cycle, "dropping superseded planning cycle");
            return Err(superseded_cycle_error());
        }

        state.committed_cycle = plan.cycle;
        state.plan = Some(plan.clone());

        Ok(plan)
    }
}
