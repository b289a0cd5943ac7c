use super::Engine;

use std::sync::atomic::Ordering;
use uuid::Uuid;

use crate::api::WaypointAPI;
use crate::entities::{Coordinates, Waypoint};
use crate::error::Error;

impl WaypointAPI for Engine {
    #[tracing::instrument(skip(self))]
    fn add_pin(&self, coordinates: Coordinates) -> Option<Uuid> {
        self.waypoint_set().add_pin(coordinates)
    }

    #[tracing::instrument(skip(self))]
    fn add_text_entry(&self, text: &str) -> Result<Uuid, Error> {
        self.waypoint_set().add_text_entry(text)
    }

    #[tracing::instrument(skip(self))]
    fn add_text_slot(&self) -> Option<Uuid> {
        self.waypoint_set().add_text_slot()
    }

    #[tracing::instrument(skip(self))]
    fn remove_text_slot(&self) -> Option<Uuid> {
        self.waypoint_set().remove_text_slot()
    }

    #[tracing::instrument(skip(self))]
    fn set_waypoint_text(&self, id: Uuid, text: &str) -> Result<(), Error> {
        self.waypoint_set().set_text(id, text)
    }

    #[tracing::instrument(skip(self))]
    fn remove_waypoint(&self, id: Uuid) -> bool {
        self.waypoint_set().remove(id)
    }

    #[tracing::instrument(skip(self))]
    fn clear_waypoints(&self) {
        self.waypoint_set().clear();

        // raise the cycle floor so any in-flight cycle's results are
        // discarded at commit time
        let floor = self.cycle.fetch_add(1, Ordering::SeqCst) + 1;

        let mut state = self.plan_state();
        state.committed_cycle = floor;
        state.plan = None;
    }

    fn waypoints(&self) -> Vec<Waypoint> {
        self.waypoint_set().snapshot()
    }
}
