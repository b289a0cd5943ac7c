use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;
use crate::error::{invalid_input_error, Error};

pub const MAX_WAYPOINTS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointOrigin {
    PinDrop,
    TextEntry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: Uuid,
    pub order: usize,
    pub coordinates: Option<Coordinates>,
    pub source_text: Option<String>,
    pub origin: WaypointOrigin,
}

impl Waypoint {
    fn pin(order: usize, coordinates: Coordinates) -> Self {
        Self {
            id: Uuid::new_v4(),
            order,
            coordinates: Some(coordinates),
            source_text: None,
            origin: WaypointOrigin::PinDrop,
        }
    }

    fn text(order: usize, text: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            order,
            coordinates: None,
            source_text: text,
            origin: WaypointOrigin::TextEntry,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.coordinates.is_some()
    }
}

/// Exclusive owner of the ordered waypoint collection. Other components only
/// ever see cloned snapshots; `order` stays a dense 0..len-1 sequence across
/// every mutation.
#[derive(Debug, Default)]
pub struct WaypointSet {
    waypoints: Vec<Waypoint>,
}

impl WaypointSet {
    pub fn new() -> Self {
        Self {
            waypoints: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Appends a pinned waypoint. A set already at capacity is left unchanged,
    /// observable only through the count.
    pub fn add_pin(&mut self, coordinates: Coordinates) -> Option<Uuid> {
        if self.waypoints.len() >= MAX_WAYPOINTS {
            return None;
        }

        let waypoint = Waypoint::pin(self.waypoints.len(), coordinates);
        let id = waypoint.id;
        self.waypoints.push(waypoint);

        Some(id)
    }

    /// Appends a typed location. Start commits first, end second; midpoints
    /// are inserted separately with `add_text_slot`.
    pub fn add_text_entry(&mut self, text: &str) -> Result<Uuid, Error> {
        if text.trim().is_empty() {
            return Err(invalid_input_error());
        }

        if self.waypoints.len() >= MAX_WAYPOINTS {
            return Err(invalid_input_error());
        }

        let waypoint = Waypoint::text(self.waypoints.len(), Some(text.trim().to_string()));
        let id = waypoint.id;
        self.waypoints.push(waypoint);

        Ok(id)
    }

    /// Inserts a blank midpoint text slot between the fixed start and end
    /// slots. No-op when start/end are not both present or the set is full.
    pub fn add_text_slot(&mut self) -> Option<Uuid> {
        if self.waypoints.len() < 2 || self.waypoints.len() >= MAX_WAYPOINTS {
            return None;
        }

        let position = self.waypoints.len() - 1;
        let waypoint = Waypoint::text(position, None);
        let id = waypoint.id;
        self.waypoints.insert(position, waypoint);
        self.reindex();

        Some(id)
    }

    /// Removes the most recently inserted midpoint text slot. Removing below
    /// zero midpoints is a no-op.
    pub fn remove_text_slot(&mut self) -> Option<Uuid> {
        if self.waypoints.len() < 3 {
            return None;
        }

        let position = self.waypoints.len() - 2;
        if self.waypoints[position].origin != WaypointOrigin::TextEntry {
            return None;
        }

        let removed = self.waypoints.remove(position);
        self.reindex();

        Some(removed.id)
    }

    /// Commits text into an existing slot.
    pub fn set_text(&mut self, id: Uuid, text: &str) -> Result<(), Error> {
        if text.trim().is_empty() {
            return Err(invalid_input_error());
        }

        let waypoint = self
            .waypoints
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(invalid_input_error)?;

        waypoint.source_text = Some(text.trim().to_string());
        waypoint.coordinates = None;

        Ok(())
    }

    /// Midpoint delete. Unknown ids are a no-op.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.waypoints.len();
        self.waypoints.retain(|w| w.id != id);

        if self.waypoints.len() == before {
            return false;
        }

        self.reindex();
        true
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    /// Read snapshot in trip order.
    pub fn snapshot(&self) -> Vec<Waypoint> {
        self.waypoints.clone()
    }

    /// Read snapshot restricted to one origin, re-densified to 0..len-1.
    pub fn snapshot_by_origin(&self, origin: WaypointOrigin) -> Vec<Waypoint> {
        let mut selected: Vec<Waypoint> = self
            .waypoints
            .iter()
            .filter(|w| w.origin == origin)
            .cloned()
            .collect();

        for (index, waypoint) in selected.iter_mut().enumerate() {
            waypoint.order = index;
        }

        selected
    }

    fn reindex(&mut self) {
        for (index, waypoint) in self.waypoints.iter_mut().enumerate() {
            waypoint.order = index;
        }
    }
}

#[test]
fn add_pin_stops_at_capacity() {
    let mut set = WaypointSet::new();

    for i in 0..MAX_WAYPOINTS {
        assert!(set.add_pin(Coordinates::new(40.0 + i as f64, -105.0)).is_some());
    }
    assert_eq!(set.len(), MAX_WAYPOINTS);

    assert!(set.add_pin(Coordinates::new(50.0, -100.0)).is_none());
    assert_eq!(set.len(), MAX_WAYPOINTS);
}

#[test]
fn orders_stay_dense_across_mutations() {
    let mut set = WaypointSet::new();

    let a = set.add_pin(Coordinates::new(40.0, -105.0)).unwrap();
    let _b = set.add_pin(Coordinates::new(40.1, -105.1)).unwrap();
    let c = set.add_pin(Coordinates::new(40.2, -105.2)).unwrap();
    let _d = set.add_pin(Coordinates::new(40.3, -105.3)).unwrap();

    assert!(set.remove(c));
    assert!(set.remove(a));

    let snapshot = set.snapshot();
    let orders: Vec<usize> = snapshot.iter().map(|w| w.order).collect();
    assert_eq!(orders, vec![0, 1]);
}

#[test]
fn text_slots_sit_between_start_and_end() {
    let mut set = WaypointSet::new();

    // no start/end committed yet, nothing to insert between
    assert!(set.add_text_slot().is_none());

    let start = set.add_text_entry("Rexburg, ID").unwrap();
    let end = set.add_text_entry("Boise, ID").unwrap();

    let mid_one = set.add_text_slot().unwrap();
    let mid_two = set.add_text_slot().unwrap();

    let ids: Vec<Uuid> = set.snapshot().iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![start, mid_one, mid_two, end]);

    // capacity is shared across slots and pins
    assert!(set.add_text_slot().is_some());
    assert!(set.add_text_slot().is_none());
    assert_eq!(set.len(), MAX_WAYPOINTS);
}

#[test]
fn remove_text_slot_below_zero_is_a_noop() {
    let mut set = WaypointSet::new();

    set.add_text_entry("Rexburg, ID").unwrap();
    set.add_text_entry("Boise, ID").unwrap();

    assert!(set.remove_text_slot().is_none());

    let slot = set.add_text_slot().unwrap();
    assert_eq!(set.remove_text_slot(), Some(slot));
    assert_eq!(set.len(), 2);
    assert!(set.remove_text_slot().is_none());
}

#[test]
fn blank_text_is_rejected() {
    let mut set = WaypointSet::new();

    assert!(set.add_text_entry("   ").is_err());

    let id = set.add_text_entry("Rexburg, ID").unwrap();
    assert!(set.set_text(id, "").is_err());
    assert!(set.set_text(id, "Idaho Falls, ID").is_ok());
}
