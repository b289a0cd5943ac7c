mod geocode_api;
mod plan_api;
mod radar_api;
mod review_api;
mod route_api;
mod waypoint_api;
mod weather_api;

use std::sync::atomic::AtomicU64;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::API;
use crate::entities::{RadarOverlay, TripPlan, WaypointSet};
use crate::error::Error;
use crate::external::{
    GeocodingService, MapboxGeocoder, OpenWeatherClient, OsrmRouter, RadarService,
    RainviewerClient, ReviewService, RoutingService, TripReviewClient, WeatherService,
};

/// Committed result of the most recent planning cycle plus the cycle floor
/// used to drop stale commits. Guarded as one unit so a commit is atomic.
#[derive(Debug, Default)]
struct PlanState {
    committed_cycle: u64,
    plan: Option<TripPlan>,
}

/// Session engine. Owns the waypoint set, the committed plan, and the radar
/// overlay exclusively; collaborators are reached through the service traits
/// so nothing here depends on a live network.
pub struct Engine {
    waypoints: Mutex<WaypointSet>,
    plan: Mutex<PlanState>,
    cycle: AtomicU64,
    radar: Mutex<RadarOverlay>,
    geocoder: Arc<dyn GeocodingService>,
    router: Arc<dyn RoutingService>,
    weather: Arc<dyn WeatherService>,
    radar_frames: Arc<dyn RadarService>,
    reviews: Arc<dyn ReviewService>,
}

impl Engine {
    pub fn new(
        geocoder: Arc<dyn GeocodingService>,
        router: Arc<dyn RoutingService>,
        weather: Arc<dyn WeatherService>,
        radar_frames: Arc<dyn RadarService>,
        reviews: Arc<dyn ReviewService>,
    ) -> Self {
        Self {
            waypoints: Mutex::new(WaypointSet::new()),
            plan: Mutex::new(PlanState::default()),
            cycle: AtomicU64::new(0),
            radar: Mutex::new(RadarOverlay::new()),
            geocoder,
            router,
            weather,
            radar_frames,
            reviews,
        }
    }

    /// Engine wired to the live collaborators, configured from the
    /// environment.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self::new(
            Arc::new(MapboxGeocoder::from_env()?),
            Arc::new(OsrmRouter::from_env()?),
            Arc::new(OpenWeatherClient::from_env()?),
            Arc::new(RainviewerClient::from_env()?),
            Arc::new(TripReviewClient::from_env()?),
        ))
    }

    // Locks are never held across an await; each accessor hands out a short
    // lived guard.
    fn waypoint_set(&self) -> MutexGuard<'_, WaypointSet> {
        self.waypoints.lock().expect("waypoint set lock poisoned")
    }

    fn plan_state(&self) -> MutexGuard<'_, PlanState> {
        self.plan.lock().expect("plan state lock poisoned")
    }

    fn radar_overlay(&self) -> MutexGuard<'_, RadarOverlay> {
        self.radar.lock().expect("radar overlay lock poisoned")
    }
}

impl API for Engine {}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;
    use tokio_test::block_on;

    use crate::api::{PlanAPI, RadarAPI, ReviewAPI, RouteAPI, WaypointAPI, WeatherAPI};
    use crate::entities::{
        Coordinates, PlanRouteRequest, RadarStatus, Route, RouteSource, SampleStatus,
    };
    use crate::error::{resolution_failed_error, upstream_error};
    use crate::external::Conditions;

    // Coordinates with this latitude make the stub weather service fail.
    const FAILING_LATITUDE: f64 = -88.0;

    #[derive(Default)]
    struct StubGeocoder {
        calls: AtomicU64,
    }

    #[async_trait]
    impl GeocodingService for StubGeocoder {
        async fn geocode(&self, query: &str) -> Result<Coordinates, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            match query {
                "Rexburg, ID" => Ok(Coordinates::new(43.826, -111.7897)),
                "Idaho Falls, ID" => Ok(Coordinates::new(43.4917, -112.0341)),
                "Boise, ID" => Ok(Coordinates::new(43.615, -116.2023)),
                other => Err(resolution_failed_error(other)),
            }
        }
    }

    #[derive(Default)]
    struct StubRouter {
        calls: AtomicU64,
        slow_first_call: bool,
        fail: bool,
    }

    #[async_trait]
    impl RoutingService for StubRouter {
        async fn route(&self, waypoints: &[Coordinates]) -> Result<Route, Error> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);

            if self.slow_first_call && call == 0 {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }

            if self.fail {
                return Err(upstream_error());
            }

            let legs = (waypoints.len() - 1) as f64;
            Ok(Route::new(waypoints.to_vec(), 1609.0 * legs, 60.0 * legs))
        }
    }

    struct StubWeather;

    #[async_trait]
    impl WeatherService for StubWeather {
        async fn current_conditions(&self, coordinates: Coordinates) -> Result<Conditions, Error> {
            if (coordinates.latitude - FAILING_LATITUDE).abs() < f64::EPSILON {
                return Err(upstream_error());
            }

            Ok(Conditions {
                temperature_c: 21.0,
                condition: "Clear".into(),
                location_name: Some("Stubville".into()),
            })
        }
    }

    #[derive(Default)]
    struct StubRadar {
        fail: bool,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl RadarService for StubRadar {
        async fn latest_frame(&self) -> Result<i64, Error> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            if self.fail {
                return Err(upstream_error());
            }

            Ok(1_700_000_000)
        }

        fn tile_url(&self, frame_timestamp: i64, color_scheme: u8, z: u8, x: u32, y: u32) -> String {
            format!("stub/{}/{}/{}/{}/{}", frame_timestamp, z, x, y, color_scheme)
        }
    }

    struct StubReview;

    #[async_trait]
    impl ReviewService for StubReview {
        async fn trip_review(&self, _start: Coordinates, _end: Coordinates) -> Result<String, Error> {
            Ok("Looks like a pleasant drive.".into())
        }
    }

    fn test_engine(
        geocoder: Arc<StubGeocoder>,
        router: Arc<StubRouter>,
        radar: Arc<StubRadar>,
    ) -> Arc<Engine> {
        Arc::new(Engine::new(
            geocoder,
            router,
            Arc::new(StubWeather),
            radar,
            Arc::new(StubReview),
        ))
    }

    fn default_engine() -> Arc<Engine> {
        test_engine(
            Arc::new(StubGeocoder::default()),
            Arc::new(StubRouter::default()),
            Arc::new(StubRadar::default()),
        )
    }

    #[test]
    fn plan_trip_from_pins_end_to_end() {
        let engine = default_engine();

        let start = Coordinates::new(40.0, -105.0);
        let end = Coordinates::new(39.5, -104.9);
        engine.add_pin(start).unwrap();
        engine.add_pin(end).unwrap();

        let plan = block_on(engine.plan_trip(PlanRouteRequest {
            source: RouteSource::DirectPins,
        }))
        .unwrap();

        assert_eq!(plan.route.path.first().copied(), Some(start));
        assert_eq!(plan.route.path.last().copied(), Some(end));

        let ids: Vec<_> = engine.waypoints().iter().map(|w| w.id).collect();
        let sample_ids: Vec<_> = plan.weather.iter().map(|s| s.waypoint_id).collect();
        assert_eq!(sample_ids, ids);
        assert_eq!(plan.weather.len(), 2);

        assert_eq!(engine.current_plan().unwrap().cycle, plan.cycle);
    }

    #[test]
    fn weather_tolerates_partial_failure() {
        let engine = default_engine();

        engine.add_pin(Coordinates::new(40.0, -105.0)).unwrap();
        engine.add_pin(Coordinates::new(FAILING_LATITUDE, -104.9)).unwrap();
        engine.add_pin(Coordinates::new(39.0, -104.8)).unwrap();

        let snapshot = engine.waypoints();
        let samples = block_on(engine.fetch_weather(&snapshot));

        assert_eq!(samples.len(), 3);

        let failed: Vec<_> = samples
            .iter()
            .filter(|s| s.status == SampleStatus::Failed)
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].waypoint_id, snapshot[1].id);
        assert!(failed[0].temperature_c.is_none());
        assert!(failed[0].condition.is_none());

        let sample_ids: Vec<_> = samples.iter().map(|s| s.waypoint_id).collect();
        let ids: Vec<_> = snapshot.iter().map(|w| w.id).collect();
        assert_eq!(sample_ids, ids);
    }

    #[test]
    fn route_requires_two_coordinates() {
        let router = Arc::new(StubRouter::default());
        let engine = test_engine(
            Arc::new(StubGeocoder::default()),
            Arc::clone(&router),
            Arc::new(StubRadar::default()),
        );

        let result = block_on(engine.compute_route(vec![Coordinates::new(40.0, -105.0)]));

        assert_eq!(result.unwrap_err().code, 102);
        assert_eq!(router.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn plan_trip_requires_two_waypoints() {
        let engine = default_engine();
        engine.add_pin(Coordinates::new(40.0, -105.0)).unwrap();

        let result = block_on(engine.plan_trip(PlanRouteRequest {
            source: RouteSource::DirectPins,
        }));

        assert_eq!(result.unwrap_err().code, 102);
        assert!(engine.current_plan().is_none());
    }

    #[test]
    fn stale_cycle_never_overwrites_a_fresher_plan() {
        block_on(async {
            let engine = test_engine(
                Arc::new(StubGeocoder::default()),
                Arc::new(StubRouter {
                    slow_first_call: true,
                    ..StubRouter::default()
                }),
                Arc::new(StubRadar::default()),
            );

            engine.add_pin(Coordinates::new(40.0, -105.0)).unwrap();
            engine.add_pin(Coordinates::new(39.5, -104.9)).unwrap();

            let slow = {
                let engine = Arc::clone(&engine);
                tokio::spawn(async move {
                    engine
                        .plan_trip(PlanRouteRequest {
                            source: RouteSource::DirectPins,
                        })
                        .await
                })
            };

            // let cycle A reach its slow routing call, then win with cycle B
            tokio::time::sleep(Duration::from_millis(5)).await;

            let fresh = engine
                .plan_trip(PlanRouteRequest {
                    source: RouteSource::DirectPins,
                })
                .await
                .unwrap();

            let stale = slow.await.expect("plan task panicked");
            assert_eq!(stale.unwrap_err().code, 100);

            assert_eq!(engine.current_plan().unwrap().cycle, fresh.cycle);
        });
    }

    #[test]
    fn clear_invalidates_an_inflight_cycle() {
        block_on(async {
            let engine = test_engine(
                Arc::new(StubGeocoder::default()),
                Arc::new(StubRouter {
                    slow_first_call: true,
                    ..StubRouter::default()
                }),
                Arc::new(StubRadar::default()),
            );

            engine.add_pin(Coordinates::new(40.0, -105.0)).unwrap();
            engine.add_pin(Coordinates::new(39.5, -104.9)).unwrap();

            let inflight = {
                let engine = Arc::clone(&engine);
                tokio::spawn(async move {
                    engine
                        .plan_trip(PlanRouteRequest {
                            source: RouteSource::DirectPins,
                        })
                        .await
                })
            };

            tokio::time::sleep(Duration::from_millis(5)).await;
            engine.clear_waypoints();

            let result = inflight.await.expect("plan task panicked");
            assert_eq!(result.unwrap_err().code, 100);

            assert!(engine.current_plan().is_none());
            assert!(engine.waypoints().is_empty());
        });
    }

    #[test]
    fn routing_failure_leaves_previous_plan_in_place() {
        block_on(async {
            let engine = default_engine();
            engine.add_pin(Coordinates::new(40.0, -105.0)).unwrap();
            engine.add_pin(Coordinates::new(39.5, -104.9)).unwrap();

            let first = engine
                .plan_trip(PlanRouteRequest {
                    source: RouteSource::DirectPins,
                })
                .await
                .unwrap();

            let failing = test_engine(
                Arc::new(StubGeocoder::default()),
                Arc::new(StubRouter {
                    fail: true,
                    ..StubRouter::default()
                }),
                Arc::new(StubRadar::default()),
            );
            failing.add_pin(Coordinates::new(40.0, -105.0)).unwrap();
            failing.add_pin(Coordinates::new(39.5, -104.9)).unwrap();

            let result = failing
                .plan_trip(PlanRouteRequest {
                    source: RouteSource::DirectPins,
                })
                .await;
            assert_eq!(result.unwrap_err().code, 4);
            assert!(failing.current_plan().is_none());

            // the healthy engine keeps its committed plan
            assert_eq!(engine.current_plan().unwrap().cycle, first.cycle);
        });
    }

    #[test]
    fn typed_locations_resolve_without_mutating_the_set() {
        let engine = default_engine();

        engine.add_text_entry("Rexburg, ID").unwrap();
        engine.add_text_entry("Boise, ID").unwrap();

        let plan = block_on(engine.plan_trip(PlanRouteRequest {
            source: RouteSource::TypedLocations,
        }))
        .unwrap();

        assert_eq!(
            plan.route.path.first().copied(),
            Some(Coordinates::new(43.826, -111.7897))
        );
        assert_eq!(
            plan.route.path.last().copied(),
            Some(Coordinates::new(43.615, -116.2023))
        );

        // resolution produced a copy; the owned set is still text-only
        assert!(engine.waypoints().iter().all(|w| w.coordinates.is_none()));
    }

    #[test]
    fn blank_slot_fails_before_any_geocoding_call() {
        let geocoder = Arc::new(StubGeocoder::default());
        let engine = test_engine(
            Arc::clone(&geocoder),
            Arc::new(StubRouter::default()),
            Arc::new(StubRadar::default()),
        );

        engine.add_text_entry("Rexburg, ID").unwrap();
        engine.add_text_entry("Boise, ID").unwrap();
        engine.add_text_slot().unwrap();

        let result = block_on(engine.plan_trip(PlanRouteRequest {
            source: RouteSource::TypedLocations,
        }));

        assert_eq!(result.unwrap_err().code, 101);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unknown_place_is_a_resolution_failure() {
        let engine = default_engine();

        engine.add_text_entry("Atlantis").unwrap();
        engine.add_text_entry("Boise, ID").unwrap();

        let result = block_on(engine.plan_trip(PlanRouteRequest {
            source: RouteSource::TypedLocations,
        }));

        assert_eq!(result.unwrap_err().code, 103);
    }

    #[test]
    fn radar_toggle_cycles_through_visible_and_back() {
        let engine = default_engine();

        let status = block_on(engine.toggle_radar(2)).unwrap();
        match status {
            RadarStatus::Visible {
                frame_timestamp,
                color_scheme,
                ..
            } => {
                assert_eq!(frame_timestamp, 1_700_000_000);
                assert_eq!(color_scheme, 2);
            }
            other => panic!("expected visible, got {:?}", other),
        }

        let url = engine.radar_tile_url(7, 26, 48).unwrap();
        assert!(url.contains("1700000000"));

        let status = block_on(engine.toggle_radar(2)).unwrap();
        assert_eq!(status, RadarStatus::Hidden);
        assert!(engine.radar_tile_url(7, 26, 48).is_err());
    }

    #[test]
    fn radar_fetch_failure_returns_to_hidden() {
        let engine = test_engine(
            Arc::new(StubGeocoder::default()),
            Arc::new(StubRouter::default()),
            Arc::new(StubRadar {
                fail: true,
                ..StubRadar::default()
            }),
        );

        let result = block_on(engine.toggle_radar(2));

        assert_eq!(result.unwrap_err().code, 4);
        assert_eq!(engine.radar_status(), RadarStatus::Hidden);
    }

    #[test]
    fn radar_toggle_is_ignored_while_loading() {
        block_on(async {
            let engine = test_engine(
                Arc::new(StubGeocoder::default()),
                Arc::new(StubRouter::default()),
                Arc::new(StubRadar {
                    delay: Some(Duration::from_millis(50)),
                    ..StubRadar::default()
                }),
            );

            let first = {
                let engine = Arc::clone(&engine);
                tokio::spawn(async move { engine.toggle_radar(2).await })
            };

            tokio::time::sleep(Duration::from_millis(5)).await;

            // the fetch is outstanding; this toggle neither shows nor hides
            let status = engine.toggle_radar(2).await.unwrap();
            assert_eq!(status, RadarStatus::Loading);

            let settled = first.await.expect("toggle task panicked").unwrap();
            assert!(matches!(settled, RadarStatus::Visible { .. }));
        });
    }

    #[test]
    fn trip_review_uses_first_and_last_coordinates() {
        let engine = default_engine();

        engine.add_pin(Coordinates::new(40.0, -105.0)).unwrap();
        engine.add_pin(Coordinates::new(39.5, -104.9)).unwrap();

        let review = block_on(engine.request_trip_review()).unwrap();
        assert_eq!(review, "Looks like a pleasant drive.");
    }

    #[test]
    fn trip_review_requires_two_placed_waypoints() {
        let engine = default_engine();
        engine.add_pin(Coordinates::new(40.0, -105.0)).unwrap();

        let result = block_on(engine.request_trip_review());
        assert_eq!(result.unwrap_err().code, 102);
    }
}
