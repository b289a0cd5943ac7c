use viator::api::{PlanAPI, RadarAPI, WaypointAPI};
use viator::engine::Engine;
use viator::entities::{Coordinates, PlanRouteRequest, RouteSource};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let engine = Engine::from_env().unwrap();

    engine.add_pin(Coordinates::new(43.826, -111.7897)).unwrap();
    engine.add_pin(Coordinates::new(43.4917, -112.0341)).unwrap();

    let plan = engine
        .plan_trip(PlanRouteRequest {
            source: RouteSource::DirectPins,
        })
        .await
        .unwrap();

    tracing::info!(
        distance_meters = plan.route.distance_meters,
        duration_seconds = plan.route.duration_seconds,
        points = plan.route.path.len(),
        "route computed"
    );

    for sample in &plan.weather {
        tracing::info!(
            waypoint_id = %sample.waypoint_id,
            temperature_c = ?sample.temperature_c,
            condition = ?sample.condition,
            status = ?sample.status,
            "waypoint weather"
        );
    }

    match engine.toggle_radar(2).await {
        Ok(status) => tracing::info!(status = %status.name(), "radar overlay"),
        Err(err) => tracing::warn!(%err, "radar unavailable"),
    }
}
