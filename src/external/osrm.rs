use async_trait::async_trait;
use serde::Deserialize;
use std::env;

use crate::entities::{Coordinates, Route};
use crate::error::{invalid_input_error, upstream_error, Error};
use crate::external::{http_client, RoutingService};

#[derive(Clone, Debug, Deserialize)]
struct Response {
    code: String,
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Clone, Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: Geometry,
}

#[derive(Clone, Debug, Deserialize)]
struct Geometry {
    /// GeoJSON positions, longitude first.
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug)]
pub struct OsrmRouter {
    client: reqwest::Client,
    api_base: String,
}

impl OsrmRouter {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            client: http_client()?,
            api_base: env::var("OSRM_API_BASE")?,
        })
    }
}

#[async_trait]
impl RoutingService for OsrmRouter {
    #[tracing::instrument(skip(self))]
    async fn route(&self, waypoints: &[Coordinates]) -> Result<Route, Error> {
        // OSRM takes the waypoint sequence in the path, longitude first,
        // and visits it in the given order.
        let sequence = waypoints
            .iter()
            .map(|c| format!("{},{}", c.longitude, c.latitude))
            .collect::<Vec<_>>()
            .join(";");

        let url = format!("https://{}/route/v1/driving/{}", self.api_base, sequence);

        let res = self
            .client
            .get(url)
            .query(&[("overview", "full")])
            .query(&[("geometries", "geojson")])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        if data.code != "Ok" {
            return Err(upstream_error());
        }

        let route = data
            .routes
            .and_then(|mut routes| {
                if routes.is_empty() {
                    None
                } else {
                    Some(routes.remove(0))
                }
            })
            .ok_or_else(upstream_error)?;

        let path = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[longitude, latitude]| Coordinates::new(latitude, longitude))
            .collect();

        Ok(Route::new(path, route.distance, route.duration))
    }
}
