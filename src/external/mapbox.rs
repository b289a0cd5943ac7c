use async_trait::async_trait;
use serde::Deserialize;
use std::env;

use crate::entities::Coordinates;
use crate::error::{invalid_input_error, resolution_failed_error, upstream_error, Error};
use crate::external::{http_client, GeocodingService};

#[derive(Clone, Debug, Deserialize)]
struct Response {
    features: Vec<Feature>,
}

#[derive(Clone, Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Clone, Debug, Deserialize)]
struct Geometry {
    /// GeoJSON position, longitude first.
    coordinates: [f64; 2],
}

#[derive(Debug)]
pub struct MapboxGeocoder {
    client: reqwest::Client,
    api_base: String,
    key: String,
}

impl MapboxGeocoder {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            client: http_client()?,
            api_base: env::var("MAPBOX_API_BASE")?,
            key: env::var("MAPBOX_DEV_KEY")?,
        })
    }
}

#[async_trait]
impl GeocodingService for MapboxGeocoder {
    #[tracing::instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<Coordinates, Error> {
        let url = format!("https://{}/search/geocode/v6/forward", self.api_base);

        let res = self
            .client
            .get(url)
            .query(&[("access_token", self.key.as_str())])
            .query(&[("q", query)])
            .query(&[("limit", "1")])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        let feature = data
            .features
            .first()
            .ok_or_else(|| resolution_failed_error(query))?;

        let [longitude, latitude] = feature.geometry.coordinates;
        Ok(Coordinates::new(latitude, longitude))
    }
}
