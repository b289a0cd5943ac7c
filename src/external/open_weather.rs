use async_trait::async_trait;
use serde::Deserialize;
use std::env;

use crate::entities::Coordinates;
use crate::error::{invalid_input_error, upstream_error, Error};
use crate::external::{http_client, Conditions, WeatherService};

const KELVIN_OFFSET: f64 = 273.15;

#[derive(Clone, Debug, Deserialize)]
struct Response {
    name: Option<String>,
    main: Main,
    weather: Vec<WeatherEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct Main {
    /// OpenWeather's native unit is Kelvin.
    temp: f64,
}

#[derive(Clone, Debug, Deserialize)]
struct WeatherEntry {
    main: String,
}

#[derive(Debug)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_base: String,
    key: String,
}

impl OpenWeatherClient {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            client: http_client()?,
            api_base: env::var("OPENWEATHER_API_BASE")?,
            key: env::var("OPENWEATHER_API_KEY")?,
        })
    }
}

/// Unit normalization happens here, once, so downstream consumers only ever
/// see Celsius.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}

#[async_trait]
impl WeatherService for OpenWeatherClient {
    #[tracing::instrument(skip(self))]
    async fn current_conditions(&self, coordinates: Coordinates) -> Result<Conditions, Error> {
        let url = format!("https://{}/data/2.5/weather", self.api_base);

        let res = self
            .client
            .get(url)
            .query(&[("appid", self.key.as_str())])
            .query(&[("lat", coordinates.latitude)])
            .query(&[("lon", coordinates.longitude)])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        let condition = data
            .weather
            .first()
            .map(|entry| entry.main.clone())
            .unwrap_or_else(|| "unknown".into());

        Ok(Conditions {
            temperature_c: kelvin_to_celsius(data.main.temp),
            condition,
            location_name: data.name.filter(|name| !name.is_empty()),
        })
    }
}

#[test]
fn kelvin_is_converted_once_at_the_boundary() {
    assert!((kelvin_to_celsius(273.15) - 0.0).abs() < f64::EPSILON);
    assert!((kelvin_to_celsius(293.15) - 20.0).abs() < 1e-9);
}
