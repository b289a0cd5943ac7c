use async_trait::async_trait;
use serde::Deserialize;
use std::env;

use crate::error::{invalid_input_error, upstream_error, Error};
use crate::external::{http_client, RadarService};

const TILE_SIZE: u32 = 256;

#[derive(Clone, Debug, Deserialize)]
struct Response {
    radar: Radar,
}

#[derive(Clone, Debug, Deserialize)]
struct Radar {
    past: Vec<Frame>,
}

#[derive(Clone, Debug, Deserialize)]
struct Frame {
    time: i64,
}

#[derive(Debug)]
pub struct RainviewerClient {
    client: reqwest::Client,
    api_base: String,
}

impl RainviewerClient {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            client: http_client()?,
            api_base: env::var("RAINVIEWER_API_BASE")?,
        })
    }
}

#[async_trait]
impl RadarService for RainviewerClient {
    #[tracing::instrument(skip(self))]
    async fn latest_frame(&self) -> Result<i64, Error> {
        let url = format!("https://{}/public/weather-maps.json", self.api_base);

        let res = self.client.get(url).send().await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        let frame = data.radar.past.last().ok_or_else(upstream_error)?;

        Ok(frame.time)
    }

    fn tile_url(&self, frame_timestamp: i64, color_scheme: u8, z: u8, x: u32, y: u32) -> String {
        format!(
            "https://tilecache.rainviewer.com/v2/radar/{}/{}/{}/{}/{}/{}/1_1.png",
            frame_timestamp, TILE_SIZE, z, x, y, color_scheme
        )
    }
}
