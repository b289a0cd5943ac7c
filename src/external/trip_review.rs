use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::env;

use crate::entities::Coordinates;
use crate::error::{invalid_input_error, upstream_error, Error};
use crate::external::{http_client, ReviewService};

#[derive(Clone, Debug, Deserialize)]
struct Response {
    review: String,
}

/// Client for the backend LLM-review proxy. The crate only supplies start and
/// end coordinates and passes the returned text through untouched.
#[derive(Debug)]
pub struct TripReviewClient {
    client: reqwest::Client,
    api_base: String,
}

impl TripReviewClient {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            client: http_client()?,
            api_base: env::var("REVIEW_API_BASE")?,
        })
    }
}

#[async_trait]
impl ReviewService for TripReviewClient {
    #[tracing::instrument(skip(self))]
    async fn trip_review(&self, start: Coordinates, end: Coordinates) -> Result<String, Error> {
        let url = format!("https://{}/api/review", self.api_base);

        let start: String = start.into();
        let end: String = end.into();

        let res = self
            .client
            .post(url)
            .json(&json!({
                "startCoords": start,
                "endCoords": end,
            }))
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code >= 400 && status_code < 500 {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        let data: Response = res.json().await?;

        Ok(data.review)
    }
}
