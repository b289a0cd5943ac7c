use super::Engine;

use async_trait::async_trait;

use crate::api::RadarAPI;
use crate::entities::RadarStatus;
use crate::error::{invalid_state_error, Error};

#[async_trait]
impl RadarAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn toggle_radar(&self, color_scheme: u8) -> Result<RadarStatus, Error> {
        {
            let mut overlay = self.radar_overlay();

            // policy: a toggle while a fetch is outstanding is ignored until
            // the fetch settles
            if overlay.is_loading() {
                return Ok(overlay.status.clone());
            }

            if overlay.is_visible() {
                overlay.hide()?;
                return Ok(overlay.status.clone());
            }

            overlay.begin_loading()?;
        }

        // lock released while the discovery call is in flight
        match self.radar_frames.latest_frame().await {
            Ok(frame_timestamp) => {
                let mut overlay = self.radar_overlay();
                overlay.display_frame(frame_timestamp, color_scheme)?;
                Ok(overlay.status.clone())
            }
            Err(err) => {
                tracing::warn!(%err, "radar frame discovery failed");
                self.radar_overlay().fetch_failed()?;
                Err(err)
            }
        }
    }

    fn radar_status(&self) -> RadarStatus {
        self.radar_overlay().status.clone()
    }

    fn radar_tile_url(&self, z: u8, x: u32, y: u32) -> Result<String, Error> {
        match self.radar_overlay().status {
            RadarStatus::Visible {
                frame_timestamp,
                color_scheme,
                ..
            } => Ok(self
                .radar_frames
                .tile_url(frame_timestamp, color_scheme, z, x, y)),
            _ => Err(invalid_state_error()),
        }
    }
}
