use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{invalid_state_error, Error};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum RadarStatus {
    Hidden,
    Loading,
    Visible {
        frame_timestamp: i64,
        color_scheme: u8,
        layer_handle: Uuid,
    },
}

impl RadarStatus {
    pub fn name(&self) -> String {
        match self {
            Self::Hidden => "hidden".into(),
            Self::Loading => "loading".into(),
            Self::Visible { .. } => "visible".into(),
        }
    }
}

/// The toggled precipitation overlay. One instance per session; every
/// transition is guarded so a fetch racing a toggle cannot produce a half
/// visible layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RadarOverlay {
    pub status: RadarStatus,
}

impl Default for RadarOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl RadarOverlay {
    pub fn new() -> Self {
        Self {
            status: RadarStatus::Hidden,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, RadarStatus::Loading)
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.status, RadarStatus::Visible { .. })
    }

    #[tracing::instrument]
    pub fn begin_loading(&mut self) -> Result<(), Error> {
        match self.status {
            RadarStatus::Hidden => {
                self.status = RadarStatus::Loading;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    /// Completes a fetch, caching the frame timestamp under a fresh opaque
    /// layer handle.
    #[tracing::instrument]
    pub fn display_frame(&mut self, frame_timestamp: i64, color_scheme: u8) -> Result<Uuid, Error> {
        match self.status {
            RadarStatus::Loading => {
                let layer_handle = Uuid::new_v4();
                self.status = RadarStatus::Visible {
                    frame_timestamp,
                    color_scheme,
                    layer_handle,
                };
                Ok(layer_handle)
            }
            _ => Err(invalid_state_error()),
        }
    }

    /// A failed fetch falls back to Hidden rather than leaving a zombie
    /// Loading state.
    #[tracing::instrument]
    pub fn fetch_failed(&mut self) -> Result<(), Error> {
        match self.status {
            RadarStatus::Loading => {
                self.status = RadarStatus::Hidden;
                Ok(())
            }
            _ => Err(invalid_state_error()),
        }
    }

    /// Pure removal; the cached handle is discarded and returned so the
    /// caller can drop the layer it refers to. No network call involved.
    #[tracing::instrument]
    pub fn hide(&mut self) -> Result<Uuid, Error> {
        match self.status {
            RadarStatus::Visible { layer_handle, .. } => {
                self.status = RadarStatus::Hidden;
                Ok(layer_handle)
            }
            _ => Err(invalid_state_error()),
        }
    }
}

#[test]
fn fetch_success_reaches_visible() {
    let mut overlay = RadarOverlay::new();

    overlay.begin_loading().unwrap();
    assert!(overlay.is_loading());

    let handle = overlay.display_frame(1_700_000_000, 2).unwrap();

    match overlay.status {
        RadarStatus::Visible {
            frame_timestamp,
            color_scheme,
            layer_handle,
        } => {
            assert_eq!(frame_timestamp, 1_700_000_000);
            assert_eq!(color_scheme, 2);
            assert_eq!(layer_handle, handle);
        }
        _ => panic!("expected visible"),
    }
}

#[test]
fn fetch_failure_falls_back_to_hidden() {
    let mut overlay = RadarOverlay::new();

    overlay.begin_loading().unwrap();
    overlay.fetch_failed().unwrap();

    assert_eq!(overlay.status, RadarStatus::Hidden);
}

#[test]
fn hide_discards_the_cached_handle() {
    let mut overlay = RadarOverlay::new();

    overlay.begin_loading().unwrap();
    let handle = overlay.display_frame(1_700_000_000, 4).unwrap();

    assert_eq!(overlay.hide().unwrap(), handle);
    assert_eq!(overlay.status, RadarStatus::Hidden);
}

#[test]
fn transitions_are_guarded() {
    let mut overlay = RadarOverlay::new();

    // nothing to hide or complete while hidden
    assert!(overlay.hide().is_err());
    assert!(overlay.display_frame(0, 0).is_err());

    overlay.begin_loading().unwrap();
    // a second toggle cannot restart the fetch
    assert!(overlay.begin_loading().is_err());
}
