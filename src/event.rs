use serde::{Deserialize, Serialize};
use std::fmt;

use crate::capabilities::{DialogOutput, PickerResult, StoreResult};
use crate::form::FormField;
use crate::model::{Platform, PoleCropRef};

/// Bearer token wrapper with a redacted `Debug`, so the token never leaks
/// into logs or test failure output.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Event {
    /// The shell opened the screen, handing over the selected record and the
    /// platform it runs on. Resets any previous screen state.
    ScreenOpened {
        pole_crop: Option<PoleCropRef>,
        platform: Platform,
    },

    FieldChanged {
        field: FormField,
        value: String,
    },
    PeedaActToggled(bool),
    AuctionToggled(bool),

    LibraryPickTapped {
        now_ms: u64,
    },
    CameraCaptureTapped {
        now_ms: u64,
    },
    CameraPermissionResolved(Box<PickerResult>),
    PickerCompleted(Box<PickerResult>),
    ClearPicturesTapped,

    SubmitTapped {
        now_ms: u64,
    },
    TokenLoaded(StoreResult),
    #[serde(skip)]
    UploadCompleted(crux_http::Result<crux_http::Response<Vec<u8>>>),
    #[serde(skip)]
    SubmitCompleted(crux_http::Result<crux_http::Response<Vec<u8>>>),

    SuccessAcknowledged(DialogOutput),
    AlertDismissed(DialogOutput),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_debug_is_redacted() {
        let secret = Secret::new("tok-abc-123");
        assert_eq!(format!("{secret:?}"), "[REDACTED]");
        assert_eq!(secret.expose(), "tok-abc-123");
    }

    #[test]
    fn shell_events_deserialize() {
        let event: Event =
            serde_json::from_str(r#"{"SubmitTapped":{"now_ms":1700000000000}}"#).unwrap();
        assert!(matches!(event, Event::SubmitTapped { now_ms } if now_ms == 1_700_000_000_000));
    }
}
