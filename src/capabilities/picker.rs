use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset::PickedAsset;
use crate::event::Event;

pub const DEFAULT_QUALITY: u8 = 85;

/// Photo acquisition capability. The shell owns the platform picker and
/// camera UI; the core only ever sees the resulting assets.
pub struct Picker<E> {
    context: CapabilityContext<PickerOperation, E>,
}

impl<Ev> Capability<Ev> for Picker<Ev> {
    type Operation = PickerOperation;
    type MappedSelf<MappedEv> = Picker<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Picker::new(self.context.map_event(f))
    }
}

impl<E> Picker<E>
where
    E: 'static,
{
    pub fn new(context: CapabilityContext<PickerOperation, E>) -> Self {
        Self { context }
    }

    pub fn request_camera_permission<F>(&self, rationale: impl Into<String>, make_event: F)
    where
        F: FnOnce(PickerResult) -> E + Send + 'static,
        E: Send,
    {
        self.request(
            PickerOperation::RequestCameraPermission {
                rationale: rationale.into(),
            },
            make_event,
        );
    }

    pub fn pick_from_library<F>(&self, config: LibraryConfig, make_event: F)
    where
        F: FnOnce(PickerResult) -> E + Send + 'static,
        E: Send,
    {
        self.request(PickerOperation::PickFromLibrary { config }, make_event);
    }

    pub fn capture_from_camera<F>(&self, config: CameraConfig, make_event: F)
    where
        F: FnOnce(PickerResult) -> E + Send + 'static,
        E: Send,
    {
        self.request(PickerOperation::CaptureFromCamera { config }, make_event);
    }

    fn request<F>(&self, operation: PickerOperation, make_event: F)
    where
        F: FnOnce(PickerResult) -> E + Send + 'static,
        E: Send,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}

pub type PickerCapability = Picker<Event>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PickerOperation {
    RequestCameraPermission { rationale: String },
    PickFromLibrary { config: LibraryConfig },
    CaptureFromCamera { config: CameraConfig },
}

impl Operation for PickerOperation {
    type Output = PickerResult;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryConfig {
    pub quality: u8,
    pub allow_multiple: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            allow_multiple: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CameraConfig {
    pub quality: u8,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionStatus {
    Granted,
    Denied,
    DeniedPermanently,
}

impl PermissionStatus {
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PickerOutput {
    Permission(PermissionStatus),
    Assets(Vec<PickedAsset>),
    Cancelled,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum PickerError {
    #[error("camera permission denied")]
    PermissionDenied,

    #[error("picker unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("picker failed: {reason}")]
    Failed { reason: String },
}

pub type PickerResult = Result<PickerOutput, PickerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_config_defaults_to_multi_select() {
        let config = LibraryConfig::default();
        assert_eq!(config.quality, DEFAULT_QUALITY);
        assert!(config.allow_multiple);
    }

    #[test]
    fn permission_status_granted_check() {
        assert!(PermissionStatus::Granted.is_granted());
        assert!(!PermissionStatus::Denied.is_granted());
        assert!(!PermissionStatus::DeniedPermanently.is_granted());
    }

    #[test]
    fn operations_round_trip_through_serde() {
        let op = PickerOperation::PickFromLibrary {
            config: LibraryConfig::default(),
        };
        let json = serde_json::to_string(&op).unwrap();
        let back: PickerOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(op, back);
    }
}
