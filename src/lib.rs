#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod asset;
pub mod capabilities;
pub mod config;
pub mod debounce;
pub mod event;
pub mod form;
pub mod model;
pub mod upload;

use serde::{Deserialize, Serialize};

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use event::Event;
pub use model::{Model, Platform, PoleCropRef};

/// Double-tap suppression window for the photo picker and camera buttons.
pub const PICK_DEBOUNCE_MS: u64 = 800;

/// Key under which the shell's secure store holds the session token.
pub const BEARER_TOKEN_KEY: &str = "bearer_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MissingRecord,
    MissingToken,
    Validation,
    Upload,
    Submission,
    Picker,
    CameraPermissionDenied,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            ErrorKind::MissingRecord => "missing_record",
            ErrorKind::MissingToken => "missing_token",
            ErrorKind::Validation => "validation",
            ErrorKind::Upload => "upload",
            ErrorKind::Submission => "submission",
            ErrorKind::Picker => "picker",
            ErrorKind::CameraPermissionDenied => "camera_permission_denied",
            ErrorKind::Internal => "internal",
        }
    }

    #[must_use]
    pub const fn alert_title(self) -> &'static str {
        match self {
            ErrorKind::MissingRecord | ErrorKind::Validation => "Validation",
            ErrorKind::CameraPermissionDenied => "Permission",
            _ => "Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind.code(), self.message)
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

/// Everything the shell needs to render the screen. Rebuilt from the model on
/// every render request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    pub title: String,
    pub range_from: String,
    pub range_to: String,
    pub has_record: bool,
    pub form: form::DisposalForm,
    pub picture_uris: Vec<String>,
    pub auction_section_visible: bool,
    pub uploading: bool,
    pub saving: bool,
    pub can_submit: bool,
    pub error: Option<String>,
}

pub mod app {
    use crate::capabilities::{
        AlertKind, CameraConfig, Capabilities, LibraryConfig, PickerOutput, PickerResult,
        StoreOutput, StoreResult,
    };
    use crate::event::{Event, Secret};
    use crate::model::Model;
    use crate::upload::{
        build_upload_form, extract_urls, is_truthy, UploadResponse,
    };
    use crate::{AppError, ErrorKind, ViewModel, BEARER_TOKEN_KEY};
    use serde::Deserialize;

    const CAMERA_RATIONALE: &str =
        "Camera access is needed to photograph the disposal site.";
    const NO_RECORD_MESSAGE: &str =
        "No pole crop record selected. Go back and choose a record first.";
    const MISSING_TOKEN_MESSAGE: &str = "Missing Bearer token. Please sign in again.";

    /// Minimal shape of the API's JSON envelope, parsed tolerantly so an
    /// unexpected body never turns a definitive HTTP status into a parse
    /// error.
    #[derive(Debug, Default, Deserialize)]
    struct ServerAck {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        error: Option<String>,
    }

    #[derive(Default)]
    pub struct App;

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            match event {
                Event::ScreenOpened {
                    pole_crop,
                    platform,
                } => {
                    *model = Model::new(model.config.clone());
                    model.pole_crop = pole_crop;
                    model.platform = platform;
                    caps.render.render();
                }

                Event::FieldChanged { field, value } => {
                    model.form.set(field, value);
                    caps.render.render();
                }
                Event::PeedaActToggled(value) => {
                    model.form.peeda_act = value;
                    caps.render.render();
                }
                Event::AuctionToggled(value) => {
                    model.form.auction = value;
                    caps.render.render();
                }

                Event::LibraryPickTapped { now_ms } => {
                    if model.is_busy() || !model.pick_cooldown.try_fire(now_ms) {
                        return;
                    }
                    caps.picker.pick_from_library(LibraryConfig::default(), |r| {
                        Event::PickerCompleted(Box::new(r))
                    });
                }
                Event::CameraCaptureTapped { now_ms } => {
                    if model.is_busy() || !model.pick_cooldown.try_fire(now_ms) {
                        return;
                    }
                    if model.platform.requires_camera_permission() {
                        caps.picker.request_camera_permission(CAMERA_RATIONALE, |r| {
                            Event::CameraPermissionResolved(Box::new(r))
                        });
                    } else {
                        caps.picker.capture_from_camera(CameraConfig::default(), |r| {
                            Event::PickerCompleted(Box::new(r))
                        });
                    }
                }
                Event::CameraPermissionResolved(result) => {
                    self.handle_permission(*result, model, caps);
                }
                Event::PickerCompleted(result) => {
                    self.handle_picker(*result, model, caps);
                }
                Event::ClearPicturesTapped => {
                    model.assets.clear();
                    caps.render.render();
                }

                Event::SubmitTapped { now_ms } => {
                    if model.is_busy() {
                        return;
                    }
                    model.clear_error();
                    if let Err(error) = validate(model) {
                        self.report(model, caps, error);
                        return;
                    }
                    model.saving = true;
                    model.submit_started_ms = now_ms;
                    caps.render.render();
                    caps.store.read(BEARER_TOKEN_KEY, Event::TokenLoaded);
                }
                Event::TokenLoaded(result) => {
                    self.handle_token(result, model, caps);
                }
                Event::UploadCompleted(result) => {
                    model.uploading = false;
                    match parse_upload_result(result) {
                        Ok(urls) => {
                            tracing::debug!(count = urls.len(), "bucket upload complete");
                            model.pictures = urls;
                            self.send_submission(model, caps);
                        }
                        Err(error) => self.fail(model, caps, error),
                    }
                }
                Event::SubmitCompleted(result) => match parse_submit_result(result) {
                    Ok(()) => {
                        model.saving = false;
                        model.bearer_token = None;
                        model.clear_error();
                        caps.render.render();
                        caps.dialog.alert(
                            AlertKind::Success,
                            "Success",
                            "Disposal record saved.",
                            Event::SuccessAcknowledged,
                        );
                    }
                    Err(error) => self.fail(model, caps, error),
                },

                Event::SuccessAcknowledged(_) => {
                    caps.nav.pop();
                }
                Event::AlertDismissed(_) => {
                    model.clear_error();
                    caps.render.render();
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            let (range_from, range_to) = model
                .pole_crop
                .as_ref()
                .map(|p| (p.range_from.clone(), p.range_to.clone()))
                .unwrap_or_default();

            ViewModel {
                title: "Pole Crop Disposal".to_string(),
                range_from,
                range_to,
                has_record: model.pole_crop.is_some(),
                form: model.form.clone(),
                picture_uris: model.assets.uris(),
                auction_section_visible: model.form.auction,
                uploading: model.uploading,
                saving: model.saving,
                can_submit: model.pole_crop.is_some() && !model.is_busy(),
                error: model.active_error.as_ref().map(|e| e.message.clone()),
            }
        }
    }

    impl App {
        fn handle_permission(
            &self,
            result: PickerResult,
            model: &mut Model,
            caps: &Capabilities,
        ) {
            match result {
                Ok(PickerOutput::Permission(status)) if status.is_granted() => {
                    caps.picker.capture_from_camera(CameraConfig::default(), |r| {
                        Event::PickerCompleted(Box::new(r))
                    });
                }
                Ok(PickerOutput::Permission(_)) | Err(_) => {
                    self.report(
                        model,
                        caps,
                        AppError::new(
                            ErrorKind::CameraPermissionDenied,
                            "Camera permission is required to take photos.",
                        ),
                    );
                }
                Ok(_) => {}
            }
        }

        fn handle_picker(&self, result: PickerResult, model: &mut Model, caps: &Capabilities) {
            match result {
                Ok(PickerOutput::Assets(assets)) => {
                    model.assets.merge(assets);
                    caps.render.render();
                }
                Ok(PickerOutput::Cancelled | PickerOutput::Permission(_)) => {}
                Err(error) => {
                    self.report(
                        model,
                        caps,
                        AppError::new(ErrorKind::Picker, error.to_string()),
                    );
                }
            }
        }

        fn handle_token(&self, result: StoreResult, model: &mut Model, caps: &Capabilities) {
            match result {
                Ok(StoreOutput::Value(Some(token))) if !token.trim().is_empty() => {
                    model.bearer_token = Some(Secret::new(token));
                    self.start_upload(model, caps);
                }
                Ok(StoreOutput::Value(_)) => {
                    self.fail(
                        model,
                        caps,
                        AppError::new(ErrorKind::MissingToken, MISSING_TOKEN_MESSAGE),
                    );
                }
                Err(error) => {
                    tracing::warn!(error = %error, "secure store read failed");
                    self.fail(
                        model,
                        caps,
                        AppError::new(ErrorKind::MissingToken, MISSING_TOKEN_MESSAGE),
                    );
                }
            }
        }

        fn start_upload(&self, model: &mut Model, caps: &Capabilities) {
            let uploads: Vec<_> = model
                .assets
                .iter()
                .filter_map(|a| a.normalize(model.submit_started_ms))
                .collect();

            if uploads.is_empty() {
                model.pictures = Vec::new();
                self.send_submission(model, caps);
                return;
            }

            model.uploading = true;
            caps.render.render();

            let form = build_upload_form(&uploads, &model.config);
            let content_type = form.content_type();
            caps.http
                .post(model.config.upload_url())
                .header("Content-Type", content_type.as_str())
                .body_bytes(form.finish())
                .send(Event::UploadCompleted);
        }

        fn send_submission(&self, model: &mut Model, caps: &Capabilities) {
            let Some(pole_crop) = model.pole_crop.as_ref() else {
                self.fail(
                    model,
                    caps,
                    AppError::new(ErrorKind::MissingRecord, NO_RECORD_MESSAGE),
                );
                return;
            };
            let Some(token) = model.bearer_token.as_ref() else {
                self.fail(
                    model,
                    caps,
                    AppError::new(ErrorKind::MissingToken, MISSING_TOKEN_MESSAGE),
                );
                return;
            };

            let payload = model.form.to_payload(pole_crop.id, model.pictures.clone());
            let auth = format!("Bearer {}", token.expose());
            let builder = caps
                .http
                .post(model.config.disposal_url())
                .header("Authorization", auth.as_str())
                .body_json(&payload);

            match builder {
                Ok(request) => request.send(Event::SubmitCompleted),
                Err(error) => {
                    let error = AppError::new(ErrorKind::Internal, error.to_string());
                    self.fail(model, caps, error);
                }
            }
        }

        /// Aborts an in-flight submission and surfaces the error.
        fn fail(&self, model: &mut Model, caps: &Capabilities, error: AppError) {
            model.saving = false;
            model.uploading = false;
            model.bearer_token = None;
            self.report(model, caps, error);
        }

        fn report(&self, model: &mut Model, caps: &Capabilities, error: AppError) {
            tracing::warn!(kind = error.kind.code(), message = %error.message, "screen error");
            caps.dialog.alert(
                AlertKind::Error,
                error.kind.alert_title(),
                error.message.clone(),
                Event::AlertDismissed,
            );
            model.set_error(error);
            caps.render.render();
        }
    }

    fn validate(model: &Model) -> Result<(), AppError> {
        if model.pole_crop.is_none() {
            return Err(AppError::new(ErrorKind::MissingRecord, NO_RECORD_MESSAGE));
        }
        model
            .form
            .validate()
            .map_err(|e| AppError::new(ErrorKind::Validation, e.to_string()))
    }

    fn parse_upload_result(
        result: crux_http::Result<crux_http::Response<Vec<u8>>>,
    ) -> Result<Vec<String>, AppError> {
        let mut response =
            result.map_err(|e| AppError::new(ErrorKind::Upload, e.to_string()))?;
        let status: u16 = response.status().into();
        let body = response.take_body().unwrap_or_default();
        let parsed: UploadResponse = serde_json::from_slice(&body).unwrap_or_default();

        if !(200..300).contains(&status) || !is_truthy(&parsed.status) {
            let detail = parsed
                .message
                .or(parsed.error)
                .unwrap_or_else(|| format!("upload failed ({status})"));
            return Err(AppError::new(ErrorKind::Upload, detail));
        }

        Ok(extract_urls(&parsed.data))
    }

    fn parse_submit_result(
        result: crux_http::Result<crux_http::Response<Vec<u8>>>,
    ) -> Result<(), AppError> {
        let mut response =
            result.map_err(|e| AppError::new(ErrorKind::Submission, e.to_string()))?;
        let status: u16 = response.status().into();
        if (200..300).contains(&status) {
            return Ok(());
        }

        let body = response.take_body().unwrap_or_default();
        let parsed: ServerAck = serde_json::from_slice(&body).unwrap_or_default();
        let detail = parsed
            .message
            .or(parsed.error)
            .unwrap_or_else(|| format!("save failed ({status})"));
        Err(AppError::new(ErrorKind::Submission, detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::model::PoleCropRef;
    use crux_core::App as _;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ErrorKind::MissingToken.code(), "missing_token");
        assert_eq!(ErrorKind::Upload.code(), "upload");
        assert_eq!(ErrorKind::Validation.alert_title(), "Validation");
        assert_eq!(ErrorKind::Submission.alert_title(), "Error");
    }

    #[test]
    fn error_display_includes_code_and_message() {
        let error = AppError::new(ErrorKind::Upload, "bucket rejected");
        assert_eq!(error.to_string(), "[upload] bucket rejected");
    }

    #[test]
    fn view_without_record_disables_submit() {
        let app = App::default();
        let model = Model::default();
        let view = app.view(&model);

        assert!(!view.has_record);
        assert!(!view.can_submit);
        assert_eq!(view.title, "Pole Crop Disposal");
    }

    #[test]
    fn view_surfaces_record_range_and_error() {
        let app = App::default();
        let mut model = Model::new(ApiConfig::default());
        model.pole_crop = Some(PoleCropRef {
            id: 12,
            range_from: "120/4".into(),
            range_to: "121/2".into(),
        });
        model.set_error(AppError::new(ErrorKind::Upload, "bucket rejected"));

        let view = app.view(&model);
        assert!(view.has_record);
        assert!(view.can_submit);
        assert_eq!(view.range_from, "120/4");
        assert_eq!(view.range_to, "121/2");
        assert_eq!(view.error.as_deref(), Some("bucket rejected"));
    }

    #[test]
    fn view_reflects_busy_flags() {
        let app = App::default();
        let mut model = Model::new(ApiConfig::default());
        model.pole_crop = Some(PoleCropRef {
            id: 1,
            range_from: "a".into(),
            range_to: "b".into(),
        });
        model.saving = true;

        let view = app.view(&model);
        assert!(view.saving);
        assert!(!view.can_submit);
    }
}
