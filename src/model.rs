use serde::{Deserialize, Serialize};

use crate::asset::AssetSet;
use crate::config::ApiConfig;
use crate::debounce::Cooldown;
use crate::event::Secret;
use crate::form::DisposalForm;
use crate::{AppError, PICK_DEBOUNCE_MS};

/// The pole crop record the disposal is filed against, as selected on the
/// previous screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoleCropRef {
    pub id: i64,
    pub range_from: String,
    pub range_to: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    #[default]
    Android,
    Ios,
}

impl Platform {
    /// Only Android gates camera capture behind a runtime permission prompt;
    /// iOS prompts inside the system camera UI.
    #[must_use]
    pub fn requires_camera_permission(self) -> bool {
        matches!(self, Platform::Android)
    }
}

#[derive(Debug)]
pub struct Model {
    pub config: ApiConfig,
    pub platform: Platform,
    pub pole_crop: Option<PoleCropRef>,
    pub form: DisposalForm,
    pub assets: AssetSet,
    pub pick_cooldown: Cooldown,
    pub uploading: bool,
    pub saving: bool,
    pub bearer_token: Option<Secret>,
    pub submit_started_ms: u64,
    pub pictures: Vec<String>,
    pub active_error: Option<AppError>,
}

impl Model {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            platform: Platform::default(),
            pole_crop: None,
            form: DisposalForm::default(),
            assets: AssetSet::new(),
            pick_cooldown: Cooldown::new(PICK_DEBOUNCE_MS),
            uploading: false,
            saving: false,
            bearer_token: None,
            submit_started_ms: 0,
            pictures: Vec::new(),
            active_error: None,
        }
    }

    /// Submission in flight, in either phase.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.saving || self.uploading
    }

    pub fn set_error(&mut self, error: AppError) {
        self.active_error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.active_error = None;
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_model_is_idle() {
        let model = Model::default();
        assert!(!model.is_busy());
        assert!(model.pole_crop.is_none());
        assert!(model.assets.is_empty());
    }

    #[test]
    fn busy_while_either_phase_runs() {
        let mut model = Model::new(ApiConfig::default());
        model.uploading = true;
        assert!(model.is_busy());
        model.uploading = false;
        model.saving = true;
        assert!(model.is_busy());
    }

    #[test]
    fn only_android_requires_camera_permission() {
        assert!(Platform::Android.requires_camera_permission());
        assert!(!Platform::Ios.requires_camera_permission());
    }
}
