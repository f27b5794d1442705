mod dialog;
mod nav;
mod picker;
mod store;

pub use self::dialog::{AlertKind, Dialog, DialogCapability, DialogOperation, DialogOutput};
pub use self::nav::{Nav, NavCapability, NavOperation};
pub use self::picker::{
    CameraConfig, LibraryConfig, PermissionStatus, Picker, PickerCapability, PickerError,
    PickerOperation, PickerOutput, PickerResult,
};
pub use self::store::{
    Store, StoreCapability, StoreError, StoreOperation, StoreOutput, StoreResult,
};

pub use crux_core::render::Render;
pub use crux_http::Http;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub picker: Picker<Event>,
    pub store: Store<Event>,
    pub dialog: Dialog<Event>,
    pub nav: Nav<Event>,
}
