use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::asset::UploadAsset;
use crate::config::ApiConfig;

/// Hand-rolled `multipart/form-data` encoder. The core ships fully assembled
/// request bodies to the shell, so the body has to be built here rather than
/// by the shell's HTTP client.
pub struct MultipartForm {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartForm {
    #[must_use]
    pub fn new() -> Self {
        Self {
            boundary: format!("----polecrop-{}", Uuid::new_v4().simple()),
            body: Vec::new(),
        }
    }

    pub fn text(&mut self, name: &str, value: &str) {
        self.open_part();
        self.body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        self.body.extend_from_slice(value.as_bytes());
        self.body.extend_from_slice(b"\r\n");
    }

    pub fn file(&mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) {
        self.open_part();
        self.body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
    }

    fn open_part(&mut self) {
        self.body
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
    }

    #[must_use]
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Appends the closing boundary and returns the finished body.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembles the bucket upload form: one `files` part per asset, then the
/// scalar routing fields the bucket expects.
#[must_use]
pub fn build_upload_form(assets: &[UploadAsset], config: &ApiConfig) -> MultipartForm {
    let mut form = MultipartForm::new();
    for asset in assets {
        form.file("files", &asset.name, &asset.mime_type, &asset.data);
    }
    form.text("uploadPath", &config.upload_path);
    form.text("isMulti", &config.is_multi);
    form.text("fileName", &config.file_name_key);
    form
}

/// Bucket upload response. `status` is deliberately loose: the bucket has been
/// seen returning booleans, numbers and strings in that slot.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub status: Value,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Vec<UploadedItem>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UploadedItem {
    #[serde(rename = "availableSizes", default)]
    pub available_sizes: Option<AvailableSizes>,
    #[serde(default)]
    pub url: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AvailableSizes {
    #[serde(default)]
    pub image: Option<String>,
}

/// Javascript-style truthiness for the loose `status` slot.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Collects picture urls from the upload response items. The preferred
/// `availableSizes.image` url is taken as-is for each item; entries of the
/// fallback `url` array are only added when not already collected.
#[must_use]
pub fn extract_urls(items: &[UploadedItem]) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for item in items {
        if let Some(image) = item
            .available_sizes
            .as_ref()
            .and_then(|s| s.image.as_ref())
        {
            urls.push(image.clone());
        }
        for url in &item.url {
            if !urls.contains(url) {
                urls.push(url.clone());
            }
        }
    }
    urls
}
