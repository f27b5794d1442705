use serde::{Deserialize, Serialize};

pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Media reference handed over by the shell picker. The shell resolves the
/// platform uri and passes the encoded bytes along with it, since the core
/// assembles the multipart body itself.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedAsset {
    pub uri: String,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    #[serde(with = "serde_bytes")]
    pub data: Vec<u8>,
}

// Debug skips the byte payload; dumping image data into logs helps no one.
impl std::fmt::Debug for PickedAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickedAsset")
            .field("uri", &self.uri)
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// Canonical upload descriptor for one asset: the multipart part name, file
/// name and content type, plus the bytes to send.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadAsset {
    pub uri: String,
    pub name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl PickedAsset {
    /// Converts into an upload descriptor, or `None` when the uri is absent
    /// (such assets are silently skipped). The file name falls back to a
    /// timestamped name with the extension inferred from the mime type.
    #[must_use]
    pub fn normalize(&self, now_ms: u64) -> Option<UploadAsset> {
        if self.uri.is_empty() {
            return None;
        }

        let mime_type = self
            .mime_type
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        let name = match &self.file_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => {
                let ext = if mime_type.contains("png") { "png" } else { "jpg" };
                format!("photo_{now_ms}.{ext}")
            }
        };

        Some(UploadAsset {
            uri: self.uri.clone(),
            name,
            mime_type,
            data: self.data.clone(),
        })
    }
}

/// Insertion-ordered set of picked assets keyed by uri. A duplicate uri
/// overwrites the stored value in place: last write wins, first-seen order
/// governs iteration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSet {
    entries: Vec<PickedAsset>,
}

impl AssetSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, asset: PickedAsset) {
        if let Some(existing) = self.entries.iter_mut().find(|a| a.uri == asset.uri) {
            *existing = asset;
        } else {
            self.entries.push(asset);
        }
    }

    pub fn merge<I>(&mut self, assets: I)
    where
        I: IntoIterator<Item = PickedAsset>,
    {
        for asset in assets {
            self.insert(asset);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PickedAsset> {
        self.entries.iter()
    }

    #[must_use]
    pub fn uris(&self) -> Vec<String> {
        self.entries.iter().map(|a| a.uri.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(uri: &str, file_name: Option<&str>) -> PickedAsset {
        PickedAsset {
            uri: uri.into(),
            file_name: file_name.map(Into::into),
            mime_type: None,
            data: vec![1, 2, 3],
        }
    }

    #[test]
    fn normalize_skips_missing_uri() {
        assert!(asset("", None).normalize(0).is_none());
    }

    #[test]
    fn normalize_keeps_provided_name_and_type() {
        let picked = PickedAsset {
            uri: "content://photo/1".into(),
            file_name: Some("site.jpeg".into()),
            mime_type: Some("image/jpeg".into()),
            data: vec![],
        };
        let upload = picked.normalize(42).unwrap();
        assert_eq!(upload.name, "site.jpeg");
        assert_eq!(upload.mime_type, "image/jpeg");
    }

    #[test]
    fn normalize_synthesizes_png_name_from_mime() {
        let picked = PickedAsset {
            uri: "content://photo/2".into(),
            file_name: None,
            mime_type: Some("image/png".into()),
            data: vec![],
        };
        let upload = picked.normalize(1_700_000_000_000).unwrap();
        assert_eq!(upload.name, "photo_1700000000000.png");
    }

    #[test]
    fn normalize_defaults_to_jpeg() {
        let upload = asset("content://photo/3", None).normalize(99).unwrap();
        assert_eq!(upload.name, "photo_99.jpg");
        assert_eq!(upload.mime_type, "image/jpeg");
    }

    #[test]
    fn dedup_preserves_first_seen_order_with_last_write_wins() {
        let mut set = AssetSet::new();
        set.merge(vec![asset("a", Some("a1.jpg")), asset("b", Some("b1.jpg"))]);
        set.merge(vec![asset("b", Some("b2.jpg")), asset("c", Some("c1.jpg"))]);

        assert_eq!(set.uris(), vec!["a", "b", "c"]);
        let b = set.iter().find(|a| a.uri == "b").unwrap();
        assert_eq!(b.file_name.as_deref(), Some("b2.jpg"));
    }

    #[test]
    fn clear_empties_the_set() {
        let mut set = AssetSet::new();
        set.insert(asset("a", None));
        set.clear();
        assert!(set.is_empty());
    }
}
