use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const DEFAULT_UPLOAD_PATH: &str = "PolecropDisposal";
pub const DEFAULT_IS_MULTI: &str = "true";
pub const DEFAULT_FILE_NAME_KEY: &str = "chan";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {which} base url '{url}': {reason}")]
    InvalidBaseUrl {
        which: &'static str,
        url: String,
        reason: String,
    },
}

/// Endpoint configuration for the disposal screen. Held by the model so tests
/// can substitute their own endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    api_base: String,
    bucket_base: String,
    pub upload_path: String,
    pub is_multi: String,
    pub file_name_key: String,
}

impl ApiConfig {
    pub fn new(
        api_base: impl Into<String>,
        bucket_base: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: Self::check_base("api", api_base.into())?,
            bucket_base: Self::check_base("bucket", bucket_base.into())?,
            upload_path: DEFAULT_UPLOAD_PATH.into(),
            is_multi: DEFAULT_IS_MULTI.into(),
            file_name_key: DEFAULT_FILE_NAME_KEY.into(),
        })
    }

    fn check_base(which: &'static str, url: String) -> Result<String, ConfigError> {
        let parsed = Url::parse(&url).map_err(|e| ConfigError::InvalidBaseUrl {
            which,
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(ConfigError::InvalidBaseUrl {
                which,
                url,
                reason: format!("scheme '{scheme}' is not allowed"),
            });
        }

        if parsed.host_str().is_none() {
            return Err(ConfigError::InvalidBaseUrl {
                which,
                url,
                reason: "missing host".to_string(),
            });
        }

        Ok(parsed.to_string().trim_end_matches('/').to_string())
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn bucket_base(&self) -> &str {
        &self.bucket_base
    }

    /// Bucket ingestion endpoint (multipart).
    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.bucket_base)
    }

    /// Disposal submission endpoint (JSON).
    pub fn disposal_url(&self) -> String {
        format!("{}/polecrop/disposal", self.api_base)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.polecrop.example.com".into(),
            bucket_base: "https://files.polecrop.example.com".into(),
            upload_path: DEFAULT_UPLOAD_PATH.into(),
            is_multi: DEFAULT_IS_MULTI.into(),
            file_name_key: DEFAULT_FILE_NAME_KEY.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_https_base() {
        let config = ApiConfig::new("https://api.example.com", "https://files.example.com");
        assert!(config.is_ok());
    }

    #[test]
    fn rejects_non_http_scheme() {
        let result = ApiConfig::new("ftp://api.example.com", "https://files.example.com");
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { which: "api", .. })));
    }

    #[test]
    fn rejects_unparseable_base() {
        let result = ApiConfig::new("https://api.example.com", "not a url");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidBaseUrl { which: "bucket", .. })
        ));
    }

    #[test]
    fn strips_trailing_slash_before_joining() {
        let config =
            ApiConfig::new("https://api.example.com/", "https://files.example.com/").unwrap();
        assert_eq!(config.upload_url(), "https://files.example.com/upload");
        assert_eq!(
            config.disposal_url(),
            "https://api.example.com/polecrop/disposal"
        );
    }

    #[test]
    fn defaults_carry_fixed_scalar_fields() {
        let config = ApiConfig::default();
        assert_eq!(config.upload_path, "PolecropDisposal");
        assert_eq!(config.is_multi, "true");
        assert_eq!(config.file_name_key, "chan");
    }
}
