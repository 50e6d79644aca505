//! Storage configuration types.

use std::path::PathBuf;

use agora_shared::config::{StorageBackend, StorageSettings};
use serde::{Deserialize, Serialize};

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: AWS S3, Cloudflare R2, MinIO
    S3 {
        /// S3 bucket name.
        bucket: String,
        /// AWS region.
        region: String,
        /// Custom endpoint for non-AWS services.
        endpoint: Option<String>,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-process memory
    Memory,
}

impl StorageProvider {
    /// Create an AWS S3 provider.
    #[must_use]
    pub fn s3(
        bucket: impl Into<String>,
        region: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        Self::S3 {
            bucket: bucket.into(),
            region: region.into(),
            endpoint: None,
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }

    /// URL prefix under which stored objects are publicly readable.
    #[must_use]
    pub fn default_public_base_url(&self) -> String {
        match self {
            Self::S3 {
                bucket,
                endpoint: Some(endpoint),
                ..
            } => format!("{}/{bucket}", endpoint.trim_end_matches('/')),
            Self::S3 { bucket, region, .. } => {
                format!("https://{bucket}.s3.{region}.amazonaws.com")
            }
            Self::LocalFs { .. } | Self::Memory => "/assets".to_string(),
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Allowed MIME types for upload.
    pub allowed_mime_types: Vec<String>,
    /// Overrides the provider's public URL prefix.
    pub public_base_url: Option<String>,
}

impl StorageConfig {
    /// Default max file size: 10MB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_types: Self::default_mime_types(),
            public_base_url: None,
        }
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set the public URL prefix.
    #[must_use]
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into());
        self
    }

    /// Default allowed MIME types: web images only.
    #[must_use]
    pub fn default_mime_types() -> Vec<String> {
        ["image/png", "image/jpeg", "image/gif", "image/webp"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|t| t == mime_type)
    }

    /// Public URL prefix without a trailing slash.
    #[must_use]
    pub fn public_base_url(&self) -> String {
        self.public_base_url.as_deref().map_or_else(
            || self.provider.default_public_base_url(),
            |url| url.trim_end_matches('/').to_string(),
        )
    }
}

impl From<&StorageSettings> for StorageConfig {
    fn from(settings: &StorageSettings) -> Self {
        let provider = match settings.backend {
            StorageBackend::S3 => StorageProvider::S3 {
                bucket: settings.bucket.clone(),
                region: settings.region.clone(),
                endpoint: settings.endpoint.clone(),
                access_key_id: settings.access_key_id.clone(),
                secret_access_key: settings.secret_access_key.clone(),
            },
            StorageBackend::LocalFs => StorageProvider::local_fs(settings.root.clone()),
            StorageBackend::Memory => StorageProvider::Memory,
        };

        Self {
            provider,
            max_file_size: settings.max_file_size,
            allowed_mime_types: Self::default_mime_types(),
            public_base_url: settings.public_base_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_s3_public_url_is_virtual_hosted() {
        let config = StorageConfig::new(StorageProvider::s3(
            "agora-images",
            "eu-central-1",
            "access_key",
            "secret_key",
        ));
        assert_eq!(config.provider.name(), "s3");
        assert_eq!(
            config.public_base_url(),
            "https://agora-images.s3.eu-central-1.amazonaws.com"
        );
    }

    #[test]
    fn test_custom_endpoint_is_path_style() {
        let provider = StorageProvider::S3 {
            bucket: "agora".to_string(),
            region: "auto".to_string(),
            endpoint: Some("http://localhost:9000/".to_string()),
            access_key_id: "minio".to_string(),
            secret_access_key: "minio123".to_string(),
        };
        assert_eq!(provider.default_public_base_url(), "http://localhost:9000/agora");
    }

    #[test]
    fn test_explicit_base_url_wins() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"))
            .with_public_base_url("https://cdn.agora.dev/");
        assert_eq!(config.public_base_url(), "https://cdn.agora.dev");
    }

    #[test]
    fn test_local_fs_served_from_assets() {
        let config = StorageConfig::new(StorageProvider::local_fs("./storage"));
        assert_eq!(config.provider.name(), "local");
        assert_eq!(config.public_base_url(), "/assets");
    }

    #[test]
    fn test_mime_type_validation() {
        let config = StorageConfig::new(StorageProvider::Memory);
        assert!(config.is_mime_type_allowed("image/png"));
        assert!(config.is_mime_type_allowed("image/jpeg"));
        assert!(!config.is_mime_type_allowed("application/pdf"));
        assert!(!config.is_mime_type_allowed("text/html"));
    }

    #[test]
    fn test_from_settings() {
        let settings = StorageSettings {
            backend: StorageBackend::S3,
            bucket: "bucket".to_string(),
            max_file_size: 1024,
            ..StorageSettings::default()
        };
        let config = StorageConfig::from(&settings);

        assert_eq!(config.max_file_size, 1024);
        assert_eq!(config.provider.name(), "s3");
        assert_eq!(
            config.public_base_url(),
            "https://bucket.s3.us-east-1.amazonaws.com"
        );
    }
}
