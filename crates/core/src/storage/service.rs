//! Storage service implementation using Apache OpenDAL.

use async_trait::async_trait;
use bytes::Bytes;
use opendal::{Operator, services};
use tracing::{debug, info};

use super::config::{StorageConfig, StorageProvider};
use crate::health::HealthCheck;
use super::error::StorageError;

/// Every uploaded image is stored under this prefix.
pub const IMAGE_KEY_PREFIX: &str = "img";

/// An image received from a client, held fully in memory.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// File contents.
    pub bytes: Bytes,
    /// Name the client gave the file.
    pub original_name: String,
    /// MIME type declared by the client.
    pub content_type: String,
}

impl ImageUpload {
    /// Creates an upload from its parts.
    #[must_use]
    pub fn new(
        bytes: impl Into<Bytes>,
        original_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            original_name: original_name.into(),
            content_type: content_type.into(),
        }
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Destination for user-uploaded images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores the image and returns its public URL.
    async fn upload(&self, image: ImageUpload) -> Result<String, StorageError>;
}

/// Object storage backed image store.
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl std::fmt::Debug for StorageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageService")
            .field("provider", &self.config.provider.name())
            .field("max_file_size", &self.config.max_file_size)
            .finish_non_exhaustive()
    }
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        let operator = match provider {
            StorageProvider::S3 {
                bucket,
                region,
                endpoint,
                access_key_id,
                secret_access_key,
            } => {
                let mut builder = services::S3::default()
                    .bucket(bucket)
                    .region(region)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key);
                if let Some(endpoint) = endpoint {
                    builder = builder.endpoint(endpoint);
                }
                Operator::new(builder).map(|b| b.finish())
            }
            StorageProvider::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("invalid path"))?;
                Operator::new(services::Fs::default().root(root)).map(|b| b.finish())
            }
            StorageProvider::Memory => {
                Operator::new(services::Memory::default()).map(|b| b.finish())
            }
        };

        operator.map_err(|e| StorageError::configuration(e.to_string()))
    }

    /// Validate an upload against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is empty, too large, or of a disallowed type.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size == 0 {
            return Err(StorageError::EmptyFile);
        }

        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Storage key for an uploaded file: `img/{sanitized_filename}`.
    ///
    /// Same name, same key: a later upload replaces the earlier object.
    #[must_use]
    pub fn storage_key(original_name: &str) -> String {
        format!("{IMAGE_KEY_PREFIX}/{}", sanitize_filename(original_name))
    }

    /// Public URL for a storage key.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.config.public_base_url())
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }
}

#[async_trait]
impl ImageStore for StorageService {
    async fn upload(&self, image: ImageUpload) -> Result<String, StorageError> {
        self.validate_upload(&image.content_type, image.size())?;

        let key = Self::storage_key(&image.original_name);
        let size = image.size();
        debug!(key = %key, size, provider = self.provider_name(), "Uploading image");

        self.operator
            .write_with(&key, image.bytes)
            .content_type(&image.content_type)
            .await
            .map_err(StorageError::from)?;

        let url = self.public_url(&key);
        info!(key = %key, size, "Image stored");
        Ok(url)
    }
}

#[async_trait]
impl HealthCheck for StorageService {
    fn component(&self) -> &'static str {
        "storage"
    }

    async fn check(&self) -> Result<(), String> {
        self.operator.check().await.map_err(|e| e.to_string())
    }
}

/// Sanitize filename for storage key.
///
/// Only ASCII alphanumeric characters, dots, hyphens, and underscores survive;
/// anything else becomes `_`. Leading dots are stripped so a name can never
/// walk out of the prefix.
fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> StorageService {
        let config = StorageConfig::new(StorageProvider::Memory)
            .with_public_base_url("https://agora-images.s3.us-east-1.amazonaws.com");
        StorageService::from_config(config).expect("should create service")
    }

    async fn stored(service: &StorageService, key: &str) -> bool {
        service.operator.exists(key).await.expect("exists check")
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("avatar.png"), "avatar.png");
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename("日本語.png"), "___.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..hidden.png"), "hidden.png");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn test_storage_key_prefix() {
        assert_eq!(StorageService::storage_key("cat.jpg"), "img/cat.jpg");
    }

    #[test]
    fn test_validate_upload() {
        let config = StorageConfig::new(StorageProvider::Memory).with_max_file_size(1024);
        let service = StorageService::from_config(config).expect("should create service");

        assert!(service.validate_upload("image/png", 512).is_ok());
        assert!(matches!(
            service.validate_upload("image/png", 2048),
            Err(StorageError::FileTooLarge { .. })
        ));
        assert!(matches!(
            service.validate_upload("image/png", 0),
            Err(StorageError::EmptyFile)
        ));
        assert!(matches!(
            service.validate_upload("application/x-executable", 512),
            Err(StorageError::InvalidMimeType { .. })
        ));
    }

    #[tokio::test]
    async fn test_upload_stores_object_and_returns_url() {
        let service = memory_store();
        let image = ImageUpload::new(vec![0x89, 0x50, 0x4e, 0x47], "me.png", "image/png");

        let url = service.upload(image).await.expect("upload should succeed");

        assert_eq!(
            url,
            "https://agora-images.s3.us-east-1.amazonaws.com/img/me.png"
        );
        assert!(stored(&service, "img/me.png").await);
    }

    #[tokio::test]
    async fn test_memory_backend_reports_healthy() {
        let service = memory_store();

        assert_eq!(service.component(), "storage");
        assert!(service.check().await.is_ok());
    }

    #[tokio::test]
    async fn test_rejected_upload_writes_nothing() {
        let service = memory_store();
        let image = ImageUpload::new(b"<html>".to_vec(), "page.html", "text/html");

        let result = service.upload(image).await;

        assert!(matches!(result, Err(StorageError::InvalidMimeType { .. })));
        assert!(!stored(&service, "img/page.html").await);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_sanitized_filename_safe_chars(filename in ".*") {
            let sanitized = sanitize_filename(&filename);

            prop_assert!(!sanitized.is_empty());
            prop_assert!(!sanitized.starts_with('.'));
            for c in sanitized.chars() {
                let is_safe = c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_';
                prop_assert!(is_safe, "Unexpected character in sanitized filename: {}", c);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_storage_key_is_single_segment_under_prefix(filename in ".*") {
            let key = StorageService::storage_key(&filename);
            let parts: Vec<&str> = key.split('/').collect();

            prop_assert_eq!(parts.len(), 2);
            prop_assert_eq!(parts[0], IMAGE_KEY_PREFIX);
        }
    }

    proptest! {
        #[test]
        fn prop_size_limit_enforced(
            max_size in 1u64..10_000_000,
            file_size in 1u64..20_000_000,
        ) {
            let config = StorageConfig::new(StorageProvider::Memory).with_max_file_size(max_size);
            let service = StorageService::from_config(config).expect("should create service");

            let result = service.validate_upload("image/jpeg", file_size);

            if file_size <= max_size {
                prop_assert!(result.is_ok());
            } else {
                let is_too_large = matches!(result, Err(StorageError::FileTooLarge { .. }));
                prop_assert!(is_too_large);
            }
        }
    }
}
