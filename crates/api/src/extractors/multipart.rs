//! Multipart form reading for endpoints that accept an image.

use std::collections::HashMap;

use agora_core::storage::ImageUpload;
use axum::extract::{FromRequest, Multipart, Request};
use tracing::debug;

use crate::error::ApiError;

/// Name of the file field carrying the image.
pub const PICTURE_FIELD: &str = "picture";

/// Text fields plus at most one image, fully buffered.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    picture: Option<ImageUpload>,
}

impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state).await?;
        Self::read(multipart).await
    }
}

impl MultipartForm {
    /// Drains a multipart body.
    ///
    /// Parts other than [`PICTURE_FIELD`] are read as text. A picture part
    /// with no bytes counts as no picture. A body over the configured limit
    /// is rejected with 413, any other malformed part with 400.
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == PICTURE_FIELD {
                let original_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;

                if bytes.is_empty() {
                    debug!("Ignoring empty picture part");
                    continue;
                }
                form.picture = Some(ImageUpload::new(bytes, original_name, content_type));
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Removes a text field, or returns an empty string if it was not sent.
    pub fn take_text(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }

    /// Removes the picture, if one was sent.
    pub fn take_picture(&mut self) -> Option<ImageUpload> {
        self.picture.take()
    }
}
