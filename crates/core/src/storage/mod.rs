//! Image relay to object storage using Apache OpenDAL.
//!
//! Uploaded pictures land under a fixed `img/` prefix in one of:
//! - S3-compatible buckets: AWS S3, Cloudflare R2, MinIO
//! - Local filesystem, exposed through the `/assets` static route
//! - Process memory (tests)
//!
//! ```text
//! multipart buffer ──► validate (size, MIME) ──► op.write("img/<name>") ──► public URL
//! ```

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{IMAGE_KEY_PREFIX, ImageStore, ImageUpload, StorageService};
