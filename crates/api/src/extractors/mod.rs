//! Request extractors.

pub mod multipart;
pub mod request;

pub use multipart::MultipartForm;
pub use request::{ApiJson, ApiPath, ApiQuery};
