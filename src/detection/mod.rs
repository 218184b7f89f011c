//! Detection data model shared by every ecosystem detector

pub mod error;
pub mod types;

pub use error::DetectError;
pub use types::{Detection, Language, LogFormat, TracingProtocol, MULTIPART_SENTINEL};
