pub mod files;
pub mod types;

pub use files::FileCollection;
pub use types::{ImageEntry, IngestFailure, IngestReport};
