//! Collaborator boundary: every call the batch core makes to the outside
//! world (image metadata, directory browsing, existence checks, the batch
//! save and the system viewer) goes through [`ImageBackend`].

pub mod local;
pub mod types;

use std::future::Future;

use crate::types::errors::BackendError;

pub use local::LocalBackend;
pub use types::{DirEntry, ImageMetadata, SaveRequest, SaveResult};

/// Asynchronous image and filesystem services consumed by the batch core.
///
/// Calls may be issued concurrently; implementations must not rely on call
/// order.
pub trait ImageBackend: Send + Sync {
    /// Natural size and byte size of an image. `Metadata` on unreadable or
    /// non-image files.
    fn get_image_metadata(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<ImageMetadata, BackendError>> + Send;

    /// Entries of a directory in backend order. `Access` when unreadable.
    fn list_directory(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<Vec<DirEntry>, BackendError>> + Send;

    /// Parent of `path`. `ParentNavigation` when `path` is a root.
    fn get_parent_directory(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;

    fn get_home_directory(&self) -> impl Future<Output = Result<String, BackendError>> + Send;

    fn file_exists(&self, path: &str) -> impl Future<Output = Result<bool, BackendError>> + Send;

    /// Execute a whole batch. `Save` carries a human-readable message.
    fn save_images(
        &self,
        requests: Vec<SaveRequest>,
    ) -> impl Future<Output = Result<SaveResult, BackendError>> + Send;

    /// Best effort; `OpenFolder` on failure.
    fn open_path(&self, path: &str) -> impl Future<Output = Result<(), BackendError>> + Send;
}
