use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::backend::DirEntry;
use crate::services::navigator::breadcrumbs::Breadcrumb;
use crate::types::errors::BackendError;

/// Extensions offered when picking source images.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "gif", "bmp", "tiff", "tif", "heic", "avif",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PickerMode {
    /// Select the current directory itself. Files are inert.
    Folder,
    /// Select files whose extension passes `filters`.
    Files,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerConfig {
    pub mode: PickerMode,
    /// Lower-case extensions without the dot. Empty accepts every file.
    pub filters: Vec<String>,
    pub multiple: bool,
}

impl PickerConfig {
    pub fn folder() -> Self {
        Self {
            mode: PickerMode::Folder,
            filters: Vec::new(),
            multiple: false,
        }
    }

    pub fn files(filters: &[&str], multiple: bool) -> Self {
        Self {
            mode: PickerMode::Files,
            filters: filters.iter().map(|f| f.to_lowercase()).collect(),
            multiple,
        }
    }

    pub fn images(multiple: bool) -> Self {
        Self::files(IMAGE_EXTENSIONS, multiple)
    }

    pub fn accepts_file(&self, entry: &DirEntry) -> bool {
        if entry.is_directory || self.mode != PickerMode::Files {
            return false;
        }
        if self.filters.is_empty() {
            return true;
        }
        entry
            .extension()
            .is_some_and(|ext| self.filters.iter().any(|f| *f == ext))
    }
}

/// Snapshot of one directory. Replaced wholesale on every navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryListing {
    pub current_path: String,
    pub entries: Vec<DirEntry>,
}

/// Serializable state of an open picker for the frontend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerView {
    pub config: PickerConfig,
    pub listing: Option<DirectoryListing>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub selection: Vec<String>,
    pub error: Option<String>,
    /// A listing request is in flight.
    pub loading: bool,
    pub can_confirm: bool,
}

/// What a confirmed picker yields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum PickerSelection {
    Folder(String),
    Files(Vec<String>),
}

/// Result of clicking an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Selection changed.
    Selected,
    /// The entry is a directory; the caller should navigate to it.
    Navigate(String),
    /// Nothing to do (inert or filtered-out file).
    Ignored,
}

/// What a listing ticket asks the backend for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingRequest {
    /// Opening: the hint when it lists, otherwise the home directory.
    Start(Option<String>),
    Path(String),
    /// Parent of this directory. Nothing changes at a root.
    Parent(String),
}

/// An issued listing request. Applies only while it is the latest one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavTicket {
    pub(crate) generation: u64,
    pub request: ListingRequest,
}

/// Backend answer to a [`ListingRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOutcome {
    Listed(DirectoryListing),
    /// Navigate-up from a root.
    Unchanged,
    Failed(BackendError),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigatorError {
    #[error("Nothing selected")]
    NothingSelected,
    #[error("Picker is not open")]
    NotOpen,
}
