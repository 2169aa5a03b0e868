use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::collection::ImageEntry;
use crate::services::dimensions::ResizeEditor;
use crate::services::navigator::{NavigatorError, PickerView};
use crate::services::staging::{OutputSpec, SaveItem, StagingError, StagingSummary};
use crate::types::errors::BackendError;

/// Which of the two pickers a navigation command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PickerKind {
    Images,
    Destination,
}

/// Result of the most recent save, kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum SaveOutcome {
    Saved { directory: String, count: usize },
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "step")]
pub enum FlowView {
    Idle,
    PickingFolder {
        picker: PickerView,
    },
    Staging {
        directory: String,
        items: Vec<SaveItem>,
        summary: StagingSummary,
    },
}

/// Everything the frontend renders, in one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub files: Vec<ImageEntry>,
    pub global: ResizeEditor,
    pub output: OutputSpec,
    pub image_picker: Option<PickerView>,
    pub flow: FlowView,
    pub saving: bool,
    pub last_outcome: Option<SaveOutcome>,
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("No images selected")]
    NoFiles,
    #[error("A save is already in progress")]
    SaveInProgress,
    #[error("The destination picker is not open")]
    NotPickingFolder,
    #[error("Save staging is not open")]
    NotStaging,
    #[error("No image at index {0}")]
    IndexOutOfRange(usize),
    #[error("Nothing has been saved yet")]
    NoOutputFolder,
    #[error(transparent)]
    Navigator(#[from] NavigatorError),
    #[error(transparent)]
    Staging(#[from] StagingError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
