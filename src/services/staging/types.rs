use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::dimensions::Dimensions;
use crate::services::staging::naming::destination_path;

pub const DEFAULT_QUALITY: u8 = 85;

/// Output encoding for the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Keep each source's own format (extension).
    #[default]
    #[serde(rename = "original")]
    KeepOriginal,
    Png,
    Jpeg,
    WebP,
}

impl OutputFormat {
    /// Fixed extension for re-encoding formats, `None` for `KeepOriginal`.
    pub fn fixed_extension(&self) -> Option<&'static str> {
        match self {
            OutputFormat::KeepOriginal => None,
            OutputFormat::Png => Some("png"),
            OutputFormat::Jpeg => Some("jpg"),
            OutputFormat::WebP => Some("webp"),
        }
    }
}

/// Format and quality applied uniformly to a batch. Quality is kept in
/// `1..=100` and only matters for lossy formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpec {
    pub format: OutputFormat,
    pub quality: u8,
}

impl Default for OutputSpec {
    fn default() -> Self {
        Self {
            format: OutputFormat::KeepOriginal,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl OutputSpec {
    pub fn new(format: OutputFormat, quality: u8) -> Self {
        Self {
            format,
            quality: quality.clamp(1, 100),
        }
    }

    pub fn set_quality(&mut self, quality: u8) {
        self.quality = quality.clamp(1, 100);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CollisionState {
    Checking,
    Available,
    Conflict,
}

/// One staged save. A snapshot of an entry taken when staging opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveItem {
    pub source_path: String,
    pub target: Dimensions,
    pub output_format: OutputFormat,
    pub quality: u8,
    /// Free text without extension.
    pub candidate_filename: String,
    pub extension: String,
    pub collision: CollisionState,
    /// Restamped on every edit and every issued check; a check result
    /// carrying any other value is stale and discarded.
    #[serde(skip)]
    pub(crate) generation: u64,
}

impl SaveItem {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.candidate_filename.trim(), self.extension)
    }

    pub fn destination(&self, directory: &str) -> String {
        destination_path(directory, self.candidate_filename.trim(), &self.extension)
    }
}

/// An issued existence check. Only applies while the item's generation
/// still matches; generations are unique per process, so tickets from a
/// cancelled staging never match a later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckTicket {
    pub index: usize,
    pub generation: u64,
    pub destination: String,
}

/// Footer state of the staging dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum StagingSummary {
    /// At least one item has not settled yet.
    Checking { pending: usize },
    /// Nothing will be overwritten.
    Ready { count: usize },
    /// `conflicts` files will be overwritten. Advisory only.
    Overwrite { conflicts: usize, count: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StagingError {
    #[error("No images to save")]
    EmptyBatch,
    #[error("Target size of {0} has not been resolved yet")]
    UnresolvedDimensions(String),
    #[error("Still checking {0} destination(s)")]
    ChecksPending(usize),
    #[error("Invalid file name \"{name}\" for item {index}")]
    InvalidFilename { index: usize, name: String },
    #[error("More than one image would be saved to {0}")]
    DuplicateDestination(String),
    #[error("No staged item at index {0}")]
    IndexOutOfRange(usize),
}
