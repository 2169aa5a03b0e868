use serde::Serialize;

use crate::services::backend::ImageMetadata;
use crate::services::dimensions::{Dimensions, ResizeEditor, ResizeSpec};

/// One staged image and its override state.
///
/// While `use_custom_dimensions` is off the target is owned by the global
/// rule; while it is on, only this entry's own editor may change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageEntry {
    path: String,
    display_name: String,
    natural: Dimensions,
    size_bytes: u64,
    use_custom_dimensions: bool,
    /// `None` until a resize rule has been applied at least once.
    target: Option<Dimensions>,
    custom: ResizeEditor,
}

impl ImageEntry {
    pub fn new(path: String, metadata: ImageMetadata) -> Self {
        let natural = Dimensions::new(metadata.width, metadata.height);
        Self {
            display_name: display_name_of(&path),
            path,
            natural,
            size_bytes: metadata.size_bytes,
            use_custom_dimensions: false,
            target: None,
            custom: ResizeEditor::for_image(natural),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn natural(&self) -> Dimensions {
        self.natural
    }

    pub fn use_custom_dimensions(&self) -> bool {
        self.use_custom_dimensions
    }

    pub fn target(&self) -> Option<Dimensions> {
        self.target
    }

    pub fn custom_editor(&self) -> &ResizeEditor {
        &self.custom
    }

    /// Switch ownership of the target. Nothing is recomputed here; the next
    /// global or custom edit decides the new target.
    pub fn set_use_custom_dimensions(&mut self, enabled: bool) {
        self.use_custom_dimensions = enabled;
    }

    /// Apply the global rule. Skipped entirely for custom entries.
    /// Returns whether the entry was touched.
    pub fn apply_global(&mut self, spec: ResizeSpec) -> bool {
        if self.use_custom_dimensions {
            return false;
        }
        self.target = Some(crate::services::dimensions::resolve(self.natural, spec));
        true
    }

    /// Run an edit against this entry's own editor and, when the entry owns
    /// its dimensions, take the editor's result as the new target.
    pub fn edit_custom<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut ResizeEditor),
    {
        edit(&mut self.custom);
        if self.use_custom_dimensions {
            self.target = Some(self.custom.resolve_for(self.natural));
        }
    }
}

/// Last path component, accepting both separator styles.
pub fn display_name_of(path: &str) -> String {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(path)
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestFailure {
    pub path: String,
    pub message: String,
}

/// Outcome of one ingest call. Failures are per file and never abort the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub added: usize,
    /// Paths already staged, or repeated within the same batch.
    pub skipped: Vec<String>,
    pub failed: Vec<IngestFailure>,
}
