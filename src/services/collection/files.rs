use std::collections::HashSet;

use futures_util::future::join_all;

use crate::services::backend::{ImageBackend, ImageMetadata};
use crate::services::collection::types::{ImageEntry, IngestFailure, IngestReport};
use crate::services::dimensions::{ResizeEditor, ResizeSpec};
use crate::types::errors::BackendError;

/// Ordered set of staged images. Insertion order is display order and
/// save order; nothing here ever sorts.
#[derive(Debug, Clone, Default)]
pub struct FileCollection {
    entries: Vec<ImageEntry>,
}

impl FileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageEntry> {
        self.entries.get(index)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.iter().any(|e| e.path() == path)
    }

    /// Split an incoming batch into paths that need a metadata lookup and
    /// paths that are already staged (or repeated in the batch).
    pub fn admit(&self, paths: Vec<String>) -> (Vec<String>, Vec<String>) {
        let mut seen = HashSet::new();
        let mut admitted = Vec::new();
        let mut skipped = Vec::new();
        for path in paths {
            if self.contains(&path) || !seen.insert(path.clone()) {
                skipped.push(path);
            } else {
                admitted.push(path);
            }
        }
        (admitted, skipped)
    }

    /// Append looked-up paths in the order given. Additive: existing
    /// entries and their settings are kept. A failed lookup drops only that
    /// path, and a path staged while its lookup ran is skipped.
    pub fn append_lookups(
        &mut self,
        lookups: Vec<(String, Result<ImageMetadata, BackendError>)>,
        global: Option<ResizeSpec>,
    ) -> IngestReport {
        let mut report = IngestReport::default();
        for (path, result) in lookups {
            if self.contains(&path) {
                report.skipped.push(path);
                continue;
            }
            match result {
                Ok(metadata) => {
                    let mut entry = ImageEntry::new(path, metadata);
                    if let Some(spec) = global {
                        entry.apply_global(spec);
                    }
                    self.entries.push(entry);
                    report.added += 1;
                }
                Err(e) => {
                    log::warn!("Dropping {path} from batch: {e}");
                    report.failed.push(IngestFailure {
                        path,
                        message: e.to_string(),
                    });
                }
            }
        }
        report
    }

    pub fn remove(&mut self, index: usize) -> Option<ImageEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Re-resolve every non-custom entry against `spec` in one pass.
    /// Returns how many entries were updated.
    pub fn apply_global(&mut self, spec: ResizeSpec) -> usize {
        self.entries
            .iter_mut()
            .map(|entry| entry.apply_global(spec))
            .filter(|touched| *touched)
            .count()
    }

    pub fn set_use_custom(&mut self, index: usize, enabled: bool) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.set_use_custom_dimensions(enabled);
                true
            }
            None => false,
        }
    }

    pub fn edit_custom<F>(&mut self, index: usize, edit: F) -> bool
    where
        F: FnOnce(&mut ResizeEditor),
    {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.edit_custom(edit);
                true
            }
            None => false,
        }
    }
}

/// Run one metadata lookup per path concurrently, keeping input order.
pub async fn lookup_metadata<B: ImageBackend>(
    backend: &B,
    paths: Vec<String>,
) -> Vec<(String, Result<ImageMetadata, BackendError>)> {
    let results = join_all(paths.iter().map(|path| backend.get_image_metadata(path))).await;
    paths.into_iter().zip(results).collect()
}

#[cfg(test)]
#[path = "tests/files_tests.rs"]
mod tests;
