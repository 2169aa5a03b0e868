use std::sync::Arc;

use crate::services::backend::{DirEntry, ImageBackend, ImageMetadata, SaveRequest, SaveResult};
use crate::services::collection::{FileCollection, ImageEntry, IngestReport};
use crate::services::config::DestinationStore;
use crate::services::dimensions::{ResizeEdit, ResizeEditor};
use crate::services::navigator::{
    Activation, DirectoryNavigator, ListingOutcome, NavTicket, NavigatorError, PickerConfig,
    PickerSelection,
};
use crate::services::staging::{CheckTicket, OutputFormat, OutputSpec, SaveStaging};
use crate::services::transform::types::{
    FlowView, PickerKind, SaveOutcome, SessionView, TransformError,
};
use crate::types::errors::BackendError;

#[derive(Debug)]
enum SaveFlow {
    Idle,
    PickingFolder(DirectoryNavigator),
    Staging(SaveStaging),
}

/// Owns the batch and both specifications; every mutation goes through here.
///
/// The save flow is `Idle → PickingFolder → Staging → Idle`. Cancelling at
/// any step drops the picker or the staged snapshot and never touches the
/// collection.
///
/// Nothing here awaits a collaborator. Operations that need one return a
/// ticket (or the paths to look up); the caller runs the call without
/// holding the controller and applies the answer afterwards, where stale
/// answers are discarded.
pub struct TransformController<B, S> {
    backend: Arc<B>,
    store: Arc<S>,
    files: FileCollection,
    global: ResizeEditor,
    output: OutputSpec,
    image_picker: DirectoryNavigator,
    /// Directory the image picker was last confirmed in, for this session.
    image_picker_dir: Option<String>,
    flow: SaveFlow,
    /// Destination of the batch currently being written.
    saving_to: Option<String>,
    last_outcome: Option<SaveOutcome>,
}

impl<B: ImageBackend, S: DestinationStore> TransformController<B, S> {
    pub fn new(backend: Arc<B>, store: Arc<S>) -> Self {
        Self {
            backend,
            store,
            files: FileCollection::new(),
            global: ResizeEditor::default(),
            output: OutputSpec::default(),
            image_picker: DirectoryNavigator::new(PickerConfig::images(true)),
            image_picker_dir: None,
            flow: SaveFlow::Idle,
            saving_to: None,
            last_outcome: None,
        }
    }

    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    pub fn files(&self) -> &FileCollection {
        &self.files
    }

    pub fn global(&self) -> &ResizeEditor {
        &self.global
    }

    pub fn output(&self) -> OutputSpec {
        self.output
    }

    pub fn is_saving(&self) -> bool {
        self.saving_to.is_some()
    }

    pub fn last_outcome(&self) -> Option<&SaveOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn staging(&self) -> Option<&SaveStaging> {
        match &self.flow {
            SaveFlow::Staging(staging) => Some(staging),
            _ => None,
        }
    }

    pub fn destination_picker(&self) -> Option<&DirectoryNavigator> {
        match &self.flow {
            SaveFlow::PickingFolder(nav) => Some(nav),
            _ => None,
        }
    }

    pub fn image_picker(&self) -> Option<&DirectoryNavigator> {
        Some(&self.image_picker).filter(|nav| nav.is_open())
    }

    pub fn view(&self) -> SessionView {
        let flow = match &self.flow {
            SaveFlow::Idle => FlowView::Idle,
            SaveFlow::PickingFolder(nav) => FlowView::PickingFolder { picker: nav.view() },
            SaveFlow::Staging(staging) => FlowView::Staging {
                directory: staging.directory().to_string(),
                items: staging.items().to_vec(),
                summary: staging.summary(),
            },
        };
        SessionView {
            files: self.files.entries().to_vec(),
            global: self.global.clone(),
            output: self.output,
            image_picker: self.image_picker().map(DirectoryNavigator::view),
            flow,
            saving: self.is_saving(),
            last_outcome: self.last_outcome.clone(),
        }
    }

    // ── Collection ──────────────────────────────────────────

    /// Split incoming paths (picker result or dropped files) into those
    /// needing a metadata lookup and those already staged.
    pub fn admit(&self, paths: Vec<String>) -> (Vec<String>, Vec<String>) {
        self.files.admit(paths)
    }

    /// Append finished metadata lookups. New entries take the current
    /// global rule straight away.
    pub fn finish_ingest(
        &mut self,
        lookups: Vec<(String, Result<ImageMetadata, BackendError>)>,
        mut skipped: Vec<String>,
    ) -> IngestReport {
        let mut report = self.files.append_lookups(lookups, Some(self.global.spec()));
        skipped.append(&mut report.skipped);
        report.skipped = skipped;
        self.refresh_reference();
        log::info!(
            "Ingested {} images ({} skipped, {} failed)",
            report.added,
            report.skipped.len(),
            report.failed.len()
        );
        report
    }

    pub fn remove(&mut self, index: usize) -> Result<ImageEntry, TransformError> {
        let removed = self
            .files
            .remove(index)
            .ok_or(TransformError::IndexOutOfRange(index))?;
        self.refresh_reference();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.refresh_reference();
    }

    // ── Specifications ──────────────────────────────────────

    /// Edit the global rule and re-resolve every non-custom entry before
    /// returning. Returns how many entries were updated.
    pub fn edit_global(&mut self, edit: ResizeEdit) -> usize {
        self.global.apply(edit);
        if !edit.changes_spec() {
            return 0;
        }
        self.apply_global()
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output.format = format;
    }

    pub fn set_output_quality(&mut self, quality: u8) {
        self.output.set_quality(quality);
    }

    /// Switch an entry between the global rule and its own editor. Nothing
    /// is recomputed by the toggle itself.
    pub fn set_use_custom(&mut self, index: usize, enabled: bool) -> Result<(), TransformError> {
        if self.files.set_use_custom(index, enabled) {
            Ok(())
        } else {
            Err(TransformError::IndexOutOfRange(index))
        }
    }

    pub fn edit_entry(&mut self, index: usize, edit: ResizeEdit) -> Result<(), TransformError> {
        if self.files.edit_custom(index, |editor| editor.apply(edit)) {
            Ok(())
        } else {
            Err(TransformError::IndexOutOfRange(index))
        }
    }

    fn apply_global(&mut self) -> usize {
        let updated = self.files.apply_global(self.global.spec());
        log::debug!("Global resize {:?} applied to {updated} entries", self.global.spec());
        updated
    }

    /// The global aspect lock follows the first image in the batch.
    fn refresh_reference(&mut self) {
        self.global
            .set_reference(self.files.get(0).map(ImageEntry::natural));
    }

    // ── Pickers ─────────────────────────────────────────────
    //
    // Listing calls return a ticket; the caller fetches it and hands the
    // outcome back through `apply_listing`.

    /// Open the image picker where it was last confirmed this session.
    pub fn open_image_picker(&mut self) -> NavTicket {
        let hint = self.image_picker_dir.clone();
        self.image_picker.begin_open(hint.as_deref())
    }

    /// Close the image picker and return the picked paths for ingestion.
    pub fn confirm_image_picker(&mut self) -> Result<Vec<String>, TransformError> {
        let directory = self.image_picker.current_path().map(str::to_string);
        let PickerSelection::Files(paths) = self.image_picker.confirm()? else {
            return Err(NavigatorError::NothingSelected.into());
        };
        self.image_picker_dir = directory;
        Ok(paths)
    }

    pub fn picker_navigate(
        &mut self,
        kind: PickerKind,
        path: &str,
    ) -> Result<NavTicket, TransformError> {
        Ok(self.picker_mut(kind)?.begin_navigate(path))
    }

    /// `None` when the picker has nothing listed yet.
    pub fn picker_up(&mut self, kind: PickerKind) -> Result<Option<NavTicket>, TransformError> {
        Ok(self.picker_mut(kind)?.begin_navigate_up())
    }

    /// Click on an entry. Returns a ticket when the click enters a directory.
    pub fn picker_activate(
        &mut self,
        kind: PickerKind,
        entry: &DirEntry,
    ) -> Result<Option<NavTicket>, TransformError> {
        let picker = self.picker_mut(kind)?;
        match picker.toggle_select(entry) {
            Activation::Navigate(path) => Ok(Some(picker.begin_navigate(path))),
            Activation::Selected => Ok(None),
            Activation::Ignored => {
                log::debug!("Ignored click on {}", entry.path);
                Ok(None)
            }
        }
    }

    /// Apply a fetched listing to the picker that issued it. Ignored once
    /// that picker closed or moved on.
    pub fn apply_listing(
        &mut self,
        kind: PickerKind,
        ticket: &NavTicket,
        outcome: ListingOutcome,
    ) -> bool {
        match self.picker_mut(kind) {
            Ok(picker) => picker.apply_listing(ticket, outcome),
            Err(_) => {
                log::debug!("Dropping listing for closed {kind:?} picker");
                false
            }
        }
    }

    pub fn picker_dismiss_error(&mut self, kind: PickerKind) -> Result<(), TransformError> {
        self.picker_mut(kind)?.dismiss_error();
        Ok(())
    }

    /// Close a picker without a result. For the destination picker this
    /// ends the save flow.
    pub fn picker_cancel(&mut self, kind: PickerKind) {
        match kind {
            PickerKind::Images => self.image_picker.cancel(),
            PickerKind::Destination => self.cancel_save_flow(),
        }
    }

    fn picker_mut(&mut self, kind: PickerKind) -> Result<&mut DirectoryNavigator, TransformError> {
        match kind {
            PickerKind::Images if self.image_picker.is_open() => Ok(&mut self.image_picker),
            PickerKind::Images => Err(NavigatorError::NotOpen.into()),
            PickerKind::Destination => match &mut self.flow {
                SaveFlow::PickingFolder(nav) => Ok(nav),
                _ => Err(TransformError::NotPickingFolder),
            },
        }
    }

    // ── Save flow ───────────────────────────────────────────

    /// Start the save flow by opening the destination picker at the last
    /// used destination.
    pub fn begin_save(&mut self) -> Result<NavTicket, TransformError> {
        if self.is_saving() {
            return Err(TransformError::SaveInProgress);
        }
        if self.files.is_empty() {
            return Err(TransformError::NoFiles);
        }

        let hint = self.store.last_destination();
        let mut nav = DirectoryNavigator::new(PickerConfig::folder());
        let ticket = nav.begin_open(hint.as_deref());
        self.flow = SaveFlow::PickingFolder(nav);
        Ok(ticket)
    }

    /// Confirm the picked folder and switch to staging with every item
    /// `Checking`. Returns the destination directory.
    pub fn open_staging(&mut self) -> Result<String, TransformError> {
        let SaveFlow::PickingFolder(nav) = &mut self.flow else {
            return Err(TransformError::NotPickingFolder);
        };
        let PickerSelection::Folder(directory) = nav.confirm()? else {
            return Err(NavigatorError::NothingSelected.into());
        };

        match SaveStaging::open(&self.files, self.output, directory.clone()) {
            Ok(staging) => {
                log::info!(
                    "Staging {} images for {}",
                    staging.items().len(),
                    directory
                );
                self.flow = SaveFlow::Staging(staging);
                Ok(directory)
            }
            Err(e) => {
                self.flow = SaveFlow::Idle;
                Err(e.into())
            }
        }
    }

    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> Result<(), TransformError> {
        self.staging_mut()?.set_filename(index, name)?;
        Ok(())
    }

    /// Commit a rename: issue a fresh check from the item's current name.
    pub fn issue_commit_check(&mut self, index: usize) -> Result<CheckTicket, TransformError> {
        Ok(self.staging_mut()?.commit_filename(index)?)
    }

    pub fn issue_all_checks(&mut self) -> Result<Vec<CheckTicket>, TransformError> {
        Ok(self.staging_mut()?.issue_all_checks())
    }

    pub fn issue_unsettled_checks(&mut self) -> Result<Vec<CheckTicket>, TransformError> {
        Ok(self.staging_mut()?.issue_unsettled_checks())
    }

    /// Apply an existence check issued earlier. Ignored once staging closed
    /// or when the item moved on.
    pub fn apply_check(&mut self, ticket: &CheckTicket, result: Result<bool, BackendError>) -> bool {
        match &mut self.flow {
            SaveFlow::Staging(staging) => staging.apply_check(ticket, result),
            _ => false,
        }
    }

    /// Validate staging and mark the save as in flight.
    pub fn take_save_batch(&mut self) -> Result<Vec<SaveRequest>, TransformError> {
        if self.is_saving() {
            return Err(TransformError::SaveInProgress);
        }
        let SaveFlow::Staging(staging) = &self.flow else {
            return Err(TransformError::NotStaging);
        };
        let requests = staging.confirm()?;
        self.saving_to = Some(staging.directory().to_string());
        Ok(requests)
    }

    /// Record the backend's answer for the batch taken by
    /// [`take_save_batch`](Self::take_save_batch). Success closes staging;
    /// on failure staging stays open with every name intact for a retry.
    pub fn finish_save(
        &mut self,
        result: Result<SaveResult, BackendError>,
    ) -> Result<SaveResult, TransformError> {
        let directory = self.saving_to.take().unwrap_or_default();
        match result {
            Ok(saved) => {
                log::info!("Saved {} images to {}", saved.saved_count, directory);
                self.last_outcome = Some(SaveOutcome::Saved {
                    directory,
                    count: saved.saved_count,
                });
                self.flow = SaveFlow::Idle;
                Ok(saved)
            }
            Err(e) => {
                log::error!("Batch save to {directory} failed: {e}");
                self.last_outcome = Some(SaveOutcome::Failed {
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Drop the picker or the staged snapshot. The collection is untouched.
    /// A save already in flight still completes and records its outcome.
    pub fn cancel_save_flow(&mut self) {
        if !matches!(self.flow, SaveFlow::Idle) {
            log::debug!("Save flow cancelled");
        }
        self.flow = SaveFlow::Idle;
    }

    /// Directory of the last successful save.
    pub fn output_folder(&self) -> Result<String, TransformError> {
        match &self.last_outcome {
            Some(SaveOutcome::Saved { directory, .. }) => Ok(directory.clone()),
            _ => Err(TransformError::NoOutputFolder),
        }
    }

    fn staging_mut(&mut self) -> Result<&mut SaveStaging, TransformError> {
        match &mut self.flow {
            SaveFlow::Staging(staging) => Ok(staging),
            _ => Err(TransformError::NotStaging),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
