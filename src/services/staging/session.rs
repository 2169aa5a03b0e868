use std::collections::HashSet;

use crate::services::backend::SaveRequest;
use crate::services::collection::FileCollection;
use crate::services::stamp::next_stamp;
use crate::services::staging::naming::{default_file_stem, output_extension};
use crate::services::staging::types::{
    CheckTicket, CollisionState, OutputSpec, SaveItem, StagingError, StagingSummary,
};
use crate::types::errors::BackendError;

/// One open staging dialog: the snapshot of save items for a destination
/// directory. Discarded on cancel or after a successful save; never written
/// back into the collection.
#[derive(Debug, Clone)]
pub struct SaveStaging {
    directory: String,
    items: Vec<SaveItem>,
}

impl SaveStaging {
    /// Snapshot `files` into save items, one per entry in collection order.
    /// Every item starts in `Checking`.
    pub fn open(
        files: &FileCollection,
        output: OutputSpec,
        directory: impl Into<String>,
    ) -> Result<Self, StagingError> {
        if files.is_empty() {
            return Err(StagingError::EmptyBatch);
        }

        let items = files
            .entries()
            .iter()
            .map(|entry| {
                let target = entry
                    .target()
                    .ok_or_else(|| StagingError::UnresolvedDimensions(entry.path().to_string()))?;
                Ok(SaveItem {
                    source_path: entry.path().to_string(),
                    target,
                    output_format: output.format,
                    quality: output.quality,
                    candidate_filename: default_file_stem(entry.path(), target),
                    extension: output_extension(output.format, entry.path()),
                    collision: CollisionState::Checking,
                    generation: 0,
                })
            })
            .collect::<Result<Vec<_>, StagingError>>()?;

        Ok(Self {
            directory: directory.into(),
            items,
        })
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn items(&self) -> &[SaveItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&SaveItem> {
        self.items.get(index)
    }

    /// Edit a candidate name. The item goes back to `Checking` and any check
    /// already in flight for it becomes stale. No check is issued until the
    /// edit is committed.
    pub fn set_filename(&mut self, index: usize, name: impl Into<String>) -> Result<(), StagingError> {
        let item = self
            .items
            .get_mut(index)
            .ok_or(StagingError::IndexOutOfRange(index))?;
        item.candidate_filename = name.into();
        item.collision = CollisionState::Checking;
        item.generation = next_stamp();
        Ok(())
    }

    /// Issue a fresh check for one item, from its current name.
    pub fn commit_filename(&mut self, index: usize) -> Result<CheckTicket, StagingError> {
        let directory = &self.directory;
        let item = self
            .items
            .get_mut(index)
            .ok_or(StagingError::IndexOutOfRange(index))?;
        Ok(issue(index, item, directory))
    }

    /// Issue checks for every item (staging open).
    pub fn issue_all_checks(&mut self) -> Vec<CheckTicket> {
        let directory = &self.directory;
        self.items
            .iter_mut()
            .enumerate()
            .map(|(index, item)| issue(index, item, directory))
            .collect()
    }

    /// Issue checks for every item still in `Checking`.
    pub fn issue_unsettled_checks(&mut self) -> Vec<CheckTicket> {
        let directory = &self.directory;
        self.items
            .iter_mut()
            .enumerate()
            .filter(|(_, item)| item.collision == CollisionState::Checking)
            .map(|(index, item)| issue(index, item, directory))
            .collect()
    }

    /// Apply a check result if its ticket is still current. A failed check
    /// settles as `Available` so nothing stays ambiguous.
    /// Returns whether the result was applied.
    pub fn apply_check(&mut self, ticket: &CheckTicket, result: Result<bool, BackendError>) -> bool {
        let Some(item) = self.items.get_mut(ticket.index) else {
            return false;
        };
        if item.generation != ticket.generation {
            log::debug!(
                "Discarding stale existence check for {} (generation {} != {})",
                ticket.destination,
                ticket.generation,
                item.generation
            );
            return false;
        }

        item.collision = match result {
            Ok(true) => CollisionState::Conflict,
            Ok(false) => CollisionState::Available,
            Err(e) => {
                log::warn!("Existence check failed, treating as available: {e}");
                CollisionState::Available
            }
        };
        true
    }

    pub fn pending_count(&self) -> usize {
        self.count(CollisionState::Checking)
    }

    pub fn conflict_count(&self) -> usize {
        self.count(CollisionState::Conflict)
    }

    pub fn summary(&self) -> StagingSummary {
        let count = self.items.len();
        match (self.pending_count(), self.conflict_count()) {
            (0, 0) => StagingSummary::Ready { count },
            (0, conflicts) => StagingSummary::Overwrite { conflicts, count },
            (pending, _) => StagingSummary::Checking { pending },
        }
    }

    /// Final save instructions, one per item in order. Conflicts do not
    /// block; unsettled checks, bad names and in-batch clashes do.
    pub fn confirm(&self) -> Result<Vec<SaveRequest>, StagingError> {
        let pending = self.pending_count();
        if pending > 0 {
            return Err(StagingError::ChecksPending(pending));
        }

        let mut seen = HashSet::new();
        let mut requests = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            validate_filename(index, &item.candidate_filename)?;

            let destination = item.destination(&self.directory);
            if !seen.insert(clash_key(&destination)) {
                return Err(StagingError::DuplicateDestination(destination));
            }

            requests.push(SaveRequest {
                source_path: item.source_path.clone(),
                destination_path: destination,
                target_width: item.target.width,
                target_height: item.target.height,
                output_format: item.output_format,
                quality: item.quality,
            });
        }
        Ok(requests)
    }

    fn count(&self, state: CollisionState) -> usize {
        self.items.iter().filter(|i| i.collision == state).count()
    }
}

/// Windows and macOS volumes are case-insensitive by default, so there two
/// names differing only in case land on the same file.
fn clash_key(destination: &str) -> String {
    if cfg!(any(windows, target_os = "macos")) {
        destination.to_lowercase()
    } else {
        destination.to_string()
    }
}

fn issue(index: usize, item: &mut SaveItem, directory: &str) -> CheckTicket {
    item.generation = next_stamp();
    item.collision = CollisionState::Checking;
    CheckTicket {
        index,
        generation: item.generation,
        destination: item.destination(directory),
    }
}

fn validate_filename(index: usize, name: &str) -> Result<(), StagingError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || !sanitize_filename::is_sanitized(trimmed) {
        return Err(StagingError::InvalidFilename {
            index,
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
