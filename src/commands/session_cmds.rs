//! Commands driving the batch session held in [`TransformState`].
//!
//! Each command is a thin wrapper over a `*_inner` function generic over
//! the backend and the destination store, so the session logic runs in
//! tests without a webview. Mutating commands return a fresh
//! [`SessionView`] snapshot.

use futures_util::future::join_all;

use crate::commands::state::TransformState;
use crate::services::backend::{DirEntry, ImageBackend};
use crate::services::collection::files::lookup_metadata;
use crate::services::collection::IngestReport;
use crate::services::config::DestinationStore;
use crate::services::dimensions::ResizeEdit;
use crate::services::navigator::{fetch_listing, NavTicket};
use crate::services::staging::{CheckTicket, OutputFormat};
use crate::services::transform::{PickerKind, SessionView};
use crate::types::errors::CommandResult;

#[cfg(feature = "desktop")]
use tauri::State;

// ─── Inner (testable) ──────────────────────────────────────────────
//
// The session lock is never held across a backend call: each command
// issues tickets under the lock, awaits the backend unlocked, then
// re-locks to apply. Cancel and other commands stay responsive while a
// call is pending, and answers that went stale meanwhile are discarded.

pub async fn get_session_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
) -> SessionView {
    state.session.lock().await.view()
}

/// Look up metadata for the new paths concurrently and append the
/// successes. Shared by the image picker and the drag-drop bridge.
pub async fn ingest_paths_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    paths: Vec<String>,
) -> IngestReport {
    let (backend, admitted, skipped) = {
        let session = state.session.lock().await;
        let (admitted, skipped) = session.admit(paths);
        (session.backend(), admitted, skipped)
    };

    let lookups = lookup_metadata(backend.as_ref(), admitted).await;
    state.session.lock().await.finish_ingest(lookups, skipped)
}

pub async fn remove_file_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    index: usize,
) -> CommandResult<SessionView> {
    let mut session = state.session.lock().await;
    session.remove(index)?;
    Ok(session.view())
}

pub async fn clear_files_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
) -> SessionView {
    let mut session = state.session.lock().await;
    session.clear();
    session.view()
}

pub async fn edit_global_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    edit: ResizeEdit,
) -> SessionView {
    let mut session = state.session.lock().await;
    session.edit_global(edit);
    session.view()
}

pub async fn set_output_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    format: Option<OutputFormat>,
    quality: Option<u8>,
) -> SessionView {
    let mut session = state.session.lock().await;
    if let Some(format) = format {
        session.set_output_format(format);
    }
    if let Some(quality) = quality {
        session.set_output_quality(quality);
    }
    session.view()
}

pub async fn set_use_custom_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    index: usize,
    enabled: bool,
) -> CommandResult<SessionView> {
    let mut session = state.session.lock().await;
    session.set_use_custom(index, enabled)?;
    Ok(session.view())
}

pub async fn edit_entry_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    index: usize,
    edit: ResizeEdit,
) -> CommandResult<SessionView> {
    let mut session = state.session.lock().await;
    session.edit_entry(index, edit)?;
    Ok(session.view())
}

pub async fn open_image_picker_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
) -> SessionView {
    let (backend, ticket) = {
        let mut session = state.session.lock().await;
        (session.backend(), session.open_image_picker())
    };
    settle_listing(state, backend.as_ref(), PickerKind::Images, ticket).await
}

pub async fn confirm_image_picker_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
) -> CommandResult<IngestReport> {
    let paths = state.session.lock().await.confirm_image_picker()?;
    Ok(ingest_paths_inner(state, paths).await)
}

pub async fn picker_navigate_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    kind: PickerKind,
    path: &str,
) -> CommandResult<SessionView> {
    let (backend, ticket) = {
        let mut session = state.session.lock().await;
        let ticket = session.picker_navigate(kind, path)?;
        (session.backend(), ticket)
    };
    Ok(settle_listing(state, backend.as_ref(), kind, ticket).await)
}

/// At a root, or before anything is listed, this leaves the picker as is.
pub async fn picker_up_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    kind: PickerKind,
) -> CommandResult<SessionView> {
    let (backend, ticket) = {
        let mut session = state.session.lock().await;
        let Some(ticket) = session.picker_up(kind)? else {
            return Ok(session.view());
        };
        (session.backend(), ticket)
    };
    Ok(settle_listing(state, backend.as_ref(), kind, ticket).await)
}

pub async fn picker_activate_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    kind: PickerKind,
    entry: &DirEntry,
) -> CommandResult<SessionView> {
    let (backend, ticket) = {
        let mut session = state.session.lock().await;
        let Some(ticket) = session.picker_activate(kind, entry)? else {
            return Ok(session.view());
        };
        (session.backend(), ticket)
    };
    Ok(settle_listing(state, backend.as_ref(), kind, ticket).await)
}

pub async fn picker_dismiss_error_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    kind: PickerKind,
) -> CommandResult<SessionView> {
    let mut session = state.session.lock().await;
    session.picker_dismiss_error(kind)?;
    Ok(session.view())
}

pub async fn picker_cancel_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    kind: PickerKind,
) -> SessionView {
    let mut session = state.session.lock().await;
    session.picker_cancel(kind);
    session.view()
}

pub async fn begin_save_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
) -> CommandResult<SessionView> {
    let (backend, ticket) = {
        let mut session = state.session.lock().await;
        let ticket = session.begin_save()?;
        (session.backend(), ticket)
    };
    Ok(settle_listing(state, backend.as_ref(), PickerKind::Destination, ticket).await)
}

/// Confirm the destination, remember it, open staging and check every
/// item.
pub async fn confirm_folder_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
) -> CommandResult<SessionView> {
    let (backend, store, directory, tickets) = {
        let mut session = state.session.lock().await;
        let directory = session.open_staging()?;
        let tickets = session.issue_all_checks()?;
        (session.backend(), session.store(), directory, tickets)
    };

    store.remember_destination(&directory).await;
    settle_checks(state, backend.as_ref(), tickets).await;
    Ok(get_session_inner(state).await)
}

pub async fn rename_file_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    index: usize,
    name: String,
) -> CommandResult<SessionView> {
    let mut session = state.session.lock().await;
    session.rename(index, name)?;
    Ok(session.view())
}

/// Re-check one item after its name edit is committed.
pub async fn commit_filename_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    index: usize,
) -> CommandResult<SessionView> {
    let (backend, ticket) = {
        let mut session = state.session.lock().await;
        let ticket = session.issue_commit_check(index)?;
        (session.backend(), ticket)
    };

    settle_checks(state, backend.as_ref(), vec![ticket]).await;
    Ok(get_session_inner(state).await)
}

/// Settle outstanding checks, then write the batch. On failure staging
/// stays open for a retry.
pub async fn confirm_save_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
) -> CommandResult<SessionView> {
    let (backend, tickets) = {
        let mut session = state.session.lock().await;
        (session.backend(), session.issue_unsettled_checks()?)
    };
    settle_checks(state, backend.as_ref(), tickets).await;

    let requests = state.session.lock().await.take_save_batch()?;
    let result = backend.save_images(requests).await;

    let mut session = state.session.lock().await;
    session.finish_save(result)?;
    Ok(session.view())
}

pub async fn cancel_save_flow_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
) -> SessionView {
    let mut session = state.session.lock().await;
    session.cancel_save_flow();
    session.view()
}

/// Open the last saved directory in the system viewer. `Some(warning)`
/// when the viewer could not be launched.
pub async fn open_output_folder_inner<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
) -> CommandResult<Option<String>> {
    let (backend, directory) = {
        let session = state.session.lock().await;
        (session.backend(), session.output_folder()?)
    };

    match backend.open_path(&directory).await {
        Ok(()) => Ok(None),
        Err(e) => {
            log::warn!("Could not open output folder: {e}");
            Ok(Some(e.to_string()))
        }
    }
}

async fn settle_listing<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    backend: &B,
    kind: PickerKind,
    ticket: NavTicket,
) -> SessionView {
    let outcome = fetch_listing(backend, &ticket.request).await;

    let mut session = state.session.lock().await;
    session.apply_listing(kind, &ticket, outcome);
    session.view()
}

/// Run existence checks concurrently, then apply each result. Results
/// for items edited (or staging closed) in the meantime are discarded.
async fn settle_checks<B: ImageBackend, S: DestinationStore>(
    state: &TransformState<B, S>,
    backend: &B,
    tickets: Vec<CheckTicket>,
) {
    if tickets.is_empty() {
        return;
    }
    let results = join_all(
        tickets
            .iter()
            .map(|ticket| backend.file_exists(&ticket.destination)),
    )
    .await;

    let mut session = state.session.lock().await;
    for (ticket, result) in tickets.iter().zip(results) {
        session.apply_check(ticket, result);
    }
}

// ─── Tauri Commands ────────────────────────────────────────────────

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn get_session(state: State<'_, TransformState>) -> CommandResult<SessionView> {
    Ok(get_session_inner(state.inner()).await)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn ingest_paths(
    paths: Vec<String>,
    state: State<'_, TransformState>,
) -> CommandResult<IngestReport> {
    Ok(ingest_paths_inner(state.inner(), paths).await)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn remove_file(
    index: usize,
    state: State<'_, TransformState>,
) -> CommandResult<SessionView> {
    remove_file_inner(state.inner(), index).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn clear_files(state: State<'_, TransformState>) -> CommandResult<SessionView> {
    Ok(clear_files_inner(state.inner()).await)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn edit_global_resize(
    edit: ResizeEdit,
    state: State<'_, TransformState>,
) -> CommandResult<SessionView> {
    Ok(edit_global_inner(state.inner(), edit).await)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn set_output(
    format: Option<OutputFormat>,
    quality: Option<u8>,
    state: State<'_, TransformState>,
) -> CommandResult<SessionView> {
    Ok(set_output_inner(state.inner(), format, quality).await)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn set_use_custom_dimensions(
    index: usize,
    enabled: bool,
    state: State<'_, TransformState>,
) -> CommandResult<SessionView> {
    set_use_custom_inner(state.inner(), index, enabled).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn edit_entry_resize(
    index: usize,
    edit: ResizeEdit,
    state: State<'_, TransformState>,
) -> CommandResult<SessionView> {
    edit_entry_inner(state.inner(), index, edit).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn open_image_picker(state: State<'_, TransformState>) -> CommandResult<SessionView> {
    Ok(open_image_picker_inner(state.inner()).await)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn confirm_image_picker(
    state: State<'_, TransformState>,
) -> CommandResult<IngestReport> {
    confirm_image_picker_inner(state.inner()).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn picker_navigate(
    kind: PickerKind,
    path: String,
    state: State<'_, TransformState>,
) -> CommandResult<SessionView> {
    picker_navigate_inner(state.inner(), kind, &path).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn picker_up(
    kind: PickerKind,
    state: State<'_, TransformState>,
) -> CommandResult<SessionView> {
    picker_up_inner(state.inner(), kind).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn picker_activate(
    kind: PickerKind,
    entry: DirEntry,
    state: State<'_, TransformState>,
) -> CommandResult<SessionView> {
    picker_activate_inner(state.inner(), kind, &entry).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn picker_dismiss_error(
    kind: PickerKind,
    state: State<'_, TransformState>,
) -> CommandResult<SessionView> {
    picker_dismiss_error_inner(state.inner(), kind).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn picker_cancel(
    kind: PickerKind,
    state: State<'_, TransformState>,
) -> CommandResult<SessionView> {
    Ok(picker_cancel_inner(state.inner(), kind).await)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn begin_save(state: State<'_, TransformState>) -> CommandResult<SessionView> {
    begin_save_inner(state.inner()).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn confirm_folder(state: State<'_, TransformState>) -> CommandResult<SessionView> {
    confirm_folder_inner(state.inner()).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn rename_file(
    index: usize,
    name: String,
    state: State<'_, TransformState>,
) -> CommandResult<SessionView> {
    rename_file_inner(state.inner(), index, name).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn commit_filename(
    index: usize,
    state: State<'_, TransformState>,
) -> CommandResult<SessionView> {
    commit_filename_inner(state.inner(), index).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn confirm_save(state: State<'_, TransformState>) -> CommandResult<SessionView> {
    confirm_save_inner(state.inner()).await
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn cancel_save_flow(state: State<'_, TransformState>) -> CommandResult<SessionView> {
    Ok(cancel_save_flow_inner(state.inner()).await)
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub async fn open_output_folder(
    state: State<'_, TransformState>,
) -> CommandResult<Option<String>> {
    open_output_folder_inner(state.inner()).await
}

#[cfg(test)]
#[path = "tests/session_cmds_tests.rs"]
mod tests;
