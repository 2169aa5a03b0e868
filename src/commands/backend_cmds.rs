//! Direct collaborator calls, for frontend code that needs them outside the
//! batch session (thumbnails, ad-hoc checks).

use std::sync::Arc;

use tauri::State;

use crate::services::backend::{
    DirEntry, ImageBackend, ImageMetadata, LocalBackend, SaveRequest, SaveResult,
};
use crate::services::config::ConfigService;
use crate::types::errors::CommandResult;

#[tauri::command]
pub async fn get_image_metadata(path: String) -> CommandResult<ImageMetadata> {
    Ok(LocalBackend.get_image_metadata(&path).await?)
}

#[tauri::command]
pub async fn list_directory(path: String) -> CommandResult<Vec<DirEntry>> {
    Ok(LocalBackend.list_directory(&path).await?)
}

#[tauri::command]
pub async fn get_home_directory() -> CommandResult<String> {
    Ok(LocalBackend.get_home_directory().await?)
}

#[tauri::command]
pub async fn get_parent_directory(path: String) -> CommandResult<String> {
    Ok(LocalBackend.get_parent_directory(&path).await?)
}

#[tauri::command]
pub async fn file_exists(path: String) -> CommandResult<bool> {
    Ok(LocalBackend.file_exists(&path).await?)
}

#[tauri::command]
pub async fn save_images(requests: Vec<SaveRequest>) -> CommandResult<SaveResult> {
    Ok(LocalBackend.save_images(requests).await?)
}

#[tauri::command]
pub async fn open_path_in_viewer(path: String) -> CommandResult<()> {
    Ok(LocalBackend.open_path(&path).await?)
}

#[tauri::command]
pub async fn get_last_destination(
    config: State<'_, Arc<ConfigService>>,
) -> CommandResult<Option<String>> {
    Ok(config.get_last_destination())
}
