pub mod commands;
pub mod database;
pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

#[cfg(feature = "desktop")]
use tauri::{Emitter, Manager};
#[cfg(feature = "desktop")]
use tauri_plugin_log::{Target, TargetKind};

/// Event emitted after dropped files were ingested. Payload: `IngestReport`.
pub const FILES_CHANGED_EVENT: &str = "files-changed";

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use std::sync::Arc;

    use commands::state::TransformState;
    use services::backend::LocalBackend;
    use services::config::ConfigService;

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .plugin(
            tauri_plugin_log::Builder::default()
                .targets([
                    Target::new(TargetKind::Stdout),
                    Target::new(TargetKind::LogDir {
                        file_name: Some("batch-resizer".into()),
                    }),
                    Target::new(TargetKind::Webview),
                ])
                .level(log::LevelFilter::Info)
                .build(),
        )
        .setup(move |app| {
            let app_data_dir = app.path().app_data_dir()?;
            if !app_data_dir.exists() {
                std::fs::create_dir_all(&app_data_dir)?;
            }
            let db_path = app_data_dir.join("app.db");

            let config = tauri::async_runtime::block_on(async {
                use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
                let opts = SqliteConnectOptions::new()
                    .filename(&db_path)
                    .create_if_missing(true);
                let pool = SqlitePoolOptions::new()
                    .max_connections(2)
                    .connect_with(opts)
                    .await?;
                Ok::<_, sqlx::Error>(ConfigService::init(pool).await)
            })?;
            let config = Arc::new(config);

            app.manage(Arc::clone(&config));
            app.manage(TransformState::new(Arc::new(LocalBackend::new()), config));
            log::info!("Settings database ready at {}", db_path.display());
            Ok(())
        })
        .on_window_event(|window, event| {
            // Dropped files join the batch like a manual pick.
            if let tauri::WindowEvent::DragDrop(tauri::DragDropEvent::Drop { paths, .. }) = event {
                let paths: Vec<String> = paths
                    .iter()
                    .map(|p| p.to_string_lossy().to_string())
                    .collect();
                let app = window.app_handle().clone();
                tauri::async_runtime::spawn(async move {
                    let state = app.state::<TransformState>();
                    let report =
                        commands::session_cmds::ingest_paths_inner(state.inner(), paths).await;
                    if let Err(e) = app.emit(FILES_CHANGED_EVENT, &report) {
                        log::warn!("Failed to emit {FILES_CHANGED_EVENT}: {e}");
                    }
                });
            }
        })
        .invoke_handler(tauri::generate_handler![
            commands::backend_cmds::get_image_metadata,
            commands::backend_cmds::list_directory,
            commands::backend_cmds::get_home_directory,
            commands::backend_cmds::get_parent_directory,
            commands::backend_cmds::file_exists,
            commands::backend_cmds::save_images,
            commands::backend_cmds::open_path_in_viewer,
            commands::backend_cmds::get_last_destination,
            commands::session_cmds::get_session,
            commands::session_cmds::ingest_paths,
            commands::session_cmds::remove_file,
            commands::session_cmds::clear_files,
            commands::session_cmds::edit_global_resize,
            commands::session_cmds::set_output,
            commands::session_cmds::set_use_custom_dimensions,
            commands::session_cmds::edit_entry_resize,
            commands::session_cmds::open_image_picker,
            commands::session_cmds::confirm_image_picker,
            commands::session_cmds::picker_navigate,
            commands::session_cmds::picker_up,
            commands::session_cmds::picker_activate,
            commands::session_cmds::picker_dismiss_error,
            commands::session_cmds::picker_cancel,
            commands::session_cmds::begin_save,
            commands::session_cmds::confirm_folder,
            commands::session_cmds::rename_file,
            commands::session_cmds::commit_filename,
            commands::session_cmds::confirm_save,
            commands::session_cmds::cancel_save_flow,
            commands::session_cmds::open_output_folder,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
