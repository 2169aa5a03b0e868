#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Once};

use batch_resizer_lib::commands::state::TransformState;
use batch_resizer_lib::services::backend::LocalBackend;
use batch_resizer_lib::services::config::ConfigService;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub async fn init_test_pool() -> SqlitePool {
    init_logger();
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database")
}

pub struct TestContext {
    pub pool: SqlitePool,
    pub config: Arc<ConfigService>,
    pub state: TransformState<LocalBackend, ConfigService>,
}

pub async fn init_context() -> TestContext {
    let pool = init_test_pool().await;
    let config = Arc::new(ConfigService::init(pool.clone()).await);
    let state = TransformState::new(Arc::new(LocalBackend::new()), Arc::clone(&config));
    TestContext {
        pool,
        config,
        state,
    }
}

/// Write a solid-colour PNG fixture and return its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> String {
    let path = dir.join(name);
    image::RgbImage::from_pixel(width, height, image::Rgb([30, 160, 90]))
        .save(&path)
        .expect("write fixture");
    path.to_string_lossy().to_string()
}

pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
