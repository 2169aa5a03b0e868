use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, Once};

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio::sync::Notify;

use crate::services::backend::{DirEntry, ImageBackend, ImageMetadata, SaveRequest, SaveResult};
use crate::services::config::DestinationStore;
use crate::types::errors::BackendError;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        // Initialize logger only once
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Single-connection in-memory database (no shared cache needed).
pub async fn init_test_pool() -> SqlitePool {
    init_logger();
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database")
}

/// Scriptable in-memory stand-in for the image/filesystem backend.
/// Paths use `/` separators and `/` is the only root.
pub struct MockBackend {
    pub home: String,
    images: Mutex<HashMap<String, ImageMetadata>>,
    dirs: Mutex<HashMap<String, Vec<DirEntry>>>,
    existing: Mutex<HashSet<String>>,
    broken_exists: Mutex<HashSet<String>>,
    save_failure: Mutex<Option<String>>,
    open_fails: Mutex<bool>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    pub saved: Mutex<Vec<Vec<SaveRequest>>>,
    pub opened: Mutex<Vec<String>>,
    pub exists_calls: Mutex<Vec<String>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        init_logger();
        Self {
            home: "/home/user".to_string(),
            images: Mutex::new(HashMap::new()),
            dirs: Mutex::new(HashMap::new()),
            existing: Mutex::new(HashSet::new()),
            broken_exists: Mutex::new(HashSet::new()),
            save_failure: Mutex::new(None),
            open_fails: Mutex::new(false),
            gates: Mutex::new(HashMap::new()),
            saved: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
            exists_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_image(self, path: &str, width: u32, height: u32) -> Self {
        self.images.lock().unwrap().insert(
            path.to_string(),
            ImageMetadata {
                width,
                height,
                size_bytes: u64::from(width) * u64::from(height),
            },
        );
        self
    }

    /// Register a directory. Names ending in `/` are subdirectories.
    pub fn with_dir(self, path: &str, names: &[&str]) -> Self {
        let entries = names
            .iter()
            .map(|name| {
                let is_directory = name.ends_with('/');
                let name = name.trim_end_matches('/');
                DirEntry {
                    name: name.to_string(),
                    path: join(path, name),
                    is_directory,
                }
            })
            .collect();
        self.dirs.lock().unwrap().insert(path.to_string(), entries);
        self
    }

    pub fn with_existing(self, path: &str) -> Self {
        self.add_existing(path);
        self
    }

    pub fn add_existing(&self, path: &str) {
        self.existing.lock().unwrap().insert(path.to_string());
    }

    pub fn remove_dir(&self, path: &str) {
        self.dirs.lock().unwrap().remove(path);
    }

    pub fn break_exists_check(&self, path: &str) {
        self.broken_exists.lock().unwrap().insert(path.to_string());
    }

    pub fn fail_saves(&self, message: Option<&str>) {
        *self.save_failure.lock().unwrap() = message.map(str::to_string);
    }

    pub fn fail_opens(&self) {
        *self.open_fails.lock().unwrap() = true;
    }

    /// Hold every listing of `path` until the returned gate is notified.
    pub fn hold_listing(&self, path: &str) -> Arc<Notify> {
        self.hold(format!("list:{path}"))
    }

    /// Hold every metadata lookup of `path` until the gate is notified.
    pub fn hold_metadata(&self, path: &str) -> Arc<Notify> {
        self.hold(format!("meta:{path}"))
    }

    /// Hold every existence check of `path` until the gate is notified.
    pub fn hold_exists(&self, path: &str) -> Arc<Notify> {
        self.hold(format!("exists:{path}"))
    }

    fn hold(&self, key: String) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(key, Arc::clone(&gate));
        gate
    }

    async fn pass(&self, key: String) {
        let gate = self.gates.lock().unwrap().get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    pub fn saved_batches(&self) -> Vec<Vec<SaveRequest>> {
        self.saved.lock().unwrap().clone()
    }
}

pub fn join(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

impl ImageBackend for MockBackend {
    async fn get_image_metadata(&self, path: &str) -> Result<ImageMetadata, BackendError> {
        self.pass(format!("meta:{path}")).await;
        self.images
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .ok_or_else(|| BackendError::Metadata {
                path: path.to_string(),
                message: "not an image".to_string(),
            })
    }

    async fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>, BackendError> {
        self.pass(format!("list:{path}")).await;
        self.dirs
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| BackendError::Access {
                path: path.to_string(),
                message: "permission denied".to_string(),
            })
    }

    async fn get_parent_directory(&self, path: &str) -> Result<String, BackendError> {
        match path.trim_end_matches('/').rsplit_once('/') {
            Some(("", _)) => Ok("/".to_string()),
            Some((parent, _)) => Ok(parent.to_string()),
            None => Err(BackendError::ParentNavigation(path.to_string())),
        }
    }

    async fn get_home_directory(&self) -> Result<String, BackendError> {
        Ok(self.home.clone())
    }

    async fn file_exists(&self, path: &str) -> Result<bool, BackendError> {
        self.exists_calls.lock().unwrap().push(path.to_string());
        self.pass(format!("exists:{path}")).await;
        if self.broken_exists.lock().unwrap().contains(path) {
            return Err(BackendError::ExistenceCheck {
                path: path.to_string(),
                message: "oracle unavailable".to_string(),
            });
        }
        Ok(self.existing.lock().unwrap().contains(path))
    }

    async fn save_images(&self, requests: Vec<SaveRequest>) -> Result<SaveResult, BackendError> {
        if let Some(message) = self.save_failure.lock().unwrap().clone() {
            return Err(BackendError::Save(message));
        }
        let saved_count = requests.len();
        {
            let mut existing = self.existing.lock().unwrap();
            existing.extend(requests.iter().map(|r| r.destination_path.clone()));
        }
        self.saved.lock().unwrap().push(requests);
        Ok(SaveResult {
            success: true,
            saved_count,
        })
    }

    async fn open_path(&self, path: &str) -> Result<(), BackendError> {
        if *self.open_fails.lock().unwrap() {
            return Err(BackendError::OpenFolder {
                path: path.to_string(),
                message: "no viewer".to_string(),
            });
        }
        self.opened.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

/// In-memory destination store recording every remembered directory.
#[derive(Default)]
pub struct MemoryStore {
    pub last: Mutex<Option<String>>,
    pub remembered: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn with_last(directory: &str) -> Self {
        Self {
            last: Mutex::new(Some(directory.to_string())),
            remembered: Mutex::new(Vec::new()),
        }
    }
}

impl DestinationStore for MemoryStore {
    fn last_destination(&self) -> Option<String> {
        self.last.lock().unwrap().clone()
    }

    async fn remember_destination(&self, directory: &str) {
        *self.last.lock().unwrap() = Some(directory.to_string());
        self.remembered.lock().unwrap().push(directory.to_string());
    }
}
