use std::sync::Arc;

use tokio::sync::Mutex;

use crate::services::backend::{ImageBackend, LocalBackend};
use crate::services::config::{ConfigService, DestinationStore};
use crate::services::transform::TransformController;

/// Managed state holding the one batch session of the window.
pub struct TransformState<B = LocalBackend, S = ConfigService> {
    pub session: Mutex<TransformController<B, S>>,
}

impl<B: ImageBackend, S: DestinationStore> TransformState<B, S> {
    pub fn new(backend: Arc<B>, store: Arc<S>) -> Self {
        Self {
            session: Mutex::new(TransformController::new(backend, store)),
        }
    }
}
