//! Composition root of the batch: owns the collection and both
//! specifications, re-applies the global rule on every edit, and drives
//! the pick-folder → staging → save flow.

pub mod controller;
pub mod types;

pub use controller::TransformController;
pub use types::{FlowView, PickerKind, SaveOutcome, SessionView, TransformError};
