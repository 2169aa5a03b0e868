//! Target dimension computation.
//!
//! `resolve` is the pure rule that turns a natural size plus a
//! [`ResizeSpec`] into integer target dimensions. [`ResizeEditor`] holds the
//! editable width/height/percentage fields and implements aspect locking
//! against the original ratio of a reference image.

pub mod editor;
pub mod resolver;
pub mod types;

pub use editor::ResizeEditor;
pub use resolver::resolve;
pub use types::{Dimensions, ResizeEdit, ResizeMode, ResizeSpec};
