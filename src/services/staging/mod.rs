//! Save staging: the transient review step between "save" and the batch
//! write. Derives default names, tracks per-item collision checks and
//! assembles the final save instructions.

pub mod naming;
pub mod session;
pub mod types;

pub use naming::{default_file_stem, destination_path, source_extension};
pub use session::SaveStaging;
pub use types::{
    CheckTicket, CollisionState, OutputFormat, OutputSpec, SaveItem, StagingError, StagingSummary,
};
