pub mod backend;
pub mod collection;
pub mod config;
pub mod dimensions;
pub mod navigator;
pub mod stamp;
pub mod staging;
pub mod transform;
