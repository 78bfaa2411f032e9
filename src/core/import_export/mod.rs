//! Resource selection for application export and import.

pub mod helper;
pub mod utils;

pub use helper::{ApplicationResources, ImportExportHelper};
