// Application export/import resource selection and datasource de-duplication

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod models;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::import_export::{ApplicationResources, ImportExportHelper};
pub use crate::core::permissions::{AclPermission, DefaultPermissions, PermissionProvider, ResourceKind};
pub use crate::core::stores::Stores;

pub use error::AppError;
