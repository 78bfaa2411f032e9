pub mod import_export;
pub mod permissions;
pub mod stores;
