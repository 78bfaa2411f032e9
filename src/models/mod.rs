pub mod action;
pub mod action_collection;
pub mod application;
pub mod custom_js_lib;
pub mod datasource;
pub mod objective;
pub mod page;
pub mod plugin;
pub mod resource;
pub mod schema;
pub mod theme;
pub mod workspace;

pub use action::*;
pub use action_collection::*;
pub use application::*;
pub use custom_js_lib::*;
pub use datasource::*;
pub use objective::*;
pub use page::*;
pub use plugin::*;
pub use resource::{BaseDomain, DeletableResource, DraftPublished, ResourceMode};
pub use theme::*;
pub use workspace::*;
