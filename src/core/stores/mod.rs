//! Collaborators the import/export helper reads from and writes to.
//!
//! Absence is never an error at this layer: lookups answer `Ok(None)` or an
//! empty `Vec`, and only transport or database failures surface as `Err`.

pub mod memory;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::permissions::AclPermission;
use crate::error::AppError;
use crate::models::{
    ActionCollection, Application, CustomJsLib, Datasource, NewAction, NewPage, Theme, Workspace,
};

pub use memory::{InMemorySequenceAllocator, InMemoryStore};

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// `permission: None` skips the permission check.
    async fn find_by_id(
        &self,
        id: &str,
        permission: Option<AclPermission>,
    ) -> Result<Option<Application>, AppError>;

    async fn find_by_id_and_export_with_configuration(
        &self,
        id: &str,
        export_with_configuration: bool,
    ) -> Result<Option<Application>, AppError>;
}

#[async_trait]
pub trait PageStore: Send + Sync {
    async fn find_by_application_id(
        &self,
        application_id: &str,
        permission: Option<AclPermission>,
    ) -> Result<Vec<NewPage>, AppError>;
}

#[async_trait]
pub trait ActionStore: Send + Sync {
    async fn find_by_application_id(
        &self,
        application_id: &str,
        permission: Option<AclPermission>,
    ) -> Result<Vec<NewAction>, AppError>;
}

#[async_trait]
pub trait ActionCollectionStore: Send + Sync {
    async fn find_by_application_id(
        &self,
        application_id: &str,
        permission: Option<AclPermission>,
    ) -> Result<Vec<ActionCollection>, AppError>;
}

#[async_trait]
pub trait DatasourceStore: Send + Sync {
    async fn find_all_by_workspace_id(
        &self,
        workspace_id: &str,
        permission: Option<AclPermission>,
    ) -> Result<Vec<Datasource>, AppError>;

    async fn find_by_name_and_workspace_id(
        &self,
        name: &str,
        workspace_id: &str,
        permission: AclPermission,
    ) -> Result<Option<Datasource>, AppError>;

    /// Persists a new datasource and returns it with its assigned id.
    async fn create(&self, datasource: Datasource) -> Result<Datasource, AppError>;
}

#[async_trait]
pub trait ThemeStore: Send + Sync {
    async fn get_theme_by_id(
        &self,
        id: Option<&str>,
        permission: AclPermission,
    ) -> Result<Option<Theme>, AppError>;

    async fn get_default_theme(&self) -> Result<Theme, AppError>;
}

#[async_trait]
pub trait CustomJsLibStore: Send + Sync {
    /// Libraries installed in the application's draft state.
    async fn get_all_js_libs_in_application(
        &self,
        application_id: &str,
    ) -> Result<Vec<CustomJsLib>, AppError>;
}

#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    async fn find_by_id(
        &self,
        id: &str,
        permission: AclPermission,
    ) -> Result<Option<Workspace>, AppError>;
}

/// Hands out per-scope sequence numbers for name disambiguation.
#[async_trait]
pub trait SequenceAllocator: Send + Sync {
    /// Empty on the first allocation for `entity_kind` + `scope`, otherwise
    /// the allocated number as a string.
    async fn next_suffix_for(&self, entity_kind: &str, scope: &str) -> Result<String, AppError>;
}

/// Creates an application, bumping a `" (n)"` suffix until the name is free.
#[async_trait]
pub trait SuffixedApplicationCreator: Send + Sync {
    async fn create_or_update_suffixed_application(
        &self,
        application: Application,
        name: &str,
        suffix: u32,
    ) -> Result<Application, AppError>;
}

/// Every collaborator the helper needs, behind shared handles.
#[derive(Clone)]
pub struct Stores {
    pub applications: Arc<dyn ApplicationStore>,
    pub pages: Arc<dyn PageStore>,
    pub actions: Arc<dyn ActionStore>,
    pub action_collections: Arc<dyn ActionCollectionStore>,
    pub datasources: Arc<dyn DatasourceStore>,
    pub themes: Arc<dyn ThemeStore>,
    pub custom_js_libs: Arc<dyn CustomJsLibStore>,
    pub workspaces: Arc<dyn WorkspaceStore>,
    pub sequences: Arc<dyn SequenceAllocator>,
    pub application_creator: Arc<dyn SuffixedApplicationCreator>,
}

impl Stores {
    /// Backs every store with one in-memory instance.
    pub fn in_memory(store: Arc<InMemoryStore>, sequences: Arc<dyn SequenceAllocator>) -> Self {
        Self {
            applications: store.clone(),
            pages: store.clone(),
            actions: store.clone(),
            action_collections: store.clone(),
            datasources: store.clone(),
            themes: store.clone(),
            custom_js_libs: store.clone(),
            workspaces: store.clone(),
            sequences,
            application_creator: store,
        }
    }
}
