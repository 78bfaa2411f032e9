use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{
    ActionCollectionStore, ActionStore, ApplicationStore, CustomJsLibStore, DatasourceStore,
    PageStore, SequenceAllocator, SuffixedApplicationCreator, ThemeStore, WorkspaceStore,
};
use crate::core::permissions::AclPermission;
use crate::error::AppError;
use crate::models::{
    ActionCollection, Application, CustomJsLib, Datasource, DeletableResource, NewAction, NewPage,
    Theme, Workspace,
};

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    granted: HashSet<AclPermission>,
}

impl<T: Clone> Entry<T> {
    fn new(value: T, granted: &[AclPermission]) -> Self {
        Self {
            value,
            granted: granted.iter().copied().collect(),
        }
    }

    fn visible(&self, permission: Option<AclPermission>) -> bool {
        permission.map_or(true, |p| self.granted.contains(&p))
    }
}

impl<T: DeletableResource> Entry<T> {
    fn live(&self) -> bool {
        self.value.deleted_at().is_none()
    }
}

#[derive(Debug, Default)]
struct MemoryData {
    applications: Vec<Entry<Application>>,
    pages: Vec<Entry<NewPage>>,
    actions: Vec<Entry<NewAction>>,
    action_collections: Vec<Entry<ActionCollection>>,
    datasources: Vec<Entry<Datasource>>,
    themes: Vec<Entry<Theme>>,
    default_theme: Option<Theme>,
    custom_js_libs: HashMap<String, Vec<CustomJsLib>>,
    workspaces: Vec<Entry<Workspace>>,
}

/// Process-local store backing every collaborator trait.
///
/// Records added without an explicit permission list are granted every
/// permission; soft-deleted records are never returned by lookups.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<MemoryData>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_application(&self, application: Application) {
        self.add_application_with_permissions(application, &AclPermission::ALL)
            .await;
    }

    pub async fn add_application_with_permissions(
        &self,
        application: Application,
        granted: &[AclPermission],
    ) {
        let mut data = self.data.write().await;
        data.applications.push(Entry::new(application, granted));
    }

    pub async fn add_page(&self, page: NewPage) {
        self.add_page_with_permissions(page, &AclPermission::ALL).await;
    }

    pub async fn add_page_with_permissions(&self, page: NewPage, granted: &[AclPermission]) {
        let mut data = self.data.write().await;
        data.pages.push(Entry::new(page, granted));
    }

    pub async fn add_action(&self, action: NewAction) {
        self.add_action_with_permissions(action, &AclPermission::ALL)
            .await;
    }

    pub async fn add_action_with_permissions(&self, action: NewAction, granted: &[AclPermission]) {
        let mut data = self.data.write().await;
        data.actions.push(Entry::new(action, granted));
    }

    pub async fn add_action_collection(&self, collection: ActionCollection) {
        self.add_action_collection_with_permissions(collection, &AclPermission::ALL)
            .await;
    }

    pub async fn add_action_collection_with_permissions(
        &self,
        collection: ActionCollection,
        granted: &[AclPermission],
    ) {
        let mut data = self.data.write().await;
        data.action_collections.push(Entry::new(collection, granted));
    }

    pub async fn add_datasource(&self, datasource: Datasource) {
        self.add_datasource_with_permissions(datasource, &AclPermission::ALL)
            .await;
    }

    pub async fn add_datasource_with_permissions(
        &self,
        datasource: Datasource,
        granted: &[AclPermission],
    ) {
        let mut data = self.data.write().await;
        data.datasources.push(Entry::new(datasource, granted));
    }

    pub async fn add_theme(&self, theme: Theme) {
        let mut data = self.data.write().await;
        data.themes.push(Entry::new(theme, &AclPermission::ALL));
    }

    pub async fn set_default_theme(&self, theme: Theme) {
        let mut data = self.data.write().await;
        data.default_theme = Some(theme);
    }

    pub async fn add_custom_js_lib(&self, application_id: &str, library: CustomJsLib) {
        let mut data = self.data.write().await;
        data.custom_js_libs
            .entry(application_id.to_string())
            .or_default()
            .push(library);
    }

    pub async fn add_workspace(&self, workspace: Workspace) {
        self.add_workspace_with_permissions(workspace, &AclPermission::ALL)
            .await;
    }

    pub async fn add_workspace_with_permissions(
        &self,
        workspace: Workspace,
        granted: &[AclPermission],
    ) {
        let mut data = self.data.write().await;
        data.workspaces.push(Entry::new(workspace, granted));
    }

    /// Every stored datasource, including soft-deleted ones, in insertion order.
    pub async fn datasources(&self) -> Vec<Datasource> {
        let data = self.data.read().await;
        data.datasources.iter().map(|e| e.value.clone()).collect()
    }

    pub async fn applications(&self) -> Vec<Application> {
        let data = self.data.read().await;
        data.applications.iter().map(|e| e.value.clone()).collect()
    }
}

#[async_trait]
impl ApplicationStore for InMemoryStore {
    async fn find_by_id(
        &self,
        id: &str,
        permission: Option<AclPermission>,
    ) -> Result<Option<Application>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .applications
            .iter()
            .filter(|e| e.live() && e.visible(permission))
            .find(|e| e.value.id.as_deref() == Some(id))
            .map(|e| e.value.clone()))
    }

    async fn find_by_id_and_export_with_configuration(
        &self,
        id: &str,
        export_with_configuration: bool,
    ) -> Result<Option<Application>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .applications
            .iter()
            .filter(|e| e.live())
            .find(|e| {
                e.value.id.as_deref() == Some(id)
                    && e.value.exports_with_configuration() == export_with_configuration
            })
            .map(|e| e.value.clone()))
    }
}

#[async_trait]
impl PageStore for InMemoryStore {
    async fn find_by_application_id(
        &self,
        application_id: &str,
        permission: Option<AclPermission>,
    ) -> Result<Vec<NewPage>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .pages
            .iter()
            .filter(|e| e.live() && e.visible(permission))
            .filter(|e| e.value.application_id == application_id)
            .map(|e| e.value.clone())
            .collect())
    }
}

#[async_trait]
impl ActionStore for InMemoryStore {
    async fn find_by_application_id(
        &self,
        application_id: &str,
        permission: Option<AclPermission>,
    ) -> Result<Vec<NewAction>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .actions
            .iter()
            .filter(|e| e.live() && e.visible(permission))
            .filter(|e| e.value.application_id == application_id)
            .map(|e| e.value.clone())
            .collect())
    }
}

#[async_trait]
impl ActionCollectionStore for InMemoryStore {
    async fn find_by_application_id(
        &self,
        application_id: &str,
        permission: Option<AclPermission>,
    ) -> Result<Vec<ActionCollection>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .action_collections
            .iter()
            .filter(|e| e.live() && e.visible(permission))
            .filter(|e| e.value.application_id == application_id)
            .map(|e| e.value.clone())
            .collect())
    }
}

#[async_trait]
impl DatasourceStore for InMemoryStore {
    async fn find_all_by_workspace_id(
        &self,
        workspace_id: &str,
        permission: Option<AclPermission>,
    ) -> Result<Vec<Datasource>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .datasources
            .iter()
            .filter(|e| e.live() && e.visible(permission))
            .filter(|e| e.value.workspace_id.as_deref() == Some(workspace_id))
            .map(|e| e.value.clone())
            .collect())
    }

    async fn find_by_name_and_workspace_id(
        &self,
        name: &str,
        workspace_id: &str,
        permission: AclPermission,
    ) -> Result<Option<Datasource>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .datasources
            .iter()
            .filter(|e| e.live() && e.visible(Some(permission)))
            .find(|e| {
                e.value.name == name && e.value.workspace_id.as_deref() == Some(workspace_id)
            })
            .map(|e| e.value.clone()))
    }

    async fn create(&self, mut datasource: Datasource) -> Result<Datasource, AppError> {
        let now = Utc::now();
        datasource.id = Some(Uuid::new_v4().to_string());
        datasource.created_at = Some(now);
        datasource.updated_at = Some(now);
        datasource.is_recently_created = Some(true);

        debug!(
            "Created datasource {} ({:?}) in workspace {:?}",
            datasource.name, datasource.id, datasource.workspace_id
        );

        let mut data = self.data.write().await;
        data.datasources
            .push(Entry::new(datasource.clone(), &AclPermission::ALL));
        Ok(datasource)
    }
}

#[async_trait]
impl ThemeStore for InMemoryStore {
    async fn get_theme_by_id(
        &self,
        id: Option<&str>,
        permission: AclPermission,
    ) -> Result<Option<Theme>, AppError> {
        let Some(id) = id else {
            return Ok(None);
        };
        let data = self.data.read().await;
        Ok(data
            .themes
            .iter()
            .filter(|e| e.visible(Some(permission)))
            .find(|e| e.value.id.as_deref() == Some(id))
            .map(|e| e.value.clone()))
    }

    async fn get_default_theme(&self) -> Result<Theme, AppError> {
        let data = self.data.read().await;
        Ok(data.default_theme.clone().unwrap_or_else(|| Theme {
            name: "Default".to_string(),
            display_name: Some("Modern".to_string()),
            is_system_theme: true,
            ..Default::default()
        }))
    }
}

#[async_trait]
impl CustomJsLibStore for InMemoryStore {
    async fn get_all_js_libs_in_application(
        &self,
        application_id: &str,
    ) -> Result<Vec<CustomJsLib>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .custom_js_libs
            .get(application_id)
            .map(|libs| {
                libs.iter()
                    .filter(|lib| lib.deleted_at.is_none())
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl WorkspaceStore for InMemoryStore {
    async fn find_by_id(
        &self,
        id: &str,
        permission: AclPermission,
    ) -> Result<Option<Workspace>, AppError> {
        let data = self.data.read().await;
        Ok(data
            .workspaces
            .iter()
            .filter(|e| e.visible(Some(permission)))
            .find(|e| e.value.id == id)
            .map(|e| e.value.clone()))
    }
}

#[async_trait]
impl SuffixedApplicationCreator for InMemoryStore {
    async fn create_or_update_suffixed_application(
        &self,
        mut application: Application,
        name: &str,
        suffix: u32,
    ) -> Result<Application, AppError> {
        let mut data = self.data.write().await;
        let mut suffix = suffix;

        // Checked and inserted under one write lock
        let actual_name = loop {
            let candidate = if suffix == 0 {
                name.to_string()
            } else {
                format!("{} ({})", name, suffix)
            };
            let taken = data.applications.iter().any(|e| {
                e.live()
                    && e.value.workspace_id == application.workspace_id
                    && e.value.name == candidate
            });
            if !taken {
                break candidate;
            }
            suffix += 1;
        };

        let now = Utc::now();
        application.id = Some(Uuid::new_v4().to_string());
        application.name = actual_name;
        application.created_at = Some(now);
        application.updated_at = Some(now);
        application.deleted_at = None;

        debug!(
            "Created application {} ({:?})",
            application.name, application.id
        );

        data.applications
            .push(Entry::new(application.clone(), &AclPermission::ALL));
        Ok(application)
    }
}

/// Sequence numbers kept in process memory, one counter per scope.
#[derive(Debug, Default)]
pub struct InMemorySequenceAllocator {
    counters: RwLock<HashMap<String, u64>>,
}

impl InMemorySequenceAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SequenceAllocator for InMemorySequenceAllocator {
    async fn next_suffix_for(&self, entity_kind: &str, scope: &str) -> Result<String, AppError> {
        let mut counters = self.counters.write().await;
        let counter = counters.entry(format!("{}{}", entity_kind, scope)).or_insert(0);
        *counter += 1;
        Ok(if *counter > 1 {
            counter.to_string()
        } else {
            String::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: &str, name: &str, workspace_id: &str) -> Application {
        Application {
            id: Some(id.to_string()),
            workspace_id: Some(workspace_id.to_string()),
            ..Application::new(name)
        }
    }

    #[tokio::test]
    async fn test_permission_filter() {
        let store = InMemoryStore::new();
        store
            .add_application_with_permissions(
                app("app-1", "Orders", "ws-1"),
                &[AclPermission::ReadApplications],
            )
            .await;

        let read = ApplicationStore::find_by_id(&store, "app-1", Some(AclPermission::ReadApplications))
            .await
            .unwrap();
        assert!(read.is_some());

        let edit = ApplicationStore::find_by_id(&store, "app-1", Some(AclPermission::ManageApplications))
            .await
            .unwrap();
        assert!(edit.is_none());

        let unfiltered = ApplicationStore::find_by_id(&store, "app-1", None).await.unwrap();
        assert!(unfiltered.is_some());
    }

    #[tokio::test]
    async fn test_soft_deleted_pages_are_hidden() {
        let store = InMemoryStore::new();
        store
            .add_page(NewPage {
                id: Some("page-1".to_string()),
                application_id: "app-1".to_string(),
                ..Default::default()
            })
            .await;
        store
            .add_page(NewPage {
                id: Some("page-2".to_string()),
                application_id: "app-1".to_string(),
                deleted_at: Some(Utc::now()),
                ..Default::default()
            })
            .await;

        let pages = PageStore::find_by_application_id(&store, "app-1", None)
            .await
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].id.as_deref(), Some("page-1"));
    }

    #[tokio::test]
    async fn test_suffixed_application_names() {
        let store = InMemoryStore::new();
        store.add_application(app("app-1", "Orders", "ws-1")).await;

        let candidate = Application {
            workspace_id: Some("ws-1".to_string()),
            ..Application::new("Orders")
        };
        let first = store
            .create_or_update_suffixed_application(candidate.clone(), "Orders", 0)
            .await
            .unwrap();
        assert_eq!(first.name, "Orders (1)");
        assert!(first.id.is_some());

        let second = store
            .create_or_update_suffixed_application(candidate, "Orders", 0)
            .await
            .unwrap();
        assert_eq!(second.name, "Orders (2)");
    }

    #[tokio::test]
    async fn test_sequence_allocator_scopes() {
        let sequences = InMemorySequenceAllocator::new();
        assert_eq!(sequences.next_suffix_for("datasource", " ws-1").await.unwrap(), "");
        assert_eq!(sequences.next_suffix_for("datasource", " ws-1").await.unwrap(), "2");
        assert_eq!(sequences.next_suffix_for("datasource", " ws-2").await.unwrap(), "");
        assert_eq!(sequences.next_suffix_for("datasource", " ws-1").await.unwrap(), "3");
    }

    #[tokio::test]
    async fn test_default_theme_fallback() {
        let store = InMemoryStore::new();
        let theme = store.get_default_theme().await.unwrap();
        assert!(theme.is_system_theme);

        store
            .set_default_theme(Theme {
                name: "Classic".to_string(),
                ..Default::default()
            })
            .await;
        assert_eq!(store.get_default_theme().await.unwrap().name, "Classic");
    }
}
