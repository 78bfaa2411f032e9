use std::sync::Arc;

use tracing::{debug, info};

use crate::core::permissions::{
    resource_access_permission_for_objective, AclPermission, PermissionProvider, ResourceKind,
};
use crate::core::stores::Stores;
use crate::error::{field_name, AppError};
use crate::models::{
    ActionCollection, Application, CustomJsLib, Datasource, NewAction, NewPage,
    SerialiseApplicationObjective, Theme, Workspace,
};

/// Everything an export needs besides the application itself.
#[derive(Debug, Clone)]
pub struct ApplicationResources {
    pub pages: Vec<NewPage>,
    pub actions: Vec<NewAction>,
    pub action_collections: Vec<ActionCollection>,
    pub datasources: Vec<Datasource>,
    pub custom_js_libs: Vec<CustomJsLib>,
    pub edit_mode_theme: Theme,
    pub published_theme: Theme,
}

/// Fetches an application and its children with the permission the current
/// export or import objective calls for.
#[derive(Clone)]
pub struct ImportExportHelper {
    stores: Stores,
    permissions: Arc<dyn PermissionProvider>,
}

impl ImportExportHelper {
    pub fn new(stores: Stores, permissions: Arc<dyn PermissionProvider>) -> Self {
        Self {
            stores,
            permissions,
        }
    }

    fn permission_for(
        &self,
        application: Option<&Application>,
        objective: SerialiseApplicationObjective,
        kind: ResourceKind,
        is_import: bool,
    ) -> Option<AclPermission> {
        resource_access_permission_for_objective(
            application,
            objective,
            self.permissions.as_ref(),
            kind,
            is_import,
        )
    }

    /// Template applications are readable without permission checks.
    pub async fn fetch_template_application(
        &self,
        application_id: &str,
    ) -> Result<Application, AppError> {
        self.stores
            .applications
            .find_by_id_and_export_with_configuration(application_id, true)
            .await?
            .ok_or_else(|| AppError::not_found(field_name::APPLICATION_ID, application_id))
    }

    pub async fn fetch_application(
        &self,
        application_id: &str,
        objective: SerialiseApplicationObjective,
        is_import: bool,
    ) -> Result<Application, AppError> {
        let permission =
            self.permission_for(None, objective, ResourceKind::Application, is_import);

        if let Some(application) = self
            .stores
            .applications
            .find_by_id(application_id, permission)
            .await?
        {
            return Ok(application);
        }

        debug!(
            "Application {} not accessible with {:?}, trying template lookup",
            application_id, permission
        );
        self.fetch_template_application(application_id).await
    }

    pub async fn fetch_workspace(&self, workspace_id: &str) -> Result<Workspace, AppError> {
        self.stores
            .workspaces
            .find_by_id(
                workspace_id,
                self.permissions.application_create_permission(),
            )
            .await?
            .ok_or_else(|| AppError::not_found(field_name::WORKSPACE, workspace_id))
    }

    pub async fn fetch_pages_for_application(
        &self,
        application: &Application,
        objective: SerialiseApplicationObjective,
        is_import: bool,
    ) -> Result<Vec<NewPage>, AppError> {
        let Some(application_id) = application.id.as_deref() else {
            return Ok(Vec::new());
        };
        let permission =
            self.permission_for(Some(application), objective, ResourceKind::Page, is_import);
        self.stores
            .pages
            .find_by_application_id(application_id, permission)
            .await
    }

    pub async fn fetch_actions_for_application(
        &self,
        application: &Application,
        objective: SerialiseApplicationObjective,
        is_import: bool,
    ) -> Result<Vec<NewAction>, AppError> {
        let Some(application_id) = application.id.as_deref() else {
            return Ok(Vec::new());
        };
        let permission =
            self.permission_for(Some(application), objective, ResourceKind::Action, is_import);
        self.stores
            .actions
            .find_by_application_id(application_id, permission)
            .await
    }

    pub async fn fetch_collections_for_application(
        &self,
        application: &Application,
        objective: SerialiseApplicationObjective,
        is_import: bool,
    ) -> Result<Vec<ActionCollection>, AppError> {
        let Some(application_id) = application.id.as_deref() else {
            return Ok(Vec::new());
        };
        let permission =
            self.permission_for(Some(application), objective, ResourceKind::Action, is_import);
        self.stores
            .action_collections
            .find_by_application_id(application_id, permission)
            .await
    }

    pub async fn fetch_datasources_for_workspace(
        &self,
        workspace_id: &str,
        objective: SerialiseApplicationObjective,
        is_import: bool,
    ) -> Result<Vec<Datasource>, AppError> {
        let permission = self.permission_for(None, objective, ResourceKind::Datasource, is_import);
        self.stores
            .datasources
            .find_all_by_workspace_id(workspace_id, permission)
            .await
    }

    /// Sorted by uid so that repeated exports do not show up as changes.
    pub async fn get_all_custom_js_libs_for_application(
        &self,
        application: &Application,
    ) -> Result<Vec<CustomJsLib>, AppError> {
        let Some(application_id) = application.id.as_deref() else {
            return Ok(Vec::new());
        };
        let mut libs = self
            .stores
            .custom_js_libs
            .get_all_js_libs_in_application(application_id)
            .await?;
        libs.sort_by_key(CustomJsLib::uid_string);
        Ok(libs)
    }

    pub async fn get_application_edit_mode_theme_or_default(
        &self,
        application: &Application,
    ) -> Result<Theme, AppError> {
        self.theme_or_default(application.edit_mode_theme_id.as_deref())
            .await
    }

    pub async fn get_application_published_theme_or_default(
        &self,
        application: &Application,
    ) -> Result<Theme, AppError> {
        self.theme_or_default(application.published_mode_theme_id.as_deref())
            .await
    }

    async fn theme_or_default(&self, theme_id: Option<&str>) -> Result<Theme, AppError> {
        let permission = self.permissions.read_permission(ResourceKind::Theme);
        match self
            .stores
            .themes
            .get_theme_by_id(theme_id, permission)
            .await?
        {
            Some(theme) => Ok(theme),
            None => self.stores.themes.get_default_theme().await,
        }
    }

    /// Fetches all children of an already resolved application at once.
    pub async fn fetch_application_resources(
        &self,
        application: &Application,
        objective: SerialiseApplicationObjective,
        is_import: bool,
    ) -> Result<ApplicationResources, AppError> {
        let workspace_id = application.workspace_id.as_deref().unwrap_or_default();
        let datasources = async {
            if workspace_id.is_empty() {
                Ok(Vec::new())
            } else {
                self.fetch_datasources_for_workspace(workspace_id, objective, is_import)
                    .await
            }
        };

        let (
            pages,
            actions,
            action_collections,
            datasources,
            custom_js_libs,
            edit_mode_theme,
            published_theme,
        ) = futures::try_join!(
            self.fetch_pages_for_application(application, objective, is_import),
            self.fetch_actions_for_application(application, objective, is_import),
            self.fetch_collections_for_application(application, objective, is_import),
            datasources,
            self.get_all_custom_js_libs_for_application(application),
            self.get_application_edit_mode_theme_or_default(application),
            self.get_application_published_theme_or_default(application),
        )?;

        debug!(
            "Fetched {} pages, {} actions, {} collections, {} datasources for application {:?}",
            pages.len(),
            actions.len(),
            action_collections.len(),
            datasources.len(),
            application.id
        );

        Ok(ApplicationResources {
            pages,
            actions,
            action_collections,
            datasources,
            custom_js_libs,
            edit_mode_theme,
            published_theme,
        })
    }

    /// Existing application when `application_id` resolves with edit access,
    /// otherwise a new application created from `application_to_import`.
    pub async fn fetch_or_create_application_for_import(
        &self,
        application_id: Option<&str>,
        application_to_import: Application,
    ) -> Result<Application, AppError> {
        if let Some(id) = application_id.filter(|id| !id.trim().is_empty()) {
            let permission = self.permissions.edit_permission(ResourceKind::Application);
            if let Some(application) = self
                .stores
                .applications
                .find_by_id(id, Some(permission))
                .await?
            {
                return Ok(application);
            }
            debug!("Application {} not found for import, creating a new one", id);
        }

        let name = application_to_import.name.clone();
        self.stores
            .application_creator
            .create_or_update_suffixed_application(application_to_import, &name, 0)
            .await
    }

    /// Returns the first existing datasource with the same name and plugin, or
    /// stores `datasource` under a unique name in `workspace_id`.
    ///
    /// Matching ignores configuration, so authentication tokens are set aside
    /// while searching and restored only when a new record is created.
    pub async fn create_unique_datasource_if_not_present(
        &self,
        existing_datasources: &[Datasource],
        mut datasource: Datasource,
        workspace_id: &str,
    ) -> Result<Datasource, AppError> {
        let saved_auth_response = datasource.authentication_mut().and_then(|auth| {
            auth.authentication_type = None;
            auth.authentication_response.take()
        });

        if let Some(existing) = existing_datasources
            .iter()
            .find(|ds| ds.name == datasource.name && ds.plugin_id == datasource.plugin_id)
        {
            debug!(
                "Reusing datasource {:?} for imported datasource {}",
                existing.id, datasource.name
            );
            return Ok(existing.clone());
        }

        if let Some(auth) = datasource.authentication_mut() {
            auth.authentication_response = saved_auth_response;
        }
        datasource.is_configured = Some(datasource.has_authentication());

        let edit_permission = self.permissions.edit_permission(ResourceKind::Datasource);
        if let Some(duplicate) = self
            .stores
            .datasources
            .find_by_name_and_workspace_id(&datasource.name, workspace_id, edit_permission)
            .await?
        {
            let suffix = self.unique_suffix_for_duplicate_name(workspace_id).await?;
            debug!(
                "Datasource name {} already used by {:?}, renaming with suffix {:?}",
                duplicate.name, duplicate.id, suffix
            );
            datasource.name.push_str(&suffix);
        }

        datasource.make_pristine();
        datasource.workspace_id = Some(workspace_id.to_string());

        let created = self.stores.datasources.create(datasource).await?;
        info!(
            "Created datasource {} ({:?}) in workspace {}",
            created.name, created.id, workspace_id
        );
        Ok(created)
    }

    async fn unique_suffix_for_duplicate_name(&self, workspace_id: &str) -> Result<String, AppError> {
        let sequence_number = self
            .stores
            .sequences
            .next_suffix_for(
                "datasource",
                &format!(" for workspace with _id : {}", workspace_id),
            )
            .await?;
        let sequence_number = sequence_number.trim();

        Ok(if sequence_number.is_empty() {
            " #1".to_string()
        } else {
            format!(" #{}", sequence_number)
        })
    }
}
