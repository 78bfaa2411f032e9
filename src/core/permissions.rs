//! Access permissions and the rule that picks one for an export or import pass.

use serde::{Deserialize, Serialize};

use crate::models::{Application, SerialiseApplicationObjective};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AclPermission {
    ManageApplications,
    ReadApplications,
    ExportApplications,
    ManagePages,
    ReadPages,
    ManageActions,
    ReadActions,
    ExecuteActions,
    ManageDatasources,
    ReadDatasources,
    ExecuteDatasources,
    ReadThemes,
    ManageThemes,
    ReadWorkspaces,
    ManageWorkspaces,
    WorkspaceCreateApplication,
}

impl AclPermission {
    pub const ALL: [AclPermission; 16] = [
        AclPermission::ManageApplications,
        AclPermission::ReadApplications,
        AclPermission::ExportApplications,
        AclPermission::ManagePages,
        AclPermission::ReadPages,
        AclPermission::ManageActions,
        AclPermission::ReadActions,
        AclPermission::ExecuteActions,
        AclPermission::ManageDatasources,
        AclPermission::ReadDatasources,
        AclPermission::ExecuteDatasources,
        AclPermission::ReadThemes,
        AclPermission::ManageThemes,
        AclPermission::ReadWorkspaces,
        AclPermission::ManageWorkspaces,
        AclPermission::WorkspaceCreateApplication,
    ];
}

/// Resource families with their own permission triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Application,
    Page,
    /// Actions and action collections share one permission family.
    Action,
    Datasource,
    Theme,
    Workspace,
}

pub trait PermissionProvider: Send + Sync {
    fn edit_permission(&self, kind: ResourceKind) -> AclPermission;
    fn read_permission(&self, kind: ResourceKind) -> AclPermission;
    fn export_permission(&self, kind: ResourceKind) -> AclPermission;

    /// Needed to create an application inside a workspace.
    fn application_create_permission(&self) -> AclPermission {
        AclPermission::WorkspaceCreateApplication
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPermissions;

impl PermissionProvider for DefaultPermissions {
    fn edit_permission(&self, kind: ResourceKind) -> AclPermission {
        match kind {
            ResourceKind::Application => AclPermission::ManageApplications,
            ResourceKind::Page => AclPermission::ManagePages,
            ResourceKind::Action => AclPermission::ManageActions,
            ResourceKind::Datasource => AclPermission::ManageDatasources,
            ResourceKind::Theme => AclPermission::ManageThemes,
            ResourceKind::Workspace => AclPermission::ManageWorkspaces,
        }
    }

    fn read_permission(&self, kind: ResourceKind) -> AclPermission {
        match kind {
            ResourceKind::Application => AclPermission::ReadApplications,
            ResourceKind::Page => AclPermission::ReadPages,
            ResourceKind::Action => AclPermission::ReadActions,
            ResourceKind::Datasource => AclPermission::ReadDatasources,
            ResourceKind::Theme => AclPermission::ReadThemes,
            ResourceKind::Workspace => AclPermission::ReadWorkspaces,
        }
    }

    fn export_permission(&self, kind: ResourceKind) -> AclPermission {
        match kind {
            ResourceKind::Application => AclPermission::ExportApplications,
            ResourceKind::Action => AclPermission::ExecuteActions,
            ResourceKind::Datasource => AclPermission::ExecuteDatasources,
            other => self.read_permission(other),
        }
    }
}

pub fn is_git_sync(objective: SerialiseApplicationObjective) -> bool {
    objective == SerialiseApplicationObjective::VersionControl
}

/// Permission to filter resources of `kind` with, or `None` for no filter.
///
/// Imports always need write access. Git operations were authorised by the
/// caller and read unfiltered. Template applications (exported with
/// configuration) are readable by anyone; everything else needs edit access.
pub fn resource_access_permission_for_objective(
    application: Option<&Application>,
    objective: SerialiseApplicationObjective,
    permissions: &dyn PermissionProvider,
    kind: ResourceKind,
    is_import: bool,
) -> Option<AclPermission> {
    if is_import {
        return Some(permissions.edit_permission(kind));
    }
    if is_git_sync(objective) {
        return None;
    }
    if application.is_some_and(Application::exports_with_configuration) {
        return Some(permissions.read_permission(kind));
    }
    Some(permissions.edit_permission(kind))
}
