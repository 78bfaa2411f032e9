use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::impl_resource_traits;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitApplicationMetadata {
    pub branch_name: Option<String>,
    pub default_application_id: Option<String>,
    pub remote_url: Option<String>,
    pub last_committed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Option<String>,
    pub name: String,
    pub workspace_id: Option<String>,
    pub git_application_metadata: Option<GitApplicationMetadata>,
    pub client_schema_version: Option<i32>,
    pub server_schema_version: Option<i32>,
    /// Template applications are exported with their datasource configuration
    /// and may be read without the usual permission checks.
    pub export_with_configuration: Option<bool>,
    pub fork_with_configuration: Option<bool>,
    pub edit_mode_theme_id: Option<String>,
    pub published_mode_theme_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn exports_with_configuration(&self) -> bool {
        self.export_with_configuration.unwrap_or(false)
    }

    pub fn forks_with_configuration(&self) -> bool {
        self.fork_with_configuration.unwrap_or(false)
    }

    pub fn last_committed_at(&self) -> Option<DateTime<Utc>> {
        self.git_application_metadata
            .as_ref()
            .and_then(|metadata| metadata.last_committed_at)
    }
}

impl_resource_traits!(Application);
