use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::{impl_resource_traits, DraftPublished, ResourceMode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDto {
    pub name: Option<String>,
    pub page_id: Option<String>,
    pub collection_id: Option<String>,
    /// Name of the datasource the action runs against.
    pub datasource_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAction {
    pub id: Option<String>,
    pub application_id: String,
    pub plugin_id: Option<String>,
    pub action: DraftPublished<ActionDto>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl NewAction {
    pub fn select(&self, mode: ResourceMode) -> Option<&ActionDto> {
        self.action.select(mode)
    }
}

impl_resource_traits!(NewAction);
