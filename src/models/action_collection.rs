use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::{impl_resource_traits, DraftPublished, ResourceMode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCollectionDto {
    pub name: Option<String>,
    pub page_id: Option<String>,
    pub plugin_id: Option<String>,
    pub body: Option<String>,
}

/// A JS object: a named group of actions living on one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionCollection {
    pub id: Option<String>,
    pub application_id: String,
    pub collection: DraftPublished<ActionCollectionDto>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl ActionCollection {
    pub fn select(&self, mode: ResourceMode) -> Option<&ActionCollectionDto> {
        self.collection.select(mode)
    }
}

impl_resource_traits!(ActionCollection);
