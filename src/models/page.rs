use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::{impl_resource_traits, DraftPublished, ResourceMode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default)]
    pub is_hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPage {
    pub id: Option<String>,
    pub application_id: String,
    pub page: DraftPublished<PageDto>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl NewPage {
    pub fn select(&self, mode: ResourceMode) -> Option<&PageDto> {
        self.page.select(mode)
    }
}

impl_resource_traits!(NewPage);
