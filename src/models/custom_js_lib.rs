use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::impl_resource_traits;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomJsLib {
    pub id: Option<String>,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub accessor: Vec<String>,
    pub version: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CustomJsLib {
    /// Stable key for a library across workspaces and exports.
    pub fn uid_string(&self) -> String {
        format!("{}_{}", self.name, self.url)
    }
}

impl_resource_traits!(CustomJsLib);
