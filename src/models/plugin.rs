use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    pub id: Option<String>,
    /// Display name. Missing on some older plugin records.
    pub plugin_name: Option<String>,
    pub package_name: String,
}
