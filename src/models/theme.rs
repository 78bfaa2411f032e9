use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: Option<String>,
    pub name: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_system_theme: bool,
    #[serde(default)]
    pub properties: Value,
}
