use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

use super::resource::impl_resource_traits;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub mode: Option<String>,
    pub ssl: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: Value,
}

/// Token state handed back by an OAuth-style provider after authorisation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub token_response: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AuthenticationMethod {
    #[serde(rename_all = "camelCase")]
    DbAuth {
        username: Option<String>,
        password: Option<String>,
        database_name: Option<String>,
    },
    BasicAuth {
        username: Option<String>,
        password: Option<String>,
    },
    #[serde(rename = "oAuth2", rename_all = "camelCase")]
    OAuth2 {
        client_id: Option<String>,
        client_secret: Option<String>,
        access_token_url: Option<String>,
        scope: Option<String>,
    },
    ApiKey {
        label: Option<String>,
        value: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    BearerToken { bearer_token: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationDto {
    pub authentication_type: Option<String>,
    pub method: AuthenticationMethod,
    pub authentication_response: Option<AuthenticationResponse>,
}

impl AuthenticationDto {
    pub fn is_oauth2(&self) -> bool {
        matches!(self.method, AuthenticationMethod::OAuth2 { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceConfiguration {
    pub url: Option<String>,
    pub connection: Option<Connection>,
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    pub authentication: Option<AuthenticationDto>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datasource {
    pub id: Option<String>,
    pub name: String,
    pub plugin_id: String,
    /// Only populated for analytics; never stored.
    pub plugin_name: Option<String>,
    pub workspace_id: Option<String>,
    pub template_name: Option<String>,
    pub datasource_configuration: Option<DatasourceConfiguration>,
    #[serde(default)]
    pub invalids: BTreeSet<String>,
    /// Hints generated from the other fields, shown to the user.
    #[serde(default)]
    pub messages: BTreeSet<String>,
    #[serde(default)]
    pub is_auto_generated: bool,
    /// False for datasources that arrived through an import and still need
    /// credentials before they can be used.
    pub is_configured: Option<bool>,
    pub is_recently_created: Option<bool>,
    pub is_template: Option<bool>,
    pub is_mock: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl_resource_traits!(Datasource);

impl Datasource {
    pub const DEFAULT_NAME_PREFIX: &'static str = "Untitled Datasource";

    pub fn new(name: impl Into<String>, plugin_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            plugin_id: plugin_id.into(),
            ..Default::default()
        }
    }

    pub fn authentication(&self) -> Option<&AuthenticationDto> {
        self.datasource_configuration
            .as_ref()
            .and_then(|config| config.authentication.as_ref())
    }

    pub fn authentication_mut(&mut self) -> Option<&mut AuthenticationDto> {
        self.datasource_configuration
            .as_mut()
            .and_then(|config| config.authentication.as_mut())
    }

    pub fn has_authentication(&self) -> bool {
        self.authentication().is_some()
    }

    /// Equality over the fields that change how actions against the datasource
    /// behave. Identity and audit fields are ignored.
    pub fn soft_equals(&self, other: &Datasource) -> bool {
        self.name == other.name
            && self.plugin_id == other.plugin_id
            && self.is_auto_generated == other.is_auto_generated
            && self.datasource_configuration == other.datasource_configuration
    }

    /// Clears identity and audit fields so the record can be stored as new.
    pub fn make_pristine(&mut self) {
        self.id = None;
        self.created_at = None;
        self.updated_at = None;
        self.deleted_at = None;
    }

    /// Copy of this datasource for another workspace. Without configuration only
    /// the connection block is carried over. OAuth2 tokens belong to the user who
    /// authorised them, so OAuth2 datasources always need re-authorising.
    pub fn fork(&self, fork_with_configuration: bool, to_workspace_id: &str) -> Datasource {
        let mut forked = self.clone();
        forked.make_pristine();
        forked.workspace_id = Some(to_workspace_id.to_string());

        let initially_oauth2 = self
            .authentication()
            .map(AuthenticationDto::is_oauth2)
            .unwrap_or(false);

        if !fork_with_configuration {
            let connection = forked
                .datasource_configuration
                .as_ref()
                .and_then(|config| config.connection.clone());
            forked.datasource_configuration = Some(DatasourceConfiguration {
                connection,
                ..Default::default()
            });
        }

        let is_configured = forked.has_authentication();
        if initially_oauth2 {
            forked.is_configured = Some(false);
            if let Some(auth) = forked.authentication_mut() {
                auth.authentication_response = None;
            }
        } else {
            forked.is_configured = Some(is_configured);
        }

        forked
    }

    /// Strips workspace-specific state before the datasource is written into an
    /// export. `plugin_map` maps plugin ids to their portable names; an
    /// unmapped plugin id is cleared rather than exported.
    pub fn sanitise_to_export_resource(&mut self, plugin_map: &HashMap<String, String>) {
        self.id = None;
        self.created_at = None;
        self.updated_at = None;
        self.is_configured = None;
        self.invalids.clear();
        self.workspace_id = None;
        self.plugin_id = plugin_map.get(&self.plugin_id).cloned().unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Application;

    fn postgres_with_password(password: &str) -> Datasource {
        Datasource {
            id: Some("ds-1".to_string()),
            workspace_id: Some("ws-1".to_string()),
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
            datasource_configuration: Some(DatasourceConfiguration {
                url: Some("db.internal".to_string()),
                connection: Some(Connection {
                    mode: Some("READ_WRITE".to_string()),
                    ssl: Some("DEFAULT".to_string()),
                }),
                endpoints: vec![Endpoint {
                    host: Some("db.internal".to_string()),
                    port: Some(5432),
                }],
                authentication: Some(AuthenticationDto {
                    authentication_type: Some("dbAuth".to_string()),
                    method: AuthenticationMethod::DbAuth {
                        username: Some("app".to_string()),
                        password: Some(password.to_string()),
                        database_name: Some("prod".to_string()),
                    },
                    authentication_response: None,
                }),
                properties: vec![],
            }),
            ..Datasource::new("PG-Prod", "postgres-plugin")
        }
    }

    fn google_sheets() -> Datasource {
        Datasource {
            datasource_configuration: Some(DatasourceConfiguration {
                authentication: Some(AuthenticationDto {
                    authentication_type: Some("oAuth2".to_string()),
                    method: AuthenticationMethod::OAuth2 {
                        client_id: Some("client".to_string()),
                        client_secret: Some("secret".to_string()),
                        access_token_url: None,
                        scope: Some("sheets".to_string()),
                    },
                    authentication_response: Some(AuthenticationResponse {
                        token: Some("personal-token".to_string()),
                        ..Default::default()
                    }),
                }),
                ..Default::default()
            }),
            ..Datasource::new("Sheets", "google-sheets-plugin")
        }
    }

    #[test]
    fn test_soft_equals_ignores_identity() {
        let a = postgres_with_password("secret");
        let mut b = postgres_with_password("secret");
        b.id = Some("ds-2".to_string());
        b.workspace_id = Some("ws-2".to_string());
        assert!(a.soft_equals(&b));
    }

    #[test]
    fn test_soft_equals_detects_configuration_change() {
        let a = postgres_with_password("secret");
        let b = postgres_with_password("other");
        assert!(!a.soft_equals(&b));
    }

    #[test]
    fn test_fork_without_configuration_keeps_only_connection() {
        let source = postgres_with_password("secret");
        let forked = source.fork(false, "ws-target");

        assert_eq!(forked.id, None);
        assert_eq!(forked.created_at, None);
        assert_eq!(forked.workspace_id.as_deref(), Some("ws-target"));
        let config = forked.datasource_configuration.as_ref().unwrap();
        assert!(config.authentication.is_none());
        assert!(config.url.is_none());
        assert_eq!(
            config.connection.as_ref().and_then(|c| c.mode.as_deref()),
            Some("READ_WRITE")
        );
        assert_eq!(forked.is_configured, Some(false));
    }

    #[test]
    fn test_fork_with_configuration_is_configured() {
        let forked = postgres_with_password("secret").fork(true, "ws-target");
        assert!(forked.has_authentication());
        assert_eq!(forked.is_configured, Some(true));
    }

    #[test]
    fn test_fork_oauth2_drops_token() {
        let forked = google_sheets().fork(true, "ws-target");
        assert_eq!(forked.is_configured, Some(false));
        let auth = forked.authentication().unwrap();
        assert!(auth.authentication_response.is_none());
    }

    #[test]
    fn test_sanitise_to_export_resource() {
        let mut datasource = postgres_with_password("secret");
        datasource.is_configured = Some(true);
        datasource.invalids.insert("Missing host".to_string());

        let plugin_map = HashMap::from([(
            "postgres-plugin".to_string(),
            "postgres-plugin-package".to_string(),
        )]);
        datasource.sanitise_to_export_resource(&plugin_map);

        assert_eq!(datasource.id, None);
        assert_eq!(datasource.workspace_id, None);
        assert_eq!(datasource.updated_at, None);
        assert_eq!(datasource.is_configured, None);
        assert!(datasource.invalids.is_empty());
        assert_eq!(datasource.plugin_id, "postgres-plugin-package");
    }

    #[test]
    fn test_sanitise_clears_unmapped_plugin_and_keeps_deletion() {
        let deleted_at = Utc::now();
        let mut datasource = Datasource {
            deleted_at: Some(deleted_at),
            ..postgres_with_password("secret")
        };

        datasource.sanitise_to_export_resource(&HashMap::new());

        assert_eq!(datasource.plugin_id, "");
        assert_eq!(datasource.deleted_at, Some(deleted_at));
        assert_eq!(datasource.created_at, None);
    }

    #[test]
    fn test_fork_follows_application_setting() {
        let source = postgres_with_password("secret");
        let with_config = Application {
            fork_with_configuration: Some(true),
            ..Application::new("Template")
        };
        let without_config = Application::new("Plain");

        let forked = source.fork(with_config.forks_with_configuration(), "ws-target");
        assert!(forked.has_authentication());

        let forked = source.fork(without_config.forks_with_configuration(), "ws-target");
        assert!(!forked.has_authentication());
        assert_eq!(forked.is_configured, Some(false));
    }

    #[test]
    fn test_authentication_method_round_trips_through_json() {
        let datasource = google_sheets();
        let json = serde_json::to_value(&datasource).unwrap();
        assert_eq!(
            json["datasourceConfiguration"]["authentication"]["method"]["kind"],
            "oAuth2"
        );
        let parsed: Datasource = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, datasource);
    }
}
