use std::sync::Arc;

use app_transfer::core::import_export::utils::{
    get_updated_pages_for_application, is_resource_updated_after_last_commit,
};
use app_transfer::core::stores::{InMemorySequenceAllocator, InMemoryStore};
use app_transfer::models::schema::{CLIENT_SCHEMA_VERSION, SERVER_SCHEMA_VERSION};
use app_transfer::models::{
    Application, Datasource, DraftPublished, GitApplicationMetadata, NewPage, PageDto,
    ResourceMode, SerialiseApplicationObjective, Workspace,
};
use app_transfer::{AclPermission, DefaultPermissions, ImportExportHelper, Stores};
use chrono::{Duration, Utc};

async fn helper_with_store() -> (Arc<InMemoryStore>, ImportExportHelper) {
    let store = Arc::new(InMemoryStore::new());
    store
        .add_workspace(Workspace {
            id: "ws-1".to_string(),
            name: "Acme".to_string(),
        })
        .await;
    let stores = Stores::in_memory(store.clone(), Arc::new(InMemorySequenceAllocator::new()));
    (store, ImportExportHelper::new(stores, Arc::new(DefaultPermissions)))
}

fn committed_application(client_schema_version: i32) -> Application {
    Application {
        id: Some("app-1".to_string()),
        workspace_id: Some("ws-1".to_string()),
        client_schema_version: Some(client_schema_version),
        server_schema_version: Some(SERVER_SCHEMA_VERSION),
        git_application_metadata: Some(GitApplicationMetadata {
            branch_name: Some("main".to_string()),
            last_committed_at: Some(Utc::now()),
            ..Default::default()
        }),
        ..Application::new("Orders")
    }
}

fn page(id: &str, name: &str, updated_at: chrono::DateTime<Utc>) -> NewPage {
    NewPage {
        id: Some(id.to_string()),
        application_id: "app-1".to_string(),
        page: DraftPublished::both(PageDto {
            name: Some(name.to_string()),
            ..Default::default()
        }),
        updated_at: Some(updated_at),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_pg_prod_import_reuses_then_renames() {
    let (store, helper) = helper_with_store().await;
    let pg_prod = Datasource {
        id: Some("ds-pg".to_string()),
        workspace_id: Some("ws-1".to_string()),
        ..Datasource::new("PG-Prod", "postgres")
    };
    store.add_datasource(pg_prod.clone()).await;

    let existing = helper
        .fetch_datasources_for_workspace("ws-1", SerialiseApplicationObjective::Share, true)
        .await
        .unwrap();
    assert_eq!(existing.len(), 1);

    let reused = helper
        .create_unique_datasource_if_not_present(
            &existing,
            Datasource::new("PG-Prod", "postgres"),
            "ws-1",
        )
        .await
        .unwrap();
    assert_eq!(reused.id.as_deref(), Some("ds-pg"));

    let renamed = helper
        .create_unique_datasource_if_not_present(
            &existing,
            Datasource::new("PG-Prod", "mysql"),
            "ws-1",
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "PG-Prod #1");
    assert_eq!(renamed.plugin_id, "mysql");

    let names: Vec<String> = store
        .datasources()
        .await
        .into_iter()
        .map(|ds| ds.name)
        .collect();
    assert_eq!(names, vec!["PG-Prod".to_string(), "PG-Prod #1".to_string()]);
}

#[tokio::test]
async fn test_second_collision_gets_next_suffix() {
    let (store, helper) = helper_with_store().await;
    store
        .add_datasource(Datasource {
            id: Some("ds-pg".to_string()),
            workspace_id: Some("ws-1".to_string()),
            ..Datasource::new("PG-Prod", "postgres")
        })
        .await;

    let mut suffixes = Vec::new();
    for plugin in ["mysql", "mssql"] {
        let existing = store.datasources().await;
        let created = helper
            .create_unique_datasource_if_not_present(
                &existing,
                Datasource::new("PG-Prod", plugin),
                "ws-1",
            )
            .await
            .unwrap();
        suffixes.push(created.name);
    }
    assert_eq!(suffixes, vec!["PG-Prod #1", "PG-Prod #2"]);
}

#[test]
fn test_older_client_schema_marks_everything_updated() {
    let stale = committed_application(CLIENT_SCHEMA_VERSION + 2);
    let before_commit = Utc::now() - Duration::days(1);
    let pages = vec![page("page-1", "Home", before_commit)];

    assert!(is_resource_updated_after_last_commit(&stale, &pages[0]));
    let updated = get_updated_pages_for_application(&stale, &pages, ResourceMode::Edit);
    assert!(updated.contains("Home"));

    let current = committed_application(CLIENT_SCHEMA_VERSION);
    let updated = get_updated_pages_for_application(&current, &pages, ResourceMode::Edit);
    assert!(updated.is_empty());
}

#[tokio::test]
async fn test_export_of_unknown_application_fails() {
    let (_store, helper) = helper_with_store().await;
    let err = helper
        .fetch_application("missing", SerialiseApplicationObjective::Share, false)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Unable to find applicationId missing");
}

#[tokio::test]
async fn test_full_export_bundle() {
    let (store, helper) = helper_with_store().await;
    let application = committed_application(CLIENT_SCHEMA_VERSION);
    store.add_application(application.clone()).await;
    store
        .add_page(page("page-1", "Home", Utc::now()))
        .await;
    store
        .add_page_with_permissions(
            page("page-2", "Admin", Utc::now()),
            &[AclPermission::ReadPages],
        )
        .await;
    store
        .add_datasource(Datasource {
            id: Some("ds-1".to_string()),
            workspace_id: Some("ws-1".to_string()),
            ..Datasource::new("Users API", "restapi")
        })
        .await;

    let resolved = helper
        .fetch_application("app-1", SerialiseApplicationObjective::Share, false)
        .await
        .unwrap();
    let resources = helper
        .fetch_application_resources(&resolved, SerialiseApplicationObjective::Share, false)
        .await
        .unwrap();

    assert_eq!(resources.pages.len(), 1);
    assert_eq!(resources.datasources.len(), 1);
    assert!(resources.actions.is_empty());
    assert!(resources.edit_mode_theme.is_system_theme);

    let git = helper
        .fetch_application_resources(
            &resolved,
            SerialiseApplicationObjective::VersionControl,
            false,
        )
        .await
        .unwrap();
    assert_eq!(git.pages.len(), 2);
}
