//! Pure helpers for building minimal version-control diffs and lookup maps.
//! Nothing in here performs I/O.

use std::collections::{HashMap, HashSet};

use crate::models::schema::{CLIENT_SCHEMA_VERSION, SERVER_SCHEMA_VERSION};
use crate::models::{
    ActionCollection, Application, BaseDomain, CustomJsLib, Datasource, DeletableResource,
    NewAction, NewPage, Plugin, ResourceMode,
};

pub use crate::core::permissions::is_git_sync;

/// Joins an entity name with its page id in diff keys.
pub const NAME_SEPARATOR: &str = "##ENTITY_SEPARATOR##";

/// True when the resource has to be written again on the next commit.
///
/// A schema migration touches every resource, so any version mismatch counts.
/// Resources without an update timestamp, and applications that were never
/// committed, are always considered changed.
pub fn is_resource_updated_after_last_commit<R: BaseDomain + ?Sized>(
    application: &Application,
    resource: &R,
) -> bool {
    let client_schema_migrated = application.client_schema_version != Some(CLIENT_SCHEMA_VERSION);
    let server_schema_migrated = application.server_schema_version != Some(SERVER_SCHEMA_VERSION);
    if client_schema_migrated || server_schema_migrated {
        return true;
    }

    match (application.last_committed_at(), resource.updated_at()) {
        (_, None) => true,
        (None, Some(_)) => true,
        (Some(last_committed_at), Some(updated_at)) => last_committed_at < updated_at,
    }
}

pub fn get_updated_custom_js_libs_for_application(
    application: &Application,
    custom_js_libs: &[CustomJsLib],
) -> HashSet<String> {
    custom_js_libs
        .iter()
        .filter(|lib| is_resource_updated_after_last_commit(application, *lib))
        .map(CustomJsLib::uid_string)
        .collect()
}

/// Names of changed pages. Pages without a name in `mode` are skipped.
pub fn get_updated_pages_for_application(
    application: &Application,
    pages: &[NewPage],
    mode: ResourceMode,
) -> HashSet<String> {
    pages
        .iter()
        .filter(|page| is_resource_updated_after_last_commit(application, *page))
        .filter_map(|page| page.select(mode).and_then(|dto| dto.name.clone()))
        .collect()
}

/// Keys `name + NAME_SEPARATOR + page_id` of changed actions, so that
/// same-named actions on different pages stay distinct.
pub fn get_updated_actions_for_application(
    application: &Application,
    actions: &[NewAction],
    mode: ResourceMode,
) -> HashSet<String> {
    actions
        .iter()
        .filter(|action| is_resource_updated_after_last_commit(application, *action))
        .filter_map(|action| {
            let dto = action.select(mode)?;
            let name = dto.name.as_deref()?;
            Some(format!(
                "{}{}{}",
                name,
                NAME_SEPARATOR,
                dto.page_id.as_deref().unwrap_or_default()
            ))
        })
        .collect()
}

/// Keys `page_id + NAME_SEPARATOR + name` of changed collections.
pub fn get_updated_action_collections_for_application(
    application: &Application,
    action_collections: &[ActionCollection],
    mode: ResourceMode,
) -> HashSet<String> {
    action_collections
        .iter()
        .filter(|collection| is_resource_updated_after_last_commit(application, *collection))
        .filter_map(|collection| {
            let dto = collection.select(mode)?;
            let name = dto.name.as_deref()?;
            Some(format!(
                "{}{}{}",
                dto.page_id.as_deref().unwrap_or_default(),
                NAME_SEPARATOR,
                name
            ))
        })
        .collect()
}

pub fn calculate_page_id_to_name_map(pages: &[NewPage], mode: ResourceMode) -> HashMap<String, String> {
    pages
        .iter()
        .filter_map(|page| {
            let name = page.select(mode)?.name.clone()?;
            Some((page.id.clone()?, name))
        })
        .collect()
}

pub fn calculate_page_name_to_page_id_map(
    pages: &[NewPage],
    mode: ResourceMode,
) -> HashMap<String, String> {
    pages
        .iter()
        .filter_map(|page| {
            let name = page.select(mode)?.name.clone()?;
            Some((name, page.id.clone()?))
        })
        .collect()
}

pub fn calculate_action_collection_id_to_name_map(
    action_collections: &[ActionCollection],
    mode: ResourceMode,
) -> HashMap<String, String> {
    action_collections
        .iter()
        .filter_map(|collection| {
            let name = collection.select(mode)?.name.clone()?;
            Some((collection.id.clone()?, name))
        })
        .collect()
}

pub fn calculate_datasource_id_to_name_map(datasources: &[Datasource]) -> HashMap<String, String> {
    datasources
        .iter()
        .filter_map(|ds| Some((ds.id.clone()?, ds.name.clone())))
        .collect()
}

pub fn calculate_plugin_id_to_name_map(plugins: &[Plugin]) -> HashMap<String, String> {
    plugins
        .iter()
        .filter_map(|plugin| Some((plugin.id.clone()?, get_plugin_name(plugin).to_string())))
        .collect()
}

pub fn calculate_plugin_name_to_plugin_id_map(plugins: &[Plugin]) -> HashMap<String, String> {
    plugins
        .iter()
        .filter_map(|plugin| Some((get_plugin_name(plugin).to_string(), plugin.id.clone()?)))
        .collect()
}

/// Display name when set, otherwise the package name. Older plugin records
/// were stored without a display name.
pub fn get_plugin_name(plugin: &Plugin) -> &str {
    plugin
        .plugin_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(plugin.package_name.as_str())
}

pub fn is_resource_deleted<R: DeletableResource + ?Sized>(resource: Option<&R>) -> bool {
    resource.map_or(true, |r| r.deleted_at().is_some())
}
