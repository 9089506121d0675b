//! ACC endpoint paths.
//!
//! Opaque ids that may contain URN punctuation (folder, item and version
//! ids) are percent-encoded; hub, project and container ids are used as-is.

pub(crate) fn enc(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

// ============================================================================
// Authentication
// ============================================================================

pub const TOKEN: &str = "/authentication/v2/token";
pub const AUTHORIZE: &str = "/authentication/v2/authorize";

// ============================================================================
// Hubs and projects
// ============================================================================

pub const HUBS: &str = "/project/v1/hubs";

pub fn hub(hub: &str) -> String {
    format!("{}/{}", HUBS, hub)
}

pub fn hub_projects(hub: &str) -> String {
    format!("{}/{}/projects", HUBS, hub)
}

pub fn hub_project(hub: &str, project: &str) -> String {
    format!("{}/{}/projects/{}", HUBS, hub, project)
}

pub fn project(project: &str) -> String {
    format!("/project/v1/projects/{}", project)
}

pub fn top_folders(hub: &str, project: &str) -> String {
    format!("{}/{}/projects/{}/topFolders", HUBS, hub, project)
}

// ============================================================================
// Cost management
// ============================================================================

pub fn cost_container(container: &str) -> String {
    format!("/cost/v1/containers/{}", container)
}

pub fn project_cost_containers(project: &str) -> String {
    format!("/cost/v1/projects/{}/containers", project)
}

pub fn expenses(container: &str) -> String {
    format!("{}/expenses", cost_container(container))
}

pub fn expense_items(container: &str, expense: &str) -> String {
    format!("{}/{}/items", expenses(container), expense)
}

pub fn budgets(container: &str) -> String {
    format!("{}/budgets", cost_container(container))
}

pub fn main_contracts(container: &str) -> String {
    format!("{}/main-contracts", cost_container(container))
}

pub fn time_sheets(container: &str) -> String {
    format!("{}/time-sheets", cost_container(container))
}

pub fn attachments(container: &str) -> String {
    format!("{}/attachments", cost_container(container))
}

// ============================================================================
// Issues
// ============================================================================

pub fn issues(project: &str) -> String {
    format!("/construction/issues/v1/projects/{}/issues", project)
}

pub fn issue_types(project: &str) -> String {
    format!("/construction/issues/v1/projects/{}/issue-types", project)
}

// ============================================================================
// Data management
// ============================================================================

pub fn folders(project: &str) -> String {
    format!("/data/v1/projects/{}/folders", project)
}

pub fn folder_contents(project: &str, folder: &str) -> String {
    format!("{}/{}/contents", folders(project), enc(folder))
}

pub fn item_versions(project: &str, item: &str) -> String {
    format!("/data/v1/projects/{}/items/{}/versions", project, enc(item))
}

pub fn version_downloads(project: &str, version: &str) -> String {
    format!("/data/v1/projects/{}/versions/{}/downloads", project, enc(version))
}

pub fn exports(project: &str) -> String {
    format!("/construction/files/v1/projects/{}/exports", project)
}

// ============================================================================
// Account admin
// ============================================================================

pub fn project_image(account: &str, project: &str) -> String {
    format!("/hq/v1/accounts/{}/projects/{}/image", account, project)
}
