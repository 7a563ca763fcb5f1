//! Project List State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use reactive_stores::Store;
use tracing::{error, info};

use crate::api::TaskboardApi;
use crate::error::ApiResult;
use crate::models::{CreateProjectArgs, Project};

pub const FETCH_PROJECTS_FAILED: &str = "Failed to fetch projects";
pub const CREATE_PROJECT_FAILED: &str = "Failed to create project";

/// Dashboard state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct ProjectListState {
    /// Projects matching the current search
    pub projects: Vec<Project>,
    /// Search text as typed
    pub search_query: String,
    /// View-level error banner
    pub error: Option<String>,
    /// First fetch finished (search edits only refetch after this)
    pub loaded: bool,
    /// Create request in flight (disables the create button)
    pub creating: bool,
}

/// `GET /projects`, filtered when the query has non-blank text
pub async fn fetch_projects<A>(api: &A, query: &str) -> ApiResult<Vec<Project>>
where
    A: TaskboardApi + ?Sized,
{
    let filter = Some(query.trim()).filter(|q| !q.is_empty());
    match api.list_projects(filter).await {
        Ok(projects) => {
            info!(target: "projects", count = projects.len(), query = filter.unwrap_or(""), "fetched projects");
            Ok(projects)
        }
        Err(e) => {
            error!(target: "projects", "Fetch Projects Error: {e}");
            Err(e)
        }
    }
}

/// Create, then refetch the list with the active query
///
/// Every call issues its own create request; the caller shows success only
/// once this resolves.
pub async fn create_project<A>(api: &A, args: &CreateProjectArgs, query: &str) -> ApiResult<Vec<Project>>
where
    A: TaskboardApi + ?Sized,
{
    let created = api.create_project(args).await.map_err(|e| {
        error!(target: "projects", "Create Project Error: {e}");
        e
    })?;
    info!(target: "projects", id = created.id, "created project");
    fetch_projects(api, query).await
}
