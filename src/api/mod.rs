//! REST API Client
//!
//! Frontend bindings to the backend HTTP API, organized by domain.

mod auth;
mod client;
mod projects;
mod tasks;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{CreateProjectArgs, CreateTaskArgs, Project, Task, TaskChanges};

pub use client::ApiClient;

/// Project and task operations the views depend on
///
/// Futures are not `Send`: everything runs on the browser event loop.
#[async_trait(?Send)]
pub trait TaskboardApi {
    /// `GET /projects`, filtered by name substring when `query` is given
    async fn list_projects(&self, query: Option<&str>) -> ApiResult<Vec<Project>>;

    async fn create_project(&self, args: &CreateProjectArgs) -> ApiResult<Project>;

    async fn get_project(&self, project_id: u32) -> ApiResult<Project>;

    async fn list_tasks(&self, project_id: u32) -> ApiResult<Vec<Task>>;

    async fn create_task(&self, project_id: u32, args: &CreateTaskArgs) -> ApiResult<Task>;

    /// Conditional partial update bound to `version`
    async fn update_task(&self, task_id: u32, changes: &TaskChanges, version: i64) -> ApiResult<Task>;
}

#[async_trait(?Send)]
impl TaskboardApi for ApiClient {
    async fn list_projects(&self, query: Option<&str>) -> ApiResult<Vec<Project>> {
        ApiClient::list_projects(self, query).await
    }

    async fn create_project(&self, args: &CreateProjectArgs) -> ApiResult<Project> {
        ApiClient::create_project(self, args).await
    }

    async fn get_project(&self, project_id: u32) -> ApiResult<Project> {
        ApiClient::get_project(self, project_id).await
    }

    async fn list_tasks(&self, project_id: u32) -> ApiResult<Vec<Task>> {
        ApiClient::list_tasks(self, project_id).await
    }

    async fn create_task(&self, project_id: u32, args: &CreateTaskArgs) -> ApiResult<Task> {
        ApiClient::create_task(self, project_id, args).await
    }

    async fn update_task(&self, task_id: u32, changes: &TaskChanges, version: i64) -> ApiResult<Task> {
        ApiClient::update_task(self, task_id, changes, version).await
    }
}
