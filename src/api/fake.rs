//! In-memory backend for flow tests.
//!
//! Mirrors the server rules the views rely on: name search, version checks
//! on update, version bump on every successful mutation.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;

use super::TaskboardApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateProjectArgs, CreateTaskArgs, Project, Task, TaskChanges};

#[derive(Default)]
pub struct FakeApi {
    pub projects: RefCell<Vec<Project>>,
    pub tasks: RefCell<Vec<Task>>,
    /// One entry per call, e.g. `"GET /projects?q=alpha"`
    pub requests: RefCell<Vec<String>>,
    /// Statuses to fail the next calls with, in order
    pub failures: RefCell<VecDeque<u16>>,
}

impl FakeApi {
    pub fn with_projects(names: &[&str]) -> Self {
        let api = Self::default();
        for name in names {
            api.insert_project(name);
        }
        api
    }

    pub fn insert_project(&self, name: &str) -> Project {
        let mut projects = self.projects.borrow_mut();
        let project = Project {
            id: projects.len() as u32 + 1,
            name: name.to_string(),
            description: None,
            created_at: "2025-01-01T00:00:00".to_string(),
        };
        projects.push(project.clone());
        project
    }

    pub fn insert_task(&self, task: Task) {
        self.tasks.borrow_mut().push(task);
    }

    pub fn fail_next(&self, status: u16) {
        self.failures.borrow_mut().push_back(status);
    }

    /// Simulate another client editing the task on the server
    pub fn bump_version(&self, task_id: u32) {
        if let Some(task) = self.tasks.borrow_mut().iter_mut().find(|t| t.id == task_id) {
            task.version += 1;
        }
    }

    pub fn request_log(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn record(&self, line: String) -> ApiResult<()> {
        self.requests.borrow_mut().push(line);
        match self.failures.borrow_mut().pop_front() {
            Some(status) => Err(ApiError::from_status(status, "injected failure".to_string())),
            None => Ok(()),
        }
    }

    fn not_found() -> ApiError {
        ApiError::from_status(404, "not found".to_string())
    }
}

#[async_trait(?Send)]
impl TaskboardApi for FakeApi {
    async fn list_projects(&self, query: Option<&str>) -> ApiResult<Vec<Project>> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        match query {
            Some(q) => self.record(format!("GET /projects?q={q}"))?,
            None => self.record("GET /projects".to_string())?,
        }
        let needle = query.map(str::to_lowercase);
        Ok(self
            .projects
            .borrow()
            .iter()
            .filter(|p| needle.as_ref().map_or(true, |n| p.name.to_lowercase().contains(n)))
            .cloned()
            .collect())
    }

    async fn create_project(&self, args: &CreateProjectArgs) -> ApiResult<Project> {
        self.record(format!("POST /projects {}", args.name))?;
        let mut project = self.insert_project(&args.name);
        project.description = args.description.clone();
        if let Some(stored) = self.projects.borrow_mut().iter_mut().find(|p| p.id == project.id) {
            stored.description = project.description.clone();
        }
        Ok(project)
    }

    async fn get_project(&self, project_id: u32) -> ApiResult<Project> {
        self.record(format!("GET /projects/{project_id}"))?;
        self.projects.borrow().iter().find(|p| p.id == project_id).cloned().ok_or_else(Self::not_found)
    }

    async fn list_tasks(&self, project_id: u32) -> ApiResult<Vec<Task>> {
        self.record(format!("GET /projects/{project_id}/tasks"))?;
        Ok(self.tasks.borrow().iter().filter(|t| t.project_id == project_id).cloned().collect())
    }

    async fn create_task(&self, project_id: u32, args: &CreateTaskArgs) -> ApiResult<Task> {
        self.record(format!("POST /projects/{project_id}/tasks {}", args.title))?;
        let mut tasks = self.tasks.borrow_mut();
        let task = Task {
            id: tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1,
            project_id,
            title: args.title.clone(),
            status: args.status.unwrap_or_default(),
            due_date: args.due_date.clone(),
            assignee_user_id: args.assignee_user_id,
            version: 1,
            created_at: "2025-01-02T00:00:00".to_string(),
            updated_at: None,
            extra: Default::default(),
        };
        tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, task_id: u32, changes: &TaskChanges, version: i64) -> ApiResult<Task> {
        self.record(format!("PATCH /tasks/{task_id} If-Match: {version}"))?;
        let mut tasks = self.tasks.borrow_mut();
        let task = tasks.iter_mut().find(|t| t.id == task_id).ok_or_else(Self::not_found)?;
        if task.version != version {
            return Err(ApiError::from_status(409, "Stale version - conflict detected".to_string()));
        }
        *task = task.with_changes(changes);
        task.version += 1;
        task.updated_at = Some("2025-01-03T00:00:00".to_string());
        Ok(task.clone())
    }
}
