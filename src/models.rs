//! Frontend Models
//!
//! Data structures matching backend entities.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Project data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: String,
}

impl Project {
    /// Single-letter avatar shown next to the name
    pub fn initial(&self) -> String {
        self.name.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
    }
}

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "status-todo",
            TaskStatus::InProgress => "status-in-progress",
            TaskStatus::Done => "status-done",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        TaskStatus::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// Task data structure (matches backend)
///
/// Fields the backend adds beyond the known schema are kept in `extra` and
/// round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub project_id: u32,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub assignee_user_id: Option<u32>,
    /// Opaque concurrency token; only the server advances it
    pub version: i64,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Copy of this task with `changes` applied; unspecified fields are kept
    pub fn with_changes(&self, changes: &TaskChanges) -> Task {
        let mut next = self.clone();
        if let Some(title) = &changes.title {
            next.title = title.clone();
        }
        if let Some(status) = changes.status {
            next.status = status;
        }
        if let Some(due_date) = &changes.due_date {
            next.due_date = due_date.clone();
        }
        if let Some(assignee) = changes.assignee_user_id {
            next.assignee_user_id = assignee;
        }
        for (key, value) in &changes.extra {
            next.extra.insert(key.clone(), value.clone());
        }
        next
    }
}

/// Partial task update
///
/// Outer `None` leaves a field unchanged; `Some(None)` clears it (sent as `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_user_id: Option<Option<u32>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskChanges {
    pub fn status(status: TaskStatus) -> Self {
        Self { status: Some(status), ..Default::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
            && self.assignee_user_id.is_none()
            && self.extra.is_empty()
    }
}

/// Body of `PATCH /tasks/{id}`
#[derive(Debug, Serialize)]
pub struct TaskUpdateRequest<'a> {
    #[serde(flatten)]
    pub changes: &'a TaskChanges,
    pub version: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateProjectArgs {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTaskArgs {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_user_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginArgs {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupArgs {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// `POST /auth/login` response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// `POST /auth/signup` response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Role claim carried in the bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Member => "Member",
        }
    }
}

/// Per-status task counts for the board header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl TaskStats {
    pub fn of(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            match task.status {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Done => stats.done += 1,
            }
            stats
        })
    }

    pub fn count(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }
}

/// "1 task" / "3 tasks"
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Human-readable date for an API timestamp, falling back to the raw text
pub fn display_date(raw: &str) -> String {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %-d, %Y").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%b %-d, %Y").to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%b %-d, %Y").to_string();
    }
    raw.to_string()
}

#[cfg(test)]
pub(crate) fn make_task(id: u32, status: TaskStatus, version: i64) -> Task {
    Task {
        id,
        project_id: 1,
        title: format!("Task {}", id),
        status,
        due_date: None,
        assignee_user_id: None,
        version,
        created_at: "2025-01-01T00:00:00".to_string(),
        updated_at: None,
        extra: Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_keeps_unknown_fields() {
        let raw = json!({
            "id": 42,
            "project_id": 7,
            "title": "Write docs",
            "status": "in_progress",
            "assignee_user_id": 2,
            "due_date": null,
            "version": 3,
            "created_at": "2025-03-01T10:00:00",
            "updated_at": null,
            "priority": "high"
        });
        let task: Task = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.extra.get("priority"), Some(&json!("high")));

        let back = serde_json::to_value(&task).unwrap();
        assert_eq!(back["priority"], json!("high"));
        assert_eq!(back["status"], json!("in_progress"));
    }

    #[test]
    fn test_with_changes_touches_only_named_fields() {
        let task = Task { assignee_user_id: Some(5), due_date: Some("2025-02-01".into()), ..make_task(1, TaskStatus::Todo, 3) };

        let changed = task.with_changes(&TaskChanges::status(TaskStatus::Done));
        assert_eq!(changed.status, TaskStatus::Done);
        assert_eq!(changed.title, task.title);
        assert_eq!(changed.assignee_user_id, Some(5));
        assert_eq!(changed.version, 3);

        let cleared = task.with_changes(&TaskChanges { due_date: Some(None), ..Default::default() });
        assert_eq!(cleared.due_date, None);
        assert_eq!(cleared.status, TaskStatus::Todo);
    }

    #[test]
    fn test_update_request_body() {
        let changes = TaskChanges {
            status: Some(TaskStatus::Done),
            assignee_user_id: Some(None),
            ..Default::default()
        };
        let body = serde_json::to_value(TaskUpdateRequest { changes: &changes, version: 3 }).unwrap();
        assert_eq!(body, json!({ "status": "done", "assignee_user_id": null, "version": 3 }));
    }

    #[test]
    fn test_stats_and_labels() {
        let tasks = vec![
            make_task(1, TaskStatus::Todo, 1),
            make_task(2, TaskStatus::Done, 1),
            make_task(3, TaskStatus::Done, 1),
        ];
        let stats = TaskStats::of(&tasks);
        assert_eq!((stats.todo, stats.in_progress, stats.done), (1, 0, 2));
        assert_eq!(pluralize(1, "task"), "1 task");
        assert_eq!(pluralize(3, "project"), "3 projects");
        assert_eq!(TaskStatus::parse("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("blocked"), None);
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2025-03-01T10:00:00"), "Mar 1, 2025");
        assert_eq!(display_date("2025-03-01T10:00:00.123456"), "Mar 1, 2025");
        assert_eq!(display_date("2025-12-24T08:00:00Z"), "Dec 24, 2025");
        assert_eq!(display_date("2025-07-04"), "Jul 4, 2025");
        assert_eq!(display_date("someday"), "someday");
    }
}
