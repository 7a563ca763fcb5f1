//! Task Endpoints

use reqwest::header::IF_MATCH;
use reqwest::{Method, RequestBuilder};

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{CreateTaskArgs, Task, TaskChanges, TaskUpdateRequest};

impl ApiClient {
    pub async fn list_tasks(&self, project_id: u32) -> ApiResult<Vec<Task>> {
        let request = self.request(Method::GET, &format!("/projects/{project_id}/tasks"));
        self.execute(request, "list tasks").await
    }

    pub async fn create_task(&self, project_id: u32, args: &CreateTaskArgs) -> ApiResult<Task> {
        let request = self.request(Method::POST, &format!("/projects/{project_id}/tasks")).json(args);
        self.execute(request, "create task").await
    }

    /// `PATCH /tasks/{id}` carrying `version` in the body and in `If-Match`
    pub(super) fn update_task_request(&self, task_id: u32, changes: &TaskChanges, version: i64) -> RequestBuilder {
        self.request(Method::PATCH, &format!("/tasks/{task_id}"))
            .header(IF_MATCH, version.to_string())
            .json(&TaskUpdateRequest { changes, version })
    }

    pub async fn update_task(&self, task_id: u32, changes: &TaskChanges, version: i64) -> ApiResult<Task> {
        self.execute(self.update_task_request(task_id, changes, version), "update task").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;

    #[test]
    fn test_update_is_conditional_on_version() {
        let client = ApiClient::new("http://api.test").with_token(Some("tkn".into()));
        let request = client
            .update_task_request(42, &TaskChanges::status(TaskStatus::Done), 3)
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::PATCH);
        assert_eq!(request.url().as_str(), "http://api.test/tasks/42");
        assert_eq!(request.headers()[IF_MATCH], "3");
        assert_eq!(request.headers()["authorization"], "Bearer tkn");

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "done", "version": 3 }));
    }
}
