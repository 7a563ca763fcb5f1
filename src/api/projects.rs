//! Project Endpoints

use reqwest::{Method, RequestBuilder};

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{CreateProjectArgs, Project};

impl ApiClient {
    pub(super) fn list_projects_request(&self, query: Option<&str>) -> RequestBuilder {
        let request = self.request(Method::GET, "/projects");
        match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => request.query(&[("q", q)]),
            None => request,
        }
    }

    pub async fn list_projects(&self, query: Option<&str>) -> ApiResult<Vec<Project>> {
        self.execute(self.list_projects_request(query), "list projects").await
    }

    pub async fn create_project(&self, args: &CreateProjectArgs) -> ApiResult<Project> {
        let request = self.request(Method::POST, "/projects").json(args);
        self.execute(request, "create project").await
    }

    pub async fn get_project(&self, project_id: u32) -> ApiResult<Project> {
        let request = self.request(Method::GET, &format!("/projects/{project_id}"));
        self.execute(request, "get project").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_is_encoded() {
        let client = ApiClient::new("http://api.test/").with_token(Some("abc".into()));
        let request = client.list_projects_request(Some(" alpha beta ")).build().unwrap();
        assert_eq!(request.url().as_str(), "http://api.test/projects?q=alpha+beta");
        assert_eq!(request.headers()["authorization"], "Bearer abc");
    }

    #[test]
    fn test_blank_query_is_unfiltered() {
        let client = ApiClient::new("http://api.test");
        let request = client.list_projects_request(Some("   ")).build().unwrap();
        assert_eq!(request.url().as_str(), "http://api.test/projects");
        assert!(request.headers().get("authorization").is_none());
    }
}
