//! HTTP plumbing shared by the domain bindings.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

/// Authenticated HTTP client
///
/// The bearer token is carried by the client value itself; views get the
/// client from context so requests never read storage behind their back.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Same endpoint, different credentials
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            token,
        }
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request with the bearer token attached when one is present
    pub(super) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send, map non-success statuses to `ApiError`, decode the JSON body
    pub(super) async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> ApiResult<T> {
        let response = request.send().await.map_err(|e| {
            warn!(target: "api", "{what}: network error: {e}");
            ApiError::Network(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::Network)?;

        if !status.is_success() {
            let err = ApiError::from_status(status.as_u16(), body);
            warn!(target: "api", "{what}: {err}");
            return Err(err);
        }

        debug!(target: "api", "{what}: {} ({} bytes)", status.as_u16(), body.len());
        serde_json::from_str(&body).map_err(|e| {
            warn!(target: "api", "{what}: undecodable body: {e}");
            ApiError::Decode(e.to_string())
        })
    }
}
