//! Runtime Configuration
//!
//! API base URL and storage settings, resolved once at startup.

use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Name of the `<meta>` tag that overrides the compiled-in API URL
pub const API_URL_META: &str = "taskboard-api-url";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the REST API, without trailing slash
    pub api_base_url: String,
    /// localStorage key holding the bearer token
    pub token_storage_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            token_storage_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }
}

impl Config {
    /// Resolve from the compile-time environment and the host page
    pub fn load() -> Self {
        Self::resolve(option_env!("TASKBOARD_API_URL"), read_meta(API_URL_META))
    }

    /// Page override wins over the build-time value, which wins over the default
    pub fn resolve(build_url: Option<&str>, page_url: Option<String>) -> Self {
        let api_base_url = match (page_url.filter(|u| !u.trim().is_empty()), build_url.filter(|u| !u.trim().is_empty())) {
            (Some(url), _) => {
                debug!(target: "config", url = %url, "API URL from page meta tag");
                url
            }
            (None, Some(url)) => url.to_string(),
            (None, None) => {
                info!(target: "config", "TASKBOARD_API_URL not set, using default: {DEFAULT_API_URL}");
                DEFAULT_API_URL.to_string()
            }
        };

        Self {
            api_base_url: normalize_base_url(&api_base_url),
            ..Self::default()
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn read_meta(name: &str) -> Option<String> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()?.document()?;
    let element = document.query_selector(&format!("meta[name=\"{name}\"]")).ok()??;
    let meta = element.dyn_into::<web_sys::HtmlMetaElement>().ok()?;
    Some(meta.content())
}
