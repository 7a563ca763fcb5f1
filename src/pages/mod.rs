//! Top-level Views
//!
//! One component per route.

mod auth_page;
mod project_detail_page;
mod projects_page;

pub use auth_page::AuthPage;
pub use project_detail_page::ProjectDetailPage;
pub use projects_page::ProjectsPage;
