//! UI Components
//!
//! Reusable Leptos components.

mod board_column;
mod error_banner;
mod log_panel;
mod modal;
mod project_create_modal;
mod role_badge;
mod status_select;
mod task_card;
mod task_create_modal;
mod task_edit_modal;

pub use board_column::BoardColumn;
pub use error_banner::ErrorBanner;
pub use log_panel::LogPanel;
pub use modal::Modal;
pub use project_create_modal::ProjectCreateModal;
pub use role_badge::RoleBadge;
pub use status_select::StatusSelect;
pub use task_card::TaskCard;
pub use task_create_modal::TaskCreateModal;
pub use task_edit_modal::TaskEditModal;

use futures::future::LocalBoxFuture;

use crate::error::ApiResult;

/// Submit handler of a create modal; resolves once the server answered
pub type SubmitFuture = LocalBoxFuture<'static, ApiResult<()>>;
