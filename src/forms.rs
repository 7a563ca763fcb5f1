//! Form Drafts
//!
//! Raw input held by the modal and auth forms, and the checks that turn it
//! into request payloads. Everything here runs before any network call.

use crate::error::ValidationError;
use crate::models::{CreateProjectArgs, CreateTaskArgs, LoginArgs, SignupArgs, Task, TaskChanges, TaskStatus};

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Parse the assignee text field; blank means unassigned
fn parse_assignee(value: &str) -> Result<Option<u32>, ValidationError> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| ValidationError::InvalidAssignee),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
}

impl ProjectDraft {
    pub fn validate(&self) -> Result<CreateProjectArgs, ValidationError> {
        let name = non_empty(&self.name).ok_or(ValidationError::ProjectNameRequired)?;
        Ok(CreateProjectArgs { name, description: non_empty(&self.description) })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub status: TaskStatus,
    /// `YYYY-MM-DD` from a date input, or empty
    pub due_date: String,
    pub assignee: String,
}

impl TaskDraft {
    /// Only admins may assign; the field is dropped for everyone else
    pub fn validate(&self, is_admin: bool) -> Result<CreateTaskArgs, ValidationError> {
        let title = non_empty(&self.title).ok_or(ValidationError::TaskTitleRequired)?;
        let assignee_user_id = if is_admin { parse_assignee(&self.assignee)? } else { None };
        Ok(CreateTaskArgs {
            title,
            status: Some(self.status),
            due_date: non_empty(&self.due_date),
            assignee_user_id,
        })
    }
}

/// Edit form prefilled from an existing task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskEditDraft {
    pub title: String,
    pub status: TaskStatus,
    pub due_date: String,
    pub assignee: String,
}

impl TaskEditDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            status: task.status,
            // Date inputs want the bare date
            due_date: task.due_date.as_deref().map(|d| d.chars().take(10).collect()).unwrap_or_default(),
            assignee: task.assignee_user_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    /// Changed fields only; an unchanged form is an error
    pub fn changes(&self, original: &Task, is_admin: bool) -> Result<TaskChanges, ValidationError> {
        let baseline = Self::from_task(original);
        let mut changes = TaskChanges::default();

        let title = non_empty(&self.title).ok_or(ValidationError::TaskTitleRequired)?;
        if title != original.title {
            changes.title = Some(title);
        }
        if self.status != original.status {
            changes.status = Some(self.status);
        }
        if self.due_date.trim() != baseline.due_date {
            changes.due_date = Some(non_empty(&self.due_date));
        }
        if is_admin {
            let assignee = parse_assignee(&self.assignee)?;
            if assignee != original.assignee_user_id {
                changes.assignee_user_id = Some(assignee);
            }
        }

        if changes.is_empty() {
            return Err(ValidationError::NoChanges);
        }
        Ok(changes)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginDraft {
    pub email: String,
    pub password: String,
}

impl LoginDraft {
    pub fn validate(&self) -> Result<LoginArgs, ValidationError> {
        let email = non_empty(&self.email).ok_or(ValidationError::EmailRequired)?;
        if self.password.trim().is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        Ok(LoginArgs { email, password: self.password.clone() })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupDraft {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupDraft {
    pub fn validate(&self) -> Result<SignupArgs, ValidationError> {
        let name = non_empty(&self.name).ok_or(ValidationError::NameRequired)?;
        let email = non_empty(&self.email).ok_or(ValidationError::EmailRequired)?;
        if self.password.trim().is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        Ok(SignupArgs { name, email, password: self.password.clone() })
    }
}

/// Lifecycle of a modal form submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Failed(String),
}

impl SubmitState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmitState::Submitting)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            SubmitState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Draft and submission lifecycle of a create modal
///
/// ```text
/// Idle/Failed --submit(valid)--> Submitting --finish(Ok)--> Idle, draft reset (modal closes)
///             --submit(invalid)--> Failed            --finish(Err)--> Failed, draft kept
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModalForm<D> {
    pub draft: D,
    pub state: SubmitState,
}

impl<D: Default> ModalForm<D> {
    /// Validate the draft and enter `Submitting`. `None` means nothing may be sent.
    pub fn submit<T>(&mut self, validate: impl FnOnce(&D) -> Result<T, ValidationError>) -> Option<T> {
        if self.state.is_submitting() {
            return None;
        }
        match validate(&self.draft) {
            Ok(payload) => {
                self.state = SubmitState::Submitting;
                Some(payload)
            }
            Err(e) => {
                self.state = SubmitState::Failed(e.to_string());
                None
            }
        }
    }

    /// Settle the request. Returns `true` when the modal should close.
    pub fn finish<T, E>(&mut self, result: &Result<T, E>, failure: &str) -> bool {
        match result {
            Ok(_) => {
                self.reset();
                true
            }
            Err(_) => {
                self.state = SubmitState::Failed(failure.to_string());
                false
            }
        }
    }

    /// Cancel/close: clear values and error
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
