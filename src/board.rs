//! Task Board State
//!
//! The task collection of one project plus a per-task pending-edit state
//! machine for optimistic updates:
//!
//! ```text
//! clean --begin--> pending(confirmed snapshot) --success--> clean (server record shown)
//!                                              --failure--> clean (snapshot restored)
//! ```
//!
//! Overlapping edits of one task share a snapshot. The newest in-flight
//! guess stays visible until it settles; once nothing newer is pending the
//! task shows the last server-confirmed record.

use std::collections::{BTreeSet, HashMap};
use std::future::Future;

use tracing::{debug, error, info};

use crate::api::TaskboardApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{CreateTaskArgs, Project, Task, TaskChanges, TaskStats, TaskStatus};

pub const LOAD_FAILED: &str = "Failed to load project details";
pub const CREATE_TASK_FAILED: &str = "Failed to create task";

/// Which entry point started a mutation; selects the user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Status,
    Edit,
}

impl MutationKind {
    pub fn failure_message(&self, err: &ApiError) -> &'static str {
        match (self, err.is_conflict()) {
            (MutationKind::Status, true) => {
                "Conflict - task status was updated by someone else. Reload and try again."
            }
            (MutationKind::Edit, true) => "Conflict - task was updated by someone else. Reload and try again.",
            (MutationKind::Status, false) => "Failed to update status",
            (MutationKind::Edit, false) => "Update failed",
        }
    }
}

/// Handle for one in-flight optimistic mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub task_id: u32,
    /// Version the request is conditioned on
    pub version: i64,
    seq: u64,
}

/// What a settled mutation did to the displayed task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Server record displayed
    Confirmed,
    /// Last-known-good record restored
    RolledBack,
    /// A newer optimistic guess for the task is still pending and stays shown
    Superseded,
    /// The board was reloaded since the ticket was issued; nothing changed
    Discarded,
}

#[derive(Debug, Clone, PartialEq)]
struct PendingEdit {
    confirmed: Task,
    in_flight: BTreeSet<u64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    pending: HashMap<u32, PendingEdit>,
    next_seq: u64,
    error: Option<String>,
}

impl TaskBoard {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks, ..Default::default() }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.status == status).cloned().collect()
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::of(&self.tasks)
    }

    pub fn is_pending(&self, task_id: u32) -> bool {
        self.pending.contains_key(&task_id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Replace everything with a fresh server listing; pending edits are dropped
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.pending.clear();
        self.error = None;
    }

    /// Append a task the server just created
    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
        self.error = None;
    }

    /// Apply `changes` optimistically. `None` when the task is not on the board.
    pub fn begin(&mut self, task_id: u32, changes: &TaskChanges, version: i64) -> Option<Ticket> {
        let index = self.tasks.iter().position(|t| t.id == task_id)?;
        let current = self.tasks[index].clone();

        self.next_seq += 1;
        let seq = self.next_seq;
        let entry = self
            .pending
            .entry(task_id)
            .or_insert_with(|| PendingEdit { confirmed: current.clone(), in_flight: BTreeSet::new() });
        entry.in_flight.insert(seq);

        self.tasks[index] = current.with_changes(changes);
        debug!(target: "board", task_id, version, seq, "optimistic update applied");
        Some(Ticket { task_id, version, seq })
    }

    /// Settle a mutation with the server's answer
    pub fn resolve(&mut self, ticket: Ticket, outcome: ApiResult<Task>, kind: MutationKind) -> Resolution {
        let Some(entry) = self.pending.get_mut(&ticket.task_id) else {
            return Resolution::Discarded;
        };
        if !entry.in_flight.remove(&ticket.seq) {
            return Resolution::Discarded;
        }

        let succeeded = match outcome {
            Ok(server) => {
                if server.version >= entry.confirmed.version {
                    entry.confirmed = server;
                }
                true
            }
            Err(err) => {
                error!(target: "board", task_id = ticket.task_id, version = ticket.version, "task update failed: {err}");
                self.error = Some(kind.failure_message(&err).to_string());
                false
            }
        };

        let newer_pending = entry.in_flight.range(ticket.seq + 1..).next().is_some();
        let confirmed = entry.confirmed.clone();
        if entry.in_flight.is_empty() {
            self.pending.remove(&ticket.task_id);
        }

        if succeeded {
            self.error = None;
        }
        if newer_pending {
            return Resolution::Superseded;
        }

        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == ticket.task_id) {
            *slot = confirmed;
        }
        if succeeded {
            info!(target: "board", task_id = ticket.task_id, "task update confirmed");
            Resolution::Confirmed
        } else {
            Resolution::RolledBack
        }
    }
}

/// Mutable access to a board living somewhere (a signal in the UI, a cell in tests)
pub trait BoardHandle {
    fn with_board<R>(&self, f: impl FnOnce(&mut TaskBoard) -> R) -> Option<R>;
}

impl BoardHandle for std::cell::RefCell<TaskBoard> {
    fn with_board<R>(&self, f: impl FnOnce(&mut TaskBoard) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

impl BoardHandle for leptos::prelude::RwSignal<TaskBoard> {
    fn with_board<R>(&self, f: impl FnOnce(&mut TaskBoard) -> R) -> Option<R> {
        use leptos::prelude::Update;
        self.try_update(f)
    }
}

/// Optimistic conditional update of one task
///
/// Applies `changes` at once, sends them bound to `version`, then shows the
/// server record or restores the pre-update record. `None` when the task is
/// not on the board.
pub async fn update_task<A, H>(
    api: &A,
    board: &H,
    task_id: u32,
    changes: TaskChanges,
    version: i64,
    kind: MutationKind,
) -> Option<Resolution>
where
    A: TaskboardApi + ?Sized,
    H: BoardHandle,
{
    let ticket = board.with_board(|b| b.begin(task_id, &changes, version)).flatten()?;
    let outcome = api.update_task(task_id, &changes, version).await;
    board.with_board(|b| b.resolve(ticket, outcome, kind))
}

/// Save an edit form, conditioned on the version the form was opened on
pub async fn submit_edit<A, H>(api: &A, board: &H, edited: &Task, changes: TaskChanges) -> Option<Resolution>
where
    A: TaskboardApi + ?Sized,
    H: BoardHandle,
{
    update_task(api, board, edited.id, changes, edited.version, MutationKind::Edit).await
}

/// Create a task and append the server's record to the board
pub async fn create_task<A, H>(api: &A, board: &H, project_id: u32, args: &CreateTaskArgs) -> ApiResult<Task>
where
    A: TaskboardApi + ?Sized,
    H: BoardHandle,
{
    match api.create_task(project_id, args).await {
        Ok(task) => {
            info!(target: "board", task_id = task.id, project_id, "task created");
            board.with_board(|b| b.push(task.clone()));
            Ok(task)
        }
        Err(e) => {
            error!(target: "board", project_id, "Create Task Error: {e}");
            Err(e)
        }
    }
}

/// Fetch a project and its tasks concurrently; either failing fails the load
pub async fn load_project<A>(api: &A, project_id: u32) -> ApiResult<(Project, Vec<Task>)>
where
    A: TaskboardApi + ?Sized,
{
    let result = join_both(api.get_project(project_id), api.list_tasks(project_id)).await;
    match &result {
        Ok((project, tasks)) => {
            info!(target: "board", project_id = project.id, tasks = tasks.len(), "project loaded")
        }
        Err(e) => error!(target: "board", project_id, "fetch error: {e}"),
    }
    result
}

async fn join_both<P, T>(project: P, tasks: T) -> ApiResult<(Project, Vec<Task>)>
where
    P: Future<Output = ApiResult<Project>>,
    T: Future<Output = ApiResult<Vec<Task>>>,
{
    futures::try_join!(project, tasks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::models::make_task;
    use std::cell::RefCell;

    fn conflict() -> ApiError {
        ApiError::from_status(409, "stale".into())
    }

    fn server(task: &Task, status: TaskStatus) -> Task {
        Task { status, version: task.version + 1, ..task.clone() }
    }

    fn sample_board() -> TaskBoard {
        TaskBoard::new(vec![
            make_task(41, TaskStatus::InProgress, 1),
            make_task(42, TaskStatus::Todo, 3),
            make_task(43, TaskStatus::Done, 7),
        ])
    }

    #[test]
    fn test_optimistic_apply_is_immediate_and_local() {
        let mut board = sample_board();
        let before = board.clone();

        let ticket = board.begin(42, &TaskChanges::status(TaskStatus::Done), 3).unwrap();

        assert_eq!(ticket.version, 3);
        assert_eq!(board.task(42).unwrap().status, TaskStatus::Done);
        assert_eq!(board.task(42).unwrap().version, 3);
        assert_eq!(board.task(41), before.task(41));
        assert_eq!(board.task(43), before.task(43));
        assert!(board.is_pending(42));
    }

    #[test]
    fn test_success_shows_server_record() {
        let mut board = sample_board();
        let before = board.clone();
        let ticket = board.begin(42, &TaskChanges::status(TaskStatus::Done), 3).unwrap();

        let mut record = server(before.task(42).unwrap(), TaskStatus::Done);
        record.updated_at = Some("2025-05-05T00:00:00".into());
        let resolution = board.resolve(ticket, Ok(record.clone()), MutationKind::Status);

        assert_eq!(resolution, Resolution::Confirmed);
        assert_eq!(board.task(42), Some(&record));
        assert_eq!(board.task(41), before.task(41));
        assert_eq!(board.task(43), before.task(43));
        assert!(!board.is_pending(42));
        assert_eq!(board.error(), None);
    }

    #[test]
    fn test_conflict_restores_exact_snapshot() {
        let mut board = sample_board();
        let before = board.clone();
        let ticket = board.begin(42, &TaskChanges::status(TaskStatus::Done), 3).unwrap();

        let resolution = board.resolve(ticket, Err(conflict()), MutationKind::Status);

        assert_eq!(resolution, Resolution::RolledBack);
        assert_eq!(board.tasks(), before.tasks());
        assert!(board.error().unwrap().starts_with("Conflict"));
    }

    #[test]
    fn test_other_failure_restores_with_generic_message() {
        let mut board = sample_board();
        let before = board.clone();
        let changes = TaskChanges { title: Some("Renamed".into()), ..Default::default() };
        let ticket = board.begin(41, &changes, 1).unwrap();
        assert_eq!(board.task(41).unwrap().title, "Renamed");

        board.resolve(ticket, Err(ApiError::from_status(500, String::new())), MutationKind::Edit);

        assert_eq!(board.tasks(), before.tasks());
        assert_eq!(board.error(), Some("Update failed"));
    }

    #[test]
    fn test_different_tasks_settle_independently() {
        let mut board = sample_board();
        let before = board.clone();
        let a = board.begin(41, &TaskChanges::status(TaskStatus::Done), 1).unwrap();
        let b = board.begin(43, &TaskChanges::status(TaskStatus::Todo), 7).unwrap();

        let record = server(before.task(43).unwrap(), TaskStatus::Todo);
        board.resolve(b, Ok(record.clone()), MutationKind::Status);
        board.resolve(a, Err(conflict()), MutationKind::Status);

        assert_eq!(board.task(41), before.task(41));
        assert_eq!(board.task(43), Some(&record));
    }

    #[test]
    fn test_newer_guess_stays_visible_until_it_settles() {
        let mut board = sample_board();
        let original = board.task(42).unwrap().clone();
        let first = board.begin(42, &TaskChanges::status(TaskStatus::InProgress), 3).unwrap();
        let second = board.begin(42, &TaskChanges::status(TaskStatus::Done), 3).unwrap();

        let accepted = server(&original, TaskStatus::InProgress);
        assert_eq!(board.resolve(first, Ok(accepted.clone()), MutationKind::Status), Resolution::Superseded);
        assert_eq!(board.task(42).unwrap().status, TaskStatus::Done);

        // Same base version, so the server rejects the second edit
        assert_eq!(board.resolve(second, Err(conflict()), MutationKind::Status), Resolution::RolledBack);
        assert_eq!(board.task(42), Some(&accepted));
        assert!(!board.is_pending(42));
    }

    #[test]
    fn test_late_older_success_does_not_regress_version() {
        let mut board = sample_board();
        let original = board.task(42).unwrap().clone();
        let first = board.begin(42, &TaskChanges::status(TaskStatus::InProgress), 3).unwrap();
        let second = board.begin(42, &TaskChanges::status(TaskStatus::Done), 4).unwrap();

        let newest = Task { status: TaskStatus::Done, version: 5, ..original.clone() };
        assert_eq!(board.resolve(second, Ok(newest.clone()), MutationKind::Status), Resolution::Confirmed);

        let older = server(&original, TaskStatus::InProgress);
        assert_eq!(board.resolve(first, Ok(older), MutationKind::Status), Resolution::Confirmed);
        assert_eq!(board.task(42), Some(&newest));
    }

    #[test]
    fn test_reload_discards_in_flight_tickets() {
        let mut board = sample_board();
        let ticket = board.begin(42, &TaskChanges::status(TaskStatus::Done), 3).unwrap();
        let fresh = vec![make_task(42, TaskStatus::InProgress, 9)];
        board.replace_all(fresh.clone());

        assert_eq!(board.resolve(ticket, Err(conflict()), MutationKind::Status), Resolution::Discarded);
        assert_eq!(board.tasks(), fresh.as_slice());
        assert_eq!(board.error(), None);
    }

    #[test]
    fn test_unknown_task_is_not_started() {
        let mut board = sample_board();
        assert!(board.begin(99, &TaskChanges::status(TaskStatus::Done), 1).is_none());
    }

    #[tokio::test]
    async fn test_status_change_round_trip() {
        let api = FakeApi::with_projects(&["Apollo"]);
        api.insert_task(make_task(42, TaskStatus::Todo, 3));
        let board = RefCell::new(TaskBoard::new(api.tasks.borrow().clone()));

        let resolution = update_task(&api, &board, 42, TaskChanges::status(TaskStatus::Done), 3, MutationKind::Status).await;

        assert_eq!(resolution, Some(Resolution::Confirmed));
        let task = board.borrow().task(42).cloned().unwrap();
        assert_eq!((task.status, task.version), (TaskStatus::Done, 4));
        assert_eq!(api.request_log(), vec!["PATCH /tasks/42 If-Match: 3"]);
    }

    #[tokio::test]
    async fn test_status_change_conflict_reverts() {
        let api = FakeApi::with_projects(&["Apollo"]);
        api.insert_task(make_task(42, TaskStatus::Todo, 3));
        let board = RefCell::new(TaskBoard::new(api.tasks.borrow().clone()));
        api.bump_version(42);

        let resolution = update_task(&api, &board, 42, TaskChanges::status(TaskStatus::Done), 3, MutationKind::Status).await;

        assert_eq!(resolution, Some(Resolution::RolledBack));
        let board = board.borrow();
        let task = board.task(42).unwrap();
        assert_eq!((task.status, task.version), (TaskStatus::Todo, 3));
        assert_eq!(
            board.error(),
            Some("Conflict - task status was updated by someone else. Reload and try again.")
        );
    }

    #[tokio::test]
    async fn test_load_project_requires_both_halves() {
        let api = FakeApi::with_projects(&["Apollo"]);
        api.insert_task(make_task(1, TaskStatus::Todo, 1));

        let (project, tasks) = load_project(&api, 1).await.unwrap();
        assert_eq!(project.name, "Apollo");
        assert_eq!(tasks.len(), 1);

        assert!(load_project(&api, 2).await.is_err());

        api.fail_next(500);
        assert!(load_project(&api, 1).await.is_err());
    }

    #[tokio::test]
    async fn test_edit_is_bound_to_the_version_it_was_opened_on() {
        let api = FakeApi::with_projects(&["Apollo"]);
        api.insert_task(make_task(42, TaskStatus::Todo, 3));
        let opened = api.tasks.borrow()[0].clone();

        // Someone else saves; a reload brings their version onto the board
        api.bump_version(42);
        let board = RefCell::new(TaskBoard::new(api.tasks.borrow().clone()));
        assert_eq!(board.borrow().task(42).unwrap().version, 4);

        let changes = TaskChanges { title: Some("Mine".into()), ..Default::default() };
        let resolution = submit_edit(&api, &board, &opened, changes).await;

        assert_eq!(resolution, Some(Resolution::RolledBack));
        assert_eq!(api.request_log(), vec!["PATCH /tasks/42 If-Match: 3"]);
        let board = board.borrow();
        assert_eq!(board.task(42).unwrap().title, "Task 42");
        assert_eq!(board.task(42).unwrap().version, 4);
        assert_eq!(board.error(), Some("Conflict - task was updated by someone else. Reload and try again."));
        assert_eq!(api.tasks.borrow()[0].title, "Task 42");
    }

    #[tokio::test]
    async fn test_created_task_is_appended_from_server_record() {
        let api = FakeApi::with_projects(&["Apollo"]);
        api.insert_task(make_task(1, TaskStatus::Todo, 1));
        let board = RefCell::new(TaskBoard::new(api.tasks.borrow().clone()));
        let args = CreateTaskArgs {
            title: "Write docs".into(),
            status: Some(TaskStatus::InProgress),
            due_date: None,
            assignee_user_id: Some(5),
        };

        let created = create_task(&api, &board, 1, &args).await.unwrap();

        assert_eq!(api.request_log(), vec!["POST /projects/1/tasks Write docs"]);
        let board = board.borrow();
        assert_eq!(board.tasks().len(), 2);
        assert_eq!(board.tasks().last(), Some(&created));
        assert_eq!((created.id, created.version, created.status), (2, 1, TaskStatus::InProgress));
    }

    #[tokio::test]
    async fn test_failed_task_create_leaves_board_alone() {
        let api = FakeApi::with_projects(&["Apollo"]);
        api.insert_task(make_task(1, TaskStatus::Todo, 1));
        let board = RefCell::new(TaskBoard::new(api.tasks.borrow().clone()));
        let before = board.borrow().clone();
        let args = CreateTaskArgs { title: "Nope".into(), status: None, due_date: None, assignee_user_id: None };

        api.fail_next(500);
        assert!(create_task(&api, &board, 1, &args).await.is_err());

        assert_eq!(*board.borrow(), before);
        assert_eq!(api.tasks.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_title_never_reaches_the_api() {
        use crate::forms::{ModalForm, TaskDraft};

        let api = FakeApi::with_projects(&["Apollo"]);
        let board = RefCell::new(TaskBoard::default());
        let mut form = ModalForm { draft: TaskDraft { title: "   ".into(), ..Default::default() }, ..Default::default() };

        if let Some(args) = form.submit(|d| d.validate(true)) {
            let _ = create_task(&api, &board, 1, &args).await;
        }

        assert!(api.request_log().is_empty());
        assert_eq!(form.state.error(), Some("Task title is required"));
        assert!(board.borrow().tasks().is_empty());
    }
}
