//! Project Detail Page
//!
//! Loads the project and its tasks together, renders the status board and
//! routes every status change and edit through the optimistic update flow.

use futures::FutureExt;
use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::debug;

use crate::board::{self, MutationKind, TaskBoard, LOAD_FAILED};
use crate::components::{BoardColumn, ErrorBanner, LogPanel, RoleBadge, SubmitFuture, TaskCreateModal, TaskEditModal};
use crate::context::{use_app_context, BoardDnd, Route};
use crate::models::{pluralize, CreateTaskArgs, Project, Task, TaskChanges, TaskStatus};

#[component]
pub fn ProjectDetailPage(project_id: u32) -> impl IntoView {
    let ctx = use_app_context();
    let project = RwSignal::new(None::<Project>);
    let board = RwSignal::new(TaskBoard::default());
    let load_error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(true);
    let reload = RwSignal::new(0u32);
    let latest_load = StoredValue::new(0u64);
    let show_create = RwSignal::new(false);
    let editing = RwSignal::new(None::<Task>);

    Effect::new(move |_| {
        reload.track();
        let generation = latest_load.get_value() + 1;
        latest_load.set_value(generation);
        loading.set(true);
        let api = ctx.api();
        spawn_local(async move {
            let result = board::load_project(&api, project_id).await;
            if latest_load.try_get_value() != Some(generation) {
                return;
            }
            match result {
                Ok((loaded, tasks)) => {
                    project.set(Some(loaded));
                    board.update(|b| b.replace_all(tasks));
                    load_error.set(None);
                }
                Err(_) => load_error.set(Some(LOAD_FAILED.to_string())),
            }
            loading.set(false);
        });
    });

    let mutate = move |task_id: u32, changes: TaskChanges, version: i64, kind: MutationKind| {
        let api = ctx.api();
        spawn_local(async move {
            let resolution = board::update_task(&api, &board, task_id, changes, version, kind).await;
            debug!(target: "board", task_id, ?resolution, "mutation settled");
        });
    };

    let on_status_change = Callback::new(move |(task_id, status): (u32, TaskStatus)| {
        let Some(task) = board.with_untracked(|b| b.task(task_id).cloned()) else {
            return;
        };
        if task.status == status || !ctx.session.with_untracked(|s| s.can_edit(&task)) {
            return;
        }
        mutate(task_id, TaskChanges::status(status), task.version, MutationKind::Status);
    });

    let on_edit_submit = Callback::new(move |(task, changes): (Task, TaskChanges)| {
        let api = ctx.api();
        spawn_local(async move {
            let resolution = board::submit_edit(&api, &board, &task, changes).await;
            debug!(target: "board", task_id = task.id, ?resolution, "edit settled");
        });
    });

    let on_create_task = Callback::new(move |args: CreateTaskArgs| -> SubmitFuture {
        let api = ctx.api();
        async move { board::create_task(&api, &board, project_id, &args).await.map(|_| ()) }.boxed_local()
    });

    let board_dnd = expect_context::<BoardDnd>();
    let registration = board_dnd.register(on_status_change);
    on_cleanup(move || board_dnd.unregister(registration));
    let dnd = board_dnd.signals;

    let header = move || {
        project.get().map(|p| {
            view! {
                <div class="page-title">
                    <h1>{p.name.clone()}</h1>
                    {p.description.clone().map(|d| view! { <p class="project-description">{d}</p> })}
                </div>
            }
        })
    };

    let stats = move || {
        let stats = board.with(|b| b.stats());
        let total = board.with(|b| b.tasks().len());
        view! {
            <div class="board-stats">
                <span class="stat stat-total">{pluralize(total, "task")}</span>
                {TaskStatus::ALL.into_iter().map(|status| view! {
                    <span class=format!("stat {}", status.css_class())>
                        {format!("{}: {}", status.label(), stats.count(status))}
                    </span>
                }).collect_view()}
            </div>
        }
    };

    view! {
        <div class="project-detail-page">
            <header class="page-header">
                <button type="button" class="btn-link" on:click=move |_| ctx.navigate(Route::Projects)>
                    "← Projects"
                </button>
                {header}
                <div class="page-actions">
                    <RoleBadge role=Signal::derive(move || ctx.role()) />
                    <button
                        type="button"
                        class="btn-secondary"
                        disabled=move || loading.get()
                        on:click=move |_| reload.update(|n| *n += 1)
                    >
                        "Reload"
                    </button>
                    <Show when=move || ctx.is_admin() && load_error.with(|e| e.is_none())>
                        <button type="button" class="btn-primary" on:click=move |_| show_create.set(true)>
                            "Create Task"
                        </button>
                    </Show>
                </div>
            </header>

            {move || {
                if let Some(message) = load_error.get() {
                    return view! {
                        <div class="load-error">
                            <p class="error-text">{message}</p>
                            <button type="button" class="btn-secondary" on:click=move |_| ctx.navigate(Route::Projects)>
                                "Go Back"
                            </button>
                        </div>
                    }
                    .into_any();
                }
                if project.with(|p| p.is_none()) {
                    return view! { <p class="loading">"Loading project..."</p> }.into_any();
                }
                view! {
                    <ErrorBanner
                        message=Signal::derive(move || board.with(|b| b.error().map(str::to_string)))
                        on_dismiss=move |_| board.update(|b| b.clear_error())
                    />
                    {stats}
                    <div class="board">
                        {TaskStatus::ALL.into_iter().map(|status| view! {
                            <BoardColumn
                                status=status
                                board=board
                                dnd=dnd
                                on_status_change=on_status_change
                                on_edit=move |task: Task| editing.set(Some(task))
                            />
                        }).collect_view()}
                    </div>
                }
                .into_any()
            }}

            <TaskCreateModal open=show_create on_submit=on_create_task />
            <TaskEditModal editing=editing on_submit=on_edit_submit />
            <LogPanel />
        </div>
    }
}
