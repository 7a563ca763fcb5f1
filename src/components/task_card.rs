//! Task Card Component
//!
//! One task on the board: title, status control, assignee, due date and the
//! edit action. Cards the session may not change render their controls
//! disabled and do not start drags.

use leptos::prelude::*;
use leptos_dragdrop::{make_on_mousedown, DndSignals};

use crate::components::StatusSelect;
use crate::context::use_app_context;
use crate::models::{display_date, Task, TaskStatus};

#[component]
pub fn TaskCard(
    task: Task,
    pending: Signal<bool>,
    dnd: DndSignals<TaskStatus>,
    #[prop(into)] on_status_change: Callback<(u32, TaskStatus)>,
    #[prop(into)] on_edit: Callback<Task>,
) -> impl IntoView {
    let ctx = use_app_context();
    let id = task.id;
    let status = task.status;
    let editable = Signal::derive({
        let task = task.clone();
        move || ctx.session.with(|s| s.can_edit(&task))
    });
    let on_mousedown = make_on_mousedown(dnd, id);

    let class = move || {
        let mut class = String::from("task-card");
        if pending.get() {
            class.push_str(" pending");
        }
        if dnd.dragging() == Some(id) {
            class.push_str(" dragging");
        }
        if !editable.get() {
            class.push_str(" readonly");
        }
        class
    };

    let assignee = match task.assignee_user_id {
        Some(user) => format!("Assigned to #{user}"),
        None => "Unassigned".to_string(),
    };
    let due = task.due_date.as_deref().map(|d| format!("Due {}", display_date(d)));
    let edit_target = task.clone();

    view! {
        <div
            class=class
            data-task-id=id
            on:mousedown=move |ev| {
                if editable.get_untracked() {
                    on_mousedown(ev);
                }
            }
        >
            <div class="task-card-header">
                <h4 class="task-title">{task.title.clone()}</h4>
                <button
                    type="button"
                    class="task-edit-btn"
                    disabled=move || !editable.get()
                    on:click=move |_| on_edit.run(edit_target.clone())
                >
                    "Edit"
                </button>
            </div>
            <StatusSelect
                value=Signal::stored(status)
                disabled=Signal::derive(move || !editable.get() || pending.get())
                on_change=move |next| on_status_change.run((id, next))
            />
            <div class="task-meta">
                <span class="task-assignee">{assignee}</span>
                {due.map(|d| view! { <span class="task-due">{d}</span> })}
            </div>
        </div>
    }
}
