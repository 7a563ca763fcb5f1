//! Task Edit Modal
//!
//! Prefilled from the task being edited. Submitting closes the modal at once
//! and hands the changed fields to the board's optimistic update.

use leptos::prelude::*;

use super::Modal;
use crate::context::use_app_context;
use crate::error::ValidationError;
use crate::forms::TaskEditDraft;
use crate::models::{Task, TaskChanges, TaskStatus};

#[component]
pub fn TaskEditModal(
    /// Task being edited; `None` keeps the modal closed
    editing: RwSignal<Option<Task>>,
    #[prop(into)] on_submit: Callback<(Task, TaskChanges)>,
) -> impl IntoView {
    let ctx = use_app_context();
    let draft = RwSignal::new(TaskEditDraft::default());
    let error = RwSignal::new(None::<String>);

    Effect::new(move |_| {
        if let Some(task) = editing.get() {
            draft.set(TaskEditDraft::from_task(&task));
            error.set(None);
        }
    });

    let close = move || {
        editing.set(None);
        error.set(None);
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(task) = editing.get_untracked() else { return };
        let is_admin = ctx.session.with_untracked(|s| s.is_admin());
        match draft.with_untracked(|d| d.changes(&task, is_admin)) {
            Ok(changes) => {
                close();
                on_submit.run((task, changes));
            }
            Err(ValidationError::NoChanges) => close(),
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    view! {
        <Show when=move || editing.with(|t| t.is_some())>
            <Modal title="Edit Task" on_close=move |_| close()>
                <form class="modal-form" on:submit=submit>
                    {move || error.get().map(|e| view! { <p class="form-error">{e}</p> })}
                    <label>
                        "Title"
                        <input
                            type="text"
                            prop:value=move || draft.with(|d| d.title.clone())
                            on:input=move |ev| draft.update(|d| d.title = event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Status"
                        <select
                            prop:value=move || draft.with(|d| d.status.as_str())
                            on:change=move |ev| {
                                if let Some(status) = TaskStatus::parse(&event_target_value(&ev)) {
                                    draft.update(|d| d.status = status);
                                }
                            }
                        >
                            {TaskStatus::ALL.into_iter().map(|status| view! {
                                <option value=status.as_str()>{status.label()}</option>
                            }).collect_view()}
                        </select>
                    </label>
                    <label>
                        "Due date"
                        <input
                            type="date"
                            prop:value=move || draft.with(|d| d.due_date.clone())
                            on:input=move |ev| draft.update(|d| d.due_date = event_target_value(&ev))
                        />
                    </label>
                    <Show when=move || ctx.is_admin()>
                        <label>
                            "Assignee user id"
                            <input
                                type="number"
                                min="1"
                                placeholder="Unassigned"
                                prop:value=move || draft.with(|d| d.assignee.clone())
                                on:input=move |ev| draft.update(|d| d.assignee = event_target_value(&ev))
                            />
                        </label>
                    </Show>
                    <div class="modal-actions">
                        <button type="button" class="btn-secondary" on:click=move |_| close()>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn-primary">"Save"</button>
                    </div>
                </form>
            </Modal>
        </Show>
    }
}
