use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{Modal, SubmitFuture};
use crate::board::CREATE_TASK_FAILED;
use crate::context::use_app_context;
use crate::forms::{ModalForm, TaskDraft};
use crate::models::{CreateTaskArgs, TaskStatus};

/// Task create form; the assignee field is offered to admins only
#[component]
pub fn TaskCreateModal(
    open: RwSignal<bool>,
    #[prop(into)] on_submit: Callback<CreateTaskArgs, SubmitFuture>,
) -> impl IntoView {
    let ctx = use_app_context();
    let form = RwSignal::new(ModalForm::<TaskDraft>::default());

    let close = move || {
        form.update(|f| f.reset());
        open.set(false);
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let is_admin = ctx.session.with_untracked(|s| s.is_admin());
        let Some(args) = form.try_update(|f| f.submit(|d| d.validate(is_admin))).flatten() else {
            return;
        };
        let request = on_submit.run(args);
        spawn_local(async move {
            let result = request.await;
            if form.try_update(|f| f.finish(&result, CREATE_TASK_FAILED)) == Some(true) {
                open.set(false);
            }
        });
    };

    view! {
        <Show when=move || open.get()>
            <Modal title="Create Task" on_close=move |_| close()>
                <form class="modal-form" on:submit=submit>
                    {move || form.with(|f| f.state.error().map(|e| view! { <p class="form-error">{e.to_string()}</p> }))}
                    <label>
                        "Title"
                        <input
                            type="text"
                            placeholder="Task title"
                            prop:value=move || form.with(|f| f.draft.title.clone())
                            on:input=move |ev| form.update(|f| f.draft.title = event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Status"
                        <select
                            prop:value=move || form.with(|f| f.draft.status.as_str())
                            on:change=move |ev| {
                                if let Some(status) = TaskStatus::parse(&event_target_value(&ev)) {
                                    form.update(|f| f.draft.status = status);
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
                            prop:value=move || form.with(|f| f.draft.due_date.clone())
                            on:input=move |ev| form.update(|f| f.draft.due_date = event_target_value(&ev))
                        />
                    </label>
                    <Show when=move || ctx.is_admin()>
                        <label>
                            "Assignee user id"
                            <input
                                type="number"
                                min="1"
                                placeholder="Unassigned"
                                prop:value=move || form.with(|f| f.draft.assignee.clone())
                                on:input=move |ev| form.update(|f| f.draft.assignee = event_target_value(&ev))
                            />
                        </label>
                    </Show>
                    <div class="modal-actions">
                        <button type="button" class="btn-secondary" on:click=move |_| close()>
                            "Cancel"
                        </button>
                        <button type="submit" class="btn-primary" disabled=move || form.with(|f| f.state.is_submitting())>
                            {move || if form.with(|f| f.state.is_submitting()) { "Creating..." } else { "Create" }}
                        </button>
                    </div>
                </form>
            </Modal>
        </Show>
    }
}
