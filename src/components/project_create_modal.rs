//! Project Create Modal
//!
//! Collects name and description, validates them locally and hands the
//! payload to `on_submit`. Stays open with its values on failure.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{Modal, SubmitFuture};
use crate::forms::{ModalForm, ProjectDraft};
use crate::models::CreateProjectArgs;
use crate::store::CREATE_PROJECT_FAILED;

#[component]
pub fn ProjectCreateModal(
    open: RwSignal<bool>,
    #[prop(into)] on_submit: Callback<CreateProjectArgs, SubmitFuture>,
) -> impl IntoView {
    let form = RwSignal::new(ModalForm::<ProjectDraft>::default());

    let close = move || {
        form.update(|f| f.reset());
        open.set(false);
    };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(args) = form.try_update(|f| f.submit(ProjectDraft::validate)).flatten() else {
            return;
        };
        let request = on_submit.run(args);
        spawn_local(async move {
            let result = request.await;
            if form.try_update(|f| f.finish(&result, CREATE_PROJECT_FAILED)) == Some(true) {
                open.set(false);
            }
        });
    };

    view! {
        <Show when=move || open.get()>
            <Modal title="Create Project" on_close=move |_| close()>
                <form class="modal-form" on:submit=submit>
                    {move || form.with(|f| f.state.error().map(|e| view! { <p class="form-error">{e.to_string()}</p> }))}
                    <label>
                        "Name"
                        <input
                            type="text"
                            placeholder="Project name"
                            prop:value=move || form.with(|f| f.draft.name.clone())
                            on:input=move |ev| form.update(|f| f.draft.name = event_target_value(&ev))
                        />
                    </label>
                    <label>
                        "Description"
                        <textarea
                            placeholder="Optional description"
                            prop:value=move || form.with(|f| f.draft.description.clone())
                            on:input=move |ev| form.update(|f| f.draft.description = event_target_value(&ev))
                        />
                    </label>
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
