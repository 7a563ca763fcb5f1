use leptos::prelude::*;

use crate::models::TaskStatus;

/// Status dropdown; emits only when a different status is picked
#[component]
pub fn StatusSelect(
    value: Signal<TaskStatus>,
    #[prop(into)] on_change: Callback<TaskStatus>,
    disabled: Signal<bool>,
) -> impl IntoView {
    view! {
        <select
            class="status-select"
            prop:value=move || value.get().as_str()
            disabled=move || disabled.get()
            on:change=move |ev| {
                if let Some(status) = TaskStatus::parse(&event_target_value(&ev)) {
                    if status != value.get_untracked() {
                        on_change.run(status);
                    }
                }
            }
        >
            {TaskStatus::ALL.into_iter().map(|status| view! {
                <option value=status.as_str() selected=move || value.get() == status>
                    {status.label()}
                </option>
            }).collect_view()}
        </select>
    }
}
