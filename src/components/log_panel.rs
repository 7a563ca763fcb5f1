use leptos::prelude::*;
use rolling_logger::LogBuffer;

/// Collapsible view of the most recent log lines
#[component]
pub fn LogPanel() -> impl IntoView {
    let Some(buffer) = use_context::<LogBuffer>() else {
        return ().into_any();
    };
    let open = RwSignal::new(false);
    let lines = RwSignal::new(Vec::<String>::new());
    let buffer = StoredValue::new(buffer);
    let refresh = move || lines.set(buffer.with_value(|b| b.recent()));
    let toggle = move |_| {
        if !open.get_untracked() {
            refresh();
        }
        open.update(|o| *o = !*o);
    };

    view! {
        <div class="log-panel">
            <button type="button" class="log-toggle" on:click=toggle>
                {move || if open.get() { "Hide logs" } else { "Show logs" }}
            </button>
            <Show when=move || open.get()>
                <div class="log-actions">
                    <button type="button" on:click=move |_| refresh()>"Refresh"</button>
                    <span class="log-count">{move || format!("{} lines", lines.with(|l| l.len()))}</span>
                </div>
                <pre class="log-lines">{move || lines.get().join("\n")}</pre>
            </Show>
        </div>
    }
    .into_any()
}
