use leptos::prelude::*;

/// Dismissable view-level error message
#[component]
pub fn ErrorBanner(
    message: Signal<Option<String>>,
    #[prop(optional, into)] on_dismiss: Option<Callback<()>>,
) -> impl IntoView {
    move || {
        message.get().map(|text| {
            view! {
                <div class="error-banner" role="alert">
                    <span class="error-text">{text}</span>
                    {on_dismiss.map(|dismiss| view! {
                        <button type="button" class="error-dismiss" on:click=move |_| dismiss.run(())>
                            "×"
                        </button>
                    })}
                </div>
            }
        })
    }
}
