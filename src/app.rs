//! Taskboard Frontend App
//!
//! Root component: provides the app context and renders the current route.

use leptos::prelude::*;
use rolling_logger::LogBuffer;
use tracing::info;

use crate::config::Config;
use crate::context::{AppContext, BoardDnd, Route};
use crate::pages::{AuthPage, ProjectDetailPage, ProjectsPage};

#[component]
pub fn App(config: Config, logs: LogBuffer) -> impl IntoView {
    let ctx = AppContext::init(config.api_base_url, &config.token_storage_key);
    provide_context(ctx);
    provide_context(logs);
    provide_context(BoardDnd::install());

    let _ = window_event_listener(leptos::ev::hashchange, move |_| ctx.sync_with_location());

    // Signed-out sessions only ever see the auth view
    Effect::new(move |_| {
        let route = ctx.route.get();
        match (ctx.role().is_some(), route) {
            (false, Route::Auth) | (true, Route::Projects) | (true, Route::Project(_)) => {}
            (false, _) => {
                info!(target: "app", ?route, "not signed in, redirecting");
                ctx.navigate(Route::Auth);
            }
            (true, Route::Auth) => ctx.navigate(Route::Projects),
        }
    });

    view! {
        <div class="app">
            {move || match (ctx.role().is_some(), ctx.route.get()) {
                (_, Route::Auth) => view! { <AuthPage /> }.into_any(),
                (false, _) => view! { <p class="loading">"Loading or redirecting..."</p> }.into_any(),
                (true, Route::Projects) => view! { <ProjectsPage /> }.into_any(),
                (true, Route::Project(id)) => view! { <ProjectDetailPage project_id=id /> }.into_any(),
            }}
        </div>
    }
}
