//! Projects Page
//!
//! Dashboard listing the projects the session can see, with search and the
//! admin-only create modal.

use futures::FutureExt;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::components::{ErrorBanner, LogPanel, ProjectCreateModal, RoleBadge, SubmitFuture};
use crate::context::{use_app_context, Route};
use crate::models::{display_date, pluralize, CreateProjectArgs, Project};
use crate::store::{self, ProjectListState, ProjectListStateStoreFields, CREATE_PROJECT_FAILED, FETCH_PROJECTS_FAILED};

#[component]
pub fn ProjectsPage() -> impl IntoView {
    let ctx = use_app_context();
    let state = Store::new(ProjectListState::default());
    let show_create = RwSignal::new(false);
    // Only the newest fetch may write the list
    let latest_fetch = StoredValue::new(0u64);

    Effect::new(move |_| {
        let query = state.search_query().get();
        let generation = latest_fetch.get_value() + 1;
        latest_fetch.set_value(generation);
        let api = ctx.api();
        spawn_local(async move {
            let result = store::fetch_projects(&api, &query).await;
            if latest_fetch.try_get_value() != Some(generation) {
                return;
            }
            match result {
                Ok(projects) => {
                    state.projects().set(projects);
                    state.error().set(None);
                }
                Err(_) => state.error().set(Some(FETCH_PROJECTS_FAILED.to_string())),
            }
            state.loaded().set(true);
        });
    });

    let on_create = Callback::new(move |args: CreateProjectArgs| -> SubmitFuture {
        let api = ctx.api();
        let query = state.search_query().get_untracked();
        async move {
            state.creating().set(true);
            let result = store::create_project(&api, &args, &query).await;
            state.creating().set(false);
            match result {
                Ok(projects) => {
                    state.projects().set(projects);
                    state.error().set(None);
                    Ok(())
                }
                Err(e) => {
                    state.error().set(Some(CREATE_PROJECT_FAILED.to_string()));
                    Err(e)
                }
            }
        }
        .boxed_local()
    });

    let empty_message = move || {
        if !state.search_query().with(|q| q.trim().is_empty()) {
            "No projects match your search."
        } else if ctx.is_admin() {
            "No projects yet. Create your first project to get started."
        } else {
            "No projects yet. Ask an admin to add you to a project."
        }
    };

    view! {
        <div class="projects-page">
            <header class="page-header">
                <div class="page-title">
                    <h1>"Projects"</h1>
                    <RoleBadge role=Signal::derive(move || ctx.role()) />
                </div>
                <div class="page-actions">
                    <Show when=move || ctx.is_admin()>
                        <button
                            type="button"
                            class="btn-primary"
                            disabled=move || state.creating().get()
                            on:click=move |_| show_create.set(true)
                        >
                            "Create Project"
                        </button>
                    </Show>
                    <button type="button" class="btn-secondary" on:click=move |_| ctx.logout()>
                        "Log out"
                    </button>
                </div>
            </header>

            <ErrorBanner
                message=Signal::derive(move || state.error().get())
                on_dismiss=move |_| state.error().set(None)
            />

            <div class="search-bar">
                <input
                    type="search"
                    placeholder="Search projects..."
                    prop:value=move || state.search_query().get()
                    on:input=move |ev| state.search_query().set(event_target_value(&ev))
                />
                <span class="project-count">
                    {move || pluralize(state.projects().with(|p| p.len()), "project")}
                </span>
            </div>

            {move || {
                if !state.loaded().get() {
                    return view! { <p class="loading">"Loading projects..."</p> }.into_any();
                }
                let projects = state.projects().get();
                if projects.is_empty() {
                    if state.error().with(|e| e.is_some()) {
                        return ().into_any();
                    }
                    return view! { <p class="empty-state">{empty_message()}</p> }.into_any();
                }
                view! {
                    <ul class="project-list">
                        {projects.into_iter().map(|project| view! { <ProjectRow project=project /> }).collect_view()}
                    </ul>
                }
                .into_any()
            }}

            <ProjectCreateModal open=show_create on_submit=on_create />
            <LogPanel />
        </div>
    }
}

#[component]
fn ProjectRow(project: Project) -> impl IntoView {
    let ctx = use_app_context();
    let id = project.id;

    view! {
        <li class="project-row" on:click=move |_| ctx.navigate(Route::Project(id))>
            <span class="project-avatar">{project.initial()}</span>
            <div class="project-info">
                <h3 class="project-name">{project.name.clone()}</h3>
                {project.description.clone().map(|d| view! { <p class="project-description">{d}</p> })}
            </div>
            <span class="project-created">{format!("Created {}", display_date(&project.created_at))}</span>
        </li>
    }
}
