//! Auth Page
//!
//! Login and signup forms toggled on one page. Login stores the issued
//! token through the app context; signup switches back to login.

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::{error, info};

use crate::context::use_app_context;
use crate::error::ApiError;
use crate::forms::{LoginDraft, SignupDraft, SubmitState};

const LOGIN_REJECTED: &str = "Incorrect email or password";
const LOGIN_FAILED: &str = "Login failed";
const INVALID_TOKEN: &str = "Received an invalid token";
const SIGNUP_FAILED: &str = "Signup failed";
const SIGNUP_DONE: &str = "Account created. Please log in.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Login,
    Signup,
}

#[component]
pub fn AuthPage() -> impl IntoView {
    let mode = RwSignal::new(Mode::Login);
    let notice = RwSignal::new(None::<&'static str>);
    let login = RwSignal::new(LoginDraft::default());

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Taskboard"</h1>
                <div class="auth-tabs">
                    <button
                        type="button"
                        class=move || if mode.get() == Mode::Login { "auth-tab active" } else { "auth-tab" }
                        on:click=move |_| mode.set(Mode::Login)
                    >
                        "Log in"
                    </button>
                    <button
                        type="button"
                        class=move || if mode.get() == Mode::Signup { "auth-tab active" } else { "auth-tab" }
                        on:click=move |_| {
                            notice.set(None);
                            mode.set(Mode::Signup);
                        }
                    >
                        "Sign up"
                    </button>
                </div>
                {move || notice.get().map(|n| view! { <p class="form-notice">{n}</p> })}
                {move || match mode.get() {
                    Mode::Login => view! { <LoginForm draft=login /> }.into_any(),
                    Mode::Signup => view! {
                        <SignupForm on_created=move |email: String| {
                            login.set(LoginDraft { email, password: String::new() });
                            notice.set(Some(SIGNUP_DONE));
                            mode.set(Mode::Login);
                        } />
                    }.into_any(),
                }}
            </div>
        </div>
    }
}

#[component]
fn LoginForm(draft: RwSignal<LoginDraft>) -> impl IntoView {
    let ctx = use_app_context();
    let state = RwSignal::new(SubmitState::Idle);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if state.get_untracked().is_submitting() {
            return;
        }
        let args = match draft.with_untracked(|d| d.validate()) {
            Ok(args) => args,
            Err(e) => {
                state.set(SubmitState::Failed(e.to_string()));
                return;
            }
        };
        state.set(SubmitState::Submitting);
        let api = ctx.anonymous_api();
        spawn_local(async move {
            let message = match api.login(&args).await {
                Ok(response) => match ctx.login(&response.access_token) {
                    Ok(()) => return,
                    Err(e) => {
                        error!(target: "auth", "login returned an unusable token: {e}");
                        INVALID_TOKEN
                    }
                },
                Err(ApiError::Unauthorized { .. }) => {
                    info!(target: "auth", "login rejected");
                    LOGIN_REJECTED
                }
                Err(e) => {
                    error!(target: "auth", "Login Error: {e}");
                    LOGIN_FAILED
                }
            };
            draft.update(|d| d.password.clear());
            state.set(SubmitState::Failed(message.to_string()));
        });
    };

    view! {
        <form class="auth-form" on:submit=submit>
            {move || state.with(|s| s.error().map(|e| view! { <p class="form-error">{e.to_string()}</p> }))}
            <label>
                "Email"
                <input
                    type="email"
                    autocomplete="username"
                    prop:value=move || draft.with(|d| d.email.clone())
                    on:input=move |ev| draft.update(|d| d.email = event_target_value(&ev))
                />
            </label>
            <label>
                "Password"
                <input
                    type="password"
                    autocomplete="current-password"
                    prop:value=move || draft.with(|d| d.password.clone())
                    on:input=move |ev| draft.update(|d| d.password = event_target_value(&ev))
                />
            </label>
            <button type="submit" class="btn-primary" disabled=move || state.with(|s| s.is_submitting())>
                {move || if state.with(|s| s.is_submitting()) { "Logging in..." } else { "Log in" }}
            </button>
        </form>
    }
}

#[component]
fn SignupForm(#[prop(into)] on_created: Callback<String>) -> impl IntoView {
    let ctx = use_app_context();
    let draft = RwSignal::new(SignupDraft::default());
    let state = RwSignal::new(SubmitState::Idle);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if state.get_untracked().is_submitting() {
            return;
        }
        let args = match draft.with_untracked(|d| d.validate()) {
            Ok(args) => args,
            Err(e) => {
                state.set(SubmitState::Failed(e.to_string()));
                return;
            }
        };
        state.set(SubmitState::Submitting);
        let api = ctx.anonymous_api();
        spawn_local(async move {
            match api.signup(&args).await {
                Ok(user) => {
                    info!(target: "auth", user_id = user.id, "account created");
                    state.set(SubmitState::Idle);
                    on_created.run(user.email);
                }
                Err(e) => {
                    error!(target: "auth", "Signup Error: {e}");
                    state.set(SubmitState::Failed(SIGNUP_FAILED.to_string()));
                }
            }
        });
    };

    view! {
        <form class="auth-form" on:submit=submit>
            {move || state.with(|s| s.error().map(|e| view! { <p class="form-error">{e.to_string()}</p> }))}
            <label>
                "Name"
                <input
                    type="text"
                    autocomplete="name"
                    prop:value=move || draft.with(|d| d.name.clone())
                    on:input=move |ev| draft.update(|d| d.name = event_target_value(&ev))
                />
            </label>
            <label>
                "Email"
                <input
                    type="email"
                    autocomplete="email"
                    prop:value=move || draft.with(|d| d.email.clone())
                    on:input=move |ev| draft.update(|d| d.email = event_target_value(&ev))
                />
            </label>
            <label>
                "Password"
                <input
                    type="password"
                    autocomplete="new-password"
                    prop:value=move || draft.with(|d| d.password.clone())
                    on:input=move |ev| draft.update(|d| d.password = event_target_value(&ev))
                />
            </label>
            <button type="submit" class="btn-primary" disabled=move || state.with(|s| s.is_submitting())>
                {move || if state.with(|s| s.is_submitting()) { "Creating account..." } else { "Sign up" }}
            </button>
        </form>
    }
}
