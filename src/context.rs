//! Application Context
//!
//! Shared state provided via Leptos Context API: the current view and
//! the session decoded at mount.

use leptos::prelude::*;
use leptos_dragdrop::{bind_global_mouseup, create_dnd_signals, DndSignals};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::TokenError;
use crate::models::{Role, TaskStatus};
use crate::session::{BrowserTokenStore, Session, TokenStore};

/// Top-level views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Auth,
    Projects,
    Project(u32),
}

impl Route {
    /// Parse a location hash such as `#/projects/7`
    pub fn from_hash(hash: &str) -> Route {
        let path = hash.trim_start_matches('#').trim_matches('/');
        let mut parts = path.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("projects"), None, None) => Route::Projects,
            (Some("projects"), Some(id), None) => id.parse().map(Route::Project).unwrap_or(Route::Projects),
            _ => Route::Auth,
        }
    }

    pub fn to_hash(&self) -> String {
        match self {
            Route::Auth => "#/".to_string(),
            Route::Projects => "#/projects".to_string(),
            Route::Project(id) => format!("#/projects/{id}"),
        }
    }
}

/// App-wide signals provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Current view - read
    pub route: ReadSignal<Route>,
    /// Current view - write
    set_route: WriteSignal<Route>,
    /// Decoded session - read
    pub session: ReadSignal<Session>,
    /// Decoded session - write (login/logout only)
    set_session: WriteSignal<Session>,
    tokens: StoredValue<BrowserTokenStore>,
    api_base_url: StoredValue<String>,
}

impl AppContext {
    /// Decode the stored token once and build the context around it
    pub fn init(api_base_url: String, token_key: &str) -> Self {
        let tokens = BrowserTokenStore::new(token_key);
        let session = Session::restore(&tokens);
        let initial = match (session.is_authenticated(), Route::from_hash(&current_hash())) {
            (true, Route::Auth) => Route::Projects,
            (true, route) => route,
            (false, _) => Route::Auth,
        };
        let (route, set_route) = signal(initial);
        let (session, set_session) = signal(session);

        Self {
            route,
            set_route,
            session,
            set_session,
            tokens: StoredValue::new(tokens),
            api_base_url: StoredValue::new(api_base_url),
        }
    }

    pub fn navigate(&self, route: Route) {
        set_hash(&route.to_hash());
        self.set_route.set(route);
    }

    /// Follow a hash change made outside the app (back/forward buttons)
    pub fn sync_with_location(&self) {
        let route = Route::from_hash(&current_hash());
        if route != self.route.get_untracked() {
            self.set_route.set(route);
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.session.with(|s| s.role)
    }

    pub fn is_admin(&self) -> bool {
        self.session.with(|s| s.is_admin())
    }

    /// Client carrying the current session's token
    pub fn api(&self) -> ApiClient {
        ApiClient::new(self.api_base_url.get_value()).with_token(self.session.with_untracked(|s| s.token.clone()))
    }

    /// Anonymous client for the auth endpoints
    pub fn anonymous_api(&self) -> ApiClient {
        ApiClient::new(self.api_base_url.get_value())
    }

    /// Store a freshly issued token and switch to the dashboard
    pub fn login(&self, token: &str) -> Result<(), TokenError> {
        let session = Session::from_token(token)?;
        info!(target: "session", role = ?session.role, "logged in");
        self.tokens.with_value(|t| t.save(token));
        self.set_session.set(session);
        self.navigate(Route::Projects);
        Ok(())
    }

    pub fn logout(&self) {
        info!(target: "session", "logged out");
        self.tokens.with_value(|t| t.clear());
        self.set_session.set(Session::anonymous());
        self.navigate(Route::Auth);
    }
}

/// Board drag-and-drop state shared by every project view
///
/// The document listeners are bound once; the mounted board registers its
/// drop handler and removes it on cleanup.
#[derive(Clone, Copy)]
pub struct BoardDnd {
    pub signals: DndSignals<TaskStatus>,
    /// Registration id and handler of the mounted board
    on_drop: StoredValue<(u64, Option<Callback<(u32, TaskStatus)>>)>,
}

impl BoardDnd {
    pub fn new() -> Self {
        Self { signals: create_dnd_signals(), on_drop: StoredValue::new((0, None)) }
    }

    /// Create and bind the document listeners
    pub fn install() -> Self {
        let dnd = Self::new();
        bind_global_mouseup(dnd.signals, move |task_id, status| dnd.dispatch(task_id, status));
        dnd
    }

    /// Route drops to `handler`; returns the id to unregister with
    pub fn register(&self, handler: Callback<(u32, TaskStatus)>) -> u64 {
        let mut id = 0;
        self.on_drop.update_value(|(current, slot)| {
            *current += 1;
            id = *current;
            *slot = Some(handler);
        });
        id
    }

    /// Drop the handler, unless a newer board has registered since
    pub fn unregister(&self, id: u64) {
        self.on_drop.try_update_value(|(current, slot)| {
            if *current == id {
                *slot = None;
            }
        });
    }

    /// Hand a drop to the mounted board, if any
    pub fn dispatch(&self, task_id: u32, status: TaskStatus) {
        if let Some(handler) = self.on_drop.try_with_value(|(_, slot)| *slot).flatten() {
            handler.run((task_id, status));
        }
    }
}

impl Default for BoardDnd {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

fn current_hash() -> String {
    web_sys::window().and_then(|w| w.location().hash().ok()).unwrap_or_default()
}

fn set_hash(hash: &str) {
    if let Some(window) = web_sys::window() {
        if window.location().set_hash(hash).is_err() {
            warn!(target: "app", hash, "could not update location hash");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_from_hash() {
        assert_eq!(Route::from_hash(""), Route::Auth);
        assert_eq!(Route::from_hash("#/"), Route::Auth);
        assert_eq!(Route::from_hash("#/projects"), Route::Projects);
        assert_eq!(Route::from_hash("#/projects/"), Route::Projects);
        assert_eq!(Route::from_hash("#/projects/12"), Route::Project(12));
        assert_eq!(Route::from_hash("#/projects/abc"), Route::Projects);
        assert_eq!(Route::from_hash("#/elsewhere/1/2"), Route::Auth);
    }

    #[test]
    fn test_drop_reaches_only_the_mounted_board() {
        use std::sync::{Arc, Mutex};

        let owner = Owner::new();
        owner.with(|| {
            let dropped = Arc::new(Mutex::new(Vec::new()));
            let dnd = BoardDnd::new();

            dnd.dispatch(1, TaskStatus::Done);

            let record = |board: u32| {
                let sink = dropped.clone();
                Callback::new(move |(task, status): (u32, TaskStatus)| sink.lock().unwrap().push((board, task, status)))
            };

            let first = dnd.register(record(1));
            dnd.dispatch(2, TaskStatus::InProgress);

            // Next board mounts before the previous one is cleaned up
            let second = dnd.register(record(2));
            dnd.unregister(first);
            dnd.dispatch(3, TaskStatus::Done);

            dnd.unregister(second);
            dnd.dispatch(4, TaskStatus::Todo);

            assert_eq!(
                *dropped.lock().unwrap(),
                vec![(1, 2, TaskStatus::InProgress), (2, 3, TaskStatus::Done)]
            );
        });
    }

    #[test]
    fn test_route_hash_round_trip() {
        for route in [Route::Auth, Route::Projects, Route::Project(3)] {
            assert_eq!(Route::from_hash(&route.to_hash()), route);
        }
    }
}
