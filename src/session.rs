//! Session
//!
//! Bearer token persistence and client-side claim decoding. The decoded role
//! only drives which controls render; the API enforces the real permissions.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::TokenError;
use crate::models::{Role, Task};

/// Persistent token storage
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// `window.localStorage`-backed store
#[derive(Debug, Clone)]
pub struct BrowserTokenStore {
    key: String,
}

impl BrowserTokenStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStore for BrowserTokenStore {
    fn load(&self) -> Option<String> {
        Self::storage()?.get_item(&self.key).ok()?.filter(|t| !t.is_empty())
    }

    fn save(&self, token: &str) {
        match Self::storage() {
            Some(storage) => {
                if storage.set_item(&self.key, token).is_err() {
                    warn!(target: "session", "localStorage rejected the token");
                }
            }
            None => warn!(target: "session", "localStorage unavailable, token not persisted"),
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(&self.key);
        }
    }
}

/// Claims read from the token payload
#[derive(Debug, Clone, PartialEq)]
pub struct Claims {
    pub role: Role,
    /// Subject (the user's email for the reference backend)
    pub sub: Option<String>,
    /// First of `user_id`, `uid`, `id` holding a numeric id
    pub user_id: Option<u32>,
    pub exp: Option<i64>,
}

/// Payload as issued; only `role` has to be well-formed
#[derive(Deserialize)]
struct RawClaims {
    role: Role,
    #[serde(default)]
    sub: Option<Value>,
    #[serde(default)]
    user_id: Option<Value>,
    #[serde(default)]
    uid: Option<Value>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    exp: Option<Value>,
}

fn numeric_id(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl From<RawClaims> for Claims {
    fn from(raw: RawClaims) -> Self {
        let user_id = [&raw.user_id, &raw.uid, &raw.id]
            .into_iter()
            .flatten()
            .find_map(numeric_id);
        Self {
            role: raw.role,
            sub: raw.sub.as_ref().and_then(Value::as_str).map(str::to_string),
            user_id,
            exp: raw.exp.as_ref().and_then(Value::as_i64),
        }
    }
}

/// Decode the payload segment of a JWT without verifying its signature
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 || segments[1].is_empty() {
        return Err(TokenError::Malformed);
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .map_err(|e| TokenError::Encoding(e.to_string()))?;

    serde_json::from_slice::<RawClaims>(&payload)
        .map(Claims::from)
        .map_err(|e| TokenError::Claims(e.to_string()))
}

/// Authenticated identity for the lifetime of a page mount
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
    pub user_id: Option<u32>,
    pub subject: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build from a raw token taken from storage or a login response
    pub fn from_token(token: &str) -> Result<Self, TokenError> {
        let claims = decode_claims(token)?;
        Ok(Self {
            token: Some(token.to_string()),
            role: Some(claims.role),
            user_id: claims.user_id,
            subject: claims.sub,
        })
    }

    /// Read and decode the stored token; an undecodable token is removed
    pub fn restore(store: &dyn TokenStore) -> Self {
        let Some(token) = store.load() else {
            return Self::anonymous();
        };
        match Self::from_token(&token) {
            Ok(session) => {
                info!(target: "session", role = ?session.role, "restored session");
                session
            }
            Err(e) => {
                warn!(target: "session", error = %e, "invalid token, clearing");
                store.clear();
                Self::anonymous()
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.role.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// Admins may change any task; others only tasks assigned to them
    pub fn can_edit(&self, task: &Task) -> bool {
        if self.is_admin() {
            return true;
        }
        match (self.user_id, task.assignee_user_id) {
            (Some(me), Some(assignee)) => me == assignee,
            _ => false,
        }
    }
}
