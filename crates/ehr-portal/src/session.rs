//! Session Store
//!
//! Owns the signed-in identity for the lifetime of the portal and mirrors
//! it into client storage so a restart restores it.
//!
//! Lifecycle: `hydrate` (stored identity or anonymous) → `login` →
//! authenticated → `logout` → anonymous.

use crate::client::RecordServiceClient;
use crate::response::ApiResponse;
use crate::storage::{SessionStorage, SESSION_KEY};
use ehr_core::{Credentials, Identity, LoginForm};
use log::{info, warn};
use std::sync::Arc;

/// Message used when the backend rejects a login without saying why
pub const AUTH_FAILED_MESSAGE: &str = "Authentication failed";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(Identity),
}

pub struct Session {
    storage: Arc<dyn SessionStorage>,
    state: SessionState,
    last_error: Option<String>,
}

impl Session {
    /// Restore the session from storage.
    ///
    /// Unreadable or malformed data is discarded and the user starts
    /// signed out; hydration itself never fails.
    pub fn hydrate(storage: Arc<dyn SessionStorage>) -> Self {
        let state = match storage.get_item(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => {
                    info!("restored session for {} ({})", identity.name, identity.role);
                    SessionState::Authenticated(identity)
                }
                Err(e) => {
                    warn!("discarding malformed stored session: {}", e);
                    if let Err(e) = storage.remove_item(SESSION_KEY) {
                        warn!("could not remove malformed session: {}", e);
                    }
                    SessionState::Anonymous
                }
            },
            Ok(None) => SessionState::Anonymous,
            Err(e) => {
                warn!("session storage unreadable, starting signed out: {}", e);
                SessionState::Anonymous
            }
        };

        Session {
            storage,
            state,
            last_error: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.state {
            SessionState::Authenticated(identity) => Some(identity),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }

    /// Message of the last failed login
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Identity as currently persisted (ignores malformed data)
    pub fn persisted_identity(&self) -> Option<Identity> {
        let raw = self.storage.get_item(SESSION_KEY).ok()??;
        serde_json::from_str(&raw).ok()
    }

    /// Validate the login form, then log in.
    ///
    /// A validation failure returns immediately without any network call.
    pub async fn submit(
        &mut self,
        client: &RecordServiceClient,
        form: &mut LoginForm,
    ) -> ApiResponse<Identity> {
        match form.validate() {
            Ok(credentials) => self.login(client, &credentials).await,
            Err(e) => ApiResponse::failure(e.message),
        }
    }

    /// Authenticate with the backend and store the returned identity.
    ///
    /// On any failure the session is left exactly as it was.
    pub async fn login(
        &mut self,
        client: &RecordServiceClient,
        credentials: &Credentials,
    ) -> ApiResponse<Identity> {
        self.last_error = None;

        let identity = match client.login(credentials).await.into_result(AUTH_FAILED_MESSAGE) {
            Ok(identity) => identity,
            Err(message) => return self.fail(message),
        };

        if identity.role != credentials.role() {
            warn!(
                "backend issued role {} for a {} login",
                identity.role,
                credentials.role()
            );
        }

        // Persist first: memory and storage must never disagree
        if let Err(e) = self.persist(&identity) {
            return self.fail(format!("Could not save session: {}", e));
        }

        info!("signed in {} as {}", credentials.principal(), identity.role);
        self.state = SessionState::Authenticated(identity.clone());
        ApiResponse::ok(identity)
    }

    /// Forget the identity in memory and in storage. No network call.
    pub fn logout(&mut self) {
        if let Some(identity) = self.identity() {
            info!("signing out {}", identity.name);
        }
        self.state = SessionState::Anonymous;
        self.last_error = None;
        if let Err(e) = self.storage.remove_item(SESSION_KEY) {
            warn!("could not clear stored session: {}", e);
        }
    }

    fn persist(&self, identity: &Identity) -> crate::error::Result<()> {
        let raw = serde_json::to_string(identity)?;
        self.storage.set_item(SESSION_KEY, &raw)
    }

    fn fail(&mut self, message: String) -> ApiResponse<Identity> {
        warn!("login failed: {}", message);
        let response = ApiResponse::failure(message);
        self.last_error = response.message.clone();
        response
    }
}
