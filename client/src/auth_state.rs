use std::sync::RwLock;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use shared::policy::Role;
use shared::types::{ErrorBody, SessionView};

/// Client-side view of who is signed in.
///
/// The authenticated flag is a watch channel so views can react to sign-in
/// and sign-out; the role is a plain value read synchronously by the guards.
#[derive(Debug)]
pub struct AuthSession {
    authenticated: watch::Sender<bool>,
    role: RwLock<Option<Role>>,
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthSession {
    pub fn new() -> Self {
        let (authenticated, _) = watch::channel(false);
        Self {
            authenticated,
            role: RwLock::new(None),
        }
    }

    /// Record a successful login.  The role is stored before the signal
    /// flips so subscribers never see `true` with a stale role.
    pub fn sign_in(&self, role: Role) {
        self.set_role(Some(role));
        self.authenticated.send_replace(true);
        info!("Signed in as {:?}", role);
    }

    pub fn sign_out(&self) {
        self.authenticated.send_replace(false);
        self.set_role(None);
        info!("Signed out");
    }

    /// Seed the session from a `GET /api/session` body after a reload.
    pub fn restore(&self, view: &SessionView) {
        if view.context.is_authenticated() {
            self.sign_in(view.context.role());
        } else {
            self.sign_out();
        }
    }

    /// [`AuthSession::restore`] from the raw response body.
    pub fn restore_from_json(&self, body: &str) -> Result<(), serde_json::Error> {
        let view: SessionView = serde_json::from_str(body)?;
        debug!("Restoring session for user {:?}", view.context.user_id);
        self.restore(&view);
        Ok(())
    }

    /// Inspect an API error body; an access-denied code means the server no
    /// longer honours this session, so drop it.  Returns whether it did.
    pub fn observe_error_json(&self, body: &str) -> Result<bool, serde_json::Error> {
        let error: ErrorBody = serde_json::from_str(body)?;
        if !error.is_access_denied() {
            return Ok(false);
        }
        warn!("Server refused session ({}): {}", error.code, error.message);
        self.sign_out();
        Ok(true)
    }

    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.borrow()
    }

    pub fn role(&self) -> Option<Role> {
        *self.role.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Missing role reads as a regular user.
    pub fn is_super_admin(&self) -> bool {
        self.role().is_some_and(Role::is_super_admin)
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    fn set_role(&self, role: Option<Role>) {
        *self.role.write().unwrap_or_else(|e| e.into_inner()) = role;
    }
}
