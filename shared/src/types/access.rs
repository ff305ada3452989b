use serde::{Deserialize, Serialize};

use crate::policy::Role;

/// Per-request access context published by the access middleware.
///
/// Every field is independently optional: a field is `None` when the claim
/// it derives from was missing or did not parse.  The context itself is
/// always present on requests that went through the middleware, so handlers
/// can tell "anonymous" (`user_id == None`) apart from "not processed"
/// (no context in the extensions at all).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessContext {
    pub user_id: Option<i64>,
    pub role_id: Option<i64>,
    pub is_super_admin: Option<bool>,
    pub project_id: Option<i64>,
}

impl AccessContext {
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Role classification.  A missing super-admin flag classifies as a
    /// regular user.
    pub fn role(&self) -> Role {
        Role::from_super_admin(self.is_super_admin.unwrap_or(false))
    }
}

/// Body of `GET /api/session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub context: AccessContext,
    pub home: String,
}

impl SessionView {
    pub fn from_context(context: AccessContext) -> Self {
        let home = context.role().home_route().to_string();
        Self { context, home }
    }
}
