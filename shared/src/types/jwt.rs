use serde::{Deserialize, Serialize};

/// Claims embedded in every JWT issued by the server.
///
/// Claim names follow the identity conventions the browser client already
/// understands: `name` carries the username, `nameid` the numeric user id
/// and `RoleId` the numeric role id.  Ids travel as strings; the access
/// middleware parses them and skips anything that does not parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Username.  Keys the activity-timestamp update.
    pub name: String,

    /// Numeric user id (matches `users.id`), as a string.
    #[serde(rename = "nameid", default, skip_serializing_if = "Option::is_none")]
    pub name_identifier: Option<String>,

    /// Numeric role id (matches `roles.id`), as a string.
    /// Absent for accounts without a role assignment.
    #[serde(rename = "RoleId", default, skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,

    /// Standard JWT expiry (Unix timestamp, seconds).
    pub exp: usize,

    /// Issued-at (Unix timestamp, seconds).
    pub iat: usize,
}
