//! ITAMS navigation client.
//!
//! Mirrors the server's area policy for navigation: a super-admin lands in
//! `/admin/*`, everyone else in `/user/*`, anonymous callers at `/login`.
//! Nothing here is a security boundary; the server rejects whatever these
//! guards let through.

pub mod auth_state;
pub mod guards;
pub mod navigator;
pub mod routes;

pub use auth_state::AuthSession;
pub use guards::{AdminGuard, AuthGuard, GuardOutcome, LoginGuard, RouteGuard, UserGuard};
pub use navigator::{Navigation, NavigationError, Navigator};
pub use routes::{RouteTable, RouteTarget};
