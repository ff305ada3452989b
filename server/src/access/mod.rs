//! Identity and access resolution.
//!
//! - [`Principal`]: the authenticated identity lifted out of a verified JWT.
//! - [`AccessControlService`]: answers "is this a super-admin" and "which
//!   project does this user belong to".
//! - [`ActivityStore`]: best-effort sink for "last seen" timestamps.
//! - [`TokenKeys`]: JWT signing and verification.

pub mod activity;
pub mod principal;
pub mod service;
pub mod token;

pub use activity::{ActivityStore, SqlActivityStore};
pub use principal::Principal;
pub use service::{AccessControlService, SqlAccessControl, resolve_context};
pub use token::TokenKeys;
