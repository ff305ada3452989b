/// Tower middleware module
///
/// Layers, outermost first:
/// - request timeout
/// - authentication (token → `Principal`)
/// - activity timestamp
/// - access context (`Principal` → `AccessContext`)
pub mod tower_access_context;
pub mod tower_activity;
pub mod tower_authentication;
pub mod tower_timeout_handler;

pub use tower_access_context::{AccessContextLayer, AccessContextService, is_bypassed};
pub use tower_activity::{ActivityLayer, ActivityService};
pub use tower_authentication::{AuthenticationLayer, AuthenticationService};
pub use tower_timeout_handler::{TimeoutLayer, TimeoutService};
