use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::auth_state::AuthSession;
use crate::guards::GuardOutcome;
use crate::routes::{RouteTable, RouteTarget};

/// Aliases and guard redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Too many redirects ({limit}), last target {last}")]
    TooManyRedirects { limit: usize, last: String },

    #[error("No route for {0}")]
    NoRoute(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The view at `path` (including any query) was entered.
    Activated { path: String },
    Rejected { reason: NavigationError },
}

#[derive(Debug, Clone)]
pub struct Navigator {
    routes: RouteTable,
    session: Arc<AuthSession>,
    max_redirects: usize,
}

impl Navigator {
    pub fn new(routes: RouteTable, session: Arc<AuthSession>) -> Self {
        Self {
            routes,
            session,
            max_redirects: MAX_REDIRECTS,
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Resolve `url`, following aliases and guard redirects until a view
    /// activates.
    pub fn navigate(&self, url: &str) -> Navigation {
        let mut current = url.to_string();

        for _ in 0..=self.max_redirects {
            let next = match self.routes.resolve(&current) {
                None => {
                    return Navigation::Rejected {
                        reason: NavigationError::NoRoute(current),
                    };
                }
                Some(RouteTarget::Alias(to)) => to,
                Some(RouteTarget::Guarded(guard)) => {
                    match guard.can_activate(&self.session, &current) {
                        GuardOutcome::Allow => {
                            debug!("Activated {}", current);
                            return Navigation::Activated { path: current };
                        }
                        GuardOutcome::Redirect(to) => to,
                    }
                }
            };

            debug!("Navigation {} -> {}", current, next);
            current = next;
        }

        warn!("Gave up navigating to {} after {} redirects", url, self.max_redirects);
        Navigation::Rejected {
            reason: NavigationError::TooManyRedirects {
                limit: self.max_redirects,
                last: current,
            },
        }
    }
}
