//! Navigation guard.
//!
//! [`RouteGuard::check`] decides a single navigation; [`RouteGuard::navigate`]
//! follows redirects until a page is allowed.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

use super::routes::{Access, ROUTES, Route, find};
use crate::session::AuthContext;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where signed-in users without the required role are sent.
pub const FALLBACK_PATH: &str = "/home";

/// Notice shown when a signed-in user lacks the role a route requires.
pub const PERMISSION_DENIED: &str = "You do not have permission to access this section";

/// Redirect chains longer than this are treated as a loop.
const MAX_REDIRECTS: usize = 8;

/// Errors returned by [`RouteGuard::navigate`].
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("too many redirects starting at {0}")]
    TooManyRedirects(String),
}

/// Outcome of guarding one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Show the page. `matched` is the route pattern, or `None` for a path
    /// outside the route table.
    Allow {
        matched: Option<&'static str>,
        params: BTreeMap<String, String>,
    },
    /// Go somewhere else, optionally telling the user why.
    Redirect {
        to: &'static str,
        notice: Option<&'static str>,
    },
}

/// Final destination of a navigation after following redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landing {
    pub path: String,
    pub matched: Option<&'static str>,
    pub params: BTreeMap<String, String>,
    /// Notices raised along the way, in order.
    pub notices: Vec<&'static str>,
}

/// Guards navigation against a route table.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuard {
    routes: &'static [Route],
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(ROUTES)
    }
}

impl RouteGuard {
    /// Create a guard over a route table.
    #[must_use]
    pub const fn new(routes: &'static [Route]) -> Self {
        Self { routes }
    }

    /// The route table.
    #[must_use]
    pub const fn routes(&self) -> &'static [Route] {
        self.routes
    }

    /// Decide whether `path` may be shown to `auth`.
    pub fn check(&self, path: &str, auth: &impl AuthContext) -> Navigation {
        let Some((route, params)) = find(self.routes, path) else {
            debug!(path, "No route matched, allowing");
            return Navigation::Allow {
                matched: None,
                params: BTreeMap::new(),
            };
        };

        match route.access {
            Access::Public => Navigation::Allow {
                matched: Some(route.pattern),
                params,
            },
            Access::Redirect(to) => Navigation::Redirect { to, notice: None },
            Access::Role(required) => {
                if !auth.is_authenticated() {
                    info!(path, "Not signed in, redirecting to login");
                    return Navigation::Redirect {
                        to: LOGIN_PATH,
                        notice: None,
                    };
                }

                if auth.role() != Some(required) {
                    info!(path, required = %required, "Role required, redirecting");
                    return Navigation::Redirect {
                        to: FALLBACK_PATH,
                        notice: Some(PERMISSION_DENIED),
                    };
                }

                Navigation::Allow {
                    matched: Some(route.pattern),
                    params,
                }
            }
        }
    }

    /// Follow [`check`](Self::check) redirects from `path` until a page is
    /// allowed.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::TooManyRedirects`] if the route table redirects
    /// in a loop.
    pub fn navigate(&self, path: &str, auth: &impl AuthContext) -> Result<Landing, RouterError> {
        let mut current = path.to_string();
        let mut notices = Vec::new();

        for _ in 0..=MAX_REDIRECTS {
            match self.check(&current, auth) {
                Navigation::Allow { matched, params } => {
                    return Ok(Landing {
                        path: current,
                        matched,
                        params,
                        notices,
                    });
                }
                Navigation::Redirect { to, notice } => {
                    notices.extend(notice);
                    current = to.to_string();
                }
            }
        }

        Err(RouterError::TooManyRedirects(path.to_string()))
    }
}
