//! Role-based route guarding.
//!
//! The route table in [`routes`] maps paths to the role allowed to see them;
//! [`RouteGuard`] checks a navigation target against the current
//! [`AuthContext`](crate::session::AuthContext) and either allows it or
//! redirects.

pub mod guard;
pub mod routes;

pub use guard::{
    FALLBACK_PATH, LOGIN_PATH, Landing, Navigation, PERMISSION_DENIED, RouteGuard, RouterError,
};
pub use routes::{Access, ROUTES, Route};
