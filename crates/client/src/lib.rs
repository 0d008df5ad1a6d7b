//! Bocado Client - cart, session, routing and REST API access.
//!
//! This crate holds everything a Bocado front-end needs besides rendering:
//!
//! - [`cart`] - Cart manager enforcing one restaurant per cart, with
//!   synchronous persistence and change notifications
//! - [`session`] - Signed-in user state and the [`AuthContext`](session::AuthContext)
//!   consumed by the router
//! - [`router`] - Route table and role-based navigation guard
//! - [`api`] - Typed client for the Bocado REST API
//! - [`services`] - Checkout and other workflows spanning cart and API
//! - [`storage`] - Key-value persistence (in memory or a JSON file)
//! - [`config`] - Environment-based configuration
//!
//! # Architecture
//!
//! Local state (cart and session) is never touched by API calls; callers
//! fetch data through [`api::ApiClient`] and feed it to the cart manager.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod config;
pub mod router;
pub mod services;
pub mod session;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use cart::{AddOutcome, CartError, CartManager, PendingSwitch};
pub use config::{ApiConfig, ClientConfig, ConfigError};
pub use router::{Navigation, RouteGuard};
pub use session::{AuthContext, Session, SessionError, SessionStore};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};
