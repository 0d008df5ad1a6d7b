//! Bocado Core - Shared types library.
//!
//! This crate provides the types shared by every Bocado component:
//! - `client` - Cart manager, session store, route guard and REST API client
//! - `cli` - Command-line front-end built on the client library
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails and roles
//! - [`models`] - Users, restaurants, products and orders as the REST API returns them
//! - [`cart`] - Cart line items, restaurant binding and derived totals

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod models;
pub mod types;

pub use types::*;
