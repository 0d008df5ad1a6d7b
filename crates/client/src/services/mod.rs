//! Workflows that combine local state with the REST API.
//!
//! # Services
//!
//! - `checkout` - Turn the cart into an order and clear it on success

pub mod checkout;

pub use checkout::{CheckoutError, checkout, order_input};
