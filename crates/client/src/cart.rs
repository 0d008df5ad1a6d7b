//! Cart state manager.
//!
//! [`CartManager`] owns the customer's cart: line items, the restaurant the
//! cart is bound to, the delivery address and the payment method. Every
//! mutation is written through to a [`KeyValueStore`] before the method
//! returns, then published to observers on a `tokio::sync::watch` channel.
//!
//! # Single-restaurant rule
//!
//! A non-empty cart only holds products from one restaurant. Adding a product
//! from another restaurant does not mutate anything; it returns
//! [`AddOutcome::NeedsConfirmation`] with a [`PendingSwitch`]. Passing that
//! value to [`CartManager::confirm_switch`] empties the cart and starts a new
//! one with the product. Dropping it leaves the cart as it was.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut cart = CartManager::new(MemoryStore::new())?;
//!
//! match cart.add_item(&product, 1)? {
//!     AddOutcome::NeedsConfirmation(pending) if user_agrees(&pending) => {
//!         cart.confirm_switch(pending)?;
//!     }
//!     _ => {}
//! }
//!
//! println!("{} items, total {}", cart.total_items(), cart.total());
//! ```

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use bocado_core::{Price, ProductId, RestaurantId};
use bocado_core::cart::{CartState, LineItem, RestaurantBinding, Totals};
use bocado_core::models::Product;

use crate::storage::{KeyValueStore, StorageError, keys, load_json, save_json};

/// Errors that can occur while mutating or loading the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// Reading or writing persisted cart state failed.
    #[error("cart storage error: {0}")]
    Storage(#[from] StorageError),

    /// The product's quantity would not fit in a line item. Nothing changed.
    #[error("quantity of product {product_id} is too large")]
    QuantityOverflow { product_id: ProductId },

    /// The cart total would exceed the largest representable amount.
    /// Nothing changed.
    #[error("cart total is too large")]
    TotalOverflow,

    /// Persisted line items belong to more than one restaurant.
    #[error("stored cart mixes items from restaurants {first} and {other}")]
    MixedRestaurants {
        first: RestaurantId,
        other: RestaurantId,
    },
}

/// Result of [`CartManager::add_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum AddOutcome {
    /// The product is in the cart with the given total quantity.
    Added {
        product_id: ProductId,
        quantity: u32,
    },
    /// The product belongs to a different restaurant than the cart. Nothing
    /// changed; confirm with [`CartManager::confirm_switch`] or drop it.
    NeedsConfirmation(PendingSwitch),
    /// A zero quantity was requested. Nothing changed.
    Unchanged,
}

/// An add that conflicts with the cart's restaurant and awaits confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSwitch {
    product: Product,
    quantity: u32,
    current: Option<RestaurantBinding>,
}

impl PendingSwitch {
    /// The product that was being added.
    #[must_use]
    pub const fn product(&self) -> &Product {
        &self.product
    }

    /// The requested quantity.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The restaurant the cart was bound to when the add was attempted.
    #[must_use]
    pub const fn current_restaurant(&self) -> Option<&RestaurantBinding> {
        self.current.as_ref()
    }

    /// Text for a confirmation prompt.
    #[must_use]
    pub fn prompt(&self) -> String {
        let current = self
            .current
            .as_ref()
            .and_then(|r| r.name.as_deref())
            .unwrap_or("another restaurant");
        let requested = self
            .product
            .restaurant_name
            .as_deref()
            .unwrap_or("this restaurant");
        format!(
            "Your cart has items from {current}. Empty it and add {} from {requested}?",
            self.product.name
        )
    }
}

/// Owner of the cart state.
///
/// Construct one per store with [`CartManager::new`]; share it by reference.
/// Mutators take `&mut self`, so there is always exactly one writer.
pub struct CartManager<S> {
    store: S,
    state: CartState,
    notifier: watch::Sender<CartState>,
}

impl<S> std::fmt::Debug for CartManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> CartManager<S> {
    /// Create a manager over `store` and rehydrate any persisted cart.
    ///
    /// # Errors
    ///
    /// Returns an error if persisted state exists but cannot be read.
    pub fn new(store: S) -> Result<Self, CartError> {
        let (notifier, _) = watch::channel(CartState::default());
        let mut manager = Self {
            store,
            state: CartState::default(),
            notifier,
        };
        manager.initialize()?;
        Ok(manager)
    }

    /// Reload each of the four persisted entries that is present. Entries
    /// that are absent keep their current in-memory value.
    ///
    /// The restaurant binding is re-derived from the items when the stored
    /// one is missing or points elsewhere, and dropped for an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Corrupt`] (wrapped) if a stored value is
    /// malformed, or [`CartError::MixedRestaurants`] if the stored items come
    /// from several restaurants. The in-memory state is unchanged on error.
    pub fn initialize(&mut self) -> Result<(), CartError> {
        let mut next = self.state.clone();
        if let Some(items) = load_json::<Vec<LineItem>>(&self.store, keys::CART_ITEMS)? {
            next.items = items;
        }
        if let Some(restaurant) =
            load_json::<Option<RestaurantBinding>>(&self.store, keys::ACTIVE_RESTAURANT)?
        {
            next.restaurant = restaurant;
        }
        if let Some(address) = self.store.get(keys::DELIVERY_ADDRESS)? {
            next.delivery_address = address;
        }
        if let Some(method) = self.store.get(keys::PAYMENT_METHOD)? {
            next.payment_method = method;
        }
        reconcile_binding(&mut next)?;
        self.state = next;

        debug!(items = self.state.items.len(), "Cart initialized");
        self.notify();
        Ok(())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of a product.
    ///
    /// Binds an empty cart to the product's restaurant. Increments the
    /// quantity of an existing line, otherwise appends a new one. If the cart
    /// holds items from another restaurant, returns
    /// [`AddOutcome::NeedsConfirmation`] without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] or [`CartError::TotalOverflow`]
    /// (without changing anything) if the result is not representable, or an
    /// error if the new state cannot be persisted.
    #[instrument(skip(self, product), fields(product_id = %product.id, restaurant_id = %product.restaurant_id))]
    pub fn add_item(&mut self, product: &Product, quantity: u32) -> Result<AddOutcome, CartError> {
        if quantity == 0 {
            return Ok(AddOutcome::Unchanged);
        }

        if self.state.conflicts_with(product.restaurant_id) {
            debug!("Product belongs to another restaurant, confirmation required");
            return Ok(AddOutcome::NeedsConfirmation(PendingSwitch {
                product: product.clone(),
                quantity,
                current: self.state.restaurant.clone(),
            }));
        }

        self.insert(self.state.clone(), product, quantity)
    }

    /// Apply a confirmed restaurant switch: empty the cart (including address
    /// and payment method) and add the pending product.
    ///
    /// If the cart no longer conflicts with the product's restaurant (it was
    /// emptied or switched in the meantime), this is a plain add.
    ///
    /// # Errors
    ///
    /// Same as [`add_item`](Self::add_item). On error the cart is not emptied.
    #[instrument(skip(self, pending), fields(product_id = %pending.product.id))]
    pub fn confirm_switch(&mut self, pending: PendingSwitch) -> Result<AddOutcome, CartError> {
        let next = if self.state.conflicts_with(pending.product.restaurant_id) {
            debug!("Emptying cart to switch restaurant");
            CartState::default()
        } else {
            self.state.clone()
        };
        self.insert(next, &pending.product, pending.quantity)
    }

    fn insert(
        &mut self,
        mut next: CartState,
        product: &Product,
        quantity: u32,
    ) -> Result<AddOutcome, CartError> {
        if !next.has_items() {
            next.restaurant = Some(RestaurantBinding::of(product));
        }

        let quantity = if let Some(item) = next.item_mut(product.id) {
            item.quantity = item
                .quantity
                .checked_add(quantity)
                .ok_or(CartError::QuantityOverflow {
                    product_id: product.id,
                })?;
            item.quantity
        } else {
            next.items.push(LineItem::from_product(product, quantity));
            quantity
        };

        self.replace(next)?;
        Ok(AddOutcome::Added {
            product_id: product.id,
            quantity,
        })
    }

    /// Remove a line item. Clears the restaurant binding when the cart
    /// becomes empty.
    ///
    /// Returns `false` (and writes nothing) if the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: ProductId) -> Result<bool, CartError> {
        let Some(index) = self.state.items.iter().position(|item| item.id == id) else {
            return Ok(false);
        };

        self.state.items.remove(index);
        if self.state.items.is_empty() {
            self.state.restaurant = None;
        }

        self.commit()?;
        Ok(true)
    }

    /// Set the quantity of a line item exactly. A quantity of 0 removes it.
    ///
    /// Returns `false` (and writes nothing) if the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] (without changing anything) if
    /// the new total is not representable, or an error if the new state
    /// cannot be persisted.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) -> Result<bool, CartError> {
        if quantity < 1 {
            return self.remove_item(id);
        }

        let mut next = self.state.clone();
        let Some(item) = next.item_mut(id) else {
            return Ok(false);
        };
        item.quantity = quantity;

        self.replace(next)?;
        Ok(true)
    }

    /// Set the free-text note of a line item.
    ///
    /// Returns `false` (and writes nothing) if the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    #[instrument(skip(self, notes))]
    pub fn update_notes(&mut self, id: ProductId, notes: &str) -> Result<bool, CartError> {
        let Some(item) = self.state.item_mut(id) else {
            return Ok(false);
        };
        notes.clone_into(&mut item.notes);

        self.commit()?;
        Ok(true)
    }

    /// Set the delivery address.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn update_delivery_address(&mut self, address: &str) -> Result<(), CartError> {
        address.clone_into(&mut self.state.delivery_address);
        self.commit()
    }

    /// Set the payment method.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    pub fn update_payment_method(&mut self, method: &str) -> Result<(), CartError> {
        method.clone_into(&mut self.state.payment_method);
        self.commit()
    }

    /// Reset every field to empty and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new state cannot be persisted.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) -> Result<(), CartError> {
        self.state = CartState::default();
        self.commit()
    }

    /// Adopt `next` if its total is representable, then persist it.
    fn replace(&mut self, next: CartState) -> Result<(), CartError> {
        if next.checked_total().is_none() {
            warn!("Cart total would overflow, change refused");
            return Err(CartError::TotalOverflow);
        }
        self.state = next;
        self.commit()
    }

    /// Write all four entries, then notify observers.
    fn commit(&mut self) -> Result<(), CartError> {
        save_json(&mut self.store, keys::CART_ITEMS, &self.state.items)?;
        save_json(&mut self.store, keys::ACTIVE_RESTAURANT, &self.state.restaurant)?;
        self.store
            .set(keys::DELIVERY_ADDRESS, &self.state.delivery_address)?;
        self.store
            .set(keys::PAYMENT_METHOD, &self.state.payment_method)?;

        debug!(
            items = self.state.items.len(),
            total_items = self.state.total_items(),
            "Cart persisted"
        );
        self.notify();
        Ok(())
    }

    fn notify(&self) {
        self.notifier.send_replace(self.state.clone());
    }
}

/// Restore the single-restaurant invariant on rehydrated state.
fn reconcile_binding(state: &mut CartState) -> Result<(), CartError> {
    let Some(first) = state.items.first() else {
        state.restaurant = None;
        return Ok(());
    };

    let restaurant_id = first.restaurant_id;
    if let Some(stray) = state
        .items
        .iter()
        .find(|item| item.restaurant_id != restaurant_id)
    {
        return Err(CartError::MixedRestaurants {
            first: restaurant_id,
            other: stray.restaurant_id,
        });
    }

    if state
        .restaurant
        .as_ref()
        .is_none_or(|bound| bound.id != restaurant_id)
    {
        warn!(restaurant_id = %restaurant_id, "Stored restaurant binding does not match items, rebinding");
        state.restaurant = Some(RestaurantBinding {
            id: restaurant_id,
            name: first.restaurant_name.clone(),
        });
    }
    Ok(())
}

impl<S> CartManager<S> {
    // =========================================================================
    // Derived getters
    // =========================================================================

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.state.total_items()
    }

    /// Sum of price × quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.state.subtotal()
    }

    /// Shipping fee for the current subtotal.
    #[must_use]
    pub fn shipping_fee(&self) -> Price {
        self.totals().shipping_fee
    }

    /// Subtotal plus shipping fee.
    #[must_use]
    pub fn total(&self) -> Price {
        self.totals().total
    }

    /// All derived totals.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.state.totals()
    }

    /// Returns `true` if the cart holds at least one item.
    #[must_use]
    pub fn has_items(&self) -> bool {
        self.state.has_items()
    }

    /// Quantity of a product in the cart, or 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.state.quantity_of(id)
    }

    // =========================================================================
    // State access
    // =========================================================================

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.state.items
    }

    /// The restaurant the cart is bound to, if any.
    #[must_use]
    pub const fn restaurant(&self) -> Option<&RestaurantBinding> {
        self.state.restaurant.as_ref()
    }

    /// Current delivery address (empty if unset).
    #[must_use]
    pub fn delivery_address(&self) -> &str {
        &self.state.delivery_address
    }

    /// Current payment method (empty if unset).
    #[must_use]
    pub fn payment_method(&self) -> &str {
        &self.state.payment_method
    }

    /// The full cart state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the manager and return its store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Subscribe to cart changes. The receiver always holds the latest state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.notifier.subscribe()
    }
}
