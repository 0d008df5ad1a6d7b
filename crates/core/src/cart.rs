//! Cart data types and derived totals.
//!
//! A cart holds line items from a single restaurant. The state types here are
//! plain data plus pure queries; the mutation rules (restaurant binding,
//! confirmation of restaurant switches, persistence) live in the client
//! crate's cart manager.

use serde::{Deserialize, Serialize};

use crate::models::Product;
use crate::types::{Price, ProductId, RestaurantId};

/// Subtotals strictly above this amount ship for free.
// TODO: confirm with the product owner whether the free-shipping tier is
// business policy or a placeholder value.
pub const FREE_SHIPPING_THRESHOLD: i64 = 10_000;

/// Flat shipping fee charged below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: i64 = 2_000;

/// Shipping fee for a subtotal.
///
/// Zero for an empty order, zero above [`FREE_SHIPPING_THRESHOLD`],
/// [`FLAT_SHIPPING_FEE`] otherwise (including exactly at the threshold).
#[must_use]
pub fn shipping_fee(subtotal: Price) -> Price {
    if subtotal.is_zero() || subtotal > Price::from_whole(FREE_SHIPPING_THRESHOLD) {
        Price::ZERO
    } else {
        Price::from_whole(FLAT_SHIPPING_FEE)
    }
}

/// One product entry in the cart with its chosen quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    /// Always at least 1 while the item is in the cart.
    pub quantity: u32,
    #[serde(default)]
    pub image: Option<String>,
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    #[serde(default)]
    pub notes: String,
}

impl LineItem {
    /// Create a line item for a product with an empty note.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            quantity,
            image: product.image.clone(),
            restaurant_id: product.restaurant_id,
            restaurant_name: product.restaurant_name.clone(),
            notes: String::new(),
        }
    }

    /// Price of the whole line (unit price × quantity), saturating.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.quantity
    }

    /// Price of the whole line, or `None` on overflow.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Price> {
        self.price.checked_mul(self.quantity)
    }
}

/// The restaurant a non-empty cart is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantBinding {
    pub id: RestaurantId,
    #[serde(default)]
    pub name: Option<String>,
}

impl RestaurantBinding {
    /// Binding for the restaurant that sells `product`.
    #[must_use]
    pub fn of(product: &Product) -> Self {
        Self {
            id: product.restaurant_id,
            name: product.restaurant_name.clone(),
        }
    }
}

/// Full cart state.
///
/// Invariant (maintained by the cart manager): every item shares the bound
/// restaurant's id, and an empty cart has no binding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Line items in insertion order.
    pub items: Vec<LineItem>,
    pub restaurant: Option<RestaurantBinding>,
    pub delivery_address: String,
    pub payment_method: String,
}

impl CartState {
    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of price × quantity over all items, saturating.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Subtotal plus shipping fee, or `None` if any step overflows.
    ///
    /// The cart manager refuses mutations for which this is `None`, so the
    /// saturating [`totals`](Self::totals) are exact for any cart it built.
    #[must_use]
    pub fn checked_total(&self) -> Option<Price> {
        let subtotal = self
            .items
            .iter()
            .try_fold(Price::ZERO, |sum, item| sum.checked_add(item.checked_line_total()?))?;
        subtotal.checked_add(shipping_fee(subtotal))
    }

    /// Returns `true` if the cart holds at least one item.
    #[must_use]
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    /// Quantity of a product in the cart, or 0 if absent.
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.item(id).map_or(0, |item| item.quantity)
    }

    /// Look up a line item by product id.
    #[must_use]
    pub fn item(&self, id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Mutable lookup of a line item by product id.
    pub fn item_mut(&mut self, id: ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Returns `true` if adding a product from `restaurant_id` would break the
    /// single-restaurant invariant.
    #[must_use]
    pub fn conflicts_with(&self, restaurant_id: RestaurantId) -> bool {
        self.has_items()
            && self
                .restaurant
                .as_ref()
                .is_none_or(|bound| bound.id != restaurant_id)
    }

    /// All derived totals at once.
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals::of(self)
    }
}

/// Derived cart totals. Never stored; recomputed from [`CartState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub total_items: u64,
    pub subtotal: Price,
    pub shipping_fee: Price,
    pub total: Price,
}

impl Totals {
    /// Compute totals for a cart.
    #[must_use]
    pub fn of(cart: &CartState) -> Self {
        let subtotal = cart.subtotal();
        let fee = shipping_fee(subtotal);
        Self {
            total_items: cart.total_items(),
            subtotal,
            shipping_fee: fee,
            total: subtotal + fee,
        }
    }
}
