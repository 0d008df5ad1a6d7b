//! Cart checkout.
//!
//! The cart is validated and converted to an [`OrderInput`] locally, posted
//! once, and cleared only after the API has accepted the order. A failed
//! request leaves the cart as it was so the customer can retry.

use thiserror::Error;
use tracing::{info, instrument, warn};

use bocado_core::UserId;
use bocado_core::cart::CartState;
use bocado_core::models::order::STATUS_PENDING;
use bocado_core::models::{Order, OrderInput, OrderItemInput};

use crate::api::{ApiClient, ApiError};
use crate::cart::{CartError, CartManager};
use crate::storage::KeyValueStore;

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("the cart is empty")]
    EmptyCart,

    #[error("the cart is not bound to a restaurant")]
    NoRestaurant,

    #[error("a delivery address is required")]
    MissingDeliveryAddress,

    #[error("a payment method is required")]
    MissingPaymentMethod,

    #[error("the cart total is too large to order")]
    TotalOverflow,

    #[error("order could not be placed: {0}")]
    Api(#[from] ApiError),

    #[error("order placed but the cart could not be cleared: {0}")]
    Cart(#[from] CartError),
}

/// Build the order creation request for a cart.
///
/// # Errors
///
/// Returns an error if the cart is empty, unbound, lacks a delivery address
/// or payment method, or its total is not representable.
pub fn order_input(cart: &CartState, customer_id: UserId) -> Result<OrderInput, CheckoutError> {
    if !cart.has_items() {
        return Err(CheckoutError::EmptyCart);
    }
    let restaurant = cart.restaurant.as_ref().ok_or(CheckoutError::NoRestaurant)?;
    let delivery_address = cart.delivery_address.trim();
    if delivery_address.is_empty() {
        return Err(CheckoutError::MissingDeliveryAddress);
    }
    let payment_method = cart.payment_method.trim();
    if payment_method.is_empty() {
        return Err(CheckoutError::MissingPaymentMethod);
    }

    if cart.checked_total().is_none() {
        return Err(CheckoutError::TotalOverflow);
    }
    let totals = cart.totals();
    Ok(OrderInput {
        customer_id,
        restaurant_id: restaurant.id,
        status: STATUS_PENDING.to_string(),
        delivery_address: delivery_address.to_string(),
        payment_method: payment_method.to_string(),
        subtotal: totals.subtotal,
        shipping_fee: totals.shipping_fee,
        total: totals.total,
        items: cart
            .items
            .iter()
            .map(|item| OrderItemInput {
                product_id: item.id,
                quantity: item.quantity,
                unit_price: item.price,
                notes: item.notes.clone(),
            })
            .collect(),
    })
}

/// Place an order for the cart's contents and clear the cart.
///
/// # Errors
///
/// Returns a validation error (see [`order_input`]) without contacting the
/// API, [`CheckoutError::Api`] if the order is rejected (the cart is left
/// untouched), or [`CheckoutError::Cart`] if the order was placed but the
/// cleared cart could not be persisted.
#[instrument(skip(client, cart))]
pub async fn checkout<S: KeyValueStore>(
    client: &ApiClient,
    cart: &mut CartManager<S>,
    customer_id: UserId,
) -> Result<Order, CheckoutError> {
    let order = order_input(cart.state(), customer_id)
        .inspect_err(|e| warn!(error = %e, "Cart is not ready for checkout"))?;

    let created = client.create_order(&order).await?;
    cart.clear_cart()?;

    info!(order_id = %created.id, total = %order.total, "Checkout complete");
    Ok(created)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bocado_core::cart::{LineItem, RestaurantBinding};
    use bocado_core::{Price, ProductId, RestaurantId};

    use super::*;

    fn ready_cart() -> CartState {
        CartState {
            items: vec![LineItem {
                id: ProductId::new(1),
                name: "Completo".to_string(),
                description: None,
                price: Price::from_whole(5000),
                quantity: 2,
                image: None,
                restaurant_id: RestaurantId::new(4),
                restaurant_name: Some("Fuente Alemana".to_string()),
                notes: "sin mayo".to_string(),
            }],
            restaurant: Some(RestaurantBinding {
                id: RestaurantId::new(4),
                name: Some("Fuente Alemana".to_string()),
            }),
            delivery_address: " Av. Providencia 1234 ".to_string(),
            payment_method: "tarjeta".to_string(),
        }
    }

    #[test]
    fn test_order_input_from_cart() {
        let order = order_input(&ready_cart(), UserId::new(9)).unwrap();
        assert_eq!(order.customer_id, UserId::new(9));
        assert_eq!(order.restaurant_id, RestaurantId::new(4));
        assert_eq!(order.status, "pendiente");
        assert_eq!(order.delivery_address, "Av. Providencia 1234");
        assert_eq!(order.subtotal, Price::from_whole(10_000));
        assert_eq!(order.shipping_fee, Price::from_whole(2000));
        assert_eq!(order.total, Price::from_whole(12_000));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items.first().unwrap().notes, "sin mayo");
    }

    #[test]
    fn test_order_input_validation() {
        let customer = UserId::new(9);

        assert!(matches!(
            order_input(&CartState::default(), customer),
            Err(CheckoutError::EmptyCart)
        ));

        let mut cart = ready_cart();
        cart.restaurant = None;
        assert!(matches!(
            order_input(&cart, customer),
            Err(CheckoutError::NoRestaurant)
        ));

        let mut cart = ready_cart();
        cart.delivery_address = "   ".to_string();
        assert!(matches!(
            order_input(&cart, customer),
            Err(CheckoutError::MissingDeliveryAddress)
        ));

        let mut cart = ready_cart();
        cart.payment_method.clear();
        assert!(matches!(
            order_input(&cart, customer),
            Err(CheckoutError::MissingPaymentMethod)
        ));

        let mut cart = ready_cart();
        if let Some(item) = cart.items.first_mut() {
            item.price = serde_json::from_str("\"79228162514264337593543950335\"").unwrap();
        }
        assert!(matches!(
            order_input(&cart, customer),
            Err(CheckoutError::TotalOverflow)
        ));
    }
}
