//! End-to-end customer flows: sign in, fill the cart from a menu, check out.
//!
//! Cart and session share one JSON state file, as they do in the CLI.
//!
//! ```bash
//! cargo test -p bocado-integration-tests --test checkout_flow
//! ```

#![allow(clippy::unwrap_used)]

use std::path::Path;

use bocado_client::services::{CheckoutError, checkout};
use bocado_client::{AddOutcome, AuthContext, CartManager, JsonFileStore, RouteGuard, SessionStore};
use bocado_core::models::{OrderInput, Product};
use bocado_core::{Price, ProductId, RestaurantId, Role, UserId};
use bocado_integration_tests::{MockApi, temp_state_file};

// =============================================================================
// Helpers
// =============================================================================

fn open_cart(path: &Path) -> CartManager<JsonFileStore> {
    CartManager::new(JsonFileStore::new(path)).unwrap()
}

fn open_sessions(path: &Path) -> SessionStore<JsonFileStore> {
    let mut sessions = SessionStore::new(JsonFileStore::new(path));
    sessions.restore().unwrap();
    sessions
}

async fn menu_item(mock: &MockApi, restaurant: i32, product: i32) -> Product {
    mock.client()
        .products_by_restaurant(RestaurantId::new(restaurant))
        .await
        .into_iter()
        .find(|p| p.id == ProductId::new(product))
        .unwrap()
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_places_order_and_clears_cart() {
    let mock = MockApi::spawn().await;
    let api = mock.client();
    let state = temp_state_file("checkout");

    let mut sessions = open_sessions(&state);
    let ana = api.get_user(UserId::new(1)).await.unwrap();
    sessions.sign_in(ana).unwrap();

    let mut cart = open_cart(&state);
    let completo = menu_item(&mock, 10, 100).await;
    let churrasco = menu_item(&mock, 10, 101).await;
    assert!(matches!(
        cart.add_item(&completo, 1).unwrap(),
        AddOutcome::Added { quantity: 1, .. }
    ));
    assert!(matches!(
        cart.add_item(&churrasco, 1).unwrap(),
        AddOutcome::Added { quantity: 1, .. }
    ));
    cart.update_notes(ProductId::new(100), "sin mayo").unwrap();
    cart.update_delivery_address("  Av. Providencia 1234 ").unwrap();
    cart.update_payment_method("efectivo").unwrap();

    // 11500 is above the free-shipping threshold
    assert_eq!(cart.subtotal(), Price::from_whole(11_500));
    assert_eq!(cart.shipping_fee(), Price::ZERO);

    let customer = sessions.user().unwrap().id;
    let order = checkout(&api, &mut cart, customer).await.unwrap();
    assert_eq!(order.status, "pendiente");
    assert_eq!(order.delivery_address.as_deref(), Some("Av. Providencia 1234"));

    let placed: OrderInput = serde_json::from_value(mock.orders().last().cloned().unwrap()).unwrap();
    assert_eq!(placed.customer_id, UserId::new(1));
    assert_eq!(placed.restaurant_id, RestaurantId::new(10));
    assert_eq!(placed.total, Price::from_whole(11_500));
    assert_eq!(placed.items.len(), 2);
    assert_eq!(placed.items.first().unwrap().notes, "sin mayo");

    assert!(!cart.has_items());
    assert!(cart.restaurant().is_none());

    // The cleared cart stays cleared after a reload, and the session survives
    let reloaded = open_cart(&state);
    assert!(!reloaded.has_items());
    assert!(reloaded.delivery_address().is_empty());
    assert!(open_sessions(&state).is_authenticated());
}

#[tokio::test]
async fn test_checkout_failure_keeps_cart() {
    let mock = MockApi::spawn().await;
    mock.reject_orders();
    let state = temp_state_file("checkout-rejected");

    let mut cart = open_cart(&state);
    let roll = menu_item(&mock, 11, 200).await;
    let _ = cart.add_item(&roll, 2).unwrap();
    cart.update_delivery_address("Los Leones 55").unwrap();
    cart.update_payment_method("tarjeta").unwrap();

    let err = checkout(&mock.client(), &mut cart, UserId::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Api(_)));
    assert!(err.to_string().contains("Pedidos deshabilitados"));

    assert!(mock.orders().iter().all(|o| o["id"] == 500));
    let reloaded = open_cart(&state);
    assert_eq!(reloaded.quantity_of(ProductId::new(200)), 2);
    assert_eq!(reloaded.payment_method(), "tarjeta");
}

#[tokio::test]
async fn test_incomplete_cart_never_reaches_api() {
    let mock = MockApi::spawn().await;
    let state = temp_state_file("checkout-incomplete");

    let mut cart = open_cart(&state);
    let err = checkout(&mock.client(), &mut cart, UserId::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));

    let roll = menu_item(&mock, 11, 200).await;
    let _ = cart.add_item(&roll, 1).unwrap();
    cart.update_delivery_address("   ").unwrap();
    let err = checkout(&mock.client(), &mut cart, UserId::new(1))
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::MissingDeliveryAddress));

    assert!(!mock.requests().iter().any(|r| r.starts_with("POST /orders")));
}

// =============================================================================
// Restaurant switch
// =============================================================================

#[tokio::test]
async fn test_switching_restaurant_requires_confirmation() {
    let mock = MockApi::spawn().await;
    let state = temp_state_file("switch");

    let mut cart = open_cart(&state);
    let completo = menu_item(&mock, 10, 100).await;
    let roll = menu_item(&mock, 11, 200).await;
    let _ = cart.add_item(&completo, 3).unwrap();

    let AddOutcome::NeedsConfirmation(pending) = cart.add_item(&roll, 1).unwrap() else {
        panic!("expected a confirmation request");
    };
    assert!(pending.prompt().contains("Fuente Alemana"));
    assert!(pending.prompt().contains("Sushi Ya"));

    // Declining: the cart on disk is untouched
    drop(pending);
    assert_eq!(open_cart(&state).quantity_of(ProductId::new(100)), 3);

    let AddOutcome::NeedsConfirmation(pending) = cart.add_item(&roll, 1).unwrap() else {
        panic!("expected a confirmation request");
    };
    cart.confirm_switch(pending).unwrap();

    let reloaded = open_cart(&state);
    assert_eq!(reloaded.total_items(), 1);
    assert_eq!(reloaded.restaurant().unwrap().id, RestaurantId::new(11));
}

// =============================================================================
// Session and navigation
// =============================================================================

#[tokio::test]
async fn test_vendor_session_and_route_guard() {
    let mock = MockApi::spawn().await;
    let api = mock.client();
    let state = temp_state_file("vendor");
    let guard = RouteGuard::default();

    let mut sessions = open_sessions(&state);
    let anonymous = guard.navigate("/mis-productos", &sessions).unwrap();
    assert_eq!(anonymous.path, "/login");

    let bruno = api.get_user(UserId::new(2)).await.unwrap();
    sessions.sign_in(bruno).unwrap();
    let restaurant = api
        .restaurants_by_user(UserId::new(2))
        .await
        .unwrap()
        .into_iter()
        .find(|r| r.is_owned_by(UserId::new(2)));
    sessions.set_restaurant(restaurant).unwrap();

    // A fresh process sees the same session
    let sessions = open_sessions(&state);
    assert_eq!(sessions.role(), Some(Role::Vendor));
    assert_eq!(
        sessions.session().unwrap().restaurant().unwrap().id,
        RestaurantId::new(10)
    );

    let allowed = guard.navigate("/mis-productos", &sessions).unwrap();
    assert_eq!(allowed.path, "/mis-productos");
    assert!(allowed.notices.is_empty());

    let denied = guard.navigate("/carrito", &sessions).unwrap();
    assert_eq!(denied.path, "/home");
    assert_eq!(denied.notices.len(), 1);
}
