//! User, courier and order endpoints against the mock API.
//!
//! ```bash
//! cargo test -p bocado-integration-tests --test api_people
//! ```

#![allow(clippy::unwrap_used)]

use bocado_client::ApiError;
use bocado_core::models::UserInput;
use bocado_core::{Email, OrderId, Role, UserId};
use bocado_integration_tests::MockApi;

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_list_users_unwraps_envelope() {
    let mock = MockApi::spawn().await;

    let users = mock.client().list_users().await.unwrap();
    assert_eq!(users.len(), 4);
    assert_eq!(users.first().unwrap().role, Role::Customer);
}

#[tokio::test]
async fn test_get_user_and_missing_user() {
    let mock = MockApi::spawn().await;
    let api = mock.client();

    let carla = api.get_user(UserId::new(3)).await.unwrap();
    assert_eq!(carla.name, "Carla");
    assert_eq!(carla.role, Role::Courier);

    let err = api.get_user(UserId::new(77)).await.unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Usuario no encontrado");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

fn registration(email: &str) -> UserInput {
    UserInput {
        name: "Elena".to_string(),
        email: Email::parse(email).unwrap(),
        password: "secreto".to_string(),
        role: Role::Customer,
        phone: None,
        address: Some("Los Leones 55".to_string()),
    }
}

#[tokio::test]
async fn test_create_user() {
    let mock = MockApi::spawn().await;

    let user = mock
        .client()
        .create_user(&registration("elena@example.com"))
        .await
        .unwrap();
    assert_eq!(user.name, "Elena");
    assert_eq!(user.address.as_deref(), Some("Los Leones 55"));
}

#[tokio::test]
async fn test_create_user_rejected_by_envelope() {
    let mock = MockApi::spawn().await;

    let err = mock
        .client()
        .create_user(&registration("ana@example.com"))
        .await
        .unwrap_err();
    match err {
        ApiError::Rejected(message) => assert_eq!(message, "Email ya registrado"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

// =============================================================================
// Couriers
// =============================================================================

#[tokio::test]
async fn test_list_drivers_filters_by_role() {
    let mock = MockApi::spawn().await;

    let drivers = mock.client().list_drivers().await.unwrap();
    assert_eq!(drivers.len(), 1);
    assert_eq!(drivers.first().unwrap().id, UserId::new(3));
    assert!(mock.requests().contains(&"GET /users?rol=repartidor".to_string()));
}

#[tokio::test]
async fn test_get_driver_sends_role() {
    let mock = MockApi::spawn().await;

    let driver = mock.client().get_driver(UserId::new(3)).await.unwrap();
    assert_eq!(driver.phone.as_deref(), Some("+56 9 1234 5678"));
    assert!(
        mock.requests()
            .contains(&"GET /users/3?rol=repartidor".to_string())
    );
}

#[tokio::test]
async fn test_driver_orders_and_status_update() {
    let mock = MockApi::spawn().await;
    let api = mock.client();

    let orders = api.driver_orders(UserId::new(3)).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert!(api.driver_orders(UserId::new(1)).await.unwrap().is_empty());

    let updated = api
        .update_order_status(OrderId::new(500), "entregado")
        .await
        .unwrap();
    assert_eq!(updated.status, "entregado");
    assert_eq!(updated.items.len(), 1);
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_get_order_expands_relations() {
    let mock = MockApi::spawn().await;

    let order = mock.client().get_order(OrderId::new(500)).await.unwrap();
    assert_eq!(order.customer_id, Some(UserId::new(1)));
    assert_eq!(order.courier_id, Some(UserId::new(3)));

    let requests = mock.requests();
    assert!(
        requests
            .iter()
            .any(|r| r == "GET /orders/500?_expand=usuario%2CorderItems.producto"),
        "unexpected requests: {requests:?}"
    );
}

#[tokio::test]
async fn test_rate_order() {
    let mock = MockApi::spawn().await;
    let api = mock.client();

    let answer = api
        .rate_order(OrderId::new(500), 5, "Llegó caliente")
        .await
        .unwrap();
    assert_eq!(answer["success"], serde_json::json!(true));

    let ratings = mock.ratings();
    assert_eq!(
        ratings,
        vec![serde_json::json!({"rating": 5, "comment": "Llegó caliente", "orderId": 500})]
    );

    let err = api.rate_order(OrderId::new(1), 3, "").await.unwrap_err();
    assert!(err.is_not_found());
}
