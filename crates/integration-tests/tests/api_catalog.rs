//! Restaurant and product endpoints against the mock API.
//!
//! ```bash
//! cargo test -p bocado-integration-tests --test api_catalog
//! ```

#![allow(clippy::unwrap_used)]

use bocado_core::models::{ProductInput, RestaurantInput};
use bocado_core::{Price, ProductId, RestaurantId, UserId};
use bocado_integration_tests::MockApi;

// =============================================================================
// Restaurants
// =============================================================================

#[tokio::test]
async fn test_list_and_get_restaurants() {
    let mock = MockApi::spawn().await;
    let api = mock.client();

    let all = api.list_restaurants().await.unwrap();
    assert_eq!(all.len(), 2);

    let sushi = api.get_restaurant(RestaurantId::new(11)).await.unwrap();
    assert_eq!(sushi.name, "Sushi Ya");
    // Owner id arrives as the string "2"
    assert!(sushi.is_owned_by(UserId::new(2)));
    assert_eq!(
        sushi.image_url(mock.base_url()).as_deref(),
        Some("https://cdn.example.com/sushi.png")
    );

    let fuente = api.get_restaurant(RestaurantId::new(10)).await.unwrap();
    assert_eq!(
        fuente.image_url(mock.base_url()),
        Some(format!("{}/uploads/fuente.jpg", mock.base_url()))
    );
}

#[tokio::test]
async fn test_get_missing_restaurant_is_not_found() {
    let mock = MockApi::spawn().await;

    let err = mock
        .client()
        .get_restaurant(RestaurantId::new(404))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Restaurante no encontrado"));
}

#[tokio::test]
async fn test_search_encodes_query() {
    let mock = MockApi::spawn().await;

    let hits = mock.client().search_restaurants("sushi ya").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits.first().unwrap().id, RestaurantId::new(11));

    let requests = mock.requests();
    assert!(
        requests
            .iter()
            .any(|r| r == "GET /restaurants/search?q=sushi+ya"),
        "unexpected requests: {requests:?}"
    );
}

#[tokio::test]
async fn test_restaurants_by_user_without_restaurants_is_empty() {
    let mock = MockApi::spawn().await;
    let api = mock.client();

    let owned = api.restaurants_by_user(UserId::new(2)).await.unwrap();
    assert_eq!(owned.len(), 2);

    // The API answers 404 for a vendor with no restaurants
    let none = api.restaurants_by_user(UserId::new(4)).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_restaurant_create_update_delete() {
    let mock = MockApi::spawn().await;
    let api = mock.client();

    let created = api
        .create_restaurant(&RestaurantInput {
            name: Some("El Rápido".to_string()),
            category: Some("Completos".to_string()),
            owner_id: Some(UserId::new(4)),
            ..RestaurantInput::default()
        })
        .await
        .unwrap();
    assert_eq!(created.name, "El Rápido");
    assert!(created.is_owned_by(UserId::new(4)));

    let updated = api
        .update_restaurant(
            created.id,
            &RestaurantInput {
                phone: Some("+56 2 2345 6789".to_string()),
                ..RestaurantInput::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "El Rápido");
    assert_eq!(updated.phone.as_deref(), Some("+56 2 2345 6789"));

    // Empty body decodes as null
    let answer = api.delete_restaurant(created.id).await.unwrap();
    assert!(answer.is_null());
    assert!(
        api.get_restaurant(created.id)
            .await
            .unwrap_err()
            .is_not_found()
    );
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_menu_decodes_numeric_and_string_prices() {
    let mock = MockApi::spawn().await;

    let menu = mock
        .client()
        .products_by_restaurant(RestaurantId::new(10))
        .await;
    assert_eq!(menu.len(), 2);
    let prices: Vec<Price> = menu.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![Price::from_whole(5000), Price::from_whole(6500)]);
}

#[tokio::test]
async fn test_menu_failures_yield_empty_list() {
    let mock = MockApi::spawn().await;
    let api = mock.client();

    // 500 from the server
    assert!(
        api.products_by_restaurant(RestaurantId::new(999))
            .await
            .is_empty()
    );

    // An object where an array is expected
    mock.break_menu(10);
    assert!(
        api.products_by_restaurant(RestaurantId::new(10))
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_menu_with_unreachable_api_is_empty() {
    // Nothing listens on the discard port
    let api = bocado_client::ApiClient::new(
        &bocado_client::ApiConfig::new("http://127.0.0.1:9").unwrap(),
    );
    assert!(
        api.products_by_restaurant(RestaurantId::new(10))
            .await
            .is_empty()
    );
}

#[tokio::test]
async fn test_products_by_user_covers_owned_restaurants() {
    let mock = MockApi::spawn().await;
    let api = mock.client();

    let products = api.products_by_user(UserId::new(2)).await.unwrap();
    let ids: Vec<ProductId> = products.iter().map(|p| p.id).collect();
    assert_eq!(
        ids,
        vec![ProductId::new(100), ProductId::new(101), ProductId::new(200)]
    );

    assert!(mock.requests().contains(&"GET /products/user/2".to_string()));
}

#[tokio::test]
async fn test_product_create_update_delete() {
    let mock = MockApi::spawn().await;
    let api = mock.client();

    let created = api
        .create_product(&ProductInput {
            name: Some("Barros Luco".to_string()),
            price: Some(Price::from_whole(7200)),
            restaurant_id: Some(RestaurantId::new(10)),
            ..ProductInput::default()
        })
        .await
        .unwrap();
    assert_eq!(created.price, Price::from_whole(7200));
    assert_eq!(created.restaurant_id, RestaurantId::new(10));

    let updated = api
        .update_product(
            created.id,
            &ProductInput {
                price: Some(Price::from_whole(7500)),
                ..ProductInput::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Barros Luco");
    assert_eq!(updated.price, Price::from_whole(7500));

    let answer = api.delete_product(created.id).await.unwrap();
    assert_eq!(answer["deleted"], serde_json::json!(created.id.as_i32()));

    let err = api.delete_product(created.id).await.unwrap_err();
    assert!(err.is_not_found());
}
