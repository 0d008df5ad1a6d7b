//! Integration tests for Bocado.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bocado-integration-tests
//! ```
//!
//! No external services are needed: [`MockApi::spawn`] serves an in-memory
//! imitation of the Bocado REST API on an ephemeral local port, seeded with a
//! few users, restaurants, products and one order.
//!
//! # Seed data
//!
//! | id  | kind       | notes                                      |
//! |-----|------------|--------------------------------------------|
//! | 1   | user       | Ana, `cliente`                             |
//! | 2   | user       | Bruno, `vendedor`, owns restaurants 10, 11 |
//! | 3   | user       | Carla, `repartidor`                        |
//! | 4   | user       | Diego, `vendedor`, owns nothing            |
//! | 10  | restaurant | Fuente Alemana                             |
//! | 11  | restaurant | Sushi Ya (owner id sent as a string)       |
//! | 100 | product    | Completo, 5000, restaurant 10              |
//! | 101 | product    | Churrasco, 6500, restaurant 10             |
//! | 200 | product    | Roll Acevichado, 7000, restaurant 11       |
//! | 500 | order      | Ana's order, assigned to Carla             |

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, Query, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value, json};

use bocado_client::{ApiClient, ApiConfig};

type Params = Query<BTreeMap<String, String>>;

/// Mutable state behind the mock API.
#[derive(Debug, Default)]
struct MockState {
    users: Vec<Value>,
    restaurants: Vec<Value>,
    products: Vec<Value>,
    orders: Vec<Value>,
    ratings: Vec<Value>,
    /// `METHOD /path?query` of every request, in arrival order.
    requests: Vec<String>,
    /// Restaurants whose menu endpoint answers with an object.
    broken_menus: HashSet<i64>,
    /// Answer `POST /orders` with 503.
    reject_orders: bool,
    next_id: i64,
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// A running mock API.
#[derive(Debug, Clone)]
pub struct MockApi {
    base_url: String,
    state: Shared,
}

impl MockApi {
    /// Start a seeded mock API on `127.0.0.1` with an ephemeral port.
    ///
    /// The server runs on the current tokio runtime and stops with it.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn spawn() -> Self {
        let state: Shared = Arc::new(Mutex::new(seed()));
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API");
        let addr = listener.local_addr().expect("Failed to read mock API address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock API server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Base URL of the server.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// An API client pointed at this server.
    ///
    /// # Panics
    ///
    /// Panics if the base URL is rejected, which would be a bug in the mock.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&ApiConfig::new(&self.base_url).expect("Mock base URL is valid"))
    }

    /// Requests received so far, as `METHOD /path?query`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.state).requests.clone()
    }

    /// Orders currently stored.
    #[must_use]
    pub fn orders(&self) -> Vec<Value> {
        lock(&self.state).orders.clone()
    }

    /// Ratings received so far, each with its `orderId`.
    #[must_use]
    pub fn ratings(&self) -> Vec<Value> {
        lock(&self.state).ratings.clone()
    }

    /// Make the menu of `restaurant_id` answer with a JSON object.
    pub fn break_menu(&self, restaurant_id: i64) {
        lock(&self.state).broken_menus.insert(restaurant_id);
    }

    /// Make order creation fail with 503.
    pub fn reject_orders(&self) {
        lock(&self.state).reject_orders = true;
    }
}

/// A fresh state file path under the system temp directory.
///
/// The file does not exist yet; each call returns a distinct path.
#[must_use]
pub fn temp_state_file(name: &str) -> PathBuf {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir()
        .join(format!("bocado-it-{}-{n}", std::process::id()))
        .join(format!("{name}.json"))
}

fn seed() -> MockState {
    MockState {
        users: vec![
            json!({"id": 1, "nombre": "Ana", "email": "ana@example.com", "password": "x", "rol": "cliente", "direccion": "Av. Providencia 1234"}),
            json!({"id": 2, "nombre": "Bruno", "email": "bruno@example.com", "password": "x", "rol": "vendedor"}),
            json!({"id": 3, "nombre": "Carla", "email": "carla@example.com", "password": "x", "rol": "repartidor", "telefono": "+56 9 1234 5678"}),
            json!({"id": 4, "nombre": "Diego", "email": "diego@example.com", "password": "x", "rol": "vendedor"}),
        ],
        restaurants: vec![
            json!({"id": 10, "nombre": "Fuente Alemana", "categoria": "Sandwiches", "imagen": "fuente.jpg", "idUsuario": 2}),
            json!({"id": 11, "nombre": "Sushi Ya", "categoria": "Sushi", "imagen": "https://cdn.example.com/sushi.png", "idUsuario": "2"}),
        ],
        products: vec![
            json!({"id": 100, "nombre": "Completo", "precio": 5000, "restauranteId": 10, "restauranteNombre": "Fuente Alemana"}),
            json!({"id": 101, "nombre": "Churrasco", "precio": "6500", "restauranteId": 10, "restauranteNombre": "Fuente Alemana"}),
            json!({"id": 200, "nombre": "Roll Acevichado", "precio": 7000, "restauranteId": 11, "restauranteNombre": "Sushi Ya"}),
        ],
        orders: vec![json!({
            "id": 500,
            "usuarioId": 1,
            "restauranteId": 10,
            "repartidorId": 3,
            "estado": "en camino",
            "total": 12000,
            "orderItems": [{"productoId": 100, "cantidad": 2, "precio": 5000}],
        })],
        next_id: 1000,
        ..MockState::default()
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/restaurants", get(list_restaurants).post(create_restaurant))
        .route("/restaurants/search", get(search_restaurants))
        .route("/restaurants/usuario/{id}", get(restaurants_by_user))
        .route(
            "/restaurants/{id}",
            get(get_restaurant)
                .patch(update_restaurant)
                .delete(delete_restaurant),
        )
        .route("/products", post(create_product))
        .route("/products/restaurant/{id}", get(products_by_restaurant))
        .route("/products/user/{id}", get(products_by_user))
        .route(
            "/products/{id}",
            axum::routing::patch(update_product).delete(delete_product),
        )
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order).patch(update_order))
        .route("/orders/{id}/rate", post(rate_order))
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .with_state(state)
}

async fn record_request(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri());
    lock(&state).requests.push(line);
    next.run(request).await
}

// =============================================================================
// Helpers
// =============================================================================

fn id_of(value: &Value, field: &str) -> Option<i64> {
    match value.get(field)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn find(items: &[Value], id: i64) -> Option<&Value> {
    items.iter().find(|item| id_of(item, "id") == Some(id))
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
}

fn merge(target: &mut Value, patch: Value) {
    if let (Some(target), Value::Object(patch)) = (target.as_object_mut(), patch) {
        target.extend(patch);
    }
}

fn insert_new(state: &mut MockState, body: Value) -> Value {
    state.next_id += 1;
    let mut fields = match body {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };
    fields.insert("id".to_string(), json!(state.next_id));
    Value::Object(fields)
}

fn without_password(user: &Value) -> Value {
    let mut user = user.clone();
    if let Some(fields) = user.as_object_mut() {
        fields.remove("password");
    }
    user
}

// =============================================================================
// Users (envelope responses)
// =============================================================================

async fn list_users(State(state): State<Shared>, Query(params): Params) -> Json<Value> {
    let state = lock(&state);
    let users: Vec<Value> = state
        .users
        .iter()
        .filter(|u| params.get("rol").is_none_or(|rol| u["rol"] == json!(rol)))
        .map(without_password)
        .collect();
    Json(json!({ "success": true, "data": users }))
}

async fn get_user(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = lock(&state);
    match find(&state.users, id) {
        Some(user) => Json(without_password(user)).into_response(),
        None => not_found("Usuario no encontrado"),
    }
}

async fn create_user(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    if state.users.iter().any(|u| u["email"] == body["email"]) {
        return (
            StatusCode::OK,
            Json(json!({ "success": false, "message": "Email ya registrado" })),
        )
            .into_response();
    }
    let user = insert_new(&mut state, body);
    state.users.push(user.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": without_password(&user), "message": "Usuario creado" })),
    )
        .into_response()
}

// =============================================================================
// Restaurants
// =============================================================================

async fn list_restaurants(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(lock(&state).restaurants.clone()))
}

async fn get_restaurant(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = lock(&state);
    find(&state.restaurants, id).map_or_else(
        || not_found("Restaurante no encontrado"),
        |r| Json(r.clone()).into_response(),
    )
}

async fn search_restaurants(State(state): State<Shared>, Query(params): Params) -> Json<Value> {
    let query = params.get("q").map(|q| q.to_lowercase()).unwrap_or_default();
    let state = lock(&state);
    let hits: Vec<Value> = state
        .restaurants
        .iter()
        .filter(|r| {
            r["nombre"]
                .as_str()
                .is_some_and(|name| name.to_lowercase().contains(&query))
        })
        .cloned()
        .collect();
    Json(Value::Array(hits))
}

async fn restaurants_by_user(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = lock(&state);
    let owned: Vec<Value> = state
        .restaurants
        .iter()
        .filter(|r| id_of(r, "idUsuario") == Some(id))
        .cloned()
        .collect();
    if owned.is_empty() {
        return not_found("El usuario no tiene restaurantes");
    }
    Json(Value::Array(owned)).into_response()
}

async fn create_restaurant(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    let restaurant = insert_new(&mut state, body);
    state.restaurants.push(restaurant.clone());
    (StatusCode::CREATED, Json(restaurant)).into_response()
}

async fn update_restaurant(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    match state
        .restaurants
        .iter_mut()
        .find(|r| id_of(r, "id") == Some(id))
    {
        Some(restaurant) => {
            merge(restaurant, patch);
            Json(restaurant.clone()).into_response()
        }
        None => not_found("Restaurante no encontrado"),
    }
}

async fn delete_restaurant(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = lock(&state);
    let before = state.restaurants.len();
    state.restaurants.retain(|r| id_of(r, "id") != Some(id));
    if state.restaurants.len() == before {
        return not_found("Restaurante no encontrado");
    }
    StatusCode::OK.into_response()
}

// =============================================================================
// Products
// =============================================================================

async fn products_by_restaurant(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = lock(&state);
    if state.broken_menus.contains(&id) {
        return Json(json!({ "error": "menu unavailable" })).into_response();
    }
    if find(&state.restaurants, id).is_none() {
        return (StatusCode::INTERNAL_SERVER_ERROR, "restaurant lookup failed").into_response();
    }
    let menu: Vec<Value> = state
        .products
        .iter()
        .filter(|p| id_of(p, "restauranteId") == Some(id))
        .cloned()
        .collect();
    Json(Value::Array(menu)).into_response()
}

async fn products_by_user(State(state): State<Shared>, Path(id): Path<i64>) -> Json<Value> {
    let state = lock(&state);
    let owned: HashSet<i64> = state
        .restaurants
        .iter()
        .filter(|r| id_of(r, "idUsuario") == Some(id))
        .filter_map(|r| id_of(r, "id"))
        .collect();
    let products: Vec<Value> = state
        .products
        .iter()
        .filter(|p| id_of(p, "restauranteId").is_some_and(|r| owned.contains(&r)))
        .cloned()
        .collect();
    Json(Value::Array(products))
}

async fn create_product(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    let product = insert_new(&mut state, body);
    state.products.push(product.clone());
    (StatusCode::CREATED, Json(product)).into_response()
}

async fn update_product(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    match state.products.iter_mut().find(|p| id_of(p, "id") == Some(id)) {
        Some(product) => {
            merge(product, patch);
            Json(product.clone()).into_response()
        }
        None => not_found("Producto no encontrado"),
    }
}

async fn delete_product(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let mut state = lock(&state);
    let before = state.products.len();
    state.products.retain(|p| id_of(p, "id") != Some(id));
    if state.products.len() == before {
        return not_found("Producto no encontrado");
    }
    Json(json!({ "deleted": id })).into_response()
}

// =============================================================================
// Orders
// =============================================================================

async fn list_orders(State(state): State<Shared>, Query(params): Params) -> Json<Value> {
    let driver = params.get("repartidorId").and_then(|id| id.parse::<i64>().ok());
    let state = lock(&state);
    let orders: Vec<Value> = state
        .orders
        .iter()
        .filter(|o| driver.is_none_or(|d| id_of(o, "repartidorId") == Some(d)))
        .cloned()
        .collect();
    Json(Value::Array(orders))
}

async fn get_order(State(state): State<Shared>, Path(id): Path<i64>) -> Response {
    let state = lock(&state);
    find(&state.orders, id).map_or_else(
        || not_found("Pedido no encontrado"),
        |o| Json(o.clone()).into_response(),
    )
}

async fn create_order(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    if state.reject_orders {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "Pedidos deshabilitados" })),
        )
            .into_response();
    }
    if body["orderItems"].as_array().is_none_or(Vec::is_empty) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "El pedido no tiene productos" })),
        )
            .into_response();
    }
    let order = insert_new(&mut state, body);
    state.orders.push(order.clone());
    (StatusCode::CREATED, Json(order)).into_response()
}

async fn update_order(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(patch): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    match state.orders.iter_mut().find(|o| id_of(o, "id") == Some(id)) {
        Some(order) => {
            merge(order, patch);
            Json(order.clone()).into_response()
        }
        None => not_found("Pedido no encontrado"),
    }
}

async fn rate_order(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = lock(&state);
    if find(&state.orders, id).is_none() {
        return not_found("Pedido no encontrado");
    }
    let mut rating = body;
    if let Some(fields) = rating.as_object_mut() {
        fields.insert("orderId".to_string(), json!(id));
    }
    state.ratings.push(rating);
    Json(json!({ "success": true, "message": "Gracias por tu calificación" })).into_response()
}
