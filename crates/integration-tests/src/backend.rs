//! In-process mock of the Fashion Store REST backend.
//!
//! Speaks the same wire format as the real backend, including the
//! `{detail}` error envelope and Portuguese messages, so the storefront can
//! be exercised end to end without a Python process.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use uuid::Uuid;

type SharedState = Arc<Mutex<BackendState>>;

/// Mutable backend data, shared with tests so they can inspect and rig it.
pub struct BackendState {
    pub products: Vec<Value>,
    pub users: Vec<Value>,
    pub orders: Vec<Value>,
    /// When set, order creation fails with this detail message.
    pub reject_orders: Option<String>,
}

impl BackendState {
    /// Catalog and users the mock starts with.
    #[must_use]
    pub fn seeded() -> Self {
        let products = vec![
            json!({
                "id": "prod-001",
                "name": "Camiseta Básica Branca",
                "description": "Camiseta de algodão com corte clássico.",
                "price": 49.90,
                "category": "Camisetas",
                "sizes": ["P", "M", "G", "GG"],
                "colors": ["Branco", "Preto"],
                "image_url": "https://img.example.com/camiseta-basica.jpg",
                "stock": 12,
                "brand": "Urban Basics",
                "gender": "masculino",
                "rating": 4.5,
                "reviews_count": 23
            }),
            json!({
                "id": "prod-002",
                "name": "Vestido Floral",
                "description": "Vestido leve com estampa floral.",
                "price": 189.90,
                "category": "Vestidos",
                "sizes": ["P", "M", "G"],
                "colors": ["Floral"],
                "image_url": "https://img.example.com/vestido-floral.jpg",
                "stock": 5,
                "brand": "Bella Moda",
                "gender": "feminino",
                "rating": 4.8,
                "reviews_count": 41
            }),
            json!({
                "id": "prod-003",
                "name": "Jaqueta Jeans",
                "description": "Jaqueta jeans unissex de lavagem média.",
                "price": 259.90,
                "category": "Jaquetas",
                "sizes": ["M", "G"],
                "colors": ["Azul"],
                "image_url": "https://img.example.com/jaqueta-jeans.jpg",
                "stock": 0,
                "brand": "Denim Co",
                "gender": "unissex",
                "rating": 4.2,
                "reviews_count": 17
            }),
        ];

        let users = vec![json!({
            "id": "user-001",
            "name": "João Silva",
            "email": "joao@email.com",
            "password": "admin",
            "address": "Rua das Flores, 123 - São Paulo, SP",
            "phone": "(11) 98765-4321"
        })];

        Self {
            products,
            users,
            orders: Vec::new(),
            reject_orders: None,
        }
    }
}

/// Handle to a running mock backend.
pub struct MockBackend {
    pub base_url: String,
    pub state: SharedState,
}

impl MockBackend {
    /// Start the mock on an ephemeral port.
    pub async fn spawn() -> Self {
        let state = Arc::new(Mutex::new(BackendState::seeded()));
        let router = router(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("Failed to bind mock backend listener");
        let port = listener
            .local_addr()
            .expect("Failed to read mock backend address")
            .port();

        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Mock backend server error");
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            state,
        }
    }

    /// Make the next order creations fail with the given detail message.
    pub fn reject_orders(&self, detail: &str) {
        self.lock().reject_orders = Some(detail.to_string());
    }

    /// Number of orders the backend has accepted.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    /// Id of the most recently created order.
    #[must_use]
    pub fn latest_order_id(&self) -> Option<String> {
        self.lock()
            .orders
            .first()
            .and_then(|o| o["id"].as_str().map(String::from))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackendState> {
        self.state.lock().expect("Backend state poisoned")
    }
}

fn router(state: SharedState) -> Router {
    Router::new()
        .route("/api/products/", get(list_products))
        .route("/api/products/categories", get(list_categories))
        .route("/api/products/{id}", get(get_product))
        .route("/api/users/login", post(login))
        .route("/api/users/register", post(register))
        .route("/api/orders/", post(create_order))
        .route("/api/orders/user/{user_id}", get(user_orders))
        .route("/api/orders/{id}/cancel", put(cancel_order))
        .with_state(state)
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

async fn list_products(
    State(state): State<SharedState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let state = state.lock().expect("Backend state poisoned");

    let matches: Vec<Value> = state
        .products
        .iter()
        .filter(|p| {
            if let Some(category) = params.get("category")
                && p["category"].as_str() != Some(category)
            {
                return false;
            }
            if let Some(gender) = params.get("gender")
                && p["gender"].as_str() != Some(gender)
            {
                return false;
            }
            if let Some(search) = params.get("search") {
                let name = p["name"].as_str().unwrap_or_default().to_lowercase();
                if !name.contains(&search.to_lowercase()) {
                    return false;
                }
            }
            let price = p["price"].as_f64().unwrap_or_default();
            if let Some(min) = params.get("min_price").and_then(|v| v.parse::<f64>().ok())
                && price < min
            {
                return false;
            }
            if let Some(max) = params.get("max_price").and_then(|v| v.parse::<f64>().ok())
                && price > max
            {
                return false;
            }
            true
        })
        .cloned()
        .collect();

    Json(json!({ "products": matches, "total": matches.len() }))
}

async fn list_categories(State(state): State<SharedState>) -> Json<Value> {
    let state = state.lock().expect("Backend state poisoned");

    let mut categories: Vec<&str> = state
        .products
        .iter()
        .filter_map(|p| p["category"].as_str())
        .collect();
    categories.sort_unstable();
    categories.dedup();

    Json(json!({ "categories": categories }))
}

async fn get_product(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let state = state.lock().expect("Backend state poisoned");

    state
        .products
        .iter()
        .find(|p| p["id"].as_str() == Some(&id))
        .map_or_else(
            || detail(StatusCode::NOT_FOUND, "Produto não encontrado"),
            |p| Json(p.clone()).into_response(),
        )
}

async fn login(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let state = state.lock().expect("Backend state poisoned");

    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    state
        .users
        .iter()
        .find(|u| u["email"].as_str() == Some(email) && u["password"].as_str() == Some(password))
        .map_or_else(
            || detail(StatusCode::UNAUTHORIZED, "Email ou senha incorretos"),
            |user| {
                Json(json!({
                    "message": "Login realizado com sucesso",
                    "user": public_user(user)
                }))
                .into_response()
            },
        )
}

async fn register(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().expect("Backend state poisoned");

    let email = body["email"].as_str().unwrap_or_default().to_string();
    if state.users.iter().any(|u| u["email"].as_str() == Some(&email)) {
        return detail(StatusCode::CONFLICT, "Email já cadastrado");
    }

    let user = json!({
        "id": format!("user-{:03}", state.users.len() + 1),
        "name": body["name"],
        "email": body["email"],
        "password": body["password"],
        "address": body.get("address").cloned().unwrap_or(Value::Null),
        "phone": body.get("phone").cloned().unwrap_or(Value::Null)
    });
    state.users.push(user.clone());

    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Usuário cadastrado com sucesso",
            "user": public_user(&user)
        })),
    )
        .into_response()
}

async fn create_order(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().expect("Backend state poisoned");

    if let Some(message) = state.reject_orders.clone() {
        return detail(StatusCode::BAD_REQUEST, &message);
    }

    let empty = Vec::new();
    let items: Vec<Value> = body["items"]
        .as_array()
        .unwrap_or(&empty)
        .iter()
        .map(|item| {
            let unit_price = item["unit_price"].as_f64().unwrap_or_default();
            let quantity = item["quantity"].as_u64().unwrap_or_default();
            let mut line = item.clone();
            line["subtotal"] = json!(money(unit_price, quantity));
            line
        })
        .collect();

    let total: f64 = items
        .iter()
        .map(|i| i["subtotal"].as_f64().unwrap_or_default())
        .sum();

    let order = json!({
        "id": Uuid::new_v4().to_string(),
        "user_id": body["user_id"],
        "items": items,
        "status": "pendente",
        "total": total,
        "created_at": "2024-01-15T10:30:00",
        "shipping_address": body["shipping_address"]
    });

    // Newest orders first, like the real backend returns them
    state.orders.insert(0, order.clone());

    (
        StatusCode::CREATED,
        Json(json!({ "message": "Pedido criado com sucesso", "order": order })),
    )
        .into_response()
}

async fn user_orders(State(state): State<SharedState>, Path(user_id): Path<String>) -> Json<Value> {
    let state = state.lock().expect("Backend state poisoned");

    let orders: Vec<Value> = state
        .orders
        .iter()
        .filter(|o| o["user_id"].as_str() == Some(&user_id))
        .cloned()
        .collect();

    Json(json!({ "orders": orders, "total": orders.len() }))
}

async fn cancel_order(State(state): State<SharedState>, Path(id): Path<String>) -> Response {
    let mut state = state.lock().expect("Backend state poisoned");

    let Some(order) = state.orders.iter_mut().find(|o| o["id"].as_str() == Some(&id)) else {
        return detail(StatusCode::NOT_FOUND, "Pedido não encontrado");
    };

    let status = order["status"].as_str().unwrap_or_default();
    if status != "pendente" && status != "confirmado" {
        return detail(StatusCode::BAD_REQUEST, "Pedido não pode ser cancelado");
    }

    order["status"] = json!("cancelado");
    Json(json!({ "message": "Pedido cancelado com sucesso", "order": order.clone() })).into_response()
}

/// The user record as the backend returns it: everything but the password.
fn public_user(user: &Value) -> Value {
    json!({
        "id": user["id"],
        "name": user["name"],
        "email": user["email"],
        "address": user["address"],
        "phone": user["phone"]
    })
}

/// Multiply a price by a quantity in whole cents to keep floats tidy.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn money(unit_price: f64, quantity: u64) -> f64 {
    let cents = (unit_price * 100.0).round() as i64;
    (cents * quantity as i64) as f64 / 100.0
}
