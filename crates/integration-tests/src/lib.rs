//! Integration tests for Cardfolio.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cardfolio-integration-tests
//! ```
//!
//! Each test starts a [`FakeBackend`] speaking the backend's REST
//! conventions and a storefront pointed at it, both on ephemeral ports, then
//! drives the storefront over HTTP with a cookie-keeping client.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};

use cardfolio_storefront::config::StorefrontConfig;
use cardfolio_storefront::state::AppState;

/// Bearer token accepted by the fake cart endpoints.
pub const TEST_TOKEN: &str = "test-token";

// =============================================================================
// Fake backend
// =============================================================================

/// A cart line kept by the fake backend.
#[derive(Debug, Clone)]
pub struct FakeLine {
    pub product_id: String,
    pub title: String,
    pub price: u32,
    pub quantity: u32,
}

#[derive(Default)]
struct FakeData {
    accounts: HashMap<String, Value>,
    profiles: HashMap<String, Value>,
    cart: Vec<FakeLine>,
    /// Mutations received, e.g. `remove:prod-1`.
    mutations: Vec<String>,
}

/// In-process stand-in for the backend REST API.
#[derive(Clone, Default)]
pub struct FakeBackend {
    data: Arc<Mutex<FakeData>>,
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": false, "message": message })),
    )
        .into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"))
}

impl FakeBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account with `theme` linked to profile `profile_id`.
    #[must_use]
    pub fn with_account(self, user_id: &str, theme: &str, profile_id: &str) -> Self {
        self.data.lock().unwrap().accounts.insert(
            user_id.to_string(),
            json!({ "_id": user_id, "selectedTemplate": theme, "profileId": profile_id }),
        );
        self
    }

    /// Add a profile document.
    #[must_use]
    pub fn with_profile(self, profile_id: &str, full_name: &str) -> Self {
        self.data.lock().unwrap().profiles.insert(
            profile_id.to_string(),
            json!({
                "_id": profile_id,
                "fullName": full_name,
                "companyName": "Acme",
                "companyDesignation": "Founder",
                "phoneNumbers": [{ "number": "501234567", "countryCode": "971" }],
                "emails": [{ "emailAddress": "jane@acme.test" }],
                "contactDetails": {
                    "address": "Street 1",
                    "state": "Dubai",
                    "country": "UAE",
                    "googleMapLink": "https://maps.google.com/?q=acme"
                }
            }),
        );
        self
    }

    /// Add a cart line.
    #[must_use]
    pub fn with_cart_line(self, product_id: &str, title: &str, price: u32, quantity: u32) -> Self {
        self.data.lock().unwrap().cart.push(FakeLine {
            product_id: product_id.to_string(),
            title: title.to_string(),
            price,
            quantity,
        });
        self
    }

    /// Mutations received so far.
    #[must_use]
    pub fn mutations(&self) -> Vec<String> {
        self.data.lock().unwrap().mutations.clone()
    }

    fn cart_json(&self) -> Value {
        let data = self.data.lock().unwrap();
        let items: Vec<Value> = data
            .cart
            .iter()
            .map(|line| {
                json!({
                    "_id": format!("line-{}", line.product_id),
                    "productId": {
                        "_id": line.product_id,
                        "title": line.title,
                        "category": "NFC Card",
                        "material": "Metal",
                        "variants": [{ "frontImage": "https://img.test/card.png" }]
                    },
                    "price": line.price,
                    "quantity": line.quantity,
                })
            })
            .collect();
        let total: u32 = data.cart.iter().map(|l| l.price * l.quantity).sum();
        json!({ "items": items, "totalAmount": total })
    }

    fn router(self) -> Router {
        Router::new()
            .route("/userProfile/getUser", post(get_user))
            .route("/userProfile/getUserProfile/{id}", get(get_user_profile))
            .route("/cart/getUserCart", post(get_cart))
            .route("/cart/updateQuantity", post(update_quantity))
            .route("/cart/removeItem", post(remove_item))
            .route("/qrCode/getQrCode/{user_id}", get(get_qr_code))
            .with_state(self)
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = self.clone().router();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn get_user(State(fake): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    let user_id = body["userId"].as_str().unwrap_or_default();
    let account = fake.data.lock().unwrap().accounts.get(user_id).cloned();
    match account {
        Some(account) => Json(json!({ "status": true, "data": account })).into_response(),
        None => not_found("User not found"),
    }
}

async fn get_user_profile(State(fake): State<FakeBackend>, Path(id): Path<String>) -> Response {
    let profile = fake.data.lock().unwrap().profiles.get(&id).cloned();
    match profile {
        // The profile endpoint uses the `code` envelope
        Some(profile) => Json(json!({ "code": 200, "data": profile })).into_response(),
        None => not_found("Profile not found"),
    }
}

async fn get_cart(State(fake): State<FakeBackend>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "status": true, "data": fake.cart_json() })).into_response()
}

async fn update_quantity(
    State(fake): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let product_id = body["productId"].as_str().unwrap_or_default().to_string();
    let quantity = u32::try_from(body["quantity"].as_u64().unwrap_or_default()).unwrap_or(0);

    let mut data = fake.data.lock().unwrap();
    data.mutations.push(format!("update:{product_id}:{quantity}"));
    if let Some(line) = data.cart.iter_mut().find(|l| l.product_id == product_id) {
        line.quantity = quantity;
    }
    Json(json!({ "status": true, "message": "Quantity updated" })).into_response()
}

async fn remove_item(
    State(fake): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let product_id = body["productId"].as_str().unwrap_or_default().to_string();

    let mut data = fake.data.lock().unwrap();
    data.mutations.push(format!("remove:{product_id}"));
    data.cart.retain(|l| l.product_id != product_id);
    Json(json!({ "status": true, "message": "Item removed" })).into_response()
}

async fn get_qr_code(State(fake): State<FakeBackend>, Path(user_id): Path<String>) -> Response {
    if !fake.data.lock().unwrap().accounts.contains_key(&user_id) {
        return not_found("QR code not found");
    }
    Json(json!({
        "status": true,
        "data": {
            "qrCode": "data:image/png;base64,iVBORw0KGgo=",
            "redirectUrl": format!("https://cards.test/profile/{user_id}")
        }
    }))
    .into_response()
}

// =============================================================================
// Storefront under test
// =============================================================================

/// A running storefront plus the client driving it.
pub struct TestContext {
    pub client: reqwest::Client,
    pub storefront_url: String,
    pub backend: FakeBackend,
}

impl TestContext {
    /// Start `backend` and a storefront pointed at it.
    pub async fn start(backend: FakeBackend) -> Self {
        Self::start_with(backend, &[]).await
    }

    /// Like [`TestContext::start`], with extra environment variables.
    pub async fn start_with(backend: FakeBackend, vars: &[(&str, &str)]) -> Self {
        let backend_url = backend.spawn().await;

        let mut env: HashMap<String, String> = HashMap::from([
            ("CARDFOLIO_BASE_URL".to_string(), "http://127.0.0.1".to_string()),
            ("BACKEND_API_URL".to_string(), backend_url),
            ("LOGIN_URL".to_string(), "https://login.cards.test/".to_string()),
            (
                "CHECKOUT_URL".to_string(),
                "https://shop.cards.test/checkout".to_string(),
            ),
        ]);
        for (key, value) in vars {
            env.insert((*key).to_string(), (*value).to_string());
        }
        let config = StorefrontConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
        let state = AppState::new(config).unwrap();
        let app = cardfolio_storefront::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            client,
            storefront_url: format!("http://{addr}"),
            backend,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    /// Hand over an identity the way the login front end does.
    pub async fn sign_in(&self, user_id: &str) {
        let response = self
            .client
            .post(self.url("/api/session"))
            .json(&json!({ "authToken": TEST_TOKEN, "userId": user_id }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}
