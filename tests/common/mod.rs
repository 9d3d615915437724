//! Shared utilities for integration testing: an in-process mock of the
//! platform gateway and a fake payment gateway.

#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use booking_verifier::blockchain::{BlockchainError, BlockchainResult};
use booking_verifier::config::{ApiConfig, UserConfig, VerifierConfig};
use booking_verifier::payments::{BookingPayment, PaymentGateway, PaymentReceipt};

pub const HOST_EMAIL: &str = "nitixaj335@roratu.com";
pub const TENANT_EMAIL: &str = "demo_tenant@example.com";
pub const PASSWORD: &str = "Test123@";
pub const HOST_ID: &str = "3";
pub const TENANT_ID: &str = "7";
pub const HOST_WALLET: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const TENANT_WALLET: &str = "0x15d34AAf54267DB7D7c367839AAf71A00a2C6A65";
pub const TENANT_KEY: &str = "0x47e179ec197488593b187f80a00eb0da91f1b9d0b13f8733639f19c30a34926a";

/// Unsigned token whose payload carries `sub`.
pub fn token_for(subject: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({ "sub": subject, "role": "USER" }).to_string());
    format!("{}.{}.signature", header, payload)
}

/// A booking held by the mock.
#[derive(Debug, Clone)]
pub struct StoredBooking {
    pub id: u64,
    pub property_id: u64,
    pub user_id: String,
    pub total_price: Option<f64>,
    pub status: String,
    pub check_in: String,
    pub check_out: String,
    /// List reads left before the booking becomes visible.
    pub hidden_for: u32,
    pub paid: bool,
    /// Detail reads since payment.
    pub reads_since_payment: u32,
}

impl StoredBooking {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "propertyId": self.property_id,
            "userId": self.user_id.parse::<u64>().map(Value::from).unwrap_or_else(|_| Value::from(self.user_id.clone())),
            "totalPrice": self.total_price,
            "status": self.status,
            // The backend serializes LocalDateTime, not plain dates
            "checkInDate": format!("{}T00:00:00", self.check_in),
            "checkOutDate": format!("{}T00:00:00", self.check_out),
        })
    }
}

/// Programmable platform behaviour and recorded traffic.
#[derive(Debug)]
pub struct PlatformState {
    /// email → (password, user id)
    pub users: HashMap<String, (String, String)>,
    pub properties: Vec<Value>,
    pub bookings: Vec<StoredBooking>,
    pub next_booking_id: u64,

    /// Body sent with 200 on a correct login instead of the issued token.
    pub login_body: Option<Value>,
    pub profile_update_status: StatusCode,
    pub booking_request_status: StatusCode,
    /// Whether an accepted request ever produces a record.
    pub materialize_bookings: bool,
    /// List reads before a new booking shows up.
    pub discovery_delay: u32,
    /// Detail reads after payment before the status flips; `None` never flips.
    pub confirm_after_payment: Option<u32>,
    /// Omit `totalPrice` on new bookings.
    pub omit_total_price: bool,

    pub wallet_updates: Vec<(String, String)>,
    pub booking_requests: Vec<Value>,
    pub list_reads: u32,
    pub detail_reads: u32,
    pub auth_headers: Vec<String>,
}

impl Default for PlatformState {
    fn default() -> Self {
        let mut users = HashMap::new();
        users.insert(HOST_EMAIL.to_string(), (PASSWORD.to_string(), HOST_ID.to_string()));
        users.insert(TENANT_EMAIL.to_string(), (PASSWORD.to_string(), TENANT_ID.to_string()));

        Self {
            users,
            properties: vec![
                json!({ "id": 1, "userId": 7, "title": "Tenant's own flat", "dailyPrice": 500.0 }),
                json!({ "id": 2, "userId": 3, "title": "Riad in the medina", "dailyPrice": 900.0 }),
            ],
            bookings: (1..=3)
                .map(|id| StoredBooking {
                    id,
                    property_id: 2,
                    user_id: TENANT_ID.to_string(),
                    total_price: Some(1800.0),
                    status: "CONFIRMED".to_string(),
                    check_in: "2024-01-01".to_string(),
                    check_out: "2024-01-03".to_string(),
                    hidden_for: 0,
                    paid: true,
                    reads_since_payment: 0,
                })
                .collect(),
            next_booking_id: 4,
            login_body: None,
            profile_update_status: StatusCode::OK,
            booking_request_status: StatusCode::ACCEPTED,
            materialize_bookings: true,
            discovery_delay: 0,
            confirm_after_payment: Some(2),
            omit_total_price: false,
            wallet_updates: Vec::new(),
            booking_requests: Vec::new(),
            list_reads: 0,
            detail_reads: 0,
            auth_headers: Vec::new(),
        }
    }
}

impl PlatformState {
    /// Mark a booking as paid on chain.
    pub fn record_payment(&mut self, booking_id: u64) {
        if let Some(b) = self.bookings.iter_mut().find(|b| b.id == booking_id) {
            b.paid = true;
        }
    }

    pub fn booking(&self, id: u64) -> Option<&StoredBooking> {
        self.bookings.iter().find(|b| b.id == id)
    }
}

pub type SharedState = Arc<Mutex<PlatformState>>;

/// A running mock platform.
pub struct MockPlatform {
    pub addr: SocketAddr,
    pub state: SharedState,
}

impl MockPlatform {
    /// Start with default behaviour.
    pub async fn start() -> Self {
        Self::start_with(PlatformState::default()).await
    }

    /// Start with custom behaviour on an ephemeral port.
    pub async fn start_with(state: PlatformState) -> Self {
        let state: SharedState = Arc::new(Mutex::new(state));
        let app = Router::new()
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/users/me", put(update_profile))
            .route("/api/v1/properties", get(list_properties))
            .route("/api/bookings/request", post(request_booking))
            .route("/api/bookings", get(list_bookings))
            .route("/api/bookings/{id}", get(get_booking))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Inspect or tweak the state.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut PlatformState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    /// Config pointing at this mock with fast polling.
    pub fn config(&self) -> VerifierConfig {
        let mut config = VerifierConfig::default();
        config.api = ApiConfig {
            base_url: self.base_url(),
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
        };
        config.host = UserConfig {
            email: HOST_EMAIL.to_string(),
            password: PASSWORD.to_string(),
            wallet_address: HOST_WALLET.to_string(),
        };
        config.tenant = UserConfig {
            email: TENANT_EMAIL.to_string(),
            password: PASSWORD.to_string(),
            wallet_address: TENANT_WALLET.to_string(),
        };
        config.blockchain.tenant_private_key = Some(TENANT_KEY.to_string());
        config.polling.discovery.interval_ms = 5;
        config.polling.confirmation.interval_ms = 5;
        config
    }
}

fn record_auth(state: &mut PlatformState, headers: &HeaderMap) -> Option<String> {
    let value = headers.get("authorization")?.to_str().ok()?.to_string();
    state.auth_headers.push(value.clone());
    let token = value.strip_prefix("Bearer ")?;
    let payload = token.split('.').nth(1)?;
    let claims: Value = serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).ok()?).ok()?;
    claims["sub"].as_str().map(str::to_string)
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response()
}

async fn login(State(state): State<SharedState>, Json(body): Json<Value>) -> Response {
    let state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    match state.users.get(email) {
        Some((expected, user_id)) if expected == password => match &state.login_body {
            Some(body) => Json(body.clone()).into_response(),
            None => Json(json!({ "token": token_for(user_id), "type": "Bearer" })).into_response(),
        },
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response(),
    }
}

async fn update_profile(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    let Some(user_id) = record_auth(&mut state, &headers) else {
        return unauthorized();
    };
    if state.profile_update_status != StatusCode::OK {
        return (state.profile_update_status, "profile service unavailable").into_response();
    }
    let wallet = body["walletAddress"].as_str().unwrap_or_default().to_string();
    state.wallet_updates.push((user_id.clone(), wallet.clone()));
    Json(json!({ "id": user_id, "walletAddress": wallet })).into_response()
}

async fn list_properties(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    if record_auth(&mut state, &headers).is_none() {
        return unauthorized();
    }
    Json(Value::Array(state.properties.clone())).into_response()
}

async fn request_booking(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if record_auth(&mut state, &headers).is_none() {
        return unauthorized();
    }
    state.booking_requests.push(body.clone());
    if !state.booking_request_status.is_success() {
        return (state.booking_request_status, "property unavailable for these dates")
            .into_response();
    }
    if !state.materialize_bookings {
        return (state.booking_request_status, Json(json!({ "message": "queued" })))
            .into_response();
    }

    let property_id = body["propertyId"].as_u64().unwrap_or_default();
    let check_in = body["checkInDate"].as_str().unwrap_or_default().to_string();
    let check_out = body["checkOutDate"].as_str().unwrap_or_default().to_string();
    let nights = match (
        NaiveDate::parse_from_str(&check_in, "%Y-%m-%d"),
        NaiveDate::parse_from_str(&check_out, "%Y-%m-%d"),
    ) {
        (Ok(a), Ok(b)) => (b - a).num_days() as f64,
        _ => 0.0,
    };
    let daily = state
        .properties
        .iter()
        .find(|p| p["id"].as_u64() == Some(property_id))
        .and_then(|p| p["dailyPrice"].as_f64())
        .unwrap_or_default();

    let id = state.next_booking_id;
    state.next_booking_id += 1;
    let booking = StoredBooking {
        id,
        property_id,
        user_id: body["userId"].as_str().unwrap_or_default().to_string(),
        total_price: (!state.omit_total_price).then_some(daily * nights),
        status: "PENDING_PAYMENT".to_string(),
        check_in,
        check_out,
        hidden_for: state.discovery_delay,
        paid: false,
        reads_since_payment: 0,
    };
    state.bookings.push(booking);

    (state.booking_request_status, Json(json!({ "message": "Booking request submitted" })))
        .into_response()
}

async fn list_bookings(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    if record_auth(&mut state, &headers).is_none() {
        return unauthorized();
    }
    state.list_reads += 1;

    let tenant = query.get("tenantId").cloned().unwrap_or_default();
    let mut visible = Vec::new();
    for booking in state.bookings.iter_mut().filter(|b| b.user_id == tenant) {
        if booking.hidden_for > 0 {
            booking.hidden_for -= 1;
            continue;
        }
        visible.push(booking.to_json());
    }
    Json(Value::Array(visible)).into_response()
}

async fn get_booking(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    let mut state = state.lock().unwrap();
    if record_auth(&mut state, &headers).is_none() {
        return unauthorized();
    }
    state.detail_reads += 1;

    let confirm_after = state.confirm_after_payment;
    let Some(booking) = state.bookings.iter_mut().find(|b| b.id == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({ "message": "Booking not found" })))
            .into_response();
    };
    if booking.paid && booking.status != "CONFIRMED" {
        booking.reads_since_payment += 1;
        if confirm_after.is_some_and(|n| booking.reads_since_payment >= n) {
            booking.status = "CONFIRMED".to_string();
        }
    }
    Json(booking.to_json()).into_response()
}

/// Chain stand-in that records payments and optionally notifies the mock
/// platform, the way the real backend reacts to the on-chain event.
#[derive(Default)]
pub struct FakeGateway {
    pub platform: Option<SharedState>,
    pub offline: bool,
    pub revert: bool,
    pub calls: AtomicU32,
    pub payments: Mutex<Vec<BookingPayment>>,
}

impl FakeGateway {
    pub fn linked(platform: &MockPlatform) -> Self {
        Self {
            platform: Some(platform.state.clone()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PaymentGateway for FakeGateway {
    async fn block_number(&self) -> BlockchainResult<u64> {
        if self.offline {
            return Err(BlockchainError::Rpc("connection refused".to_string()));
        }
        Ok(42)
    }

    async fn pay_booking(&self, payment: &BookingPayment) -> BlockchainResult<PaymentReceipt> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payments.lock().unwrap().push(payment.clone());

        if !self.revert {
            if let Some(platform) = &self.platform {
                platform.lock().unwrap().record_payment(payment.booking_id);
            }
        }

        Ok(PaymentReceipt {
            tx_hash: alloy::primitives::TxHash::repeat_byte(0xab),
            block_number: Some(43),
            gas_used: 95_000,
            success: !self.revert,
        })
    }
}
