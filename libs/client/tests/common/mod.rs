//! A stand-in for the foundation backend, served on an ephemeral port.
//!
//! Only enough of each endpoint is implemented for the client to be driven
//! through its flows. Every request is recorded so tests can assert on what
//! was sent.
#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use lsl_client::session::Session;
use lsl_client::{LslClient, LslClientBuilder};
use serde_json::{json, Value};

pub const GOOD_PASSWORD: &str = "correct horse battery";
pub const ACCESS_TOKEN: &str = "access-1";
pub const REFRESHED_ACCESS_TOKEN: &str = "access-2";
pub const REFRESH_TOKEN: &str = "refresh-1";
pub const ADMIN_EMAIL: &str = "admin@example.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct Stub {
    pub requests: Mutex<Vec<Recorded>>,
    pub logout_fails: AtomicBool,
    pub reject_addresses: AtomicBool,
    pub empty_unread_count: AtomicBool,
    pub submitted_periods: Mutex<BTreeSet<(u8, i32)>>,
    pub approved: Mutex<BTreeSet<i64>>,
}

impl Stub {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("poisoned").clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Bodies that are not checked by the handler, recorded as sent.
    fn record_raw_body(&self, path: &str, body: &str) {
        let value = serde_json::from_str(body).unwrap_or(Value::String(body.to_string()));
        self.record_body(path, &value);
    }

    fn record_body(&self, path: &str, body: &Value) {
        let mut guard = self.requests.lock().expect("poisoned");
        if let Some(r) = guard.iter_mut().rev().find(|r| r.path == path) {
            r.body = Some(body.clone());
        }
    }
}

pub struct TestBackend {
    pub url: String,
    pub stub: Arc<Stub>,
    pub token_dir: tempfile::TempDir,
}

impl TestBackend {
    pub fn client(&self) -> LslClient {
        LslClientBuilder::new()
            .address(self.url.clone())
            .build()
            .expect("failed to build client")
    }

    pub fn token_path(&self) -> String {
        self.token_dir
            .path()
            .join("lsl_tokens")
            .to_str()
            .expect("tempdir is not utf8")
            .to_string()
    }

    pub fn session(&self) -> Session {
        Session::new(self.client(), None, self.token_path())
    }
}

pub fn realtor_json(id: i64, email: &str, is_admin: bool, approval: Option<&str>) -> Value {
    json!({
        "id": id,
        "email": email,
        "first_name": "Pat",
        "last_name": format!("Realtor{}", id),
        "phone": "(901) 555-0000",
        "brokerage": "Acme Realty",
        "license_number": null,
        "donation_amount_per_transaction": 25.0,
        "headshot_url": null,
        "bio": null,
        "is_active": true,
        "email_verified": true,
        "is_approved": approval == Some("approved"),
        "is_admin": is_admin,
        "approval_status": approval,
        "created_at": "2024-01-02T03:04:05",
        "updated_at": null,
        "approved_at": null
    })
}

fn transaction_json(id: i64, month: u8, year: i32, count: u32, with_realtor: bool) -> Value {
    let mut v = json!({
        "id": id,
        "realtor_id": 7,
        "month": month,
        "year": year,
        "closed_transactions_count": count,
        "calculated_donation_amount": 25.0 * f64::from(count),
        "status": "pending",
        "submitted_at": "2024-04-01T00:00:00",
        "has_donation": false
    });
    if with_realtor {
        v["realtor_name"] = json!("Pat Realtor7");
        v["realtor_email"] = json!("pat@example.com");
    }
    v
}

fn donation_json(id: i64) -> Value {
    json!({
        "id": id,
        "realtor_id": 7,
        "transaction_id": id,
        "amount": 50.0,
        "payment_method": "credit_card",
        "payment_reference": "Payment-1",
        "payment_status": "completed",
        "thank_you_image_generated": false,
        "thank_you_image_url": null,
        "social_media_shared": false,
        "paid_at": "2024-04-02T00:00:00",
        "created_at": "2024-04-02T00:00:00"
    })
}

fn error(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "error": msg }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Which user a bearer token belongs to. Emails containing "admin" log in
/// as an admin.
fn authed(headers: &HeaderMap) -> Option<bool> {
    match bearer(headers) {
        Some(ACCESS_TOKEN) | Some(REFRESHED_ACCESS_TOKEN) => Some(false),
        Some(t) if t == format!("{}-admin", ACCESS_TOKEN) => Some(true),
        _ => None,
    }
}

async fn record_request(State(stub): State<Arc<Stub>>, req: Request, next: Next) -> Response {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.requests.lock().expect("poisoned").push(Recorded {
        method: req.method().to_string(),
        path: req.uri().path().to_string(),
        query: req.uri().query().map(str::to_string),
        authorization,
        body: None,
    });
    next.run(req).await
}

async fn login(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> Response {
    stub.record_body("/api/auth/login", &body);
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if body["password"] != GOOD_PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid email or password");
    }
    let is_admin = email == ADMIN_EMAIL;
    let access = if is_admin {
        format!("{}-admin", ACCESS_TOKEN)
    } else {
        ACCESS_TOKEN.to_string()
    };
    Json(json!({
        "message": "Login successful",
        "realtor": realtor_json(if is_admin { 1 } else { 7 }, &email, is_admin, Some("approved")),
        "access_token": access,
        "refresh_token": REFRESH_TOKEN
    }))
    .into_response()
}

async fn register(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> Response {
    stub.record_body("/api/auth/register", &body);
    let email = body["email"].as_str().unwrap_or_default();
    if email == "taken@example.com" {
        return error(StatusCode::CONFLICT, "Email already registered");
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful",
            "realtor": realtor_json(8, email, false, Some("approved")),
            "access_token": ACCESS_TOKEN,
            "refresh_token": REFRESH_TOKEN
        })),
    )
        .into_response()
}

async fn verify(headers: HeaderMap) -> Response {
    match authed(&headers) {
        Some(is_admin) => Json(json!({
            "valid": true,
            "realtor": realtor_json(
                if is_admin { 1 } else { 7 },
                if is_admin { ADMIN_EMAIL } else { "pat@example.com" },
                is_admin,
                Some("approved"),
            )
        }))
        .into_response(),
        // Token errors do not use the usual error body.
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "Token has expired" })),
        )
            .into_response(),
    }
}

async fn logout(State(stub): State<Arc<Stub>>, body: String) -> Response {
    stub.record_raw_body("/api/auth/logout", &body);
    if stub.logout_fails.load(Ordering::SeqCst) {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "logout exploded");
    }
    Json(json!({ "message": "Logout successful" })).into_response()
}

async fn refresh(headers: HeaderMap) -> Response {
    if bearer(&headers) != Some(REFRESH_TOKEN) {
        return error(StatusCode::UNAUTHORIZED, "Only refresh tokens are allowed");
    }
    Json(json!({ "access_token": REFRESHED_ACCESS_TOKEN })).into_response()
}

async fn profile_update(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if authed(&headers).is_none() {
        return error(StatusCode::UNAUTHORIZED, "Missing Authorization Header");
    }
    let mut realtor = realtor_json(7, "pat@example.com", false, Some("approved"));
    if let Some(obj) = body.as_object() {
        for (k, v) in obj {
            realtor[k] = v.clone();
        }
    }
    Json(json!({ "message": "Profile updated successfully", "realtor": realtor })).into_response()
}

async fn submit_transaction(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> Response {
    stub.record_body("/api/transactions/submit", &body);
    let month = body["month"].as_u64().unwrap_or(0) as u8;
    let year = body["year"].as_i64().unwrap_or(0) as i32;
    let count = body["closed_transactions_count"].as_u64().unwrap_or(0) as u32;
    let fresh = stub
        .submitted_periods
        .lock()
        .expect("poisoned")
        .insert((month, year));
    if !fresh {
        return error(
            StatusCode::CONFLICT,
            &format!("Transactions for {}/{} already submitted", month, year),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Transactions submitted successfully",
            "transaction": transaction_json(11, month, year, count, false)
        })),
    )
        .into_response()
}

async fn transaction_history() -> Json<Value> {
    Json(json!({ "transactions": [transaction_json(11, 3, 2024, 2, false)] }))
}

async fn donation_history() -> Json<Value> {
    Json(json!({ "donations": [donation_json(21)] }))
}

async fn admin_transactions(headers: HeaderMap) -> Response {
    if authed(&headers) != Some(true) {
        return error(StatusCode::FORBIDDEN, "Admin access required");
    }
    Json(json!({ "transactions": [
        transaction_json(11, 3, 2024, 2, true),
        transaction_json(12, 3, 2024, 1, true)
    ] }))
    .into_response()
}

async fn admin_donations(headers: HeaderMap) -> Response {
    if authed(&headers) != Some(true) {
        return error(StatusCode::FORBIDDEN, "Admin access required");
    }
    Json(json!({ "donations": [donation_json(21), donation_json(22), donation_json(23)] }))
        .into_response()
}

async fn admin_realtors(State(stub): State<Arc<Stub>>) -> Json<Value> {
    let approved = stub.approved.lock().expect("poisoned").clone();
    let status = |id: i64, default: &'static str| {
        if approved.contains(&id) {
            "approved"
        } else {
            default
        }
    };
    Json(json!({
        "realtors": [
            realtor_json(1, ADMIN_EMAIL, true, Some(status(1, "approved"))),
            realtor_json(2, "two@example.com", false, Some(status(2, "pending"))),
            realtor_json(3, "three@example.com", false, Some(status(3, "pending"))),
            realtor_json(4, "four@example.com", false, Some(status(4, "denied"))),
        ],
        "total": 4,
        "pages": 1,
        "current_page": 1
    }))
}

async fn admin_approve(
    State(stub): State<Arc<Stub>>,
    Path(id): Path<i64>,
    body: String,
) -> Response {
    stub.record_raw_body(&format!("/api/admin/realtors/{}/approve", id), &body);
    stub.approved.lock().expect("poisoned").insert(id);
    Json(json!({
        "message": "Realtor approved successfully",
        "realtor": realtor_json(id, "two@example.com", false, Some("approved"))
    }))
    .into_response()
}

/// Any logged in realtor may browse applications.
async fn grant_list(headers: HeaderMap, Query(q): Query<HashMap<String, String>>) -> Response {
    if authed(&headers).is_none() {
        return error(StatusCode::UNAUTHORIZED, "Missing Authorization Header");
    }
    let page = q
        .get("page")
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(1);
    Json(json!({
        "applications": [],
        "total": 23,
        "pages": 3,
        "current_page": page
    }))
    .into_response()
}

async fn validate_address(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> Response {
    stub.record_body("/api/grant-applications/validate-address", &body);
    if stub.reject_addresses.load(Ordering::SeqCst) {
        return error(StatusCode::BAD_REQUEST, "Address not found");
    }
    let full = format!(
        "{}, {}, {} {}",
        body["address"].as_str().unwrap_or_default(),
        body["city"].as_str().unwrap_or_default(),
        body["state"].as_str().unwrap_or_default(),
        body["zip"].as_str().unwrap_or_default()
    );
    Json(json!({
        "success": true,
        "address": body["address"],
        "city": body["city"],
        "state": body["state"],
        "zip5": body["zip"],
        "zip4": "",
        "full_address": full
    }))
    .into_response()
}

async fn grant_submit(State(stub): State<Arc<Stub>>, Json(body): Json<Value>) -> Response {
    stub.record_body("/api/grant-applications/", &body);
    (
        StatusCode::CREATED,
        Json(json!({
            "message": "Application submitted successfully",
            "application": {
                "id": 99,
                "application_type": body["application_type"],
                "applicant": {
                    "first_name": body["applicant_first_name"],
                    "last_name": body["applicant_last_name"],
                    "address": body["applicant_address"],
                    "email": body["applicant_email"],
                    "phone": body["applicant_phone"],
                    "birthday": body["applicant_birthday"],
                    "story": body["applicant_story"]
                },
                "submitter": null,
                "status": "pending",
                "created_at": null,
                "updated_at": null,
                "admin_notes": null,
                "reviewed_by": null,
                "reviewed_at": null
            }
        })),
    )
        .into_response()
}

async fn notifications() -> Json<Value> {
    Json(json!({ "notifications": [] }))
}

async fn unread_count(State(stub): State<Arc<Stub>>) -> Response {
    if stub.empty_unread_count.load(Ordering::SeqCst) {
        return StatusCode::OK.into_response();
    }
    Json(json!({ "unread_count": 3 })).into_response()
}

pub async fn setup() -> TestBackend {
    let _ = tracing_subscriber::fmt::try_init();

    let stub = Arc::new(Stub::default());

    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/verify", get(verify))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/realtors/profile", put(profile_update))
        .route("/api/transactions/submit", post(submit_transaction))
        .route("/api/transactions/history", get(transaction_history))
        .route("/api/donations/history", get(donation_history))
        .route("/api/admin/transactions", get(admin_transactions))
        .route("/api/admin/donations", get(admin_donations))
        .route("/api/admin/realtors", get(admin_realtors))
        .route("/api/admin/realtors/:id/approve", post(admin_approve))
        .route(
            "/api/grant-applications/",
            get(grant_list).post(grant_submit),
        )
        .route(
            "/api/grant-applications/validate-address",
            post(validate_address),
        )
        .route("/api/notifications", get(notifications))
        .route("/api/notifications/unread-count", get(unread_count))
        .layer(middleware::from_fn_with_state(stub.clone(), record_request))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind stub backend");
    let addr = listener.local_addr().expect("failed to get local address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("stub backend failed");
    });

    TestBackend {
        url: format!("http://{}", addr),
        stub,
        token_dir: tempfile::tempdir().expect("failed to create tempdir"),
    }
}
