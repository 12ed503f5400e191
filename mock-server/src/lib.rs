//! In-memory emulation of the payment gateway REST API.
//!
//! Covers the payments, profiles, reports and tokenization endpoints with
//! the gateway's response shapes: successful calls answer 200 with either a
//! transaction record or `{code: 1, message: "Operation Successful", ...}`;
//! failures answer a non-2xx status with `{code, message}`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Merchant accepted by the mock.
pub const MERCHANT_ID: &str = "300200578";
/// Payments API passcode accepted by the mock.
pub const API_PASSCODE: &str = "4BaD82D9197b4cc4b70a221911eE9f70";
/// Card number that is always declined.
pub const DECLINED_CARD: &str = "4003050500040005";

const FIRST_TRANSACTION_ID: u64 = 10_000_000;

type Object = Map<String, Value>;
type Reply = (StatusCode, Json<Value>);

#[derive(Debug, Clone)]
pub struct Profile {
    pub customer_code: String,
    pub fields: Object,
    pub cards: Vec<Object>,
    next_card_id: u32,
}

#[derive(Debug, Default)]
pub struct Store {
    pub transactions: HashMap<u64, Object>,
    pub profiles: HashMap<String, Profile>,
    last_transaction_id: u64,
}

impl Store {
    fn record(&mut self, kind: &str, payment_method: &str, amount: Value, order_number: Option<&Value>) -> Object {
        self.last_transaction_id = self.last_transaction_id.max(FIRST_TRANSACTION_ID) + 1;
        let id = self.last_transaction_id;
        let mut transaction = json!({
            "id": id.to_string(),
            "authorizing_merchant_id": MERCHANT_ID.parse::<u64>().unwrap_or_default(),
            "approved": "1",
            "message_id": "1",
            "message": "Approved",
            "auth_code": "TEST",
            "order_number": order_number.cloned().unwrap_or_else(|| json!(id.to_string())),
            "type": kind,
            "payment_method": payment_method,
            "amount": amount,
        });
        let transaction = transaction.as_object_mut().map(std::mem::take).unwrap_or_default();
        self.transactions.insert(id, transaction.clone());
        transaction
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Header value the mock expects on every versioned route.
pub fn expected_authorization() -> String {
    format!("Passcode {}", STANDARD.encode(format!("{MERCHANT_ID}:{API_PASSCODE}")))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/{version}/payments", post(create_payment))
        .route("/{version}/payments/{id}", get(get_payment))
        .route("/{version}/payments/{id}/completions", post(complete_payment))
        .route("/{version}/payments/{id}/returns", post(return_payment))
        .route("/{version}/payments/{id}/void", post(void_payment))
        .route("/{version}/payments/{id}/continue", post(continue_payment))
        .route("/{version}/profiles", post(create_profile))
        .route(
            "/{version}/profiles/{id}",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route("/{version}/profiles/{id}/cards", get(get_cards).post(add_card))
        .route("/{version}/profiles/{id}/cards/{card_id}", put(update_card).delete(delete_card))
        .route("/{version}/reports", post(search_transactions))
        .route_layer(middleware::from_fn(require_passcode))
        .with_state(db);

    Router::new()
        .route("/scripts/tokenization/tokens", post(tokenize))
        .merge(api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_passcode(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == expected_authorization());
    if !authorized {
        tracing::warn!(uri = %request.uri(), "rejecting request with bad passcode");
        return failure(StatusCode::UNAUTHORIZED, 21, "Authentication failed").into_response();
    }
    next.run(request).await
}

fn failure(status: StatusCode, code: i64, message: &str) -> Reply {
    (status, Json(json!({ "code": code, "category": 1, "message": message, "reference": "" })))
}

fn success(extra: Value) -> Reply {
    let mut body = json!({ "code": 1, "message": "Operation Successful" });
    if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), extra) {
        body.extend(extra);
    }
    (StatusCode::OK, Json(body))
}

fn transaction_reply(transaction: Object) -> Reply {
    (StatusCode::OK, Json(Value::Object(transaction)))
}

fn is_complete(object: Option<&Value>) -> bool {
    object
        .and_then(|value| value.get("complete"))
        .and_then(Value::as_bool)
        .unwrap_or(true)
}

fn mask(number: &str) -> String {
    let hidden = number.chars().count().saturating_sub(4);
    number
        .chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { '*' } else { c })
        .collect()
}

// -- payments ---------------------------------------------------------------

async fn create_payment(State(db): State<Db>, Json(input): Json<Object>) -> Reply {
    let Some(amount) = input.get("amount").filter(|amount| amount.is_number()).cloned() else {
        return failure(StatusCode::BAD_REQUEST, 314, "Missing or invalid payment information");
    };
    let method = input.get("payment_method").and_then(Value::as_str).unwrap_or_default();

    let (code, complete) = match method {
        "card" => {
            let card = input.get("card");
            let number = card.and_then(|card| card.get("number")).and_then(Value::as_str);
            if number == Some(DECLINED_CARD) {
                return failure(StatusCode::PAYMENT_REQUIRED, 7, "DECLINE");
            }
            ("CC", is_complete(card))
        }
        "cash" => ("CA", true),
        "cheque" => ("CHQ", true),
        "token" => ("CC", is_complete(input.get("token"))),
        "payment_profile" => {
            let profile = input.get("payment_profile");
            let customer_code = profile
                .and_then(|profile| profile.get("customer_code"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            if !db.read().await.profiles.contains_key(customer_code) {
                return failure(StatusCode::NOT_FOUND, 19, "Invalid customer code");
            }
            ("CC", is_complete(profile))
        }
        "interac" => ("IO", true),
        _ => return failure(StatusCode::BAD_REQUEST, 52, "Invalid payment method"),
    };

    let kind = if complete { "P" } else { "PA" };
    let transaction = db
        .write()
        .await
        .record(kind, code, amount, input.get("order_number"));
    tracing::info!(id = %transaction["id"], kind, "payment recorded");
    transaction_reply(transaction)
}

async fn get_payment(State(db): State<Db>, Path((_version, id)): Path<(String, String)>) -> Reply {
    let store = db.read().await;
    match id.parse::<u64>().ok().and_then(|id| store.transactions.get(&id)) {
        Some(transaction) => transaction_reply(transaction.clone()),
        None => failure(StatusCode::NOT_FOUND, 404, "Transaction not found"),
    }
}

/// Follow-up on an existing transaction of one of `expected` types.
async fn follow_up(db: &Db, id: &str, expected: &[&str], kind: &str, input: &Object) -> Reply {
    let mut store = db.write().await;
    let original = id
        .parse::<u64>()
        .ok()
        .and_then(|id| store.transactions.get(&id))
        .cloned();
    let Some(original) = original else {
        return failure(StatusCode::NOT_FOUND, 404, "Transaction not found");
    };
    let original_type = original.get("type").and_then(Value::as_str).unwrap_or_default();
    if !expected.contains(&original_type) {
        return failure(StatusCode::BAD_REQUEST, 191, "Transaction type not allowed");
    }

    let amount = input.get("amount").cloned().unwrap_or(Value::Null);
    let within_original = match (amount.as_f64(), original.get("amount").and_then(Value::as_f64)) {
        (Some(requested), Some(available)) => requested <= available,
        _ => false,
    };
    if !within_original {
        return failure(StatusCode::BAD_REQUEST, 208, "Invalid amount");
    }

    let method = original.get("payment_method").and_then(Value::as_str).unwrap_or("CC").to_string();
    let order_number = input.get("order_number").or_else(|| original.get("order_number")).cloned();
    transaction_reply(store.record(kind, &method, amount, order_number.as_ref()))
}

async fn complete_payment(
    State(db): State<Db>,
    Path((_version, id)): Path<(String, String)>,
    Json(input): Json<Object>,
) -> Reply {
    follow_up(&db, &id, &["PA"], "PAC", &input).await
}

async fn return_payment(
    State(db): State<Db>,
    Path((_version, id)): Path<(String, String)>,
    Json(input): Json<Object>,
) -> Reply {
    if id == "0" {
        if input.get("merchant_id").and_then(Value::as_str) != Some(MERCHANT_ID) {
            return failure(StatusCode::BAD_REQUEST, 16, "Invalid merchant id");
        }
        let Some(amount) = input.get("amount").filter(|amount| amount.is_number()).cloned() else {
            return failure(StatusCode::BAD_REQUEST, 208, "Invalid amount");
        };
        let transaction = db
            .write()
            .await
            .record("R", "CC", amount, input.get("order_number"));
        return transaction_reply(transaction);
    }
    follow_up(&db, &id, &["P", "PAC"], "R", &input).await
}

async fn void_payment(
    State(db): State<Db>,
    Path((_version, id)): Path<(String, String)>,
    Json(input): Json<Object>,
) -> Reply {
    follow_up(&db, &id, &["P", "PAC", "R"], "VP", &input).await
}

async fn continue_payment(
    State(db): State<Db>,
    Path((_version, merchant_data)): Path<(String, String)>,
    Json(input): Json<Object>,
) -> Reply {
    if merchant_data.is_empty() {
        return failure(StatusCode::BAD_REQUEST, 314, "Missing merchant data");
    }
    let transaction = db
        .write()
        .await
        .record("P", "IO", json!(1.0), input.get("order_number"));
    transaction_reply(transaction)
}

// -- profiles ---------------------------------------------------------------

fn card_from(input: &Object, card_id: u32) -> Option<Object> {
    let mut card = input.get("card")?.as_object()?.clone();
    let number = card.get("number").and_then(Value::as_str).unwrap_or_default().to_string();
    card.insert("number".to_string(), json!(mask(&number)));
    card.remove("cvd");
    card.insert("card_id".to_string(), json!(card_id.to_string()));
    Some(card)
}

async fn create_profile(State(db): State<Db>, Json(input): Json<Object>) -> Reply {
    let customer_code = Uuid::new_v4().simple().to_string();
    let mut profile = Profile {
        customer_code: customer_code.clone(),
        fields: input.clone(),
        cards: Vec::new(),
        next_card_id: 1,
    };
    profile.fields.remove("card");
    if let Some(card) = card_from(&input, profile.next_card_id) {
        profile.cards.push(card);
        profile.next_card_id += 1;
    }
    db.write().await.profiles.insert(customer_code.clone(), profile);
    tracing::info!(%customer_code, "profile created");
    success(json!({ "customer_code": customer_code }))
}

async fn get_profile(State(db): State<Db>, Path((_version, id)): Path<(String, String)>) -> Reply {
    let store = db.read().await;
    let Some(profile) = store.profiles.get(&id) else {
        return failure(StatusCode::NOT_FOUND, 19, "Invalid customer code");
    };
    let mut body = profile.fields.clone();
    body.insert("customer_code".to_string(), json!(profile.customer_code));
    body.insert("status".to_string(), json!("A"));
    if let Some(card) = profile.cards.first() {
        body.insert("card".to_string(), Value::Object(card.clone()));
    }
    success(Value::Object(body))
}

async fn update_profile(
    State(db): State<Db>,
    Path((_version, id)): Path<(String, String)>,
    Json(input): Json<Object>,
) -> Reply {
    let mut store = db.write().await;
    let Some(profile) = store.profiles.get_mut(&id) else {
        return failure(StatusCode::NOT_FOUND, 19, "Invalid customer code");
    };
    profile.fields.extend(input);
    success(json!({}))
}

async fn delete_profile(State(db): State<Db>, Path((_version, id)): Path<(String, String)>) -> Reply {
    match db.write().await.profiles.remove(&id) {
        Some(_) => success(json!({ "customer_code": id })),
        None => failure(StatusCode::NOT_FOUND, 19, "Invalid customer code"),
    }
}

async fn get_cards(State(db): State<Db>, Path((_version, id)): Path<(String, String)>) -> Reply {
    match db.read().await.profiles.get(&id) {
        Some(profile) => success(json!({ "card": profile.cards })),
        None => failure(StatusCode::NOT_FOUND, 19, "Invalid customer code"),
    }
}

async fn add_card(
    State(db): State<Db>,
    Path((_version, id)): Path<(String, String)>,
    Json(input): Json<Object>,
) -> Reply {
    let mut store = db.write().await;
    let Some(profile) = store.profiles.get_mut(&id) else {
        return failure(StatusCode::NOT_FOUND, 19, "Invalid customer code");
    };
    let Some(card) = card_from(&input, profile.next_card_id) else {
        return failure(StatusCode::BAD_REQUEST, 52, "Missing card information");
    };
    profile.cards.push(card);
    profile.next_card_id += 1;
    success(json!({ "customer_code": id }))
}

async fn update_card(
    State(db): State<Db>,
    Path((_version, id, card_id)): Path<(String, String, String)>,
    Json(input): Json<Object>,
) -> Reply {
    let mut store = db.write().await;
    let Some(profile) = store.profiles.get_mut(&id) else {
        return failure(StatusCode::NOT_FOUND, 19, "Invalid customer code");
    };
    let Some(card) = profile
        .cards
        .iter_mut()
        .find(|card| card.get("card_id").and_then(Value::as_str) == Some(card_id.as_str()))
    else {
        return failure(StatusCode::NOT_FOUND, 20, "Invalid card id");
    };
    if let Some(changes) = input.get("card").and_then(Value::as_object) {
        card.extend(changes.clone());
    }
    success(json!({ "customer_code": id, "card": card.clone() }))
}

async fn delete_card(
    State(db): State<Db>,
    Path((_version, id, card_id)): Path<(String, String, String)>,
) -> Reply {
    let mut store = db.write().await;
    let Some(profile) = store.profiles.get_mut(&id) else {
        return failure(StatusCode::NOT_FOUND, 19, "Invalid customer code");
    };
    let before = profile.cards.len();
    profile
        .cards
        .retain(|card| card.get("card_id").and_then(Value::as_str) != Some(card_id.as_str()));
    if profile.cards.len() == before {
        return failure(StatusCode::NOT_FOUND, 20, "Invalid card id");
    }
    success(json!({ "customer_code": id }))
}

// -- reports and tokenization -------------------------------------------------

async fn search_transactions(State(db): State<Db>, Json(input): Json<Object>) -> Reply {
    if !input.contains_key("name") {
        return failure(StatusCode::BAD_REQUEST, 314, "Missing report name");
    }
    let row = |key: &str, default: usize| {
        input
            .get(key)
            .and_then(Value::as_str)
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(default)
    };
    let (start_row, end_row) = (row("start_row", 1).max(1), row("end_row", usize::MAX));

    let store = db.read().await;
    let mut ids: Vec<&u64> = store.transactions.keys().collect();
    ids.sort();
    let records: Vec<Value> = ids
        .into_iter()
        .enumerate()
        .map(|(index, id)| (index + 1, id))
        .filter(|(row_id, _)| (start_row..=end_row).contains(row_id))
        .map(|(row_id, id)| {
            let transaction = &store.transactions[id];
            json!({
                "row_id": row_id,
                "trn_id": id,
                "trn_type": transaction.get("type"),
                "trn_amount": transaction.get("amount"),
                "trn_order_number": transaction.get("order_number"),
            })
        })
        .collect();
    (StatusCode::OK, Json(json!({ "records": records })))
}

async fn tokenize(Json(input): Json<Object>) -> Reply {
    let valid = input
        .get("number")
        .and_then(Value::as_str)
        .is_some_and(|number| number.len() >= 12 && number.chars().all(|c| c.is_ascii_digit()));
    if !valid {
        return failure(StatusCode::BAD_REQUEST, 3, "Invalid card number");
    }
    let token = format!("gt7-{}", Uuid::new_v4());
    (StatusCode::OK, Json(json!({ "token": token, "code": 1, "version": 1, "message": "" })))
}
