//! Payment operations: purchases, pre-auth completions, returns, voids and
//! tokenized payments.
//!
//! # Design
//! Each method resolves one endpoint, shapes a payload and sends it as a
//! POST. Shaping comes in two flavours:
//! - pass-through operations take the caller's payload and force a few
//!   fields on top (`payment_method`, completion flags, merchant id);
//! - follow-up operations on an existing transaction (complete, return,
//!   void) build their payload from scratch.
//!
//! `complete` arguments take any JSON value. Only an explicit boolean is
//! honoured; anything else, including `None`, means `true`.

use std::fmt::Display;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::{Configuration, Credential};
use crate::endpoints::Endpoints;
use crate::error::{Error, Result};
use crate::executor::HttpExecutor;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{completion_flag, object_entry, Payload};

/// Client for the `/payments` family of endpoints.
#[derive(Debug, Clone)]
pub struct Payments {
    endpoints: Endpoints,
    transport: Transport,
    merchant_id: String,
}

impl Payments {
    pub fn new(config: &Configuration, executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            endpoints: Endpoints::from_config(config),
            transport: Transport::new(Credential::derive(config), executor),
            merchant_id: config.merchant_id().to_string(),
        }
    }

    /// Generic payment; `data` is sent exactly as given, and `None` sends
    /// no body at all.
    pub fn make_payment(&self, data: Option<Payload>) -> Result<Payload> {
        self.post(&self.endpoints.payments_url(), data.as_ref())
    }

    /// Card payment. Forces `payment_method = "card"` and sets
    /// `card.complete`; pass `false` for a pre-authorization.
    pub fn make_card_payment(&self, data: Option<Payload>, complete: Option<Value>) -> Result<Payload> {
        let mut data = data.unwrap_or_default();
        data.insert("payment_method".to_string(), json!("card"));
        object_entry(&mut data, "card").insert("complete".to_string(), json!(completion_flag(complete.as_ref())));
        self.post(&self.endpoints.payments_url(), Some(&data))
    }

    /// Second leg of a redirect payment such as Interac Online.
    pub fn continue_payment(&self, data: Option<Payload>, merchant_data: impl Display) -> Result<Payload> {
        let url = self.endpoints.continuations_url(merchant_data);
        self.post(&url, data.as_ref())
    }

    /// Capture a pre-authorized transaction.
    pub fn complete(&self, transaction_id: impl Display, amount: f64, order_number: Option<&str>) -> Result<Payload> {
        let mut data = Payload::new();
        data.insert("card".to_string(), json!({ "complete": true }));
        data.insert("amount".to_string(), json!(amount));
        if let Some(order_number) = order_number {
            data.insert("order_number".to_string(), json!(order_number));
        }
        self.post(&self.endpoints.pre_auth_completions_url(transaction_id), Some(&data))
    }

    pub fn make_cash_payment(&self, data: Option<Payload>) -> Result<Payload> {
        self.post_with_method(data, "cash")
    }

    pub fn make_cheque_payment(&self, data: Option<Payload>) -> Result<Payload> {
        self.post_with_method(data, "cheque")
    }

    /// Refund part or all of an earlier transaction.
    pub fn return_payment(
        &self,
        transaction_id: impl Display,
        amount: f64,
        order_number: Option<&str>,
    ) -> Result<Payload> {
        let mut data = Payload::new();
        data.insert("amount".to_string(), json!(amount));
        if let Some(order_number) = order_number {
            data.insert("order_number".to_string(), json!(order_number));
        }
        self.post(&self.endpoints.returns_url(transaction_id), Some(&data))
    }

    /// Refund with full card or swipe data and no original transaction.
    /// The configured merchant id is added to `data`.
    pub fn unreferenced_return(&self, data: Option<Payload>) -> Result<Payload> {
        let mut data = data.unwrap_or_default();
        data.insert("merchant_id".to_string(), json!(self.merchant_id));
        self.post(&self.endpoints.unreferenced_returns_url(), Some(&data))
    }

    pub fn void_payment(&self, transaction_id: impl Display, amount: f64) -> Result<Payload> {
        let mut data = Payload::new();
        data.insert("amount".to_string(), json!(amount));
        self.post(&self.endpoints.voids_url(transaction_id), Some(&data))
    }

    /// Charge a card stored on a payment profile.
    pub fn make_profile_payment(
        &self,
        profile_id: &str,
        card_id: impl Display,
        data: Option<Payload>,
        complete: Option<Value>,
    ) -> Result<Payload> {
        let mut data = data.unwrap_or_default();
        data.insert("payment_method".to_string(), json!("payment_profile"));
        data.insert(
            "payment_profile".to_string(),
            json!({
                "complete": completion_flag(complete.as_ref()),
                "customer_code": profile_id,
                "card_id": card_id.to_string(),
            }),
        );
        self.post(&self.endpoints.payments_url(), Some(&data))
    }

    /// Request a single-use token from the tokenization script endpoint.
    ///
    /// Meant for testing token payments; production tokens come from the
    /// browser-side tokenization flow.
    pub fn get_token_test(&self, data: Option<Payload>) -> Result<String> {
        let mut data = data.unwrap_or_default();
        data.insert("payment_method".to_string(), json!("token"));
        let result = self.post(&self.endpoints.token_url(), Some(&data))?;

        match result.get("token") {
            Some(Value::String(token)) => Ok(token.clone()),
            Some(Value::Null) | None => Err(Error::api("No Token Received", 0)),
            Some(other) => Ok(other.to_string()),
        }
    }

    /// Pay with a Legato token. `token.name` is taken from `data.name`.
    pub fn make_legato_token_payment(
        &self,
        token: &str,
        data: Option<Payload>,
        complete: Option<Value>,
    ) -> Result<Payload> {
        let mut data = data.unwrap_or_default();
        data.insert("payment_method".to_string(), json!("token"));
        let name = data
            .get("name")
            .filter(|name| !name.is_null())
            .cloned()
            .unwrap_or_else(|| json!(""));

        let token_fields = object_entry(&mut data, "token");
        token_fields.insert("code".to_string(), json!(token));
        token_fields.insert("name".to_string(), name);
        token_fields.insert("complete".to_string(), json!(completion_flag(complete.as_ref())));

        self.post(&self.endpoints.payments_url(), Some(&data))
    }

    fn post_with_method(&self, data: Option<Payload>, payment_method: &str) -> Result<Payload> {
        let mut data = data.unwrap_or_default();
        data.insert("payment_method".to_string(), json!(payment_method));
        self.post(&self.endpoints.payments_url(), Some(&data))
    }

    fn post(&self, url: &str, data: Option<&Payload>) -> Result<Payload> {
        self.transport.send(Some(HttpMethod::Post), url, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubExecutor;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://api.na.bambora.com/v1";

    fn payments(executor: &Arc<StubExecutor>) -> Payments {
        Payments::new(&Configuration::with_defaults("300200578", "apikey"), executor.clone())
    }

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    fn card_order() -> Payload {
        payload(json!({
            "order_number": "ord-1",
            "amount": 1.0,
            "card": {
                "name": "Mr. Card Testerson",
                "number": "4030000010001234",
                "expiry_month": "07",
                "expiry_year": "22",
                "cvd": "123"
            }
        }))
    }

    #[test]
    fn make_payment_passes_data_through() {
        let executor = StubExecutor::new();
        let data = payload(json!({"amount": 5.0, "payment_method": "card", "custom": [1, 2]}));
        payments(&executor).make_payment(Some(data.clone())).unwrap();

        let req = executor.last_request();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE}/payments"));
        assert_eq!(executor.last_body(), Value::Object(data));
    }

    #[test]
    fn make_payment_without_data_sends_no_body() {
        let executor = StubExecutor::new();
        payments(&executor).make_payment(None).unwrap();

        let req = executor.last_request();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.body, None);
    }

    #[test]
    fn continue_payment_without_data_sends_no_body() {
        let executor = StubExecutor::new();
        payments(&executor).continue_payment(None, "md-123").unwrap();
        assert_eq!(executor.last_request().body, None);
    }

    #[test]
    fn card_payment_defaults_complete_to_true() {
        let executor = StubExecutor::new();
        payments(&executor).make_card_payment(Some(card_order()), None).unwrap();

        let body = executor.last_body();
        assert_eq!(body["payment_method"], "card");
        assert_eq!(body["card"]["complete"], true);
        assert_eq!(body["card"]["number"], "4030000010001234");
    }

    #[test]
    fn card_payment_coerces_non_boolean_complete() {
        let executor = StubExecutor::new();
        payments(&executor).make_card_payment(Some(card_order()), Some(json!("yes"))).unwrap();
        assert_eq!(executor.last_body()["card"]["complete"], true);
    }

    #[test]
    fn card_payment_honours_explicit_false() {
        let executor = StubExecutor::new();
        payments(&executor).make_card_payment(Some(card_order()), Some(json!(false))).unwrap();
        assert_eq!(executor.last_body()["card"]["complete"], false);
    }

    #[test]
    fn card_payment_without_data_builds_card_object() {
        let executor = StubExecutor::new();
        payments(&executor).make_card_payment(None, None).unwrap();
        assert_eq!(executor.last_body(), json!({"payment_method": "card", "card": {"complete": true}}));
    }

    #[test]
    fn continue_payment_targets_merchant_data() {
        let executor = StubExecutor::new();
        payments(&executor)
            .continue_payment(Some(payload(json!({"payment_method": "interac"}))), "md-123")
            .unwrap();
        assert_eq!(executor.last_request().url, format!("{BASE}/payments/md-123/continue"));
    }

    #[test]
    fn complete_builds_payload_from_scratch() {
        let executor = StubExecutor::new();
        payments(&executor).complete("10000020", 9.5, Some("ord-7")).unwrap();

        assert_eq!(executor.last_request().url, format!("{BASE}/payments/10000020/completions"));
        assert_eq!(
            executor.last_body(),
            json!({"card": {"complete": true}, "amount": 9.5, "order_number": "ord-7"})
        );
    }

    #[test]
    fn complete_without_order_number_omits_it() {
        let executor = StubExecutor::new();
        payments(&executor).complete(10000020, 9.5, None).unwrap();
        assert_eq!(executor.last_body(), json!({"card": {"complete": true}, "amount": 9.5}));
    }

    #[test]
    fn cash_and_cheque_force_payment_method() {
        let executor = StubExecutor::new();
        let client = payments(&executor);

        client.make_cash_payment(Some(payload(json!({"amount": 3.0, "payment_method": "card"})))).unwrap();
        assert_eq!(executor.last_body()["payment_method"], "cash");

        client.make_cheque_payment(None).unwrap();
        assert_eq!(executor.last_body(), json!({"payment_method": "cheque"}));
    }

    #[test]
    fn return_payment_posts_amount_and_order_number() {
        let executor = StubExecutor::new();
        payments(&executor).return_payment("10000021", 1.0, Some("ord-1")).unwrap();
        assert_eq!(executor.last_request().url, format!("{BASE}/payments/10000021/returns"));
        assert_eq!(executor.last_body(), json!({"amount": 1.0, "order_number": "ord-1"}));
    }

    #[test]
    fn unreferenced_return_injects_merchant_id_and_zero_sentinel() {
        let executor = StubExecutor::new();
        let mut data = card_order();
        data.insert("payment_method".to_string(), json!("card"));
        payments(&executor).unreferenced_return(Some(data)).unwrap();

        let req = executor.last_request();
        assert_eq!(req.url, format!("{BASE}/payments/0/returns"));
        let body = executor.last_body();
        assert_eq!(body["merchant_id"], "300200578");
        assert_eq!(body["card"]["cvd"], "123");
    }

    #[test]
    fn void_payment_posts_amount_only() {
        let executor = StubExecutor::new();
        payments(&executor).void_payment("12345", 4.0).unwrap();
        assert!(executor.last_request().url.ends_with("/v1/payments/12345/void"));
        assert_eq!(executor.last_body(), json!({"amount": 4.0}));
    }

    #[test]
    fn profile_payment_stringifies_card_id() {
        let executor = StubExecutor::new();
        payments(&executor)
            .make_profile_payment("CUST01", 1, Some(payload(json!({"amount": 2.0}))), Some(json!(1)))
            .unwrap();
        assert_eq!(
            executor.last_body(),
            json!({
                "amount": 2.0,
                "payment_method": "payment_profile",
                "payment_profile": {"complete": true, "customer_code": "CUST01", "card_id": "1"}
            })
        );
    }

    #[test]
    fn token_test_returns_only_the_token() {
        let executor = StubExecutor::new();
        executor.push_json(200, json!({"token": "gt7-0f2e", "code": 1, "message": ""}));
        let token = payments(&executor)
            .get_token_test(Some(payload(json!({"number": "4030000010001234"}))))
            .unwrap();

        assert_eq!(token, "gt7-0f2e");
        assert_eq!(executor.last_request().url, "https://api.na.bambora.com/scripts/tokenization/tokens");
        assert_eq!(executor.last_body()["payment_method"], "token");
    }

    #[test]
    fn token_test_without_token_is_an_api_error() {
        let executor = StubExecutor::new();
        executor.push_json(200, json!({"code": 1, "message": "ok"}));
        let err = payments(&executor).get_token_test(None).unwrap_err();
        assert_eq!(err, Error::api("No Token Received", 0));
    }

    #[test]
    fn legato_payment_builds_token_object() {
        let executor = StubExecutor::new();
        let data = payload(json!({"order_number": "ord-3", "amount": 1.0, "name": "Mrs. Legato Testerson"}));
        payments(&executor).make_legato_token_payment("gt7-0f2e", Some(data), None).unwrap();

        let body = executor.last_body();
        assert_eq!(body["payment_method"], "token");
        assert_eq!(body["token"], json!({"code": "gt7-0f2e", "name": "Mrs. Legato Testerson", "complete": true}));
    }

    #[test]
    fn legato_payment_defaults_name_to_empty() {
        let executor = StubExecutor::new();
        payments(&executor).make_legato_token_payment("tok", None, Some(json!(false))).unwrap();
        assert_eq!(executor.last_body()["token"], json!({"code": "tok", "name": "", "complete": false}));
    }

    #[test]
    fn legato_payment_replaces_null_name_with_empty() {
        let executor = StubExecutor::new();
        payments(&executor)
            .make_legato_token_payment("tok", Some(payload(json!({"name": null}))), None)
            .unwrap();
        assert_eq!(executor.last_body()["token"]["name"], "");
    }

    #[test]
    fn api_errors_propagate_unchanged() {
        let executor = StubExecutor::new();
        executor.push_json(402, json!({"code": 7, "message": "DECLINE"}));
        let err = payments(&executor).make_card_payment(Some(card_order()), None).unwrap_err();
        assert_eq!(err, Error::api("DECLINE", 7));
    }
}
