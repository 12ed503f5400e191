//! Transaction reporting.

use std::fmt::Display;
use std::sync::Arc;

use crate::config::{Configuration, Credential};
use crate::endpoints::Endpoints;
use crate::error::Result;
use crate::executor::HttpExecutor;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::{Payload, TransactionSearch};

#[derive(Debug, Clone)]
pub struct Reporting {
    endpoints: Endpoints,
    transport: Transport,
}

impl Reporting {
    pub fn new(config: &Configuration, executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            endpoints: Endpoints::from_config(config),
            transport: Transport::new(Credential::derive(config), executor),
        }
    }

    /// Run a report with raw search criteria.
    pub fn get_transactions(&self, criteria: Payload) -> Result<Payload> {
        self.transport
            .send(Some(HttpMethod::Post), &self.endpoints.reports_url(), Some(&criteria))
    }

    pub fn search(&self, search: &TransactionSearch) -> Result<Payload> {
        self.get_transactions(search.to_payload())
    }

    pub fn get_transaction(&self, transaction_id: impl Display) -> Result<Payload> {
        self.transport
            .send(Some(HttpMethod::Get), &self.endpoints.payment_url(transaction_id), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubExecutor;
    use crate::types::Operator;
    use serde_json::json;

    fn reporting(executor: &Arc<StubExecutor>) -> Reporting {
        Reporting::new(&Configuration::with_defaults("300200578", "apikey"), executor.clone())
    }

    #[test]
    fn get_transactions_posts_criteria() {
        let executor = StubExecutor::new();
        executor.push_json(200, json!({"records": [{"trn_id": 10000001}]}));
        let criteria = json!({"name": "TransHistoryMinimal", "start_row": "1", "end_row": "10"});
        let result = reporting(&executor)
            .get_transactions(criteria.as_object().cloned().unwrap())
            .unwrap();

        assert_eq!(result["records"][0]["trn_id"], 10000001);
        let req = executor.last_request();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "https://api.na.bambora.com/v1/reports");
        assert_eq!(executor.last_body(), criteria);
    }

    #[test]
    fn search_renders_typed_criteria() {
        let executor = StubExecutor::new();
        let search = TransactionSearch::new("Search", "2024-01-01T00:00:00", "2024-01-31T23:59:59")
            .with_criterion("1", Operator::Equals, "10000001");
        reporting(&executor).search(&search).unwrap();
        assert_eq!(executor.last_body()["criteria"][0]["operator"], "%3D");
    }

    #[test]
    fn get_transaction_is_a_get_by_id() {
        let executor = StubExecutor::new();
        reporting(&executor).get_transaction(10000001).unwrap();
        let req = executor.last_request();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api.na.bambora.com/v1/payments/10000001");
        assert!(req.body.is_none());
    }
}
