//! Payment profiles (stored customers) and the cards attached to them.

use std::fmt::Display;
use std::sync::Arc;

use serde_json::Value;

use crate::config::{Configuration, Credential};
use crate::endpoints::Endpoints;
use crate::error::{Error, Result};
use crate::executor::HttpExecutor;
use crate::http::HttpMethod;
use crate::transport::Transport;
use crate::types::Payload;

/// Client for the `/profiles` family of endpoints.
///
/// Update and delete calls return `true` on success; the gateway's answer
/// to them carries nothing worth handing back.
#[derive(Debug, Clone)]
pub struct Profiles {
    endpoints: Endpoints,
    transport: Transport,
}

impl Profiles {
    pub fn new(config: &Configuration, executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            endpoints: Endpoints::from_config(config),
            transport: Transport::new(Credential::derive(config), executor),
        }
    }

    /// Create a profile and return its customer code.
    pub fn create_profile(&self, data: Option<Payload>) -> Result<String> {
        let result = self
            .transport
            .send(Some(HttpMethod::Post), &self.endpoints.profiles_url(), data.as_ref())?;

        match result.get("customer_code") {
            Some(Value::String(code)) => Ok(code.clone()),
            Some(Value::Null) | None => Err(Error::api("No Customer Code Received", 0)),
            Some(other) => Ok(other.to_string()),
        }
    }

    pub fn get_profile(&self, profile_id: &str) -> Result<Payload> {
        self.transport
            .send(Some(HttpMethod::Get), &self.endpoints.profile_url(profile_id), None)
    }

    pub fn update_profile(&self, profile_id: &str, data: Option<Payload>) -> Result<bool> {
        self.transport
            .send(Some(HttpMethod::Put), &self.endpoints.profile_url(profile_id), data.as_ref())?;
        Ok(true)
    }

    pub fn delete_profile(&self, profile_id: &str) -> Result<bool> {
        self.transport
            .send(Some(HttpMethod::Delete), &self.endpoints.profile_url(profile_id), None)?;
        Ok(true)
    }

    pub fn get_cards(&self, profile_id: &str) -> Result<Payload> {
        self.transport
            .send(Some(HttpMethod::Get), &self.endpoints.cards_url(profile_id), None)
    }

    /// Attach a card. The gateway does not return the new card's id, so
    /// callers that need it must list the cards afterwards.
    pub fn add_card(&self, profile_id: &str, data: Option<Payload>) -> Result<bool> {
        self.transport
            .send(Some(HttpMethod::Post), &self.endpoints.cards_url(profile_id), data.as_ref())?;
        Ok(true)
    }

    pub fn update_card(&self, profile_id: &str, card_id: impl Display, data: Option<Payload>) -> Result<Payload> {
        self.transport.send(
            Some(HttpMethod::Put),
            &self.endpoints.card_url(profile_id, card_id),
            data.as_ref(),
        )
    }

    pub fn delete_card(&self, profile_id: &str, card_id: impl Display) -> Result<bool> {
        self.transport.send(
            Some(HttpMethod::Delete),
            &self.endpoints.card_url(profile_id, card_id),
            None,
        )?;
        Ok(true)
    }
}
