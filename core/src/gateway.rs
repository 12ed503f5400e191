//! Top-level facade tying the resource clients to one merchant account.

use std::sync::Arc;

use crate::config::Configuration;
use crate::executor::{HttpExecutor, UreqExecutor};
use crate::payments::Payments;
use crate::profiles::Profiles;
use crate::reporting::Reporting;

/// Entry point for a merchant account.
///
/// Owns the configuration; each resource client derives its endpoints and
/// credential from it once, at construction. All clients share one executor.
///
/// ```no_run
/// use beanstream_core::{Configuration, Gateway};
///
/// let gateway = Gateway::new(Configuration::new("300200578", "api-passcode", "api", "v1"));
/// let profile_id = gateway.profiles().create_profile(None)?;
/// let cards = gateway.profiles().get_cards(&profile_id)?;
/// # Ok::<(), beanstream_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Gateway {
    config: Configuration,
    payments: Payments,
    profiles: Profiles,
    reporting: Reporting,
}

impl Gateway {
    /// Facade over a blocking HTTPS executor with a 30 second timeout.
    pub fn new(config: Configuration) -> Self {
        Self::with_executor(config, Arc::new(UreqExecutor::new()))
    }

    pub fn with_executor(config: Configuration, executor: Arc<dyn HttpExecutor>) -> Self {
        Self {
            payments: Payments::new(&config, executor.clone()),
            profiles: Profiles::new(&config, executor.clone()),
            reporting: Reporting::new(&config, executor),
            config,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn payments(&self) -> &Payments {
        &self.payments
    }

    pub fn profiles(&self) -> &Profiles {
        &self.profiles
    }

    pub fn reporting(&self) -> &Reporting {
        &self.reporting
    }
}
