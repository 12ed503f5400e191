//! Merchant configuration and the credential derived from it.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Platform used when none is given explicitly.
pub const DEFAULT_PLATFORM: &str = "api";

/// API version used when none is given explicitly.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Merchant account settings for one gateway facade.
///
/// Immutable once built. Resource clients borrow it at construction and
/// copy out only what they need.
#[derive(Clone, PartialEq, Eq)]
pub struct Configuration {
    merchant_id: String,
    api_key: String,
    platform: String,
    api_version: String,
}

impl Configuration {
    pub fn new(
        merchant_id: impl Into<String>,
        api_key: impl Into<String>,
        platform: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            api_key: api_key.into(),
            platform: platform.into(),
            api_version: api_version.into(),
        }
    }

    /// Configuration for the default `api` platform and `v1` API.
    pub fn with_defaults(merchant_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::new(merchant_id, api_key, DEFAULT_PLATFORM, DEFAULT_API_VERSION)
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("merchant_id", &self.merchant_id)
            .field("api_key", &"<redacted>")
            .field("platform", &self.platform)
            .field("api_version", &self.api_version)
            .finish()
    }
}

/// Base64 of `merchant_id:api_key`, sent as a `Passcode` authorization.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn derive(config: &Configuration) -> Self {
        Self(STANDARD.encode(format!("{}:{}", config.merchant_id, config.api_key)))
    }

    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("Passcode {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
