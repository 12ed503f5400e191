//! URL construction for every gateway action.
//!
//! # Design
//! Templates are assembled once from the platform's base host and carry
//! positional placeholders: `{0}` platform, `{1}` API version, `{2}` resource
//! id and `{3}` sub-resource id. Each accessor fills them by plain string
//! replacement. Nothing is percent-encoded; callers pass URL-safe ids.

use std::fmt::Display;

use crate::config::Configuration;

/// Platform that still routes to the legacy Beanstream host.
pub const LEGACY_PLATFORM: &str = "www";

const BAMBORA_HOST: &str = "https://{0}.na.bambora.com";
const BEANSTREAM_HOST: &str = "https://{0}.beanstream.com";
const TOKENIZATION_PATH: &str = "/scripts/tokenization/tokens";

/// URL templates for one platform and API version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    platform: String,
    version: String,
    payments: String,
    payment: String,
    completions: String,
    returns: String,
    unreferenced_returns: String,
    void: String,
    continuations: String,
    tokenization: String,
    profiles: String,
    profile: String,
    cards: String,
    card: String,
    reports: String,
}

impl Endpoints {
    pub fn new(platform: &str, version: &str) -> Self {
        let legacy = platform == LEGACY_PLATFORM;
        let base = if legacy {
            format!("{BEANSTREAM_HOST}/api")
        } else {
            BAMBORA_HOST.to_string()
        };

        let payments = format!("{base}/{{1}}/payments");
        let profiles = format!("{base}/{{1}}/profiles");
        let profile = format!("{profiles}/{{2}}");
        let cards = format!("{profile}/cards");
        let tokenization = if legacy {
            format!("{BEANSTREAM_HOST}{TOKENIZATION_PATH}")
        } else {
            format!("{base}{TOKENIZATION_PATH}")
        };

        Self {
            platform: platform.to_string(),
            version: version.to_string(),
            payment: format!("{payments}/{{2}}"),
            completions: format!("{payments}/{{2}}/completions"),
            returns: format!("{payments}/{{2}}/returns"),
            unreferenced_returns: format!("{payments}/0/returns"),
            void: format!("{payments}/{{2}}/void"),
            continuations: format!("{payments}/{{2}}/continue"),
            tokenization,
            card: format!("{cards}/{{3}}"),
            cards,
            profile,
            profiles,
            reports: format!("{base}/{{1}}/reports"),
            payments,
        }
    }

    pub fn from_config(config: &Configuration) -> Self {
        Self::new(config.platform(), config.api_version())
    }

    // -- payments ---------------------------------------------------------

    pub fn payments_url(&self) -> String {
        self.fill(&self.payments, &[])
    }

    /// Resumes a redirect-based payment; `merchant_data` is substituted as is.
    pub fn continuations_url(&self, merchant_data: impl Display) -> String {
        self.fill(&self.continuations, &[&merchant_data.to_string()])
    }

    pub fn pre_auth_completions_url(&self, transaction_id: impl Display) -> String {
        self.fill(&self.completions, &[&transaction_id.to_string()])
    }

    pub fn returns_url(&self, transaction_id: impl Display) -> String {
        self.fill(&self.returns, &[&transaction_id.to_string()])
    }

    /// Returns without a prior transaction are posted against transaction `0`.
    pub fn unreferenced_returns_url(&self) -> String {
        self.fill(&self.unreferenced_returns, &[])
    }

    pub fn voids_url(&self, transaction_id: impl Display) -> String {
        self.fill(&self.void, &[&transaction_id.to_string()])
    }

    pub fn token_url(&self) -> String {
        self.fill(&self.tokenization, &[])
    }

    // -- profiles ---------------------------------------------------------

    pub fn profiles_url(&self) -> String {
        self.fill(&self.profiles, &[])
    }

    pub fn profile_url(&self, profile_id: impl Display) -> String {
        self.fill(&self.profile, &[&profile_id.to_string()])
    }

    pub fn cards_url(&self, profile_id: impl Display) -> String {
        self.fill(&self.cards, &[&profile_id.to_string()])
    }

    pub fn card_url(&self, profile_id: impl Display, card_id: impl Display) -> String {
        self.fill(&self.card, &[&profile_id.to_string(), &card_id.to_string()])
    }

    // -- reporting --------------------------------------------------------

    pub fn reports_url(&self) -> String {
        self.fill(&self.reports, &[])
    }

    pub fn payment_url(&self, transaction_id: impl Display) -> String {
        self.fill(&self.payment, &[&transaction_id.to_string()])
    }

    /// Replace `{0}`, `{1}` and then `{2}`, `{3}`, ... in order.
    fn fill(&self, template: &str, params: &[&str]) -> String {
        let mut url = template
            .replace("{0}", &self.platform)
            .replace("{1}", &self.version);
        for (index, param) in params.iter().enumerate() {
            url = url.replace(&format!("{{{}}}", index + 2), param);
        }
        url
    }
}
