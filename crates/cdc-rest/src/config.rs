//! Client configuration

use cdc_auth::Credentials;
use cdc_types::RateBudget;
use std::time::Duration;

use crate::hooks::PacerHooks;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default user agent
pub const DEFAULT_USER_AGENT: &str = concat!("cdc-rest/", env!("CARGO_PKG_VERSION"));

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API credentials (optional)
    pub credentials: Option<Credentials>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// Base URL override (defaults to the protocol variant's URL)
    pub base_url: Option<String>,
    /// Normal and cooldown request rates
    pub rate_budget: RateBudget,
    /// Maximum number of retries after rate-limit rejections
    ///
    /// `None` retries until the server accepts the request.
    pub max_rate_limit_retries: Option<u32>,
    /// Pacer observability hooks
    pub pacer_hooks: PacerHooks,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            base_url: None,
            rate_budget: RateBudget::defaults(),
            max_rate_limit_retries: None,
            pacer_hooks: PacerHooks::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set credentials
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the base URL (e.g. a sandbox or a local mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the pacing budget
    pub fn with_rate_budget(mut self, budget: RateBudget) -> Self {
        self.rate_budget = budget;
        self
    }

    /// Give up after `retries` consecutive rate-limit rejections
    pub fn with_max_rate_limit_retries(mut self, retries: u32) -> Self {
        self.max_rate_limit_retries = Some(retries);
        self
    }

    /// Install pacer hooks
    pub fn with_pacer_hooks(mut self, hooks: PacerHooks) -> Self {
        self.pacer_hooks = hooks;
        self
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// User agent to send
    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}
