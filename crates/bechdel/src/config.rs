//! Runtime settings for the search controller and the provider.
//!
//! Every value has a default and can be overridden from the environment.
//! Unparseable or out-of-range overrides fall back to the default.

use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://bechdeltest.com/api/v1";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_CACHE_CAPACITY: u64 = 256;
const DEFAULT_USER_AGENT: &str = concat!("bechdel/", env!("CARGO_PKG_VERSION"));

/// What the controller does with a failed lookup besides logging it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Show "no results" and nothing else.
    #[default]
    DegradeToEmpty,
    /// Also expose the failure in the published snapshot.
    Surface,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub api_base_url: String,
    pub user_agent: String,
    /// Quiescence window between the last keystroke and the lookup.
    pub debounce: Duration,
    pub lookup_timeout: Duration,
    pub failure_policy: FailurePolicy,
    /// Zero disables the result cache.
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
            failure_policy: FailurePolicy::default(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl SearchSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_base_url = read("BECHDEL_API_BASE_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        let user_agent = read("BECHDEL_USER_AGENT").unwrap_or(defaults.user_agent);
        let debounce = read("BECHDEL_DEBOUNCE_MS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.debounce);
        let lookup_timeout = read("BECHDEL_LOOKUP_TIMEOUT_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.lookup_timeout);
        let failure_policy = match read("BECHDEL_SURFACE_LOOKUP_ERRORS").as_deref().map(str::trim) {
            Some("1" | "true" | "yes") => FailurePolicy::Surface,
            _ => FailurePolicy::DegradeToEmpty,
        };
        let cache_ttl = read("BECHDEL_CACHE_TTL_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);
        let cache_capacity = read("BECHDEL_CACHE_CAPACITY")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(defaults.cache_capacity);

        Self {
            api_base_url,
            user_agent,
            debounce,
            lookup_timeout,
            failure_policy,
            cache_ttl,
            cache_capacity,
        }
    }

    pub fn cache_enabled(&self) -> bool {
        !self.cache_ttl.is_zero()
    }
}
