//! Search configuration, read from the environment.

use std::time::Duration;

use chrono::TimeDelta;
use common::search_const::{CACHE_TTL_SECS, FACET_LIMIT, FACET_MIN_COUNT, PAGE_SIZE};
use tracing::warn;

pub const DEFAULT_SOLR_BASE_URL: &str = "http://127.0.0.1:8983/solr/eprocesso";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub solr_base_url: String,
    pub page_size: u64,
    pub cache_ttl_secs: u64,
    pub facet_limit: u64,
    pub facet_min_count: u64,
    pub http_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            solr_base_url: DEFAULT_SOLR_BASE_URL.to_string(),
            page_size: PAGE_SIZE,
            cache_ttl_secs: CACHE_TTL_SECS,
            facet_limit: FACET_LIMIT,
            facet_min_count: FACET_MIN_COUNT,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

fn ttl_from_secs(secs: u64) -> Option<TimeDelta> {
    TimeDelta::try_seconds(i64::try_from(secs).ok()?)
}

impl SearchConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; missing or unparseable values keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str, default: u64| -> u64 {
            let Some(raw) = lookup(key) else { return default };
            match raw.trim().parse::<u64>() {
                Ok(value) => value,
                Err(_) => {
                    warn!("{key}={raw:?} is not a number, using {default}");
                    default
                }
            }
        };
        Self {
            solr_base_url: lookup("SOLR_BASE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.solr_base_url),
            page_size: number("SEARCH_PAGE_SIZE", defaults.page_size).max(1),
            cache_ttl_secs: match number("SEARCH_CACHE_TTL_SECS", defaults.cache_ttl_secs) {
                secs if ttl_from_secs(secs).is_some() => secs,
                secs => {
                    warn!("SEARCH_CACHE_TTL_SECS={secs} is out of range, using {}", defaults.cache_ttl_secs);
                    defaults.cache_ttl_secs
                }
            },
            facet_limit: number("SEARCH_FACET_LIMIT", defaults.facet_limit),
            facet_min_count: number("SEARCH_FACET_MIN_COUNT", defaults.facet_min_count),
            http_timeout_secs: number("SEARCH_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
        }
    }

    /// Falls back to the default TTL when the configured one does not fit a `TimeDelta`.
    pub fn cache_ttl(&self) -> TimeDelta {
        ttl_from_secs(self.cache_ttl_secs).unwrap_or_else(|| {
            warn!("cache ttl of {}s is out of range, using {}s", self.cache_ttl_secs, CACHE_TTL_SECS);
            TimeDelta::seconds(CACHE_TTL_SECS as i64)
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn select_url(&self) -> String {
        format!("{}/select", self.solr_base_url)
    }
}
