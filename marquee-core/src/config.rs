//! Centralized configuration for Marquee.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

use crate::suggest::MediaKind;

/// Central configuration for all Marquee components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct MarqueeConfig {
    pub tmdb: TmdbConfig,
    pub suggest: SuggestConfig,
}

/// Upstream movie metadata API configuration.
///
/// Controls where catalog requests go, how long they may take, and which
/// key authenticates them.
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// API key sent with every request (None = catalog unavailable)
    pub api_key: Option<String>,
    /// Base URL of the REST API, without trailing slash
    pub base_url: String,
    /// Base URL for poster images
    pub image_base_url: String,
    /// HTTP request timeout
    pub request_timeout: Duration,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            request_timeout: Duration::from_secs(10),
            user_agent: "marquee/0.1.0",
        }
    }
}

/// Search suggestion controller configuration.
///
/// Controls debounce and dismissal timing along with the query threshold
/// and how many suggestions the dropdown shows.
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    /// Quiet period after the last keystroke before a fetch is issued
    pub debounce: Duration,
    /// Grace period before the dropdown hides after the pointer leaves
    pub hide_delay: Duration,
    /// Minimum trimmed query length (in characters) worth querying
    pub min_query_chars: usize,
    /// Maximum number of suggestions kept from one response
    pub max_suggestions: usize,
    /// Content kind used until the user picks another
    pub default_kind: MediaKind,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            hide_delay: Duration::from_millis(200),
            min_query_chars: 2,
            max_suggestions: 5,
            default_kind: MediaKind::Movie,
        }
    }
}

impl SuggestConfig {
    /// Creates a configuration with zero delays for tests that run on a real clock.
    pub fn instant() -> Self {
        Self {
            debounce: Duration::ZERO,
            hide_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

impl MarqueeConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(api_key) = std::env::var("TMDB_API_KEY")
            && !api_key.trim().is_empty()
        {
            config.tmdb.api_key = Some(api_key.trim().to_string());
        }

        if let Ok(base_url) = std::env::var("MARQUEE_TMDB_BASE_URL") {
            config.tmdb.base_url = base_url.trim_end_matches('/').to_string();
        }

        if let Ok(timeout) = std::env::var("MARQUEE_REQUEST_TIMEOUT_SECS")
            && let Ok(seconds) = timeout.parse::<u64>()
        {
            config.tmdb.request_timeout = Duration::from_secs(seconds);
        }

        // Suggestion controller overrides
        if let Ok(debounce) = std::env::var("MARQUEE_DEBOUNCE_MS")
            && let Ok(millis) = debounce.parse::<u64>()
        {
            config.suggest.debounce = Duration::from_millis(millis);
        }

        if let Ok(hide_delay) = std::env::var("MARQUEE_HIDE_DELAY_MS")
            && let Ok(millis) = hide_delay.parse::<u64>()
        {
            config.suggest.hide_delay = Duration::from_millis(millis);
        }

        if let Ok(min_chars) = std::env::var("MARQUEE_MIN_QUERY_CHARS")
            && let Ok(count) = min_chars.parse::<usize>()
        {
            config.suggest.min_query_chars = count.max(1);
        }

        if let Ok(max_suggestions) = std::env::var("MARQUEE_MAX_SUGGESTIONS")
            && let Ok(count) = max_suggestions.parse::<usize>()
        {
            config.suggest.max_suggestions = count.max(1);
        }

        config
    }

    /// Creates a configuration suitable for tests against a local upstream.
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            tmdb: TmdbConfig {
                api_key: Some("test-key".to_string()),
                base_url: base_url.trim_end_matches('/').to_string(),
                request_timeout: Duration::from_secs(5),
                ..TmdbConfig::default()
            },
            suggest: SuggestConfig::instant(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_suggest_timing() {
        let config = SuggestConfig::default();
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.hide_delay, Duration::from_millis(200));
        assert_eq!(config.min_query_chars, 2);
        assert_eq!(config.max_suggestions, 5);
        assert_eq!(config.default_kind, MediaKind::Movie);
    }

    #[test]
    fn test_instant_keeps_thresholds() {
        let config = SuggestConfig::instant();
        assert_eq!(config.debounce, Duration::ZERO);
        assert_eq!(config.hide_delay, Duration::ZERO);
        assert_eq!(config.max_suggestions, 5);
    }

    #[test]
    fn test_for_testing_strips_trailing_slash() {
        let config = MarqueeConfig::for_testing("http://127.0.0.1:4000/");
        assert_eq!(config.tmdb.base_url, "http://127.0.0.1:4000");
        assert_eq!(config.tmdb.api_key.as_deref(), Some("test-key"));
    }
}
