//! Error types for catalog search functionality.

use marquee_core::{MarqueeError, SourceError};
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum MediaSearchError {
    /// Search operation failed with the specified query and reason.
    #[error("Search failed for query '{query}': {reason}")]
    SearchFailed {
        /// The search query that failed
        query: String,
        /// The reason for the failure
        reason: String,
    },

    /// Network communication error occurred during a request.
    #[error("Network error: {reason}")]
    NetworkError {
        /// The reason for the network error
        reason: String,
    },

    /// Failed to parse response data.
    #[error("Parse error: {reason}")]
    ParseError {
        /// The reason for the parse error
        reason: String,
    },

    /// Provider returned an error or is misconfigured.
    #[error("Provider error: {reason}")]
    ProviderError {
        /// The reason for the provider error
        reason: String,
    },

    /// Requested title does not exist upstream.
    #[error("No {kind} with id {id}")]
    NotFound {
        /// Media kind that was requested
        kind: String,
        /// Upstream identifier
        id: u64,
    },

    /// No API key was configured for the upstream catalog.
    #[error("TMDB API key is not configured (set TMDB_API_KEY)")]
    MissingApiKey,
}

impl From<MediaSearchError> for SourceError {
    fn from(error: MediaSearchError) -> Self {
        match error {
            MediaSearchError::SearchFailed { query, reason } => {
                SourceError::QueryFailed { query, reason }
            }
            other => SourceError::Unavailable {
                reason: other.to_string(),
            },
        }
    }
}

impl From<MediaSearchError> for MarqueeError {
    fn from(error: MediaSearchError) -> Self {
        match error {
            error @ MediaSearchError::MissingApiKey => MarqueeError::Configuration {
                reason: error.to_string(),
            },
            other => MarqueeError::Catalog {
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_failure_maps_to_query_failed() {
        let error = MediaSearchError::SearchFailed {
            query: "bat".to_string(),
            reason: "HTTP 500".to_string(),
        };
        assert_eq!(
            SourceError::from(error),
            SourceError::QueryFailed {
                query: "bat".to_string(),
                reason: "HTTP 500".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let error = MarqueeError::from(MediaSearchError::MissingApiKey);
        assert!(error.is_user_error());
        assert!(error.user_message().contains("TMDB_API_KEY"));
    }
}
