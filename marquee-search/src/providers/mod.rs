//! Provider implementations for catalog lookups.

use async_trait::async_trait;
use marquee_core::MediaKind;

use crate::errors::MediaSearchError;
use crate::types::{CatalogEntry, MovieDetails, Video};

pub mod demo;
pub mod mock;
pub mod tmdb;

pub use demo::DemoProvider;
#[cfg(test)]
pub use mock::MockProvider;
pub use tmdb::TmdbProvider;

/// Trait for movie and TV catalog backends.
///
/// Implementations provide search, detail and video lookups through different
/// backends (TMDB, an offline demo catalog, mock providers for testing).
#[async_trait]
pub trait CatalogProvider: Send + Sync + std::fmt::Debug {
    /// Search titles of `kind` matching `query`, in upstream relevance order.
    ///
    /// # Errors
    /// - `MediaSearchError::SearchFailed` - Upstream rejected or failed the query
    /// - `MediaSearchError::NetworkError` - Network connectivity issues
    /// - `MediaSearchError::ParseError` - Response body was not understood
    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> Result<Vec<CatalogEntry>, MediaSearchError>;

    /// Fetch the full record for one title.
    ///
    /// # Errors
    /// - `MediaSearchError::NotFound` - No title with that id
    /// - `MediaSearchError::NetworkError` - Network connectivity issues
    /// - `MediaSearchError::ProviderError` - Provider-specific error
    async fn details(&self, id: u64, kind: MediaKind) -> Result<MovieDetails, MediaSearchError>;

    /// List videos attached to one title, in upstream order.
    ///
    /// # Errors
    /// - `MediaSearchError::NotFound` - No title with that id
    /// - `MediaSearchError::NetworkError` - Network connectivity issues
    /// - `MediaSearchError::ProviderError` - Provider-specific error
    async fn videos(&self, id: u64, kind: MediaKind) -> Result<Vec<Video>, MediaSearchError>;
}
