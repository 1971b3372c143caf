//! Catalog service
//!
//! Wraps a [`CatalogProvider`] with the behavior the browsing surfaces need:
//! default queries, genre filtering, grid cards with trailers, and the record
//! handed to the detail page. Also serves as the suggestion source for the
//! search box controller.

use std::sync::Arc;

use async_trait::async_trait;
use marquee_core::suggest::render::{GRID_FALLBACK, GRID_POSTER_SIZE, poster_url};
use marquee_core::{MediaKind, SourceError, Suggestion, SuggestionSource, TmdbConfig};

use crate::errors::MediaSearchError;
use crate::player::find_trailer;
use crate::providers::{CatalogProvider, DemoProvider, TmdbProvider};
use crate::types::{CatalogEntry, GridCard, MISSING_OVERVIEW, MovieDetails, SelectedMovie};

/// Query used for the results grid when the user has not typed anything.
pub const DEFAULT_QUERY: &str = "new";
/// Characters of overview shown on a grid card.
pub const OVERVIEW_EXCERPT_CHARS: usize = 100;

/// First `OVERVIEW_EXCERPT_CHARS` characters of an overview, with an
/// ellipsis when anything was cut.
pub fn overview_excerpt(overview: Option<&str>) -> String {
    let mut chars = overview.unwrap_or_default().chars();
    let excerpt: String = chars.by_ref().take(OVERVIEW_EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{excerpt}...")
    } else {
        excerpt
    }
}

/// Movie and TV catalog backed by a pluggable provider.
#[derive(Debug, Clone)]
pub struct MovieCatalog {
    provider: Arc<dyn CatalogProvider>,
    image_base_url: String,
}

impl MovieCatalog {
    pub fn new(provider: Arc<dyn CatalogProvider>, image_base_url: impl Into<String>) -> Self {
        Self {
            provider,
            image_base_url: image_base_url.into(),
        }
    }

    /// Creates a catalog backed by the live TMDB API.
    ///
    /// # Errors
    /// - `MediaSearchError::MissingApiKey` - No API key configured
    /// - `MediaSearchError::ProviderError` - Invalid base URL
    pub fn from_config(config: &TmdbConfig) -> Result<Self, MediaSearchError> {
        let provider = TmdbProvider::new(config)?;
        Ok(Self::new(Arc::new(provider), config.image_base_url.clone()))
    }

    /// Creates a catalog over the built-in demo data for offline use.
    pub fn new_demo() -> Self {
        Self::new(
            Arc::new(DemoProvider::new()),
            TmdbConfig::default().image_base_url,
        )
    }

    /// Creates a catalog with the mock provider for testing.
    #[cfg(test)]
    pub fn new_with_mock() -> Self {
        Self::new(
            Arc::new(crate::providers::MockProvider::new()),
            "https://img.test/t/p",
        )
    }

    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Searches titles of `kind`, keeping only those tagged with `genre` when given.
    ///
    /// A blank query searches for [`DEFAULT_QUERY`].
    ///
    /// # Errors
    /// - `MediaSearchError::SearchFailed` - Upstream rejected the query
    /// - `MediaSearchError::NetworkError` - Network connectivity issues
    pub async fn search(
        &self,
        query: &str,
        kind: MediaKind,
        genre: Option<u32>,
    ) -> Result<Vec<CatalogEntry>, MediaSearchError> {
        let query = match query.trim() {
            "" => DEFAULT_QUERY,
            trimmed => trimmed,
        };

        let mut results = self.provider.search(query, kind).await?;
        if let Some(genre) = genre {
            results.retain(|entry| entry.has_genre(genre));
        }

        tracing::info!(query, %kind, ?genre, results = results.len(), "Catalog search");
        Ok(results)
    }

    /// Builds result grid cards for a search.
    ///
    /// Entries without a poster are skipped. Trailers are looked up one card
    /// at a time, and a failed lookup leaves that card without one.
    ///
    /// # Errors
    /// Propagates search failures from [`MovieCatalog::search`].
    pub async fn grid(
        &self,
        query: &str,
        kind: MediaKind,
        genre: Option<u32>,
    ) -> Result<Vec<GridCard>, MediaSearchError> {
        let entries = self.search(query, kind, genre).await?;

        let mut cards = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(poster_path) = entry.poster_path.as_deref() else {
                continue;
            };

            let trailer = self.trailer(entry.id, entry.media_kind).await;
            cards.push(GridCard {
                id: entry.id,
                title: entry.title.clone(),
                media_kind: entry.media_kind,
                poster_url: poster_url(&self.image_base_url, GRID_POSTER_SIZE, Some(poster_path))
                    .unwrap_or_else(|| GRID_FALLBACK.to_string()),
                overview_excerpt: overview_excerpt(entry.overview.as_deref()),
                release_date: entry.release_date.clone(),
                trailer,
            });
        }

        Ok(cards)
    }

    /// Fetches the full record for one title.
    ///
    /// # Errors
    /// - `MediaSearchError::NotFound` - No title with that id
    /// - `MediaSearchError::NetworkError` - Network connectivity issues
    pub async fn details(
        &self,
        id: u64,
        kind: MediaKind,
    ) -> Result<MovieDetails, MediaSearchError> {
        self.provider.details(id, kind).await
    }

    /// Embed URL of the title's first YouTube trailer.
    ///
    /// Lookup failures are logged and reported as no trailer.
    pub async fn trailer(&self, id: u64, kind: MediaKind) -> Option<String> {
        match self.provider.videos(id, kind).await {
            Ok(videos) => find_trailer(&videos),
            Err(e) => {
                tracing::warn!(id, %kind, error = %e, "Trailer lookup failed");
                None
            }
        }
    }

    /// Builds the detail page record for one title.
    ///
    /// # Errors
    /// Propagates detail lookup failures. Trailer failures are not errors.
    pub async fn selected_movie(
        &self,
        id: u64,
        kind: MediaKind,
    ) -> Result<SelectedMovie, MediaSearchError> {
        let (details, trailer) = tokio::join!(self.details(id, kind), self.trailer(id, kind));
        let details = details?;

        Ok(SelectedMovie {
            id: details.id,
            title: details.title.clone(),
            media_kind: details.media_kind,
            overview: details.overview_or_default().to_string(),
            poster_url: poster_url(
                &self.image_base_url,
                GRID_POSTER_SIZE,
                details.poster_path.as_deref(),
            ),
            release_date: details.release_date,
            trailer,
        })
    }

    /// Detail record for a chosen suggestion, falling back to the
    /// suggestion's own fields when the lookup fails.
    pub async fn select_suggestion(&self, suggestion: &Suggestion) -> SelectedMovie {
        match self
            .selected_movie(suggestion.id, suggestion.media_kind)
            .await
        {
            Ok(selected) => selected,
            Err(e) => {
                tracing::warn!(
                    id = suggestion.id,
                    error = %e,
                    "Detail lookup failed, using suggestion"
                );
                SelectedMovie {
                    id: suggestion.id,
                    title: suggestion.display_title.clone(),
                    media_kind: suggestion.media_kind,
                    overview: MISSING_OVERVIEW.to_string(),
                    poster_url: poster_url(
                        &self.image_base_url,
                        GRID_POSTER_SIZE,
                        suggestion.poster_ref.as_deref(),
                    ),
                    release_date: None,
                    trailer: None,
                }
            }
        }
    }
}

#[async_trait]
impl SuggestionSource for MovieCatalog {
    async fn suggest(&self, query: &str, kind: MediaKind) -> Result<Vec<Suggestion>, SourceError> {
        let entries = self.provider.search(query, kind).await.map_err(|e| {
            tracing::warn!(query, %kind, error = %e, "Suggestion fetch failed");
            SourceError::from(e)
        })?;

        Ok(entries.iter().map(CatalogEntry::to_suggestion).collect())
    }
}
