//! Mock provider implementation for testing.

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use marquee_core::MediaKind;

#[cfg(test)]
use super::CatalogProvider;
#[cfg(test)]
use crate::errors::MediaSearchError;
#[cfg(test)]
use crate::types::{CatalogEntry, MovieDetails, Video};

/// Title id whose detail and video lookups fail.
#[cfg(test)]
pub const BROKEN_ID: u64 = 500;

/// Mock provider for testing.
///
/// Returns three entries for any query: one with a poster and a trailer, one
/// without a poster, and one whose lookups fail. Queries equal to `"fail"`
/// return a search error.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockProvider;

#[cfg(test)]
impl MockProvider {
    /// Creates a new mock provider for testing.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(test)]
#[async_trait]
impl CatalogProvider for MockProvider {
    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> Result<Vec<CatalogEntry>, MediaSearchError> {
        if query == "fail" {
            return Err(MediaSearchError::SearchFailed {
                query: query.to_string(),
                reason: "mock failure".to_string(),
            });
        }

        Ok(vec![
            CatalogEntry {
                id: 1,
                title: format!("{query} One"),
                overview: Some("x".repeat(150)),
                poster_path: Some("/one.jpg".to_string()),
                release_date: Some("2020-01-01".to_string()),
                media_kind: kind,
                genre_ids: vec![28],
            },
            CatalogEntry {
                id: 2,
                title: format!("{query} Two"),
                overview: None,
                poster_path: None,
                release_date: None,
                media_kind: kind,
                genre_ids: vec![28, 35],
            },
            CatalogEntry {
                id: BROKEN_ID,
                title: format!("{query} Broken"),
                overview: Some("Short.".to_string()),
                poster_path: Some("/broken.jpg".to_string()),
                release_date: Some("2021-06-01".to_string()),
                media_kind: kind,
                genre_ids: vec![35],
            },
        ])
    }

    async fn details(&self, id: u64, kind: MediaKind) -> Result<MovieDetails, MediaSearchError> {
        if id == BROKEN_ID {
            return Err(MediaSearchError::NetworkError {
                reason: "mock outage".to_string(),
            });
        }

        Ok(MovieDetails {
            id,
            title: format!("Mock {id}"),
            overview: None,
            poster_path: Some(format!("/mock-{id}.jpg")),
            release_date: Some("2020-01-01".to_string()),
            media_kind: kind,
            genres: vec!["Action".to_string()],
            runtime_minutes: Some(120),
            vote_average: Some(7.5),
        })
    }

    async fn videos(&self, id: u64, _kind: MediaKind) -> Result<Vec<Video>, MediaSearchError> {
        if id == BROKEN_ID {
            return Err(MediaSearchError::NetworkError {
                reason: "mock outage".to_string(),
            });
        }

        Ok(vec![
            Video {
                key: format!("teaser-{id}"),
                site: "YouTube".to_string(),
                video_type: "Teaser".to_string(),
                name: None,
            },
            Video {
                key: format!("trailer-{id}"),
                site: "YouTube".to_string(),
                video_type: "Trailer".to_string(),
                name: None,
            },
        ])
    }
}
