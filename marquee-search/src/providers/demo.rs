//! Demo provider implementation for offline development.

use async_trait::async_trait;
use marquee_core::MediaKind;

use super::CatalogProvider;
use crate::errors::MediaSearchError;
use crate::types::{CatalogEntry, MovieDetails, Video};

struct DemoTitle {
    id: u64,
    title: &'static str,
    kind: MediaKind,
    release_date: &'static str,
    poster_path: Option<&'static str>,
    overview: &'static str,
    genres: &'static [(u32, &'static str)],
    trailer_key: Option<&'static str>,
}

const DRAMA: (u32, &str) = (18, "Drama");
const SCI_FI: (u32, &str) = (878, "Science Fiction");
const ACTION: (u32, &str) = (28, "Action");
const COMEDY: (u32, &str) = (35, "Comedy");
const ADVENTURE: (u32, &str) = (12, "Adventure");

const CATALOG: &[DemoTitle] = &[
    DemoTitle {
        id: 11,
        title: "Star Wars: A New Hope",
        kind: MediaKind::Movie,
        release_date: "1977-05-25",
        poster_path: Some("/demo-new-hope.jpg"),
        overview: "A farm boy joins a rebellion against a galactic empire and its planet-destroying battle station.",
        genres: &[ADVENTURE, ACTION, SCI_FI],
        trailer_key: Some("vZ734NWnAHA"),
    },
    DemoTitle {
        id: 603,
        title: "The Matrix",
        kind: MediaKind::Movie,
        release_date: "1999-03-30",
        poster_path: Some("/demo-matrix.jpg"),
        overview: "A hacker learns that his reality is a simulation and joins the fight against its machine overlords.",
        genres: &[ACTION, SCI_FI],
        trailer_key: Some("vKQi3bBA1y8"),
    },
    DemoTitle {
        id: 329865,
        title: "Arrival",
        kind: MediaKind::Movie,
        release_date: "2016-11-10",
        poster_path: Some("/demo-arrival.jpg"),
        overview: "A linguist is recruited to communicate with visitors whose ships hover over twelve sites around the world.",
        genres: &[DRAMA, SCI_FI],
        trailer_key: None,
    },
    DemoTitle {
        id: 1018,
        title: "New York Stories",
        kind: MediaKind::Movie,
        release_date: "1989-03-10",
        poster_path: None,
        overview: "Three short films set in New York City.",
        genres: &[COMEDY, DRAMA],
        trailer_key: None,
    },
    DemoTitle {
        id: 1399,
        title: "Game of Thrones",
        kind: MediaKind::Tv,
        release_date: "2011-04-17",
        poster_path: Some("/demo-got.jpg"),
        overview: "Noble families fight for control of the Iron Throne while an ancient threat returns in the north.",
        genres: &[DRAMA, ADVENTURE],
        trailer_key: Some("KPLWWIOCOOQ"),
    },
    DemoTitle {
        id: 1420,
        title: "New Girl",
        kind: MediaKind::Tv,
        release_date: "2011-09-20",
        poster_path: Some("/demo-new-girl.jpg"),
        overview: "After a bad breakup, Jess moves into a loft with three single men.",
        genres: &[COMEDY],
        trailer_key: None,
    },
];

impl DemoTitle {
    fn entry(&self) -> CatalogEntry {
        CatalogEntry {
            id: self.id,
            title: self.title.to_string(),
            overview: Some(self.overview.to_string()),
            poster_path: self.poster_path.map(str::to_string),
            release_date: Some(self.release_date.to_string()),
            media_kind: self.kind,
            genre_ids: self.genres.iter().map(|(id, _)| *id).collect(),
        }
    }
}

/// Demo provider for development without a TMDB key.
///
/// Serves a small fixed catalog of movies and shows, matching titles by
/// case-insensitive substring.
#[derive(Debug)]
pub struct DemoProvider;

impl Default for DemoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoProvider {
    pub fn new() -> Self {
        Self
    }

    fn find(id: u64, kind: MediaKind) -> Result<&'static DemoTitle, MediaSearchError> {
        CATALOG
            .iter()
            .find(|title| title.id == id && title.kind == kind)
            .ok_or_else(|| MediaSearchError::NotFound {
                kind: kind.as_str().to_string(),
                id,
            })
    }
}

#[async_trait]
impl CatalogProvider for DemoProvider {
    async fn search(
        &self,
        query: &str,
        kind: MediaKind,
    ) -> Result<Vec<CatalogEntry>, MediaSearchError> {
        let needle = query.trim().to_lowercase();
        Ok(CATALOG
            .iter()
            .filter(|title| title.kind == kind)
            .filter(|title| title.title.to_lowercase().contains(&needle))
            .map(DemoTitle::entry)
            .collect())
    }

    async fn details(&self, id: u64, kind: MediaKind) -> Result<MovieDetails, MediaSearchError> {
        let title = Self::find(id, kind)?;
        Ok(MovieDetails {
            id: title.id,
            title: title.title.to_string(),
            overview: Some(title.overview.to_string()),
            poster_path: title.poster_path.map(str::to_string),
            release_date: Some(title.release_date.to_string()),
            media_kind: title.kind,
            genres: title.genres.iter().map(|(_, name)| name.to_string()).collect(),
            runtime_minutes: None,
            vote_average: None,
        })
    }

    async fn videos(&self, id: u64, kind: MediaKind) -> Result<Vec<Video>, MediaSearchError> {
        let title = Self::find(id, kind)?;
        Ok(title
            .trailer_key
            .map(|key| Video {
                key: key.to_string(),
                site: "YouTube".to_string(),
                video_type: "Trailer".to_string(),
                name: Some(format!("{} - Official Trailer", title.title)),
            })
            .into_iter()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_search_matches_case_insensitively() {
        let provider = DemoProvider::new();

        let movies = provider.search("MATRIX", MediaKind::Movie).await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].title, "The Matrix");

        let shows = provider.search("new", MediaKind::Tv).await.unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].title, "New Girl");
    }

    #[tokio::test]
    async fn test_demo_details_respect_kind() {
        let provider = DemoProvider::new();

        let details = provider.details(1399, MediaKind::Tv).await.unwrap();
        assert_eq!(details.title, "Game of Thrones");

        let result = provider.details(1399, MediaKind::Movie).await;
        assert!(matches!(result, Err(MediaSearchError::NotFound { id: 1399, .. })));
    }

    #[tokio::test]
    async fn test_demo_videos_only_when_trailer_known() {
        let provider = DemoProvider::new();

        let videos = provider.videos(603, MediaKind::Movie).await.unwrap();
        assert_eq!(videos.len(), 1);
        assert!(videos[0].is_youtube_trailer());

        assert!(provider.videos(329865, MediaKind::Movie).await.unwrap().is_empty());
    }
}
