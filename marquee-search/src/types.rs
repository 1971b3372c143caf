//! Core types for catalog search results and detail views.

use chrono::{Datelike, NaiveDate};
use marquee_core::{MediaKind, Suggestion};
use serde::{Deserialize, Serialize};

/// Shown in detail views when upstream has no overview text.
pub const MISSING_OVERVIEW: &str = "No overview available.";

/// Single title returned by a catalog search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    /// Poster path relative to the image base, e.g. `/abc.jpg`
    pub poster_path: Option<String>,
    /// `YYYY-MM-DD` as reported upstream (first air date for TV)
    pub release_date: Option<String>,
    pub media_kind: MediaKind,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

impl CatalogEntry {
    /// Release year parsed from the release date, if any.
    pub fn release_year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(parse_year)
    }

    pub fn has_genre(&self, genre: u32) -> bool {
        self.genre_ids.contains(&genre)
    }

    /// Projects this entry into the shape the suggestion dropdown renders.
    pub fn to_suggestion(&self) -> Suggestion {
        Suggestion {
            id: self.id,
            display_title: self.title.clone(),
            release_year: self.release_year(),
            media_kind: self.media_kind,
            poster_ref: self.poster_path.clone(),
        }
    }
}

/// Extracts the year from a `YYYY-MM-DD` date.
///
/// Partial dates such as `2019` or `2019-05` still yield a year.
pub fn parse_year(date: &str) -> Option<u16> {
    let date = date.trim();
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return u16::try_from(parsed.year()).ok();
    }

    date.get(..4)
        .filter(|prefix| prefix.chars().all(|c| c.is_ascii_digit()))
        .and_then(|prefix| prefix.parse().ok())
}

/// Full record for a single title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
    pub media_kind: MediaKind,
    pub genres: Vec<String>,
    pub runtime_minutes: Option<u32>,
    pub vote_average: Option<f32>,
}

impl MovieDetails {
    /// Overview text, or the standard placeholder when missing or blank.
    pub fn overview_or_default(&self) -> &str {
        self.overview
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or(MISSING_OVERVIEW)
    }
}

/// Video attached to a title (trailers, teasers, clips).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    pub site: String,
    pub video_type: String,
    pub name: Option<String>,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.video_type == "Trailer" && self.site == "YouTube"
    }
}

/// Card rendered in the results grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCard {
    pub id: u64,
    pub title: String,
    pub media_kind: MediaKind,
    pub poster_url: String,
    pub overview_excerpt: String,
    pub release_date: Option<String>,
    /// Embeddable trailer URL, when one exists
    pub trailer: Option<String>,
}

/// Record handed to the detail page after a card or suggestion is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedMovie {
    pub id: u64,
    pub title: String,
    pub media_kind: MediaKind,
    pub overview: String,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub trailer: Option<String>,
}
