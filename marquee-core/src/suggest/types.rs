//! Data types shared between the controller and its collaborators.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content kind filter applied to queries.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Movie,
    Tv,
}

impl MediaKind {
    /// Path segment used by the upstream API for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    /// Short human label used in suggestion annotations.
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Movie => "Movie",
            MediaKind::Tv => "TV",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(MediaKind::Movie),
            "tv" => Ok(MediaKind::Tv),
            _ => Err(format!("Invalid media kind: {s}")),
        }
    }
}

/// Candidate match for a partial query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: u64,
    pub display_title: String,
    pub release_year: Option<u16>,
    pub media_kind: MediaKind,
    /// Poster path relative to the image base, e.g. `/abc.jpg`
    pub poster_ref: Option<String>,
}

/// Keys the controller reacts to. Anything else arrives as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Other,
}

/// Full search triggered by Enter when no suggestion is highlighted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    /// Raw input text, untrimmed
    pub query: String,
    pub kind: MediaKind,
    pub genre: Option<u32>,
}

/// Events the controller emits to the rest of the application.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// User picked a suggestion by click or Enter.
    Selected(Suggestion),
    /// User pressed Enter with nothing highlighted.
    SearchRequested(SearchRequest),
}

/// Failures reported by a suggestion source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("Suggestion source unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Suggestion query '{query}' failed: {reason}")]
    QueryFailed { query: String, reason: String },
}

impl SourceError {
    /// Inline message shown in the dropdown in place of suggestions.
    pub fn user_message(&self) -> &'static str {
        "Could not load suggestions"
    }
}

/// Errors talking to a running controller actor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControllerError {
    #[error("Suggestion controller has shut down")]
    Shutdown,
}

/// External service returning ranked candidate matches for a partial query.
#[async_trait]
pub trait SuggestionSource: Send + Sync + fmt::Debug {
    /// Returns matches for `query` restricted to `kind`, best first.
    ///
    /// # Errors
    /// - `SourceError::Unavailable` - Upstream could not be reached
    /// - `SourceError::QueryFailed` - Upstream rejected or failed the query
    async fn suggest(&self, query: &str, kind: MediaKind) -> Result<Vec<Suggestion>, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_kind_parsing() {
        assert_eq!("movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!(" TV ".parse::<MediaKind>().unwrap(), MediaKind::Tv);
        assert!("music".parse::<MediaKind>().is_err());
    }

    #[test]
    fn test_media_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaKind::Tv).unwrap(), "\"tv\"");
        assert_eq!(MediaKind::Tv.label(), "TV");
        assert_eq!(MediaKind::Movie.to_string(), "movie");
    }
}
