//! Presentation model for the suggestion dropdown.
//!
//! Converts [`DropdownState`] into plain view rows so any UI layer (terminal,
//! web template, native widget) can draw it without knowing the state machine.

use std::fmt;

use serde::Serialize;

use super::state::{DropdownContent, DropdownState};
use super::types::Suggestion;

/// Poster width used for dropdown thumbnails.
pub const SUGGESTION_POSTER_SIZE: &str = "w92";
/// Poster width used for grid cards and detail views.
pub const GRID_POSTER_SIZE: &str = "w500";
/// Image shown when a suggestion has no poster.
pub const SUGGESTION_PLACEHOLDER: &str = "placeholder-poster.jpg";
/// Image shown when a grid poster fails to load.
pub const GRID_FALLBACK: &str = "fallback-poster.jpg";
/// Inline message for a valid query without matches.
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Builds a poster URL for `poster_ref` at `size`, if there is one.
pub fn poster_url(image_base: &str, size: &str, poster_ref: Option<&str>) -> Option<String> {
    poster_ref
        .filter(|path| !path.is_empty())
        .map(|path| format!("{}/{size}{path}", image_base.trim_end_matches('/')))
}

/// Year and kind annotation, e.g. `2019 (TV)`.
pub fn annotation(suggestion: &Suggestion) -> String {
    match suggestion.release_year {
        Some(year) => format!("{year} ({})", suggestion.media_kind.label()),
        None => format!("({})", suggestion.media_kind.label()),
    }
}

/// One rendered dropdown row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionView {
    pub index: usize,
    pub title: String,
    pub annotation: String,
    pub image_url: String,
    pub highlighted: bool,
}

/// Everything a UI needs to draw the dropdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DropdownView {
    Hidden,
    Suggestions(Vec<SuggestionView>),
    Message(String),
}

impl DropdownView {
    pub fn from_state(state: &DropdownState, image_base: &str) -> Self {
        if !state.visible {
            return DropdownView::Hidden;
        }

        match &state.content {
            DropdownContent::Suggestions(items) if items.is_empty() => DropdownView::Hidden,
            DropdownContent::Suggestions(items) => DropdownView::Suggestions(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| SuggestionView {
                        index,
                        title: item.display_title.clone(),
                        annotation: annotation(item),
                        image_url: poster_url(
                            image_base,
                            SUGGESTION_POSTER_SIZE,
                            item.poster_ref.as_deref(),
                        )
                        .unwrap_or_else(|| SUGGESTION_PLACEHOLDER.to_string()),
                        highlighted: state.highlighted == Some(index),
                    })
                    .collect(),
            ),
            DropdownContent::NoResults => DropdownView::Message(NO_RESULTS_MESSAGE.to_string()),
            DropdownContent::Error(message) => DropdownView::Message(message.clone()),
        }
    }
}

impl fmt::Display for DropdownView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropdownView::Hidden => Ok(()),
            DropdownView::Message(message) => writeln!(f, "  {message}"),
            DropdownView::Suggestions(rows) => {
                for row in rows {
                    let marker = if row.highlighted { '>' } else { ' ' };
                    writeln!(
                        f,
                        "{marker} [{}] {}  {}",
                        row.index, row.title, row.annotation
                    )?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::MediaKind;
    use crate::suggest::testing::suggestions;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

    #[test]
    fn test_annotation_formats_year_and_kind() {
        let mut suggestion = suggestions(1).remove(0);
        suggestion.release_year = Some(2019);
        suggestion.media_kind = MediaKind::Tv;
        assert_eq!(annotation(&suggestion), "2019 (TV)");

        suggestion.release_year = None;
        suggestion.media_kind = MediaKind::Movie;
        assert_eq!(annotation(&suggestion), "(Movie)");
    }

    #[test]
    fn test_poster_url_falls_back_to_placeholder() {
        let mut items = suggestions(2);
        items[1].poster_ref = None;

        let mut state = DropdownState::default();
        state.replace(DropdownContent::Suggestions(items));
        state.highlight(1);

        let DropdownView::Suggestions(rows) = DropdownView::from_state(&state, IMAGE_BASE) else {
            panic!("expected suggestion rows");
        };
        assert_eq!(rows[0].image_url, "https://image.tmdb.org/t/p/w92/poster-0.jpg");
        assert_eq!(rows[1].image_url, SUGGESTION_PLACEHOLDER);
        assert!(rows[1].highlighted);
        assert!(!rows[0].highlighted);
    }

    #[test]
    fn test_placeholders_render_as_messages() {
        let mut state = DropdownState::default();
        state.replace(DropdownContent::NoResults);
        assert_eq!(
            DropdownView::from_state(&state, IMAGE_BASE),
            DropdownView::Message(NO_RESULTS_MESSAGE.to_string())
        );

        state.hide();
        assert_eq!(DropdownView::from_state(&state, IMAGE_BASE), DropdownView::Hidden);
    }

    #[test]
    fn test_display_marks_highlighted_row() {
        let mut state = DropdownState::default();
        state.replace(DropdownContent::Suggestions(suggestions(2)));
        state.highlight(0);

        let text = DropdownView::from_state(&state, IMAGE_BASE).to_string();
        assert_eq!(text, "> [0] Title 0  2000 (Movie)\n  [1] Title 1  2001 (Movie)\n");
    }

    #[test]
    fn test_poster_url_ignores_empty_path() {
        assert_eq!(poster_url(IMAGE_BASE, GRID_POSTER_SIZE, Some("")), None);
        assert_eq!(
            poster_url("https://img.example/", GRID_POSTER_SIZE, Some("/a.jpg")).as_deref(),
            Some("https://img.example/w500/a.jpg")
        );
    }
}
