//! Dropdown state owned by the controller.

use serde::Serialize;

use super::types::Suggestion;

/// What the dropdown currently displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DropdownContent {
    /// Navigable suggestions; empty after a selection clears the dropdown.
    Suggestions(Vec<Suggestion>),
    /// The query was valid but matched nothing.
    NoResults,
    /// The suggestion source failed; carries the inline message.
    Error(String),
}

impl Default for DropdownContent {
    fn default() -> Self {
        DropdownContent::Suggestions(Vec::new())
    }
}

/// Visible, navigable list of suggestions.
///
/// Invariant: `highlighted` is `None` or an index into `items()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DropdownState {
    pub visible: bool,
    pub content: DropdownContent,
    pub highlighted: Option<usize>,
}

impl DropdownState {
    /// Navigable items. Placeholders expose none.
    pub fn items(&self) -> &[Suggestion] {
        match &self.content {
            DropdownContent::Suggestions(items) => items,
            DropdownContent::NoResults | DropdownContent::Error(_) => &[],
        }
    }

    pub fn has_items(&self) -> bool {
        !self.items().is_empty()
    }

    pub fn highlighted_item(&self) -> Option<&Suggestion> {
        self.highlighted.and_then(|index| self.items().get(index))
    }

    /// Replaces the content wholesale and shows it with nothing highlighted.
    pub fn replace(&mut self, content: DropdownContent) {
        self.content = content;
        self.highlighted = None;
        self.visible = true;
    }

    /// Hides the dropdown, keeping cached content for a later re-show.
    pub fn hide(&mut self) {
        self.visible = false;
        self.highlighted = None;
    }

    /// Empties and hides the dropdown.
    pub fn clear(&mut self) {
        self.content = DropdownContent::default();
        self.hide();
    }

    /// Moves the highlight down one row, clamping at the last item.
    pub fn highlight_next(&mut self) -> Option<usize> {
        let len = self.items().len();
        if len == 0 {
            return self.highlighted;
        }
        let next = match self.highlighted {
            None => 0,
            Some(index) => (index + 1).min(len - 1),
        };
        self.highlighted = Some(next);
        self.highlighted
    }

    /// Moves the highlight up one row; moving above the first row clears it.
    pub fn highlight_previous(&mut self) -> Option<usize> {
        self.highlighted = match self.highlighted {
            None | Some(0) => None,
            Some(index) => Some(index - 1),
        };
        self.highlighted
    }

    /// Highlights exactly `index`. Out-of-range indices are refused.
    pub fn highlight(&mut self, index: usize) -> bool {
        if index < self.items().len() {
            self.highlighted = Some(index);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::MediaKind;

    fn items(count: usize) -> Vec<Suggestion> {
        (0..count)
            .map(|i| Suggestion {
                id: i as u64,
                display_title: format!("Title {i}"),
                release_year: Some(2000 + i as u16),
                media_kind: MediaKind::Movie,
                poster_ref: None,
            })
            .collect()
    }

    #[test]
    fn test_highlight_next_clamps_at_bottom() {
        let mut state = DropdownState::default();
        state.replace(DropdownContent::Suggestions(items(3)));

        assert_eq!(state.highlight_next(), Some(0));
        assert_eq!(state.highlight_next(), Some(1));
        assert_eq!(state.highlight_next(), Some(2));
        assert_eq!(state.highlight_next(), Some(2));
    }

    #[test]
    fn test_highlight_previous_returns_to_none() {
        let mut state = DropdownState::default();
        state.replace(DropdownContent::Suggestions(items(3)));
        state.highlight(1);

        assert_eq!(state.highlight_previous(), Some(0));
        assert_eq!(state.highlight_previous(), None);
        assert_eq!(state.highlight_previous(), None);
    }

    #[test]
    fn test_placeholders_are_not_navigable() {
        let mut state = DropdownState::default();
        state.replace(DropdownContent::NoResults);

        assert!(state.visible);
        assert!(!state.has_items());
        assert_eq!(state.highlight_next(), None);
        assert!(!state.highlight(0));
    }

    #[test]
    fn test_hide_keeps_items_clear_drops_them() {
        let mut state = DropdownState::default();
        state.replace(DropdownContent::Suggestions(items(2)));
        state.highlight(1);

        state.hide();
        assert!(!state.visible);
        assert_eq!(state.highlighted, None);
        assert_eq!(state.items().len(), 2);

        state.clear();
        assert!(state.items().is_empty());
        assert!(!state.visible);
    }
}
