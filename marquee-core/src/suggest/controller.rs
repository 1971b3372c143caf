//! Suggestion controller state machine.
//!
//! The controller never performs I/O or sleeps. Timer-starting handlers take
//! the current instant, debounce expiry hands back a [`FetchRequest`], and the
//! caller reports the response through [`SuggestionController::apply_fetch`].
//! The actor in [`super::actor`] wires those edges to tokio.

use serde::Serialize;
use tokio::time::Instant;

use super::state::{DropdownContent, DropdownState};
use super::timer::TimerSlot;
use super::types::{ControllerEvent, Key, MediaKind, SearchRequest, SourceError, Suggestion};
use crate::config::SuggestConfig;

/// Where keyboard focus sits within the search widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Focus {
    /// Focus is elsewhere on the page; keys are ignored except Escape.
    Outside,
    /// The text input has focus.
    Input,
    /// Keyboard navigation moved focus into the dropdown.
    Dropdown,
}

/// A fetch the caller must run against the suggestion source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Sequence tag; only the latest issued sequence is ever applied.
    pub seq: u64,
    /// Trimmed query text
    pub query: String,
    pub kind: MediaKind,
}

/// Point-in-time copy of the controller state for rendering and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub input: String,
    pub kind: MediaKind,
    pub genre: Option<u32>,
    pub focus: Focus,
    pub dropdown: DropdownState,
    pub debounce_pending: bool,
    pub hide_pending: bool,
    pub fetch_in_flight: bool,
}

/// Debounced search-suggestion state machine for one search widget.
#[derive(Debug)]
pub struct SuggestionController {
    config: SuggestConfig,
    input: String,
    kind: MediaKind,
    genre: Option<u32>,
    focus: Focus,
    dropdown: DropdownState,
    debounce: TimerSlot<String>,
    hide: TimerSlot<()>,
    issued_seq: u64,
    awaiting: Option<u64>,
}

impl SuggestionController {
    /// Creates a controller with an empty, hidden dropdown.
    pub fn new(config: SuggestConfig) -> Self {
        let kind = config.default_kind;
        Self {
            config,
            input: String::new(),
            kind,
            genre: None,
            focus: Focus::Outside,
            dropdown: DropdownState::default(),
            debounce: TimerSlot::new(),
            hide: TimerSlot::new(),
            issued_seq: 0,
            awaiting: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn dropdown(&self) -> &DropdownState {
        &self.dropdown
    }

    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn hide_deadline(&self) -> Option<Instant> {
        self.hide.deadline()
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.awaiting.is_some()
    }

    /// True when no debounce is pending and no fetch result is awaited.
    pub fn is_settled(&self) -> bool {
        !self.debounce.is_armed() && self.awaiting.is_none()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            input: self.input.clone(),
            kind: self.kind,
            genre: self.genre,
            focus: self.focus,
            dropdown: self.dropdown.clone(),
            debounce_pending: self.debounce.is_armed(),
            hide_pending: self.hide.is_armed(),
            fetch_in_flight: self.fetch_in_flight(),
        }
    }

    /// Sets the content kind used by subsequent fetches and searches.
    pub fn set_content_kind(&mut self, kind: MediaKind) {
        self.kind = kind;
    }

    /// Sets the genre filter forwarded with full searches.
    pub fn set_genre(&mut self, genre: Option<u32>) {
        self.genre = genre;
    }

    /// Handles a change of the input text.
    ///
    /// Short queries hide the dropdown at once; longer ones (re)arm the
    /// debounce so only the last keystroke in a burst ever fetches.
    pub fn on_input_changed(&mut self, text: &str, now: Instant) {
        self.input = text.to_string();
        self.focus = Focus::Input;
        self.debounce.cancel();

        let query = text.trim();
        if query.chars().count() < self.config.min_query_chars {
            tracing::debug!(query, "Query below threshold, hiding suggestions");
            self.invalidate_fetch();
            self.dropdown.hide();
            return;
        }

        self.debounce.arm(now, self.config.debounce, query.to_string());
    }

    /// Fires the debounce if it is due, returning the fetch to run.
    pub fn fire_debounce(&mut self, now: Instant) -> Option<FetchRequest> {
        let query = self.debounce.take_due(now)?;
        Some(self.begin_fetch(&query))
    }

    /// Issues a fetch for `query`, superseding any fetch still in flight.
    pub fn begin_fetch(&mut self, query: &str) -> FetchRequest {
        self.issued_seq += 1;
        self.awaiting = Some(self.issued_seq);
        tracing::debug!(seq = self.issued_seq, query, kind = %self.kind, "Fetching suggestions");

        FetchRequest {
            seq: self.issued_seq,
            query: query.trim().to_string(),
            kind: self.kind,
        }
    }

    /// Applies a fetch response. Returns false when the response was stale.
    ///
    /// Results, empty results and failures each replace the dropdown content
    /// wholesale and make it visible with nothing highlighted.
    pub fn apply_fetch(&mut self, seq: u64, result: Result<Vec<Suggestion>, SourceError>) -> bool {
        if self.awaiting != Some(seq) {
            tracing::trace!(seq, awaiting = ?self.awaiting, "Discarding stale suggestion response");
            return false;
        }
        self.awaiting = None;

        let content = match result {
            Ok(mut items) if !items.is_empty() => {
                items.truncate(self.config.max_suggestions);
                tracing::debug!(seq, count = items.len(), "Showing suggestions");
                DropdownContent::Suggestions(items)
            }
            Ok(_) => {
                tracing::debug!(seq, "No suggestions for query");
                DropdownContent::NoResults
            }
            Err(error) => {
                tracing::warn!(seq, %error, "Suggestion source failed");
                DropdownContent::Error(error.user_message().to_string())
            }
        };

        self.dropdown.replace(content);
        true
    }

    /// Handles a key press, returning an event when the key activated something.
    pub fn on_key_down(&mut self, key: Key) -> Option<ControllerEvent> {
        if key == Key::Escape {
            self.escape();
            return None;
        }
        if self.focus == Focus::Outside {
            return None;
        }

        let navigable = self.dropdown.visible && self.dropdown.has_items();
        match key {
            Key::Enter => match self.dropdown.highlighted {
                Some(index) => self.on_item_activate(index),
                None => Some(ControllerEvent::SearchRequested(self.search_request())),
            },
            Key::ArrowDown if navigable => {
                self.dropdown.highlight_next();
                self.focus = Focus::Dropdown;
                None
            }
            Key::ArrowUp if navigable => {
                if self.dropdown.highlight_previous().is_none() {
                    self.focus = Focus::Input;
                }
                None
            }
            _ => None,
        }
    }

    /// Pointer moved over the item at `index`. Returns false for an invalid
    /// index or a hidden dropdown.
    pub fn on_item_hover(&mut self, index: usize) -> bool {
        if !self.dropdown.visible || !self.dropdown.highlight(index) {
            return false;
        }
        self.hide.cancel();
        true
    }

    /// Activates the item at `index` by click or Enter.
    ///
    /// Emits the selection, clears and hides the dropdown, and puts the
    /// suggestion's title into the input.
    pub fn on_item_activate(&mut self, index: usize) -> Option<ControllerEvent> {
        let item = self.dropdown.items().get(index)?.clone();
        tracing::debug!(id = item.id, title = %item.display_title, "Suggestion selected");

        self.input = item.display_title.clone();
        self.debounce.cancel();
        self.hide.cancel();
        self.invalidate_fetch();
        self.dropdown.clear();
        self.focus = Focus::Input;

        Some(ControllerEvent::Selected(item))
    }

    /// Starts the tolerant hide timer.
    pub fn request_hide(&mut self, now: Instant) {
        self.hide.arm(now, self.config.hide_delay, ());
    }

    pub fn cancel_hide(&mut self) {
        self.hide.cancel();
    }

    /// Fires the hide timer if due. Cached items survive for a later re-show.
    pub fn fire_hide(&mut self, now: Instant) -> bool {
        if self.hide.take_due(now).is_none() {
            return false;
        }
        self.dropdown.hide();
        if self.focus == Focus::Dropdown {
            self.focus = Focus::Input;
        }
        true
    }

    /// Re-shows cached items, cancelling any pending hide.
    pub fn request_show(&mut self) {
        self.hide.cancel();
        if self.dropdown.has_items() {
            self.dropdown.visible = true;
        }
    }

    /// The input regained focus.
    pub fn on_focus(&mut self) {
        self.focus = Focus::Input;
        self.request_show();
    }

    /// Focus left the widget.
    pub fn on_focus_lost(&mut self, now: Instant) {
        self.focus = Focus::Outside;
        self.request_hide(now);
    }

    /// Pointer interaction outside both the input and the dropdown.
    pub fn on_pointer_outside(&mut self, now: Instant) {
        self.on_focus_lost(now);
    }

    /// Pointer entered the dropdown on its way from the input.
    pub fn on_pointer_enter_dropdown(&mut self) {
        self.cancel_hide();
    }

    fn escape(&mut self) {
        self.debounce.cancel();
        self.hide.cancel();
        self.invalidate_fetch();
        self.dropdown.clear();
        self.focus = Focus::Input;
    }

    fn invalidate_fetch(&mut self) {
        if let Some(seq) = self.awaiting.take() {
            tracing::trace!(seq, "Suggestion fetch superseded");
        }
    }

    fn search_request(&self) -> SearchRequest {
        SearchRequest {
            query: self.input.clone(),
            kind: self.kind,
            genre: self.genre,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use proptest::prelude::*;

    use super::*;
    use crate::suggest::testing::suggestions;

    fn controller() -> SuggestionController {
        SuggestionController::new(SuggestConfig::default())
    }

    /// Types `text` and lets the debounce expire, returning the issued fetch.
    fn type_and_settle(
        controller: &mut SuggestionController,
        text: &str,
        now: Instant,
    ) -> Option<FetchRequest> {
        controller.on_input_changed(text, now);
        controller.fire_debounce(now + Duration::from_millis(300))
    }

    fn controller_with_items(count: usize) -> SuggestionController {
        let mut controller = controller();
        let now = Instant::now();
        let request = type_and_settle(&mut controller, "bat", now).unwrap();
        assert!(controller.apply_fetch(request.seq, Ok(suggestions(count))));
        controller
    }

    #[test]
    fn test_short_queries_never_fetch() {
        let mut controller = controller();
        let now = Instant::now();

        for text in ["", " ", "a", " b ", "\t", "é"] {
            assert_eq!(type_and_settle(&mut controller, text, now), None);
            assert!(!controller.dropdown().visible);
            assert!(!controller.fetch_in_flight());
        }
    }

    #[test]
    fn test_short_query_hides_visible_dropdown() {
        let mut controller = controller_with_items(3);
        assert!(controller.dropdown().visible);

        controller.on_input_changed("b", Instant::now());
        assert!(!controller.dropdown().visible);
        assert_eq!(controller.dropdown().highlighted, None);
    }

    #[test]
    fn test_debounce_keeps_only_last_keystroke() {
        let mut controller = controller();
        let start = Instant::now();

        controller.on_input_changed("a", start);
        controller.on_input_changed("ab", start + Duration::from_millis(100));
        controller.on_input_changed("abc", start + Duration::from_millis(200));

        // Deadline of "ab" has passed but it was superseded.
        assert_eq!(controller.fire_debounce(start + Duration::from_millis(400)), None);

        let request = controller
            .fire_debounce(start + Duration::from_millis(500))
            .unwrap();
        assert_eq!(request.query, "abc");
        assert_eq!(controller.fire_debounce(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn test_fetch_uses_trimmed_text_and_kind() {
        let mut controller = controller();
        controller.set_content_kind(MediaKind::Tv);

        let request = type_and_settle(&mut controller, "  office  ", Instant::now()).unwrap();
        assert_eq!(request.query, "office");
        assert_eq!(request.kind, MediaKind::Tv);
        assert_eq!(controller.input(), "  office  ");
    }

    #[test]
    fn test_seven_results_show_first_five() {
        let controller = controller_with_items(7);
        let dropdown = controller.dropdown();

        assert!(dropdown.visible);
        assert_eq!(dropdown.highlighted, None);
        assert_eq!(dropdown.items().len(), 5);
        assert_eq!(dropdown.items()[4].id, 4);
    }

    #[test]
    fn test_empty_result_shows_placeholder() {
        let mut controller = controller();
        let request = type_and_settle(&mut controller, "zzzznotfound", Instant::now()).unwrap();

        assert!(controller.apply_fetch(request.seq, Ok(Vec::new())));
        assert!(controller.dropdown().visible);
        assert_eq!(controller.dropdown().content, DropdownContent::NoResults);
        assert!(controller.dropdown().items().is_empty());
    }

    #[test]
    fn test_source_failure_shows_error_placeholder() {
        let mut controller = controller_with_items(3);
        let request = type_and_settle(&mut controller, "bad", Instant::now()).unwrap();

        let failure = SourceError::Unavailable {
            reason: "timeout".to_string(),
        };
        assert!(controller.apply_fetch(request.seq, Err(failure)));

        let dropdown = controller.dropdown();
        assert!(dropdown.visible);
        assert_eq!(
            dropdown.content,
            DropdownContent::Error("Could not load suggestions".to_string())
        );
        assert!(dropdown.items().is_empty());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut controller = controller();
        let now = Instant::now();

        let first = type_and_settle(&mut controller, "bat", now).unwrap();
        let second = type_and_settle(&mut controller, "batman", now).unwrap();
        assert!(second.seq > first.seq);

        assert!(controller.apply_fetch(second.seq, Ok(suggestions(2))));
        assert!(!controller.apply_fetch(first.seq, Ok(suggestions(5))));
        assert_eq!(controller.dropdown().items().len(), 2);
    }

    #[test]
    fn test_arrow_navigation_clamps() {
        let mut controller = controller_with_items(3);

        for _ in 0..5 {
            controller.on_key_down(Key::ArrowDown);
        }
        assert_eq!(controller.dropdown().highlighted, Some(2));
        assert_eq!(controller.focus(), Focus::Dropdown);

        for _ in 0..5 {
            controller.on_key_down(Key::ArrowUp);
        }
        assert_eq!(controller.dropdown().highlighted, None);
        assert_eq!(controller.focus(), Focus::Input);
    }

    #[test]
    fn test_arrows_ignored_without_items() {
        let mut controller = controller();
        let request = type_and_settle(&mut controller, "zz", Instant::now()).unwrap();
        controller.apply_fetch(request.seq, Ok(Vec::new()));

        controller.on_key_down(Key::ArrowDown);
        assert_eq!(controller.dropdown().highlighted, None);
        assert_eq!(controller.focus(), Focus::Input);
    }

    #[test]
    fn test_enter_without_highlight_requests_search_with_raw_text() {
        let mut controller = controller_with_items(3);
        controller.on_input_changed(" bat ", Instant::now());
        controller.set_genre(Some(28));

        let event = controller.on_key_down(Key::Enter);
        assert_eq!(
            event,
            Some(ControllerEvent::SearchRequested(SearchRequest {
                query: " bat ".to_string(),
                kind: MediaKind::Movie,
                genre: Some(28),
            }))
        );
    }

    #[test]
    fn test_enter_on_highlight_matches_click() {
        let mut keyboard = controller_with_items(5);
        for _ in 0..3 {
            keyboard.on_key_down(Key::ArrowDown);
        }
        assert_eq!(keyboard.dropdown().highlighted, Some(2));
        let keyboard_event = keyboard.on_key_down(Key::Enter);

        let mut pointer = controller_with_items(5);
        let pointer_event = pointer.on_item_activate(2);

        assert_eq!(keyboard_event, pointer_event);
        assert!(matches!(
            keyboard_event,
            Some(ControllerEvent::Selected(ref item)) if item.id == 2
        ));
        assert_eq!(keyboard.dropdown(), pointer.dropdown());
        assert!(!keyboard.dropdown().visible);
        assert_eq!(keyboard.dropdown().highlighted, None);
        assert_eq!(keyboard.input(), "Title 2");
    }

    #[test]
    fn test_escape_always_hides() {
        let mut controller = controller_with_items(4);
        controller.on_key_down(Key::ArrowDown);
        controller.on_key_down(Key::Escape);
        assert!(!controller.dropdown().visible);
        assert!(controller.dropdown().items().is_empty());
        assert_eq!(controller.dropdown().highlighted, None);
        assert_eq!(controller.focus(), Focus::Input);

        // Escape while a fetch is outstanding drops the late response.
        let request = type_and_settle(&mut controller, "batman", Instant::now()).unwrap();
        controller.on_key_down(Key::Escape);
        assert!(!controller.apply_fetch(request.seq, Ok(suggestions(3))));
        assert!(!controller.dropdown().visible);
    }

    #[test]
    fn test_enter_after_escape_searches_instead_of_selecting() {
        let mut controller = controller_with_items(3);
        controller.on_key_down(Key::Escape);
        assert!(controller.dropdown().items().is_empty());

        controller.on_key_down(Key::ArrowDown);
        assert_eq!(controller.dropdown().highlighted, None);

        let event = controller.on_key_down(Key::Enter);
        assert!(matches!(event, Some(ControllerEvent::SearchRequested(_))));
    }

    #[test]
    fn test_enter_after_short_input_searches_instead_of_selecting() {
        let mut controller = controller_with_items(3);
        controller.on_input_changed("b", Instant::now());

        controller.on_key_down(Key::ArrowDown);
        assert!(!controller.dropdown().visible);
        assert_eq!(controller.dropdown().highlighted, None);
        assert!(!controller.on_item_hover(0));

        let event = controller.on_key_down(Key::Enter);
        assert_eq!(
            event,
            Some(ControllerEvent::SearchRequested(SearchRequest {
                query: "b".to_string(),
                kind: MediaKind::Movie,
                genre: None,
            }))
        );

        // Cached items still come back on refocus.
        controller.on_focus();
        assert!(controller.dropdown().visible);
        assert_eq!(controller.dropdown().items().len(), 3);
    }

    #[test]
    fn test_escape_applies_even_when_unfocused() {
        let mut controller = controller_with_items(2);
        controller.on_focus_lost(Instant::now());
        controller.on_key_down(Key::Escape);
        assert!(!controller.dropdown().visible);
    }

    #[test]
    fn test_hover_and_keyboard_share_highlight() {
        let mut controller = controller_with_items(5);
        controller.on_key_down(Key::ArrowDown);
        assert_eq!(controller.dropdown().highlighted, Some(0));

        assert!(controller.on_item_hover(3));
        assert_eq!(controller.dropdown().highlighted, Some(3));

        controller.on_key_down(Key::ArrowUp);
        assert_eq!(controller.dropdown().highlighted, Some(2));

        assert!(!controller.on_item_hover(9));
        assert_eq!(controller.dropdown().highlighted, Some(2));
    }

    #[test]
    fn test_hide_timer_keeps_items_for_reshow() {
        let mut controller = controller_with_items(3);
        let now = Instant::now();
        controller.on_item_hover(1);

        controller.on_pointer_outside(now);
        assert!(!controller.fire_hide(now + Duration::from_millis(100)));
        assert!(controller.fire_hide(now + Duration::from_millis(200)));

        assert!(!controller.dropdown().visible);
        assert_eq!(controller.dropdown().highlighted, None);
        assert_eq!(controller.dropdown().items().len(), 3);

        controller.on_focus();
        assert!(controller.dropdown().visible);
    }

    #[test]
    fn test_pointer_entering_dropdown_cancels_hide() {
        let mut controller = controller_with_items(3);
        let now = Instant::now();

        controller.on_focus_lost(now);
        controller.on_pointer_enter_dropdown();
        assert!(!controller.fire_hide(now + Duration::from_secs(1)));
        assert!(controller.dropdown().visible);
    }

    #[test]
    fn test_hover_cancels_pending_hide() {
        let mut controller = controller_with_items(3);
        let now = Instant::now();

        controller.request_hide(now);
        controller.on_item_hover(0);
        assert!(controller.hide_deadline().is_none());
    }

    #[test]
    fn test_request_show_without_items_stays_hidden() {
        let mut controller = controller();
        controller.on_focus();
        assert!(!controller.dropdown().visible);
    }

    #[test]
    fn test_keys_ignored_when_focus_outside() {
        let mut controller = controller_with_items(3);
        controller.on_focus_lost(Instant::now());

        assert_eq!(controller.on_key_down(Key::Enter), None);
        controller.on_key_down(Key::ArrowDown);
        assert_eq!(controller.dropdown().highlighted, None);
    }

    #[test]
    fn test_selection_drops_in_flight_fetch() {
        let mut controller = controller_with_items(3);
        let request = type_and_settle(&mut controller, "batm", Instant::now()).unwrap();

        controller.on_item_activate(0);
        assert!(!controller.apply_fetch(request.seq, Ok(suggestions(4))));
        assert!(controller.dropdown().items().is_empty());
        assert!(controller.is_settled());
    }

    #[derive(Debug, Clone)]
    enum Action {
        Key(Key),
        Hover(usize),
        Activate(usize),
        Type(String),
        Settle(usize),
    }

    fn action_strategy() -> impl Strategy<Value = Action> {
        prop_oneof![
            Just(Action::Key(Key::ArrowDown)),
            Just(Action::Key(Key::ArrowUp)),
            Just(Action::Key(Key::Enter)),
            Just(Action::Key(Key::Escape)),
            (0usize..8).prop_map(Action::Hover),
            (0usize..8).prop_map(Action::Activate),
            "[a-c ]{0,4}".prop_map(Action::Type),
            (0usize..8).prop_map(Action::Settle),
        ]
    }

    proptest! {
        #[test]
        fn test_highlight_stays_in_bounds(actions in prop::collection::vec(action_strategy(), 1..60)) {
            let mut controller = controller();
            let mut now = Instant::now();

            for action in actions {
                match action {
                    Action::Key(key) => { controller.on_key_down(key); }
                    Action::Hover(index) => { controller.on_item_hover(index); }
                    Action::Activate(index) => { controller.on_item_activate(index); }
                    Action::Type(text) => controller.on_input_changed(&text, now),
                    Action::Settle(count) => {
                        now += Duration::from_millis(300);
                        if let Some(request) = controller.fire_debounce(now) {
                            controller.apply_fetch(request.seq, Ok(suggestions(count)));
                        }
                    }
                }

                let dropdown = controller.dropdown();
                if let Some(index) = dropdown.highlighted {
                    prop_assert!(index < dropdown.items().len());
                }
                prop_assert!(dropdown.items().len() <= 5);
            }
        }
    }
}
