//! Suggestion controller scenarios on a paused clock.

use std::sync::Arc;
use std::time::Duration;

use marquee_core::config::SuggestConfig;
use marquee_core::suggest::testing::{ScriptedSource, suggestions};
use marquee_core::suggest::{Focus, Key, SearchRequest, spawn_suggestion_controller};
use marquee_core::{ControllerEvent, MediaKind, SuggestionControllerHandle, SuggestionSource};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::sleep;

fn spawn(
    source: ScriptedSource,
) -> (
    SuggestionControllerHandle,
    UnboundedReceiver<ControllerEvent>,
    Arc<ScriptedSource>,
) {
    let source = Arc::new(source);
    let (handle, events) = spawn_suggestion_controller(
        SuggestConfig::default(),
        Arc::clone(&source) as Arc<dyn SuggestionSource>,
    );
    (handle, events, source)
}

#[tokio::test(start_paused = true)]
async fn test_typing_burst_fetches_last_query_after_quiet_period() {
    let (handle, _events, source) =
        spawn(ScriptedSource::new().reply("bat", Ok(suggestions(3))));

    for text in ["b", "ba", "bat"] {
        handle.input_changed(text).await.unwrap();
        sleep(Duration::from_millis(100)).await;
    }

    sleep(Duration::from_millis(150)).await;
    assert_eq!(source.call_count(), 0);

    let state = handle.settled().await.unwrap();
    assert_eq!(source.calls(), vec![("bat".to_string(), MediaKind::Movie)]);
    assert_eq!(state.dropdown.items().len(), 3);
    assert!(state.dropdown.visible);
}

#[tokio::test(start_paused = true)]
async fn test_deleting_below_threshold_discards_in_flight_fetch() {
    let (handle, _events, source) = spawn(ScriptedSource::new().reply_after(
        "bat",
        Duration::from_millis(400),
        Ok(suggestions(3)),
    ));

    handle.input_changed("bat").await.unwrap();
    sleep(Duration::from_millis(350)).await;
    assert_eq!(source.call_count(), 1);

    handle.input_changed("b").await.unwrap();
    let state = handle.snapshot().await.unwrap();
    assert!(!state.fetch_in_flight);

    sleep(Duration::from_secs(1)).await;
    let state = handle.snapshot().await.unwrap();
    assert!(!state.dropdown.visible);
    assert!(state.dropdown.items().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_arrow_navigation_clamps_and_returns_to_input() {
    let (handle, mut events, _source) =
        spawn(ScriptedSource::new().reply("star", Ok(suggestions(3))));

    handle.input_changed("star").await.unwrap();
    handle.settled().await.unwrap();

    for _ in 0..5 {
        handle.key_down(Key::ArrowDown).await.unwrap();
    }
    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.dropdown.highlighted, Some(2));
    assert_eq!(state.focus, Focus::Dropdown);

    for _ in 0..3 {
        handle.key_down(Key::ArrowUp).await.unwrap();
    }
    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.dropdown.highlighted, None);
    assert_eq!(state.focus, Focus::Input);

    handle.key_down(Key::Enter).await.unwrap();
    assert_eq!(
        events.recv().await,
        Some(ControllerEvent::SearchRequested(SearchRequest {
            query: "star".to_string(),
            kind: MediaKind::Movie,
            genre: None,
        }))
    );
}

#[tokio::test(start_paused = true)]
async fn test_hover_then_click_selects_item() {
    let (handle, mut events, _source) =
        spawn(ScriptedSource::new().reply("alien", Ok(suggestions(2))));

    handle.input_changed("alien").await.unwrap();
    handle.settled().await.unwrap();

    handle.item_hover(7).await.unwrap();
    assert_eq!(handle.snapshot().await.unwrap().dropdown.highlighted, None);

    handle.item_hover(1).await.unwrap();
    handle.item_activate(1).await.unwrap();

    let Some(ControllerEvent::Selected(item)) = events.recv().await else {
        panic!("expected a selection");
    };
    assert_eq!(item.display_title, "Title 1");

    let state = handle.snapshot().await.unwrap();
    assert_eq!(state.input, "Title 1");
    assert!(!state.dropdown.visible);
}

#[tokio::test(start_paused = true)]
async fn test_focus_loss_hides_and_refocus_restores() {
    let (handle, _events, _source) =
        spawn(ScriptedSource::new().reply("dune", Ok(suggestions(2))));

    handle.input_changed("dune").await.unwrap();
    handle.settled().await.unwrap();

    handle.focus_lost().await.unwrap();
    sleep(Duration::from_millis(100)).await;
    handle.focus().await.unwrap();
    sleep(Duration::from_millis(300)).await;
    assert!(handle.snapshot().await.unwrap().dropdown.visible);

    handle.focus_lost().await.unwrap();
    sleep(Duration::from_millis(250)).await;
    let state = handle.snapshot().await.unwrap();
    assert!(!state.dropdown.visible);
    assert_eq!(state.dropdown.items().len(), 2);
    assert_eq!(state.focus, Focus::Outside);

    handle.key_down(Key::ArrowDown).await.unwrap();
    assert_eq!(handle.snapshot().await.unwrap().dropdown.highlighted, None);

    handle.focus().await.unwrap();
    let state = handle.snapshot().await.unwrap();
    assert!(state.dropdown.visible);
    assert_eq!(state.focus, Focus::Input);
}

#[tokio::test(start_paused = true)]
async fn test_enter_after_escape_requests_search() {
    let (handle, mut events, _source) =
        spawn(ScriptedSource::new().reply("alien", Ok(suggestions(3))));

    handle.input_changed("alien").await.unwrap();
    handle.settled().await.unwrap();

    handle.key_down(Key::Escape).await.unwrap();
    handle.key_down(Key::ArrowDown).await.unwrap();
    let state = handle.snapshot().await.unwrap();
    assert!(state.dropdown.items().is_empty());
    assert_eq!(state.dropdown.highlighted, None);

    handle.key_down(Key::Enter).await.unwrap();
    assert_eq!(
        events.recv().await,
        Some(ControllerEvent::SearchRequested(SearchRequest {
            query: "alien".to_string(),
            kind: MediaKind::Movie,
            genre: None,
        }))
    );
}
